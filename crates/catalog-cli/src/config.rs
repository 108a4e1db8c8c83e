//! Configuration for the `catalog` binary.

use std::{path::Path, time::Duration};

use anyhow::Context as _;
use catalog_collector::{CollectorConfig, SourceConfig};
use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// Read from an optional TOML file, then overridden by `CATALOG_*`
/// environment variables. Nested keys use `__`, e.g.
/// `CATALOG_SOURCE__KIND=fixture`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
  /// Host that `ref_url`s point at.
  pub hostname:              String,
  pub refresh_interval_secs: u64,
  pub source:                SourceConfig,
  pub collector:             CollectorConfig,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      hostname:              "catalog-test.apache.org".to_owned(),
      refresh_interval_secs: 3600,
      source:                SourceConfig::default(),
      collector:             CollectorConfig::default(),
    }
  }
}

impl CatalogConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    ::config::Config::builder()
      .add_source(::config::File::from(path).required(false))
      .add_source(
        ::config::Environment::with_prefix("CATALOG")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .with_context(|| format!("failed to read config file {}", path.display()))?
      .try_deserialize()
      .context("failed to deserialise CatalogConfig")
  }

  pub fn refresh_interval(&self) -> Duration { Duration::from_secs(self.refresh_interval_secs) }
}
