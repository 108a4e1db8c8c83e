//! `catalog`: load the directory into memory and query it.
//!
//! # Usage
//!
//! ```
//! catalog lookup person jdoe
//! catalog lookup project --filter name="Apache Foo" --public
//! catalog lookup mailinglist --schema
//! catalog --config /etc/catalog.toml run
//! ```

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use catalog_collector::{Collector, Scheduler};
use catalog_core::Visibility;
use catalog_store::{Catalog, CatalogStore, Filter};
use clap::{Parser, Subcommand};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

use crate::config::CatalogConfig;

// ─── CLI args ────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "catalog", version, about = "In-memory directory catalog")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "catalog.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Collect once, then print matching records as JSON.
  Lookup {
    /// Entity type, e.g. `person` or `ExtendedProject`.
    entity_type: String,

    /// Shorthand for `--filter id=ID`.
    id: Option<String>,

    /// Only records whose field equals the value. Repeatable.
    #[arg(short, long = "filter", value_name = "FIELD=VALUE", value_parser = parse_filter)]
    filters: Vec<(String, String)>,

    /// Answer as an anonymous caller would see it.
    #[arg(long)]
    public: bool,

    /// Print the JSON schema of the result instead. Does not collect.
    #[arg(long)]
    schema: bool,
  },

  /// Collect once, then print per-bucket record counts.
  Stats,

  /// Refresh periodically until interrupted.
  Run,
}

fn parse_filter(raw: &str) -> Result<(String, String), String> {
  match raw.split_once('=') {
    Some((field, value)) if !field.trim().is_empty() => {
      Ok((field.trim().to_owned(), value.to_owned()))
    }
    _ => Err(format!("expected FIELD=VALUE, got `{raw}`")),
  }
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr; stdout carries the JSON output.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let config = CatalogConfig::load(&cli.config)?;

  let source = config
    .source
    .build()
    .context("failed to set up directory source")?;
  let store = Arc::new(CatalogStore::new());
  let collector = Arc::new(Collector::new(
    source,
    Arc::clone(&store),
    config.collector.clone(),
  ));

  match cli.command {
    Command::Lookup {
      entity_type,
      id,
      filters,
      public,
      schema,
    } => {
      let catalog = Catalog::new(Arc::clone(&store), config.hostname.as_str());
      let visibility = if public {
        Visibility::Public
      } else {
        Visibility::Full
      };

      let output = if schema {
        catalog.lookup_schema(&entity_type, visibility)?
      } else {
        collector.run_pass().await.context("collector pass failed")?;
        let mut filter: Filter = filters.into_iter().collect();
        if let Some(id) = id {
          filter.insert("id", id);
        }
        serde_json::to_value(catalog.lookup(&entity_type, &filter, visibility)?)?
      };
      println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Command::Stats => {
      collector.run_pass().await.context("collector pass failed")?;
      println!("{}", serde_json::to_string_pretty(&store.stats())?);
    }

    Command::Run => {
      let scheduler = Scheduler::new(Arc::clone(&collector), config.refresh_interval());
      let shutdown = scheduler.shutdown_token();
      let handle = scheduler.spawn();

      tokio::signal::ctrl_c()
        .await
        .context("failed to listen for ctrl-c")?;
      info!("interrupted; stopping after the current pass");
      shutdown.cancel();
      handle.await.context("scheduler task failed")?;
    }
  }

  Ok(())
}
