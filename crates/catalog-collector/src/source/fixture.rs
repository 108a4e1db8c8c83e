//! [`StaticDirectory`]: canned records keyed by search base.

use std::{collections::HashMap, path::Path};

use catalog_core::source::{Attributes, DirectorySource, SearchScope};

use super::SourceError;

/// A directory that answers from memory.
///
/// Records are registered per search base; the scope is ignored. Searching a
/// base that was never registered fails with [`SourceError::UnknownBase`].
///
/// The JSON fixture format is `{ "<base>": [ { "<attr>": ["<value>", …] } ] }`.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
  bases: HashMap<String, Vec<Attributes>>,
}

impl StaticDirectory {
  pub fn new() -> Self { Self::default() }

  pub fn with_base(mut self, base: &str, records: impl IntoIterator<Item = Attributes>) -> Self {
    self.insert(base, records);
    self
  }

  /// Replace the records served for `base`.
  pub fn insert(&mut self, base: &str, records: impl IntoIterator<Item = Attributes>) {
    self
      .bases
      .insert(base.to_ascii_lowercase(), records.into_iter().collect());
  }

  pub fn from_json(json: &str) -> Result<Self, SourceError> {
    let raw: HashMap<String, Vec<Attributes>> = serde_json::from_str(json)?;
    Ok(raw.into_iter().fold(Self::new(), |dir, (base, records)| {
      dir.with_base(&base, records)
    }))
  }

  pub fn load(path: &Path) -> Result<Self, SourceError> {
    let json = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
      path: path.to_owned(),
      source,
    })?;
    Self::from_json(&json)
  }
}

impl DirectorySource for StaticDirectory {
  type Error = SourceError;

  async fn search<'a>(
    &'a self,
    base: &'a str,
    _scope: SearchScope,
  ) -> Result<Vec<Attributes>, SourceError> {
    self
      .bases
      .get(&base.to_ascii_lowercase())
      .cloned()
      .ok_or_else(|| SourceError::UnknownBase(base.to_owned()))
  }
}
