//! The `DirectorySource` trait and the attribute records it yields.
//!
//! The collector depends only on this abstraction: "given a search base and
//! scope, return a sequence of attribute maps". Concrete sources (an
//! `ldapsearch` subprocess, a static fixture) live in `catalog-collector`.

use std::{collections::BTreeMap, future::Future};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

// ─── Scope ───────────────────────────────────────────────────────────────────

/// How far below the search base a search descends.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchScope {
  /// Only the base entry itself.
  Base,
  /// Immediate children of the base.
  One,
  /// The base and its whole subtree.
  #[default]
  Sub,
}

// ─── Attributes ──────────────────────────────────────────────────────────────

/// One directory record: attribute name → values.
///
/// Attribute names are case-insensitive; they are stored lowercased.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
  from = "BTreeMap<String, Vec<String>>",
  into = "BTreeMap<String, Vec<String>>"
)]
pub struct Attributes(BTreeMap<String, Vec<String>>);

impl Attributes {
  pub fn new() -> Self { Self::default() }

  /// Append `value` to attribute `name`.
  pub fn push(&mut self, name: &str, value: impl Into<String>) {
    self
      .0
      .entry(name.to_ascii_lowercase())
      .or_default()
      .push(value.into());
  }

  /// Builder form of [`Attributes::push`].
  pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
    self.push(name, value);
    self
  }

  /// All values of `name`, in source order.
  pub fn all(&self, name: &str) -> &[String] {
    self
      .0
      .get(&name.to_ascii_lowercase())
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  /// The first value of `name`.
  pub fn first(&self, name: &str) -> Option<&str> {
    self.all(name).first().map(String::as_str)
  }

  /// The first value of the first attribute in `names` that has one.
  pub fn first_of(&self, names: &[&str]) -> Option<&str> {
    names.iter().find_map(|name| self.first(name))
  }

  pub fn contains(&self, name: &str) -> bool { !self.all(name).is_empty() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl From<BTreeMap<String, Vec<String>>> for Attributes {
  fn from(map: BTreeMap<String, Vec<String>>) -> Self {
    let mut attrs = Attributes::new();
    for (name, values) in map {
      for value in values {
        attrs.push(&name, value);
      }
    }
    attrs
  }
}

impl From<Attributes> for BTreeMap<String, Vec<String>> {
  fn from(attrs: Attributes) -> Self { attrs.0 }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for Attributes {
  fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
    let mut attrs = Attributes::new();
    for (name, value) in iter {
      attrs.push(name.as_ref(), value);
    }
    attrs
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the directory service the catalog is scraped from.
///
/// All methods return `Send` futures so sources can be driven from a spawned
/// tokio task.
pub trait DirectorySource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Return every record under `base` within `scope`.
  fn search<'a>(
    &'a self,
    base: &'a str,
    scope: SearchScope,
  ) -> impl Future<Output = Result<Vec<Attributes>, Self::Error>> + Send + 'a;
}
