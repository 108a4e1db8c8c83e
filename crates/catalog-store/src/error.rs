//! Error types for `catalog-store`.

use catalog_core::EntityKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A record was handed to the bucket of another kind.
  #[error("cannot store a {found} record in the {expected} bucket")]
  KindMismatch {
    expected: EntityKind,
    found:    EntityKind,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error returned to callers of [`crate::Catalog::lookup`].
#[derive(Debug, Error)]
pub enum LookupError {
  /// The requested bucket does not exist. Distinct from an empty result.
  #[error("no such object type, {0}")]
  UnknownEntityType(String),

  #[error("failed to materialise record: {0}")]
  Materialize(#[source] catalog_core::Error),
}

impl LookupError {
  /// The HTTP status a router should answer with.
  pub fn status_code(&self) -> u16 {
    match self {
      LookupError::UnknownEntityType(_) => 400,
      LookupError::Materialize(_) => 500,
    }
  }
}

impl From<catalog_core::Error> for LookupError {
  fn from(err: catalog_core::Error) -> Self {
    match err {
      catalog_core::Error::UnknownEntityType(name) => {
        LookupError::UnknownEntityType(name)
      }
      other => LookupError::Materialize(other),
    }
  }
}
