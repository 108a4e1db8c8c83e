//! Error types for `catalog-core`.

use thiserror::Error;

use crate::kind::EntityKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no such object type, {0}")]
  UnknownEntityType(String),

  #[error("{0} record did not serialize to a field map")]
  NotAnObject(EntityKind),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
