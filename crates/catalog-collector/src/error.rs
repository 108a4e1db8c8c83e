//! Error types for `catalog-collector`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// The directory could not be searched. The pass is abandoned and the
  /// previous snapshot stays in place.
  #[error("directory source unavailable: {0}")]
  SourceUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// A record lacked a required attribute and was skipped.
  #[error("malformed record under {base}: {reason}")]
  MalformedSourceRecord { base: String, reason: String },

  /// A membership reference named nobody in the people bucket.
  #[error("project {project} references unknown person {uid}")]
  UnresolvedReference { project: String, uid: String },

  #[error("store error: {0}")]
  Store(#[from] catalog_store::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
