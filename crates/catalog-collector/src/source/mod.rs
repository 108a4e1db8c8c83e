//! Concrete directory sources.

mod fixture;
mod ldapsearch;
pub(crate) mod ldif;

use std::{future::Future, path::PathBuf, process::ExitStatus};

use catalog_core::source::{Attributes, DirectorySource, SearchScope};
use thiserror::Error;

pub use fixture::StaticDirectory;
pub use ldapsearch::LdapSearch;

#[derive(Debug, Error)]
pub enum SourceError {
  #[error("failed to run {program}: {source}")]
  Spawn {
    program: String,
    #[source]
    source:  std::io::Error,
  },

  #[error("{program} exited with {status}: {stderr}")]
  Exit {
    program: String,
    status:  ExitStatus,
    stderr:  String,
  },

  #[error("ldif line {line}: {reason}")]
  Ldif { line: usize, reason: String },

  #[error("no records for search base {0}")]
  UnknownBase(String),

  #[error("invalid fixture: {0}")]
  Fixture(#[from] serde_json::Error),

  #[error("failed to read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("source kind is fixture but no fixture path is configured")]
  MissingFixture,
}

/// Any of the configured source backends.
#[derive(Debug, Clone)]
pub enum Directory {
  LdapSearch(LdapSearch),
  Static(StaticDirectory),
}

impl DirectorySource for Directory {
  type Error = SourceError;

  fn search<'a>(
    &'a self,
    base: &'a str,
    scope: SearchScope,
  ) -> impl Future<Output = Result<Vec<Attributes>, SourceError>> + Send + 'a {
    async move {
      match self {
        Directory::LdapSearch(source) => source.search(base, scope).await,
        Directory::Static(source) => source.search(base, scope).await,
      }
    }
  }
}

impl From<LdapSearch> for Directory {
  fn from(source: LdapSearch) -> Self { Directory::LdapSearch(source) }
}

impl From<StaticDirectory> for Directory {
  fn from(source: StaticDirectory) -> Self { Directory::Static(source) }
}
