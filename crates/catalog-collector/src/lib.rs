//! Directory scraping for the catalog.
//!
//! A [`Collector`] pulls people and projects out of a
//! [`catalog_core::source::DirectorySource`], cross-links them, and commits
//! the result to a [`catalog_store::CatalogStore`]. The [`Scheduler`] repeats
//! that on a fixed interval until it is cancelled.

mod collector;
mod link;
mod scheduler;

pub mod config;
pub mod error;
pub mod source;

pub use collector::{Collector, PassReport};
pub use config::{CollectorConfig, SourceConfig, SourceKind};
pub use error::{Error, Result};
pub use scheduler::Scheduler;
pub use source::{Directory, LdapSearch, SourceError, StaticDirectory};
