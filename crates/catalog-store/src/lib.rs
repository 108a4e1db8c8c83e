//! In-memory catalog store and the lookup engine that reads it.
//!
//! [`CatalogStore`] keeps one immutable bucket per entity kind behind an
//! [`arc_swap::ArcSwap`], so readers never lock and a bulk replace becomes
//! visible in a single pointer swap. [`Catalog`] layers the
//! visibility-aware lookup on top.

mod bucket;
mod filter;
mod lookup;
mod store;

pub mod error;

pub use bucket::BucketStats;
pub use error::{Error, LookupError, Result};
pub use filter::Filter;
pub use lookup::{Catalog, Envelope};
pub use store::{CatalogStore, Matches};

#[cfg(test)]
mod tests;
