//! Core types and trait definitions for the catalog service.
//!
//! Entity records with their visibility tiers and projections, plus the
//! [`source::DirectorySource`] trait the collector scrapes. No storage or
//! transport lives here.

pub mod entity;
pub mod error;
pub mod kind;
pub mod schema;
pub mod source;
pub mod tier;

pub use entity::{Entity, FieldMap, Record};
pub use error::{Error, Result};
pub use kind::EntityKind;
pub use tier::{Tier, Visibility};
