//! Visibility tiers and caller access levels.
//!
//! Every field of every entity kind has a minimum [`Tier`]. A record viewed at
//! tier `T` shows exactly the fields whose minimum tier is `≤ T`; see
//! [`crate::schema`] for the per-kind tables.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A widening level of field visibility: `Extended ⊇ Full ⊇ Base`.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
  /// Minimal public identity fields.
  Base,
  /// Every non-sensitive field.
  Full,
  /// Adds fields only visible inside the organisation.
  Extended,
}

/// The access level of a caller of the lookup interface.
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
pub enum Visibility {
  /// Anonymous access.
  #[default]
  Public,
  /// Authenticated access within the organisation.
  Full,
}

impl Visibility {
  /// The widest tier this caller may see.
  pub fn tier(self) -> Tier {
    match self {
      Visibility::Public => Tier::Full,
      Visibility::Full => Tier::Extended,
    }
  }
}
