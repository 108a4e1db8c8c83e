//! [`EntityKind`]: the canonical identifier of a store bucket.
//!
//! Callers address buckets by name (`"person"`, `"ExtendedPerson"`, …). Names
//! are resolved once at the boundary with [`EntityKind::resolve`]; everything
//! below that boundary takes the enum.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{
  error::{Error, Result},
  schema::FieldSpec,
  tier::Tier,
};

/// Every entity type the catalog knows about.
///
/// The lowercase variant name is the type slug used in bucket names and in
/// `ref_url` paths.
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
  EnumIter,
  EnumCount,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
  Person,
  Project,
  MailingList,
  GitRepository,
  SubversionRepository,
}

impl EntityKind {
  /// Resolve a caller-supplied type name.
  ///
  /// Matching is case-insensitive and ignores an `Extended` prefix, so
  /// `Person`, `person` and `ExtendedPerson` all name the same bucket.
  pub fn resolve(name: &str) -> Result<Self> {
    let lowered = name.trim().to_ascii_lowercase();
    let bare = lowered.strip_prefix("extended").unwrap_or(&lowered);
    EntityKind::from_str(bare)
      .map_err(|_| Error::UnknownEntityType(name.to_owned()))
  }

  /// Every kind, in declaration order.
  pub fn all() -> impl Iterator<Item = EntityKind> { <Self as IntoEnumIterator>::iter() }

  /// The lowercase type slug, e.g. `mailinglist`.
  pub fn slug(self) -> &'static str { self.into() }

  /// Position of this kind in dense per-kind arrays.
  pub fn index(self) -> usize { self as usize }

  /// The widest tier any record of this kind carries.
  pub fn top_tier(self) -> Tier {
    self
      .fields()
      .iter()
      .map(|spec| spec.tier)
      .max()
      .unwrap_or(Tier::Base)
  }

  /// `https://{host}/lookup/{slug}/{id}`
  pub fn ref_url(self, host: &str, id: &str) -> String {
    format!("https://{host}/lookup/{}/{id}", self.slug())
  }

  /// The declared field-tier table for this kind.
  pub fn fields(self) -> &'static [FieldSpec] {
    use crate::entity::{mailing_list, person, project, repository};
    match self {
      EntityKind::Person => person::FIELDS,
      EntityKind::Project => project::FIELDS,
      EntityKind::MailingList => mailing_list::FIELDS,
      EntityKind::GitRepository => repository::GIT_FIELDS,
      EntityKind::SubversionRepository => repository::SVN_FIELDS,
    }
  }
}
