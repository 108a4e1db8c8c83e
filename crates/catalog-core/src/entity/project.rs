//! Project records.
//!
//! Membership lists only grow through [`Project::add_committer`] and
//! [`Project::add_pmc_member`], which keep them free of duplicates. The chair
//! is not settable: it is the first PMC member ever added.

use serde::{Deserialize, Serialize};

use super::{
  Entity, Record, mailing_list::MailingListRef, person::PersonRef,
  repository::Repository,
};
use crate::{
  kind::EntityKind,
  schema::{FieldSpec, Link, Shape},
  tier::Tier,
};

pub const FIELDS: &[FieldSpec] = &[
  FieldSpec::value("id", Tier::Base, Shape::Text),
  FieldSpec::value("name", Tier::Base, Shape::Text),
  FieldSpec::value("website", Tier::Base, Shape::Text),
  FieldSpec::ref_url(),
  FieldSpec::linked(
    "chair",
    Tier::Full,
    Shape::OptionalObject,
    Link::To(EntityKind::Person, Tier::Base),
  ),
  FieldSpec::linked(
    "committers",
    Tier::Full,
    Shape::ObjectList,
    Link::To(EntityKind::Person, Tier::Base),
  ),
  FieldSpec::linked(
    "pmc_members",
    Tier::Full,
    Shape::ObjectList,
    Link::To(EntityKind::Person, Tier::Base),
  ),
  FieldSpec::linked(
    "mailinglists",
    Tier::Full,
    Shape::ObjectList,
    Link::To(EntityKind::MailingList, Tier::Base),
  ),
  FieldSpec::linked(
    "repositories",
    Tier::Full,
    Shape::ObjectList,
    Link::Tagged(
      Tier::Full,
      &[EntityKind::GitRepository, EntityKind::SubversionRepository],
    ),
  ),
];

/// A short representation of a project with its basic data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
  pub id:      String,
  pub name:    String,
  pub website: String,
}

/// A comprehensive representation of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
  pub id:           String,
  pub name:         String,
  pub website:      String,
  chair:            Option<PersonRef>,
  committers:       Vec<PersonRef>,
  pmc_members:      Vec<PersonRef>,
  pub mailinglists: Vec<MailingListRef>,
  pub repositories: Vec<Repository>,
}

impl Project {
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    website: impl Into<String>,
  ) -> Self {
    Self {
      id:           id.into(),
      name:         name.into(),
      website:      website.into(),
      chair:        None,
      committers:   Vec::new(),
      pmc_members:  Vec::new(),
      mailinglists: Vec::new(),
      repositories: Vec::new(),
    }
  }

  pub fn to_ref(&self) -> ProjectRef {
    ProjectRef {
      id:      self.id.clone(),
      name:    self.name.clone(),
      website: self.website.clone(),
    }
  }

  pub fn chair(&self) -> Option<&PersonRef> { self.chair.as_ref() }

  pub fn committers(&self) -> &[PersonRef] { &self.committers }

  pub fn pmc_members(&self) -> &[PersonRef] { &self.pmc_members }

  /// Returns `false` if the person was already a committer.
  pub fn add_committer(&mut self, person: PersonRef) -> bool {
    push_unique(&mut self.committers, person)
  }

  /// Returns `false` if the person was already on the PMC. The first member
  /// added becomes chair.
  pub fn add_pmc_member(&mut self, person: PersonRef) -> bool {
    if self.chair.is_none() {
      self.chair = Some(person.clone());
    }
    push_unique(&mut self.pmc_members, person)
  }
}

fn push_unique(list: &mut Vec<PersonRef>, person: PersonRef) -> bool {
  if list.iter().any(|p| p.id == person.id) {
    return false;
  }
  list.push(person);
  true
}

impl Record for Project {
  const KIND: EntityKind = EntityKind::Project;

  fn id(&self) -> &str { &self.id }

  fn into_entity(self) -> Entity { Entity::Project(self) }

  fn from_entity(entity: &Entity) -> Option<&Self> {
    match entity {
      Entity::Project(project) => Some(project),
      _ => None,
    }
  }
}
