//! Person records.

use serde::{Deserialize, Serialize};

use super::{Entity, Record, project::ProjectRef};
use crate::{
  kind::EntityKind,
  schema::{FieldSpec, Link, Shape},
  tier::Tier,
};

pub const FIELDS: &[FieldSpec] = &[
  FieldSpec::value("id", Tier::Base, Shape::Text),
  FieldSpec::value("name", Tier::Base, Shape::Text),
  FieldSpec::ref_url(),
  FieldSpec::value("primary_email", Tier::Full, Shape::Text),
  FieldSpec::linked(
    "projects",
    Tier::Full,
    Shape::ObjectList,
    Link::To(EntityKind::Project, Tier::Base),
  ),
  FieldSpec::value("account_created_ts", Tier::Extended, Shape::Integer),
  FieldSpec::value("alternate_emails", Tier::Extended, Shape::TextList),
];

/// The shortest public representation of a person: user id and public name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRef {
  pub id:   String,
  pub name: String,
}

/// A person with an account in the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
  pub id:                 String,
  pub name:               String,
  pub primary_email:      String,
  /// Base references only, so a person never embeds a project that embeds
  /// the person again.
  pub projects:           Vec<ProjectRef>,
  /// Unix seconds.
  pub account_created_ts: i64,
  pub alternate_emails:   Vec<String>,
}

impl Person {
  pub fn new(
    id: impl Into<String>,
    name: impl Into<String>,
    primary_email: impl Into<String>,
  ) -> Self {
    Self {
      id:                 id.into(),
      name:               name.into(),
      primary_email:      primary_email.into(),
      projects:           Vec::new(),
      account_created_ts: 0,
      alternate_emails:   Vec::new(),
    }
  }

  pub fn to_ref(&self) -> PersonRef {
    PersonRef { id: self.id.clone(), name: self.name.clone() }
  }

  /// Add a project back-reference. Returns `false` if the project was already
  /// listed.
  pub fn add_project(&mut self, project: ProjectRef) -> bool {
    if self.projects.iter().any(|p| p.id == project.id) {
      return false;
    }
    self.projects.push(project);
    true
  }
}

impl Record for Person {
  const KIND: EntityKind = EntityKind::Person;

  fn id(&self) -> &str { &self.id }

  fn into_entity(self) -> Entity { Entity::Person(self) }

  fn from_entity(entity: &Entity) -> Option<&Self> {
    match entity {
      Entity::Person(person) => Some(person),
      _ => None,
    }
  }
}
