//! Mailing list records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Entity, Record, project::ProjectRef};
use crate::{
  kind::EntityKind,
  schema::{FieldSpec, Link, Shape},
  tier::Tier,
};

pub const FIELDS: &[FieldSpec] = &[
  FieldSpec::value("id", Tier::Base, Shape::Text),
  FieldSpec::ref_url(),
  FieldSpec::linked(
    "project",
    Tier::Full,
    Shape::Object,
    Link::To(EntityKind::Project, Tier::Base),
  ),
  FieldSpec::value("address", Tier::Full, Shape::Text),
  FieldSpec::value("list_id", Tier::Full, Shape::Text),
  FieldSpec::value("moderators", Tier::Extended, Shape::TextList),
  FieldSpec::value("subscribers", Tier::Extended, Shape::TextList),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingListRef {
  pub id: String,
}

/// A mailing list at the foundation. The id is the list's posting address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailingList {
  pub id:          String,
  pub project:     ProjectRef,
  pub moderators:  Vec<String>,
  pub subscribers: Vec<String>,
}

impl MailingList {
  pub fn new(id: impl Into<String>, project: ProjectRef) -> Self {
    Self {
      id: id.into(),
      project,
      moderators: Vec::new(),
      subscribers: Vec::new(),
    }
  }

  pub fn to_ref(&self) -> MailingListRef { MailingListRef { id: self.id.clone() } }

  /// The posting address.
  pub fn address(&self) -> &str { &self.id }

  /// The `List-Id` header value, e.g. `<dev.foo.apache.org>`.
  pub fn list_id(&self) -> String {
    format!("<{}>", self.address().replace('@', "."))
  }
}

impl Record for MailingList {
  const KIND: EntityKind = EntityKind::MailingList;

  fn id(&self) -> &str { &self.id }

  fn into_entity(self) -> Entity { Entity::MailingList(self) }

  fn from_entity(entity: &Entity) -> Option<&Self> {
    match entity {
      Entity::MailingList(list) => Some(list),
      _ => None,
    }
  }

  fn derived_fields(&self) -> Vec<(&'static str, Value)> {
    vec![
      ("address", Value::String(self.address().to_owned())),
      ("list_id", Value::String(self.list_id())),
    ]
  }
}
