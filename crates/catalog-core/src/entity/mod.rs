//! Entity records: the values held by the catalog store.
//!
//! Each entity kind has one record struct carrying every field of its widest
//! tier, plus a `…Ref` struct with just the base fields used for
//! cross-references. Narrower views are never separate structs; they are
//! produced by projecting the record's field map through the kind's
//! field-tier table (see [`crate::schema`]).

pub mod mailing_list;
pub mod person;
pub mod project;
pub mod repository;

use serde::Serialize;
use serde_json::Value;

pub use mailing_list::{MailingList, MailingListRef};
pub use person::{Person, PersonRef};
pub use project::{Project, ProjectRef};
pub use repository::{GitRepository, Repository, SubversionRepository};

use crate::{
  error::{Error, Result},
  kind::EntityKind,
  schema,
  tier::{Tier, Visibility},
};

/// A record materialised as plain `field name → value` pairs.
pub type FieldMap = serde_json::Map<String, Value>;

// ─── Record trait ────────────────────────────────────────────────────────────

/// Implemented by every concrete entity record.
pub trait Record: Serialize + Clone + Send + Sync + 'static {
  /// The bucket records of this type live in.
  const KIND: EntityKind;

  fn id(&self) -> &str;

  fn into_entity(self) -> Entity;

  fn from_entity(entity: &Entity) -> Option<&Self>;

  /// Computed fields merged into the field map on every read. Never stored.
  fn derived_fields(&self) -> Vec<(&'static str, Value)> { Vec::new() }

  /// Every stored and derived field of this record.
  fn fields(&self) -> Result<FieldMap> {
    match serde_json::to_value(self)? {
      Value::Object(mut map) => {
        for (name, value) in self.derived_fields() {
          map.insert(name.to_owned(), value);
        }
        Ok(map)
      }
      _ => Err(Error::NotAnObject(Self::KIND)),
    }
  }
}

// ─── Entity ──────────────────────────────────────────────────────────────────

/// Any catalog record.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
  Person(Person),
  Project(Project),
  MailingList(MailingList),
  GitRepository(GitRepository),
  SubversionRepository(SubversionRepository),
}

impl Entity {
  pub fn kind(&self) -> EntityKind {
    match self {
      Entity::Person(_) => Person::KIND,
      Entity::Project(_) => Project::KIND,
      Entity::MailingList(_) => MailingList::KIND,
      Entity::GitRepository(_) => GitRepository::KIND,
      Entity::SubversionRepository(_) => SubversionRepository::KIND,
    }
  }

  pub fn id(&self) -> &str {
    match self {
      Entity::Person(r) => r.id(),
      Entity::Project(r) => r.id(),
      Entity::MailingList(r) => r.id(),
      Entity::GitRepository(r) => r.id(),
      Entity::SubversionRepository(r) => r.id(),
    }
  }

  /// Every stored and derived field, without `ref_url` and without any tier
  /// filtering. Used for matching, never for output.
  pub fn fields(&self) -> Result<FieldMap> {
    match self {
      Entity::Person(r) => r.fields(),
      Entity::Project(r) => r.fields(),
      Entity::MailingList(r) => r.fields(),
      Entity::GitRepository(r) => r.fields(),
      Entity::SubversionRepository(r) => r.fields(),
    }
  }

  /// This record viewed at `tier`.
  pub fn project(&self, tier: Tier, host: &str) -> Result<FieldMap> {
    Ok(schema::project(self.kind(), self.fields()?, tier, host))
  }

  /// This record as a caller at `visibility` may see it.
  pub fn view(&self, visibility: Visibility, host: &str) -> Result<FieldMap> {
    self.project(visibility.tier(), host)
  }

  pub fn as_record<R: Record>(&self) -> Option<&R> { R::from_entity(self) }
}

macro_rules! entity_from {
  ($($record:ident),* $(,)?) => {
    $(
      impl From<$record> for Entity {
        fn from(record: $record) -> Self { record.into_entity() }
      }
    )*
  };
}

entity_from!(Person, Project, MailingList, GitRepository, SubversionRepository);

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  const HOST: &str = "catalog.example.org";

  fn samples() -> Vec<Entity> {
    let mut person = Person::new("jdoe", "Jane Doe", "jdoe@example.org");
    person.account_created_ts = 1_234_567_890;
    person.alternate_emails = vec!["jane@example.com".into()];

    let mut project = Project::new("foo", "Apache Foo", "https://foo.apache.org");
    person.add_project(project.to_ref());
    project.add_committer(person.to_ref());
    project.add_pmc_member(person.to_ref());
    project.repositories.push(
      GitRepository::new("foo.git", "https://gitbox.apache.org/repos/asf/foo.git", "foo")
        .into(),
    );
    project.repositories.push(
      SubversionRepository::new("foo-site", "https://svn.apache.org/repos/asf/foo/site", "foo")
        .into(),
    );

    let mut list = MailingList::new("dev@foo.apache.org", project.to_ref());
    list.moderators = vec!["jdoe@apache.org".into()];
    list.subscribers = vec!["someone@example.com".into()];
    project.mailinglists.push(list.to_ref());

    let mut git = GitRepository::new("foo-site.git", "https://gitbox.apache.org/repos/asf/foo-site.git", "foo");
    git.mirror_url = Some("https://github.com/apache/foo-site".into());

    vec![
      person.into(),
      project.into(),
      list.into(),
      git.into(),
      SubversionRepository::new("foo-dist", "https://dist.apache.org/repos/dist/release/foo", "foo")
        .into(),
    ]
  }

  #[test]
  fn every_serialized_field_is_declared_in_its_tier_table() {
    for entity in samples() {
      let kind = entity.kind();
      for name in entity.fields().unwrap().keys() {
        assert!(
          kind.fields().iter().any(|spec| spec.name == name.as_str()),
          "{kind}.{name} has no declared tier"
        );
      }
    }
  }

  #[test]
  fn downgrade_is_lossless_on_shared_fields() {
    for entity in samples() {
      let extended = entity.project(Tier::Extended, HOST).unwrap();
      for tier in [Tier::Base, Tier::Full] {
        let narrow = entity.project(tier, HOST).unwrap();
        for (name, value) in &narrow {
          let spec = entity.kind().fields().iter().find(|s| s.name == name.as_str()).unwrap();
          assert!(spec.tier <= tier);
          assert_eq!(Some(value), extended.get(name), "{} {name} at {tier}", entity.kind());
        }
      }
    }
  }

  #[test]
  fn base_projection_matches_reference_struct() {
    let person = Person::new("jdoe", "Jane Doe", "jdoe@example.org");
    let mut expected = serde_json::to_value(person.to_ref())
      .unwrap()
      .as_object()
      .cloned()
      .unwrap();
    expected.insert(
      "ref_url".into(),
      Value::String(format!("https://{HOST}/lookup/person/jdoe")),
    );

    let base = Entity::from(person).project(Tier::Base, HOST).unwrap();
    assert_eq!(base, expected);
  }

  #[test]
  fn public_view_hides_extended_fields() {
    let person = samples().remove(0);
    let public = person.view(Visibility::Public, HOST).unwrap();
    let full = person.view(Visibility::Full, HOST).unwrap();

    assert!(!public.contains_key("account_created_ts"));
    assert!(!public.contains_key("alternate_emails"));
    assert_eq!(public["primary_email"], "jdoe@example.org");
    assert_eq!(full["account_created_ts"], 1_234_567_890);
  }

  #[test]
  fn as_record_matches_variant() {
    let entity = samples().remove(0);
    assert_eq!(entity.as_record::<Person>().map(|p| p.name.as_str()), Some("Jane Doe"));
    assert!(entity.as_record::<Project>().is_none());
  }
}
