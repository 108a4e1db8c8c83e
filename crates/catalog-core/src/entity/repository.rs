//! Source repository records.

use serde::{Deserialize, Serialize};

use super::{Entity, Record};
use crate::{
  kind::EntityKind,
  schema::{FieldSpec, Shape},
  tier::Tier,
};

pub const GIT_FIELDS: &[FieldSpec] = &[
  FieldSpec::value("id", Tier::Base, Shape::Text),
  FieldSpec::ref_url(),
  FieldSpec::value("sourceURL", Tier::Base, Shape::Text),
  FieldSpec::value("project", Tier::Base, Shape::Text),
  FieldSpec::value("mirrorURL", Tier::Full, Shape::OptionalText),
];

pub const SVN_FIELDS: &[FieldSpec] = &[
  FieldSpec::value("id", Tier::Base, Shape::Text),
  FieldSpec::ref_url(),
  FieldSpec::value("sourceURL", Tier::Base, Shape::Text),
  FieldSpec::value("project", Tier::Base, Shape::Text),
];

/// A git repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitRepository {
  pub id:         String,
  #[serde(rename = "sourceURL")]
  pub source_url: String,
  #[serde(rename = "mirrorURL")]
  pub mirror_url: Option<String>,
  /// Id of the owning project.
  pub project:    String,
}

impl GitRepository {
  pub fn new(
    id: impl Into<String>,
    source_url: impl Into<String>,
    project: impl Into<String>,
  ) -> Self {
    Self {
      id:         id.into(),
      source_url: source_url.into(),
      mirror_url: None,
      project:    project.into(),
    }
  }
}

/// A subversion repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubversionRepository {
  pub id:         String,
  #[serde(rename = "sourceURL")]
  pub source_url: String,
  /// Id of the owning project.
  pub project:    String,
}

impl SubversionRepository {
  pub fn new(
    id: impl Into<String>,
    source_url: impl Into<String>,
    project: impl Into<String>,
  ) -> Self {
    Self {
      id:         id.into(),
      source_url: source_url.into(),
      project:    project.into(),
    }
  }
}

/// Either kind of repository, as listed on a project. Serialized with a
/// `type` tag holding the kind slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Repository {
  GitRepository(GitRepository),
  SubversionRepository(SubversionRepository),
}

impl Repository {
  pub fn kind(&self) -> EntityKind {
    match self {
      Repository::GitRepository(_) => EntityKind::GitRepository,
      Repository::SubversionRepository(_) => EntityKind::SubversionRepository,
    }
  }

  pub fn id(&self) -> &str {
    match self {
      Repository::GitRepository(repo) => &repo.id,
      Repository::SubversionRepository(repo) => &repo.id,
    }
  }
}

impl From<GitRepository> for Repository {
  fn from(repo: GitRepository) -> Self { Repository::GitRepository(repo) }
}

impl From<SubversionRepository> for Repository {
  fn from(repo: SubversionRepository) -> Self {
    Repository::SubversionRepository(repo)
  }
}

impl Record for GitRepository {
  const KIND: EntityKind = EntityKind::GitRepository;

  fn id(&self) -> &str { &self.id }

  fn into_entity(self) -> Entity { Entity::GitRepository(self) }

  fn from_entity(entity: &Entity) -> Option<&Self> {
    match entity {
      Entity::GitRepository(repo) => Some(repo),
      _ => None,
    }
  }
}

impl Record for SubversionRepository {
  const KIND: EntityKind = EntityKind::SubversionRepository;

  fn id(&self) -> &str { &self.id }

  fn into_entity(self) -> Entity { Entity::SubversionRepository(self) }

  fn from_entity(entity: &Entity) -> Option<&Self> {
    match entity {
      Entity::SubversionRepository(repo) => Some(repo),
      _ => None,
    }
  }
}
