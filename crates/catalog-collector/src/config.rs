//! Collector and source configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::source::{Directory, LdapSearch, SourceError, StaticDirectory};

/// Where the collector searches and how it names what it finds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
  pub people_base:         String,
  pub projects_base:       String,
  /// Prepended to the capitalised project id to form its display name.
  pub project_name_prefix: String,
  /// Project websites are `https://{id}.{website_domain}`.
  pub website_domain:      String,
  /// Fallback address domain for people without a listed email.
  pub email_domain:        String,
}

impl Default for CollectorConfig {
  fn default() -> Self {
    Self {
      people_base:         "ou=people,dc=apache,dc=org".to_owned(),
      projects_base:       "ou=project,ou=groups,dc=apache,dc=org".to_owned(),
      project_name_prefix: "Apache".to_owned(),
      website_domain:      "apache.org".to_owned(),
      email_domain:        "apache.org".to_owned(),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
  #[default]
  LdapSearch,
  Fixture,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
  pub kind:    SourceKind,
  pub uri:     String,
  pub program: String,
  /// JSON fixture served when `kind` is `fixture`.
  pub fixture: Option<PathBuf>,
}

impl Default for SourceConfig {
  fn default() -> Self {
    Self {
      kind:    SourceKind::default(),
      uri:     "ldaps://ldap-us.apache.org".to_owned(),
      program: "ldapsearch".to_owned(),
      fixture: None,
    }
  }
}

impl SourceConfig {
  /// Construct the configured source.
  pub fn build(&self) -> Result<Directory, SourceError> {
    match self.kind {
      SourceKind::LdapSearch => {
        Ok(LdapSearch::new(&self.uri).with_program(&self.program).into())
      }
      SourceKind::Fixture => {
        let path = self.fixture.as_deref().ok_or(SourceError::MissingFixture)?;
        Ok(StaticDirectory::load(path)?.into())
      }
    }
  }
}
