//! [`Collector`]: one full refresh of the catalog from the directory.

use std::{collections::HashMap, sync::Arc, time::Duration};

use catalog_core::{
  Entity, EntityKind,
  entity::{Person, Project},
  source::{Attributes, DirectorySource, SearchScope},
};
use catalog_store::CatalogStore;
use chrono::{DateTime, NaiveDateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::{
  config::CollectorConfig,
  error::{Error, Result},
  link::{Linker, Role},
};

/// What one pass committed, and what it had to skip.
#[derive(Debug)]
pub struct PassReport {
  pub people:   usize,
  pub projects: usize,
  /// Recovered problems: malformed records and unresolved references.
  pub issues:   Vec<Error>,
  pub elapsed:  Duration,
}

impl PassReport {
  pub fn skipped_records(&self) -> usize {
    self
      .issues
      .iter()
      .filter(|e| matches!(e, Error::MalformedSourceRecord { .. }))
      .count()
  }

  pub fn unresolved_references(&self) -> usize {
    self
      .issues
      .iter()
      .filter(|e| matches!(e, Error::UnresolvedReference { .. }))
      .count()
  }
}

/// Scrapes a [`DirectorySource`] into a [`CatalogStore`].
#[derive(Debug)]
pub struct Collector<S> {
  source: S,
  store:  Arc<CatalogStore>,
  config: CollectorConfig,
}

impl<S: DirectorySource> Collector<S> {
  pub fn new(source: S, store: Arc<CatalogStore>, config: CollectorConfig) -> Self {
    Self {
      source,
      store,
      config,
    }
  }

  pub fn store(&self) -> &Arc<CatalogStore> { &self.store }

  pub fn source(&self) -> &S { &self.source }

  pub fn config(&self) -> &CollectorConfig { &self.config }

  /// Rebuild the person and project buckets.
  ///
  /// Both searches use subtree scope and finish before anything is
  /// committed, so a source failure leaves the store exactly as it was. The
  /// projects container entry itself has no `cn` and is skipped as
  /// malformed. People are committed first, since projects resolve their
  /// members against the people bucket; the people are then committed again
  /// carrying their project back-references.
  ///
  /// When several people records share a uid the last one wins, at the
  /// position of the first.
  pub async fn run_pass(&self) -> Result<PassReport> {
    let started = Instant::now();
    let now = Utc::now();

    let people_raw = self.search(&self.config.people_base, SearchScope::Sub).await?;
    let projects_raw = self
      .search(&self.config.projects_base, SearchScope::Sub)
      .await?;

    let mut issues = Vec::new();

    let mut people: Vec<Person> = Vec::with_capacity(people_raw.len());
    let mut positions = HashMap::new();
    for attrs in &people_raw {
      match self.person(attrs, now) {
        Ok(person) => match positions.get(&person.id) {
          Some(&pos) => {
            let err = self.malformed(
              &self.config.people_base,
              format!("duplicate uid {}", person.id),
            );
            warn!(error = %err, "replacing earlier person record");
            issues.push(err);
            people[pos] = person;
          }
          None => {
            positions.insert(person.id.clone(), people.len());
            people.push(person);
          }
        },
        Err(err) => {
          warn!(error = %err, "skipping person record");
          issues.push(err);
        }
      }
    }
    self.commit(EntityKind::Person, &people)?;

    let projects = self.projects(projects_raw, &mut issues);
    let linked = {
      let mut linker = Linker::new(&self.store);
      let mut built = Vec::with_capacity(projects.len());
      for (mut project, members, owners) in projects {
        for (references, role) in [(members, Role::Committer), (owners, Role::PmcMember)] {
          for reference in &references {
            if let Err(err) = linker.link(&mut project, reference, role) {
              debug!(error = %err, "skipping membership");
              issues.push(err);
            }
          }
        }
        built.push(project);
      }
      (built, linker.finish())
    };
    let (projects, mut touched) = linked;
    self.commit(EntityKind::Project, &projects)?;

    for person in &mut people {
      if let Some(linked) = touched.remove(&person.id) {
        *person = linked;
      }
    }
    self.commit(EntityKind::Person, &people)?;

    let report = PassReport {
      people: people.len(),
      projects: projects.len(),
      issues,
      elapsed: started.elapsed(),
    };
    info!(
      people = report.people,
      projects = report.projects,
      skipped = report.skipped_records(),
      unresolved = report.unresolved_references(),
      elapsed_ms = report.elapsed.as_millis() as u64,
      "collector pass complete"
    );
    Ok(report)
  }

  async fn search(&self, base: &str, scope: SearchScope) -> Result<Vec<Attributes>> {
    self
      .source
      .search(base, scope)
      .await
      .map_err(|err| Error::SourceUnavailable(Box::new(err)))
  }

  fn commit<R>(&self, kind: EntityKind, records: &[R]) -> Result<()>
  where
    R: Clone + Into<Entity>,
  {
    self
      .store
      .replace(kind, records.iter().cloned().map(Into::into))?;
    info!(%kind, records = records.len(), "bucket committed");
    Ok(())
  }

  fn malformed(&self, base: &str, reason: impl Into<String>) -> Error {
    Error::MalformedSourceRecord {
      base:   base.to_owned(),
      reason: reason.into(),
    }
  }

  // ─── People ────────────────────────────────────────────────────────────────

  fn person(&self, attrs: &Attributes, now: DateTime<Utc>) -> Result<Person> {
    let uid = attrs
      .first("uid")
      .ok_or_else(|| self.malformed(&self.config.people_base, "missing uid"))?;

    let name = attrs.first("cn").unwrap_or(uid);
    let email = attrs
      .first_of(&["asf-committer-email", "mail", "email"])
      .map(str::to_owned)
      .unwrap_or_else(|| format!("{uid}@{}", self.config.email_domain));

    let mut person = Person::new(uid, name, email);
    person.alternate_emails = attrs.all("asf-altEmail").to_vec();
    person.account_created_ts = attrs
      .first("createTimestamp")
      .and_then(parse_generalized_time)
      .unwrap_or_else(|| now.timestamp());
    Ok(person)
  }

  // ─── Projects ──────────────────────────────────────────────────────────────

  /// Unlinked projects in `cn` order, each with its member and owner
  /// references in source order.
  fn projects(
    &self,
    mut raw: Vec<Attributes>,
    issues: &mut Vec<Error>,
  ) -> Vec<(Project, Vec<String>, Vec<String>)> {
    raw.sort_by(|a, b| cn_or_placeholder(a).cmp(cn_or_placeholder(b)));

    let mut projects = Vec::with_capacity(raw.len());
    for attrs in raw {
      let Some(cn) = attrs.first("cn") else {
        let err = self.malformed(&self.config.projects_base, "missing cn");
        warn!(error = %err, "skipping project record");
        issues.push(err);
        continue;
      };
      let project = Project::new(
        cn,
        format!("{} {}", self.config.project_name_prefix, capitalize(cn)),
        format!("https://{cn}.{}", self.config.website_domain),
      );
      projects.push((
        project,
        attrs.all("member").to_vec(),
        attrs.all("owner").to_vec(),
      ));
    }
    projects
  }
}

fn cn_or_placeholder(attrs: &Attributes) -> &str { attrs.first("cn").unwrap_or("??") }

/// Upper-case the first character and lower-case the rest.
fn capitalize(word: &str) -> String {
  let mut chars = word.chars();
  match chars.next() {
    Some(first) => first
      .to_uppercase()
      .chain(chars.flat_map(char::to_lowercase))
      .collect(),
    None => String::new(),
  }
}

/// LDAP generalized time (`20040604190413Z`, optionally with fractional
/// seconds) as Unix seconds. Offsets other than `Z` are not accepted.
fn parse_generalized_time(value: &str) -> Option<i64> {
  let value = value.trim();
  let value = value.strip_suffix('Z').unwrap_or(value);
  let whole = value.split(['.', ',']).next()?;
  NaiveDateTime::parse_from_str(whole, "%Y%m%d%H%M%S")
    .ok()
    .map(|t| t.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn capitalize_words() {
    assert_eq!(capitalize("foo"), "Foo");
    assert_eq!(capitalize("openOffice"), "Openoffice");
    assert_eq!(capitalize(""), "");
  }

  #[test]
  fn generalized_time() {
    assert_eq!(parse_generalized_time("20040604190413Z"), Some(1_086_375_853));
    assert_eq!(parse_generalized_time("20040604190413.5Z"), Some(1_086_375_853));
    assert_eq!(parse_generalized_time("yesterday"), None);
  }
}
