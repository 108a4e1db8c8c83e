//! Cross-linking projects and people.

use std::collections::HashMap;

use catalog_core::entity::{Person, Project};
use catalog_store::CatalogStore;

use crate::error::Error;

/// How a person relates to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Role {
  /// Listed under `member`.
  Committer,
  /// Listed under `owner`. The first one becomes chair.
  PmcMember,
}

/// `uid=jdoe,ou=people,dc=apache,dc=org` → `jdoe`. A bare uid passes
/// through; a DN naming anything but a uid yields `None`.
pub(crate) fn short_uid(reference: &str) -> Option<&str> {
  let first = reference.split(',').next().unwrap_or_default().trim();
  let uid = match first.split_once('=') {
    Some((attr, value)) if attr.trim().eq_ignore_ascii_case("uid") => value.trim(),
    Some(_) => return None,
    None => first,
  };
  (!uid.is_empty()).then_some(uid)
}

/// Adds membership edges in both directions.
///
/// People are resolved against the store and copied out on first touch, so
/// the committed people bucket is never modified in place.
pub(crate) struct Linker<'s> {
  store:   &'s CatalogStore,
  touched: HashMap<String, Person>,
}

impl<'s> Linker<'s> {
  pub(crate) fn new(store: &'s CatalogStore) -> Self {
    Self {
      store,
      touched: HashMap::new(),
    }
  }

  fn person_mut(&mut self, uid: &str) -> Option<&mut Person> {
    if !self.touched.contains_key(uid) {
      let person = self.store.get_record::<Person>(uid)?;
      self.touched.insert(uid.to_owned(), person);
    }
    self.touched.get_mut(uid)
  }

  /// Link the person named by `reference` to `project` in `role`. Linking
  /// the same pair twice changes nothing.
  pub(crate) fn link(
    &mut self,
    project: &mut Project,
    reference: &str,
    role: Role,
  ) -> Result<(), Error> {
    let unresolved = || Error::UnresolvedReference {
      project: project.id.clone(),
      uid:     reference.to_owned(),
    };
    let uid = short_uid(reference).ok_or_else(unresolved)?;
    let person = self.person_mut(uid).ok_or_else(unresolved)?;

    person.add_project(project.to_ref());
    let person = person.to_ref();
    match role {
      Role::Committer => project.add_committer(person),
      Role::PmcMember => project.add_pmc_member(person),
    };
    Ok(())
  }

  /// The people that gained back-references, by id.
  pub(crate) fn finish(self) -> HashMap<String, Person> { self.touched }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn short_uid_forms() {
    assert_eq!(short_uid("uid=jdoe,ou=people,dc=apache,dc=org"), Some("jdoe"));
    assert_eq!(short_uid("UID=jdoe"), Some("jdoe"));
    assert_eq!(short_uid("jdoe"), Some("jdoe"));
    assert_eq!(short_uid("cn=foo,ou=groups"), None);
    assert_eq!(short_uid("uid=,ou=people"), None);
    assert_eq!(short_uid(""), None);
  }

  fn store() -> CatalogStore {
    let store = CatalogStore::new();
    store.replace_records([
      Person::new("a", "A", "a@example.org"),
      Person::new("b", "B", "b@example.org"),
    ]);
    store
  }

  #[test]
  fn linking_twice_adds_nothing() {
    let store = store();
    let mut project = Project::new("foo", "Apache Foo", "https://foo.apache.org");
    let mut linker = Linker::new(&store);

    for _ in 0..2 {
      linker.link(&mut project, "uid=a,ou=people", Role::Committer).unwrap();
      linker.link(&mut project, "a", Role::PmcMember).unwrap();
    }

    let people = linker.finish();
    assert_eq!(people["a"].projects.len(), 1);
    assert_eq!(project.committers().len(), 1);
    assert_eq!(project.pmc_members().len(), 1);
    assert_eq!(project.chair().map(|c| c.id.as_str()), Some("a"));
  }

  #[test]
  fn unresolved_reference_leaves_project_untouched() {
    let store = store();
    let mut project = Project::new("foo", "Apache Foo", "https://foo.apache.org");
    let mut linker = Linker::new(&store);

    let err = linker
      .link(&mut project, "uid=ghost,ou=people", Role::PmcMember)
      .unwrap_err();
    assert!(matches!(err, Error::UnresolvedReference { ref uid, .. } if uid == "uid=ghost,ou=people"));
    assert!(project.chair().is_none());
    assert!(linker.finish().is_empty());
  }

  #[test]
  fn committed_people_are_not_modified() {
    let store = store();
    let mut project = Project::new("foo", "Apache Foo", "https://foo.apache.org");
    let mut linker = Linker::new(&store);
    linker.link(&mut project, "b", Role::Committer).unwrap();

    assert!(store.get_record::<Person>("b").unwrap().projects.is_empty());
    assert_eq!(linker.finish()["b"].projects[0].id, "foo");
  }
}
