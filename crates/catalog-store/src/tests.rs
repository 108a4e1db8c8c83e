//! Behavioural tests for `CatalogStore` and `Catalog`.

use std::{collections::HashSet, sync::Arc};

use catalog_core::{
  Entity, EntityKind, Visibility,
  entity::{MailingList, Person, PersonRef, Project},
};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{Catalog, CatalogStore, Error, Filter, LookupError};

const HOST: &str = "catalog.example.org";

fn person(id: &str, name: &str) -> Person {
  Person::new(id, name, format!("{id}@example.org"))
}

fn generation(name: &str, count: usize) -> Vec<Person> {
  (0..count).map(|i| person(&format!("p{i}"), name)).collect()
}

fn ids(records: impl IntoIterator<Item = Arc<Entity>>) -> Vec<String> {
  records.into_iter().map(|r| r.id().to_owned()).collect()
}

/// jdoe commits to and chairs foo.
fn catalog() -> Catalog {
  let store = Arc::new(CatalogStore::new());

  let mut foo = Project::new("foo", "Apache Foo", "https://foo.apache.org");
  let mut jdoe = Person::new("jdoe", "Jane Doe", "jdoe@apache.org");
  jdoe.account_created_ts = 1_100_000_000;
  jdoe.alternate_emails = vec!["jane@example.org".into()];
  jdoe.add_project(foo.to_ref());
  foo.add_committer(jdoe.to_ref());
  foo.add_pmc_member(jdoe.to_ref());

  store.replace_records([jdoe, person("rroe", "Richard Roe")]);
  store.replace_records([foo]);
  Catalog::new(store, HOST)
}

// ─── Store ───────────────────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn replace_is_atomic_for_concurrent_readers() {
  let store = Arc::new(CatalogStore::new());
  store.replace_records(generation("old", 50));

  let readers: Vec<_> = (0..4)
    .map(|_| {
      let store = Arc::clone(&store);
      tokio::spawn(async move {
        for _ in 0..10_000 {
          let snapshot = store.list(EntityKind::Person);
          let names: HashSet<String> = snapshot
            .iter()
            .map(|r| r.as_record::<Person>().unwrap().name.clone())
            .collect();
          assert_eq!(names.len(), 1, "observed a mix of generations");
          match names.iter().next().unwrap().as_str() {
            "old" => assert_eq!(snapshot.len(), 50),
            "new" => {
              assert_eq!(snapshot.len(), 80);
              break;
            }
            other => panic!("unexpected generation {other}"),
          }
          tokio::task::yield_now().await;
        }
      })
    })
    .collect();

  tokio::task::yield_now().await;
  store.replace_records(generation("new", 80));

  for reader in readers {
    reader.await.unwrap();
  }
  assert_eq!(store.len(EntityKind::Person), 80);
}

#[test]
fn replace_rejects_records_of_another_kind() {
  let store = CatalogStore::new();
  store.replace_records([person("a", "A")]);

  let err = store
    .replace(
      EntityKind::Person,
      [
        Entity::from(person("b", "B")),
        Entity::from(Project::new("foo", "Apache Foo", "https://foo.apache.org")),
      ],
    )
    .unwrap_err();

  assert!(matches!(
    err,
    Error::KindMismatch {
      expected: EntityKind::Person,
      found:    EntityKind::Project,
    }
  ));
  assert_eq!(ids(store.list(EntityKind::Person)), ["a"]);
}

#[test]
fn replace_drops_records_absent_from_the_new_set() {
  let store = CatalogStore::new();
  store.replace_records([person("a", "A"), person("b", "B")]);
  store
    .replace(EntityKind::Person, [Entity::from(person("c", "C"))])
    .unwrap();

  assert!(store.get(EntityKind::Person, "a").is_none());
  assert_eq!(ids(store.list(EntityKind::Person)), ["c"]);
}

#[test]
fn put_inserts_and_overwrites() {
  let store = CatalogStore::new();
  store.put(person("a", "A"));
  store.put(person("b", "B"));
  store.put(person("a", "A2"));

  assert_eq!(ids(store.list(EntityKind::Person)), ["a", "b"]);
  assert_eq!(store.get_record::<Person>("a").unwrap().name, "A2");
  assert!(store.get_record::<Project>("a").is_none());
}

#[test]
fn empty_buckets_are_not_errors() {
  let store = CatalogStore::new();
  assert!(store.list(EntityKind::GitRepository).is_empty());
  assert!(store.get(EntityKind::MailingList, "dev@foo.apache.org").is_none());
}

#[test]
fn find_by_id_and_by_field() {
  let store = CatalogStore::new();
  store.replace_records([person("a", "Ann"), person("b", "Bob"), person("c", "Bob")]);

  let by_id = store.find(EntityKind::Person, &Filter::by_id("b")).unwrap();
  assert_eq!(by_id.id(), "b");

  let by_name = store
    .find(EntityKind::Person, &Filter::new().with("name", "Bob"))
    .unwrap();
  assert_eq!(by_name.id(), "b");

  assert!(store.find(EntityKind::Person, &Filter::new().with("shoe_size", "9")).is_none());
}

#[test]
fn list_where_is_lazy_and_restartable() {
  let store = CatalogStore::new();
  store.replace_records([person("a", "Ann"), person("b", "Bob"), person("c", "Bob")]);

  let mut matches = store.list_where(EntityKind::Person, Filter::new().with("name", "Bob"));
  let first = matches.next().unwrap();
  assert_eq!(first.id(), "b");

  // The iterator keeps its snapshot across a replace.
  store.replace_records([person("z", "Bob")]);
  let copy = matches.clone();
  assert_eq!(ids(matches.by_ref()), ["c"]);
  assert_eq!(ids(copy), ["c"]);

  matches.rewind();
  assert_eq!(ids(matches), ["b", "c"]);
}

#[test]
fn stats_cover_every_kind() {
  let store = CatalogStore::new();
  store.replace_records(generation("x", 3));

  let stats = store.stats();
  assert_eq!(stats.len(), EntityKind::all().count());
  let people = stats.iter().find(|s| s.kind == EntityKind::Person).unwrap();
  assert_eq!(people.records, 3);
  assert!(people.replaced_at.is_some());
  let lists = stats.iter().find(|s| s.kind == EntityKind::MailingList).unwrap();
  assert_eq!(lists.records, 0);
  assert!(lists.replaced_at.is_none());
}

// ─── Lookup ──────────────────────────────────────────────────────────────────

#[test]
fn public_lookup_hides_extended_fields() {
  let envelope = catalog()
    .lookup("person", &Filter::by_id("jdoe"), Visibility::Public)
    .unwrap();

  assert_eq!(envelope.no_results, 1);
  assert_eq!(
    serde_json::to_value(&envelope.results[0]).unwrap(),
    json!({
      "id": "jdoe",
      "name": "Jane Doe",
      "ref_url": "https://catalog.example.org/lookup/person/jdoe",
      "primary_email": "jdoe@apache.org",
      "projects": [{
        "id": "foo",
        "name": "Apache Foo",
        "website": "https://foo.apache.org",
        "ref_url": "https://catalog.example.org/lookup/project/foo",
      }],
    })
  );
}

#[test]
fn full_lookup_shows_extended_fields() {
  let envelope = catalog()
    .lookup("ExtendedPerson", &Filter::by_id("jdoe"), Visibility::Full)
    .unwrap();

  let jdoe = &envelope.results[0];
  assert_eq!(jdoe["account_created_ts"], 1_100_000_000);
  assert_eq!(jdoe["alternate_emails"], json!(["jane@example.org"]));
}

#[test]
fn unknown_type_is_distinct_from_empty_result() {
  let catalog = catalog();

  let err = catalog
    .lookup("widget", &Filter::new(), Visibility::Full)
    .unwrap_err();
  assert!(matches!(err, LookupError::UnknownEntityType(ref name) if name == "widget"));
  assert_eq!(err.status_code(), 400);
  assert_eq!(err.to_string(), "no such object type, widget");

  let empty = catalog
    .lookup("mailinglist", &Filter::new(), Visibility::Full)
    .unwrap();
  assert_eq!(empty.no_results, 0);
  assert!(empty.results.is_empty());
}

#[test]
fn filters_only_see_visible_fields() {
  let catalog = catalog();
  let filter = Filter::new().with("account_created_ts", "1100000000");

  let public = catalog.lookup("person", &filter, Visibility::Public).unwrap();
  assert_eq!(public.no_results, 0);

  let full = catalog.lookup("person", &filter, Visibility::Full).unwrap();
  assert_eq!(full.no_results, 1);
  assert_eq!(full.results[0]["id"], "jdoe");
}

#[test]
fn ref_url_is_matchable_only_after_projection() {
  let catalog = catalog();
  let filter = Filter::new().with("ref_url", format!("https://{HOST}/lookup/person/jdoe"));

  assert!(catalog.store().find(EntityKind::Person, &filter).is_none());
  assert_eq!(catalog.store().list_where(EntityKind::Person, filter.clone()).count(), 0);

  let envelope = catalog.lookup("person", &filter, Visibility::Public).unwrap();
  assert_eq!(envelope.no_results, 1);
  assert_eq!(envelope.results[0]["id"], "jdoe");
}

#[test]
fn lookup_without_filter_lists_everything() {
  let envelope = catalog()
    .lookup("Person", &Filter::new(), Visibility::Public)
    .unwrap();
  let ids: Vec<_> = envelope.results.iter().map(|r| r["id"].clone()).collect();
  assert_eq!(ids, [json!("jdoe"), json!("rroe")]);
}

#[test]
fn project_chair_is_a_decorated_reference() {
  let envelope = catalog()
    .lookup("project", &Filter::by_id("foo"), Visibility::Public)
    .unwrap();
  let foo = &envelope.results[0];

  assert_eq!(
    foo["chair"],
    json!({
      "id": "jdoe",
      "name": "Jane Doe",
      "ref_url": "https://catalog.example.org/lookup/person/jdoe",
    })
  );
  assert_eq!(foo["committers"], json!([foo["chair"].clone()]));
}

#[test]
fn mailing_list_lookup_includes_derived_fields() {
  let catalog = catalog();
  let foo = catalog.store().get_record::<Project>("foo").unwrap();
  catalog
    .store()
    .put(MailingList::new("dev@foo.apache.org", foo.to_ref()));

  let envelope = catalog
    .lookup(
      "mailinglist",
      &Filter::new().with("list_id", "<dev.foo.apache.org>"),
      Visibility::Public,
    )
    .unwrap();
  assert_eq!(envelope.no_results, 1);
  assert_eq!(envelope.results[0]["address"], "dev@foo.apache.org");
}

#[test]
fn envelope_serializes_results_and_count() {
  let envelope = catalog()
    .lookup("person", &Filter::by_id("rroe"), Visibility::Public)
    .unwrap();
  let value = serde_json::to_value(&envelope).unwrap();
  assert_eq!(value["no_results"], 1);
  assert_eq!(value["results"][0]["name"], "Richard Roe");
}

#[test]
fn schema_follows_visibility() {
  let catalog = catalog();

  let public = catalog.lookup_schema("person", Visibility::Public).unwrap();
  assert_eq!(public["title"], "PublicResultSet");
  let items = &public["properties"]["results"]["items"];
  assert_eq!(items["title"], "Person");
  assert!(items["properties"].get("primary_email").is_some());
  assert!(items["properties"].get("account_created_ts").is_none());

  let full = catalog.lookup_schema("person", Visibility::Full).unwrap();
  assert_eq!(full["title"], "ResultSet");
  assert_eq!(full["properties"]["results"]["items"]["title"], "ExtendedPerson");
  assert_eq!(full["properties"]["no_results"], json!({ "type": "integer" }));

  assert!(matches!(
    catalog.lookup_schema("nope", Visibility::Full),
    Err(LookupError::UnknownEntityType(_))
  ));
}

#[test]
fn person_refs_in_projects_resolve_back_to_people() {
  let catalog = catalog();
  let foo = catalog.store().get_record::<Project>("foo").unwrap();
  let chair: &PersonRef = foo.chair().unwrap();
  assert!(catalog.store().get(EntityKind::Person, &chair.id).is_some());
}
