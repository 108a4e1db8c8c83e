//! [`Filter`]: field-equality predicates over records.

use std::collections::BTreeMap;

use catalog_core::{Entity, FieldMap};
use serde_json::Value;

/// A conjunction of `field == value` constraints.
///
/// Values are compared against a record's field map. Strings compare
/// verbatim; numbers and booleans compare by their JSON text. A field that is
/// missing, null, a list, or an object never matches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter(BTreeMap<String, String>);

impl Filter {
  /// The empty filter; matches every record.
  pub fn new() -> Self { Self::default() }

  /// A filter on `id` alone.
  pub fn by_id(id: impl Into<String>) -> Self { Self::new().with("id", id) }

  pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
    self.0.insert(field.into(), value.into());
    self
  }

  pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) {
    self.0.insert(field.into(), value.into());
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  /// `Some(id)` if this filter constrains `id` and nothing else.
  pub fn id_only(&self) -> Option<&str> {
    match self.0.len() {
      1 => self.0.get("id").map(String::as_str),
      _ => None,
    }
  }

  /// Whether every constraint holds in `fields`.
  pub fn matches_fields(&self, fields: &FieldMap) -> bool {
    self.0.iter().all(|(name, expected)| {
      fields
        .get(name)
        .is_some_and(|value| scalar_eq(value, expected))
    })
  }

  /// Whether every constraint holds for `entity`'s stored and derived
  /// fields, at every tier. A record that cannot be materialised never
  /// matches.
  ///
  /// This is the store-side rule used by [`CatalogStore::find`] and
  /// [`CatalogStore::list_where`]. Lookup decorations such as `ref_url`
  /// exist only after projection, so they are matchable through
  /// [`Catalog::lookup`] (which applies [`Filter::matches_fields`] to the
  /// projected view) and never here.
  ///
  /// [`CatalogStore::find`]: crate::CatalogStore::find
  /// [`CatalogStore::list_where`]: crate::CatalogStore::list_where
  /// [`Catalog::lookup`]: crate::Catalog::lookup
  pub fn matches(&self, entity: &Entity) -> bool {
    if self.is_empty() {
      return true;
    }
    entity
      .fields()
      .is_ok_and(|fields| self.matches_fields(&fields))
  }
}

fn scalar_eq(value: &Value, expected: &str) -> bool {
  match value {
    Value::String(s) => s == expected,
    Value::Number(n) => n.to_string() == expected,
    Value::Bool(b) => b.to_string() == expected,
    Value::Null | Value::Array(_) | Value::Object(_) => false,
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filter {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    )
  }
}

#[cfg(test)]
mod tests {
  use catalog_core::entity::Person;
  use serde_json::json;

  use super::*;

  fn fields() -> FieldMap {
    json!({
      "id": "jdoe",
      "name": "Jane Doe",
      "account_created_ts": 42,
      "alternate_emails": ["a@example.org"],
      "chair": null,
    })
    .as_object()
    .cloned()
    .unwrap()
  }

  #[test]
  fn empty_filter_matches_everything() {
    assert!(Filter::new().matches_fields(&fields()));
  }

  #[test]
  fn strings_and_numbers_compare_by_text() {
    assert!(Filter::new().with("name", "Jane Doe").matches_fields(&fields()));
    assert!(Filter::new().with("account_created_ts", "42").matches_fields(&fields()));
    assert!(!Filter::new().with("name", "jane doe").matches_fields(&fields()));
  }

  #[test]
  fn unknown_and_composite_fields_never_match() {
    for field in ["nope", "alternate_emails", "chair"] {
      assert!(!Filter::new().with(field, "").matches_fields(&fields()), "{field}");
    }
  }

  #[test]
  fn all_constraints_must_hold() {
    let filter = Filter::new().with("id", "jdoe").with("name", "Someone Else");
    assert!(!filter.matches_fields(&fields()));
  }

  #[test]
  fn id_only() {
    assert_eq!(Filter::by_id("jdoe").id_only(), Some("jdoe"));
    assert_eq!(Filter::new().with("name", "x").id_only(), None);
    assert_eq!(Filter::by_id("jdoe").with("name", "x").id_only(), None);
  }

  #[test]
  fn matches_entity_fields() {
    let person: Entity = Person::new("jdoe", "Jane Doe", "jdoe@example.org").into();
    assert!(Filter::new().with("primary_email", "jdoe@example.org").matches(&person));
    assert!(!Filter::new().with("ref_url", "anything").matches(&person));
  }
}
