//! The visibility-aware query engine.

use std::sync::Arc;

use catalog_core::{EntityKind, FieldMap, Visibility, schema};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::{error::LookupError, filter::Filter, store::CatalogStore};

/// The result of a lookup: `{ "results": [...], "no_results": n }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Envelope {
  pub results:    Vec<FieldMap>,
  pub no_results: usize,
}

impl Envelope {
  fn new(results: Vec<FieldMap>) -> Self {
    Self {
      no_results: results.len(),
      results,
    }
  }
}

/// A store paired with the hostname its `ref_url`s point at.
///
/// Cheap to clone; clones share the store.
#[derive(Debug, Clone)]
pub struct Catalog {
  store:    Arc<CatalogStore>,
  hostname: Arc<str>,
}

impl Catalog {
  pub fn new(store: Arc<CatalogStore>, hostname: impl Into<Arc<str>>) -> Self {
    Self {
      store,
      hostname: hostname.into(),
    }
  }

  pub fn store(&self) -> &Arc<CatalogStore> { &self.store }

  pub fn hostname(&self) -> &str { &self.hostname }

  /// Every record of `entity_type` matching `filter`, as `visibility` may
  /// see it.
  ///
  /// Filters only see fields visible at the caller's tier: a public caller
  /// filtering on an extended field gets nothing back.
  pub fn lookup(
    &self,
    entity_type: &str,
    filter: &Filter,
    visibility: Visibility,
  ) -> Result<Envelope, LookupError> {
    let kind = EntityKind::resolve(entity_type)?;
    let tier = visibility.tier();

    let candidates = match filter.id_only() {
      Some(id) => self.store.get(kind, id).into_iter().collect(),
      None => self.store.list(kind),
    };

    let mut results = Vec::new();
    for record in candidates {
      let view = record
        .project(tier, &self.hostname)
        .map_err(LookupError::Materialize)?;
      if filter.matches_fields(&view) {
        results.push(view);
      }
    }

    debug!(%kind, %visibility, results = results.len(), "lookup");
    Ok(Envelope::new(results))
  }

  /// The JSON schema of the envelope [`Catalog::lookup`] would return.
  pub fn lookup_schema(
    &self,
    entity_type: &str,
    visibility: Visibility,
  ) -> Result<Value, LookupError> {
    let kind = EntityKind::resolve(entity_type)?;
    let title = match visibility {
      Visibility::Full => "ResultSet",
      Visibility::Public => "PublicResultSet",
    };
    Ok(json!({
      "title": title,
      "type": "object",
      "properties": {
        "results": {
          "type": "array",
          "items": schema::record_schema(kind, visibility.tier()),
        },
        "no_results": { "type": "integer" },
      },
      "required": ["results", "no_results"],
    }))
  }
}
