//! Field-tier tables and the projections generated from them.
//!
//! Each entity kind declares a static `&[FieldSpec]` naming every field it
//! serializes, the minimum [`Tier`] at which the field is visible, and how
//! nested records inside the field link back into the catalog. The same table
//! drives three things:
//!
//! - [`project`]: dropping fields above the requested tier (fields missing
//!   from the table are never emitted);
//! - `ref_url` decoration, for the record itself and for every linked nested
//!   record;
//! - [`record_schema`]: the JSON schema served in schema mode.

use serde_json::{Map, Value, json};

use crate::{entity::FieldMap, kind::EntityKind, tier::Tier};

/// Name of the derived self-reference field.
pub const REF_URL: &str = "ref_url";

/// Name of the tag carrying the kind of a [`Link::Tagged`] nested record.
pub const TYPE_TAG: &str = "type";

// ─── Table entries ───────────────────────────────────────────────────────────

/// The JSON shape of a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
  Text,
  OptionalText,
  Integer,
  TextList,
  Object,
  OptionalObject,
  ObjectList,
}

impl Shape {
  fn nullable(self) -> bool {
    matches!(self, Shape::OptionalText | Shape::OptionalObject)
  }
}

/// How nested records inside a field link back into the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
  /// A plain value.
  None,
  /// Records of one kind, shown at most at the given tier.
  To(EntityKind, Tier),
  /// Records whose kind is named by their `type` tag, shown at most at the
  /// given tier. Tags outside the listed kinds are dropped.
  Tagged(Tier, &'static [EntityKind]),
}

/// One row of a kind's field-tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
  pub name:  &'static str,
  pub tier:  Tier,
  pub shape: Shape,
  pub link:  Link,
}

impl FieldSpec {
  pub const fn value(name: &'static str, tier: Tier, shape: Shape) -> Self {
    Self { name, tier, shape, link: Link::None }
  }

  pub const fn linked(
    name: &'static str,
    tier: Tier,
    shape: Shape,
    link: Link,
  ) -> Self {
    Self { name, tier, shape, link }
  }

  /// The `ref_url` row every table carries.
  pub const fn ref_url() -> Self {
    Self::value(REF_URL, Tier::Base, Shape::Text)
  }
}

// ─── Projection ──────────────────────────────────────────────────────────────

/// Project `raw` (the full field map of a `kind` record) down to `tier`.
///
/// Fields above `tier` and fields absent from the kind's table are dropped;
/// everything else keeps its value verbatim. `ref_url` is computed from the
/// record's `id` and `host`. Linked nested records are projected recursively
/// against their own kind's table.
pub fn project(kind: EntityKind, mut raw: FieldMap, tier: Tier, host: &str) -> FieldMap {
  let id = raw.get("id").and_then(Value::as_str).map(str::to_owned);
  let mut out = FieldMap::new();

  for spec in kind.fields().iter().filter(|spec| spec.tier <= tier) {
    if spec.name == REF_URL {
      if let Some(id) = &id {
        out.insert(REF_URL.to_owned(), Value::String(kind.ref_url(host, id)));
      }
      continue;
    }
    if let Some(value) = raw.remove(spec.name) {
      out.insert(spec.name.to_owned(), apply_link(spec.link, value, tier, host));
    }
  }

  out
}

fn apply_link(link: Link, value: Value, tier: Tier, host: &str) -> Value {
  match link {
    Link::None => value,
    Link::To(kind, nested) => {
      map_objects(value, |obj| Some(project(kind, obj, nested.min(tier), host)))
    }
    Link::Tagged(nested, kinds) => map_objects(value, |obj| {
      let kind = obj
        .get(TYPE_TAG)
        .and_then(Value::as_str)
        .and_then(|tag| EntityKind::resolve(tag).ok())
        .filter(|kind| kinds.contains(kind))?;
      let mut projected = project(kind, obj, nested.min(tier), host);
      projected.insert(TYPE_TAG.to_owned(), Value::String(kind.slug().to_owned()));
      Some(projected)
    }),
  }
}

/// Apply `f` to a single nested object or to every object of an array.
/// Non-object array items, and objects `f` rejects, are dropped.
fn map_objects(value: Value, mut f: impl FnMut(FieldMap) -> Option<FieldMap>) -> Value {
  match value {
    Value::Object(obj) => f(obj).map(Value::Object).unwrap_or(Value::Null),
    Value::Array(items) => Value::Array(
      items
        .into_iter()
        .filter_map(|item| match item {
          Value::Object(obj) => f(obj).map(Value::Object),
          _ => None,
        })
        .collect(),
    ),
    other => other,
  }
}

// ─── Schema ──────────────────────────────────────────────────────────────────

/// The model name of `kind` viewed at `tier`, e.g. `BasePerson`, `Project`,
/// `ExtendedMailingList`.
pub fn model_name(kind: EntityKind, tier: Tier) -> String {
  let prefix = match tier.min(kind.top_tier()) {
    Tier::Base => "Base",
    Tier::Full => "",
    Tier::Extended => "Extended",
  };
  format!("{prefix}{kind:?}")
}

/// JSON schema of a `kind` record projected to `tier`.
pub fn record_schema(kind: EntityKind, tier: Tier) -> Value {
  let mut properties = Map::new();
  let mut required = Vec::new();

  for spec in kind.fields().iter().filter(|spec| spec.tier <= tier) {
    properties.insert(spec.name.to_owned(), field_schema(spec, tier));
    if !spec.shape.nullable() {
      required.push(Value::String(spec.name.to_owned()));
    }
  }

  json!({
    "title": model_name(kind, tier),
    "type": "object",
    "properties": properties,
    "required": required,
  })
}

fn field_schema(spec: &FieldSpec, tier: Tier) -> Value {
  let nested = || match spec.link {
    Link::None => json!({ "type": "object" }),
    Link::To(kind, nested) => record_schema(kind, nested.min(tier)),
    Link::Tagged(nested, kinds) => {
      let variants: Vec<Value> = kinds
        .iter()
        .map(|kind| {
          let mut schema = record_schema(*kind, nested.min(tier));
          if let Some(props) = schema.get_mut("properties").and_then(Value::as_object_mut) {
            props.insert(TYPE_TAG.to_owned(), json!({ "const": kind.slug() }));
          }
          schema
        })
        .collect();
      json!({ "anyOf": variants })
    }
  };

  match spec.shape {
    Shape::Text => json!({ "type": "string" }),
    Shape::OptionalText => json!({ "type": ["string", "null"] }),
    Shape::Integer => json!({ "type": "integer" }),
    Shape::TextList => json!({ "type": "array", "items": { "type": "string" } }),
    Shape::Object => nested(),
    Shape::OptionalObject => json!({ "anyOf": [nested(), { "type": "null" }] }),
    Shape::ObjectList => json!({ "type": "array", "items": nested() }),
  }
}
