//! [`Bucket`]: one immutable generation of an entity kind's records.

use std::{collections::HashMap, sync::Arc};

use catalog_core::{Entity, EntityKind};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// All records of one kind, keyed by id.
///
/// Records keep the order they were first inserted in; the index maps an id
/// to its position. A bucket is never mutated once published: writers build a
/// new one and swap it in.
#[derive(Debug, Default)]
pub(crate) struct Bucket {
  records:     Vec<Arc<Entity>>,
  index:       HashMap<String, usize>,
  replaced_at: Option<DateTime<Utc>>,
}

impl Bucket {
  /// Build a bucket from `records`. A later record with an already-seen id
  /// overwrites the earlier one in place.
  pub(crate) fn from_records(
    records: impl IntoIterator<Item = Entity>,
    replaced_at: DateTime<Utc>,
  ) -> Self {
    let mut bucket = Bucket {
      replaced_at: Some(replaced_at),
      ..Bucket::default()
    };
    for record in records {
      bucket.upsert(Arc::new(record));
    }
    bucket
  }

  /// A copy of this bucket with `record` inserted or overwritten.
  pub(crate) fn with(&self, record: Arc<Entity>) -> Self {
    let mut next = Bucket {
      records:     self.records.clone(),
      index:       self.index.clone(),
      replaced_at: self.replaced_at,
    };
    next.upsert(record);
    next
  }

  fn upsert(&mut self, record: Arc<Entity>) {
    match self.index.get(record.id()) {
      Some(&pos) => self.records[pos] = record,
      None => {
        self.index.insert(record.id().to_owned(), self.records.len());
        self.records.push(record);
      }
    }
  }

  pub(crate) fn get(&self, id: &str) -> Option<&Arc<Entity>> {
    self.index.get(id).map(|&pos| &self.records[pos])
  }

  pub(crate) fn records(&self) -> &[Arc<Entity>] { &self.records }

  pub(crate) fn len(&self) -> usize { self.records.len() }

  pub(crate) fn stats(&self, kind: EntityKind) -> BucketStats {
    BucketStats {
      kind,
      records: self.len(),
      replaced_at: self.replaced_at,
    }
  }
}

/// Size and age of one bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
  pub kind:        EntityKind,
  pub records:     usize,
  /// When the bucket was last fully replaced; `None` if it never was.
  pub replaced_at: Option<DateTime<Utc>>,
}
