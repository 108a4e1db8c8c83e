//! [`CatalogStore`]: per-kind buckets behind atomic pointer swaps.

use std::sync::Arc;

use arc_swap::ArcSwap;
use catalog_core::{Entity, EntityKind, Record};
use chrono::Utc;
use tracing::debug;

use crate::{
  bucket::{Bucket, BucketStats},
  error::{Error, Result},
  filter::Filter,
};

/// Thread-safe keyed storage for every entity kind.
///
/// Every bucket exists from construction on, so a known kind never fails to
/// resolve; an empty bucket simply yields no records. Readers load the
/// current bucket without locking and keep it alive for as long as they hold
/// it, so a concurrent [`CatalogStore::replace`] never shows them a half
/// built set.
#[derive(Debug)]
pub struct CatalogStore {
  buckets: Vec<ArcSwap<Bucket>>,
}

impl Default for CatalogStore {
  fn default() -> Self { Self::new() }
}

impl CatalogStore {
  pub fn new() -> Self {
    Self {
      buckets: EntityKind::all()
        .map(|_| ArcSwap::from_pointee(Bucket::default()))
        .collect(),
    }
  }

  fn slot(&self, kind: EntityKind) -> &ArcSwap<Bucket> {
    &self.buckets[kind.index()]
  }

  fn snapshot(&self, kind: EntityKind) -> Arc<Bucket> { self.slot(kind).load_full() }

  // ─── Writes ────────────────────────────────────────────────────────────────

  /// Install `records` as the entire contents of `kind`'s bucket.
  ///
  /// If any record belongs to another kind nothing is installed.
  pub fn replace(
    &self,
    kind: EntityKind,
    records: impl IntoIterator<Item = Entity>,
  ) -> Result<()> {
    let records: Vec<Entity> = records.into_iter().collect();
    if let Some(stray) = records.iter().find(|record| record.kind() != kind) {
      return Err(Error::KindMismatch {
        expected: kind,
        found:    stray.kind(),
      });
    }
    self.install(kind, Bucket::from_records(records, Utc::now()));
    Ok(())
  }

  /// Typed form of [`CatalogStore::replace`].
  pub fn replace_records<R: Record>(&self, records: impl IntoIterator<Item = R>) {
    let bucket =
      Bucket::from_records(records.into_iter().map(Record::into_entity), Utc::now());
    self.install(R::KIND, bucket);
  }

  fn install(&self, kind: EntityKind, bucket: Bucket) {
    let records = bucket.len();
    self.slot(kind).store(Arc::new(bucket));
    debug!(%kind, records, "bucket replaced");
  }

  /// Insert or overwrite one record in its own kind's bucket.
  pub fn put(&self, record: impl Into<Entity>) {
    let record = Arc::new(record.into());
    let kind = record.kind();
    self
      .slot(kind)
      .rcu(|current| current.with(Arc::clone(&record)));
  }

  // ─── Reads ─────────────────────────────────────────────────────────────────

  pub fn get(&self, kind: EntityKind, id: &str) -> Option<Arc<Entity>> {
    self.slot(kind).load().get(id).cloned()
  }

  /// A copy of the `R` record with `id`.
  pub fn get_record<R: Record>(&self, id: &str) -> Option<R> {
    self
      .get(R::KIND, id)
      .and_then(|entity| R::from_entity(&entity).cloned())
  }

  /// The first record of `kind` satisfying `filter`, matched by
  /// [`Filter::matches`] against unprojected fields.
  pub fn find(&self, kind: EntityKind, filter: &Filter) -> Option<Arc<Entity>> {
    if let Some(id) = filter.id_only() {
      return self.get(kind, id);
    }
    self
      .slot(kind)
      .load()
      .records()
      .iter()
      .find(|record| filter.matches(record))
      .cloned()
  }

  /// Every current record of `kind`, in insertion order.
  pub fn list(&self, kind: EntityKind) -> Vec<Arc<Entity>> {
    self.slot(kind).load().records().to_vec()
  }

  /// Lazily iterate the records of `kind` satisfying `filter`.
  ///
  /// The iterator pins the bucket current at the time of the call; later
  /// writes are not seen by it.
  pub fn list_where(&self, kind: EntityKind, filter: Filter) -> Matches {
    Matches {
      bucket: self.snapshot(kind),
      filter,
      pos: 0,
    }
  }

  pub fn len(&self, kind: EntityKind) -> usize { self.slot(kind).load().len() }

  pub fn stats(&self) -> Vec<BucketStats> {
    EntityKind::all()
      .map(|kind| self.slot(kind).load().stats(kind))
      .collect()
  }
}

// ─── Matches ─────────────────────────────────────────────────────────────────

/// Iterator returned by [`CatalogStore::list_where`].
///
/// Cloning yields an independent cursor over the same snapshot.
#[derive(Debug, Clone)]
pub struct Matches {
  bucket: Arc<Bucket>,
  filter: Filter,
  pos:    usize,
}

impl Matches {
  /// Start again from the first record of the pinned snapshot.
  pub fn rewind(&mut self) { self.pos = 0; }
}

impl Iterator for Matches {
  type Item = Arc<Entity>;

  fn next(&mut self) -> Option<Self::Item> {
    let records = self.bucket.records();
    while let Some(record) = records.get(self.pos) {
      self.pos += 1;
      if self.filter.matches(record) {
        return Some(Arc::clone(record));
      }
    }
    None
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (0, Some(self.bucket.len().saturating_sub(self.pos)))
  }
}
