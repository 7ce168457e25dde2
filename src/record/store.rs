//! Record repository: create-or-update with monotonic identity.
//!
//! [`RecordStore`] is the seam callers depend on. [`MemoryRecordStore`] keeps every
//! record plus the identity counter behind one mutex, so each read-modify-write
//! (including id allocation) is serialized. Nothing is persisted across restarts.

use std::sync::{Mutex, MutexGuard};

use crate::error::{Result, SparkError};
use crate::record::search::matches_query;
use crate::record::types::{Record, RecordFields};

/// Repository of relationship records.
///
/// All methods are synchronous and never suspend; async callers hold no lock
/// across an await point.
pub trait RecordStore: Send + Sync {
    /// Update the record `id` in place, or create a new record when `id` is `None`.
    ///
    /// An `id` with no matching record is [`SparkError::RecordNotFound`].
    fn create_or_update(&self, id: Option<u64>, fields: RecordFields) -> Result<Record>;

    /// Serialized read-modify-write on a single record's mutable fields.
    fn update_with(
        &self,
        id: u64,
        mutation: &mut dyn FnMut(&mut RecordFields),
    ) -> Result<Record>;

    /// Append a photo reference to a record.
    fn attach_photo(&self, id: u64, reference: &str) -> Result<Record>;

    fn find(&self, id: u64) -> Result<Option<Record>>;

    /// All records, most recently created first.
    fn list(&self) -> Result<Vec<Record>>;

    /// Case-insensitive substring search, most recently created first.
    /// A blank query matches nothing.
    fn search(&self, query: &str) -> Result<Vec<Record>>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

#[derive(Debug)]
struct StoreInner {
    /// Append order == ascending id.
    records: Vec<Record>,
    next_id: u64,
}

impl StoreInner {
    fn position(&self, id: u64) -> Option<usize> {
        self.records.binary_search_by_key(&id, |r| r.id).ok()
    }
}

/// In-process record store.
#[derive(Debug)]
pub struct MemoryRecordStore {
    inner: Mutex<StoreInner>,
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                records: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreInner>> {
        self.inner.lock().map_err(|_| SparkError::StorePoisoned)
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

impl RecordStore for MemoryRecordStore {
    fn create_or_update(&self, id: Option<u64>, fields: RecordFields) -> Result<Record> {
        let mut inner = self.lock()?;

        if let Some(id) = id {
            let pos = inner.position(id).ok_or(SparkError::RecordNotFound(id))?;
            let record = &mut inner.records[pos];
            record.apply(fields, now());
            tracing::debug!(record_id = id, "record updated in place");
            return Ok(record.clone());
        }

        let id = inner.next_id;
        inner.next_id += 1;
        let record = Record::new(id, fields, now());
        inner.records.push(record.clone());
        tracing::debug!(record_id = id, "record created");
        Ok(record)
    }

    fn update_with(
        &self,
        id: u64,
        mutation: &mut dyn FnMut(&mut RecordFields),
    ) -> Result<Record> {
        let mut inner = self.lock()?;
        let pos = inner.position(id).ok_or(SparkError::RecordNotFound(id))?;
        let record = &mut inner.records[pos];
        let mut fields = record.fields();
        mutation(&mut fields);
        record.apply(fields, now());
        Ok(record.clone())
    }

    fn attach_photo(&self, id: u64, reference: &str) -> Result<Record> {
        let mut inner = self.lock()?;
        let pos = inner.position(id).ok_or(SparkError::RecordNotFound(id))?;
        let record = &mut inner.records[pos];
        record.photos.push(reference.to_string());
        record.updated_at = now();
        Ok(record.clone())
    }

    fn find(&self, id: u64) -> Result<Option<Record>> {
        let inner = self.lock()?;
        Ok(inner.position(id).map(|pos| inner.records[pos].clone()))
    }

    fn list(&self) -> Result<Vec<Record>> {
        let inner = self.lock()?;
        Ok(inner.records.iter().rev().cloned().collect())
    }

    fn search(&self, query: &str) -> Result<Vec<Record>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        let inner = self.lock()?;
        Ok(inner
            .records
            .iter()
            .rev()
            .filter(|r| matches_query(r, &needle))
            .cloned()
            .collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.lock()?.records.len())
    }
}
