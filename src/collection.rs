//! Collection CRUD over a record store
//!
//! The library and the journal are two instances of [`Collection`], each
//! backed by its own store. Every mutation is a full read-modify-write of the
//! backing store, serialized by a per-collection lock so concurrent requests
//! cannot lose each other's updates.

use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::store::{IdGenerator, Record, RecordStore, StoreError};

/// Errors returned by collection operations
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("no record with id {0}")]
    NotFound(String),
    #[error("request body must be a JSON object, got {0}")]
    NotAnObject(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A named set of records persisted through a [`RecordStore`]
pub struct Collection {
    name: String,
    store: Box<dyn RecordStore>,
    ids: Arc<dyn IdGenerator>,
    lock: Mutex<()>,
}

impl Collection {
    pub fn new(
        name: impl Into<String>,
        store: impl RecordStore + 'static,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            name: name.into(),
            store: Box::new(store),
            ids,
            lock: Mutex::new(()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<Record> {
        let _guard = self.lock.lock();
        self.store.read()
    }

    /// Append `body` as a new record, assigning an id when it has no usable one
    pub fn create(&self, body: Value) -> Result<Record, CollectionError> {
        let mut record = into_object(body)?;
        let id = match record.get("id").and_then(numeric_id) {
            Some(id) if id != 0 => id,
            _ => {
                let id = self.ids.next_id();
                record.insert("id".to_string(), Value::from(id));
                id
            }
        };

        let _guard = self.lock.lock();
        let mut records = self.store.read();
        records.push(record.clone());
        self.store.write(&records)?;

        info!("{}: created record {} ({} total)", self.name, id, records.len());
        Ok(record)
    }

    /// Shallow-merge `patch` over the first record whose id matches
    pub fn update(&self, id: &str, patch: Value) -> Result<Record, CollectionError> {
        let patch = into_object(patch)?;
        let target = parse_id(id).ok_or_else(|| CollectionError::NotFound(id.to_string()))?;

        let _guard = self.lock.lock();
        let mut records = self.store.read();
        let existing = records
            .iter_mut()
            .find(|r| record_id(r) == Some(target))
            .ok_or_else(|| CollectionError::NotFound(id.to_string()))?;

        for (key, value) in patch {
            existing.insert(key, value);
        }
        let merged = existing.clone();
        self.store.write(&records)?;

        debug!("{}: updated record {}", self.name, target);
        Ok(merged)
    }

    /// Remove every record whose id matches; returns how many were removed.
    ///
    /// The collection is rewritten even when nothing matched.
    pub fn delete(&self, id: &str) -> Result<usize, CollectionError> {
        let target = parse_id(id);

        let _guard = self.lock.lock();
        let mut records = self.store.read();
        let before = records.len();
        if let Some(target) = target {
            records.retain(|r| record_id(r) != Some(target));
        }
        let removed = before - records.len();
        self.store.write(&records)?;

        debug!("{}: delete {} removed {} record(s)", self.name, id, removed);
        Ok(removed)
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.name)
            .field("store", &self.store.location())
            .finish()
    }
}

fn into_object(body: Value) -> Result<Record, CollectionError> {
    match body {
        Value::Object(map) => Ok(map),
        Value::Null => Err(CollectionError::NotAnObject("null")),
        Value::Bool(_) => Err(CollectionError::NotAnObject("a boolean")),
        Value::Number(_) => Err(CollectionError::NotAnObject("a number")),
        Value::String(_) => Err(CollectionError::NotAnObject("a string")),
        Value::Array(_) => Err(CollectionError::NotAnObject("an array")),
    }
}

/// The record's `id` as an integer, if it has one
pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(numeric_id)
}

/// Integers, and floats with no fractional part, count as ids
fn numeric_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(integral_f64)),
        _ => None,
    }
}

/// Parse a path segment as a record id
pub fn parse_id(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().and_then(integral_f64))
}

fn integral_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore, SequentialIdGenerator, TimestampIdGenerator};
    use serde_json::json;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn collection_with(records: Vec<Record>) -> Collection {
        Collection::new(
            "library",
            MemoryStore::with_records(records),
            Arc::new(SequentialIdGenerator::starting_at(1000)),
        )
    }

    #[test]
    fn create_assigns_id_when_missing() {
        let coll = collection_with(vec![]);
        let created = coll.create(json!({"title": "Dune"})).unwrap();
        assert_eq!(created, record(json!({"title": "Dune", "id": 1000})));
        assert_eq!(coll.list(), vec![created]);
    }

    #[test]
    fn create_keeps_numeric_id() {
        let coll = collection_with(vec![]);
        let created = coll.create(json!({"id": 7, "title": "Emma"})).unwrap();
        assert_eq!(record_id(&created), Some(7));
    }

    #[test]
    fn create_replaces_non_numeric_or_zero_id() {
        let coll = collection_with(vec![]);
        let a = coll.create(json!({"id": "abc"})).unwrap();
        let b = coll.create(json!({"id": null})).unwrap();
        let c = coll.create(json!({"id": 0})).unwrap();
        assert_eq!(record_id(&a), Some(1000));
        assert_eq!(record_id(&b), Some(1001));
        assert_eq!(record_id(&c), Some(1002));
    }

    #[test]
    fn create_rejects_non_object_body() {
        let coll = collection_with(vec![]);
        let err = coll.create(json!([1, 2])).unwrap_err();
        assert!(matches!(err, CollectionError::NotAnObject("an array")));
        assert!(coll.list().is_empty());
    }

    #[test]
    fn creates_without_id_get_distinct_ids() {
        let coll = Collection::new(
            "journal",
            MemoryStore::new(),
            Arc::new(TimestampIdGenerator::new()),
        );
        for i in 0..50 {
            coll.create(json!({"n": i})).unwrap();
        }
        let ids: HashSet<i64> = coll.list().iter().filter_map(record_id).collect();
        assert_eq!(ids.len(), 50);
    }

    #[test]
    fn update_merges_fields() {
        let coll = collection_with(vec![record(json!({"id": 1, "a": 1, "b": 2}))]);
        let merged = coll.update("1", json!({"b": 3, "c": 4})).unwrap();
        assert_eq!(merged, record(json!({"id": 1, "a": 1, "b": 3, "c": 4})));
        assert_eq!(coll.list(), vec![merged]);
    }

    #[test]
    fn update_touches_only_first_match() {
        let coll = collection_with(vec![
            record(json!({"id": 5, "v": "first"})),
            record(json!({"id": 5, "v": "second"})),
        ]);
        coll.update("5", json!({"v": "patched"})).unwrap();
        let list = coll.list();
        assert_eq!(list[0]["v"], "patched");
        assert_eq!(list[1]["v"], "second");
    }

    #[test]
    fn update_missing_id_is_not_found_and_writes_nothing() {
        let store = Arc::new(MemoryStore::with_records(vec![record(json!({"id": 1}))]));
        let coll = Collection::new(
            "library",
            store.clone(),
            Arc::new(SequentialIdGenerator::starting_at(1)),
        );

        assert!(matches!(
            coll.update("2", json!({"x": 1})),
            Err(CollectionError::NotFound(_))
        ));
        assert!(matches!(
            coll.update("abc", json!({"x": 1})),
            Err(CollectionError::NotFound(_))
        ));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.read(), vec![record(json!({"id": 1}))]);
    }

    #[test]
    fn delete_removes_all_matches() {
        let coll = collection_with(vec![
            record(json!({"id": 1})),
            record(json!({"id": 2})),
            record(json!({"id": 1, "dup": true})),
        ]);
        assert_eq!(coll.delete("1").unwrap(), 2);
        assert_eq!(coll.list(), vec![record(json!({"id": 2}))]);
    }

    #[test]
    fn delete_missing_id_still_persists() {
        let store = Arc::new(MemoryStore::with_records(vec![record(json!({"id": 1}))]));
        let coll = Collection::new(
            "journal",
            store.clone(),
            Arc::new(SequentialIdGenerator::starting_at(1)),
        );

        assert_eq!(coll.delete("99").unwrap(), 0);
        assert_eq!(coll.delete("not-a-number").unwrap(), 0);
        assert_eq!(store.write_count(), 2);
        assert_eq!(store.read(), vec![record(json!({"id": 1}))]);
    }

    #[test]
    fn write_failure_propagates() {
        let store = Arc::new(MemoryStore::new());
        store.set_fail_writes(true);
        let coll = Collection::new(
            "library",
            store,
            Arc::new(SequentialIdGenerator::starting_at(1)),
        );
        assert!(matches!(
            coll.create(json!({"title": "x"})),
            Err(CollectionError::Store(_))
        ));
    }

    #[test]
    fn ids_compare_numerically() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id(" 42 "), Some(42));
        assert_eq!(parse_id("42.0"), Some(42));
        assert_eq!(parse_id("42.5"), None);
        assert_eq!(parse_id("abc"), None);

        let coll = collection_with(vec![record(json!({"id": 3.0, "t": "float id"}))]);
        let merged = coll.update("3", json!({"t": "patched"})).unwrap();
        assert_eq!(merged["t"], "patched");
    }

    #[test]
    fn corrupt_file_lists_empty_then_recovers_on_create() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("journal.json");
        std::fs::write(&path, "{ not json").unwrap();

        let coll = Collection::new(
            "journal",
            JsonFileStore::new(&path),
            Arc::new(SequentialIdGenerator::starting_at(1)),
        );
        assert!(coll.list().is_empty());

        coll.create(json!({"entry": "hello"})).unwrap();
        let on_disk: Vec<Record> =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, vec![record(json!({"entry": "hello", "id": 1}))]);
    }

    #[test]
    fn concurrent_creates_do_not_lose_updates() {
        let dir = TempDir::new().unwrap();
        let coll = Arc::new(Collection::new(
            "library",
            JsonFileStore::new(dir.path().join("library.json")),
            Arc::new(TimestampIdGenerator::new()),
        ));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let coll = coll.clone();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        coll.create(json!({"thread": t, "i": i})).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(coll.list().len(), 80);
    }
}
