use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::condition::{ConditionCache, Predicate};
use crate::error::Result;
use crate::storage::document;
use crate::types::StoreConfig;

use super::query::{QueryBuilder, RecordSet};
use super::update::apply_patch;

/// A JSON record store backed by a single file.
///
/// All records live in memory. Every mutating operation rewrites the whole
/// file; when that write fails the error is returned but the in-memory
/// change is kept.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    records: Vec<Value>,
    config: StoreConfig,
    cache: Arc<ConditionCache>,
}

/// Builder for opening a [`Store`] with non-default settings.
#[derive(Debug)]
pub struct StoreBuilder {
    path: PathBuf,
    config: StoreConfig,
    cache: Option<Arc<ConditionCache>>,
}

impl StoreBuilder {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self {
            path,
            config: StoreConfig::default(),
            cache: None,
        }
    }

    /// Pretty-print the persisted document (default `true`).
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.config.pretty = pretty;
        self
    }

    /// Create missing parent directories on write (default `false`).
    pub fn create_dirs(mut self, create_dirs: bool) -> Self {
        self.config.create_dirs = create_dirs;
        self
    }

    /// Replace all settings at once.
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse conditions through `cache` instead of the process-wide one.
    pub fn cache(mut self, cache: Arc<ConditionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Load the document and return the store. Never fails: an unreadable
    /// document opens as an empty store.
    pub fn open(self) -> Store {
        let records = document::load_all(&self.path);
        debug!(path = %self.path.display(), records = records.len(), "opened store");
        Store {
            path: self.path,
            records,
            config: self.config,
            cache: self.cache.unwrap_or_else(ConditionCache::shared),
        }
    }
}

impl Store {
    /// Open the store at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self::builder(path).open()
    }

    pub fn builder(path: impl AsRef<Path>) -> StoreBuilder {
        StoreBuilder::new(path.as_ref().to_path_buf())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// All records, in insertion order.
    pub fn get(&self) -> &[Value] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record and persist.
    pub fn insert(&mut self, record: Value) -> Result<()> {
        self.records.push(record);
        self.persist()
    }

    /// Append several records and persist once.
    pub fn insert_many(&mut self, records: impl IntoIterator<Item = Value>) -> Result<()> {
        self.records.extend(records);
        self.persist()
    }

    /// Discard in-memory records and load the document again.
    pub fn reload(&mut self) {
        self.records = document::load_all(&self.path);
        debug!(path = %self.path.display(), records = self.records.len(), "reloaded store");
    }

    /// Remove every record and persist the empty document.
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.persist()
    }

    /// Start an unfiltered query over this store.
    pub fn query(&mut self) -> QueryBuilder<'_, Store> {
        let cache = Arc::clone(&self.cache);
        QueryBuilder::with_cache(self, cache)
    }

    /// Start a query narrowed by `predicate`.
    ///
    /// ```no_run
    /// use ferrijson_core::api::Store;
    /// use serde_json::json;
    ///
    /// let mut store = Store::open("users.json");
    /// let adults = store.filter("age >= 18").filter("name startsWith J").count();
    /// store
    ///     .filter("profile.role = admin")
    ///     .update(&json!({"profile.active": true}))
    ///     .unwrap();
    /// # let _ = adults;
    /// ```
    pub fn filter<'p>(&mut self, predicate: impl Into<Predicate<'p>>) -> QueryBuilder<'_, Store> {
        self.query().filter(predicate)
    }

    /// Start a query narrowed by a closure over the raw record.
    pub fn filter_fn(&mut self, f: impl Fn(&Value) -> bool) -> QueryBuilder<'_, Store> {
        self.query().filter_fn(f)
    }

    /// Patch every record matching `condition` and persist.
    ///
    /// Returns the number of records patched; an unparseable condition
    /// patches nothing and does not touch the file.
    pub fn update_where(&mut self, condition: &str, patch: &Value) -> Result<usize> {
        let Some(condition) = self.cache.parse(condition) else {
            return Ok(0);
        };

        let mut updated = 0;
        for record in &mut self.records {
            if condition.matches(record) {
                apply_patch(record, patch);
                updated += 1;
            }
        }

        debug!(condition = %condition, records = updated, "update_where");
        self.persist()?;
        Ok(updated)
    }

    /// Delete every record matching `condition` and persist.
    ///
    /// Returns the number of records removed; an unparseable condition
    /// removes nothing and does not touch the file.
    pub fn delete_where(&mut self, condition: &str) -> Result<usize> {
        let Some(condition) = self.cache.parse(condition) else {
            return Ok(0);
        };

        let before = self.records.len();
        self.records.retain(|record| !condition.matches(record));
        let removed = before - self.records.len();

        debug!(condition = %condition, records = removed, "delete_where");
        self.persist()?;
        Ok(removed)
    }

    fn persist(&self) -> Result<()> {
        document::persist(&self.path, &self.records, &self.config)?;
        Ok(())
    }
}

impl RecordSet for Store {
    fn records(&self) -> &[Value] {
        &self.records
    }

    fn records_mut(&mut self) -> &mut Vec<Value> {
        &mut self.records
    }

    fn sync(&mut self) -> Result<()> {
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, StorageError};
    use serde_json::json;
    use tempfile::tempdir;

    fn on_disk(store: &Store) -> Vec<Value> {
        let raw = std::fs::read_to_string(store.path()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn seeded(dir: &tempfile::TempDir) -> Store {
        let mut store = Store::open(dir.path().join("db.json"));
        store
            .insert_many(vec![
                json!({"name": "John", "age": 30}),
                json!({"name": "Jane", "age": 15}),
                json!({"name": "Bob", "age": 52, "profile": {"role": "admin"}}),
            ])
            .unwrap();
        store
    }

    // -----------------------------------------------------------------------
    // Open / insert / reload
    // -----------------------------------------------------------------------

    #[test]
    fn test_open_missing_file_is_empty_and_not_created() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db.json"));
        assert!(store.is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_insert_persists() {
        let dir = tempdir().unwrap();
        let mut store = Store::open(dir.path().join("db.json"));
        store.insert(json!({"name": "John"})).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(on_disk(&store), vec![json!({"name": "John"})]);
    }

    #[test]
    fn test_insert_then_reload_roundtrip() {
        let dir = tempdir().unwrap();
        let mut store = seeded(&dir);
        store
            .insert(json!({"nested": {"list": [1, 2.5, "x", null, {"deep": true}]}}))
            .unwrap();
        let before = store.get().to_vec();

        store.reload();
        assert_eq!(store.get(), before.as_slice());
    }

    #[test]
    fn test_reload_picks_up_external_changes() {
        let dir = tempdir().unwrap();
        let mut store = seeded(&dir);
        std::fs::write(store.path(), r#"{"only": "one"}"#).unwrap();

        store.reload();
        assert_eq!(store.get(), &[json!({"only": "one"})]);
    }

    #[test]
    fn test_single_object_file_is_written_back_as_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, r#"{"a": 1}"#).unwrap();

        let mut store = Store::open(&path);
        store.insert(json!({"b": 2})).unwrap();
        assert_eq!(on_disk(&store), vec![json!({"a": 1}), json!({"b": 2})]);
    }

    #[test]
    fn test_clear() {
        let dir = tempdir().unwrap();
        let mut store = seeded(&dir);
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(on_disk(&store).is_empty());
    }

    // -----------------------------------------------------------------------
    // update_where / delete_where
    // -----------------------------------------------------------------------

    #[test]
    fn test_update_where_creates_nested_path() {
        let dir = tempdir().unwrap();
        let mut store = Store::open(dir.path().join("db.json"));
        store.insert(json!({"name": "John"})).unwrap();

        let n = store
            .update_where("name = John", &json!({"profile.active": true}))
            .unwrap();
        assert_eq!(n, 1);
        let expected = vec![json!({"name": "John", "profile": {"active": true}})];
        assert_eq!(store.get(), expected.as_slice());
        assert_eq!(on_disk(&store), expected);
    }

    #[test]
    fn test_update_where_counts_matches() {
        let dir = tempdir().unwrap();
        let mut store = seeded(&dir);
        let n = store
            .update_where("age >= 18", &json!({"adult": true}))
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(store.filter("adult = true").count(), 2);
    }

    #[test]
    fn test_delete_where_preserves_order() {
        let dir = tempdir().unwrap();
        let mut store = Store::open(dir.path().join("db.json"));
        store
            .insert_many(vec![json!({"age": 10}), json!({"age": 20}), json!({"age": 5})])
            .unwrap();

        assert_eq!(store.delete_where("age < 18").unwrap(), 2);
        assert_eq!(store.get(), &[json!({"age": 20})]);
        assert_eq!(on_disk(&store), vec![json!({"age": 20})]);
    }

    #[test]
    fn test_unparseable_condition_affects_nothing() {
        let dir = tempdir().unwrap();
        let mut store = seeded(&dir);
        assert_eq!(store.update_where("", &json!({"x": 1})).unwrap(), 0);
        assert_eq!(store.delete_where("no operator").unwrap(), 0);
        assert_eq!(store.len(), 3);
        assert!(store.get().iter().all(|r| r.get("x").is_none()));
    }

    // -----------------------------------------------------------------------
    // Query builder through the store
    // -----------------------------------------------------------------------

    #[test]
    fn test_query_update_persists() {
        let dir = tempdir().unwrap();
        let mut store = seeded(&dir);
        let n = store
            .filter("profile.role = admin")
            .update(&json!({"profile.level": 3}))
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(
            on_disk(&store)[2],
            json!({"name": "Bob", "age": 52, "profile": {"role": "admin", "level": 3}})
        );
    }

    #[test]
    fn test_query_delete_persists() {
        let dir = tempdir().unwrap();
        let mut store = seeded(&dir);
        let n = store
            .filter("age > 20")
            .filter("name startsWith J")
            .delete()
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(on_disk(&store).len(), 2);
        assert!(store.filter("name = John").first().is_none());
    }

    #[test]
    fn test_filter_fn_through_store() {
        let dir = tempdir().unwrap();
        let mut store = seeded(&dir);
        let q = store.filter_fn(|r| r.get("profile").is_some());
        assert_eq!(q.count(), 1);
        assert_eq!(q.first().unwrap()["name"], "Bob");
    }

    #[test]
    fn test_store_uses_injected_cache() {
        let dir = tempdir().unwrap();
        let cache = Arc::new(ConditionCache::new());
        let mut store = Store::builder(dir.path().join("db.json"))
            .cache(Arc::clone(&cache))
            .open();
        store.insert(json!({"a": 1})).unwrap();
        assert_eq!(store.filter("a = 1").count(), 1);
        assert_eq!(store.delete_where("a = 2").unwrap(), 0);
        assert!(cache.contains("a = 1"));
        assert!(cache.contains("a = 2"));
    }

    // -----------------------------------------------------------------------
    // Config and persistence failures
    // -----------------------------------------------------------------------

    #[test]
    fn test_compact_config() {
        let dir = tempdir().unwrap();
        let mut store = Store::builder(dir.path().join("db.json"))
            .pretty(false)
            .open();
        store.insert(json!({"a": 1})).unwrap();
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            r#"[{"a":1}]"#
        );
    }

    #[test]
    fn test_create_dirs_config() {
        let dir = tempdir().unwrap();
        let mut store = Store::builder(dir.path().join("nested").join("db.json"))
            .create_dirs(true)
            .open();
        store.insert(json!({"a": 1})).unwrap();
        assert_eq!(on_disk(&store), vec![json!({"a": 1})]);
    }

    #[test]
    fn test_failed_persist_keeps_memory_state() {
        let dir = tempdir().unwrap();
        let mut store = Store::open(dir.path().join("missing").join("db.json"));

        let err = store.insert(json!({"a": 1})).unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Io(_))));
        assert_eq!(store.len(), 1);

        let err = store.filter("a = 1").update(&json!({"b": 2})).unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Io(_))));
        assert_eq!(store.get()[0]["b"], 2);
    }
}
