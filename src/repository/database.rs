use crate::error::{MarketError, Result};
use crate::lifecycle::{LifecycleError, OnModuleDestroy, OnModuleInit};
use async_trait::async_trait;
use dashmap::{DashMap, mapref::entry::Entry};
use serde::{Serialize, de::DeserializeOwned};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

pub const USERS: &str = "users";
pub const ITEMS: &str = "items";
pub const WISHES: &str = "wishes";

/// Outcome of [`Database::insert_unique`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inserted<T> {
    Created(T),
    /// The key was taken; carries the id of the row holding it
    Existing(i64),
}

/// In-memory table store
///
/// Rows are JSON documents keyed by a generated `i64` id, one ordered map per
/// table. Ids come from a per-table sequence starting at 1 and are never
/// reused. Unique keys (per table) are claimed atomically together with the
/// row insert. Clones share the same storage.
///
/// Once closed by [`OnModuleDestroy`], every read and write fails with
/// [`MarketError::Storage`].
#[derive(Clone, Default)]
pub struct Database {
    tables: Arc<DashMap<&'static str, BTreeMap<i64, String>>>,
    sequences: Arc<DashMap<&'static str, AtomicI64>>,
    unique_keys: Arc<DashMap<(&'static str, String), i64>>,
    closed: Arc<AtomicBool>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(MarketError::Storage("database is closed".to_string()));
        }
        Ok(())
    }

    pub fn next_id(&self, table: &'static str) -> i64 {
        self.sequences
            .entry(table)
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(1, Ordering::SeqCst)
            + 1
    }

    /// Insert a new row under a fresh id
    pub fn insert<T: Serialize>(&self, table: &'static str, build: impl FnOnce(i64) -> T) -> Result<T> {
        self.ensure_open()?;
        let id = self.next_id(table);
        let row = build(id);
        let data = serde_json::to_string(&row)?;
        self.tables.entry(table).or_default().insert(id, data);
        Ok(row)
    }

    /// Insert a row only if `key` is not yet claimed in `table`
    ///
    /// The key stays locked until the row is stored, so a caller that finds
    /// the key taken can always read the existing row.
    pub fn insert_unique<T: Serialize>(
        &self,
        table: &'static str,
        key: &str,
        build: impl FnOnce(i64) -> T,
    ) -> Result<Inserted<T>> {
        self.ensure_open()?;
        match self.unique_keys.entry((table, key.to_string())) {
            Entry::Occupied(taken) => Ok(Inserted::Existing(*taken.get())),
            Entry::Vacant(slot) => {
                let id = self.next_id(table);
                let row = build(id);
                let data = serde_json::to_string(&row)?;
                self.tables.entry(table).or_default().insert(id, data);
                slot.insert(id);
                Ok(Inserted::Created(row))
            }
        }
    }

    /// Id of the row holding `key`, if any
    pub fn unique_id(&self, table: &'static str, key: &str) -> Result<Option<i64>> {
        self.ensure_open()?;
        Ok(self.unique_keys.get(&(table, key.to_string())).map(|id| *id))
    }

    /// Release a unique key and delete the row that held it
    pub fn remove_unique(&self, table: &'static str, key: &str) -> Result<bool> {
        self.ensure_open()?;
        match self.unique_keys.remove(&(table, key.to_string())) {
            Some((_, id)) => self.remove(table, id),
            None => Ok(false),
        }
    }

    pub fn get<T: DeserializeOwned>(&self, table: &'static str, id: i64) -> Result<Option<T>> {
        self.ensure_open()?;
        let Some(rows) = self.tables.get(table) else {
            return Ok(None);
        };
        rows.get(&id)
            .map(|data| serde_json::from_str(data))
            .transpose()
            .map_err(Into::into)
    }

    /// Overwrite an existing row; a missing row stays missing
    pub fn replace<T: Serialize>(&self, table: &'static str, id: i64, row: &T) -> Result<bool> {
        self.ensure_open()?;
        let data = serde_json::to_string(row)?;
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(false);
        };
        match rows.get_mut(&id) {
            Some(slot) => {
                *slot = data;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Change a row in place while holding the table lock
    ///
    /// Returns the updated row, or `None` when `id` does not exist.
    pub fn update<T, F>(&self, table: &'static str, id: i64, change: F) -> Result<Option<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        self.ensure_open()?;
        let Some(mut rows) = self.tables.get_mut(table) else {
            return Ok(None);
        };
        let Some(data) = rows.get_mut(&id) else {
            return Ok(None);
        };
        let mut row: T = serde_json::from_str(data)?;
        change(&mut row);
        *data = serde_json::to_string(&row)?;
        Ok(Some(row))
    }

    pub fn remove(&self, table: &'static str, id: i64) -> Result<bool> {
        self.ensure_open()?;
        Ok(self
            .tables
            .get_mut(table)
            .is_some_and(|mut rows| rows.remove(&id).is_some()))
    }

    /// All rows of a table in ascending id order
    pub fn scan<T: DeserializeOwned>(&self, table: &'static str) -> Result<Vec<T>> {
        self.ensure_open()?;
        let Some(rows) = self.tables.get(table) else {
            return Ok(Vec::new());
        };
        rows.values()
            .map(|data| serde_json::from_str(data).map_err(Into::into))
            .collect()
    }
}

impl crate::di::Injectable for Database {
    fn inject(_container: &crate::di::Container) -> Result<Self> {
        Ok(Self::new())
    }
}

#[async_trait]
impl OnModuleInit for Database {
    async fn on_module_init(&mut self) -> std::result::Result<(), LifecycleError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(LifecycleError::init_failed("database was already closed"));
        }
        for table in [USERS, ITEMS, WISHES] {
            self.tables.entry(table).or_default();
        }
        tracing::info!("Database: in-memory tables ready");
        Ok(())
    }
}

#[async_trait]
impl OnModuleDestroy for Database {
    async fn on_module_destroy(&mut self) -> std::result::Result<(), LifecycleError> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(LifecycleError::shutdown_failed("database closed twice"));
        }
        let rows: usize = self.tables.iter().map(|table| table.len()).sum();
        tracing::info!(rows, "Database: closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: i64,
        name: String,
    }

    fn row(id: i64, name: &str) -> Row {
        Row { id, name: name.to_string() }
    }

    #[test]
    fn sequences_are_per_table_and_start_at_one() {
        let db = Database::new();
        assert_eq!(db.next_id(ITEMS), 1);
        assert_eq!(db.next_id(ITEMS), 2);
        assert_eq!(db.next_id(USERS), 1);
    }

    #[test]
    fn rows_round_trip_and_scan_in_id_order() {
        let db = Database::new();
        for name in ["a", "b", "c"] {
            db.insert(ITEMS, |id| row(id, name)).unwrap();
        }
        let found: Option<Row> = db.get(ITEMS, 2).unwrap();
        assert_eq!(found.unwrap().name, "b");

        let ids: Vec<i64> = db.scan::<Row>(ITEMS).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert!(db.remove(ITEMS, 2).unwrap());
        assert!(!db.remove(ITEMS, 2).unwrap());
        assert!(db.get::<Row>(ITEMS, 2).unwrap().is_none());
        assert!(db.scan::<Row>(WISHES).unwrap().is_empty());
    }

    #[test]
    fn replace_and_update_never_resurrect_rows() {
        let db = Database::new();
        let stored = db.insert(ITEMS, |id| row(id, "a")).unwrap();
        assert!(db.replace(ITEMS, stored.id, &row(stored.id, "b")).unwrap());
        db.remove(ITEMS, stored.id).unwrap();

        assert!(!db.replace(ITEMS, stored.id, &row(stored.id, "c")).unwrap());
        let updated = db
            .update(ITEMS, stored.id, |r: &mut Row| r.name.push('!'))
            .unwrap();
        assert!(updated.is_none());
        assert!(db.get::<Row>(ITEMS, stored.id).unwrap().is_none());
    }

    #[test]
    fn unique_keys_are_claimed_once() {
        let db = Database::new();
        let first = db.insert_unique(USERS, "bori", |id| row(id, "bori")).unwrap();
        assert_eq!(first, Inserted::Created(row(1, "bori")));
        assert_eq!(
            db.insert_unique(USERS, "bori", |id| row(id, "again")).unwrap(),
            Inserted::Existing(1)
        );
        assert_eq!(db.unique_id(USERS, "bori").unwrap(), Some(1));
        assert_eq!(db.unique_id(USERS, "coco").unwrap(), None);

        assert!(db.remove_unique(USERS, "bori").unwrap());
        assert!(db.get::<Row>(USERS, 1).unwrap().is_none());
        assert!(matches!(
            db.insert_unique(USERS, "bori", |id| row(id, "bori")).unwrap(),
            Inserted::Created(_)
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_unique_inserts_store_one_row() {
        let db = Database::new();
        let tasks: Vec<_> = (0..16)
            .map(|n| {
                let db = db.clone();
                tokio::spawn(async move {
                    db.insert_unique(WISHES, "1:1", |id| row(id, &n.to_string()))
                })
            })
            .collect();
        let mut created = 0;
        for task in tasks {
            if let Inserted::Created(_) = task.await.unwrap().unwrap() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(db.scan::<Row>(WISHES).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn closed_database_rejects_access() {
        let mut db = Database::new();
        db.on_module_init().await.unwrap();
        assert!(db.scan::<Row>(ITEMS).unwrap().is_empty());

        db.on_module_destroy().await.unwrap();
        assert!(matches!(db.scan::<Row>(ITEMS), Err(MarketError::Storage(_))));
        assert!(db.insert(ITEMS, |id| row(id, "late")).is_err());
        assert!(matches!(
            db.on_module_destroy().await,
            Err(LifecycleError::ShutdownFailed(_))
        ));
        assert!(matches!(
            db.on_module_init().await,
            Err(LifecycleError::InitializationFailed(_))
        ));
    }
}
