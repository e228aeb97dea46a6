use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableTable, Table, TableDefinition};

use crate::error::KVError;
use crate::traits::KVStore;

const TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

/// KVStore backed by redb, a pure-Rust embedded key-value database.
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    pub fn open(path: &Path) -> Result<Self, KVError> {
        let db = Database::create(path).map_err(KVError::storage)?;
        let store = Self { db: Arc::new(db) };

        // Create the table up front so read transactions never miss it.
        store.write(|_| Ok(()))?;
        tracing::debug!(path = %path.display(), "opened redb store");
        Ok(store)
    }

    fn write<F>(&self, f: F) -> Result<(), KVError>
    where
        F: FnOnce(&mut Table<'_, &'static str, &'static [u8]>) -> Result<(), KVError>,
    {
        let write_txn = self.db.begin_write().map_err(KVError::storage)?;
        {
            let mut table = write_txn.open_table(TABLE).map_err(KVError::storage)?;
            f(&mut table)?;
        }
        write_txn.commit().map_err(KVError::storage)
    }
}

impl KVStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError> {
        let read_txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = read_txn.open_table(TABLE).map_err(KVError::storage)?;
        let value = table.get(key).map_err(KVError::storage)?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError> {
        self.write(|table| {
            table.insert(key, value).map_err(KVError::storage)?;
            Ok(())
        })
    }

    fn delete(&self, key: &str) -> Result<(), KVError> {
        self.write(|table| {
            table.remove(key).map_err(KVError::storage)?;
            Ok(())
        })
    }

    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError> {
        self.write(|table| {
            for (key, value) in entries {
                table.insert(*key, *value).map_err(KVError::storage)?;
            }
            Ok(())
        })
    }

    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError> {
        self.write(|table| {
            for key in keys {
                table.remove(*key).map_err(KVError::storage)?;
            }
            Ok(())
        })
    }

    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError> {
        let read_txn = self.db.begin_read().map_err(KVError::storage)?;
        let table = read_txn.open_table(TABLE).map_err(KVError::storage)?;

        let mut results = Vec::new();
        for entry in table.range(prefix..).map_err(KVError::storage)? {
            let (key, value) = entry.map_err(KVError::storage)?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_string(), value.value().to_vec()));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_temp() -> (tempfile::TempDir, RedbStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = RedbStore::open(&dir.path().join("test.redb")).unwrap();
        (dir, store)
    }

    #[test]
    fn set_get_delete() {
        let (_dir, store) = open_temp();
        assert!(store.get("inventory:project:p1").unwrap().is_none());

        store.set("inventory:project:p1", b"alpha").unwrap();
        assert_eq!(store.get("inventory:project:p1").unwrap().unwrap(), b"alpha");

        store.set("inventory:project:p1", b"beta").unwrap();
        assert_eq!(store.get("inventory:project:p1").unwrap().unwrap(), b"beta");

        store.delete("inventory:project:p1").unwrap();
        assert!(store.get("inventory:project:p1").unwrap().is_none());
        store.delete("inventory:project:p1").unwrap();
    }

    #[test]
    fn scan_stops_at_prefix_boundary() {
        let (_dir, store) = open_temp();
        store.set("inventory:notebook:NB02", b"2").unwrap();
        store.set("inventory:notebook:NB01", b"1").unwrap();
        store.set("inventory:project:p1", b"p").unwrap();
        store.set("auth:user:u1", b"u").unwrap();

        let rows = store.scan("inventory:notebook:").unwrap();
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["inventory:notebook:NB01", "inventory:notebook:NB02"]);
        assert!(store.scan("inventory:unit:").unwrap().is_empty());
    }

    #[test]
    fn batch_ops() {
        let (_dir, store) = open_temp();
        store
            .batch_set(&[("k:a", b"1".as_slice()), ("k:b", b"2"), ("k:c", b"3")])
            .unwrap();
        assert_eq!(store.scan("k:").unwrap().len(), 3);

        store.batch_delete(&["k:a", "k:c", "k:missing"]).unwrap();
        let rows = store.scan("k:").unwrap();
        assert_eq!(rows, vec![("k:b".to_string(), b"2".to_vec())]);
    }

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.redb");
        {
            let store = RedbStore::open(&path).unwrap();
            store.set("auth:user:u1", b"master").unwrap();
        }
        let store = RedbStore::open(&path).unwrap();
        assert_eq!(store.get("auth:user:u1").unwrap().unwrap(), b"master");
    }
}
