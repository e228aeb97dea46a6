//! KvRecord trait + KvOps CRUD operations.
//!
//! The model impls `KvRecord` to declare its prefix, key and hooks.
//! `KvOps<T>` provides the actual get/save/list/delete using a KVStore backend.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use umscan_core::{ListParams, ListResult, ServiceError};
use umscan_kv::{KVError, KVStore};

/// Trait implemented by models to declare KV storage behavior.
///
/// Hooks have default no-op impls.
pub trait KvRecord: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human name of the record kind, used in error messages ("notebook").
    const KIND: &'static str;

    /// KV key prefix: "{module}:{resource}:".
    fn kv_prefix() -> &'static str;

    /// Extract the key value from this instance as a string.
    fn key_value(&self) -> String;

    /// Text matched by the `q` list filter. Defaults to the key.
    fn search_text(&self) -> String {
        self.key_value()
    }

    /// Called before inserting a new record. Use for auto-fill (uuid, timestamps).
    fn before_create(&mut self) {}

    /// Called before updating an existing record.
    fn before_update(&mut self) {}
}

/// CRUD operations for a KvRecord model. Holds a reference to the KV backend.
pub struct KvOps<T: KvRecord> {
    kv: Arc<dyn KVStore>,
    _phantom: PhantomData<T>,
}

impl<T: KvRecord> Clone for KvOps<T> {
    fn clone(&self) -> Self {
        Self::new(self.kv.clone())
    }
}

impl<T: KvRecord> KvOps<T> {
    pub fn new(kv: Arc<dyn KVStore>) -> Self {
        Self {
            kv,
            _phantom: PhantomData,
        }
    }

    fn make_key(id: &str) -> String {
        format!("{}{}", T::kv_prefix(), id)
    }

    fn kv_err(e: KVError) -> ServiceError {
        ServiceError::Storage(e.to_string())
    }

    fn decode(bytes: &[u8]) -> Result<T, ServiceError> {
        serde_json::from_slice(bytes)
            .map_err(|e| ServiceError::Internal(format!("deserialize {}: {}", T::KIND, e)))
    }

    fn encode(record: &T) -> Result<Vec<u8>, ServiceError> {
        serde_json::to_vec(record)
            .map_err(|e| ServiceError::Internal(format!("serialize {}: {}", T::KIND, e)))
    }

    /// Get a record by key value. Returns None if not found.
    pub fn get(&self, id: &str) -> Result<Option<T>, ServiceError> {
        match self.kv.get(&Self::make_key(id)).map_err(Self::kv_err)? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Get a record or return NotFound error.
    pub fn get_or_err(&self, id: &str) -> Result<T, ServiceError> {
        self.get(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("{} '{}' not found", T::KIND, id)))
    }

    /// List all records with this prefix, in key order.
    pub fn list(&self) -> Result<Vec<T>, ServiceError> {
        let entries = self.kv.scan(T::kv_prefix()).map_err(Self::kv_err)?;
        entries.iter().map(|(_, bytes)| Self::decode(bytes)).collect()
    }

    /// List the records for which `pred` holds.
    pub fn list_where<F>(&self, pred: F) -> Result<Vec<T>, ServiceError>
    where
        F: Fn(&T) -> bool,
    {
        Ok(self.list()?.into_iter().filter(|r| pred(r)).collect())
    }

    /// One page of the records passing both `q` and `pred`, sorted by `cmp`.
    ///
    /// `q` is matched against [`KvRecord::search_text`]. `total` counts every
    /// record passing the filter, not just the page.
    pub fn list_paginated<F, C>(
        &self,
        params: &ListParams,
        pred: F,
        cmp: C,
    ) -> Result<ListResult<T>, ServiceError>
    where
        F: Fn(&T) -> bool,
        C: FnMut(&T, &T) -> Ordering,
    {
        let mut matching = self.list_where(|r| pred(r) && params.matches(&r.search_text()))?;
        matching.sort_by(cmp);
        let total = matching.len();
        let items = matching
            .into_iter()
            .skip(params.offset)
            .take(params.limit)
            .collect();
        Ok(ListResult { items, total })
    }

    /// Count all records with this prefix.
    pub fn count(&self) -> Result<usize, ServiceError> {
        Ok(self.kv.scan(T::kv_prefix()).map_err(Self::kv_err)?.len())
    }

    /// Create a new record. Calls before_create hook, rejects duplicates.
    pub fn save_new(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_create();

        let id = record.key_value();
        let key = Self::make_key(&id);
        if self.kv.get(&key).map_err(Self::kv_err)?.is_some() {
            return Err(ServiceError::Conflict(format!(
                "{} '{}' already exists",
                T::KIND,
                id
            )));
        }

        self.kv.set(&key, &Self::encode(&record)?).map_err(Self::kv_err)?;
        Ok(record)
    }

    /// Write a record, creating or replacing it. Calls before_update hook.
    pub fn save(&self, mut record: T) -> Result<T, ServiceError> {
        record.before_update();
        let key = Self::make_key(&record.key_value());
        self.kv.set(&key, &Self::encode(&record)?).map_err(Self::kv_err)?;
        Ok(record)
    }

    /// Write many records in one transaction, replacing existing ones.
    ///
    /// Calls before_create on every record.
    pub fn save_batch(&self, records: Vec<T>) -> Result<Vec<T>, ServiceError> {
        let mut keyed = Vec::with_capacity(records.len());
        for mut record in records {
            record.before_create();
            let key = Self::make_key(&record.key_value());
            let bytes = Self::encode(&record)?;
            keyed.push((key, bytes, record));
        }

        let entries: Vec<(&str, &[u8])> = keyed
            .iter()
            .map(|(k, b, _)| (k.as_str(), b.as_slice()))
            .collect();
        self.kv.batch_set(&entries).map_err(Self::kv_err)?;
        tracing::debug!(kind = T::KIND, count = keyed.len(), "batch saved");

        Ok(keyed.into_iter().map(|(_, _, r)| r).collect())
    }

    /// Delete a record by key value. NotFound if it does not exist.
    pub fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.get_or_err(id)?;
        self.kv.delete(&Self::make_key(id)).map_err(Self::kv_err)
    }

    /// Delete many records in one transaction. Missing ids are skipped.
    pub fn delete_batch(&self, ids: &[String]) -> Result<(), ServiceError> {
        let keys: Vec<String> = ids.iter().map(|id| Self::make_key(id)).collect();
        let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
        self.kv.batch_delete(&refs).map_err(Self::kv_err)
    }
}
