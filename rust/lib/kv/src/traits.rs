use crate::error::KVError;

/// KVStore provides a byte-oriented key-value storage interface.
///
/// Keys follow a namespaced convention: `inventory:notebook:NB01`,
/// `auth:user:<id>`, etc. A prefix scan over `inventory:notebook:` lists
/// every notebook.
pub trait KVStore: Send + Sync {
    /// Get the value for a key. Returns None if the key does not exist.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, KVError>;

    /// Set a key-value pair, replacing any previous value.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), KVError>;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), KVError>;

    /// Write several entries in one transaction. Either all land or none do.
    fn batch_set(&self, entries: &[(&str, &[u8])]) -> Result<(), KVError>;

    /// Delete several keys in one transaction.
    fn batch_delete(&self, keys: &[&str]) -> Result<(), KVError>;

    /// Scan all keys matching a prefix. Returns (key, value) pairs sorted by key.
    fn scan(&self, prefix: &str) -> Result<Vec<(String, Vec<u8>)>, KVError>;
}
