//! Typed record storage on top of a [`umscan_kv::KVStore`].
//!
//! A model implements [`KvRecord`] to declare its key and prefix;
//! [`KvOps`] provides CRUD for it.

pub mod kv;

pub use kv::{KvOps, KvRecord};
