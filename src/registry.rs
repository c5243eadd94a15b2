//! Deduplicating keyed stores shared across resolutions.
//!
//! One registry instance of each kind is owned by a documentation session and
//! shared by every resolution in it. Registration is idempotent (first writer
//! wins) and interior locking makes concurrent writes and reads safe without
//! any caller-side coordination.

use crate::error::{Error, Result};
use crate::schema::Schema;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A keyed, deduplicating store.
///
/// Keys are stable names derived from the originally requested type
/// (pre-substitution, nested generic arguments included), so structurally
/// distinct instantiations of the same raw shape never collide.
#[derive(Debug)]
pub struct DocRegistry<T> {
    name: &'static str,
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T> DocRegistry<T> {
    /// Create an empty registry; the name only labels lookup errors
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Register a value under a key. The first registration of a key wins;
    /// later registrations are silently ignored. Returns whether this call
    /// stored the value.
    pub fn register(&self, key: impl Into<String>, value: T) -> bool {
        let key = key.into();
        if key.is_empty() {
            return false;
        }

        let mut entries = write_lock(&self.entries);
        if entries.contains_key(&key) {
            debug!("{} already holds key {}, keeping first entry", self.name, key);
            return false;
        }

        entries.insert(key, Arc::new(value));
        true
    }

    /// Look up a stored value by key
    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        read_lock(&self.entries).get(key).cloned()
    }

    /// Look up a stored value, failing explicitly when the key is unknown
    pub fn lookup(&self, key: &str) -> Result<Arc<T>> {
        self.get(key).ok_or_else(|| Error::RegistryNotFound {
            registry: self.name,
            key: key.to_string(),
        })
    }

    /// Whether a key has been registered
    pub fn contains(&self, key: &str) -> bool {
        read_lock(&self.entries).contains_key(key)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        read_lock(&self.entries).len()
    }

    /// Whether the registry holds no entries
    pub fn is_empty(&self) -> bool {
        read_lock(&self.entries).is_empty()
    }

    /// Snapshot of all registered keys, sorted for deterministic output
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = read_lock(&self.entries).keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Snapshot of all entries, sorted by key for deterministic output
    pub fn entries(&self) -> Vec<(String, Arc<T>)> {
        let mut entries: Vec<(String, Arc<T>)> = read_lock(&self.entries)
            .iter()
            .map(|(k, v)| (k.clone(), Arc::clone(v)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

// A poisoned lock only means another resolution panicked mid-write of an
// insert-only map; the data is still usable.
fn write_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// A documented error outcome: name, transport status and optional message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error type name, also the registration key
    pub name: String,
    /// Status code reported to clients
    pub status: u16,
    /// Human-readable message template, if declared
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A reusable documented header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiHeader {
    /// Header name, also the registration key
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// Whether clients must always send the header
    pub required: bool,
}

/// Store for resolved schema trees
pub type SchemaRegistry = DocRegistry<Schema>;
/// Store for documented error outcomes
pub type ErrorRegistry = DocRegistry<ApiError>;
/// Store for reusable documented headers
pub type HeaderRegistry = DocRegistry<ApiHeader>;
