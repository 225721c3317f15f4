// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module cache for require()

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use spacey_script::{ObjectRef, Value};
use std::sync::Arc;

/// A cached module: the `module` object handed to the unit.
///
/// The exports live on the module object itself, so a unit that replaces
/// `module.exports` is seen by every later `require` of the same key.
#[derive(Debug)]
pub struct ModuleRecord {
    key: String,
    module: ObjectRef,
}

impl ModuleRecord {
    /// Create a record with an empty exports object
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        let module = ObjectRef::new();
        module.set("id", key.as_str());
        module.set("exports", Value::object());
        Self { key, module }
    }

    /// Canonical module key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The module's current exports
    pub fn exports(&self) -> Value {
        self.module.get("exports").unwrap_or_default()
    }

    /// The `module` binding passed to the unit
    pub fn module(&self) -> Value {
        Value::Object(self.module.clone())
    }
}

/// Thread-safe module cache
///
/// Guards are never held across unit execution, so nested requires may
/// re-enter the cache freely.
#[derive(Debug, Default)]
pub struct ModuleCache {
    /// Cache mapping canonical keys to module records
    cache: DashMap<String, Arc<ModuleRecord>>,
}

impl ModuleCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a cached module by key
    pub fn get(&self, key: &str) -> Option<Arc<ModuleRecord>> {
        self.cache.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Current exports of a cached module
    pub fn exports(&self, key: &str) -> Option<Value> {
        self.get(key).map(|record| record.exports())
    }

    /// Check if a module is cached
    pub fn has(&self, key: &str) -> bool {
        self.cache.contains_key(key)
    }

    /// Return the record for `key`, creating it if absent.
    ///
    /// The flag is true when this call created the record.
    pub fn get_or_create(&self, key: &str) -> (Arc<ModuleRecord>, bool) {
        match self.cache.entry(key.to_string()) {
            Entry::Occupied(entry) => (Arc::clone(entry.get()), false),
            Entry::Vacant(entry) => {
                let record = Arc::new(ModuleRecord::new(key));
                entry.insert(Arc::clone(&record));
                (record, true)
            }
        }
    }

    /// Remove a module whose load failed
    pub(crate) fn delete(&self, key: &str) -> Option<Arc<ModuleRecord>> {
        self.cache.remove(key).map(|(_, v)| v)
    }

    /// Get all cached module keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.cache.iter().map(|entry| entry.key().clone()).collect();
        keys.sort();
        keys
    }

    /// Get the number of cached modules
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
