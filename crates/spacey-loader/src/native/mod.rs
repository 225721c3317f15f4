// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Native capabilities reachable through `require`
//!
//! Native identifiers start with a marker segment (`smart` by default) and
//! are resolved against a nested registry instead of the filesystem:
//!
//! ```text
//! smart/filesystem          -> system.filesystem (via the `system` sub-registry)
//! smart/system/filesystem   -> system.filesystem
//! smart                     -> the whole registry
//! ```

pub mod filesystem;

use crate::error::{LoaderError, Result};
use crate::filesystem::FilesystemProvider;
use spacey_script::{ObjectRef, Value};
use std::sync::Arc;

/// Sub-registry the built-in host capabilities are declared under
pub const SYSTEM_GROUP: &str = "system";

/// Nested registry of host capabilities
#[derive(Debug, Clone, Default)]
pub struct NativeRegistry {
    root: ObjectRef,
}

impl NativeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level entry
    pub fn insert(&self, name: &str, value: Value) {
        self.root.set(name, value);
    }

    /// Add `name` under the sub-registry `group`, creating the group if needed
    pub fn register(&self, group: &str, name: &str, value: Value) {
        let group_object = match self.root.get(group) {
            Some(Value::Object(existing)) => existing,
            _ => {
                let created = ObjectRef::new();
                self.root.set(group, created.clone());
                created
            }
        };
        group_object.set(name, value);
    }

    /// The top-level registry object
    pub fn root(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// Find the capability addressed by `segments` (the identifier's segments
    /// after the marker). `requested` is only used for error reporting.
    pub fn lookup(&self, requested: &str, segments: &[&str]) -> Result<Value> {
        let mut current = self.root();
        let mut rest = segments;

        if let Some((first, tail)) = segments.split_first() {
            if let Some(child) = self.sub_registry_child(first) {
                current = child;
                rest = tail;
            }
        }

        for segment in rest {
            let next = match &current {
                Value::Object(object) => object.get(segment),
                _ => None,
            };
            current = next.ok_or_else(|| LoaderError::NativeModuleNotFound(requested.to_string()))?;
        }

        tracing::trace!(module = requested, "resolved native module");
        Ok(current)
    }

    /// First top-level entry (in key order) declaring a child called `name`
    fn sub_registry_child(&self, name: &str) -> Option<Value> {
        self.root.keys().into_iter().find_map(|key| match self.root.get(&key) {
            Some(Value::Object(group)) => group.get(name),
            _ => None,
        })
    }
}

/// Create the registry of built-in capabilities backed by `filesystem`
pub fn create_native_modules(filesystem: Arc<dyn FilesystemProvider>) -> NativeRegistry {
    let registry = NativeRegistry::new();
    registry.register(SYSTEM_GROUP, "filesystem", filesystem::create_module(filesystem));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NativeRegistry {
        let registry = NativeRegistry::new();
        let http = ObjectRef::new();
        http.set("status", 200.0);
        registry.register("system", "http", Value::Object(http));
        registry.register("system", "version", Value::from("1.0"));
        registry.insert("answer", Value::Number(42.0));
        registry
    }

    #[test]
    fn test_sub_registry_descent() {
        let registry = registry();
        let http = registry.lookup("smart/http", &["http"]).unwrap();
        assert!(http.as_object().unwrap().has("status"));

        let status = registry.lookup("smart/http/status", &["http", "status"]).unwrap();
        assert_eq!(status, Value::Number(200.0));
    }

    #[test]
    fn test_explicit_group_path() {
        let registry = registry();
        let via_group = registry.lookup("smart/system/http", &["system", "http"]).unwrap();
        let via_shortcut = registry.lookup("smart/http", &["http"]).unwrap();
        assert_eq!(via_group, via_shortcut);
    }

    #[test]
    fn test_top_level_entries() {
        let registry = registry();
        assert_eq!(
            registry.lookup("smart/answer", &["answer"]).unwrap(),
            Value::Number(42.0)
        );
        assert_eq!(registry.lookup("smart", &[]).unwrap(), registry.root());
    }

    #[test]
    fn test_unknown_segment() {
        let registry = registry();
        assert!(matches!(
            registry.lookup("smart/http/nope", &["http", "nope"]),
            Err(LoaderError::NativeModuleNotFound(name)) if name == "smart/http/nope"
        ));
        assert!(matches!(
            registry.lookup("smart/missing", &["missing"]),
            Err(LoaderError::NativeModuleNotFound(_))
        ));
        // Primitives have no children
        assert!(matches!(
            registry.lookup("smart/version/x", &["version", "x"]),
            Err(LoaderError::NativeModuleNotFound(_))
        ));
    }

    #[test]
    fn test_register_reuses_group() {
        let registry = NativeRegistry::new();
        registry.register("system", "a", Value::Number(1.0));
        registry.register("system", "b", Value::Number(2.0));
        let system = registry.lookup("smart/system", &["system"]).unwrap();
        assert_eq!(system.as_object().unwrap().keys(), vec!["a", "b"]);
    }
}
