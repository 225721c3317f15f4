// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - resolves, caches and runs modules

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::filesystem::{FilesystemProvider, MemoryFilesystem};
use crate::module_system::cache::ModuleCache;
use crate::module_system::compiler::{CompiledUnit, ScriptCompiler, SourceCompiler};
use crate::module_system::resolver::{ResolvedName, resolve};
use crate::module_system::source::SourceLoader;
use crate::native::{self, NativeRegistry};
use spacey_script::{Error, Value};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Owns everything one loader instance needs: configuration, the module
/// cache, the native registry and the source loader.
///
/// Contexts are independent of each other; two contexts never share cached
/// modules.
pub struct LoaderContext {
    config: LoaderConfig,
    cache: ModuleCache,
    natives: NativeRegistry,
    sources: SourceLoader,
    /// Handle given to the scoped `require` functions of running units
    this: Weak<LoaderContext>,
}

impl LoaderContext {
    /// Start building a context
    pub fn builder() -> LoaderContextBuilder {
        LoaderContextBuilder::default()
    }

    /// Require `name` on behalf of a module whose directory is `stack`.
    ///
    /// Top-level callers pass an empty stack.
    pub fn require(&self, name: &str, stack: &[String]) -> Result<Value> {
        let resolved = resolve(name, stack)?;

        if self.is_native(&resolved.key) {
            let segments: Vec<&str> = resolved.key.split('/').skip(1).collect();
            return self.natives.lookup(name, &segments);
        }

        if let Some(exports) = self.cache.exports(&resolved.key) {
            trace!(module = name, key = %resolved.key, "module cache hit");
            return Ok(exports);
        }

        let (resolved, unit) = match self.locate(name, resolved)? {
            Located::Unit(resolved, unit) => (resolved, unit),
            Located::Cached(exports) => return Ok(exports),
        };

        let (record, created) = self.cache.get_or_create(&resolved.key);
        if !created {
            return Ok(record.exports());
        }

        debug!(module = name, key = %resolved.key, "loading module");
        let require = self.scoped_require(resolved.directory());
        match unit.call(vec![require, record.module(), record.exports()]) {
            Ok(()) => Ok(record.exports()),
            Err(err) => {
                debug!(key = %resolved.key, error = %err, "module failed to load");
                self.cache.delete(&resolved.key);
                Err(err)
            }
        }
    }

    /// Resolve `name` to its canonical key without loading anything
    pub fn resolve(&self, name: &str, stack: &[String]) -> Result<ResolvedName> {
        resolve(name, stack)
    }

    /// Whether `key` addresses the native registry
    pub fn is_native(&self, key: &str) -> bool {
        let prefix = self.config.native_prefix.as_str();
        key.split('/').next() == Some(prefix)
    }

    /// Whether a module is cached under `key`
    pub fn is_cached(&self, key: &str) -> bool {
        self.cache.has(key)
    }

    /// Keys of all cached modules, sorted
    pub fn cached_keys(&self) -> Vec<String> {
        self.cache.keys()
    }

    /// The module cache
    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// The native registry
    pub fn natives(&self) -> &NativeRegistry {
        &self.natives
    }

    /// The active configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the unit for `resolved`, retrying a missing nested module as a
    /// root module of the same leaf name.
    fn locate(&self, name: &str, resolved: ResolvedName) -> Result<Located> {
        let primary = match self.sources.load(name, &resolved.key) {
            Ok(unit) => return Ok(Located::Unit(resolved, unit)),
            Err(err) => err,
        };

        let can_fall_back =
            primary.is_not_found() && self.config.fallback_to_root && resolved.depth() > 1;
        let leaf = resolved
            .leaf()
            .filter(|leaf| can_fall_back && !matches!(*leaf, "" | "." | ".."));
        let Some(fallback) = leaf.and_then(|leaf| resolve(leaf, &[]).ok()) else {
            return Err(primary);
        };
        debug!(module = name, from = %resolved.key, to = %fallback.key, "falling back to root module");

        if let Some(exports) = self.cache.exports(&fallback.key) {
            return Ok(Located::Cached(exports));
        }

        match self.sources.load(name, &fallback.key) {
            Ok(unit) => Ok(Located::Unit(fallback, unit)),
            Err(err) if err.is_not_found() => Err(primary),
            Err(err) => Err(err),
        }
    }

    /// `require` function handed to a unit, bound to the unit's directory
    fn scoped_require(&self, directory: Vec<String>) -> Value {
        let context = Weak::clone(&self.this);
        Value::function("require", move |args| {
            let name = match args.first() {
                Some(Value::String(name)) => name.as_str(),
                Some(other) => {
                    return Err(Error::type_error(format!(
                        "The \"id\" argument must be of type string. Received {}",
                        other.type_of()
                    )));
                }
                None => {
                    return Err(Error::type_error("The \"id\" argument must be of type string"));
                }
            };
            let context = context
                .upgrade()
                .ok_or_else(|| Error::host(LoaderError::LoaderDropped))?;
            context.require(name, &directory).map_err(Error::host)
        })
    }
}

/// Outcome of looking up a module's source
enum Located {
    /// A compiled unit to run under the given key
    Unit(ResolvedName, Box<dyn CompiledUnit>),
    /// The root fallback hit a module that is already loaded
    Cached(Value),
}

/// Builder for [`LoaderContext`]
#[derive(Default)]
pub struct LoaderContextBuilder {
    config: Option<LoaderConfig>,
    filesystem: Option<Arc<dyn FilesystemProvider>>,
    compiler: Option<Arc<dyn SourceCompiler>>,
    natives: Vec<(Option<String>, String, Value)>,
}

impl LoaderContextBuilder {
    /// Set the configuration (defaults to [`LoaderConfig::default`])
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the filesystem provider (defaults to an empty in-memory one)
    pub fn filesystem(mut self, filesystem: Arc<dyn FilesystemProvider>) -> Self {
        self.filesystem = Some(filesystem);
        self
    }

    /// Set the compiler (defaults to [`ScriptCompiler`])
    pub fn compiler(mut self, compiler: Arc<dyn SourceCompiler>) -> Self {
        self.compiler = Some(compiler);
        self
    }

    /// Register a capability under the sub-registry `group`
    pub fn native(mut self, group: &str, name: &str, value: Value) -> Self {
        self.natives
            .push((Some(group.to_string()), name.to_string(), value));
        self
    }

    /// Register a top-level capability
    pub fn native_top_level(mut self, name: &str, value: Value) -> Self {
        self.natives.push((None, name.to_string(), value));
        self
    }

    /// Build the context
    pub fn build(self) -> Arc<LoaderContext> {
        let config = self.config.unwrap_or_default();
        let filesystem = self
            .filesystem
            .unwrap_or_else(|| Arc::new(MemoryFilesystem::new()));
        let compiler = self.compiler.unwrap_or_else(|| Arc::new(ScriptCompiler));

        let natives = native::create_native_modules(Arc::clone(&filesystem));
        for (group, name, value) in self.natives {
            match group {
                Some(group) => natives.register(&group, &name, value),
                None => natives.insert(&name, value),
            }
        }

        let sources = SourceLoader::new(filesystem, compiler, &config);

        Arc::new_cyclic(|this| LoaderContext {
            config,
            cache: ModuleCache::new(),
            natives,
            sources,
            this: Weak::clone(this),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(files: &[(&str, &str)]) -> Arc<LoaderContext> {
        let fs = MemoryFilesystem::new();
        for (path, contents) in files {
            fs.insert(*path, *contents);
        }
        LoaderContext::builder().filesystem(Arc::new(fs)).build()
    }

    #[test]
    fn test_is_native() {
        let ctx = context(&[]);
        assert!(ctx.is_native("smart"));
        assert!(ctx.is_native("smart/filesystem"));
        assert!(!ctx.is_native("smartphone"));
        assert!(!ctx.is_native("lib/smart"));
    }

    #[test]
    fn test_nested_require_uses_module_directory() {
        let ctx = context(&[
            ("app/main.js", "exports.helper = require('./helper').name;"),
            ("app/helper.js", "exports.name = 'app helper';"),
            ("helper.js", "exports.name = 'root helper';"),
        ]);

        let exports = ctx.require("app/main", &[]).unwrap();
        let exports = exports.as_object().unwrap();
        assert_eq!(exports.get("helper"), Some(Value::from("app helper")));
        assert_eq!(ctx.cached_keys(), vec!["app/helper", "app/main"]);
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let ctx = context(&[("bad.js", "exports.partial = 1; throw 'bad';")]);
        assert!(ctx.require("bad", &[]).is_err());
        assert!(!ctx.is_cached("bad"));
    }

    #[test]
    fn test_fallback_can_be_disabled() {
        let fs = MemoryFilesystem::new().with_file("c.js", "exports.root = true;");
        let config = LoaderConfig {
            fallback_to_root: false,
            ..LoaderConfig::default()
        };
        let ctx = LoaderContext::builder()
            .filesystem(Arc::new(fs))
            .config(config)
            .build();

        let stack = vec!["a".to_string(), "b".to_string()];
        assert!(matches!(
            ctx.require("./c", &stack),
            Err(LoaderError::SourceNotFound { .. })
        ));
    }

    #[test]
    fn test_require_argument_must_be_string() {
        let ctx = context(&[("m.js", "require(42);")]);
        assert!(matches!(
            ctx.require("m", &[]),
            Err(LoaderError::Execution(spacey_script::Error::TypeError(_)))
        ));
    }

    #[test]
    fn test_custom_native_prefix() {
        let config = LoaderConfig {
            native_prefix: "host".to_string(),
            ..LoaderConfig::default()
        };
        let ctx = LoaderContext::builder()
            .config(config)
            .native_top_level("answer", Value::Number(42.0))
            .build();

        assert_eq!(ctx.require("host/answer", &[]).unwrap(), Value::Number(42.0));
        assert!(matches!(
            ctx.require("smart/answer", &[]),
            Err(LoaderError::SourceNotFound { .. })
        ));
    }
}
