// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Top-level `require()` entry points

use crate::error::Result;
use crate::module_system::loader::LoaderContext;
use spacey_script::{ObjectRef, Value};

/// The require() function for callers outside any module.
///
/// Names resolve against the root directory.
pub fn require(context: &LoaderContext, name: &str) -> Result<Value> {
    context.require(name, &[])
}

/// require.resolve() - get the canonical key without loading
pub fn require_resolve(context: &LoaderContext, name: &str) -> Result<String> {
    context.resolve(name, &[]).map(|resolved| resolved.key)
}

/// require.cache - snapshot of cached exports keyed by canonical key
pub fn require_cache(context: &LoaderContext) -> Value {
    let cache = ObjectRef::new();
    for key in context.cached_keys() {
        if let Some(exports) = context.cache().exports(&key) {
            cache.set(key, exports);
        }
    }
    Value::Object(cache)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoaderError;
    use crate::filesystem::MemoryFilesystem;
    use std::sync::Arc;

    #[test]
    fn test_require_resolve_does_not_load() {
        let ctx = LoaderContext::builder().build();
        assert_eq!(require_resolve(&ctx, "./lib/../util").unwrap(), "lib/../util");
        assert_eq!(require_resolve(&ctx, "lib/util").unwrap(), "lib/util");
        assert!(matches!(
            require_resolve(&ctx, "../x"),
            Err(LoaderError::ResolutionUnderflow { .. })
        ));
        assert!(ctx.cached_keys().is_empty());
    }

    #[test]
    fn test_require_cache_snapshot() {
        let fs = MemoryFilesystem::new().with_file("m.js", "exports.n = 1;");
        let ctx = LoaderContext::builder().filesystem(Arc::new(fs)).build();

        let exports = require(&ctx, "m").unwrap();
        let cache = require_cache(&ctx);
        let cache = cache.as_object().unwrap();
        assert_eq!(cache.keys(), vec!["m"]);
        assert_eq!(cache.get("m"), Some(exports));
    }
}
