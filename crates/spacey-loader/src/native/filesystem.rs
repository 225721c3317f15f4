// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! `smart/filesystem` native module
//!
//! Exposes the loader's filesystem provider to scripts:
//!
//! - `get(path)` returns `{ path, contents }`
//! - `exists(path)` returns a boolean

use crate::error::LoaderError;
use crate::filesystem::FilesystemProvider;
use spacey_script::{Error, ObjectRef, Value};
use std::sync::Arc;

/// Create the filesystem module exports
pub fn create_module(provider: Arc<dyn FilesystemProvider>) -> Value {
    let exports = ObjectRef::new();

    let fs = Arc::clone(&provider);
    exports.set(
        "get",
        Value::function("get", move |args| {
            let path = path_argument("get", args)?;
            let file = fs.get(path).map_err(|e| Error::host(LoaderError::Fs(e)))?;

            let result = ObjectRef::new();
            result.set("path", file.path);
            result.set("contents", file.contents);
            Ok(Value::Object(result))
        }),
    );

    let fs = provider;
    exports.set(
        "exists",
        Value::function("exists", move |args| {
            let path = path_argument("exists", args)?;
            Ok(Value::Boolean(fs.exists(path)))
        }),
    );

    Value::Object(exports)
}

fn path_argument<'a>(function: &str, args: &'a [Value]) -> Result<&'a str, Error> {
    args.first().and_then(Value::as_str).ok_or_else(|| {
        Error::type_error(format!(
            "filesystem.{}: The \"path\" argument must be of type string",
            function
        ))
    })
}
