// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-loader
//!
//! A synchronous `require()` module loader for Spacey scripts.
//!
//! Module units are plain scripts run with three bindings: `require`,
//! `module` and `exports`. Sources are read through a
//! [`FilesystemProvider`] and compiled through a [`SourceCompiler`], so both
//! storage and evaluation can be swapped by the embedder.
//!
//! ## Quick Start
//!
//! ```rust
//! use spacey_loader::{LoaderContext, MemoryFilesystem, require};
//! use std::sync::Arc;
//!
//! let fs = MemoryFilesystem::new()
//!     .with_file("lib/greeting.js", "exports.text = 'hello ' + require('./name').value;")
//!     .with_file("lib/name.js", "exports.value = 'world';");
//!
//! let context = LoaderContext::builder().filesystem(Arc::new(fs)).build();
//! let exports = require(&context, "lib/greeting").unwrap();
//! assert_eq!(exports.as_object().unwrap().get("text").unwrap().to_string(), "hello world");
//! ```
//!
//! ## Native modules
//!
//! Names starting with the native prefix (`smart` by default) never touch
//! the filesystem. `smart/filesystem` is always available and exposes the
//! context's filesystem provider to scripts.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod filesystem;
pub mod module_system;
pub mod native;

pub use config::LoaderConfig;
pub use error::{LoaderError, Result};
pub use filesystem::{DiskFilesystem, FileContents, FilesystemProvider, MemoryFilesystem};
pub use module_system::{
    LoaderContext, LoaderContextBuilder, ScriptCompiler, SourceCompiler, require, require_cache,
    require_resolve,
};
pub use native::NativeRegistry;

/// Version of the loader crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
