// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Synchronous `require()` module system
//!
//! - `./name` and `../name` resolve against the requiring module's directory
//! - Bare names resolve from the root
//! - Each canonical key is initialized at most once; a module that is still
//!   running hands its partial exports to circular requires
//! - A missing nested module falls back to the root module of the same leaf
//!   name
//! - Identifiers under the native prefix are served from the native registry

mod cache;
mod compiler;
mod loader;
mod require;
mod resolver;
mod source;

pub use cache::{ModuleCache, ModuleRecord};
pub use compiler::{BINDING_NAMES, CompiledUnit, ScriptCompiler, SourceCompiler};
pub use loader::{LoaderContext, LoaderContextBuilder};
pub use require::{require, require_cache, require_resolve};
pub use resolver::{ResolvedName, resolve};
pub use source::SourceLoader;
