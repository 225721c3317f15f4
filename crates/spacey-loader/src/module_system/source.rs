// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Source loader - reads and compiles module units

use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use crate::filesystem::FilesystemProvider;
use crate::module_system::compiler::{BINDING_NAMES, CompiledUnit, SourceCompiler};
use std::io;
use std::sync::Arc;

/// Fetches module text from the filesystem provider and compiles it
pub struct SourceLoader {
    filesystem: Arc<dyn FilesystemProvider>,
    compiler: Arc<dyn SourceCompiler>,
    base_path: String,
    extension: String,
}

impl SourceLoader {
    /// Create a source loader
    pub fn new(
        filesystem: Arc<dyn FilesystemProvider>,
        compiler: Arc<dyn SourceCompiler>,
        config: &LoaderConfig,
    ) -> Self {
        Self {
            filesystem,
            compiler,
            base_path: config.base_path.clone(),
            extension: config.extension.clone(),
        }
    }

    /// Source path for a canonical key
    pub fn path_for(&self, key: &str) -> String {
        format!("{}{}{}", self.base_path, key, self.extension)
    }

    /// Read the source text of `key`.
    ///
    /// A missing file is reported as [`LoaderError::SourceNotFound`] naming
    /// `module`; any other provider failure is a filesystem error.
    pub fn fetch(&self, module: &str, key: &str) -> Result<String> {
        let path = self.path_for(key);
        match self.filesystem.get(&path) {
            Ok(file) => Ok(file.contents),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LoaderError::SourceNotFound {
                module: module.to_string(),
                path,
            }),
            Err(e) => Err(LoaderError::Fs(e)),
        }
    }

    /// Compile already fetched source text of `key`
    pub fn compile(&self, key: &str, source: &str) -> Result<Box<dyn CompiledUnit>> {
        self.compiler.compile(key, source, &BINDING_NAMES)
    }

    /// Fetch and compile `key` into a unit taking `require`, `module` and
    /// `exports`. A missing source is reported against `module`.
    pub fn load(&self, module: &str, key: &str) -> Result<Box<dyn CompiledUnit>> {
        let source = self.fetch(module, key)?;
        self.compile(key, &source)
    }
}
