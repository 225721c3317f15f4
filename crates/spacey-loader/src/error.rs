// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the module loader

use thiserror::Error;

/// Result type for loader operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while resolving, loading or running modules
#[derive(Debug, Error)]
pub enum LoaderError {
    /// `..` was requested with an empty directory stack
    #[error("Unable to load module '{module}', already at top level")]
    ResolutionUnderflow {
        /// Module name as requested
        module: String,
    },

    /// The module name is empty
    #[error("Invalid module name '{0}'")]
    InvalidModuleName(String),

    /// No source exists for the module, even after the root fallback
    #[error("Cannot find module '{module}' (looked for '{path}')")]
    SourceNotFound {
        /// Module name as requested
        module: String,
        /// Source path of the primary lookup
        path: String,
    },

    /// A native identifier did not resolve inside the registry
    #[error("Unable to load native module: {0}")]
    NativeModuleNotFound(String),

    /// The module source could not be compiled
    #[error("Error compiling module '{module}': {reason}")]
    Compile {
        /// Canonical module key
        module: String,
        /// Reason for failure
        reason: String,
    },

    /// Error raised while running a module unit
    #[error(transparent)]
    Execution(#[from] spacey_script::Error),

    /// The filesystem provider failed for a reason other than a missing file
    #[error("File system error: {0}")]
    Fs(#[from] std::io::Error),

    /// The loader context was dropped while a scoped `require` was still alive
    #[error("Module loader is no longer available")]
    LoaderDropped,

    /// Invalid configuration file
    #[error("Invalid loader configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl LoaderError {
    /// Create a compile error
    pub fn compile(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Compile {
            module: module.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error means the module source does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::SourceNotFound { .. })
    }
}
