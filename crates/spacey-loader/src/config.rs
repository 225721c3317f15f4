// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in a module root.
pub const CONFIG_FILE: &str = "spacey-require.toml";

/// Default source file extension.
pub const DEFAULT_EXTENSION: &str = ".js";

/// Default marker prefix for native identifiers.
pub const DEFAULT_NATIVE_PREFIX: &str = "smart";

/// Configuration for a loader context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Prefix prepended to every canonical key to form a source path
    pub base_path: String,

    /// Suffix appended to every canonical key to form a source path
    pub extension: String,

    /// First path segment marking an identifier as native
    pub native_prefix: String,

    /// Retry a missing nested module as a root module of the same leaf name
    pub fallback_to_root: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            extension: DEFAULT_EXTENSION.to_string(),
            native_prefix: DEFAULT_NATIVE_PREFIX.to_string(),
            fallback_to_root: true,
        }
    }
}

impl LoaderConfig {
    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Load `spacey-require.toml` from `root` if it exists, otherwise return
    /// the defaults.
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading loader configuration");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}
