// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Filesystem providers that module sources are read from.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::io;
use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// A file read through a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    /// Path the file was requested with
    pub path: String,
    /// Text contents
    pub contents: String,
}

/// Source text storage used by the loader and exposed to scripts.
pub trait FilesystemProvider: Send + Sync {
    /// Read a file. Missing files fail with [`io::ErrorKind::NotFound`].
    fn get(&self, path: &str) -> io::Result<FileContents>;

    /// Check whether a file exists.
    fn exists(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }
}

/// In-memory provider, mainly for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryFilesystem {
    files: RwLock<HashMap<String, String>>,
}

impl MemoryFilesystem {
    /// Create an empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn insert(&self, path: impl Into<String>, contents: impl Into<String>) {
        self.files.write().insert(path.into(), contents.into());
    }

    /// Builder-style [`MemoryFilesystem::insert`]
    pub fn with_file(self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }
}

impl FilesystemProvider for MemoryFilesystem {
    fn get(&self, path: &str) -> io::Result<FileContents> {
        match self.files.read().get(path) {
            Some(contents) => Ok(FileContents {
                path: path.to_string(),
                contents: contents.clone(),
            }),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("ENOENT: no such file '{}'", path),
            )),
        }
    }

    fn exists(&self, path: &str) -> bool {
        self.files.read().contains_key(path)
    }
}

/// Provider reading files below a root directory.
///
/// Paths are always relative to the root. `..` may step back out of a
/// subdirectory but never above the root; absolute paths are refused.
#[derive(Debug, Clone)]
pub struct DiskFilesystem {
    root: PathBuf,
}

impl DiskFilesystem {
    /// Create a provider rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `path` onto the root, folding `.` and `..` lexically. Paths that
    /// are absolute or climb above the root are refused.
    fn full_path(&self, path: &str) -> io::Result<PathBuf> {
        let escapes = || {
            io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("path '{}' escapes the module root", path),
            )
        };

        let mut parts: Vec<&OsStr> = Vec::new();
        for component in Path::new(path).components() {
            match component {
                Component::Normal(part) => parts.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    parts.pop().ok_or_else(escapes)?;
                }
                Component::RootDir | Component::Prefix(_) => return Err(escapes()),
            }
        }

        Ok(parts
            .into_iter()
            .fold(self.root.clone(), |full, part| full.join(part)))
    }
}

impl FilesystemProvider for DiskFilesystem {
    fn get(&self, path: &str) -> io::Result<FileContents> {
        let full_path = self.full_path(path)?;
        let contents = std::fs::read_to_string(&full_path)?;
        Ok(FileContents {
            path: path.to_string(),
            contents,
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.full_path(path).is_ok_and(|p| p.is_file())
    }
}
