// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module name resolution against a directory stack
//!
//! Only a leading `.` or `..` makes a name relative to the requiring
//! module's directory. Bare names always resolve from the root.

use crate::error::{LoaderError, Result};

/// Result of resolving a module name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    /// Canonical, slash-joined module key
    pub key: String,
    /// The name's own segments after leading `.`/`..` were consumed
    pub segments: Vec<String>,
    /// Directory stack the segments are relative to
    pub base: Vec<String>,
}

impl ResolvedName {
    /// Directory stack for requires issued by this module: the base plus
    /// every segment but the last.
    pub fn directory(&self) -> Vec<String> {
        let parents = self.segments.len().saturating_sub(1);
        self.base
            .iter()
            .chain(&self.segments[..parents])
            .cloned()
            .collect()
    }

    /// Number of path segments in the canonical key
    pub fn depth(&self) -> usize {
        self.base.len() + self.segments.len()
    }

    /// Last segment of the name, if any
    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

/// Resolve `name` relative to `stack`.
///
/// The caller's stack is never modified; popping for `..` happens on a copy.
pub fn resolve(name: &str, stack: &[String]) -> Result<ResolvedName> {
    if name.is_empty() {
        return Err(LoaderError::InvalidModuleName(name.to_string()));
    }

    let mut parts = name.split('/').peekable();
    let mut base: Option<Vec<String>> = None;

    while let Some(&part) = parts.peek() {
        match part {
            "." => {
                base.get_or_insert_with(|| stack.to_vec());
            }
            ".." => {
                let dir = base.get_or_insert_with(|| stack.to_vec());
                if dir.pop().is_none() {
                    return Err(LoaderError::ResolutionUnderflow {
                        module: name.to_string(),
                    });
                }
            }
            _ => break,
        }
        parts.next();
    }

    // No relative prefix: resolve from the root
    let base = base.unwrap_or_default();
    let segments: Vec<String> = parts.map(str::to_string).collect();

    let key = base
        .iter()
        .chain(&segments)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("/");
    tracing::debug!(name, key = %key, "resolved module name");

    Ok(ResolvedName {
        key,
        segments,
        base,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_dot_relative() {
        let resolved = resolve("./b", &stack(&["a"])).unwrap();
        assert_eq!(resolved.key, "a/b");
        assert_eq!(resolved.segments, vec!["b"]);

        let resolved = resolve("./b", &[]).unwrap();
        assert_eq!(resolved.key, "b");
    }

    #[test]
    fn test_bare_name_is_root_relative() {
        let resolved = resolve("b", &stack(&["a"])).unwrap();
        assert_eq!(resolved.key, "b");
        assert!(resolved.base.is_empty());

        let resolved = resolve("lib/util", &stack(&["a", "b"])).unwrap();
        assert_eq!(resolved.key, "lib/util");
        assert_eq!(resolved.directory(), vec!["lib"]);
    }

    #[test]
    fn test_parent_relative() {
        let resolved = resolve("../x", &stack(&["a"])).unwrap();
        assert_eq!(resolved.key, "x");
        assert!(resolved.directory().is_empty());

        let resolved = resolve("../../x/y", &stack(&["a", "b", "c"])).unwrap();
        assert_eq!(resolved.key, "a/x/y");
        assert_eq!(resolved.directory(), vec!["a", "x"]);
    }

    #[test]
    fn test_underflow() {
        assert!(matches!(
            resolve("../x", &[]),
            Err(LoaderError::ResolutionUnderflow { module }) if module == "../x"
        ));
        assert!(matches!(
            resolve("../../x", &stack(&["a"])),
            Err(LoaderError::ResolutionUnderflow { .. })
        ));
    }

    #[test]
    fn test_stack_is_not_mutated() {
        let caller = stack(&["a", "b"]);
        let resolved = resolve("../c", &caller).unwrap();
        assert_eq!(resolved.key, "a/c");
        assert_eq!(caller, stack(&["a", "b"]));
    }

    #[test]
    fn test_directory_of_nested_module() {
        let resolved = resolve("./lib/deep/mod", &stack(&["app"])).unwrap();
        assert_eq!(resolved.key, "app/lib/deep/mod");
        assert_eq!(resolved.depth(), 4);
        assert_eq!(resolved.leaf(), Some("mod"));
        assert_eq!(resolved.directory(), vec!["app", "lib", "deep"]);
    }

    #[test]
    fn test_empty_name() {
        assert!(matches!(
            resolve("", &[]),
            Err(LoaderError::InvalidModuleName(_))
        ));
    }
}
