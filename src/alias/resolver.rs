//! Alias table and import specifier resolution.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use crate::config::ValidationError;

/// Deferred failure when an alias target is used but missing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("module not found: '{specifier}' resolved to {} which does not exist", .path.display())]
    ModuleNotFound { specifier: String, path: PathBuf },
}

/// One alias: a symbolic prefix and the absolute directory it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRule {
    pub prefix: String,
    pub target: PathBuf,
}

/// Alias prefixes anchored at the configuration file's directory.
#[derive(Debug, Clone)]
pub struct AliasTable {
    base_dir: PathBuf,
    rules: BTreeMap<String, AliasRule>,
}

impl AliasTable {
    /// Create an empty table; relative targets resolve against `base_dir`.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
            rules: BTreeMap::new(),
        }
    }

    /// Register `prefix` → `target`.
    ///
    /// The target is made absolute immediately. Whether it exists is not
    /// checked here; see [`AliasTable::locate`].
    pub fn register(&mut self, prefix: &str, target: &Path) -> Result<&AliasRule, ValidationError> {
        let key = prefix.trim_end_matches('/');
        if key.is_empty() || key.contains('/') || key.chars().any(char::is_whitespace) {
            return Err(ValidationError::InvalidAliasPrefix(prefix.to_string()));
        }
        if self.rules.contains_key(key) {
            return Err(ValidationError::DuplicateAlias(key.to_string()));
        }

        let rule = AliasRule {
            prefix: key.to_string(),
            target: normalize(&self.base_dir.join(target)),
        };
        tracing::debug!(prefix = %rule.prefix, target = %rule.target.display(), "Alias registered");

        Ok(&*self.rules.entry(key.to_string()).or_insert(rule))
    }

    /// The directory a prefix stands for.
    pub fn resolve(&self, prefix: &str) -> Option<&Path> {
        self.rules
            .get(prefix.trim_end_matches('/'))
            .map(|rule| rule.target.as_path())
    }

    /// Rewrite an import specifier whose first segment is an alias.
    ///
    /// `@/views/Home.vue` resolves through `@`; `@vue/runtime` does not.
    pub fn resolve_import(&self, specifier: &str) -> Option<PathBuf> {
        let (head, rest) = match specifier.split_once('/') {
            Some((head, rest)) => (head, Some(rest)),
            None => (specifier, None),
        };

        let rule = self.rules.get(head)?;
        Some(match rest {
            Some(rest) if !rest.is_empty() => normalize(&rule.target.join(rest)),
            _ => rule.target.clone(),
        })
    }

    /// Resolve an aliased specifier and require it to exist on disk.
    ///
    /// Returns `Ok(None)` when the specifier uses no alias.
    pub fn locate(&self, specifier: &str) -> Result<Option<PathBuf>, ResolutionError> {
        match self.resolve_import(specifier) {
            Some(path) if path.exists() => Ok(Some(path)),
            Some(path) => Err(ResolutionError::ModuleNotFound {
                specifier: specifier.to_string(),
                path,
            }),
            None => Ok(None),
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &AliasRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Lexically normalize a path: drop `.` and fold `..` without touching disk.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> AliasTable {
        let mut t = AliasTable::new(Path::new("/work/app"));
        t.register("@", Path::new("./src")).unwrap();
        t.register("~assets", Path::new("../shared/assets")).unwrap();
        t
    }

    #[test]
    fn targets_are_relative_to_base_dir() {
        let t = table();
        assert_eq!(t.resolve("@"), Some(Path::new("/work/app/src")));
        assert_eq!(t.resolve("~assets"), Some(Path::new("/work/shared/assets")));
        assert_eq!(t.resolve("#"), None);
    }

    #[test]
    fn resolve_is_idempotent() {
        let t = table();
        assert_eq!(t.resolve("@"), t.resolve("@"));
        assert_eq!(t.resolve_import("@/a.ts"), t.resolve_import("@/a.ts"));
    }

    #[test]
    fn matches_whole_leading_segment_only() {
        let t = table();
        assert_eq!(
            t.resolve_import("@/views/Home.vue"),
            Some(PathBuf::from("/work/app/src/views/Home.vue"))
        );
        assert_eq!(t.resolve_import("@"), Some(PathBuf::from("/work/app/src")));
        assert_eq!(t.resolve_import("@vue/runtime-core"), None);
        assert_eq!(t.resolve_import("@x"), None);
        assert_eq!(t.resolve_import("./@/x"), None);
    }

    #[test]
    fn absolute_targets_are_kept() {
        let mut t = AliasTable::new(Path::new("/work/app"));
        t.register("lib", Path::new("/opt/lib")).unwrap();
        assert_eq!(t.resolve("lib"), Some(Path::new("/opt/lib")));
    }

    #[test]
    fn duplicate_prefix_is_rejected() {
        let mut t = table();
        assert_eq!(
            t.register("@/", Path::new("./other")).unwrap_err(),
            ValidationError::DuplicateAlias("@".into())
        );
        assert_eq!(t.resolve("@"), Some(Path::new("/work/app/src")));
    }

    #[test]
    fn malformed_prefix_is_rejected() {
        let mut t = AliasTable::new(Path::new("/"));
        for bad in ["", "/", "a/b", "a b"] {
            assert_eq!(
                t.register(bad, Path::new("x")).unwrap_err(),
                ValidationError::InvalidAliasPrefix(bad.into())
            );
        }
    }

    #[test]
    fn locate_reports_missing_targets_at_use() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.ts"), "").unwrap();

        let mut t = AliasTable::new(dir.path());
        t.register("@", Path::new("src")).unwrap();
        t.register("gone", Path::new("missing")).unwrap();

        assert_eq!(t.locate("@/main.ts").unwrap(), Some(dir.path().join("src/main.ts")));
        assert_eq!(t.locate("vue").unwrap(), None);
        assert!(matches!(
            t.locate("gone/x.ts"),
            Err(ResolutionError::ModuleNotFound { specifier, .. }) if specifier == "gone/x.ts"
        ));
    }
}
