// Build options

use crate::error::{BuildError, Result};
use lemodule::name::is_valid_module_name;
use lemodule::is_submodule;
use std::collections::BTreeSet;
use std::num::NonZeroUsize;

/// Module name prefixes excluded from the graph
///
/// A prefix `a.b` excludes `a.b` and `a.b.c`, but neither `a.bc` nor `a`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    prefixes: BTreeSet<String>,
}

impl IgnoreSet {
    /// Build from dotted names, rejecting anything that is not an identifier chain
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut prefixes = BTreeSet::new();
        for name in names {
            let name = name.into();
            if !is_valid_module_name(&name) {
                return Err(BuildError::InvalidIgnoreModule(name));
            }
            prefixes.insert(name);
        }
        Ok(Self { prefixes })
    }

    /// Whether `name` equals or descends from an ignored prefix
    pub fn is_ignored(&self, name: &str) -> bool {
        self.prefixes.iter().any(|prefix| is_submodule(name, prefix))
    }

    /// Number of prefixes
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Whether nothing is ignored
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Prefixes in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.prefixes.iter().map(String::as_str)
    }
}

/// Options for one graph build
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Truncate imported names to this many segments
    pub max_depth: Option<NonZeroUsize>,

    /// Prefixes to leave out of the graph
    pub ignore_modules: IgnoreSet,
}

impl BuildOptions {
    /// Default options: no truncation, nothing ignored
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the truncation depth
    pub fn with_max_depth(mut self, max_depth: Option<NonZeroUsize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the ignore prefixes
    pub fn with_ignore_modules(mut self, ignore_modules: IgnoreSet) -> Self {
        self.ignore_modules = ignore_modules;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("a.b", true)]
    #[case("a.b.c", true)]
    #[case("a.bc", false)]
    #[case("a", false)]
    #[case("x.a.b", false)]
    fn test_ignore_prefix(#[case] name: &str, #[case] expected: bool) {
        let ignore = IgnoreSet::new(["a.b"]).unwrap();
        assert_eq!(ignore.is_ignored(name), expected);
    }

    #[rstest]
    #[case("")]
    #[case("a..b")]
    #[case("a.b.")]
    #[case("a-b")]
    #[case("9lives")]
    fn test_invalid_ignore_module(#[case] name: &str) {
        let err = IgnoreSet::new([name]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidIgnoreModule(ref n) if n == name));
    }

    #[test]
    fn test_empty_ignore_set_ignores_nothing() {
        let ignore = IgnoreSet::default();
        assert!(ignore.is_empty());
        assert!(!ignore.is_ignored("anything"));
    }

    proptest! {
        #[test]
        fn prop_descendants_ignored_siblings_kept(
            prefix in "[a-z]{1,5}(\\.[a-z]{1,5}){0,2}",
            child in "[a-z]{1,5}",
            suffix in "[a-z0-9]{1,3}",
        ) {
            let ignore = IgnoreSet::new([prefix.clone()]).unwrap();
            let descendant = format!("{}.{}", prefix, child);
            let sibling = format!("{}{}", prefix, suffix);
            prop_assert!(ignore.is_ignored(&prefix));
            prop_assert!(ignore.is_ignored(&descendant));
            prop_assert!(!ignore.is_ignored(&sibling));
        }
    }
}
