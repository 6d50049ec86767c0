// Module Resolution
//
// *La Résolution* (The Resolution) - locate a dotted module name on the search path and
// classify where it comes from

use crate::environment::PythonEnvironment;
use crate::name::is_submodule;
use crate::naming::{PACKAGE_MARKER, SOURCE_EXTENSION};
use crate::stdlib::is_known_stdlib;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Where a module comes from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Part of the Python standard library
    StandardLibrary,
    /// Part of the analyzed project
    FirstParty,
    /// Installed dependency
    ThirdParty,
}

impl Provenance {
    /// Short lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::StandardLibrary => "stdlib",
            Provenance::FirstParty => "first-party",
            Provenance::ThirdParty => "third-party",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of object a module name resolved to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    /// Plain `name.py` file
    Source,
    /// Regular package, located at its `__init__.py`
    Package,
    /// Compiled extension module
    Extension,
    /// Namespace package without an initializer
    Namespace,
    /// Compiled into the interpreter, or only known by name
    BuiltIn,
}

/// Outcome of resolving one module name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Fully-qualified name that was resolved
    pub name: String,
    /// Location on disk, absent for built-in and namespace modules
    pub path: Option<PathBuf>,
    /// What the name resolved to
    pub kind: ModuleKind,
    /// Origin classification
    pub provenance: Provenance,
}

impl ResolvedModule {
    /// Path of readable Python source, if this module has one
    pub fn source_path(&self) -> Option<&Path> {
        match self.kind {
            ModuleKind::Source | ModuleKind::Package => self.path.as_deref(),
            _ => None,
        }
    }
}

/// Narrow interface over a module search mechanism
///
/// `root_module` is the top-level module of the analyzed project; it decides between
/// first-party and third-party provenance.
pub trait ModuleResolver {
    /// Resolve a dotted name, returning `None` when it cannot be found
    fn resolve(&self, name: &str, root_module: &str) -> Option<ResolvedModule>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
    fn resolve(&self, name: &str, root_module: &str) -> Option<ResolvedModule> {
        (**self).resolve(name, root_module)
    }
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for Box<R> {
    fn resolve(&self, name: &str, root_module: &str) -> Option<ResolvedModule> {
        (**self).resolve(name, root_module)
    }
}

/// Classify a non-stdlib module against the project's root module
pub fn classify(name: &str, root_module: &str) -> Provenance {
    if is_submodule(name, root_module) {
        Provenance::FirstParty
    } else {
        Provenance::ThirdParty
    }
}

/// A single path-finder hit for one name segment
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Package { dir: PathBuf, init: PathBuf },
    Module(PathBuf),
    Extension(PathBuf),
    Namespace(Vec<PathBuf>),
}

/// Filesystem resolver following the CPython path finder
///
/// Search roots are consulted in order: the project roots added with
/// [`with_search_path`](Self::with_search_path), then the interpreter's `sys.path`.
#[derive(Debug, Clone)]
pub struct PathResolver {
    search_paths: Vec<PathBuf>,
    environment: PythonEnvironment,
}

impl PathResolver {
    /// Create a resolver over an interpreter environment
    pub fn new(environment: PythonEnvironment) -> Self {
        Self {
            search_paths: Vec::new(),
            environment,
        }
    }

    /// Append a project search root, consulted before the interpreter's paths
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !self.search_paths.contains(&path) {
            self.search_paths.push(path);
        }
        self
    }

    /// Append several project search roots
    pub fn with_search_paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        paths.into_iter().fold(self, |resolver, path| resolver.with_search_path(path))
    }

    /// The environment this resolver classifies against
    pub fn environment(&self) -> &PythonEnvironment {
        &self.environment
    }

    /// Full ordered list of search roots
    pub fn search_paths(&self) -> Vec<PathBuf> {
        let mut paths = self.search_paths.clone();
        for path in &self.environment.sys_path {
            if !paths.contains(path) {
                paths.push(path.clone());
            }
        }
        paths
    }

    fn locate(&self, name: &str) -> Option<Location> {
        let segments: Vec<&str> = name.split('.').collect();
        let mut portions = self.search_paths();

        for (index, segment) in segments.iter().enumerate() {
            let is_last = index + 1 == segments.len();
            let found = find_in(&portions, segment)?;
            if is_last {
                return Some(found);
            }

            portions = match found {
                Location::Package { dir, .. } => vec![dir],
                Location::Namespace(dirs) => dirs,
                // Plain and compiled modules have no submodules on disk.
                Location::Module(_) | Location::Extension(_) => return None,
            };
        }

        None
    }
}

impl ModuleResolver for PathResolver {
    fn resolve(&self, name: &str, root_module: &str) -> Option<ResolvedModule> {
        if self.environment.is_builtin(name) {
            return Some(ResolvedModule {
                name: name.to_string(),
                path: None,
                kind: ModuleKind::BuiltIn,
                provenance: Provenance::StandardLibrary,
            });
        }
        // Built-in modules are never packages.
        if let Some((top, _)) = name.split_once('.') {
            if self.environment.is_builtin(top) {
                tracing::trace!("{} names a submodule of built-in {}", name, top);
                return None;
            }
        }

        let Some(location) = self.locate(name) else {
            if !self.environment.has_stdlib_dirs() && is_known_stdlib(name) {
                tracing::trace!("{} classified as stdlib by name", name);
                return Some(ResolvedModule {
                    name: name.to_string(),
                    path: None,
                    kind: ModuleKind::BuiltIn,
                    provenance: Provenance::StandardLibrary,
                });
            }
            tracing::trace!("{} not found on the search path", name);
            return None;
        };

        let (path, kind, anchor) = match location {
            Location::Package { dir, init } => (Some(init), ModuleKind::Package, dir),
            Location::Module(file) => (Some(file.clone()), ModuleKind::Source, file),
            Location::Extension(file) => (Some(file.clone()), ModuleKind::Extension, file),
            Location::Namespace(dirs) => {
                let anchor = dirs.first().cloned().unwrap_or_default();
                (None, ModuleKind::Namespace, anchor)
            }
        };

        let provenance = if self.environment.is_stdlib_path(&anchor) {
            Provenance::StandardLibrary
        } else {
            classify(name, root_module)
        };

        Some(ResolvedModule {
            name: name.to_string(),
            path,
            kind,
            provenance,
        })
    }
}

/// Look up one name segment across a set of directories
///
/// Per directory: regular package, then compiled extension, then source module. Bare
/// directories are collected as namespace portions and only win when nothing else does.
fn find_in(portions: &[PathBuf], segment: &str) -> Option<Location> {
    let mut namespace = Vec::new();

    for base in portions {
        let dir = base.join(segment);
        let init = dir.join(PACKAGE_MARKER);
        if init.is_file() {
            return Some(Location::Package { dir, init });
        }

        if let Some(extension) = find_extension(base, segment) {
            return Some(Location::Extension(extension));
        }

        let module = base.join(format!("{}.{}", segment, SOURCE_EXTENSION));
        if module.is_file() {
            return Some(Location::Module(module));
        }

        if dir.is_dir() {
            namespace.push(dir);
        }
    }

    if namespace.is_empty() {
        None
    } else {
        Some(Location::Namespace(namespace))
    }
}

/// `segment.so`, `segment.cpython-311-x86_64-linux-gnu.so`, `segment.pyd`, ...
fn find_extension(base: &Path, segment: &str) -> Option<PathBuf> {
    let prefix = format!("{}.", segment);
    let entries = fs::read_dir(base).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                return false;
            };
            file_name.starts_with(&prefix)
                && (file_name.ends_with(".so") || file_name.ends_with(".pyd"))
                && path.is_file()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("snake", "snake"), Provenance::FirstParty);
        assert_eq!(classify("snake.parser", "snake"), Provenance::FirstParty);
        assert_eq!(classify("snakes", "snake"), Provenance::ThirdParty);
        assert_eq!(classify("requests", "snake"), Provenance::ThirdParty);
    }

    #[test]
    fn test_source_path_only_for_parseable_kinds() {
        let mut module = ResolvedModule {
            name: "pkg".to_string(),
            path: Some(PathBuf::from("/p/pkg/__init__.py")),
            kind: ModuleKind::Package,
            provenance: Provenance::FirstParty,
        };
        assert!(module.source_path().is_some());

        module.kind = ModuleKind::Extension;
        assert!(module.source_path().is_none());
    }

    #[test]
    fn test_builtin_resolves_without_path() {
        let resolver = PathResolver::new(PythonEnvironment::fallback());
        let resolved = resolver.resolve("sys", "snake").unwrap();
        assert_eq!(resolved.kind, ModuleKind::BuiltIn);
        assert_eq!(resolved.provenance, Provenance::StandardLibrary);
        assert!(resolved.path.is_none());
    }

    #[test]
    fn test_builtin_has_no_submodules() {
        let resolver = PathResolver::new(PythonEnvironment::fallback());
        assert!(resolver.resolve("sys.does_not_exist", "snake").is_none());
        assert!(resolver.resolve("itertools.chain", "snake").is_none());
    }

    #[test]
    fn test_missing_module_is_none() {
        let resolver = PathResolver::new(PythonEnvironment::fallback());
        assert!(resolver.resolve("this_module_does_not_exist_12345", "snake").is_none());
    }

    #[test]
    fn test_provenance_display() {
        assert_eq!(Provenance::StandardLibrary.to_string(), "stdlib");
        assert_eq!(Provenance::ThirdParty.to_string(), "third-party");
    }
}
