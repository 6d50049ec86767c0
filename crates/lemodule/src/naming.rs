// Module Naming
//
// *Le Nommage* (The Naming) - map source files to dotted module names and module roots

use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File whose presence turns a directory into a regular package
pub const PACKAGE_MARKER: &str = "__init__.py";

/// Stem of the package initializer; it adds no name component of its own
pub const PACKAGE_INIT_STEM: &str = "__init__";

/// Extension of Python source files
pub const SOURCE_EXTENSION: &str = "py";

/// Files and directories that mark the top of a project
pub const ROOT_MARKERS: &[&str] = &[
    "pyproject.toml",
    "setup.py",
    "setup.cfg",
    ".git",
    ".hg",
    ".svn",
];

/// Build-cache directories that never hold importable modules
pub const EXCLUDED_DIRECTORIES: &[&str] = &["__pycache__"];

/// Result type for naming operations
pub type Result<T> = std::result::Result<T, NamingError>;

/// Errors raised while turning paths into module names
#[derive(Debug, Error)]
pub enum NamingError {
    /// The path does not carry the `.py` extension
    #[error("{} must be a Python file", .0.display())]
    NotAPythonFile(PathBuf),

    /// The path does not point at an existing file
    #[error("{} is not a file: we must have a module file", .0.display())]
    NotAFile(PathBuf),

    /// The path crosses a build-cache or hidden directory
    #[error("{} is in an excluded directory: {dir}", path.display())]
    ExcludedDirectory {
        /// Offending path
        path: PathBuf,
        /// First excluded directory component
        dir: String,
    },

    /// The path lies outside the module root
    #[error("{} is not under root {}", path.display(), root.display())]
    NotUnderRoot {
        /// Offending path
        path: PathBuf,
        /// Module root it was expected under
        root: PathBuf,
    },

    /// No name component could be derived
    #[error("cannot derive a module name from {}", .0.display())]
    EmptyModuleName(PathBuf),

    /// Filesystem access failed
    #[error("I/O error for {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Whether `dir` is a regular package
pub fn is_package_dir(dir: &Path) -> bool {
    dir.join(PACKAGE_MARKER).is_file()
}

/// Whether `dir` holds one of the project root markers
pub fn is_project_root(dir: &Path) -> bool {
    ROOT_MARKERS.iter().any(|marker| dir.join(marker).exists())
}

/// Whether a directory name excludes its contents from module naming
pub fn is_excluded_dir(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRECTORIES.contains(&name)
}

/// Whether the path carries the Python source extension
pub fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext == SOURCE_EXTENSION)
        .unwrap_or(false)
}

fn canonical_file(path: &Path) -> Result<PathBuf> {
    if !path.is_file() {
        return Err(NamingError::NotAFile(path.to_path_buf()));
    }
    fs::canonicalize(path).map_err(|source| NamingError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Path of the outermost package enclosing `path`
///
/// Walks upward from the file's directory while directories are packages, stopping at a
/// project root marker or the filesystem root. A file outside any package is its own
/// module root, so the file path itself is returned.
pub fn module_root_path(path: &Path) -> Result<PathBuf> {
    let file = canonical_file(path)?;

    // A package initializer always belongs to its own directory.
    let (mut root, mut current) = if file.file_stem().map_or(false, |s| s == PACKAGE_INIT_STEM) {
        match file.parent() {
            Some(package) => (package.to_path_buf(), package.parent()),
            None => (file.clone(), None),
        }
    } else {
        (file.clone(), file.parent())
    };

    while let Some(dir) = current {
        if is_project_root(dir) || dir.parent().is_none() || !is_package_dir(dir) {
            break;
        }
        root = dir.to_path_buf();
        current = dir.parent();
    }

    tracing::trace!("module root of {} is {}", file.display(), root.display());
    Ok(root)
}

/// Name of the top-level module enclosing `path`
///
/// `src/foo/bar/baz.py` with packages `foo` and `foo.bar` yields `"foo"`; a lone `foo.py`
/// yields `"foo"`.
pub fn find_module_root(path: &Path) -> Result<String> {
    let root = module_root_path(path)?;
    root_name(&root).ok_or(NamingError::EmptyModuleName(root))
}

fn root_name(root: &Path) -> Option<String> {
    let name = if root.is_dir() {
        root.file_name()
    } else {
        root.file_stem()
    };
    name.map(|n| n.to_string_lossy().into_owned())
}

/// Directory that must be on the search path for the module root to be importable
pub fn source_root(path: &Path) -> Result<PathBuf> {
    let root = module_root_path(path)?;
    Ok(root.parent().map(Path::to_path_buf).unwrap_or(root))
}

/// Nearest ancestor directory holding a project root marker
pub fn project_root(path: &Path) -> Result<Option<PathBuf>> {
    let file = canonical_file(path)?;
    Ok(file
        .ancestors()
        .skip(1)
        .find(|dir| is_project_root(dir))
        .map(Path::to_path_buf))
}

/// Convert a source file path into a fully-qualified dotted module name
///
/// `root` is the module root (outermost package directory, or the file itself for a lone
/// module); the name is built from the path relative to the root's parent. When `root` is
/// `None` it is derived with [`module_root_path`], which requires the file to exist.
pub fn path_to_module(path: &Path, root: Option<&Path>) -> Result<String> {
    if !has_source_extension(path) {
        return Err(NamingError::NotAPythonFile(path.to_path_buf()));
    }

    let (path, root) = match root {
        Some(root) => (path.to_path_buf(), root.to_path_buf()),
        None => {
            let file = canonical_file(path)?;
            let root = module_root_path(&file)?;
            (file, root)
        }
    };

    let not_under_root = || NamingError::NotUnderRoot {
        path: path.clone(),
        root: root.clone(),
    };

    if !path.starts_with(&root) {
        return Err(not_under_root());
    }
    let base = root.parent().unwrap_or(&root);
    let relative = path.strip_prefix(base).map_err(|_| not_under_root())?;

    let components: Vec<Component> = relative.components().collect();
    let Some((_, directories)) = components.split_last() else {
        return Err(NamingError::EmptyModuleName(path.clone()));
    };

    let mut parts = Vec::with_capacity(components.len());
    for component in directories {
        let Component::Normal(dir) = component else {
            return Err(not_under_root());
        };
        let dir = dir.to_string_lossy();
        if is_excluded_dir(&dir) {
            return Err(NamingError::ExcludedDirectory {
                path: path.clone(),
                dir: dir.into_owned(),
            });
        }
        parts.push(dir.into_owned());
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| NamingError::EmptyModuleName(path.clone()))?;
    if stem != PACKAGE_INIT_STEM {
        parts.push(stem);
    }

    if parts.is_empty() {
        return Err(NamingError::EmptyModuleName(path));
    }
    Ok(parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excluded_dir_names() {
        assert!(is_excluded_dir("__pycache__"));
        assert!(is_excluded_dir(".hidden"));
        assert!(is_excluded_dir(".venv"));
        assert!(!is_excluded_dir("package"));
    }

    #[test]
    fn test_source_extension() {
        assert!(has_source_extension(Path::new("a/b.py")));
        assert!(!has_source_extension(Path::new("a/b.txt")));
        assert!(!has_source_extension(Path::new("a/b")));
    }

    #[test]
    fn test_path_to_module_with_explicit_root() {
        let name = path_to_module(
            Path::new("/project/src/package/sub/module.py"),
            Some(Path::new("/project/src/package")),
        )
        .unwrap();
        assert_eq!(name, "package.sub.module");
    }

    #[test]
    fn test_path_to_module_init_maps_to_package() {
        let name = path_to_module(
            Path::new("/project/package/__init__.py"),
            Some(Path::new("/project/package")),
        )
        .unwrap();
        assert_eq!(name, "package");

        let name = path_to_module(
            Path::new("/project/package/sub/__init__.py"),
            Some(Path::new("/project/package")),
        )
        .unwrap();
        assert_eq!(name, "package.sub");
    }

    #[test]
    fn test_path_to_module_lone_file_root() {
        let name = path_to_module(Path::new("/scripts/tool.py"), Some(Path::new("/scripts/tool.py")))
            .unwrap();
        assert_eq!(name, "tool");
    }

    #[test]
    fn test_path_to_module_rejects_non_python() {
        let err = path_to_module(Path::new("/project/package/module.txt"), Some(Path::new("/project/package")))
            .unwrap_err();
        assert!(matches!(err, NamingError::NotAPythonFile(_)));
        assert!(err.to_string().contains("must be a Python file"));
    }

    #[test]
    fn test_path_to_module_rejects_outside_root() {
        let err = path_to_module(Path::new("/other/root/package/module.py"), Some(Path::new("/project/package")))
            .unwrap_err();
        assert!(matches!(err, NamingError::NotUnderRoot { .. }));
        assert!(err.to_string().contains("is not under root"));
    }

    #[test]
    fn test_path_to_module_rejects_excluded_dirs() {
        let err = path_to_module(
            Path::new("/project/package/__pycache__/module.py"),
            Some(Path::new("/project/package")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("is in an excluded directory: __pycache__"));

        let err = path_to_module(
            Path::new("/project/package/.hidden/module.py"),
            Some(Path::new("/project/package")),
        )
        .unwrap_err();
        assert!(err.to_string().contains("is in an excluded directory: .hidden"));
    }

    #[test]
    fn test_hidden_ancestors_above_root_are_allowed() {
        let name = path_to_module(
            Path::new("/tmp/.cache/project/package/module.py"),
            Some(Path::new("/tmp/.cache/project/package")),
        )
        .unwrap();
        assert_eq!(name, "package.module");
    }
}
