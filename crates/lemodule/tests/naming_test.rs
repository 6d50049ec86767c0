// Module naming tests over real directory layouts

use lemodule::{find_module_root, module_root_path, path_to_module, project_root, source_root, NamingError};
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Layout {
    _dir: TempDir,
    root: PathBuf,
}

impl Layout {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = fs::canonicalize(dir.path()).unwrap();
        Self { _dir: dir, root }
    }

    /// Create `parts` as a file and mark every directory between it and the layout root
    /// as a package, except a `src` directory and anything above it.
    fn module(&self, parts: &[&str]) -> PathBuf {
        let path = parts.iter().fold(self.root.clone(), |p, part| p.join(part));
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();

        let mut current = path.parent().unwrap().to_path_buf();
        while current != self.root && current.file_name().unwrap() != "src" {
            fs::write(current.join("__init__.py"), "").unwrap();
            current = current.parent().unwrap().to_path_buf();
        }
        path
    }

    fn join(&self, parts: &[&str]) -> PathBuf {
        parts.iter().fold(self.root.clone(), |p, part| p.join(part))
    }
}

#[rstest]
#[case::single_file(&["foo.py"], "foo")]
#[case::single_file_in_dir(&["foo", "bar.py"], "foo")]
#[case::src_single_file_in_dir(&["src", "foo", "bar.py"], "foo")]
#[case::init_file(&["foo", "__init__.py"], "foo")]
#[case::init_file_in_subdir(&["foo", "bar", "__init__.py"], "foo")]
#[case::nested_module(&["foo", "bar", "baz.py"], "foo")]
#[case::src_init_file(&["src", "foo", "__init__.py"], "foo")]
#[case::src_init_file_in_subdir(&["src", "foo", "bar", "__init__.py"], "foo")]
#[case::deeply_nested_module(&["foo", "bar", "baz", "qux.py"], "foo")]
#[case::deeply_nested_init(&["foo", "bar", "baz", "__init__.py"], "foo")]
#[case::deeply_nested_init_in_subdir(&["foo", "bar", "baz", "qux", "__init__.py"], "foo")]
fn test_find_module_root(#[case] parts: &[&str], #[case] expected: &str) {
    let layout = Layout::new();
    let path = layout.module(parts);
    assert_eq!(find_module_root(&path).unwrap(), expected);
}

#[rstest]
#[case::single_file_in_dir(&["foo", "bar.py"], &["foo"])]
#[case::src_single_file_in_dir(&["src", "foo", "bar.py"], &["src", "foo"])]
#[case::init_file(&["foo", "__init__.py"], &["foo"])]
#[case::init_file_in_subdir(&["foo", "bar", "__init__.py"], &["foo"])]
#[case::nested_module(&["foo", "bar", "baz.py"], &["foo"])]
#[case::src_init_file(&["src", "foo", "__init__.py"], &["src", "foo"])]
#[case::src_init_file_in_subdir(&["src", "foo", "bar", "__init__.py"], &["src", "foo"])]
#[case::deeply_nested_module(&["foo", "bar", "baz", "qux.py"], &["foo"])]
#[case::deeply_nested_init_in_subdir(&["foo", "bar", "baz", "qux", "__init__.py"], &["foo"])]
fn test_module_root_path(#[case] parts: &[&str], #[case] expected: &[&str]) {
    let layout = Layout::new();
    let path = layout.module(parts);
    assert_eq!(module_root_path(&path).unwrap(), layout.join(expected));
}

#[test]
fn test_lone_file_is_its_own_root() {
    let layout = Layout::new();
    let path = layout.module(&["foo.py"]);

    assert_eq!(module_root_path(&path).unwrap(), path);
    assert_eq!(source_root(&path).unwrap(), layout.root);
    assert_eq!(path_to_module(&path, None).unwrap(), "foo");
}

#[rstest]
#[case::package_module(&["src", "package", "module.py"], "package.module")]
#[case::package_subpackage_module(&["src", "package", "subpackage", "module.py"], "package.subpackage.module")]
#[case::package(&["package", "__init__.py"], "package")]
#[case::package_subpackage(&["package", "subpackage", "__init__.py"], "package.subpackage")]
#[case::without_src(&["package", "module.py"], "package.module")]
#[case::without_src_nested(&["package", "subpackage", "module.py"], "package.subpackage.module")]
fn test_path_to_module_derives_root(#[case] parts: &[&str], #[case] expected: &str) {
    let layout = Layout::new();
    let path = layout.module(parts);
    assert_eq!(path_to_module(&path, None).unwrap(), expected);
}

#[rstest]
#[case("pyproject.toml")]
#[case("setup.cfg")]
#[case("setup.py")]
#[case(".git")]
#[case(".svn")]
fn test_find_module_root_with_root_markers(#[case] marker: &str) {
    let layout = Layout::new();
    if marker.starts_with('.') {
        fs::create_dir(layout.root.join(marker)).unwrap();
    } else {
        fs::write(layout.root.join(marker), "").unwrap();
    }
    let path = layout.module(&["src", "foo", "bar.py"]);

    assert_eq!(find_module_root(&path).unwrap(), "foo");
    assert_eq!(project_root(&path).unwrap(), Some(layout.root.clone()));
}

#[test]
fn test_find_module_root_with_nested_vcs() {
    let layout = Layout::new();
    fs::create_dir(layout.root.join(".git")).unwrap();
    fs::create_dir_all(layout.root.join("inner").join(".git")).unwrap();

    let path = layout.module(&["inner", "src", "foo", "bar.py"]);

    assert_eq!(find_module_root(&path).unwrap(), "foo");
    assert_eq!(project_root(&path).unwrap(), Some(layout.join(&["inner"])));
}

#[test]
fn test_package_with_root_marker_stops_walk() {
    let layout = Layout::new();
    let path = layout.module(&["outer", "inner", "mod.py"]);
    fs::write(layout.join(&["outer", "inner", "pyproject.toml"]), "").unwrap();

    assert_eq!(module_root_path(&path).unwrap(), path);
    assert_eq!(find_module_root(&path).unwrap(), "mod");
}

#[test]
fn test_find_module_root_not_a_file() {
    let layout = Layout::new();
    let dir = layout.join(&["not_a_file"]);
    fs::create_dir(&dir).unwrap();

    let err = find_module_root(&dir).unwrap_err();
    assert!(matches!(err, NamingError::NotAFile(_)));
    assert!(err.to_string().contains("we must have a module file"));
}

#[test]
fn test_excluded_directories_on_disk() {
    let layout = Layout::new();
    let cached = layout.join(&["package", "__pycache__", "module.py"]);
    fs::create_dir_all(cached.parent().unwrap()).unwrap();
    fs::write(&cached, "").unwrap();

    let err = path_to_module(&cached, Some(&layout.join(&["package"]))).unwrap_err();
    assert!(err.to_string().contains("is in an excluded directory: __pycache__"));
}

#[test]
fn test_not_under_root() {
    let layout = Layout::new();
    let err = path_to_module(
        Path::new("/other/root/package/module.py"),
        Some(&layout.join(&["package"])),
    )
    .unwrap_err();
    assert!(err.to_string().contains("is not under root"));
}
