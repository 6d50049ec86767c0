// Dotted module name helpers

/// Whether `name` is `parent` itself or one of its dotted descendants
///
/// `is_submodule("a.b.c", "a.b")` holds, `is_submodule("a.bc", "a.b")` does not.
pub fn is_submodule(name: &str, parent: &str) -> bool {
    match name.strip_prefix(parent) {
        Some("") => true,
        Some(rest) => rest.starts_with('.'),
        None => false,
    }
}

/// Every ancestor package of `name` followed by `name` itself
///
/// `"a.b.c"` yields `["a", "a.b", "a.b.c"]`.
pub fn package_chain(name: &str) -> Vec<String> {
    let segments: Vec<&str> = name.split('.').collect();
    (1..=segments.len())
        .map(|n| segments[..n].join("."))
        .collect()
}

/// The enclosing package of `name`, if any
pub fn parent(name: &str) -> Option<&str> {
    name.rsplit_once('.').map(|(parent, _)| parent)
}

/// Whether `segment` is a valid Python identifier
pub fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {
            chars.all(|c| c == '_' || c.is_alphanumeric())
        }
        _ => false,
    }
}

/// Whether `name` is a dot-separated chain of identifiers
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case("a.b", "a.b", true)]
    #[case("a.b.c", "a.b", true)]
    #[case("a.bc", "a.b", false)]
    #[case("a", "a.b", false)]
    #[case("b.a.b", "a.b", false)]
    fn test_is_submodule(#[case] name: &str, #[case] parent: &str, #[case] expected: bool) {
        assert_eq!(is_submodule(name, parent), expected);
    }

    #[test]
    fn test_package_chain() {
        assert_eq!(package_chain("a.b.c"), vec!["a", "a.b", "a.b.c"]);
        assert_eq!(package_chain("os"), vec!["os"]);
    }

    #[test]
    fn test_parent() {
        assert_eq!(parent("a.b.c"), Some("a.b"));
        assert_eq!(parent("a"), None);
    }

    #[rstest]
    #[case("pkg", true)]
    #[case("pkg.sub_mod", true)]
    #[case("_private.x1", true)]
    #[case("", false)]
    #[case("pkg.", false)]
    #[case(".pkg", false)]
    #[case("pkg..sub", false)]
    #[case("1pkg", false)]
    #[case("pkg-name", false)]
    #[case("pkg/sub", false)]
    fn test_is_valid_module_name(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_module_name(name), expected);
    }

    proptest! {
        #[test]
        fn prop_chain_members_are_ancestors(
            segments in proptest::collection::vec("[a-z_][a-z0-9_]{0,5}", 1..6),
        ) {
            let name = segments.join(".");
            let chain = package_chain(&name);

            prop_assert_eq!(chain.len(), segments.len());
            prop_assert_eq!(chain.last(), Some(&name));
            for ancestor in &chain {
                prop_assert!(is_submodule(&name, ancestor));
            }
        }

        #[test]
        fn prop_sibling_with_shared_prefix_is_not_submodule(
            base in "[a-z]{1,6}",
            suffix in "[a-z0-9]{1,4}",
        ) {
            let sibling = format!("{}{}", base, suffix);
            prop_assert!(!is_submodule(&sibling, &base));
            let child = format!("{}.{}", base, suffix);
            prop_assert!(is_submodule(&child, &base));
        }
    }
}
