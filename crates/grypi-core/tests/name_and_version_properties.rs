//! Property tests for package-name normalization and the version grammar.

use grypi_core::{is_semver, normalize, Version, VersionStyle};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_is_idempotent(name in "[A-Za-z0-9._-]{0,40}") {
        let once = normalize(&name);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_names_have_no_separator_runs(name in "[A-Za-z0-9._-]{0,40}") {
        let n = normalize(&name);
        prop_assert!(!n.contains("--"));
        prop_assert!(!n.contains('_'));
        prop_assert!(!n.contains('.'));
        prop_assert_eq!(n.to_lowercase(), n.clone());
    }

    #[test]
    fn names_differing_only_in_separators_collide(
        parts in proptest::collection::vec("[a-z0-9]{1,6}", 1..5),
        seps in proptest::collection::vec("[-_.]{1,3}", 4),
    ) {
        let dashed = parts.join("-");
        let mut mixed = String::new();
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                mixed.push_str(&seps[(i - 1) % seps.len()]);
            }
            mixed.push_str(&part.to_uppercase());
        }
        prop_assert_eq!(normalize(&mixed), normalize(&dashed));
    }

    #[test]
    fn core_triples_without_leading_zeros_are_semver(
        major in 0u32..10_000,
        minor in 0u32..10_000,
        patch in 0u32..10_000,
    ) {
        let v = format!("{major}.{minor}.{patch}");
        prop_assert!(is_semver(&v));
        let prefixed = format!("v{v}");
        prop_assert!(VersionStyle::Prefixed.matches(&prefixed));
        prop_assert!(!VersionStyle::Prefixed.matches(&v));
        let parsed = Version::parse(&v).unwrap();
        prop_assert_eq!(parsed.as_str(), v.as_str());
    }

    #[test]
    fn four_component_versions_are_rejected(
        a in 0u32..100, b in 0u32..100, c in 0u32..100, d in 0u32..100,
    ) {
        let v = format!("{a}.{b}.{c}.{d}");
        prop_assert!(!is_semver(&v));
    }
}
