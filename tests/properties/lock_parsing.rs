//! Property tests for lock file parsing.

use std::path::Path;

use proptest::prelude::*;

use berth::domain::value_objects::TreeHasher;
use berth::infrastructure::repositories::parse_lock_descriptor;

fn package() -> impl Strategy<Value = (String, String, Vec<u8>)> {
    (
        proptest::string::string_regex("[a-z][a-z0-9]{0,7}").unwrap(),
        proptest::string::string_regex("[0-9]{1,2}\\.[0-9]{1,2}\\.[0-9]{1,2}").unwrap(),
        proptest::collection::vec(any::<u8>(), 0..16),
    )
}

fn render(packages: &[(String, String, Vec<u8>)]) -> String {
    let mut lock = String::from("version = 1\n");
    for (name, version, seed) in packages {
        let mut hasher = TreeHasher::new();
        hasher.add_file("seed", seed);
        lock.push_str(&format!(
            "\n[[package]]\nname = \"{}\"\nversion = \"{}\"\nhash = \"{}\"\n",
            name,
            version,
            hasher.finish()
        ));
    }
    lock
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: parsing arbitrary text returns an error instead of panicking.
    #[test]
    fn property_parse_never_panics(content in "\\PC{0,256}") {
        let _ = parse_lock_descriptor(&content, Path::new("berth.lock"));
    }

    /// PROPERTY: unique well-formed entries always parse, in name order.
    #[test]
    fn property_well_formed_lock_parses_sorted(
        packages in proptest::collection::btree_map(
            proptest::string::string_regex("[a-z][a-z0-9]{0,7}").unwrap(),
            package(),
            0..6,
        )
    ) {
        let mut entries: Vec<_> = packages
            .into_iter()
            .map(|(name, (_, version, seed))| (name, version, seed))
            .collect();
        entries.reverse();

        let lock = parse_lock_descriptor(&render(&entries), Path::new("berth.lock")).unwrap();

        prop_assert_eq!(lock.len(), entries.len());
        let names: Vec<String> = lock.packages().map(|p| p.name().to_string()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        prop_assert_eq!(names, sorted);
    }

    /// PROPERTY: a repeated package name is always rejected.
    #[test]
    fn property_duplicate_package_is_rejected(entry in package()) {
        let entries = vec![entry.clone(), entry];
        prop_assert!(parse_lock_descriptor(&render(&entries), Path::new("berth.lock")).is_err());
    }
}
