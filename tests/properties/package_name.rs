//! Property tests for package name normalization.

use proptest::prelude::*;

use berth::domain::value_objects::PackageName;

fn word() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9]{1,8}").unwrap()
}

fn separator() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[-_.]{1,3}").unwrap()
}

/// Words joined by arbitrary separator runs, e.g. `Typing__Extensions`.
fn spelled_name() -> impl Strategy<Value = (Vec<String>, String)> {
    proptest::collection::vec(word(), 1..=4).prop_flat_map(|words| {
        let seps = proptest::collection::vec(separator(), words.len() - 1);
        (Just(words), seps).prop_map(|(words, seps)| {
            let mut spelled = words[0].clone();
            for (sep, word) in seps.iter().zip(&words[1..]) {
                spelled.push_str(sep);
                spelled.push_str(word);
            }
            (words, spelled)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: any spelling normalizes to lowercase words joined by `-`.
    #[test]
    fn property_spellings_normalize_to_canonical_form((words, spelled) in spelled_name()) {
        let name = PackageName::new(&spelled).unwrap();
        let canonical = words.join("-").to_ascii_lowercase();
        prop_assert_eq!(name.as_str(), canonical.as_str());
    }

    /// PROPERTY: normalizing twice changes nothing.
    #[test]
    fn property_normalization_is_idempotent((_, spelled) in spelled_name()) {
        let once = PackageName::new(&spelled).unwrap();
        let twice = PackageName::new(once.as_str()).unwrap();
        prop_assert_eq!(once, twice);
    }

    /// PROPERTY: construction never panics on arbitrary input.
    #[test]
    fn property_new_never_panics(raw in "\\PC{0,32}") {
        let _ = PackageName::new(&raw);
    }

    /// PROPERTY: a leading or trailing separator is always rejected.
    #[test]
    fn property_separator_at_boundary_is_rejected(
        (_, spelled) in spelled_name(),
        sep in separator(),
        leading in any::<bool>(),
    ) {
        let raw = if leading {
            format!("{}{}", sep, spelled)
        } else {
            format!("{}{}", spelled, sep)
        };
        prop_assert!(PackageName::new(&raw).is_err());
    }
}
