//! Property tests for package tree digests.

use std::collections::BTreeMap;
use std::path::Path;

use proptest::prelude::*;
use tempfile::tempdir;

use berth::domain::ports::FileSystem;
use berth::domain::value_objects::TreeHasher;
use berth::infrastructure::LocalFs;

fn relative_file() -> impl Strategy<Value = String> {
    let segment = proptest::string::string_regex("[a-z][a-z0-9_]{0,7}").unwrap();
    proptest::collection::vec(segment, 1..=3)
        .prop_map(|segments| format!("{}.py", segments.join("/")))
}

/// Small trees of `.py` files, so no path is both a file and a directory.
fn file_tree() -> impl Strategy<Value = BTreeMap<String, Vec<u8>>> {
    proptest::collection::btree_map(
        relative_file(),
        proptest::collection::vec(any::<u8>(), 0..64),
        1..8,
    )
}

fn materialize(root: &Path, files: &BTreeMap<String, Vec<u8>>, reverse: bool) {
    let fs = LocalFs::new();
    let mut entries: Vec<_> = files.iter().collect();
    if reverse {
        entries.reverse();
    }
    for (rel, content) in entries {
        fs.write(&root.join(rel), content).unwrap();
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the digest depends on content, not on where the tree lives
    /// or the order files were written.
    #[test]
    fn property_digest_is_location_and_order_independent(files in file_tree()) {
        let a = tempdir().unwrap();
        let b = tempdir().unwrap();
        materialize(a.path(), &files, false);
        materialize(b.path(), &files, true);

        let fs = LocalFs::new();
        prop_assert_eq!(fs.tree_digest(a.path()).unwrap(), fs.tree_digest(b.path()).unwrap());
    }

    /// PROPERTY: the digest equals a hand-built hash over records sorted by
    /// their path strings (`a.py` before `a/b.py`).
    #[test]
    fn property_digest_follows_path_string_order(files in file_tree()) {
        let dir = tempdir().unwrap();
        materialize(dir.path(), &files, false);

        let mut hasher = TreeHasher::new();
        for (rel, content) in &files {
            hasher.add_file(rel, content);
        }

        prop_assert_eq!(LocalFs::new().tree_digest(dir.path()).unwrap(), hasher.finish());
    }

    /// PROPERTY: changing any one file's content changes the digest.
    #[test]
    fn property_digest_detects_modification(
        files in file_tree(),
        pick in any::<prop::sample::Index>(),
    ) {
        let dir = tempdir().unwrap();
        materialize(dir.path(), &files, false);
        let fs = LocalFs::new();
        let before = fs.tree_digest(dir.path()).unwrap();

        let (rel, content) = files.iter().nth(pick.index(files.len())).unwrap();
        let mut changed = content.clone();
        changed.push(0x42);
        fs.write(&dir.path().join(rel), &changed).unwrap();

        prop_assert_ne!(before, fs.tree_digest(dir.path()).unwrap());
    }

    /// PROPERTY: a copied tree hashes the same as its source.
    #[test]
    fn property_copy_preserves_digest(files in file_tree()) {
        let src = tempdir().unwrap();
        let dst = tempdir().unwrap();
        materialize(src.path(), &files, false);

        let fs = LocalFs::new();
        let out = dst.path().join("copy");
        let copied = fs.copy_tree(src.path(), &out).unwrap();

        prop_assert_eq!(copied.len(), files.len());
        prop_assert_eq!(fs.tree_digest(src.path()).unwrap(), fs.tree_digest(&out).unwrap());
    }
}
