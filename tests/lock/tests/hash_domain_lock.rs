//! Hash domain lock tests.
//!
//! Pins the set of digest prefixes and keeps prefix literals in one file, so
//! a new digest kind cannot silently reuse an existing prefix.

use std::path::{Path, PathBuf};

use kinoplan_kernel::proof::hash::canonical_hash;
use kinoplan_kernel::proof::hash_domain::HashDomain;
use lock_tests::line;

// ---------------------------------------------------------------------------
// Prefix set
// ---------------------------------------------------------------------------

#[test]
fn domain_prefixes_are_pinned() {
    let prefixes: Vec<&[u8]> = HashDomain::ALL.iter().map(HashDomain::as_bytes).collect();
    assert_eq!(
        prefixes,
        vec![b"KINOPLAN::PLAN::V1\0".as_slice()],
        "changing a prefix changes every recorded digest; bump the version suffix instead"
    );
}

#[test]
fn no_prefix_is_a_prefix_of_another() {
    for a in HashDomain::ALL {
        for b in HashDomain::ALL {
            if a != b {
                assert!(
                    !b.as_bytes().starts_with(a.as_bytes()),
                    "{a} prefix is a prefix of {b}"
                );
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Prefix literals stay in hash_domain.rs
// ---------------------------------------------------------------------------

const LIBRARY_ROOTS: [&str; 3] = [
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../kernel/src"),
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../search/src"),
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../planner/src"),
];

fn rust_sources(root: &Path) -> Vec<PathBuf> {
    let mut pending = vec![root.to_path_buf()];
    let mut files = Vec::new();
    while let Some(dir) = pending.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for path in entries.flatten().map(|e| e.path()) {
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|e| e == "rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Library code above the first `#[cfg(test)]`; test modules sit at the end
/// of each file.
fn library_part(source: &str) -> &str {
    source
        .find("#[cfg(test)]")
        .map_or(source, |end| &source[..end])
}

#[test]
fn prefix_literals_live_only_in_hash_domain_rs() {
    let mut scanned = 0;
    let mut offenders = Vec::new();
    for root in LIBRARY_ROOTS {
        for path in rust_sources(Path::new(root)) {
            scanned += 1;
            if path.file_name().is_some_and(|n| n == "hash_domain.rs") {
                continue;
            }
            let source = std::fs::read_to_string(&path).unwrap();
            for (line_no, line) in library_part(&source).lines().enumerate() {
                if line.contains("KINOPLAN::") && !line.trim_start().starts_with("//") {
                    offenders.push(format!("{}:{}", path.display(), line_no + 1));
                }
            }
        }
    }
    assert!(scanned > 10, "scanned only {scanned} files; wrong source roots?");
    assert!(offenders.is_empty(), "prefix literals outside hash_domain.rs: {offenders:?}");
}

// ---------------------------------------------------------------------------
// Plan digests
// ---------------------------------------------------------------------------

#[test]
fn plan_digest_is_pinned_to_the_plan_domain() {
    let plan = line().solve().unwrap();
    let bytes = plan.to_canonical_json_bytes().unwrap();
    let digest = plan.digest().unwrap();
    assert_eq!(digest, canonical_hash(HashDomain::Plan, &bytes));
    assert_eq!(digest, line().solve().unwrap().digest().unwrap());
}
