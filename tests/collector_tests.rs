//! Collector tests: exclusion rules, traversal shape, and the
//! stale-archive sweep.

mod helpers;

use helpers::{assert_absent, assert_exists, TestEnv};
use relpack::collect::collect;
use relpack::error::PackError;
use relpack::policy::PathPolicy;
use std::path::PathBuf;

fn names(files: &[PathBuf], root: &std::path::Path) -> Vec<String> {
    files
        .iter()
        .map(|f| {
            f.strip_prefix(root)
                .expect("collected path outside root")
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

// =============================================================================
// Exclusion rules
// =============================================================================

#[test]
fn test_ignored_name_excluded_at_every_depth() {
    let env = TestEnv::new();
    env.add_file("install.sh", "root copy");
    env.add_file("a.txt", "a");
    env.add_file("nested/install.sh", "nested copy");
    env.add_file("nested/b.txt", "b");

    let policy = PathPolicy::new(["install.sh"]);
    let files = collect(&env.source, &policy).expect("collect failed");
    let names = names(&files, &env.source);

    assert!(!names.iter().any(|n| n.ends_with("install.sh")));
    assert!(names.contains(&"a.txt".to_string()));
    assert!(names.contains(&"nested/b.txt".to_string()));
}

#[test]
fn test_directories_never_emitted() {
    let env = TestEnv::new();
    env.add_file("one/two/deep.txt", "x");
    env.add_dir("empty");

    let files = collect(&env.source, &PathPolicy::new(["install.sh"])).expect("collect failed");

    for file in &files {
        assert!(file.is_file(), "{} is not a file", file.display());
    }
    assert_eq!(files.len(), 1);
}

#[test]
fn test_ignored_name_also_skips_directories() {
    let env = TestEnv::new();
    env.add_file("install.sh/inner.txt", "hidden in ignored dir");
    env.add_file("kept.txt", "kept");

    let files = collect(&env.source, &PathPolicy::new(["install.sh"])).expect("collect failed");
    let names = names(&files, &env.source);

    assert_eq!(names, vec!["kept.txt".to_string()]);
}

// =============================================================================
// Traversal shape
// =============================================================================

#[test]
fn test_eligible_count_across_nesting_depths() {
    let env = TestEnv::new();
    env.add_file("f1", "1");
    env.add_file("d1/f2", "2");
    env.add_file("d1/d2/f3", "3");
    env.add_file("d1/d2/d3/d4/f4", "4");
    env.add_file("d5/f5", "5");

    let files = collect(&env.source, &PathPolicy::new(["install.sh"])).expect("collect failed");
    assert_eq!(files.len(), 5);
}

#[test]
fn test_files_precede_subdirectory_contents() {
    let env = TestEnv::new();
    env.add_file("top_a.txt", "a");
    env.add_file("top_b.txt", "b");
    env.add_file("sub/inner.txt", "i");

    let files = collect(&env.source, &PathPolicy::new(["install.sh"])).expect("collect failed");
    let names = names(&files, &env.source);

    let inner = names.iter().position(|n| n == "sub/inner.txt").unwrap();
    for top in ["top_a.txt", "top_b.txt"] {
        let pos = names.iter().position(|n| n == top).unwrap();
        assert!(pos < inner, "{} listed after subdirectory contents", top);
    }
}

#[test]
fn test_missing_root_is_an_open_error() {
    let env = TestEnv::new();
    let missing = env.source.join("does-not-exist");

    let err = collect(&missing, &PathPolicy::new(["install.sh"])).unwrap_err();
    assert!(matches!(err, PackError::DirectoryOpen { .. }));
}

// =============================================================================
// Stale-archive sweep
// =============================================================================

#[test]
fn test_stale_archives_removed_at_every_level() {
    let env = TestEnv::new();
    let top = env.add_file("old.tgz", "stale");
    let nested = env.add_file("a/b/older.tgz", "stale");
    env.add_file("a/b/keep.txt", "kept");

    let files = collect(&env.source, &PathPolicy::new(["install.sh"])).expect("collect failed");

    assert_absent(&top);
    assert_absent(&nested);
    assert!(!files.iter().any(|f| f.to_string_lossy().ends_with(".tgz")));
}

#[test]
fn test_stale_archive_swept_from_otherwise_empty_subtree() {
    let env = TestEnv::new();
    let stale = env.add_file("empty_branch/leftover.tgz", "stale");

    let files = collect(&env.source, &PathPolicy::new(["install.sh"])).expect("collect failed");

    assert_absent(&stale);
    assert!(files.is_empty());
}

#[test]
fn test_non_archive_suffixes_untouched() {
    let env = TestEnv::new();
    let near_miss = env.add_file("data.tgz.bak", "kept");
    let plain = env.add_file("notes.txt", "kept");

    collect(&env.source, &PathPolicy::new(["install.sh"])).expect("collect failed");

    assert_exists(&near_miss);
    assert_exists(&plain);
}

// =============================================================================
// End-to-end collection scenario
// =============================================================================

#[test]
fn test_scenario_ignore_clean_and_collect() {
    let env = TestEnv::new();
    env.add_install_script("install.sh");
    let stale = env.add_file("old.tgz", "stale");
    env.add_file("a.txt", "a");
    env.add_file("nested/inner.txt", "inner");

    let files = collect(&env.source, &PathPolicy::new(["install.sh"])).expect("collect failed");
    let names = names(&files, &env.source);

    assert_absent(&stale);
    assert_eq!(files.len(), 2);
    assert!(names.contains(&"a.txt".to_string()));
    assert!(names.contains(&"nested/inner.txt".to_string()));
    assert!(!names.iter().any(|n| n.ends_with("install.sh")));
}
