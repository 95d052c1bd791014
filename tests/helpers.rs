//! Shared test utilities for relpack tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub use relpack::script::BACKUP_MARKER;

/// Test environment with a temporary source tree and output location.
pub struct TestEnv {
    /// Temporary directory (kept alive for the lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Source tree to package
    pub source: PathBuf,
    /// Output path for the delivery directory (does not exist yet)
    pub output: PathBuf,
}

impl TestEnv {
    /// Create a new test environment with an empty source tree.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir.path();

        let source = base.join("source");
        let output = base.join("package");
        fs::create_dir_all(&source).expect("Failed to create source dir");

        Self {
            _temp_dir: temp_dir,
            source,
            output,
        }
    }

    /// Write a file under the source tree, creating parent directories.
    pub fn add_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.source.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Create an empty directory under the source tree.
    pub fn add_dir(&self, rel: &str) -> PathBuf {
        let path = self.source.join(rel);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Write a minimal install script carrying the backup marker.
    pub fn add_install_script(&self, name: &str) -> PathBuf {
        self.add_file(
            name,
            &format!("#!/bin/sh\nset -e\necho installing\n{BACKUP_MARKER}\n"),
        )
    }
}

/// Assert a path exists on disk.
pub fn assert_exists(path: &Path) {
    assert!(path.exists(), "Expected {} to exist", path.display());
}

/// Assert a path is gone from disk.
pub fn assert_absent(path: &Path) {
    assert!(!path.exists(), "Expected {} to be absent", path.display());
}

/// Read a gzipped tar archive back as (entry name, contents) pairs, in
/// archive order.
pub fn read_tgz(path: &Path) -> Vec<(String, Vec<u8>)> {
    use std::io::Read;

    let file = fs::File::open(path).expect("Failed to open archive");
    let decoder = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);

    let mut entries = Vec::new();
    for entry in archive.entries().expect("Failed to read archive entries") {
        let mut entry = entry.expect("Failed to read archive entry");
        let name = entry
            .path()
            .expect("Entry has no path")
            .to_string_lossy()
            .into_owned();
        let mut contents = Vec::new();
        entry
            .read_to_end(&mut contents)
            .expect("Failed to read entry contents");
        entries.push((name, contents));
    }
    entries
}
