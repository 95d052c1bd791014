//! Source tree collection.
//!
//! Walks the tree rooted at the source directory, removing stale
//! archives left behind by previous runs and returning the files to
//! package. Directories are traversed, never returned: a directory with
//! zero eligible files contributes nothing to the result, but it is
//! still visited so the stale-archive sweep reaches every level.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::PackError;
use crate::policy::PathPolicy;

/// Filename suffix of the archives this pipeline produces and cleans up.
pub const ARCHIVE_SUFFIX: &str = ".tgz";

/// Collect every file under `root` that the policy does not exclude.
///
/// Each directory is listed twice: a cleanup pass that deletes leftover
/// `.tgz` artifacts, then a collection pass over the (now clean)
/// entries. Returned paths are absolute, each directory's files before
/// the contents of its subdirectories, subdirectories visited in the
/// order they were encountered.
///
/// Any filesystem failure aborts the collection; a partial list is
/// never returned.
pub fn collect(root: &Path, policy: &PathPolicy) -> Result<Vec<PathBuf>, PackError> {
    let mut files = Vec::new();
    // Explicit work stack instead of recursion, so pathological nesting
    // cannot overflow the call stack.
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        remove_stale_archives(&dir)?;

        let entries = fs::read_dir(&dir).map_err(|source| PackError::DirectoryOpen {
            path: dir.clone(),
            source,
        })?;

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PackError::DirectoryRead {
                path: dir.clone(),
                source,
            })?;

            if let Some(name) = entry.file_name().to_str() {
                if policy.is_ignored(name) {
                    continue;
                }
            }

            let file_type = entry.file_type().map_err(|source| PackError::Stat {
                path: entry.path(),
                source,
            })?;

            if file_type.is_dir() {
                subdirs.push(entry.path());
            } else {
                files.push(entry.path());
            }
        }

        // Reversed so the stack pops siblings in encountered order.
        for sub in subdirs.into_iter().rev() {
            pending.push(sub);
        }
    }

    Ok(files)
}

/// Delete every `.tgz` entry directly inside `dir`.
///
/// An entry that vanished between listing and deletion counts as
/// deleted; any other deletion failure is surfaced, not swallowed.
fn remove_stale_archives(dir: &Path) -> Result<(), PackError> {
    let entries = fs::read_dir(dir).map_err(|source| PackError::DirectoryOpen {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| PackError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.ends_with(ARCHIVE_SUFFIX) {
            continue;
        }

        let path = entry.path();
        println!("  Removing stale archive {}", path.display());
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(source) => return Err(PackError::Remove { path, source }),
        }
    }

    Ok(())
}
