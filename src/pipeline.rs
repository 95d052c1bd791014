//! Packaging pipeline orchestration.
//!
//! A linear stage chain; the first failing stage aborts the run.
//! Partial artifacts are left on disk rather than rolled back: the next
//! run's Clean stage and the collector's stale-archive sweep
//! re-establish a known state, so re-running from the top is the
//! recovery path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::archive::{self, ArchiveEntry, Compression};
use crate::collect::{self, ARCHIVE_SUFFIX};
use crate::config::Config;
use crate::error::PackError;
use crate::policy::PathPolicy;
use crate::script;
use crate::timing::StageTimer;

/// The source must be an existing directory.
pub fn validate_source_dir(path: &Path) -> Result<(), PackError> {
    if !path.is_dir() {
        return Err(PackError::SourceNotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// Reject an output path that already exists as a directory.
///
/// An existing regular file is acceptable (Clean removes it), as is a
/// path that does not exist yet.
pub fn validate_output_path(path: &Path) -> Result<(), PackError> {
    if path.is_dir() {
        return Err(PackError::OutputIsDirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// One packaging run: a source tree in, a delivery archive out.
pub struct Pipeline {
    source: PathBuf,
    output: PathBuf,
    config: Config,
}

impl Pipeline {
    pub fn new(source: PathBuf, output: PathBuf, config: Config) -> Self {
        Self {
            source,
            output,
            config,
        }
    }

    /// Path of the final deliverable: `<output>.tgz` next to the
    /// delivery directory.
    pub fn artifact_path(&self) -> PathBuf {
        let mut name = self.output.as_os_str().to_os_string();
        name.push(ARCHIVE_SUFFIX);
        PathBuf::from(name)
    }

    /// Run the whole pipeline, returning the final artifact path.
    pub fn run(&self) -> Result<PathBuf, PackError> {
        let total = StageTimer::start("total");

        // Stage 1: clear leftovers at the output location.
        println!("Cleaning previous output...");
        self.clean()?;

        // Stage 2: collect the files to package, sweeping stale
        // archives out of the source tree as a side effect.
        println!("Collecting files from {}...", self.source.display());
        let timer = StageTimer::start("collect");
        let policy = PathPolicy::new([self.config.install_script.as_str()]);
        let files = collect::collect(&self.source, &policy)?;
        println!("  {} files collected", files.len());
        timer.done();

        // Stage 3: archive the tree into the payload, inside the source
        // directory itself. Entry names are relative to the source root.
        let payload = self.source.join(&self.config.payload_name);
        println!("Writing payload {}...", payload.display());
        let timer = StageTimer::start("archive source");
        let names = self.relative_names(&files);
        let entries: Vec<ArchiveEntry> = files
            .iter()
            .zip(&names)
            .map(|(file, name)| ArchiveEntry::new(file.clone(), PathBuf::from(name)))
            .collect();
        archive::write_archive(&entries, &payload, self.gzip())?;
        timer.done();

        // Stage 4: record the backup list in the install script. A
        // missing or unreadable script is fatal; there is no
        // skip-patching fallback.
        println!("Patching {}...", self.config.install_script);
        let timer = StageTimer::start("patch script");
        let script_path = self.source.join(&self.config.install_script);
        self.patch_script(&script_path, &names)?;
        timer.done();

        // Stage 5: create the delivery directory. Clean guarantees the
        // path is free, so plain create_dir is the correct strictness.
        println!("Assembling {}...", self.output.display());
        fs::create_dir(&self.output).map_err(|source| PackError::CreateDir {
            path: self.output.clone(),
            source,
        })?;

        // Stage 6: move both artifacts in. A partial move is not undone.
        let payload_dst = self.output.join(&self.config.payload_name);
        fs::rename(&payload, &payload_dst).map_err(|source| PackError::MoveArchive {
            from: payload.clone(),
            to: payload_dst.clone(),
            source,
        })?;
        let script_dst = self.output.join(&self.config.install_script);
        fs::rename(&script_path, &script_dst).map_err(|source| PackError::MoveScript {
            from: script_path.clone(),
            to: script_dst.clone(),
            source,
        })?;

        // Stage 7: re-archive the delivery directory as the deliverable.
        // The collector is deliberately not reused here: its stale sweep
        // would eat the payload that was just moved in.
        let artifact = self.artifact_path();
        println!("Writing artifact {}...", artifact.display());
        let timer = StageTimer::start("archive output");
        let base = self
            .output
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| self.output.clone());
        let delivery = [
            ArchiveEntry::new(payload_dst, base.join(&self.config.payload_name)),
            ArchiveEntry::new(script_dst, base.join(&self.config.install_script)),
        ];
        archive::write_archive(&delivery, &artifact, self.gzip())?;
        timer.done();

        let meta = fs::metadata(&artifact).map_err(|source| PackError::Stat {
            path: artifact.clone(),
            source,
        })?;
        println!("  Artifact size: {:.2} MB", meta.len() as f64 / 1024.0 / 1024.0);
        total.done();

        Ok(artifact)
    }

    fn gzip(&self) -> Compression {
        Compression::Gzip(self.config.gzip_level)
    }

    /// Collected paths relativized to the source root, in collection
    /// order. These double as archive entry names and backup-list lines.
    fn relative_names(&self, files: &[PathBuf]) -> Vec<String> {
        files
            .iter()
            .map(|file| {
                file.strip_prefix(&self.source)
                    .unwrap_or(file)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    }

    /// Delete a leftover delivery directory placeholder or final
    /// archive from an earlier run. "Not found" is success; a directory
    /// squatting on the output path surfaces as the deletion error.
    fn clean(&self) -> Result<(), PackError> {
        remove_leftover(&self.output)?;
        remove_leftover(&self.artifact_path())?;
        Ok(())
    }

    fn patch_script(&self, path: &Path, backups: &[String]) -> Result<(), PackError> {
        let original = fs::read_to_string(path).map_err(|source| PackError::ScriptRead {
            path: path.to_path_buf(),
            source,
        })?;

        let patched = script::patch(&original, backups, None)?;

        fs::write(path, patched).map_err(|source| PackError::ScriptWrite {
            path: path.to_path_buf(),
            source,
        })?;
        println!("  {} backup entries recorded", backups.len());
        Ok(())
    }
}

fn remove_leftover(path: &Path) -> Result<(), PackError> {
    match fs::remove_file(path) {
        Ok(()) => {
            println!("  Removed leftover {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(PackError::Remove {
            path: path.to_path_buf(),
            source,
        }),
    }
}
