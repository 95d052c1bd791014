//! Error taxonomy for the packaging pipeline.
//!
//! Every failure carries the path it happened on. Variants group into
//! categories (validation, filesystem, archive, script patch, artifact
//! moves), and each category keeps its own process exit code so a failed
//! run can be diagnosed from a log line and exit status alone.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit code for failures outside the taxonomy below.
pub const EXIT_OTHER: u8 = 1;

/// Primary error type for every packaging operation.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("source {} is not a directory", path.display())]
    SourceNotADirectory { path: PathBuf },

    #[error("output {} already exists and is a directory", path.display())]
    OutputIsDirectory { path: PathBuf },

    #[error("failed to open directory {}: {source}", path.display())]
    DirectoryOpen { path: PathBuf, source: io::Error },

    #[error("failed to list {}: {source}", path.display())]
    DirectoryRead { path: PathBuf, source: io::Error },

    #[error("failed to stat {}: {source}", path.display())]
    Stat { path: PathBuf, source: io::Error },

    #[error("failed to remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to create archive {}: {source}", path.display())]
    ArchiveOpen { path: PathBuf, source: io::Error },

    #[error("failed to write archive entry for {}: {source}", path.display())]
    EntryWrite { path: PathBuf, source: io::Error },

    #[error("failed to finish archive {}: {source}", path.display())]
    ArchiveFinish { path: PathBuf, source: io::Error },

    #[error("backup marker {marker:?} not found in install script")]
    MarkerNotFound { marker: String },

    #[error("failed to read install script {}: {source}", path.display())]
    ScriptRead { path: PathBuf, source: io::Error },

    #[error("failed to write install script {}: {source}", path.display())]
    ScriptWrite { path: PathBuf, source: io::Error },

    #[error("failed to move archive {} to {}: {source}", from.display(), to.display())]
    MoveArchive {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },

    #[error("failed to move install script {} to {}: {source}", from.display(), to.display())]
    MoveScript {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

impl PackError {
    /// Stable per-category process exit code.
    ///
    /// The two MoveArtifacts failures get codes of their own so "failed
    /// to move the archive" and "failed to move the script" can be told
    /// apart without parsing the log.
    pub fn exit_code(&self) -> u8 {
        use PackError::*;
        match self {
            SourceNotADirectory { .. } | OutputIsDirectory { .. } => 2,
            DirectoryOpen { .. }
            | DirectoryRead { .. }
            | Stat { .. }
            | Remove { .. }
            | CreateDir { .. } => 3,
            ArchiveOpen { .. } | EntryWrite { .. } | ArchiveFinish { .. } => 4,
            MarkerNotFound { .. } | ScriptRead { .. } | ScriptWrite { .. } => 5,
            MoveArchive { .. } => 6,
            MoveScript { .. } => 7,
        }
    }
}
