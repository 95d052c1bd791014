//! Archive writing.
//!
//! Single-pass tar construction, optionally gzip-filtered. The format
//! is append-only: nothing already written can be amended, so every
//! per-entry check runs before that entry's header goes out.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use tar::{Builder, Header, HeaderMode};

use crate::error::PackError;

/// Compression applied to the tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    /// Gzip at the given level (0-9).
    Gzip(u32),
}

/// One archive member: the on-disk file to read and the pathname to
/// store for it. Callers pre-decide the stored name; the writer never
/// rewrites it.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub source: PathBuf,
    pub name: PathBuf,
}

impl ArchiveEntry {
    pub fn new(source: PathBuf, name: PathBuf) -> Self {
        Self { source, name }
    }
}

/// Destination stream: the gzip filter wraps the file before the tar
/// layer sees it, and is finished after the tar trailer is flushed.
enum Output {
    Plain(File),
    Gzip(GzEncoder<File>),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Plain(file) => file.write(buf),
            Output::Gzip(encoder) => encoder.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Plain(file) => file.flush(),
            Output::Gzip(encoder) => encoder.flush(),
        }
    }
}

impl Output {
    /// Flush the trailing filter state (the gzip footer) and the file.
    fn finish(self) -> io::Result<()> {
        match self {
            Output::Plain(mut file) => file.flush(),
            Output::Gzip(encoder) => encoder.finish().and_then(|mut file| file.flush()),
        }
    }
}

/// Write `entries`, in order, to a tar archive at `out_path`.
///
/// The destination is created or truncated. Metadata (mode, mtime,
/// ownership, size) is captured per entry at write time and copied into
/// the header verbatim; regular files stream their contents, anything
/// else writes a header only. A stat failure on any entry aborts the
/// whole archive, there is no skip-on-error policy.
pub fn write_archive(
    entries: &[ArchiveEntry],
    out_path: &Path,
    compression: Compression,
) -> Result<(), PackError> {
    let file = File::create(out_path).map_err(|source| PackError::ArchiveOpen {
        path: out_path.to_path_buf(),
        source,
    })?;

    let output = match compression {
        Compression::Gzip(level) => {
            Output::Gzip(GzEncoder::new(file, flate2::Compression::new(level)))
        }
        Compression::None => Output::Plain(file),
    };

    let mut builder = Builder::new(output);
    for entry in entries {
        append_entry(&mut builder, entry)?;
    }

    // into_inner writes the end-of-archive blocks; finish flushes the
    // gzip footer. Both failures leave a corrupt archive, so both are
    // hard errors.
    let output = builder
        .into_inner()
        .map_err(|source| PackError::ArchiveFinish {
            path: out_path.to_path_buf(),
            source,
        })?;
    output.finish().map_err(|source| PackError::ArchiveFinish {
        path: out_path.to_path_buf(),
        source,
    })?;

    Ok(())
}

fn append_entry(builder: &mut Builder<Output>, entry: &ArchiveEntry) -> Result<(), PackError> {
    let meta = fs::metadata(&entry.source).map_err(|source| PackError::Stat {
        path: entry.source.clone(),
        source,
    })?;

    let mut header = Header::new_gnu();
    header.set_metadata_in_mode(&meta, HeaderMode::Complete);

    let result = if meta.is_file() {
        let file = File::open(&entry.source).map_err(|source| PackError::Stat {
            path: entry.source.clone(),
            source,
        })?;
        builder.append_data(&mut header, &entry.name, file)
    } else {
        builder.append_data(&mut header, &entry.name, io::empty())
    };

    result.map_err(|source| PackError::EntryWrite {
        path: entry.source.clone(),
        source,
    })
}
