//! Checksum sidecars for delivered artifacts.
//!
//! The final archive ships with a `sha256sum`-compatible sidecar so a
//! recipient can verify the transfer without any relpack tooling.

use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Write `<artifact>.sha256` next to the artifact and return its path.
///
/// The sidecar holds one `sha256sum` line: the hex digest, two spaces,
/// and the artifact's filename.
pub fn write_sidecar(artifact: &Path) -> Result<PathBuf> {
    let digest = hash_file(artifact)?;
    let name = artifact
        .file_name()
        .and_then(|name| name.to_str())
        .context("artifact path has no filename")?;

    let mut sidecar = artifact.as_os_str().to_os_string();
    sidecar.push(".sha256");
    let sidecar = PathBuf::from(sidecar);

    fs::write(&sidecar, format!("{}  {}\n", digest, name))
        .with_context(|| format!("Failed to write checksum sidecar {}", sidecar.display()))?;

    Ok(sidecar)
}

/// Compute the SHA256 of a file, streaming in 64 KiB chunks.
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} for hashing", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 64 * 1024];

    loop {
        let n = reader
            .read(&mut buf)
            .with_context(|| format!("Failed to read {} for hashing", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}
