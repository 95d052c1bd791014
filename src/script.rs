//! Install-script patching.
//!
//! The install script carries a generated tail: everything after the
//! backup-list marker line belongs to the packager and is rewritten on
//! every run. The hand-written head of the script is never touched.

use crate::error::PackError;

/// Marker line separating the hand-written script head from the
/// generated backup list.
pub const BACKUP_MARKER: &str = "# BACKUP LIST";

/// Detect the line terminator convention of `text`.
///
/// CRLF is checked before bare LF so mixed documents resolve to CRLF;
/// LF is the default when no terminator is present at all.
pub fn detect_newline(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else if text.contains('\n') {
        "\n"
    } else if text.contains('\r') {
        "\r"
    } else {
        "\n"
    }
}

/// Rewrite the generated tail of an install script.
///
/// Keeps everything up to and including the marker line, discards the
/// rest of the document, and emits one line per backup path, each
/// terminated by `newline` (detected from the document when not
/// supplied). Entries are written verbatim: no quoting, no escaping, no
/// deduplication. The tail is regenerated from scratch, so re-patching
/// the output with the same list yields the same document.
///
/// A document without the marker is refused: patching a script that
/// lacks the expected structure would mean guessing where the generated
/// region starts.
pub fn patch(
    original: &str,
    backups: &[String],
    newline: Option<&str>,
) -> Result<String, PackError> {
    let newline = newline.unwrap_or_else(|| detect_newline(original));

    let marker = original
        .find(BACKUP_MARKER)
        .ok_or_else(|| PackError::MarkerNotFound {
            marker: BACKUP_MARKER.to_string(),
        })?;

    // Head runs through the end of the marker line. A marker sitting on
    // the final, unterminated line gets its terminator synthesized so
    // the first entry starts on its own line.
    let mut patched = match original[marker..].find(newline) {
        Some(offset) => original[..marker + offset + newline.len()].to_string(),
        None => {
            let mut head = original.to_string();
            head.push_str(newline);
            head
        }
    };

    for path in backups {
        patched.push_str(path);
        patched.push_str(newline);
    }

    Ok(patched)
}
