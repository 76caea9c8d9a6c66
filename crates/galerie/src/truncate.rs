//! Truncation of generated gallery index files.
//!
//! The gallery generator ends the index file with a raw HTML thumbnail grid.
//! Some themes ship their own grid styling and only want the header and the
//! toctree, so the build runs this truncation before generation (to clean up
//! a stale index) and again after it (in case generation re-created the grid).

use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use crate::errors::TruncateError;

/// The three lines opening the thumbnail grid in a generated index file.
///
/// A file is truncated at the first contiguous occurrence of these exact
/// lines, trailing newlines included.
pub const THUMBNAIL_GRID_MARKER: [&str; 3] = [
    ".. raw:: html\n",
    "\n",
    "    <div class=\"sphx-glr-thumbnails\">\n",
];

/// Result of a successful [`truncate_at_marker`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TruncateOutcome {
    /// The marker was found and the file was rewritten. `line` is the
    /// zero-based line index the file was cut at.
    Truncated { line: usize },
    /// The marker was not found, the file was left untouched.
    MarkerNotFound,
}

/// Cuts `file_path` at the first occurrence of [`THUMBNAIL_GRID_MARKER`].
///
/// The file is read fully into memory and, when the marker is found,
/// rewritten with only the lines preceding it. Without a match no write
/// happens and the file stays byte-for-byte identical. Truncating an already
/// truncated file is a no-op, since the marker can no longer be found.
pub fn truncate_at_marker(file_path: &Path) -> Result<TruncateOutcome, TruncateError> {
    let contents = fs::read_to_string(file_path).map_err(|source| TruncateError::ReadFailed {
        path: file_path.to_path_buf(),
        source,
    })?;

    let lines: Vec<&str> = contents.split_inclusive('\n').collect();

    let marker_start = lines
        .windows(THUMBNAIL_GRID_MARKER.len())
        .position(|window| window == THUMBNAIL_GRID_MARKER.as_slice());

    match marker_start {
        Some(line) => {
            let kept = lines[..line].concat();
            fs::write(file_path, kept).map_err(|source| TruncateError::WriteFailed {
                path: file_path.to_path_buf(),
                source,
            })?;

            Ok(TruncateOutcome::Truncated { line })
        }
        None => Ok(TruncateOutcome::MarkerNotFound),
    }
}

/// Like [`truncate_at_marker`], but never fails.
///
/// The documentation build must not abort because of this cosmetic step, so
/// read and write errors (missing file, permissions, non-UTF-8 content) are
/// logged and swallowed.
pub fn truncate(file_path: &Path) {
    match truncate_at_marker(file_path) {
        Ok(TruncateOutcome::Truncated { line }) => {
            info!(target: "gallery", "Truncated {} at line {}", file_path.display(), line);
        }
        Ok(TruncateOutcome::MarkerNotFound) => {
            debug!(target: "gallery", "No thumbnail grid found in {}, no truncation done", file_path.display());
        }
        Err(err) => {
            warn!(target: "gallery", "Failed to truncate {}: {}", file_path.display(), err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_truncates_at_marker() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "index.rst",
            "A\nB\n.. raw:: html\n\n    <div class=\"sphx-glr-thumbnails\">\nC\n",
        );

        let outcome = truncate_at_marker(&path).unwrap();

        assert_eq!(outcome, TruncateOutcome::Truncated { line: 2 });
        assert_eq!(fs::read_to_string(&path).unwrap(), "A\nB\n");
    }

    #[test]
    fn test_leaves_file_without_marker_untouched() {
        let dir = tempdir().unwrap();
        let contents = "A\nB\n.. raw:: html\n\n    <div class=\"something-else\">\nC";
        let path = write_file(dir.path(), "index.rst", contents);

        let outcome = truncate_at_marker(&path).unwrap();

        assert_eq!(outcome, TruncateOutcome::MarkerNotFound);
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_partial_marker_does_not_match() {
        let dir = tempdir().unwrap();
        // The blank line between the directive and the div is part of the
        // marker, a grid opened without it must not be matched.
        let contents = "A\n.. raw:: html\n    <div class=\"sphx-glr-thumbnails\">\n";
        let path = write_file(dir.path(), "index.rst", contents);

        assert_eq!(
            truncate_at_marker(&path).unwrap(),
            TruncateOutcome::MarkerNotFound
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn test_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "index.rst",
            "A\nB\n.. raw:: html\n\n    <div class=\"sphx-glr-thumbnails\">\nC\n",
        );

        truncate_at_marker(&path).unwrap();
        let once = fs::read_to_string(&path).unwrap();

        assert_eq!(
            truncate_at_marker(&path).unwrap(),
            TruncateOutcome::MarkerNotFound
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), once);
    }

    #[test]
    fn test_marker_on_first_line_truncates_to_empty() {
        let dir = tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "index.rst",
            ".. raw:: html\n\n    <div class=\"sphx-glr-thumbnails\">\n<img>\n",
        );

        assert_eq!(
            truncate_at_marker(&path).unwrap(),
            TruncateOutcome::Truncated { line: 0 }
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.rst");

        let err = truncate_at_marker(&path).unwrap_err();
        assert!(matches!(err, TruncateError::ReadFailed { .. }));
    }

    #[test]
    fn test_truncate_swallows_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("does-not-exist.rst");

        // Must log and return, not panic, and not create the file.
        truncate(&path);
        assert!(!path.exists());
    }
}
