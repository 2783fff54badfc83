//! Marker-file handshakes with an external test harness
//!
//! A marker is a filesystem path whose mere existence signals an event: the
//! fixture creates one to tell the harness its first records are out, and
//! waits on another so the harness can gate the final iteration.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Errors touching a marker file
#[derive(Error, Debug)]
pub enum MarkerError {
    #[error("failed to create marker file {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Create `path` as an empty file. Creating an already-existing marker is
/// a no-op, not an error.
pub fn touch(path: &Path) -> Result<(), MarkerError> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map(|_| ())
        .map_err(|source| MarkerError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Block until `path` exists, rechecking at `interval`.
///
/// Deliberately unbounded: the external harness is expected to eventually
/// create the file, and the only other way out is process termination.
pub fn wait_for(path: &Path, interval: Duration) {
    while !path.exists() {
        thread::sleep(interval);
    }
}
