//! Failure log
//!
//! A plain-text file listing every record that could not be harvested. It is
//! truncated once when a run starts and only appended to afterwards.

use crate::model::FailureEntry;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Append-only failure log shared by all workers
#[derive(Debug)]
pub struct FailureLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FailureLog {
    /// Truncates (or creates) the log at `path` and opens it for appending
    pub fn reset(path: &Path) -> io::Result<Self> {
        File::create(path)?;
        let file = OpenOptions::new().append(true).open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Location of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one entry
    ///
    /// Entries from concurrent workers never interleave, but their relative
    /// order is unspecified.
    pub fn append(&self, entry: &FailureEntry) -> io::Result<()> {
        let text = entry.to_string();
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(text.as_bytes())?;
        file.flush()
    }
}
