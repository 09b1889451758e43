//! Line-oriented trace file writer with size-based rotation.
//!
//! When the trace file grows past the size limit it is renamed to
//! `<name>.1` (replacing any previous backup) and a fresh file is started,
//! so at most two trace files exist at any time.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Default rotation threshold (4 MB).
pub const DEFAULT_MAX_BYTES: u64 = 4 * 1024 * 1024;

/// Thread-safe appending writer that rotates by size.
pub struct RotatingWriter {
    file_path: PathBuf,
    max_bytes: u64,
    /// Opened lazily on first write so construction never fails.
    file: Mutex<Option<File>>,
}

impl RotatingWriter {
    pub const fn new(file_path: PathBuf, max_bytes: u64) -> Self {
        Self {
            file_path,
            max_bytes,
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Path of the single retained backup.
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.file_path.as_os_str().to_os_string();
        name.push(".1");
        PathBuf::from(name)
    }

    /// Appends `line` plus a newline, rotating first if the file is full.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rotated, opened, or written, or
    /// if a writer thread panicked while holding the lock.
    pub fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut guard = self
            .file
            .lock()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, format!("Mutex poisoned: {e}")))?;

        if fs::metadata(&self.file_path).is_ok_and(|m| m.len() >= self.max_bytes) {
            *guard = None;
            fs::rename(&self.file_path, self.backup_path())?;
        }

        if guard.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *guard = Some(file);
        }

        let file = guard
            .as_mut()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::Other, "No file available"))?;

        writeln!(file, "{line}")?;
        file.flush()
    }
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}
