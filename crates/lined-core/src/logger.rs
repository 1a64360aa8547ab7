//! Audit logging observer.
//!
//! [`FileLogger`] writes one line per event to a hidden log file next to the edited file:
//! `files/notes.txt` is logged to `files/.notes.txt.log`. Each logger instance writes a
//! `session start at <ms>` header the first time it sees a given file.

use crate::event::{Observer, WorkspaceEvent, now_millis};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Appends `<timestamp_ms> <command>` lines to a per-file log.
#[derive(Debug, Default)]
pub struct FileLogger {
    started: Mutex<HashSet<PathBuf>>,
}

impl FileLogger {
    /// Create a logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Location of the log for `file_path`.
    pub fn log_path_for(file_path: &Path) -> PathBuf {
        let name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        file_path.with_file_name(format!(".{name}.log"))
    }

    /// Read the whole log for `file_path`. `Ok(None)` if nothing has been logged yet.
    pub fn read_log(file_path: &Path) -> io::Result<Option<String>> {
        match fs::read_to_string(Self::log_path_for(file_path)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write_entry(&self, event: &WorkspaceEvent) -> io::Result<()> {
        let log_path = Self::log_path_for(&event.file_path);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let first_for_file = self.started.lock().insert(event.file_path.clone());
        if first_for_file {
            writeln!(file, "session start at {}", now_millis())?;
        }
        writeln!(file, "{} {}", event.timestamp_ms, event.command)
    }
}

impl Observer for FileLogger {
    fn update(&self, event: &WorkspaceEvent) {
        if let Err(e) = self.write_entry(event) {
            tracing::warn!(
                path = %event.file_path.display(),
                error = %e,
                "failed to write audit log entry"
            );
        }
    }
}
