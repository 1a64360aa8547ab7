//! Persisted workspace snapshot.
//!
//! A [`WorkspaceMemento`] is derived fresh from the live registry every time it is needed
//! ([`crate::Workspace::create_memento`]); nothing keeps it up to date incrementally. On disk it is
//! pretty-printed JSON with PascalCase field names:
//!
//! ```json
//! {
//!   "OpenedFilePaths": ["files/a.txt", "files/b.txt"],
//!   "ActiveFilePath": "files/b.txt",
//!   "ModifiedFilePaths": ["files/a.txt"],
//!   "FileStates": [
//!     { "FilePath": "files/a.txt", "LogEnabled": true },
//!     { "FilePath": "files/b.txt", "LogEnabled": false }
//!   ]
//! }
//! ```

use crate::error::WorkspaceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Per-file flags that are not derivable from the file itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileState {
    /// Registry key of the file.
    pub file_path: PathBuf,
    /// Whether change logging was on.
    pub log_enabled: bool,
}

/// Point-in-time snapshot of a workspace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct WorkspaceMemento {
    /// Every open file, in registry order.
    pub opened_file_paths: Vec<PathBuf>,
    /// The active file; empty when there is none.
    pub active_file_path: PathBuf,
    /// Files with unsaved changes.
    pub modified_file_paths: Vec<PathBuf>,
    /// Log flag of every open file.
    pub file_states: Vec<FileState>,
}

impl WorkspaceMemento {
    /// The active path, or `None` when the snapshot had no active editor.
    pub fn active(&self) -> Option<&Path> {
        if self.active_file_path.as_os_str().is_empty() {
            None
        } else {
            Some(&self.active_file_path)
        }
    }

    /// Whether `path` was recorded as modified.
    pub fn is_modified(&self, path: &Path) -> bool {
        self.modified_file_paths.iter().any(|p| p == path)
    }

    /// Recorded log flag for `path`, if any.
    pub fn log_enabled(&self, path: &Path) -> Option<bool> {
        self.file_states
            .iter()
            .find(|state| state.file_path == path)
            .map(|state| state.log_enabled)
    }

    /// Write the snapshot to `path`, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), WorkspaceError> {
        let data =
            serde_json::to_string_pretty(self).map_err(|source| WorkspaceError::InvalidState {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| WorkspaceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(path, data).map_err(|source| WorkspaceError::WriteFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read a snapshot from `path`.
    pub fn read_from(path: &Path) -> Result<Self, WorkspaceError> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(WorkspaceError::NoSavedState(path.to_path_buf()));
            }
            Err(source) => {
                return Err(WorkspaceError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&data).map_err(|source| WorkspaceError::InvalidState {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_pascal_case_layout() {
        let json = r#"{
            "OpenedFilePaths": ["files/a.txt"],
            "ActiveFilePath": "",
            "ModifiedFilePaths": [],
            "FileStates": [{ "FilePath": "files/a.txt", "LogEnabled": true }]
        }"#;
        let memento: WorkspaceMemento = serde_json::from_str(json).unwrap();
        assert_eq!(memento.active(), None);
        assert_eq!(memento.log_enabled(Path::new("files/a.txt")), Some(true));
        assert_eq!(memento.log_enabled(Path::new("files/b.txt")), None);
        assert!(!memento.is_modified(Path::new("files/a.txt")));
    }

    #[test]
    fn test_write_creates_parent_and_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("workspace.json");
        let memento = WorkspaceMemento {
            opened_file_paths: vec![PathBuf::from("files/a.txt")],
            active_file_path: PathBuf::from("files/a.txt"),
            modified_file_paths: vec![PathBuf::from("files/a.txt")],
            file_states: vec![FileState {
                file_path: PathBuf::from("files/a.txt"),
                log_enabled: false,
            }],
        };

        memento.write_to(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"OpenedFilePaths\""));
        assert_eq!(WorkspaceMemento::read_from(&path).unwrap(), memento);
    }

    #[test]
    fn test_missing_and_corrupt_state() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        assert!(matches!(
            WorkspaceMemento::read_from(&path),
            Err(WorkspaceError::NoSavedState(_))
        ));

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            WorkspaceMemento::read_from(&path),
            Err(WorkspaceError::InvalidState { .. })
        ));
    }
}
