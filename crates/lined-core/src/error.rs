//! Error types for workspace operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Workspace-level errors.
///
/// Command validation failures are not errors (they are silent no-ops reported through
/// [`crate::EditCommand::is_executed`]); everything that reaches the file system or the
/// registry is reported here.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("file path is empty")]
    /// An operation was given an empty file name.
    EmptyPath,

    #[error("file is not open: {}", .0.display())]
    /// The file is not registered in the workspace.
    NotOpen(PathBuf),

    #[error("no active file")]
    /// The operation targets the active editor but none is active.
    NoActiveEditor,

    #[error("unsupported file type: '{0}'")]
    /// No editor exists for this file extension.
    UnsupportedFileType(String),

    #[error("failed to create directory {}: {source}", path.display())]
    /// Creating a directory (files root, state directory) failed.
    CreateDir {
        /// Directory being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    #[error("failed to create file {}: {source}", path.display())]
    /// Creating a new, empty file failed.
    CreateFile {
        /// File being created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    /// Reading a file failed.
    ReadFile {
        /// File being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    /// Writing a file failed.
    WriteFile {
        /// File being written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    #[error("no saved workspace state at {}", .0.display())]
    /// `restore_state` found no state file.
    NoSavedState(PathBuf),

    #[error("invalid workspace state in {}: {source}", path.display())]
    /// The state file could not be encoded or decoded.
    InvalidState {
        /// State file.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
}
