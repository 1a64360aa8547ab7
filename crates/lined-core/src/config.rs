//! Workspace configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default directory bare file names are resolved under.
pub const DEFAULT_FILES_ROOT: &str = "files";
/// Default location of the persisted workspace state.
pub const DEFAULT_MEMENTO_PATH: &str = ".lined/workspace.json";
/// Default undo history cap per editor.
pub const DEFAULT_MAX_UNDO: usize = 1000;

/// Options for a [`crate::Workspace`].
///
/// Every field has a default, so a partial JSON object is a valid configuration:
///
/// ```rust
/// use lined_core::WorkspaceConfig;
///
/// let config: WorkspaceConfig = serde_json::from_str(r#"{ "max_undo": 50 }"#).unwrap();
/// assert_eq!(config.max_undo, 50);
/// assert_eq!(config.files_root, std::path::PathBuf::from("files"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Directory that `load_file`, `save_file` and `close_file` resolve bare names under.
    pub files_root: PathBuf,
    /// Where `save_state` writes and `restore_state` reads the workspace memento.
    pub memento_path: PathBuf,
    /// Maximum number of undo steps kept per editor (oldest dropped first).
    pub max_undo: usize,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            files_root: PathBuf::from(DEFAULT_FILES_ROOT),
            memento_path: PathBuf::from(DEFAULT_MEMENTO_PATH),
            max_undo: DEFAULT_MAX_UNDO,
        }
    }
}

impl WorkspaceConfig {
    /// Set the files root.
    pub fn with_files_root(mut self, files_root: impl Into<PathBuf>) -> Self {
        self.files_root = files_root.into();
        self
    }

    /// Set the memento path.
    pub fn with_memento_path(mut self, memento_path: impl Into<PathBuf>) -> Self {
        self.memento_path = memento_path.into();
        self
    }

    /// Set the undo cap (at least 1).
    pub fn with_max_undo(mut self, max_undo: usize) -> Self {
        self.max_undo = max_undo.max(1);
        self
    }
}
