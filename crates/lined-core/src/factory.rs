//! Editor construction by file type.
//!
//! The workspace never builds editors itself; it asks an [`EditorFactory`]. The stock
//! [`TextEditorFactory`] handles `.txt` files. Closures with the matching signature are factories
//! too, which keeps tests free of the file system:
//!
//! ```rust
//! use lined_core::{Editor, TextEditor, Workspace, WorkspaceConfig, WorkspaceError};
//! use lined_core::event::Notifier;
//! use std::path::Path;
//!
//! let factory = |path: &Path, notifier: Notifier, _: &WorkspaceConfig| {
//!     Ok::<Box<dyn Editor>, WorkspaceError>(Box::new(TextEditor::with_notifier(path, "", notifier)))
//! };
//!
//! let dir = tempfile::tempdir().unwrap();
//! let mut ws = Workspace::new(WorkspaceConfig::default().with_files_root(dir.path()));
//! ws.load_file("a.txt", &factory).unwrap();
//! assert_eq!(ws.len(), 1);
//! ```

use crate::config::WorkspaceConfig;
use crate::editor::{Editor, TextEditor, has_log_marker};
use crate::error::WorkspaceError;
use crate::event::Notifier;
use std::fs;
use std::io;
use std::path::Path;

/// Builds the editor for a path.
pub trait EditorFactory {
    /// Create an editor for `path`, broadcasting through `notifier`.
    fn create(
        &self,
        path: &Path,
        notifier: Notifier,
        config: &WorkspaceConfig,
    ) -> Result<Box<dyn Editor>, WorkspaceError>;
}

impl<F> EditorFactory for F
where
    F: Fn(&Path, Notifier, &WorkspaceConfig) -> Result<Box<dyn Editor>, WorkspaceError>,
{
    fn create(
        &self,
        path: &Path,
        notifier: Notifier,
        config: &WorkspaceConfig,
    ) -> Result<Box<dyn Editor>, WorkspaceError> {
        self(path, notifier, config)
    }
}

/// File extensions (lowercase, without the dot) handled by [`TextEditorFactory`].
pub const TEXT_EXTENSIONS: &[&str] = &["txt"];

/// Opens `.txt` files as [`TextEditor`]s.
///
/// - A missing file is created empty; its editor starts modified with logging off.
/// - An existing file is read; logging is on iff its first line carries the log marker.
/// - Any other extension is rejected before touching the disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEditorFactory;

impl TextEditorFactory {
    fn extension_of(path: &Path) -> String {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

impl EditorFactory for TextEditorFactory {
    fn create(
        &self,
        path: &Path,
        notifier: Notifier,
        config: &WorkspaceConfig,
    ) -> Result<Box<dyn Editor>, WorkspaceError> {
        let ext = Self::extension_of(path);
        if !TEXT_EXTENSIONS.contains(&ext.as_str()) {
            return Err(WorkspaceError::UnsupportedFileType(ext));
        }

        let editor = match fs::read_to_string(path) {
            Ok(content) => {
                let log_enabled = content
                    .lines()
                    .next()
                    .is_some_and(|first| has_log_marker(first.trim()));
                TextEditor::with_notifier(path, &content, notifier).with_log_enabled(log_enabled)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::write(path, "").map_err(|source| WorkspaceError::CreateFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                tracing::info!(path = %path.display(), "created new file");
                let mut editor = TextEditor::with_notifier(path, "", notifier);
                editor.mark_as_modified(true);
                editor
            }
            Err(source) => {
                return Err(WorkspaceError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        Ok(Box::new(editor.with_max_undo(config.max_undo)))
    }
}
