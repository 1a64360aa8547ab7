//! Line-buffer editor.
//!
//! A [`TextEditor`] owns one file's line buffer and its undo/redo history. Mutations are built as
//! [`EditCommand`]s, executed against the buffer, and recorded for undo. When change logging is
//! enabled, every mutating call is broadcast through the editor's [`Notifier`], including calls
//! whose command was rejected.
//!
//! The [`Editor`] trait is the capability surface the [`crate::Workspace`] and callers program
//! against; `TextEditor` is its implementation for plain text files.
//!
//! # Example
//!
//! ```rust
//! use lined_core::{Editor, TextEditor};
//!
//! let mut editor = TextEditor::new("notes.txt", "abcdef");
//! assert!(editor.delete(1, 2, 3));
//! assert_eq!(editor.content(), "aef");
//!
//! assert!(editor.undo());
//! assert_eq!(editor.content(), "abcdef");
//!
//! assert!(editor.redo());
//! assert_eq!(editor.content(), "aef");
//! ```

use crate::commands::EditCommand;
use crate::config::DEFAULT_MAX_UNDO;
use crate::event::{Notifier, WorkspaceEvent};
use crate::text::split_content;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// First line flagging a file as change-logged.
pub const LOG_MARKER: &str = "# log";

/// Shown by [`Editor::show`] for a buffer without lines.
pub const EMPTY_FILE_PLACEHOLDER: &str = "(empty file)";

/// Returns `true` if `line` carries the [`LOG_MARKER`].
pub fn has_log_marker(line: &str) -> bool {
    line.contains(LOG_MARKER)
}

/// Capabilities of an open editor, as consumed by the workspace.
pub trait Editor: Send {
    /// Registry key of this editor.
    fn file_path(&self) -> &Path;

    /// Whether the buffer has changes not yet persisted.
    fn is_modified(&self) -> bool;

    /// Set the modified flag.
    fn mark_as_modified(&mut self, modified: bool);

    /// Full text: lines joined by `'\n'`.
    fn content(&self) -> String;

    /// Number of lines in the buffer.
    fn line_count(&self) -> usize;

    /// Undo the last command. Returns `false` if there was nothing to undo.
    fn undo(&mut self) -> bool;

    /// Redo the last undone command. Returns `false` if there was nothing to redo.
    fn redo(&mut self) -> bool;

    /// Render lines `start_line..=end_line` with right-aligned line numbers.
    ///
    /// `0` means "from the first line" / "to the last line". Out-of-range requests produce a
    /// message instead of line output.
    fn show(&self, start_line: usize, end_line: usize) -> String;

    /// Append a final line. Returns whether the command executed.
    fn append(&mut self, text: &str) -> bool;

    /// Insert text at `(line, col)`. Returns whether the command executed.
    fn insert(&mut self, line: usize, col: usize, text: &str) -> bool;

    /// Delete `length` characters at `(line, col)`. Returns whether the command executed.
    fn delete(&mut self, line: usize, col: usize, length: usize) -> bool;

    /// Replace `length` characters at `(line, col)` with `text`. Returns whether the command
    /// executed.
    fn replace(&mut self, line: usize, col: usize, length: usize, text: &str) -> bool;

    /// Turn change logging on or off (idempotent).
    fn set_log_enabled(&mut self, enabled: bool);

    /// Whether change logging is on.
    fn is_log_enabled(&self) -> bool;
}

#[derive(Debug)]
struct UndoRedoManager {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
    max_undo: usize,
}

impl UndoRedoManager {
    fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo: max_undo.max(1),
        }
    }

    fn push_executed(&mut self, command: EditCommand) {
        self.redo_stack.clear();
        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(command);
    }

    fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

/// Editor for plain text files.
#[derive(Debug)]
pub struct TextEditor {
    file_path: PathBuf,
    lines: Vec<String>,
    modified: bool,
    history: UndoRedoManager,
    log_enabled: bool,
    notifier: Notifier,
}

impl TextEditor {
    /// Create an editor over `content`, with logging off and a private notifier.
    pub fn new(file_path: impl Into<PathBuf>, content: &str) -> Self {
        Self::with_notifier(file_path, content, Notifier::new())
    }

    /// Create an editor that broadcasts through `notifier`.
    pub fn with_notifier(file_path: impl Into<PathBuf>, content: &str, notifier: Notifier) -> Self {
        Self {
            file_path: file_path.into(),
            lines: split_content(content),
            modified: false,
            history: UndoRedoManager::new(DEFAULT_MAX_UNDO),
            log_enabled: false,
            notifier,
        }
    }

    /// Cap the undo history.
    pub fn with_max_undo(mut self, max_undo: usize) -> Self {
        self.history = UndoRedoManager::new(max_undo);
        self
    }

    /// Set the log flag without touching the buffer.
    ///
    /// Used when loading a file whose first line already carries the marker.
    pub fn with_log_enabled(mut self, enabled: bool) -> Self {
        self.log_enabled = enabled;
        self
    }

    /// The line buffer.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        !self.history.undo_stack.is_empty()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        !self.history.redo_stack.is_empty()
    }

    /// Undo stack depth
    pub fn undo_depth(&self) -> usize {
        self.history.undo_stack.len()
    }

    /// Redo stack depth
    pub fn redo_depth(&self) -> usize {
        self.history.redo_stack.len()
    }

    /// Execute a command and record it for undo.
    ///
    /// The command is recorded even when validation rejected it: the redo stack is cleared and
    /// the editor is marked modified either way. Undoing a rejected command changes nothing.
    /// Returns whether the command executed.
    pub fn execute(&mut self, mut command: EditCommand) -> bool {
        command.execute(&mut self.lines);
        let executed = command.is_executed();
        if !executed {
            tracing::debug!(
                path = %self.file_path.display(),
                command = %command.describe(),
                "command rejected"
            );
        }

        if self.log_enabled {
            let mut data = command.payload();
            data["executed"] = executed.into();
            let event = WorkspaceEvent::new(
                self.file_path.clone(),
                command.event_kind(),
                command.describe(),
            )
            .with_data(data);
            self.notifier.notify(&event);
        }

        self.history.push_executed(command);
        self.modified = true;
        executed
    }

    fn add_log_marker(&mut self) {
        if self.lines.first().is_some_and(|line| has_log_marker(line)) {
            return;
        }
        self.lines.insert(0, LOG_MARKER.to_string());
        self.after_marker_change();
    }

    fn remove_log_marker(&mut self) {
        if !self.lines.first().is_some_and(|line| has_log_marker(line)) {
            return;
        }
        self.lines.remove(0);
        self.after_marker_change();
    }

    fn after_marker_change(&mut self) {
        // Recorded commands address lines by number; the marker shifted every line.
        self.history.clear();
        self.modified = true;
    }
}

impl Editor for TextEditor {
    fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn mark_as_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    fn content(&self) -> String {
        self.lines.join("\n")
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn undo(&mut self) -> bool {
        let Some(mut command) = self.history.undo_stack.pop() else {
            return false;
        };

        command.undo(&mut self.lines);
        self.history.redo_stack.push(command);
        self.modified = true;
        true
    }

    fn redo(&mut self) -> bool {
        let Some(mut command) = self.history.redo_stack.pop() else {
            tracing::info!(path = %self.file_path.display(), "redo stack is empty");
            return false;
        };

        command.execute(&mut self.lines);
        self.history.undo_stack.push(command);
        self.modified = true;
        true
    }

    fn show(&self, start_line: usize, end_line: usize) -> String {
        let line_count = self.lines.len();
        if line_count == 0 {
            return format!("{EMPTY_FILE_PLACEHOLDER}\n");
        }

        let start = start_line.max(1);
        let end = if end_line == 0 {
            line_count
        } else {
            end_line.min(line_count)
        };

        if start > line_count {
            return "start line is beyond end of file\n".to_string();
        }
        if start > end {
            return "start line must not be after end line\n".to_string();
        }

        let width = end.to_string().len();
        let mut out = String::new();
        for (idx, line) in self.lines[start - 1..end].iter().enumerate() {
            let _ = writeln!(out, "{:>width$}: {}", start + idx, line);
        }
        out
    }

    fn append(&mut self, text: &str) -> bool {
        self.execute(EditCommand::append(text))
    }

    fn insert(&mut self, line: usize, col: usize, text: &str) -> bool {
        self.execute(EditCommand::insert(line, col, text))
    }

    fn delete(&mut self, line: usize, col: usize, length: usize) -> bool {
        self.execute(EditCommand::delete(line, col, length))
    }

    fn replace(&mut self, line: usize, col: usize, length: usize, text: &str) -> bool {
        self.execute(EditCommand::replace(line, col, length, text))
    }

    fn set_log_enabled(&mut self, enabled: bool) {
        if self.log_enabled == enabled {
            return;
        }

        self.log_enabled = enabled;
        if enabled {
            self.add_log_marker();
        } else {
            self.remove_log_marker();
        }
    }

    fn is_log_enabled(&self) -> bool {
        self.log_enabled
    }
}
