//! Reversible edit commands.
//!
//! Every buffer mutation in `lined-core` is expressed as an [`EditCommand`]: a closed set of
//! variants (`Append`, `Insert`, `Delete`, `Replace`) that each know how to apply themselves to a
//! line buffer and how to invert that change.
//!
//! Undo information is snapshot based: a command stores the whole lines it overwrites rather
//! than a diff. Inverting a command therefore never has to recompute anything from the current
//! buffer, which keeps `execute → undo → execute` exact.
//!
//! # Coordinates
//!
//! Lines and columns are **1-based**. Columns count Unicode scalar values (`char`s), so a
//! multi-byte character occupies one column.
//!
//! # Validation
//!
//! Commands validate their coordinates against the buffer at execution time. An invalid command
//! is a silent no-op: the buffer is untouched and [`EditCommand::is_executed`] stays `false`.
//!
//! # Example
//!
//! ```rust
//! use lined_core::EditCommand;
//!
//! let mut lines = vec!["abcdef".to_string()];
//! let mut cmd = EditCommand::insert(1, 4, "XY\nZ");
//! cmd.execute(&mut lines);
//! assert_eq!(lines, vec!["abcXY", "Zdef"]);
//!
//! cmd.undo(&mut lines);
//! assert_eq!(lines, vec!["abcdef"]);
//! ```

use crate::event::EventKind;
use crate::text::{byte_offset, char_len, split_lines};
use serde_json::{Value, json};
use std::mem;

/// Lifecycle of a single command instance.
///
/// Legal transitions: `NotExecuted → Executed` (execute), `Executed → Undone` (undo) and
/// `Undone → Executed` (redo, which re-runs execute). Anything else is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommandState {
    /// Never executed, or every execution attempt was rejected by validation.
    #[default]
    NotExecuted,
    /// The last execute completed and has not been undone.
    Executed,
    /// Executed at least once, currently undone.
    Undone,
}

/// Append `text` after the last line, as a single line even if it holds `'\n'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendCommand {
    text: String,
    prev_lines: Vec<String>,
    state: CommandState,
}

impl AppendCommand {
    /// Create an append command.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            prev_lines: Vec::new(),
            state: CommandState::NotExecuted,
        }
    }

    /// Text being appended.
    pub fn text(&self) -> &str {
        &self.text
    }

    fn execute(&mut self, lines: &mut Vec<String>) {
        if self.state == CommandState::Executed {
            return;
        }

        self.prev_lines = lines.clone();
        lines.push(self.text.clone());
        self.state = CommandState::Executed;
    }

    fn undo(&mut self, lines: &mut Vec<String>) {
        if self.state != CommandState::Executed {
            return;
        }

        *lines = mem::take(&mut self.prev_lines);
        self.state = CommandState::Undone;
    }
}

/// Insert `text` at `(line, col)`. The text may contain line breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertCommand {
    line: usize,
    col: usize,
    text: String,
    /// Target line before insertion. `None` when the buffer was empty.
    prev_line: Option<String>,
    /// Number of lines the target line became.
    produced_lines: usize,
    state: CommandState,
}

impl InsertCommand {
    /// Create an insert command (1-based coordinates).
    pub fn new(line: usize, col: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            col,
            text: text.into(),
            prev_line: None,
            produced_lines: 0,
            state: CommandState::NotExecuted,
        }
    }

    /// Target line (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    /// Target column (1-based).
    pub fn col(&self) -> usize {
        self.col
    }

    /// Inserted text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Check the coordinates against `lines` without mutating anything.
    pub fn is_valid_for(&self, lines: &[String]) -> bool {
        if lines.is_empty() {
            return self.line == 1 && self.col == 1;
        }

        if self.line < 1 || self.line > lines.len() {
            return false;
        }

        let line_len = char_len(&lines[self.line - 1]);
        self.col >= 1 && self.col <= line_len + 1
    }

    fn execute(&mut self, lines: &mut Vec<String>) {
        if self.state == CommandState::Executed || !self.is_valid_for(lines) {
            return;
        }

        let line_idx = self.line - 1;
        let original = lines.get(line_idx).cloned();
        let current = original.as_deref().unwrap_or("");
        let (head, tail) = current.split_at(byte_offset(current, self.col - 1));

        // head + part[0], part[1..k-1], part[k-1] + tail
        let mut replacement = split_lines(&self.text);
        replacement[0].insert_str(0, head);
        if let Some(last) = replacement.last_mut() {
            last.push_str(tail);
        }
        self.produced_lines = replacement.len();

        if original.is_some() {
            lines.splice(line_idx..=line_idx, replacement);
        } else {
            lines.extend(replacement);
        }

        self.prev_line = original;
        self.state = CommandState::Executed;
    }

    fn undo(&mut self, lines: &mut Vec<String>) {
        if self.state != CommandState::Executed {
            return;
        }

        let line_idx = (self.line - 1).min(lines.len());
        let end = (line_idx + self.produced_lines).min(lines.len());
        lines.splice(line_idx..end, self.prev_line.take());
        self.state = CommandState::Undone;
    }
}

/// Delete `length` characters from `line`, starting at `col`. Never crosses a line boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCommand {
    line: usize,
    col: usize,
    length: usize,
    prev_line: String,
    state: CommandState,
}

impl DeleteCommand {
    /// Create a delete command (1-based coordinates).
    pub fn new(line: usize, col: usize, length: usize) -> Self {
        Self {
            line,
            col,
            length,
            prev_line: String::new(),
            state: CommandState::NotExecuted,
        }
    }

    /// Target line (1-based).
    pub fn line(&self) -> usize {
        self.line
    }

    /// First deleted column (1-based).
    pub fn col(&self) -> usize {
        self.col
    }

    /// Number of characters deleted.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Check the range against `lines` without mutating anything.
    pub fn is_valid_for(&self, lines: &[String]) -> bool {
        if self.line < 1 || self.line > lines.len() {
            return false;
        }

        let line_len = char_len(&lines[self.line - 1]);
        if self.col < 1 || self.col - 1 >= line_len || self.length == 0 {
            return false;
        }

        self.col - 1 + self.length <= line_len
    }

    fn execute(&mut self, lines: &mut [String]) {
        if self.state == CommandState::Executed || !self.is_valid_for(lines) {
            return;
        }

        let target = &mut lines[self.line - 1];
        self.prev_line = target.clone();

        let start = byte_offset(target, self.col - 1);
        let end = byte_offset(target, self.col - 1 + self.length);
        target.replace_range(start..end, "");
        self.state = CommandState::Executed;
    }

    fn undo(&mut self, lines: &mut [String]) {
        if self.state != CommandState::Executed {
            return;
        }

        if let Some(target) = lines.get_mut(self.line - 1) {
            *target = mem::take(&mut self.prev_line);
        }
        self.state = CommandState::Undone;
    }
}

/// Replace `length` characters at `(line, col)` with `text`.
///
/// Executes an internal delete, then an internal insert at the **same** coordinates. This is
/// sound because a delete never changes the line count and always leaves `col` within
/// `len(line) + 1`.
///
/// Replace is atomic: if the insert half is rejected after the delete half succeeded, the
/// delete is rolled back and the command stays unexecuted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceCommand {
    delete: DeleteCommand,
    insert: InsertCommand,
    state: CommandState,
}

impl ReplaceCommand {
    /// Create a replace command (1-based coordinates).
    pub fn new(line: usize, col: usize, length: usize, text: impl Into<String>) -> Self {
        Self {
            delete: DeleteCommand::new(line, col, length),
            insert: InsertCommand::new(line, col, text),
            state: CommandState::NotExecuted,
        }
    }

    /// Target line (1-based).
    pub fn line(&self) -> usize {
        self.delete.line
    }

    /// First replaced column (1-based).
    pub fn col(&self) -> usize {
        self.delete.col
    }

    /// Number of characters replaced.
    pub fn length(&self) -> usize {
        self.delete.length
    }

    /// Replacement text.
    pub fn text(&self) -> &str {
        &self.insert.text
    }

    fn execute(&mut self, lines: &mut Vec<String>) {
        if self.state == CommandState::Executed {
            return;
        }

        self.delete.execute(lines);
        if self.delete.state != CommandState::Executed {
            return;
        }

        self.insert.execute(lines);
        if self.insert.state != CommandState::Executed {
            self.delete.undo(lines);
            return;
        }

        self.state = CommandState::Executed;
    }

    fn undo(&mut self, lines: &mut Vec<String>) {
        if self.state != CommandState::Executed {
            return;
        }

        self.insert.undo(lines);
        self.delete.undo(lines);
        self.state = CommandState::Undone;
    }
}

/// A reversible buffer mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Append a final line.
    Append(AppendCommand),
    /// Insert text (possibly multi-line) inside a line.
    Insert(InsertCommand),
    /// Delete a range within one line.
    Delete(DeleteCommand),
    /// Delete a range, then insert text at its start.
    Replace(ReplaceCommand),
}

impl EditCommand {
    /// Build an [`AppendCommand`].
    pub fn append(text: impl Into<String>) -> Self {
        Self::Append(AppendCommand::new(text))
    }

    /// Build an [`InsertCommand`].
    pub fn insert(line: usize, col: usize, text: impl Into<String>) -> Self {
        Self::Insert(InsertCommand::new(line, col, text))
    }

    /// Build a [`DeleteCommand`].
    pub fn delete(line: usize, col: usize, length: usize) -> Self {
        Self::Delete(DeleteCommand::new(line, col, length))
    }

    /// Build a [`ReplaceCommand`].
    pub fn replace(line: usize, col: usize, length: usize, text: impl Into<String>) -> Self {
        Self::Replace(ReplaceCommand::new(line, col, length, text))
    }

    /// Apply the command. A no-op if already executed or if validation fails.
    pub fn execute(&mut self, lines: &mut Vec<String>) {
        match self {
            Self::Append(cmd) => cmd.execute(lines),
            Self::Insert(cmd) => cmd.execute(lines),
            Self::Delete(cmd) => cmd.execute(lines),
            Self::Replace(cmd) => cmd.execute(lines),
        }
    }

    /// Invert the command. A no-op unless the command is currently executed.
    pub fn undo(&mut self, lines: &mut Vec<String>) {
        match self {
            Self::Append(cmd) => cmd.undo(lines),
            Self::Insert(cmd) => cmd.undo(lines),
            Self::Delete(cmd) => cmd.undo(lines),
            Self::Replace(cmd) => cmd.undo(lines),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CommandState {
        match self {
            Self::Append(cmd) => cmd.state,
            Self::Insert(cmd) => cmd.state,
            Self::Delete(cmd) => cmd.state,
            Self::Replace(cmd) => cmd.state,
        }
    }

    /// Whether an execution has fully completed. Stays `true` after undo.
    pub fn is_executed(&self) -> bool {
        self.state() != CommandState::NotExecuted
    }

    /// The event kind reported to observers for this command.
    pub fn event_kind(&self) -> EventKind {
        match self {
            Self::Append(_) => EventKind::Append,
            Self::Insert(_) => EventKind::Insert,
            Self::Delete(_) => EventKind::Delete,
            Self::Replace(_) => EventKind::Replace,
        }
    }

    /// Human-readable reconstruction of the originating call, e.g. `Insert 1,4 text`.
    pub fn describe(&self) -> String {
        match self {
            Self::Append(cmd) => format!("Append {}", cmd.text),
            Self::Insert(cmd) => format!("Insert {},{} {}", cmd.line, cmd.col, cmd.text),
            Self::Delete(cmd) => format!("Delete {},{},{}", cmd.line, cmd.col, cmd.length),
            Self::Replace(cmd) => format!(
                "Replace {},{},{} {}",
                cmd.line(),
                cmd.col(),
                cmd.length(),
                cmd.text()
            ),
        }
    }

    /// Call arguments as a JSON object, used as the event payload.
    pub fn payload(&self) -> Value {
        match self {
            Self::Append(cmd) => json!({ "text": cmd.text }),
            Self::Insert(cmd) => json!({ "line": cmd.line, "col": cmd.col, "text": cmd.text }),
            Self::Delete(cmd) => {
                json!({ "line": cmd.line, "col": cmd.col, "length": cmd.length })
            }
            Self::Replace(cmd) => json!({
                "line": cmd.line(),
                "col": cmd.col(),
                "length": cmd.length(),
                "text": cmd.text(),
            }),
        }
    }
}
