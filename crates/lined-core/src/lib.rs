#![warn(missing_docs)]
//! lined-core - Line Editor Kernel With Undo/Redo and a Multi-File Workspace
//!
//! # Overview
//!
//! `lined-core` keeps text files in memory as line buffers and mutates them through reversible
//! commands. A [`Workspace`] tracks which files are open, which one is active, which carry
//! unsaved changes and which have change logging turned on, and can persist that state to disk
//! and restore it later.
//!
//! # Core Features
//!
//! - **Reversible Commands**: `Append`, `Insert`, `Delete`, `Replace`, each storing the lines it
//!   overwrites so undo is exact
//! - **Undo/Redo History**: per-editor stacks, capped by [`WorkspaceConfig::max_undo`]
//! - **Workspace Registry**: open editors keyed by path, with one active editor
//! - **Change Logging**: a `# log` first line turns on event broadcast to [`Observer`]s
//! - **State Persistence**: JSON snapshots via [`WorkspaceMemento`]
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Workspace (registry + memento)             │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  EditorFactory (file type dispatch)         │  ← Construction
//! ├─────────────────────────────────────────────┤
//! │  Editor / TextEditor (undo/redo history)    │  ← Per-file state
//! ├─────────────────────────────────────────────┤
//! │  EditCommand (Append/Insert/Delete/Replace) │  ← Buffer mutation
//! ├─────────────────────────────────────────────┤
//! │  Notifier / Observer                        │  ← Change events
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use lined_core::{Editor, TextEditorFactory, Workspace, WorkspaceConfig};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let config = WorkspaceConfig::default()
//!     .with_files_root(dir.path().join("files"))
//!     .with_memento_path(dir.path().join("state.json"));
//! let mut ws = Workspace::new(config);
//!
//! let editor = ws.load_file("notes.txt", &TextEditorFactory).unwrap();
//! editor.append("hello");
//! editor.insert(2, 6, ", world");
//! assert_eq!(editor.content(), "\nhello, world");
//!
//! ws.save_file("notes.txt").unwrap();
//! ws.save_state().unwrap();
//! ```
//!
//! # Module Description
//!
//! - [`commands`] - Reversible edit commands
//! - [`editor`] - Line-buffer editor and its undo/redo history
//! - [`workspace`] - Open-file registry and state persistence
//! - [`factory`] - Editor construction by file type
//! - [`event`] - Change events and the observer channel
//! - [`logger`] - Per-file audit log observer
//! - [`memento`] - Persisted workspace snapshot
//! - [`config`] - Workspace options

pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod event;
pub mod factory;
pub mod logger;
pub mod memento;
mod text;
pub mod workspace;

pub use commands::{
    AppendCommand, CommandState, DeleteCommand, EditCommand, InsertCommand, ReplaceCommand,
};
pub use config::{DEFAULT_FILES_ROOT, DEFAULT_MAX_UNDO, DEFAULT_MEMENTO_PATH, WorkspaceConfig};
pub use editor::{EMPTY_FILE_PLACEHOLDER, Editor, LOG_MARKER, TextEditor, has_log_marker};
pub use error::WorkspaceError;
pub use event::{EventKind, EventRecorder, Notifier, Observer, WorkspaceEvent};
pub use factory::{EditorFactory, TEXT_EXTENSIONS, TextEditorFactory};
pub use logger::FileLogger;
pub use memento::{FileState, WorkspaceMemento};
pub use workspace::Workspace;
