//! Multi-file workspace.
//!
//! A [`Workspace`] owns:
//! - the registry of open editors, keyed by their full path
//! - the active-editor pointer (always a registered path, or nothing)
//! - the observer list, shared with every editor it creates through a [`Notifier`]
//! - the memento protocol: [`Workspace::save_state`] / [`Workspace::restore_state`]
//!
//! File names given to [`Workspace::load_file`], [`Workspace::save_file`] and
//! [`Workspace::close_file`] are resolved under [`WorkspaceConfig::files_root`].
//!
//! The workspace is an explicitly constructed value; nothing here is global. It is `Send`, but
//! not internally synchronized: share it across threads behind a mutex.

use crate::config::WorkspaceConfig;
use crate::editor::Editor;
use crate::error::WorkspaceError;
use crate::event::{EventKind, Notifier, Observer, WorkspaceEvent};
use crate::factory::EditorFactory;
use crate::memento::{FileState, WorkspaceMemento};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn ensure_parent_dir(path: &Path) -> Result<(), WorkspaceError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| WorkspaceError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}

/// A collection of open editors.
pub struct Workspace {
    config: WorkspaceConfig,
    editors: BTreeMap<PathBuf, Box<dyn Editor>>,
    active: Option<PathBuf>,
    notifier: Notifier,
}

impl std::fmt::Debug for Workspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workspace")
            .field("editor_count", &self.editors.len())
            .field("active", &self.active)
            .field("observer_count", &self.notifier.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceConfig::default())
    }
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new(config: WorkspaceConfig) -> Self {
        Self {
            config,
            editors: BTreeMap::new(),
            active: None,
            notifier: Notifier::new(),
        }
    }

    /// Configuration in effect.
    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    /// Handle to the observer list. Editors created by this workspace hold clones of it.
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Returns the number of open editors.
    pub fn len(&self) -> usize {
        self.editors.len()
    }

    /// Returns `true` if no editor is open.
    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    /// Resolve a bare file name under the files root.
    pub fn resolve_path(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::EmptyPath);
        }
        Ok(self.config.files_root.join(name))
    }

    /// Paths of all open editors, in key order.
    pub fn editor_paths(&self) -> impl Iterator<Item = &Path> {
        self.editors.keys().map(PathBuf::as_path)
    }

    /// Paths of open editors with unsaved changes.
    pub fn dirty_paths(&self) -> Vec<&Path> {
        self.editors
            .iter()
            .filter(|(_, editor)| editor.is_modified())
            .map(|(path, _)| path.as_path())
            .collect()
    }

    /// Look up an editor by full path.
    pub fn editor(&self, path: &Path) -> Option<&dyn Editor> {
        self.editors.get(path).map(|editor| editor.as_ref())
    }

    /// Look up an editor by full path, mutably.
    pub fn editor_mut(&mut self, path: &Path) -> Option<&mut dyn Editor> {
        let editor = self.editors.get_mut(path)?;
        Some(editor.as_mut())
    }

    /// Path of the active editor.
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_deref()
    }

    /// The active editor.
    pub fn active_editor(&self) -> Option<&dyn Editor> {
        let path = self.active.as_ref()?;
        self.editor(path)
    }

    /// The active editor, mutably.
    pub fn active_editor_mut(&mut self) -> Option<&mut dyn Editor> {
        let path = self.active.as_ref()?;
        let editor = self.editors.get_mut(path)?;
        Some(editor.as_mut())
    }

    /// Make the editor at `path` active. Does nothing (and returns `false`) unless it is open.
    pub fn set_active_editor(&mut self, path: &Path) -> bool {
        if !self.editors.contains_key(path) {
            return false;
        }
        self.active = Some(path.to_path_buf());
        true
    }

    /// Open `name` (resolved under the files root) and make it active.
    ///
    /// An already-open file is only activated; the factory is not consulted again.
    pub fn load_file(
        &mut self,
        name: &str,
        factory: &dyn EditorFactory,
    ) -> Result<&mut dyn Editor, WorkspaceError> {
        let path = self.resolve_path(name)?;

        if !self.editors.contains_key(&path) {
            ensure_parent_dir(&path)?;
            let editor = factory.create(&path, self.notifier.clone(), &self.config)?;
            tracing::info!(path = %path.display(), "opened file");
            self.editors.insert(path.clone(), editor);
        }

        self.active = Some(path.clone());
        let editor = self
            .editors
            .get_mut(&path)
            .ok_or(WorkspaceError::NotOpen(path))?;
        Ok(editor.as_mut())
    }

    /// Write `name` (resolved under the files root) to disk.
    pub fn save_file(&mut self, name: &str) -> Result<(), WorkspaceError> {
        let path = self.resolve_path(name)?;
        self.save_path(&path)
    }

    /// Write the active editor to disk.
    pub fn save_active(&mut self) -> Result<(), WorkspaceError> {
        let path = self.active.clone().ok_or(WorkspaceError::NoActiveEditor)?;
        self.save_path(&path)
    }

    /// Write every open editor to disk. Returns how many files were written.
    pub fn save_all(&mut self) -> Result<usize, WorkspaceError> {
        let paths: Vec<PathBuf> = self.editors.keys().cloned().collect();
        for path in &paths {
            self.save_path(path)?;
        }
        Ok(paths.len())
    }

    /// Write the editor registered at the full `path` to disk.
    ///
    /// Clears the modified flag and, if logging is on, broadcasts a `Save` event.
    pub fn save_path(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        if path.as_os_str().is_empty() {
            return Err(WorkspaceError::EmptyPath);
        }
        let Some(editor) = self.editors.get_mut(path) else {
            return Err(WorkspaceError::NotOpen(path.to_path_buf()));
        };

        ensure_parent_dir(path)?;
        fs::write(path, editor.content()).map_err(|source| WorkspaceError::WriteFile {
            path: path.to_path_buf(),
            source,
        })?;
        editor.mark_as_modified(false);
        tracing::info!(path = %path.display(), "saved file");

        if editor.is_log_enabled() {
            let event = WorkspaceEvent::new(
                path,
                EventKind::Save,
                format!("Save {}", path.display()),
            )
            .with_data(json!({ "lines": editor.line_count() }));
            self.notifier.notify(&event);
        }
        Ok(())
    }

    /// Close `name` (resolved under the files root).
    pub fn close_file(&mut self, name: &str) -> Result<(), WorkspaceError> {
        let path = self.resolve_path(name)?;
        self.close_path(&path)
    }

    /// Close the editor registered at the full `path`.
    ///
    /// Unsaved changes are discarded. If the closed editor was active, some other open editor
    /// (unspecified which) becomes active, or none if the workspace is now empty.
    pub fn close_path(&mut self, path: &Path) -> Result<(), WorkspaceError> {
        let Some(editor) = self.editors.get(path) else {
            return Err(WorkspaceError::NotOpen(path.to_path_buf()));
        };

        if editor.is_log_enabled() {
            let event = WorkspaceEvent::new(
                path,
                EventKind::Close,
                format!("Close {}", path.display()),
            )
            .with_data(json!({ "modified": editor.is_modified() }));
            self.notifier.notify(&event);
        }

        self.editors.remove(path);
        tracing::info!(path = %path.display(), "closed file");

        if self.active.as_deref() == Some(path) {
            self.active = self.editors.keys().next().cloned();
        }
        Ok(())
    }

    /// Register an observer (by identity; registering twice is a no-op).
    pub fn register_observer(&self, observer: Arc<dyn Observer>) -> bool {
        self.notifier.register(observer)
    }

    /// Remove an observer by identity.
    pub fn remove_observer(&self, observer: &Arc<dyn Observer>) -> bool {
        self.notifier.remove(observer)
    }

    /// Deliver `event` to every observer, in registration order.
    pub fn notify_observers(&self, event: &WorkspaceEvent) {
        self.notifier.notify(event);
    }

    /// Snapshot the current registry.
    pub fn create_memento(&self) -> WorkspaceMemento {
        WorkspaceMemento {
            opened_file_paths: self.editors.keys().cloned().collect(),
            active_file_path: self.active.clone().unwrap_or_default(),
            modified_file_paths: self
                .editors
                .iter()
                .filter(|(_, editor)| editor.is_modified())
                .map(|(path, _)| path.clone())
                .collect(),
            file_states: self
                .editors
                .iter()
                .map(|(path, editor)| FileState {
                    file_path: path.clone(),
                    log_enabled: editor.is_log_enabled(),
                })
                .collect(),
        }
    }

    /// Persist a fresh memento to [`WorkspaceConfig::memento_path`].
    pub fn save_state(&self) -> Result<(), WorkspaceError> {
        let memento = self.create_memento();
        memento.write_to(&self.config.memento_path)?;
        tracing::info!(
            path = %self.config.memento_path.display(),
            files = memento.opened_file_paths.len(),
            "saved workspace state"
        );
        Ok(())
    }

    /// Re-open the files recorded by [`Workspace::save_state`].
    ///
    /// Each recorded path is opened through `factory` (paths that are already open are kept
    /// as they are). Then each editor gets its recorded log flag, then its recorded modified
    /// flag, and the recorded active file becomes active again if it was reopened.
    pub fn restore_state(&mut self, factory: &dyn EditorFactory) -> Result<(), WorkspaceError> {
        let memento = WorkspaceMemento::read_from(&self.config.memento_path)?;

        for path in &memento.opened_file_paths {
            if self.editors.contains_key(path) {
                continue;
            }
            ensure_parent_dir(path)?;
            let editor = factory.create(path, self.notifier.clone(), &self.config)?;
            self.editors.insert(path.clone(), editor);
        }

        for path in &memento.opened_file_paths {
            let Some(editor) = self.editors.get_mut(path) else {
                continue;
            };
            if let Some(log_enabled) = memento.log_enabled(path) {
                editor.set_log_enabled(log_enabled);
            }
            editor.mark_as_modified(memento.is_modified(path));
        }

        if let Some(active) = memento.active()
            && self.editors.contains_key(active)
        {
            self.active = Some(active.to_path_buf());
        }

        tracing::info!(
            path = %self.config.memento_path.display(),
            files = memento.opened_file_paths.len(),
            "restored workspace state"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::TextEditor;

    fn memory_factory(
        path: &Path,
        notifier: Notifier,
        _: &WorkspaceConfig,
    ) -> Result<Box<dyn Editor>, WorkspaceError> {
        Ok(Box::new(TextEditor::with_notifier(path, "seed", notifier)))
    }

    #[test]
    fn test_resolve_path_rejects_empty() {
        let ws = Workspace::default();
        assert!(matches!(ws.resolve_path("  "), Err(WorkspaceError::EmptyPath)));
        assert_eq!(ws.resolve_path("a.txt").unwrap(), PathBuf::from("files/a.txt"));
    }

    #[test]
    fn test_set_active_requires_open_editor() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(WorkspaceConfig::default().with_files_root(dir.path()));
        ws.load_file("a.txt", &memory_factory).unwrap();
        ws.load_file("b.txt", &memory_factory).unwrap();

        let a = dir.path().join("a.txt");
        assert!(ws.set_active_editor(&a));
        assert_eq!(ws.active_path(), Some(a.as_path()));
        assert!(!ws.set_active_editor(&dir.path().join("missing.txt")));
        assert_eq!(ws.active_path(), Some(a.as_path()));
    }

    #[test]
    fn test_load_open_file_only_activates() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(WorkspaceConfig::default().with_files_root(dir.path()));

        ws.load_file("a.txt", &memory_factory).unwrap().append("edit");
        ws.load_file("b.txt", &memory_factory).unwrap();
        let again = ws.load_file("a.txt", &memory_factory).unwrap();
        assert_eq!(again.content(), "seed\nedit");
        assert_eq!(ws.len(), 2);
        assert_eq!(ws.active_path(), Some(dir.path().join("a.txt").as_path()));
    }

    #[test]
    fn test_memento_reflects_live_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::new(WorkspaceConfig::default().with_files_root(dir.path()));
        ws.load_file("a.txt", &memory_factory).unwrap().append("x");
        ws.load_file("b.txt", &memory_factory)
            .unwrap()
            .set_log_enabled(true);
        ws.editor_mut(&dir.path().join("b.txt"))
            .unwrap()
            .mark_as_modified(false);

        let memento = ws.create_memento();
        assert_eq!(memento.opened_file_paths.len(), 2);
        assert_eq!(memento.active(), Some(dir.path().join("b.txt").as_path()));
        assert_eq!(memento.modified_file_paths, vec![dir.path().join("a.txt")]);
        assert_eq!(memento.log_enabled(&dir.path().join("b.txt")), Some(true));

        ws.close_file("b.txt").unwrap();
        assert_eq!(ws.create_memento().file_states.len(), 1);
    }
}
