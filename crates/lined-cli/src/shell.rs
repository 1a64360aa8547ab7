//! Command dispatch for the `lined` shell.

use crate::error::CliError;
use crate::parser::{CliCommand, CommandParser, HELP, SaveTarget};
use lined_core::{
    Editor, FileLogger, TextEditorFactory, Workspace, WorkspaceConfig, WorkspaceError,
};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

/// What the read loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text and read the next line.
    Continue(String),
    /// Print the text and stop.
    Exit(String),
}

/// Interactive session over one [`Workspace`].
#[derive(Debug)]
pub struct Shell {
    workspace: Workspace,
    parser: CommandParser,
    factory: TextEditorFactory,
}

impl Shell {
    /// Create a session. Every logged file gets an audit trail through [`FileLogger`].
    pub fn new(config: WorkspaceConfig) -> Result<Self, CliError> {
        let workspace = Workspace::new(config);
        workspace.register_observer(Arc::new(FileLogger::new()));
        Ok(Self {
            workspace,
            parser: CommandParser::new()?,
            factory: TextEditorFactory,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Reopen the files of the previous session. A first run (no saved state) is not an error.
    pub fn restore(&mut self) -> Result<String, CliError> {
        match self.workspace.restore_state(&self.factory) {
            Ok(()) => Ok(format!(
                "restored {} file(s)\n",
                self.workspace.len()
            )),
            Err(WorkspaceError::NoSavedState(path)) => {
                tracing::debug!(path = %path.display(), "no saved state, starting fresh");
                Ok(String::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse and run one input line.
    pub fn handle_line(&mut self, line: &str) -> Result<Outcome, CliError> {
        match self.parser.parse(line)? {
            Some(command) => self.execute(command),
            None => Ok(Outcome::Continue(String::new())),
        }
    }

    pub fn execute(&mut self, command: CliCommand) -> Result<Outcome, CliError> {
        let out = match command {
            CliCommand::Load(file) => {
                let editor = self.workspace.load_file(&file, &self.factory)?;
                format!("opened {}\n", editor.file_path().display())
            }
            CliCommand::Save(SaveTarget::Active) => {
                self.workspace.save_active()?;
                "saved\n".to_string()
            }
            CliCommand::Save(SaveTarget::File(file)) => {
                self.workspace.save_file(&file)?;
                "saved\n".to_string()
            }
            CliCommand::Save(SaveTarget::All) => {
                let count = self.workspace.save_all()?;
                format!("saved {count} file(s)\n")
            }
            CliCommand::Close(file) => {
                let path = self.target_path(file)?;
                let discarded = self
                    .workspace
                    .editor(&path)
                    .is_some_and(|editor| editor.is_modified());
                self.workspace.close_path(&path)?;
                if discarded {
                    format!("closed {} (unsaved changes discarded)\n", path.display())
                } else {
                    format!("closed {}\n", path.display())
                }
            }
            CliCommand::Edit(file) => {
                let path = self.workspace.resolve_path(&file)?;
                if !self.workspace.set_active_editor(&path) {
                    return Err(WorkspaceError::NotOpen(path).into());
                }
                String::new()
            }
            CliCommand::EditorList => self.editor_list(),
            CliCommand::Init { file, with_log } => {
                let path = self.workspace.resolve_path(&file)?;
                if path.exists() {
                    return Err(CliError::AlreadyExists(path));
                }
                let editor = self.workspace.load_file(&file, &self.factory)?;
                editor.set_log_enabled(with_log);
                format!("created {}\n", path.display())
            }
            CliCommand::Append(text) => rejected_unless(self.active_mut()?.append(&text)),
            CliCommand::Insert { line, col, text } => {
                rejected_unless(self.active_mut()?.insert(line, col, &text))
            }
            CliCommand::Delete { line, col, length } => {
                rejected_unless(self.active_mut()?.delete(line, col, length))
            }
            CliCommand::Replace {
                line,
                col,
                length,
                text,
            } => rejected_unless(self.active_mut()?.replace(line, col, length, &text)),
            CliCommand::Show { start, end } => {
                let editor = self
                    .workspace
                    .active_editor()
                    .ok_or(CliError::NoActiveFile)?;
                editor.show(start, end)
            }
            CliCommand::Undo => {
                if self.active_mut()?.undo() {
                    String::new()
                } else {
                    "nothing to undo\n".to_string()
                }
            }
            CliCommand::Redo => {
                if self.active_mut()?.redo() {
                    String::new()
                } else {
                    "nothing to redo\n".to_string()
                }
            }
            CliCommand::LogOn(file) => self.set_log(file, true)?,
            CliCommand::LogOff(file) => self.set_log(file, false)?,
            CliCommand::LogShow(file) => {
                let path = self.target_path(file)?;
                match FileLogger::read_log(&path) {
                    Ok(Some(log)) => log,
                    Ok(None) => format!("no log for {}\n", path.display()),
                    Err(source) => return Err(CliError::ReadLog { path, source }),
                }
            }
            CliCommand::Help => format!("{HELP}\n"),
            CliCommand::Exit => {
                self.workspace.save_state()?;
                let dirty = self.workspace.dirty_paths();
                let mut out = String::new();
                if !dirty.is_empty() {
                    let _ = writeln!(out, "unsaved files kept for next session:");
                    for path in dirty {
                        let _ = writeln!(out, "  {}", path.display());
                    }
                }
                return Ok(Outcome::Exit(out));
            }
        };
        Ok(Outcome::Continue(out))
    }

    fn active_mut(&mut self) -> Result<&mut dyn Editor, CliError> {
        self.workspace
            .active_editor_mut()
            .ok_or(CliError::NoActiveFile)
    }

    /// The named file, or the active one.
    fn target_path(&self, file: Option<String>) -> Result<PathBuf, CliError> {
        match file {
            Some(file) => Ok(self.workspace.resolve_path(&file)?),
            None => self
                .workspace
                .active_path()
                .map(|path| path.to_path_buf())
                .ok_or(CliError::NoActiveFile),
        }
    }

    fn set_log(&mut self, file: Option<String>, enabled: bool) -> Result<String, CliError> {
        let path = self.target_path(file)?;
        let editor = self
            .workspace
            .editor_mut(&path)
            .ok_or_else(|| WorkspaceError::NotOpen(path.clone()))?;
        editor.set_log_enabled(enabled);
        Ok(String::new())
    }

    fn editor_list(&self) -> String {
        let active = self.workspace.active_path();
        let mut out = String::new();
        for path in self.workspace.editor_paths() {
            let marker = if Some(path) == active { '>' } else { ' ' };
            let modified = self
                .workspace
                .editor(path)
                .is_some_and(|editor| editor.is_modified());
            let _ = writeln!(
                out,
                "{marker} {}{}",
                path.display(),
                if modified { " *" } else { "" }
            );
        }
        if out.is_empty() {
            out.push_str("no open files\n");
        }
        out
    }
}

fn rejected_unless(executed: bool) -> String {
    if executed {
        String::new()
    } else {
        "command rejected: position or length out of range\n".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn shell_in(dir: &Path) -> Shell {
        Shell::new(
            WorkspaceConfig::default()
                .with_files_root(dir.join("files"))
                .with_memento_path(dir.join("state.json")),
        )
        .unwrap()
    }

    fn run(shell: &mut Shell, line: &str) -> String {
        match shell.handle_line(line).unwrap() {
            Outcome::Continue(out) | Outcome::Exit(out) => out,
        }
    }

    #[test]
    fn test_edit_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());

        run(&mut shell, "load a.txt");
        run(&mut shell, r#"append "hello""#);
        run(&mut shell, r#"insert 2:6 ", world""#);
        assert_eq!(run(&mut shell, "show"), "1: \n2: hello, world\n");

        assert_eq!(
            run(&mut shell, "delete 9:1 1"),
            "command rejected: position or length out of range\n"
        );
        // The rejected delete is on the undo stack; undoing it changes nothing.
        assert_eq!(run(&mut shell, "undo"), "");
        assert_eq!(run(&mut shell, "show 2:2"), "2: hello, world\n");
        run(&mut shell, "undo");
        assert_eq!(run(&mut shell, "show 2:2"), "2: hello\n");
        run(&mut shell, "redo");
        run(&mut shell, "redo");
        assert_eq!(run(&mut shell, "redo"), "nothing to redo\n");

        run(&mut shell, "save");
        assert_eq!(
            std::fs::read_to_string(dir.path().join("files/a.txt")).unwrap(),
            "\nhello, world"
        );
    }

    #[test]
    fn test_editor_list_marks_active_and_modified() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        run(&mut shell, "load a.txt");
        run(&mut shell, "save");
        run(&mut shell, "load b.txt");

        let a = dir.path().join("files/a.txt");
        let b = dir.path().join("files/b.txt");
        assert_eq!(
            run(&mut shell, "editor-list"),
            format!("  {}\n> {} *\n", a.display(), b.display())
        );
    }

    #[test]
    fn test_requires_active_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        assert!(matches!(
            shell.handle_line("undo"),
            Err(CliError::NoActiveFile)
        ));
        assert!(matches!(
            shell.handle_line("edit a.txt"),
            Err(CliError::Workspace(WorkspaceError::NotOpen(_)))
        ));
    }

    #[test]
    fn test_init_with_log_and_log_show() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        run(&mut shell, "init log.txt with-log");
        run(&mut shell, r#"append "entry""#);

        let log = run(&mut shell, "log-show");
        assert!(log.starts_with("session start at "));
        assert!(log.ends_with(" Append entry\n"));

        assert!(matches!(
            shell.handle_line("init log.txt"),
            Err(CliError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_exit_saves_state_for_next_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut shell = shell_in(dir.path());
        run(&mut shell, "load a.txt");
        run(&mut shell, "load b.txt");
        run(&mut shell, "edit a.txt");
        assert!(matches!(
            shell.handle_line("exit").unwrap(),
            Outcome::Exit(_)
        ));

        let mut next = shell_in(dir.path());
        assert_eq!(next.restore().unwrap(), "restored 2 file(s)\n");
        assert_eq!(
            next.workspace().active_path(),
            Some(dir.path().join("files/a.txt").as_path())
        );
    }
}
