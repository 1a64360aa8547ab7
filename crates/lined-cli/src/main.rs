//! `lined`: interactive line editor shell.
//!
//! Reads one command per line from stdin. On start the previous session (open files, active
//! file, modified and log flags) is restored; `exit` or end of input saves it again.
//!
//! # Usage
//!
//! ```bash
//! cargo run -p lined-cli -- [--files-root <dir>] [--state <file>] [--config <file.json>]
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG=lined_core=debug` for command-level tracing.

mod error;
mod parser;
mod shell;

use error::CliError;
use lined_core::WorkspaceConfig;
use parser::CliCommand;
use shell::{Outcome, Shell};
use std::env;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: lined [--files-root <dir>] [--state <file>] [--config <file.json>]";

/// Build the workspace configuration from command-line options. `Ok(None)` means `--help`.
///
/// `--config` is applied first; `--files-root` and `--state` override it.
fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<WorkspaceConfig>, CliError> {
    let mut config_file: Option<PathBuf> = None;
    let mut files_root: Option<PathBuf> = None;
    let mut state: Option<PathBuf> = None;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let slot = match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => &mut config_file,
            "--files-root" => &mut files_root,
            "--state" => &mut state,
            _ => return Err(CliError::UnknownOption(arg)),
        };
        let value = args.next().ok_or_else(|| CliError::MissingArgument(arg.clone()))?;
        *slot = Some(PathBuf::from(value));
    }

    let mut config: WorkspaceConfig = match config_file {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            serde_json::from_str(&text).map_err(CliError::Config)?
        }
        None => WorkspaceConfig::default(),
    };
    if let Some(files_root) = files_root {
        config = config.with_files_root(files_root);
    }
    if let Some(state) = state {
        config = config.with_memento_path(state);
    }
    Ok(Some(config))
}

fn run(shell: &mut Shell) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    match shell.restore() {
        Ok(message) => write!(stdout, "{message}")?,
        Err(e) => eprintln!("warning: could not restore previous session: {e}"),
    }

    write!(stdout, "> ")?;
    stdout.flush()?;
    for line in stdin.lock().lines() {
        match shell.handle_line(&line?) {
            Ok(Outcome::Continue(out)) => write!(stdout, "{out}")?,
            Ok(Outcome::Exit(out)) => {
                write!(stdout, "{out}")?;
                return Ok(());
            }
            Err(e) => writeln!(stdout, "error: {e}")?,
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    // End of input behaves like `exit`.
    writeln!(stdout)?;
    match shell.execute(CliCommand::Exit) {
        Ok(Outcome::Continue(out) | Outcome::Exit(out)) => write!(stdout, "{out}")?,
        Err(e) => eprintln!("error: {e}"),
    }
    Ok(())
}

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = match parse_args(env::args().skip(1)) {
        Ok(Some(config)) => config,
        Ok(None) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("{USAGE}");
            process::exit(2);
        }
    };
    tracing::debug!(?config, "starting lined");

    let mut shell = match Shell::new(config) {
        Ok(shell) => shell,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    run(&mut shell)?;
    tracing::debug!(open_files = shell.workspace().len(), "session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_defaults_and_overrides() {
        assert_eq!(
            parse_args(args(&[])).unwrap(),
            Some(WorkspaceConfig::default())
        );

        let config = parse_args(args(&["--files-root", "docs", "--state", "s.json"]))
            .unwrap()
            .unwrap();
        assert_eq!(config.files_root, PathBuf::from("docs"));
        assert_eq!(config.memento_path, PathBuf::from("s.json"));
        assert_eq!(parse_args(args(&["--help"])).unwrap(), None);
    }

    #[test]
    fn test_parse_args_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lined.json");
        fs::write(&path, r#"{ "files_root": "notes", "max_undo": 10 }"#).unwrap();

        let config = parse_args(args(&[
            "--config",
            path.to_str().unwrap(),
            "--files-root",
            "override",
        ]))
        .unwrap()
        .unwrap();
        assert_eq!(config.files_root, PathBuf::from("override"));
        assert_eq!(config.max_undo, 10);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(
            parse_args(args(&["--state"])),
            Err(CliError::MissingArgument(_))
        ));
        assert!(matches!(
            parse_args(args(&["--verbose"])),
            Err(CliError::UnknownOption(_))
        ));
    }
}
