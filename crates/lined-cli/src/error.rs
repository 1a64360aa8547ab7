use lined_core::WorkspaceError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by the `lined` shell.
///
/// None of them end the session; the shell prints the message and reads the next line.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unterminated quoted text")]
    UnterminatedQuote,

    #[error("invalid position '{0}', expected <line>:<col>")]
    InvalidPosition(String),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),

    #[error("no active file (use 'load' or 'edit' first)")]
    NoActiveFile,

    #[error("{} already exists (use 'load' to open it)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("failed to read log for {}: {source}", path.display())]
    ReadLog { path: PathBuf, source: io::Error },

    #[error("invalid --config value: {0}")]
    Config(#[source] serde_json::Error),

    #[error("missing value for {0}")]
    MissingArgument(String),

    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error(transparent)]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}
