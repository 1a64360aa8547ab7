//! Command-line grammar of the `lined` shell.
//!
//! A line is split into tokens: double-quoted strings (with `\n`, `\t`, `\"` and `\\` escapes)
//! or runs of non-whitespace. The first token names the command.

use crate::error::CliError;
use regex::Regex;

/// Which files `save` writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveTarget {
    /// The active file.
    Active,
    /// One named file.
    File(String),
    /// Every open file.
    All,
}

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Load(String),
    Save(SaveTarget),
    Close(Option<String>),
    Edit(String),
    EditorList,
    Init {
        file: String,
        with_log: bool,
    },
    Append(String),
    Insert {
        line: usize,
        col: usize,
        text: String,
    },
    Delete {
        line: usize,
        col: usize,
        length: usize,
    },
    Replace {
        line: usize,
        col: usize,
        length: usize,
        text: String,
    },
    Show {
        start: usize,
        end: usize,
    },
    Undo,
    Redo,
    LogOn(Option<String>),
    LogOff(Option<String>),
    LogShow(Option<String>),
    Help,
    Exit,
}

/// Usage lines printed by `help`.
pub const HELP: &str = "\
load <file>                      open a file and make it active
save [<file>|all]                write the active file, one file, or every file
close [<file>]                   close the active file or a named one
edit <file>                      switch the active file
editor-list                      list open files (> active, * modified)
init <file> [with-log]           create a file, optionally with change logging
append \"<text>\"                  append a line
insert <line>:<col> \"<text>\"     insert text
delete <line>:<col> <len>        delete characters
replace <line>:<col> <len> \"<text>\"
show [<start>:<end>]             print lines
undo | redo
log-on [<file>] | log-off [<file>] | log-show [<file>]
help | exit";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
}

impl Token {
    fn into_text(self) -> String {
        match self {
            Self::Word(s) | Self::Quoted(s) => s,
        }
    }
}

/// Compiled grammar.
#[derive(Debug, Clone)]
pub struct CommandParser {
    token: Regex,
    position: Regex,
}

impl CommandParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            token: Regex::new(r#""((?:[^"\\]|\\.)*)"|(\S+)"#)?,
            position: Regex::new(r"^(\d+):(\d+)$")?,
        })
    }

    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(&self, line: &str) -> Result<Option<CliCommand>, CliError> {
        let mut tokens = self.tokenize(line)?.into_iter();
        let Some(name) = tokens.next() else {
            return Ok(None);
        };
        let name = name.into_text();
        let args: Vec<Token> = tokens.collect();

        let command = match (name.as_str(), args.as_slice()) {
            ("load", [file]) => CliCommand::Load(word(file)),
            ("load", _) => return Err(CliError::Usage("load <file>")),

            ("save", []) => CliCommand::Save(SaveTarget::Active),
            ("save", [Token::Word(all)]) if all == "all" => CliCommand::Save(SaveTarget::All),
            ("save", [file]) => CliCommand::Save(SaveTarget::File(word(file))),
            ("save", _) => return Err(CliError::Usage("save [<file>|all]")),

            ("close", []) => CliCommand::Close(None),
            ("close", [file]) => CliCommand::Close(Some(word(file))),
            ("close", _) => return Err(CliError::Usage("close [<file>]")),

            ("edit", [file]) => CliCommand::Edit(word(file)),
            ("edit", _) => return Err(CliError::Usage("edit <file>")),

            ("editor-list", []) => CliCommand::EditorList,

            ("init", [file]) => CliCommand::Init {
                file: word(file),
                with_log: false,
            },
            ("init", [file, Token::Word(flag)]) if flag == "with-log" => CliCommand::Init {
                file: word(file),
                with_log: true,
            },
            ("init", _) => return Err(CliError::Usage("init <file> [with-log]")),

            ("append", [text]) => CliCommand::Append(text.clone().into_text()),
            ("append", _) => return Err(CliError::Usage("append \"<text>\"")),

            ("insert", [pos, text]) => {
                let (line, col) = self.position(pos)?;
                CliCommand::Insert {
                    line,
                    col,
                    text: text.clone().into_text(),
                }
            }
            ("insert", _) => return Err(CliError::Usage("insert <line>:<col> \"<text>\"")),

            ("delete", [pos, length]) => {
                let (line, col) = self.position(pos)?;
                CliCommand::Delete {
                    line,
                    col,
                    length: number(length)?,
                }
            }
            ("delete", _) => return Err(CliError::Usage("delete <line>:<col> <len>")),

            ("replace", [pos, length, text]) => {
                let (line, col) = self.position(pos)?;
                CliCommand::Replace {
                    line,
                    col,
                    length: number(length)?,
                    text: text.clone().into_text(),
                }
            }
            ("replace", _) => {
                return Err(CliError::Usage("replace <line>:<col> <len> \"<text>\""));
            }

            ("show", []) => CliCommand::Show { start: 0, end: 0 },
            ("show", [range]) => {
                let (start, end) = self.position(range)?;
                CliCommand::Show { start, end }
            }
            ("show", _) => return Err(CliError::Usage("show [<start>:<end>]")),

            ("undo", []) => CliCommand::Undo,
            ("redo", []) => CliCommand::Redo,
            ("log-on", []) => CliCommand::LogOn(None),
            ("log-on", [file]) => CliCommand::LogOn(Some(word(file))),
            ("log-off", []) => CliCommand::LogOff(None),
            ("log-off", [file]) => CliCommand::LogOff(Some(word(file))),
            ("log-show", []) => CliCommand::LogShow(None),
            ("log-show", [file]) => CliCommand::LogShow(Some(word(file))),
            ("help", _) => CliCommand::Help,
            ("exit" | "quit", []) => CliCommand::Exit,

            (
                "editor-list" | "undo" | "redo" | "log-on" | "log-off" | "log-show" | "exit"
                | "quit",
                _,
            ) => return Err(CliError::Usage("see 'help'")),
            (other, _) => return Err(CliError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }

    fn tokenize(&self, line: &str) -> Result<Vec<Token>, CliError> {
        let mut tokens = Vec::new();
        for caps in self.token.captures_iter(line) {
            if let Some(quoted) = caps.get(1) {
                tokens.push(Token::Quoted(unescape(quoted.as_str())));
            } else if let Some(bare) = caps.get(2) {
                if bare.as_str().starts_with('"') {
                    return Err(CliError::UnterminatedQuote);
                }
                tokens.push(Token::Word(bare.as_str().to_string()));
            }
        }
        Ok(tokens)
    }

    fn position(&self, token: &Token) -> Result<(usize, usize), CliError> {
        let Token::Word(text) = token else {
            return Err(CliError::InvalidPosition(token.clone().into_text()));
        };
        let caps = self
            .position
            .captures(text)
            .ok_or_else(|| CliError::InvalidPosition(text.clone()))?;
        Ok((number_str(&caps[1])?, number_str(&caps[2])?))
    }
}

fn word(token: &Token) -> String {
    token.clone().into_text()
}

fn number(token: &Token) -> Result<usize, CliError> {
    match token {
        Token::Word(text) => number_str(text),
        Token::Quoted(text) => Err(CliError::InvalidNumber(text.clone())),
    }
}

fn number_str(text: &str) -> Result<usize, CliError> {
    text.parse()
        .map_err(|_| CliError::InvalidNumber(text.to_string()))
}

/// Resolve `\n`, `\t`, `\"` and `\\`. Any other escape is kept verbatim.
pub fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(line: &str) -> Result<Option<CliCommand>, CliError> {
        CommandParser::new().unwrap().parse(line)
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_edit_commands() {
        assert_eq!(
            parse(r#"insert 2:5 "a \"quoted\"\nline""#).unwrap(),
            Some(CliCommand::Insert {
                line: 2,
                col: 5,
                text: "a \"quoted\"\nline".to_string(),
            })
        );
        assert_eq!(
            parse("delete 1:2 3").unwrap(),
            Some(CliCommand::Delete {
                line: 1,
                col: 2,
                length: 3,
            })
        );
        assert_eq!(
            parse(r#"replace 1:1 4 "new""#).unwrap(),
            Some(CliCommand::Replace {
                line: 1,
                col: 1,
                length: 4,
                text: "new".to_string(),
            })
        );
        assert_eq!(
            parse(r#"append """#).unwrap(),
            Some(CliCommand::Append(String::new()))
        );
    }

    #[test]
    fn test_file_commands() {
        assert_eq!(
            parse("save").unwrap(),
            Some(CliCommand::Save(SaveTarget::Active))
        );
        assert_eq!(
            parse("save all").unwrap(),
            Some(CliCommand::Save(SaveTarget::All))
        );
        assert_eq!(
            parse(r#"save "all""#).unwrap(),
            Some(CliCommand::Save(SaveTarget::File("all".to_string())))
        );
        assert_eq!(
            parse("init notes.txt with-log").unwrap(),
            Some(CliCommand::Init {
                file: "notes.txt".to_string(),
                with_log: true,
            })
        );
        assert_eq!(
            parse("show 3:7").unwrap(),
            Some(CliCommand::Show { start: 3, end: 7 })
        );
        assert_eq!(parse("close").unwrap(), Some(CliCommand::Close(None)));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse("frobnicate"),
            Err(CliError::UnknownCommand(name)) if name == "frobnicate"
        ));
        assert!(matches!(
            parse(r#"append "open"#),
            Err(CliError::UnterminatedQuote)
        ));
        assert!(matches!(
            parse(r#"insert 1,2 "x""#),
            Err(CliError::InvalidPosition(_))
        ));
        assert!(matches!(
            parse("delete 1:2 many"),
            Err(CliError::InvalidNumber(_))
        ));
        assert!(matches!(parse("undo now"), Err(CliError::Usage(_))));
        assert!(matches!(parse("load"), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_unescape_keeps_unknown_escapes() {
        assert_eq!(unescape(r"a\tb\\c\q"), "a\tb\\c\\q");
    }
}
