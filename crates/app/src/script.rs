//! Line-oriented command scripts.
//!
//! One command per line, arguments separated by whitespace. Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! capacity 10
//! encode Alice
//! compact-trees
//! compact-heap 2
//! dump-tree
//! dump-area 3
//! dump-heap 2
//! ```

use huffroute_core::AreaId;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Capacity(u32),
    Encode(String),
    CompactTrees,
    CompactHeap(usize),
    DumpTree,
    DumpArea(AreaId),
    DumpHeap(usize),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Capacity(n) => write!(f, "capacity {}", n),
            Command::Encode(name) => write!(f, "encode {}", name),
            Command::CompactTrees => write!(f, "compact-trees"),
            Command::CompactHeap(k) => write!(f, "compact-heap {}", k),
            Command::DumpTree => write!(f, "dump-tree"),
            Command::DumpArea(area) => write!(f, "dump-area {}", area),
            Command::DumpHeap(k) => write!(f, "dump-heap {}", k),
        }
    }
}

/// Script parsing errors, tagged with the 1-based line number.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{word}`")]
    UnknownCommand { line: usize, word: String },

    #[error("line {line}: `{command}` requires {expected}")]
    MissingArgument {
        line: usize,
        command: &'static str,
        expected: &'static str,
    },

    #[error("line {line}: invalid argument `{value}` for `{command}`")]
    InvalidArgument {
        line: usize,
        command: &'static str,
        value: String,
    },

    #[error("line {line}: unexpected argument `{value}`")]
    ExtraArgument { line: usize, value: String },
}

fn number<T: std::str::FromStr>(
    line: usize,
    command: &'static str,
    expected: &'static str,
    arg: Option<&str>,
) -> Result<T, ScriptError> {
    let value = arg.ok_or(ScriptError::MissingArgument {
        line,
        command,
        expected,
    })?;
    value.parse().map_err(|_| ScriptError::InvalidArgument {
        line,
        command,
        value: value.to_string(),
    })
}

/// Parse one line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Command>, ScriptError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let mut words = text.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();

    let command = match word {
        "capacity" => Command::Capacity(number(line, "capacity", "a positive integer", arg)?),
        "encode" => {
            let name = arg.ok_or(ScriptError::MissingArgument {
                line,
                command: "encode",
                expected: "a name",
            })?;
            Command::Encode(name.to_string())
        }
        "compact-trees" => {
            if let Some(value) = arg {
                return Err(ScriptError::ExtraArgument {
                    line,
                    value: value.to_string(),
                });
            }
            Command::CompactTrees
        }
        "compact-heap" => Command::CompactHeap(number(line, "compact-heap", "a count", arg)?),
        "dump-tree" => {
            if let Some(value) = arg {
                return Err(ScriptError::ExtraArgument {
                    line,
                    value: value.to_string(),
                });
            }
            Command::DumpTree
        }
        "dump-area" => Command::DumpArea(number(line, "dump-area", "an area id", arg)?),
        "dump-heap" => Command::DumpHeap(number(line, "dump-heap", "a count", arg)?),
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                word: other.to_string(),
            })
        }
    };

    if let Some(value) = words.next() {
        return Err(ScriptError::ExtraArgument {
            line,
            value: value.to_string(),
        });
    }
    Ok(Some(command))
}

/// Parse a whole script into `(line number, command)` pairs.
pub fn parse_script(text: &str) -> Result<Vec<(usize, Command)>, ScriptError> {
    let mut commands = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        if let Some(command) = parse_line(i + 1, raw)? {
            commands.push((i + 1, command));
        }
    }
    Ok(commands)
}
