//! Turns an input line into a [`Command`].

use crate::core::error::{ErrorCode, KvError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { key: String, value: String },
    Get { key: String },
    Unset { key: String },
    Counts { value: String },
    Find { value: String },
    Begin,
    Rollback,
    Commit,
    End,
}

impl Command {
    /// Parses one line. Blank lines yield `Ok(None)`.
    ///
    /// The command word is matched case-insensitively; arguments are kept verbatim.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(word) = parts.first() else {
            return Ok(None);
        };

        let command = match word.to_ascii_uppercase().as_str() {
            "SET" => match parts.as_slice() {
                [_, key, value] => Command::Set {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                _ => return Err(invalid("INVALID SET COMMAND")),
            },
            "FIND" => match parts.as_slice() {
                [_, value] => Command::Find {
                    value: value.to_string(),
                },
                _ => return Err(invalid("INVALID FIND COMMAND")),
            },
            "GET" => Command::Get {
                key: argument(&parts, "GET")?,
            },
            "UNSET" => Command::Unset {
                key: argument(&parts, "UNSET")?,
            },
            "COUNTS" => Command::Counts {
                value: argument(&parts, "COUNTS")?,
            },
            "BEGIN" => Command::Begin,
            "ROLLBACK" => Command::Rollback,
            "COMMIT" => Command::Commit,
            "END" => Command::End,
            _ => return Err(invalid(format!("INVALID COMMAND: {}", parts.join(" ")))),
        };

        Ok(Some(command))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Set { .. } => "SET",
            Command::Get { .. } => "GET",
            Command::Unset { .. } => "UNSET",
            Command::Counts { .. } => "COUNTS",
            Command::Find { .. } => "FIND",
            Command::Begin => "BEGIN",
            Command::Rollback => "ROLLBACK",
            Command::Commit => "COMMIT",
            Command::End => "END",
        }
    }
}

fn invalid(message: impl Into<String>) -> KvError {
    KvError::message(ErrorCode::InvalidCommand, message)
}

// Extra tokens after the first argument are ignored.
fn argument(parts: &[&str], command: &str) -> Result<String> {
    parts.get(1).map(|arg| arg.to_string()).ok_or_else(|| {
        KvError::message(
            ErrorCode::MissingArgument,
            format!("ERROR: missing argument for {command}"),
        )
    })
}
