//! Reply types and serialization helpers.

use serde::Serialize;
use std::fmt;
use std::io::Write;

use crate::core::error::{ErrorResponse, KvError, Result};
use crate::core::journal::Journal;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Value { value: Option<String> },
    Count { count: usize },
    Keys { keys: Vec<String> },
    Transaction { action: TxAction, changes: Journal },
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TxAction {
    Commit,
    Rollback,
}

/// Writes one compact JSON document per line.
pub fn write_json_line<W: Write, T: Serialize>(out: &mut W, payload: &T) -> Result<()> {
    serde_json::to_writer(&mut *out, payload)?;
    writeln!(out)?;
    Ok(())
}

/// Writes a recoverable error as a reply: plain message, or a JSON line.
pub fn write_rejection<W: Write>(out: &mut W, error: &KvError, json: bool) -> Result<()> {
    if json {
        write_json_line(out, &ErrorResponse::from(error))
    } else {
        writeln!(out, "{error}")?;
        Ok(())
    }
}

pub fn write_reply<W: Write>(out: &mut W, reply: &Reply, json: bool) -> Result<()> {
    if json {
        write_json_line(out, reply)
    } else {
        writeln!(out, "{reply}")?;
        Ok(())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Value { value } => write!(f, "{}", value.as_deref().unwrap_or("NULL")),
            Reply::Count { count } => write!(f, "{count}"),
            Reply::Keys { keys } if keys.is_empty() => write!(f, "NONE"),
            Reply::Keys { keys } => write!(f, "{}", keys.join(" ")),
            Reply::Transaction { action, changes } => {
                let summary = match action {
                    TxAction::Commit => "COMMIT: Changes applied.",
                    TxAction::Rollback => "ROLLBACK: Changes reverted.",
                };
                write!(f, "{summary} Log: {changes}")
            }
        }
    }
}

impl fmt::Display for TxAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TxAction::Commit => "commit",
            TxAction::Rollback => "rollback",
        };
        write!(f, "{label}")
    }
}
