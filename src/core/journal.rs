//! Per-transaction change journal.

use serde::Serialize;
use std::fmt;

pub const BEGIN: &str = "BEGIN";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Journal {
    entries: Vec<String>,
}

impl Journal {
    /// A journal for a freshly opened transaction.
    pub fn begin() -> Self {
        let mut journal = Self::default();
        journal.record(BEGIN);
        journal
    }

    pub fn record(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    #[allow(dead_code)]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for Journal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, entry) in self.entries.iter().enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write_quoted(f, entry)?;
        }
        write!(f, "]")
    }
}

/// Quotes an entry the way the journal has always been shown to users:
/// single quotes, unless the entry holds a single quote and no double quote.
fn write_quoted(f: &mut fmt::Formatter<'_>, entry: &str) -> fmt::Result {
    let quote = if entry.contains('\'') && !entry.contains('"') {
        '"'
    } else {
        '\''
    };

    write!(f, "{quote}")?;
    for ch in entry.chars() {
        match ch {
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            '\r' => write!(f, "\\r")?,
            '\t' => write!(f, "\\t")?,
            ch if ch == quote => write!(f, "\\{ch}")?,
            ch if ch.is_control() && (ch as u32) < 0x100 => write!(f, "\\x{:02x}", ch as u32)?,
            ch if ch.is_control() => write!(f, "\\u{:04x}", ch as u32)?,
            ch => write!(f, "{ch}")?,
        }
    }
    write!(f, "{quote}")
}
