//! Error handling and JSON error output.
//!
//! # Error Variant Usage Patterns
//!
//! - **`Message`**: Use for errors with no underlying cause, typically a rejected
//!   command line or a transaction request with nothing open.
//!   Example: `KvError::message(ErrorCode::NoTransaction, "NO TRANSACTION")`
//!
//! - **`Context`**: Use when wrapping another error with additional context.
//!   Example: `KvError::context(ErrorCode::Io, "failed to open script", err)`
//!
//! - **Auto-converted variants** (`Io`, `Json`): Used via `?` operator for
//!   ergonomic error propagation.
//!
//! Errors whose code is recoverable are reported to the user and the session
//! keeps reading commands. Everything else ends the process with status 1.

use serde::Serialize;
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, KvError>;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Io,
    Json,
    Config,
    InvalidCommand,
    MissingArgument,
    NoTransaction,
}

impl ErrorCode {
    /// Command-level failures: the line is rejected but the session goes on.
    pub fn is_recoverable(self) -> bool {
        matches!(
            self,
            ErrorCode::InvalidCommand | ErrorCode::MissingArgument | ErrorCode::NoTransaction
        )
    }
}

#[derive(Debug, Error)]
pub enum KvError {
    #[error("{message}")]
    Message { code: ErrorCode, message: String },
    #[error("{message}")]
    Context {
        code: ErrorCode,
        message: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl KvError {
    pub fn code(&self) -> ErrorCode {
        match self {
            KvError::Message { code, .. } => *code,
            KvError::Context { code, .. } => *code,
            KvError::Io(_) => ErrorCode::Io,
            KvError::Json(_) => ErrorCode::Json,
        }
    }

    pub fn message(code: ErrorCode, message: impl Into<String>) -> Self {
        KvError::Message {
            code,
            message: message.into(),
        }
    }

    pub fn context<E>(code: ErrorCode, message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        KvError::Context {
            code,
            message: message.into(),
            source: Box::new(source),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.code().is_recoverable()
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
    /// The chain of underlying causes, if any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub causes: Vec<String>,
}

impl From<&KvError> for ErrorResponse {
    fn from(error: &KvError) -> Self {
        let mut causes = Vec::new();
        let mut current: Option<&(dyn StdError + 'static)> = error.source();
        while let Some(cause) = current {
            causes.push(cause.to_string());
            current = cause.source();
        }

        Self {
            code: error.code(),
            message: error.to_string(),
            causes,
        }
    }
}

/// Prints a fatal error as JSON to stderr.
///
/// Replies go to stdout, so fatal errors stay on stderr where a pipeline
/// consuming replies will not mistake them for output.
pub fn eprint_error_json(error: &KvError) {
    let response = ErrorResponse::from(error);
    match serde_json::to_string_pretty(&response) {
        Ok(payload) => eprintln!("{payload}"),
        Err(err) => eprintln!(
            "{}: {} (serialization error: {err})",
            response.code, response.message
        ),
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorCode::Io => "io",
            ErrorCode::Json => "json",
            ErrorCode::Config => "config",
            ErrorCode::InvalidCommand => "invalid_command",
            ErrorCode::MissingArgument => "missing_argument",
            ErrorCode::NoTransaction => "no_transaction",
        };
        write!(f, "{label}")
    }
}
