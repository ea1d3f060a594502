//! Line-oriented command session over any async reader.

use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use super::{execute, Command, Outcome};
use crate::core::error::{ErrorCode, KvError, Result};
use crate::core::output::{write_rejection, write_reply};
use crate::core::store::KvStore;

pub const BANNER: &str = "Enter commands. Press Ctrl+D (Unix) or Ctrl+Z (Windows) to exit.";
pub const PROMPT: &str = "> ";
pub const FAREWELL: &str = "Exiting.";

#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Show banner, prompt and farewell.
    pub interactive: bool,
    pub json: bool,
}

/// Reads commands until end of input, `END`, or `interrupt` resolves.
///
/// Rejected lines are reported on `out` and the session continues. Only
/// I/O failures end the session with an error.
pub async fn run<R, W, F>(
    input: R,
    out: &mut W,
    store: &mut KvStore,
    options: SessionOptions,
    interrupt: F,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    F: Future<Output = ()>,
{
    let mut lines = input.lines();
    tokio::pin!(interrupt);

    if options.interactive {
        writeln!(out, "{BANNER}")?;
    }

    loop {
        if options.interactive {
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }

        let line = tokio::select! {
            line = lines.next_line() => line.map_err(|err| {
                KvError::context(ErrorCode::Io, "failed to read command", err)
            })?,
            () = &mut interrupt => {
                tracing::info!("interrupted");
                None
            }
        };

        let Some(line) = line else {
            if options.interactive {
                writeln!(out, "\n{FAREWELL}")?;
            }
            break;
        };

        let outcome = match Command::parse(&line) {
            Ok(Some(command)) => execute(store, command),
            Ok(None) => continue,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(Outcome::Continue(Some(reply))) => write_reply(out, &reply, options.json)?,
            Ok(Outcome::Continue(None)) => {}
            Ok(Outcome::Exit) => break,
            Err(err) if err.is_recoverable() => {
                tracing::debug!(code = %err.code(), "command rejected");
                write_rejection(out, &err, options.json)?;
            }
            Err(err) => return Err(err),
        }
        tracing::trace!(?store, "state");
    }

    out.flush()?;
    if store.depth() > 0 {
        tracing::warn!(open = store.depth(), "session ended with open transactions");
    }
    Ok(())
}
