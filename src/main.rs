//! kvstore entrypoint.

mod cli;
mod core;

use clap::Parser;
use std::process::ExitCode;
use tokio::io::BufReader;

use crate::cli::commands::session::{self, SessionOptions};
use crate::core::error::{eprint_error_json, ErrorCode, KvError, Result};
use crate::core::store::KvStore;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();
    if let Err(err) = cli::init_logging(cli.verbose, cli.log_level.as_deref()) {
        return exit_with_error(&err, cli.json);
    }

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            let err = KvError::context(ErrorCode::Io, "failed to start async runtime", err);
            return exit_with_error(&err, cli.json);
        }
    };
    let result = runtime.block_on(run(&cli));
    // A pending stdin read sits on a blocking thread and cannot be cancelled.
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => exit_with_error(&err, cli.json),
    }
}

async fn run(cli: &cli::Cli) -> Result<()> {
    let options = SessionOptions {
        interactive: cli.interactive(),
        json: cli.json,
    };
    let mut store = KvStore::new();
    let mut out = std::io::stdout();

    match &cli.script {
        Some(path) => {
            let file = tokio::fs::File::open(path).await.map_err(|err| {
                KvError::context(
                    ErrorCode::Io,
                    format!("failed to open script {}", path.display()),
                    err,
                )
            })?;
            tracing::info!(script = %path.display(), "running script");
            session::run(BufReader::new(file), &mut out, &mut store, options, interrupted()).await
        }
        None => {
            let stdin = BufReader::new(tokio::io::stdin());
            session::run(stdin, &mut out, &mut store, options, interrupted()).await
        }
    }
}

/// Resolves on Ctrl+C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

fn exit_with_error(error: &KvError, json: bool) -> ExitCode {
    if json {
        eprint_error_json(error);
    } else {
        eprintln!("{error}");
    }
    ExitCode::from(1)
}
