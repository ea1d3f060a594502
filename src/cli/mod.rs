//! CLI parsing and logging setup.

pub mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::core::error::{ErrorCode, KvError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "kvstore",
    version,
    about = "Interactive in-memory key-value store with nested transactions"
)]
pub struct Cli {
    #[arg(short, long)]
    pub verbose: bool,
    /// Tracing filter directive, e.g. `debug` or `kvstore=trace`.
    #[arg(long)]
    pub log_level: Option<String>,
    /// Emit replies and errors as JSON.
    #[arg(long)]
    pub json: bool,
    /// Suppress banner, prompt and exit message. Implied by `--json` and `--script`.
    #[arg(short, long)]
    pub quiet: bool,
    /// Read commands from a file instead of stdin.
    #[arg(short, long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

impl Cli {
    pub fn interactive(&self) -> bool {
        !self.quiet && !self.json && self.script.is_none()
    }
}

pub fn init_logging(verbose: bool, log_level: Option<&str>) -> Result<()> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level).map_err(|err| {
            KvError::context(ErrorCode::Config, format!("invalid log level '{level}'"), err)
        })?,
        None => {
            if verbose {
                EnvFilter::new("info")
            } else {
                EnvFilter::new("warn")
            }
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| KvError::message(ErrorCode::Config, err.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;
    use std::path::Path;

    #[test]
    fn defaults_to_interactive_stdin() {
        let cli = Cli::try_parse_from(["kvstore"]).unwrap();
        assert!(cli.interactive());
        assert!(!cli.json);
        assert!(cli.script.is_none());
    }

    #[test]
    fn script_implies_non_interactive() {
        let cli = Cli::try_parse_from(["kvstore", "--script", "cmds.txt", "--json"]).unwrap();
        assert!(!cli.interactive());
        assert!(cli.json);
        assert_eq!(cli.script.as_deref(), Some(Path::new("cmds.txt")));
    }

    #[test]
    fn json_implies_non_interactive() {
        let cli = Cli::try_parse_from(["kvstore", "--json"]).unwrap();
        assert!(!cli.interactive());
    }

    #[test]
    fn quiet_flag_disables_prompt() {
        let cli = Cli::try_parse_from(["kvstore", "-q", "-v"]).unwrap();
        assert!(!cli.interactive());
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_unknown_flags() {
        assert!(Cli::try_parse_from(["kvstore", "--bogus"]).is_err());
    }
}
