use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trcdoc::{human, Protected, Trc};

/// Inspect signed TRC files.
#[derive(Parser)]
#[command(name = "trc", version, about, long_about = None)]
struct Cli {
    /// Log each decoding step to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print signed TRCs with the payload and protected headers decoded.
    ///
    /// Every file is processed even if an earlier one fails. The exit status
    /// is non-zero if any file could not be rendered.
    Human {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .init();

    match cli.command {
        Command::Human { files } => {
            let outcome = human::run::<Trc, Protected, _, _, _>(
                &files,
                &mut io::stdout().lock(),
                &mut io::stderr().lock(),
            )?;
            tracing::debug!(%outcome, "done");
            if outcome.is_success() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}
