//! `faxc` - the command-line entry point. A single `check` subcommand
//! that runs a source file through the parser and the checker and
//! reports the first error, if any.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// faxc - the checker for fax source files.
#[derive(Parser, Debug)]
#[command(name = "faxc")]
#[command(author = "Fax Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check fax source files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse and check a single source file.
    Check(CheckCommand),
}

#[derive(Parser, Debug)]
struct CheckCommand {
    /// Path to the source file to check.
    path: PathBuf,

    /// Enable debug-level tracing of the checker's own progress.
    #[arg(long)]
    trace: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Commands::Check(args) = cli.command;
    init_logging(args.trace);

    match faxc_drv::check_file(&args.path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(trace: bool) {
    let filter = if trace { EnvFilter::new("debug") } else { EnvFilter::from_default_env() };

    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);

    let _ = tracing_subscriber::registry().with(filter).with(subscriber).try_init();
}
