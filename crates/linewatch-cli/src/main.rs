//! linewatch: count vehicles crossing a virtual line and alert on heavy traffic.

mod commands;
mod sink;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::{init::InitArgs, run::RunArgs, stats::StatsArgs};

#[derive(Debug, Parser)]
#[command(name = "linewatch", version, about = "Vehicle line-crossing counter with traffic alerts")]
struct Cli {
    /// Directory holding linewatch.toml (default: current directory)
    #[arg(long, global = true, value_name = "DIR")]
    config_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the crossing log (safe to repeat)
    Init(InitArgs),
    /// Read tracker frames as JSON lines, record crossings, print alerts
    Run(RunArgs),
    /// Show a traffic summary of the crossing log
    Stats(StatsArgs),
}

fn main() -> ExitCode {
    linewatch_core::tracing::init_tracing();
    let cli = Cli::parse();
    let root = cli.config_root.unwrap_or_else(|| PathBuf::from("."));

    let result = match cli.command {
        Command::Init(args) => commands::init::run(&root, args),
        Command::Run(args) => commands::run::run(&root, args),
        Command::Stats(args) => commands::stats::run(&root, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
