//! App Center UI test harness
//!
//! Runs the App Center demo app scenarios through an external automation
//! agent and reports pass/fail per scenario.

use clap::Parser;
use std::path::PathBuf;
use uitest::commands::Commands;
use uitest::common::{config::Config, logging};
use uitest::cli;

#[derive(Parser)]
#[command(name = "uitest", about = "UI test harness for the App Center demo app")]
#[command(version, long_about = None)]
struct Cli {
    /// Configuration file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also append a detailed log to the run log file
    #[arg(long, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.log_file {
        logging::init_with_file();
    } else {
        logging::init_cli();
    }

    let result = match Config::load(cli.config.as_deref()) {
        Ok(config) => cli::dispatch(cli.command, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
