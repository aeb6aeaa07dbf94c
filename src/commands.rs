//! CLI command definitions
//!
//! Defines the clap commands for the UI test harness.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenarios against the configured automation agent
    Run {
        /// Scenarios to run, in order (default: all)
        scenarios: Vec<String>,

        /// Automation agent executable (overrides the config file)
        #[arg(long)]
        agent: Option<PathBuf>,

        /// Extra argument for the agent; repeat for several
        #[arg(long = "agent-arg", allow_hyphen_values = true)]
        agent_args: Vec<String>,

        /// Show per-row details
        #[arg(long, short)]
        verbose: bool,
    },

    /// Execute a scenario suite defined in a YAML file
    Suite {
        /// Path to the YAML suite file
        path: PathBuf,

        /// Show per-row details
        #[arg(long, short)]
        verbose: bool,
    },

    /// List available scenarios
    List,

    /// View the run log
    Logs {
        /// Number of lines to show
        #[arg(long, short = 'n', default_value = "50")]
        lines: usize,

        /// Clear the log file
        #[arg(long)]
        clear: bool,
    },
}
