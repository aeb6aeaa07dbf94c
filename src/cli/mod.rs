//! CLI command handling
//!
//! Dispatches CLI commands to the scenario runner and formats output.

use std::path::Path;

use crate::commands::Commands;
use crate::common::config::{AgentConfig, Config};
use crate::common::{logging, Error, Result};
use crate::scenario::{self, Scenario, ScenarioResult};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Run {
            scenarios,
            agent,
            agent_args,
            verbose,
        } => {
            let selected = select_scenarios(&scenarios)?;

            let agent = match agent {
                Some(path) => AgentConfig {
                    path,
                    args: agent_args,
                },
                None if !agent_args.is_empty() => AgentConfig {
                    args: agent_args,
                    ..config.agent.clone()
                },
                None => config.agent.clone(),
            };

            let mut driver = scenario::connect(&agent, None, &config.timeouts).await?;
            let results = scenario::run_all(&mut driver, &selected, verbose).await;
            finish(&results)
        }

        Commands::Suite { path, verbose } => {
            let results = scenario::run_suite(&path, &config, verbose).await?;
            finish(&results)
        }

        Commands::List => {
            println!("Scenarios:");
            for scenario in Scenario::ALL {
                println!("  {:<20} {}", scenario.name(), scenario.description());
            }
            Ok(())
        }

        Commands::Logs { lines, clear } => {
            let log_path = logging::run_log_path()
                .ok_or_else(|| Error::Config("Could not determine log directory".to_string()))?;

            if clear {
                logging::truncate_run_log()?;
                println!("Run log cleared: {}", log_path.display());
                return Ok(());
            }

            print_log_tail(&log_path, lines)
        }
    }
}

fn select_scenarios(names: &[String]) -> Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(Scenario::ALL.to_vec());
    }
    names.iter().map(|name| name.parse()).collect()
}

fn finish(results: &[ScenarioResult]) -> Result<()> {
    scenario::print_summary(results);

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        return Err(Error::ScenariosFailed {
            failed,
            total: results.len(),
        });
    }
    Ok(())
}

fn print_log_tail(path: &Path, lines: usize) -> Result<()> {
    if !path.exists() {
        println!("No run log yet. Run with --log-file to record one.");
        println!("Expected at: {}", path.display());
        return Ok(());
    }

    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;

    let all: Vec<&str> = content.lines().collect();
    let start = all.len().saturating_sub(lines);
    println!("Run log: {} (last {} lines)", path.display(), all.len() - start);
    println!("{}", "-".repeat(60));
    for line in &all[start..] {
        println!("{}", line);
    }
    Ok(())
}
