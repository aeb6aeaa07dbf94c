//! Scenario runner
//!
//! Launches the app fresh for every scenario, applies setup, runs the
//! scenario body and always terminates the app afterwards. Progress is
//! printed step by step; the first failure ends the scenario.

use colored::Colorize;
use std::path::Path;

use crate::agent::AgentClient;
use crate::common::config::{AgentConfig, Timeouts};
use crate::common::Result;
use crate::driver::{Driver, ElementLocator};

use super::protocol::{self, Scenario};

/// Result of a scenario run
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub error: Option<String>,
    /// Stable error code when the scenario failed
    pub error_code: Option<&'static str>,
}

/// Step counter and printer for a running scenario
#[derive(Debug)]
pub struct Progress {
    completed: usize,
    verbose: bool,
}

impl Progress {
    pub fn new(verbose: bool) -> Self {
        Self {
            completed: 0,
            verbose,
        }
    }

    /// Record a passed step
    pub fn step(&mut self, description: impl AsRef<str>) {
        self.completed += 1;
        let description = description.as_ref();
        tracing::debug!(step = self.completed, "{}", description);
        println!(
            "  {} Step {}: {}",
            "✓".green(),
            self.completed,
            description.dimmed()
        );
    }

    /// Extra detail shown only in verbose mode
    pub fn detail(&self, text: impl AsRef<str>) {
        if self.verbose {
            println!("      {}", text.as_ref().dimmed());
        }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }
}

/// Spawn the configured agent and wrap it in a driver
pub async fn connect(
    agent: &AgentConfig,
    base: Option<&Path>,
    timeouts: &Timeouts,
) -> Result<Driver<AgentClient>> {
    let agent_path = agent.resolve(base)?;
    let client = AgentClient::spawn(&agent_path, &agent.args, timeouts.clone()).await?;
    tracing::debug!(pid = ?client.pid(), "Automation agent running");
    Ok(Driver::new(client, timeouts.element_wait()))
}

/// Run one scenario from launch to termination
#[tracing::instrument(skip_all, fields(scenario = %scenario))]
pub async fn run_scenario<L: ElementLocator>(
    driver: &mut Driver<L>,
    scenario: Scenario,
    verbose: bool,
) -> ScenarioResult {
    println!(
        "\n{} {}",
        "Running Scenario:".blue().bold(),
        scenario.name().white().bold()
    );
    println!("  {}", scenario.description().dimmed());

    let mut progress = Progress::new(verbose);
    let outcome = execute(driver, scenario, &mut progress).await;

    if let Err(e) = driver.terminate().await {
        tracing::warn!("Failed to terminate application: {}", e);
    }

    match outcome {
        Ok(()) => {
            tracing::info!(steps = progress.completed(), "Scenario passed");
            println!("\n{} {}", "✓".green().bold(), "Scenario Passed".green().bold());
            ScenarioResult {
                name: scenario.name().to_string(),
                passed: true,
                steps_run: progress.completed(),
                error: None,
                error_code: None,
            }
        }
        Err(e) => {
            let failed_step = progress.completed() + 1;
            tracing::info!(step = failed_step, code = e.code(), "Scenario failed: {}", e);
            println!("  {} Step {}: {}", "✗".red(), failed_step, e);
            ScenarioResult {
                name: scenario.name().to_string(),
                passed: false,
                steps_run: progress.completed(),
                error: Some(e.to_string()),
                error_code: Some(e.code()),
            }
        }
    }
}

async fn execute<L: ElementLocator>(
    driver: &mut Driver<L>,
    scenario: Scenario,
    progress: &mut Progress,
) -> Result<()> {
    driver.launch().await?;
    progress.detail("Application launched");
    protocol::ensure_sdk_enabled(driver, progress).await?;
    scenario.execute(driver, progress).await
}

/// Run scenarios in order, relaunching the app for each
pub async fn run_all<L: ElementLocator>(
    driver: &mut Driver<L>,
    scenarios: &[Scenario],
    verbose: bool,
) -> Vec<ScenarioResult> {
    let mut results = Vec::with_capacity(scenarios.len());
    for &scenario in scenarios {
        results.push(run_scenario(driver, scenario, verbose).await);
    }
    results
}

/// Print a pass/fail summary of a run
pub fn print_summary(results: &[ScenarioResult]) {
    let passed = results.iter().filter(|r| r.passed).count();

    println!("\n{}", "Summary:".cyan());
    for result in results {
        if result.passed {
            println!("  {} {}", "✓".green(), result.name);
        } else {
            println!(
                "  {} {} ({})",
                "✗".red(),
                result.name,
                result.error_code.unwrap_or("FAILED")
            );
        }
    }
    println!("  {}/{} scenarios passed\n", passed, results.len());
}
