//! Scenario suite files
//!
//! A suite is a YAML file naming the scenarios to run and, optionally, the
//! agent to run them against:
//!
//! ```yaml
//! name: Puppet smoke test
//! agent:
//!   path: ./bin/ui-agent
//!   args: ["--device", "booted"]
//! element_wait_secs: 5
//! scenarios:
//!   - enable_disable_sdk
//!   - miscellaneous_info
//! ```

use colored::Colorize;
use serde::Deserialize;
use std::path::Path;

use crate::common::config::{AgentConfig, Config};
use crate::common::{Error, Result};

use super::protocol::Scenario;
use super::runner::{self, ScenarioResult};

/// A suite loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct TestSuite {
    /// Name of the suite
    pub name: String,
    /// Optional description of what the suite verifies
    pub description: Option<String>,
    /// Agent override; relative paths resolve against the suite file
    pub agent: Option<AgentConfig>,
    /// Element wait override in seconds
    pub element_wait_secs: Option<u64>,
    /// Scenarios in execution order (default: all)
    #[serde(default = "all_scenarios")]
    pub scenarios: Vec<Scenario>,
}

fn all_scenarios() -> Vec<Scenario> {
    Scenario::ALL.to_vec()
}

impl TestSuite {
    /// Load and parse a suite file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read test suite '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let suite: TestSuite = serde_yaml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse test suite: {}", e)))?;

        if suite.scenarios.is_empty() {
            return Err(Error::Config(format!(
                "Test suite '{}' lists no scenarios",
                suite.name
            )));
        }
        Ok(suite)
    }
}

/// Run every scenario of a suite file
pub async fn run_suite(path: &Path, config: &Config, verbose: bool) -> Result<Vec<ScenarioResult>> {
    let suite = TestSuite::load(path)?;

    println!(
        "\n{} {}",
        "Running Suite:".blue().bold(),
        suite.name.white().bold()
    );
    if let Some(desc) = &suite.description {
        println!("  {}", desc.dimmed());
    }

    let mut timeouts = config.timeouts.clone();
    if let Some(wait) = suite.element_wait_secs {
        timeouts.element_wait_secs = wait;
    }

    let mut driver = match &suite.agent {
        Some(agent) => {
            let suite_dir = path.parent().unwrap_or(Path::new("."));
            runner::connect(agent, Some(suite_dir), &timeouts).await?
        }
        None => runner::connect(&config.agent, None, &timeouts).await?,
    };

    Ok(runner::run_all(&mut driver, &suite.scenarios, verbose).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_parse_full_suite() {
        let suite = TestSuite::parse(
            r#"
name: Puppet smoke test
description: Checks the SDK switches
agent:
  path: ./bin/ui-agent
  args: ["--device", "booted"]
element_wait_secs: 5
scenarios:
  - miscellaneous_info
  - enable_disable_sdk
"#,
        )
        .unwrap();

        assert_eq!(suite.name, "Puppet smoke test");
        assert_eq!(
            suite.agent.map(|a| a.path),
            Some(PathBuf::from("./bin/ui-agent"))
        );
        assert_eq!(suite.element_wait_secs, Some(5));
        assert_eq!(
            suite.scenarios,
            vec![Scenario::MiscellaneousInfo, Scenario::EnableDisableSdk]
        );
    }

    #[test]
    fn test_scenarios_default_to_all() {
        let suite = TestSuite::parse("name: everything").unwrap();
        assert_eq!(suite.scenarios, Scenario::ALL.to_vec());
        assert!(suite.agent.is_none());
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let err = TestSuite::parse("name: bad\nscenarios: [crash_app]").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_scenario_list_rejected() {
        let err = TestSuite::parse("name: empty\nscenarios: []").unwrap_err();
        assert!(err.to_string().contains("lists no scenarios"));
    }
}
