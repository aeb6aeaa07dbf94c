//! End-to-end integration tests for the UI test harness
//!
//! These tests run the `uitest` binary against the `mock_agent` binary,
//! which serves a simulated App Center app over the agent protocol.
//! Faults are injected through mock agent flags.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use uitest::driver::{Service, SimulatedApp};
use uitest::scenario::{run_all, run_scenario};
use uitest::{AppFixture, Driver, Scenario};

/// Test context with isolated config and data directories
struct TestContext {
    /// Temporary directory for this test
    temp_dir: PathBuf,
    /// Config directory (XDG_CONFIG_HOME)
    config_dir: PathBuf,
    /// Data directory (XDG_DATA_HOME)
    data_dir: PathBuf,
}

impl TestContext {
    fn new(test_name: &str) -> Self {
        let temp_dir = env::temp_dir().join("appcenter-uitest-tests").join(test_name);

        let _ = fs::remove_dir_all(&temp_dir);
        let config_dir = temp_dir.join("config");
        let data_dir = temp_dir.join("data");
        fs::create_dir_all(&config_dir).expect("Failed to create config dir");
        fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            config_dir,
            data_dir,
        }
    }

    /// Write the default config file pointing at the mock agent
    fn create_config(&self, agent_args: &[&str]) {
        let args = agent_args
            .iter()
            .map(|a| format!("{:?}", a))
            .collect::<Vec<_>>()
            .join(", ");
        let content = format!(
            r#"
[agent]
path = {path:?}
args = [{args}]

[timeouts]
launch_secs = 10
element_wait_secs = 2
request_secs = 10
"#,
            path = mock_agent().display().to_string(),
            args = args,
        );

        let config_path = self.config_dir.join("appcenter-uitest").join("config.toml");
        fs::create_dir_all(config_path.parent().unwrap()).expect("Failed to create config dir");
        fs::write(&config_path, content).expect("Failed to write config");
    }

    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Run a harness command
    fn run(&self, args: &[&str]) -> HarnessOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_uitest"))
            .args(args)
            .env("XDG_CONFIG_HOME", &self.config_dir)
            .env("XDG_DATA_HOME", &self.data_dir)
            .env("NO_COLOR", "1")
            .output()
            .expect("Failed to run uitest");

        HarnessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }

    /// Run a harness command expecting success
    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.success,
            "uitest {:?} failed:\nstdout: {}\nstderr: {}",
            args,
            output.stdout,
            output.stderr
        );
        output.stdout
    }

    /// Run `uitest run` against the mock agent with extra agent flags
    fn run_against_mock(&self, scenarios: &[&str], agent_args: &[&str]) -> HarnessOutput {
        let agent = mock_agent().display().to_string();
        let mut args = vec!["run", "--agent", agent.as_str()];
        for arg in agent_args {
            args.push("--agent-arg");
            args.push(arg);
        }
        args.extend_from_slice(scenarios);
        self.run(&args)
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.temp_dir);
    }
}

/// Output from a harness command
#[derive(Debug)]
struct HarnessOutput {
    stdout: String,
    stderr: String,
    success: bool,
}

fn mock_agent() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_mock_agent"))
}

// ============== CLI ==============

#[test]
fn test_list_shows_both_scenarios() {
    let ctx = TestContext::new("list");
    let stdout = ctx.run_ok(&["list"]);

    assert!(stdout.contains("enable_disable_sdk"), "{stdout}");
    assert!(stdout.contains("miscellaneous_info"), "{stdout}");
}

#[test]
fn test_unknown_scenario_is_rejected() {
    let ctx = TestContext::new("unknown_scenario");
    let output = ctx.run_against_mock(&["crash_app"], &[]);

    assert!(!output.success);
    assert!(output.stderr.contains("Unknown scenario 'crash_app'"), "{}", output.stderr);
}

#[test]
fn test_missing_agent_is_reported() {
    let ctx = TestContext::new("missing_agent");
    let missing = ctx.temp_dir.join("no-such-agent");
    let output = ctx.run(&["run", "--agent", missing.to_str().unwrap()]);

    assert!(!output.success);
    assert!(output.stderr.contains("no-such-agent"), "{}", output.stderr);
}

// ============== Scenarios against the mock agent ==============

#[test]
fn test_healthy_app_passes_all_scenarios() {
    let ctx = TestContext::new("healthy_app");
    let output = ctx.run_against_mock(&[], &[]);

    assert!(output.success, "stdout: {}\nstderr: {}", output.stdout, output.stderr);
    assert!(output.stdout.contains("Step 11"), "{}", output.stdout);
    assert!(output.stdout.contains("Push is enabled"), "{}", output.stdout);
    assert!(output.stdout.contains("Log URL is well-formed"), "{}", output.stdout);
    assert!(output.stdout.contains("2/2 scenarios passed"), "{}", output.stdout);
}

#[test]
fn test_sdk_left_disabled_is_repaired_before_scenario() {
    let ctx = TestContext::new("sdk_left_disabled");
    let output = ctx.run_against_mock(&["enable_disable_sdk"], &["--sdk-disabled"]);

    assert!(output.success, "stdout: {}\nstderr: {}", output.stdout, output.stderr);
    assert!(output.stdout.contains("1/1 scenarios passed"), "{}", output.stdout);
}

#[test]
fn test_detached_service_fails_toggle_scenario() {
    let ctx = TestContext::new("detached_service");
    let output = ctx.run_against_mock(&["enable_disable_sdk"], &["--detach", "Push"]);

    assert!(!output.success);
    assert!(output.stdout.contains("Push disabled"), "{}", output.stdout);
    assert!(output.stdout.contains("ASSERTION_FAILED"), "{}", output.stdout);
    assert!(output.stderr.contains("1 of 1 scenarios failed"), "{}", output.stderr);
}

#[test]
fn test_blank_device_info_only_fails_info_scenario() {
    let ctx = TestContext::new("blank_device_info");
    let output = ctx.run_against_mock(&[], &["--blank-row", "3"]);

    assert!(!output.success);
    assert!(output.stdout.contains("Device Info row 3 has a value"), "{}", output.stdout);
    assert!(output.stdout.contains("1/2 scenarios passed"), "{}", output.stdout);
}

#[test]
fn test_malformed_install_id_is_caught() {
    let ctx = TestContext::new("malformed_install_id");
    let output = ctx.run_against_mock(
        &["miscellaneous_info"],
        &["--install-id", "0f4a6e1c5b0e4d3a9c872f1b6f6d8a10"],
    );

    assert!(!output.success);
    assert!(output.stdout.contains("Install ID is well-formed"), "{}", output.stdout);
}

#[test]
fn test_missing_row_reports_element_not_found() {
    let ctx = TestContext::new("missing_row");
    let output = ctx.run_against_mock(&["miscellaneous_info"], &["--hide-row", "Log URL"]);

    assert!(!output.success);
    assert!(output.stdout.contains("cell containing 'Log URL'"), "{}", output.stdout);
    assert!(output.stdout.contains("ELEMENT_NOT_FOUND"), "{}", output.stdout);
}

#[test]
fn test_root_reenabled_by_navigation_is_caught() {
    let ctx = TestContext::new("reenable_on_back");
    let output = ctx.run_against_mock(&["enable_disable_sdk"], &["--reenable-on-back"]);

    assert!(!output.success);
    assert!(
        output.stdout.contains("SDK still disabled after visiting Analytics"),
        "{}",
        output.stdout
    );
}

#[test]
fn test_launch_failure_fails_every_scenario() {
    let ctx = TestContext::new("launch_failure");
    let output = ctx.run_against_mock(&[], &["--fail-launch", "simulator not booted"]);

    assert!(!output.success);
    assert!(output.stdout.contains("simulator not booted"), "{}", output.stdout);
    assert!(output.stdout.contains("0/2 scenarios passed"), "{}", output.stdout);
}

// ============== Config and suites ==============

#[test]
fn test_agent_from_config_file() {
    let ctx = TestContext::new("config_file");
    ctx.create_config(&["--device-info-rows", "3"]);

    let stdout = ctx.run_ok(&["run", "-v", "miscellaneous_info"]);
    assert!(stdout.contains("(3 rows)"), "{stdout}");
    assert!(stdout.contains("row 2: value-2"), "{stdout}");
}

#[test]
fn test_explicit_config_path() {
    let ctx = TestContext::new("explicit_config");
    let config = ctx.write_file(
        "custom.toml",
        &format!(
            "[agent]\npath = {:?}\nargs = [\"--detach\", \"Crashes\"]\n",
            mock_agent().display().to_string()
        ),
    );

    let output = ctx.run(&["--config", config.to_str().unwrap(), "run", "enable_disable_sdk"]);
    assert!(!output.success);
    assert!(output.stdout.contains("Crashes disabled"), "{}", output.stdout);
}

#[test]
fn test_suite_file_runs_listed_scenarios() {
    let ctx = TestContext::new("suite_file");
    let suite = ctx.write_file(
        "smoke.yaml",
        &format!(
            r#"
name: Puppet smoke test
description: Only checks the info fields
agent:
  path: {:?}
  args: ["--log-url", "https://in.appcenter.ms/logs"]
element_wait_secs: 2
scenarios:
  - miscellaneous_info
"#,
            mock_agent().display().to_string()
        ),
    );

    let stdout = ctx.run_ok(&["suite", suite.to_str().unwrap()]);
    assert!(stdout.contains("Puppet smoke test"), "{stdout}");
    assert!(stdout.contains("https://in.appcenter.ms/logs"), "{stdout}");
    assert!(stdout.contains("1/1 scenarios passed"), "{stdout}");
    assert!(!stdout.contains("enable_disable_sdk"), "{stdout}");
}

#[test]
fn test_log_file_is_written_and_cleared() {
    let ctx = TestContext::new("log_file");
    let agent = mock_agent().display().to_string();
    ctx.run_ok(&["--log-file", "run", "--agent", &agent, "miscellaneous_info"]);

    let tail = ctx.run_ok(&["logs", "-n", "200"]);
    assert!(tail.contains("Scenario passed"), "{tail}");

    let cleared = ctx.run_ok(&["logs", "--clear"]);
    assert!(cleared.contains("Run log cleared"), "{cleared}");
}

// ============== Library, in process ==============

#[tokio::test]
async fn test_library_runs_scenarios_in_process() {
    let mut driver = Driver::new(SimulatedApp::new(AppFixture::default()), Duration::ZERO);
    let results = run_all(&mut driver, &Scenario::ALL, false).await;

    assert!(results.iter().all(|r| r.passed), "{results:?}");
    assert_eq!(results[0].steps_run, 11);
    assert_eq!(results[1].steps_run, 4);
}

#[tokio::test]
async fn test_library_detached_service_result() {
    let fixture = AppFixture::default().with_detached(Service::Distribute);
    let mut driver = Driver::new(SimulatedApp::new(fixture), Duration::ZERO);
    let result = run_scenario(&mut driver, Scenario::EnableDisableSdk, false).await;

    assert!(!result.passed);
    assert_eq!(result.error_code, Some("ASSERTION_FAILED"));
    // Analytics, Crashes passed before Distribute
    assert_eq!(result.steps_run, 4);
}
