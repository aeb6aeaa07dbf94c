//! Error types for the UI test harness
//!
//! Scenario failures fall into three terminal classes: an element that never
//! appeared, an observed value that disagrees with the expected invariant, and
//! an application that could not be launched. Everything else is plumbing
//! (agent transport, configuration, IO).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt::Display;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Scenario Failures ===
    #[error("Element not found: {query} (waited {waited_ms} ms)")]
    ElementNotFound { query: String, waited_ms: u64 },

    #[error("Assertion failed at '{step}': expected {expected}, got {actual}")]
    AssertionFailed {
        step: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to launch application: {0}")]
    LaunchFailed(String),

    // === Agent Errors ===
    #[error("Automation agent '{name}' not found. Searched: {searched}")]
    AgentNotFound { name: String, searched: String },

    #[error("Automation agent failed to start: {0}")]
    AgentStartFailed(String),

    #[error("Automation agent exited unexpectedly")]
    AgentCrashed,

    #[error("Agent protocol error: {0}")]
    AgentProtocol(String),

    #[error("Agent request '{command}' failed: {message}")]
    AgentRequestFailed { command: String, message: String },

    #[error("Agent reported {code}: {message}")]
    AgentReported { code: String, message: String },

    #[error("Operation timed out after {0} seconds")]
    Timeout(u64),

    // === Run Errors ===
    #[error("Unknown scenario '{0}'. Use 'uitest list' to see available scenarios")]
    UnknownScenario(String),

    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an element not found error for a query that exhausted its wait
    pub fn element_not_found(query: impl Display, waited: Duration) -> Self {
        Self::ElementNotFound {
            query: query.to_string(),
            waited_ms: waited.as_millis() as u64,
        }
    }

    /// Create an assertion failure for a named step
    pub fn assertion(step: impl Into<String>, expected: impl Display, actual: impl Display) -> Self {
        Self::AssertionFailed {
            step: step.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an agent not found error with search paths
    pub fn agent_not_found<S: AsRef<str>>(name: &str, paths: &[S]) -> Self {
        Self::AgentNotFound {
            name: name.to_string(),
            searched: paths.iter().map(|s| s.as_ref()).collect::<Vec<_>>().join(", "),
        }
    }

    /// Create an agent request failed error
    pub fn agent_request_failed(command: &str, message: &str) -> Self {
        Self::AgentRequestFailed {
            command: command.to_string(),
            message: message.to_string(),
        }
    }

    /// Stable code for reports and the agent wire protocol
    pub fn code(&self) -> &'static str {
        match self {
            Error::ElementNotFound { .. } => "ELEMENT_NOT_FOUND",
            Error::AssertionFailed { .. } => "ASSERTION_FAILED",
            Error::LaunchFailed(_) => "LAUNCH_FAILED",
            Error::AgentNotFound { .. } => "AGENT_NOT_FOUND",
            Error::AgentCrashed => "AGENT_CRASHED",
            Error::AgentProtocol(_) => "AGENT_PROTOCOL",
            Error::Timeout(_) => "TIMEOUT",
            Error::UnknownScenario(_) => "UNKNOWN_SCENARIO",
            Error::Config(_) | Error::ConfigParse(_) => "CONFIG",
            _ => "INTERNAL_ERROR",
        }
    }
}

/// Wire-serializable error carried in agent responses
///
/// `details` carries the structured fields of scenario failures so they map
/// back to the same [`Error`] variant on the harness side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl From<&Error> for AgentError {
    fn from(e: &Error) -> Self {
        let details = match e {
            Error::ElementNotFound { query, waited_ms } => {
                Some(json!({ "query": query, "waited_ms": waited_ms }))
            }
            Error::AssertionFailed {
                step,
                expected,
                actual,
            } => Some(json!({ "step": step, "expected": expected, "actual": actual })),
            Error::Timeout(secs) => Some(json!({ "secs": secs })),
            _ => None,
        };
        let message = match e {
            // Bare payloads, so the round trip does not double the prefix
            Error::LaunchFailed(reason) | Error::AgentProtocol(reason) => reason.clone(),
            Error::AgentReported { message, .. } => message.clone(),
            other => other.to_string(),
        };
        let code = match e {
            Error::AgentReported { code, .. } => code.clone(),
            other => other.code().to_string(),
        };
        Self {
            code,
            message,
            details,
        }
    }
}

impl AgentError {
    fn detail_str(&self, key: &str) -> Option<String> {
        self.details
            .as_ref()?
            .get(key)?
            .as_str()
            .map(str::to_string)
    }

    fn detail_u64(&self, key: &str) -> Option<u64> {
        self.details.as_ref()?.get(key)?.as_u64()
    }
}

impl From<AgentError> for Error {
    fn from(e: AgentError) -> Self {
        match e.code.as_str() {
            "ELEMENT_NOT_FOUND" => Error::ElementNotFound {
                query: e.detail_str("query").unwrap_or_else(|| e.message.clone()),
                waited_ms: e.detail_u64("waited_ms").unwrap_or(0),
            },
            "ASSERTION_FAILED" => match (
                e.detail_str("step"),
                e.detail_str("expected"),
                e.detail_str("actual"),
            ) {
                (Some(step), Some(expected), Some(actual)) => Error::AssertionFailed {
                    step,
                    expected,
                    actual,
                },
                _ => Error::AssertionFailed {
                    step: e.message,
                    expected: "agent-side check to pass".to_string(),
                    actual: "failure".to_string(),
                },
            },
            "LAUNCH_FAILED" => Error::LaunchFailed(e.message),
            "TIMEOUT" => Error::Timeout(e.detail_u64("secs").unwrap_or(0)),
            "AGENT_PROTOCOL" => Error::AgentProtocol(e.message),
            "AGENT_CRASHED" => Error::AgentCrashed,
            _ => Error::AgentReported {
                code: e.code,
                message: e.message,
            },
        }
    }
}
