//! Configuration file handling

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::paths::config_path;
use super::{Error, Result};

/// Default automation agent executable name, looked up on PATH
pub const DEFAULT_AGENT: &str = "appcenter-ui-agent";

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Automation agent settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Configuration for the host automation agent
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Path or PATH-resolvable name of the agent executable
    #[serde(default = "default_agent_path")]
    pub path: PathBuf,

    /// Additional arguments to pass to the agent
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            path: default_agent_path(),
            args: Vec::new(),
        }
    }
}

fn default_agent_path() -> PathBuf {
    PathBuf::from(DEFAULT_AGENT)
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct Timeouts {
    /// Deadline for launching the application under test
    #[serde(default = "default_launch")]
    pub launch_secs: u64,

    /// Bounded existence wait when locating an element
    #[serde(default = "default_element_wait")]
    pub element_wait_secs: u64,

    /// Deadline for any other agent request
    #[serde(default = "default_request")]
    pub request_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            launch_secs: default_launch(),
            element_wait_secs: default_element_wait(),
            request_secs: default_request(),
        }
    }
}

fn default_launch() -> u64 {
    60
}
fn default_element_wait() -> u64 {
    10
}
fn default_request() -> u64 {
    30
}

impl Timeouts {
    pub fn launch(&self) -> Duration {
        Duration::from_secs(self.launch_secs)
    }

    pub fn element_wait(&self) -> Duration {
        Duration::from_secs(self.element_wait_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Config {
    /// Load configuration from an explicit file or the default config file
    ///
    /// Returns default configuration if the default file doesn't exist. An
    /// explicit path that doesn't exist is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        if let Some(path) = config_path() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }
}

impl AgentConfig {
    /// Resolve the agent executable
    ///
    /// Paths with a directory component are used as-is (relative ones against
    /// `base`); bare names are searched on PATH.
    pub fn resolve(&self, base: Option<&Path>) -> Result<PathBuf> {
        let has_dir = self
            .path
            .parent()
            .map(|p| !p.as_os_str().is_empty())
            .unwrap_or(false);

        if has_dir || self.path.is_absolute() {
            let path = match base {
                Some(base) if self.path.is_relative() => base.join(&self.path),
                _ => self.path.clone(),
            };
            if path.exists() {
                return Ok(path);
            }
            return Err(Error::agent_not_found(
                &self.path.display().to_string(),
                &[path.display().to_string()],
            ));
        }

        let name = self.path.to_string_lossy();
        which::which(name.as_ref()).map_err(|_| Error::agent_not_found(&name, &["PATH"]))
    }
}
