//! Agent protocol message types

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::error::AgentError;
use crate::driver::{ElementHandle, Query, Screen};

/// Request from the harness to the automation agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRequest {
    pub seq: i64,
    pub command: AgentCommand,
}

/// Commands understood by the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", content = "arguments", rename_all = "snake_case")]
pub enum AgentCommand {
    Launch,
    Find { query: Query, timeout_ms: u64 },
    Tap { element: ElementHandle },
    BoolValue { element: ElementHandle },
    StaticText { element: ElementHandle, index: usize },
    CellCount { screen: Screen },
    Terminate,
}

impl AgentCommand {
    /// Command name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            AgentCommand::Launch => "launch",
            AgentCommand::Find { .. } => "find",
            AgentCommand::Tap { .. } => "tap",
            AgentCommand::BoolValue { .. } => "bool_value",
            AgentCommand::StaticText { .. } => "static_text",
            AgentCommand::CellCount { .. } => "cell_count",
            AgentCommand::Terminate => "terminate",
        }
    }
}

/// Response from the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub request_seq: i64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<AgentError>,
}

impl AgentResponse {
    pub fn success(request_seq: i64, body: Value) -> Self {
        Self {
            request_seq,
            success: true,
            body: Some(body),
            error: None,
        }
    }

    pub fn error(request_seq: i64, error: AgentError) -> Self {
        Self {
            request_seq,
            success: false,
            body: None,
            error: Some(error),
        }
    }
}

// === Response Bodies ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindBody {
    pub element: Option<ElementHandle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TapBody {
    pub tapped: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoolValueBody {
    pub value: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticTextBody {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellCountBody {
    pub count: Option<usize>,
}
