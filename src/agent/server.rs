//! Agent-side protocol loop
//!
//! Serves any [`ElementLocator`] over the framed JSON protocol. The mock
//! agent binary uses it to put the simulated app behind a real process
//! boundary.

use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::common::error::AgentError;
use crate::common::{Error, Result};
use crate::driver::ElementLocator;

use super::codec;
use super::types::{AgentCommand, AgentRequest, AgentResponse};

/// Serve requests until the reader reaches end of stream
pub async fn serve<L, R, W>(locator: &mut L, mut reader: R, mut writer: W) -> Result<()>
where
    L: ElementLocator,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(message) = codec::read_message(&mut reader).await? {
        let response = match serde_json::from_str::<AgentRequest>(&message) {
            Ok(request) => {
                let seq = request.seq;
                tracing::debug!(seq, command = request.command.name(), "Agent request");
                match dispatch(locator, request.command).await {
                    Ok(body) => AgentResponse::success(seq, body),
                    Err(e) => AgentResponse::error(seq, AgentError::from(&e)),
                }
            }
            Err(e) => {
                tracing::warn!("Invalid agent request: {}", e);
                AgentResponse::error(
                    0,
                    AgentError::from(&Error::AgentProtocol(format!("Invalid request: {}", e))),
                )
            }
        };

        let json = serde_json::to_string(&response)?;
        codec::write_message(&mut writer, &json).await?;
    }

    tracing::debug!("Agent input closed");
    Ok(())
}

async fn dispatch<L: ElementLocator>(locator: &mut L, command: AgentCommand) -> Result<Value> {
    Ok(match command {
        AgentCommand::Launch => {
            locator.launch().await?;
            Value::Null
        }
        AgentCommand::Find { query, timeout_ms } => {
            let element = locator
                .find(&query, Duration::from_millis(timeout_ms))
                .await?;
            json!({ "element": element })
        }
        AgentCommand::Tap { element } => json!({ "tapped": locator.tap(element).await? }),
        AgentCommand::BoolValue { element } => {
            json!({ "value": locator.bool_value(element).await? })
        }
        AgentCommand::StaticText { element, index } => {
            json!({ "text": locator.static_text(element, index).await? })
        }
        AgentCommand::CellCount { screen } => json!({ "count": locator.cell_count(screen).await? }),
        AgentCommand::Terminate => {
            locator.terminate().await?;
            Value::Null
        }
    })
}
