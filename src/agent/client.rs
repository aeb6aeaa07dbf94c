//! Client for the external automation agent
//!
//! The agent is a separate process (an XCUITest or accessibility bridge)
//! that owns the device session. The client spawns it, speaks the framed
//! JSON protocol over its stdin/stdout, and exposes it as an
//! [`ElementLocator`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, BufReader, BufWriter};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::common::config::Timeouts;
use crate::common::{Error, Result};
use crate::driver::{ElementHandle, ElementLocator, Query, Screen};

use super::codec;
use super::types::*;

type Reader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type Writer = BufWriter<Box<dyn AsyncWrite + Send + Unpin>>;

/// Connection to an automation agent
///
/// Responses are read by a background task, so a request that times out
/// never leaves a half-read frame behind. Its late response is skipped by
/// the next request.
pub struct AgentClient {
    /// Agent subprocess, if this client spawned one
    agent: Option<Child>,
    responses: mpsc::UnboundedReceiver<Result<AgentResponse>>,
    reader_task: JoinHandle<()>,
    writer: Writer,
    /// Set when a write was cut off mid-frame; the stream can't be trusted
    write_interrupted: bool,
    /// Sequence number for requests
    seq: i64,
    timeouts: Timeouts,
}

impl AgentClient {
    /// Spawn an agent executable and connect to its stdio
    pub async fn spawn(agent_path: &Path, args: &[String], timeouts: Timeouts) -> Result<Self> {
        tracing::info!(agent = %agent_path.display(), "Starting automation agent");

        let mut cmd = Command::new(agent_path);
        cmd.args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut agent = cmd.spawn().map_err(|e| {
            Error::AgentStartFailed(format!("Failed to start {}: {}", agent_path.display(), e))
        })?;

        let stdin = agent
            .stdin
            .take()
            .ok_or_else(|| Error::AgentStartFailed("Failed to get agent stdin".to_string()))?;
        let stdout = agent
            .stdout
            .take()
            .ok_or_else(|| Error::AgentStartFailed("Failed to get agent stdout".to_string()))?;

        let mut client = Self::connect(stdout, stdin, timeouts);
        client.agent = Some(agent);
        Ok(client)
    }

    /// Wrap an already-open transport
    ///
    /// Must be called from within a tokio runtime.
    pub fn connect<R, W>(reader: R, writer: W, timeouts: Timeouts) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let (tx, responses) = mpsc::unbounded_channel();
        let reader: Reader = BufReader::new(Box::new(reader));
        let reader_task = tokio::spawn(read_responses(reader, tx));

        Self {
            agent: None,
            responses,
            reader_task,
            writer: BufWriter::new(Box::new(writer)),
            write_interrupted: false,
            seq: 1,
            timeouts,
        }
    }

    /// Process ID of the spawned agent
    pub fn pid(&self) -> Option<u32> {
        self.agent.as_ref().and_then(Child::id)
    }

    fn next_seq(&mut self) -> i64 {
        let seq = self.seq;
        self.seq += 1;
        seq
    }

    /// Send a command and wait for its response body
    async fn request<T: DeserializeOwned>(&mut self, command: AgentCommand) -> Result<T> {
        let deadline = match &command {
            AgentCommand::Launch => self.timeouts.launch(),
            AgentCommand::Find { timeout_ms, .. } => {
                self.timeouts.request() + Duration::from_millis(*timeout_ms)
            }
            _ => self.timeouts.request(),
        };

        let name = command.name();
        let body = self.exchange(command, Instant::now() + deadline).await;
        match body {
            Ok(body) => serde_json::from_value(body).map_err(|e| {
                Error::AgentProtocol(format!("Failed to parse {} response: {}", name, e))
            }),
            Err(Error::Timeout(_)) => {
                tracing::warn!(command = name, "Agent request timed out");
                Err(Error::Timeout(deadline.as_secs()))
            }
            Err(e) => Err(e),
        }
    }

    async fn exchange(&mut self, command: AgentCommand, deadline: Instant) -> Result<Value> {
        if self.write_interrupted {
            return Err(Error::AgentProtocol(
                "Agent stream unusable after an interrupted request".to_string(),
            ));
        }

        let seq = self.next_seq();
        let name = command.name();
        let json = serde_json::to_string(&AgentRequest { seq, command })?;
        tracing::trace!("Agent >>> {}", json);

        let write = codec::write_message(&mut self.writer, &json);
        match tokio::time::timeout_at(deadline, write).await {
            Ok(written) => written?,
            Err(_) => {
                self.write_interrupted = true;
                return Err(Error::Timeout(0));
            }
        }

        // Read until our response; earlier ones belong to timed-out requests
        loop {
            let response = match tokio::time::timeout_at(deadline, self.responses.recv()).await {
                Ok(Some(response)) => response?,
                Ok(None) => return Err(Error::AgentCrashed),
                Err(_) => return Err(Error::Timeout(0)),
            };

            if response.request_seq < seq {
                tracing::debug!(
                    stale = response.request_seq,
                    seq,
                    "Discarding late agent response"
                );
                continue;
            }
            if response.request_seq != seq {
                return Err(Error::AgentProtocol(format!(
                    "Response sequence mismatch: expected {}, got {}",
                    seq, response.request_seq
                )));
            }

            return if response.success {
                Ok(response.body.unwrap_or(Value::Null))
            } else {
                Err(match response.error {
                    Some(error) => error.into(),
                    None => Error::agent_request_failed(name, "Unknown error"),
                })
            };
        }
    }
}

impl Drop for AgentClient {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}

/// Forward framed responses until the agent closes its output
async fn read_responses(
    mut reader: Reader,
    tx: mpsc::UnboundedSender<Result<AgentResponse>>,
) {
    loop {
        let message = match codec::read_message(&mut reader).await {
            Ok(Some(message)) => message,
            Ok(None) => break,
            Err(e) => {
                let _ = tx.send(Err(e));
                break;
            }
        };
        tracing::trace!("Agent <<< {}", message);

        let response = serde_json::from_str::<AgentResponse>(&message)
            .map_err(|e| Error::AgentProtocol(format!("Invalid JSON: {}", e)));
        if tx.send(response).is_err() {
            break;
        }
    }
    tracing::debug!("Agent output closed");
}

#[async_trait]
impl ElementLocator for AgentClient {
    async fn launch(&mut self) -> Result<()> {
        self.request(AgentCommand::Launch).await
    }

    async fn find(&mut self, query: &Query, wait: Duration) -> Result<Option<ElementHandle>> {
        let body: FindBody = self
            .request(AgentCommand::Find {
                query: query.clone(),
                timeout_ms: wait.as_millis() as u64,
            })
            .await?;
        Ok(body.element)
    }

    async fn tap(&mut self, element: ElementHandle) -> Result<bool> {
        let body: TapBody = self.request(AgentCommand::Tap { element }).await?;
        Ok(body.tapped)
    }

    async fn bool_value(&mut self, element: ElementHandle) -> Result<Option<bool>> {
        let body: BoolValueBody = self.request(AgentCommand::BoolValue { element }).await?;
        Ok(body.value)
    }

    async fn static_text(&mut self, element: ElementHandle, index: usize) -> Result<Option<String>> {
        let body: StaticTextBody = self
            .request(AgentCommand::StaticText { element, index })
            .await?;
        Ok(body.text)
    }

    async fn cell_count(&mut self, screen: Screen) -> Result<Option<usize>> {
        let body: CellCountBody = self.request(AgentCommand::CellCount { screen }).await?;
        Ok(body.count)
    }

    async fn terminate(&mut self) -> Result<()> {
        self.request(AgentCommand::Terminate).await
    }
}
