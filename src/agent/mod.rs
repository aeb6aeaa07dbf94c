//! Automation agent protocol
//!
//! The harness talks to the device-side automation agent with
//! `Content-Length` framed JSON requests over the agent's stdio.

mod client;
pub mod codec;
mod server;
pub mod types;

pub use client::AgentClient;
pub use server::serve;
