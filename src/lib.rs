//! App Center UI test harness
//!
//! Drives the App Center SDK demo app through its accessibility tree and
//! verifies that the master "Set Enabled" switch cascades to every service
//! and that the diagnostic info screens show well-formed values.

pub mod agent;
pub mod cli;
pub mod commands;
pub mod common;
pub mod driver;
pub mod scenario;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use driver::{AppFixture, Driver, SimulatedApp};
pub use scenario::Scenario;
