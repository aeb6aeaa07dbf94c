//! Scenario runner
//!
//! Runs the UI scenarios against a [`Driver`](crate::driver::Driver): the
//! cascading toggle protocol and the field validation protocol. Scenarios
//! can be picked by name on the command line or listed in a YAML suite.

mod protocol;
mod runner;
mod suite;
pub mod validate;

pub use protocol::{enable_disable_sdk, ensure_sdk_enabled, miscellaneous_info, Scenario};
pub use runner::{connect, print_summary, run_all, run_scenario, Progress, ScenarioResult};
pub use suite::{run_suite, TestSuite};
