//! Mock automation agent for integration testing
//!
//! Serves the simulated App Center demo app over the agent protocol on
//! stdin/stdout, so the harness can be exercised end to end without a
//! device. Flags inject the faults the scenarios are meant to catch.

use clap::Parser;
use tokio::io::BufReader;
use uitest::driver::{AppFixture, Service, SimulatedApp};

#[derive(Parser)]
#[command(name = "mock_agent", about = "Simulated App Center app behind the agent protocol")]
struct Args {
    /// Start with the SDK disabled
    #[arg(long)]
    sdk_disabled: bool,

    /// Service that ignores the master switch (repeatable)
    #[arg(long = "detach")]
    detached: Vec<Service>,

    /// Install ID shown on the root screen
    #[arg(long)]
    install_id: Option<String>,

    /// App Secret shown on the root screen
    #[arg(long)]
    app_secret: Option<String>,

    /// Log URL shown on the root screen
    #[arg(long)]
    log_url: Option<String>,

    /// Replace Device Info with this many generated rows
    #[arg(long)]
    device_info_rows: Option<usize>,

    /// Blank out the value of this Device Info row
    #[arg(long)]
    blank_row: Option<usize>,

    /// Remove the root row with this caption (repeatable)
    #[arg(long = "hide-row")]
    hidden_rows: Vec<String>,

    /// Switch a disabled SDK back on whenever the root screen reappears
    #[arg(long)]
    reenable_on_back: bool,

    /// Fail every launch with this reason
    #[arg(long)]
    fail_launch: Option<String>,
}

impl Args {
    fn fixture(self) -> AppFixture {
        let mut fixture = AppFixture::default().with_sdk_enabled(!self.sdk_disabled);
        for service in self.detached {
            fixture = fixture.with_detached(service);
        }
        if let Some(value) = self.install_id {
            fixture = fixture.with_install_id(value);
        }
        if let Some(value) = self.app_secret {
            fixture = fixture.with_app_secret(value);
        }
        if let Some(value) = self.log_url {
            fixture = fixture.with_log_url(value);
        }
        if let Some(rows) = self.device_info_rows {
            fixture = fixture.with_device_info_rows(rows);
        }
        if let Some(index) = self.blank_row {
            fixture = fixture.with_blank_device_info(index);
        }
        for label in self.hidden_rows {
            fixture = fixture.with_hidden_row(label);
        }
        if self.reenable_on_back {
            fixture = fixture.with_reenable_on_back();
        }
        if let Some(reason) = self.fail_launch {
            fixture = fixture.with_launch_failure(reason);
        }
        fixture
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut app = SimulatedApp::new(Args::parse().fixture());

    let reader = BufReader::new(tokio::io::stdin());
    if let Err(e) = uitest::agent::serve(&mut app, reader, tokio::io::stdout()).await {
        eprintln!("mock_agent: {e}");
        std::process::exit(1);
    }
}
