//! Scenario protocols
//!
//! Each scenario is a fixed navigate → assert → act sequence. Elements are
//! re-queried after every screen transition, and the first failing check
//! ends the scenario.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};
use crate::driver::elements::{SET_ENABLED, VALUE_LABEL};
use crate::driver::{Driver, ElementLocator, InfoField, Screen, Service};

use super::runner::Progress;
use super::validate;

/// A runnable scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scenario {
    /// Master switch cascades to every service, in both directions
    EnableDisableSdk,
    /// Device and configuration info fields are well-formed
    MiscellaneousInfo,
}

impl Scenario {
    pub const ALL: [Scenario; 2] = [Scenario::EnableDisableSdk, Scenario::MiscellaneousInfo];

    pub const fn name(self) -> &'static str {
        match self {
            Scenario::EnableDisableSdk => "enable_disable_sdk",
            Scenario::MiscellaneousInfo => "miscellaneous_info",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Scenario::EnableDisableSdk => {
                "Disabling and re-enabling the SDK switches every service off and on"
            }
            Scenario::MiscellaneousInfo => {
                "Device info rows are non-blank; Install ID, App Secret and Log URL are well-formed"
            }
        }
    }

    /// Run the scenario body against a launched, prepared app
    pub async fn execute<L: ElementLocator>(
        self,
        driver: &mut Driver<L>,
        progress: &mut Progress,
    ) -> Result<()> {
        match self {
            Scenario::EnableDisableSdk => enable_disable_sdk(driver, progress).await,
            Scenario::MiscellaneousInfo => miscellaneous_info(driver, progress).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.replace('-', "_");
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| Error::UnknownScenario(s.to_string()))
    }
}

fn state_word(enabled: bool) -> &'static str {
    if enabled {
        "enabled"
    } else {
        "disabled"
    }
}

fn expect_state(step: &str, expected: bool, actual: bool) -> Result<()> {
    if expected != actual {
        return Err(Error::assertion(step, state_word(expected), state_word(actual)));
    }
    Ok(())
}

/// Make sure the SDK starts enabled
///
/// A previous run that failed midway may have left it disabled. This is
/// setup, not an assertion.
pub async fn ensure_sdk_enabled<L: ElementLocator>(
    driver: &mut Driver<L>,
    progress: &mut Progress,
) -> Result<()> {
    let master = driver.find_toggle(Screen::AppCenter, SET_ENABLED).await?;
    if !driver.read_toggle_state(&master).await? {
        tracing::info!("SDK was disabled at launch, re-enabling");
        driver.tap(&master).await?;
        progress.detail("Re-enabled SDK left disabled by an earlier run");
    }
    Ok(())
}

/// Cascading toggle protocol
pub async fn enable_disable_sdk<L: ElementLocator>(
    driver: &mut Driver<L>,
    progress: &mut Progress,
) -> Result<()> {
    let master = driver.find_toggle(Screen::AppCenter, SET_ENABLED).await?;
    let state = driver.read_toggle_state(&master).await?;
    expect_state("SDK enabled on entry", true, state)?;
    progress.step("SDK is enabled");

    driver.tap(&master).await?;
    progress.step("Disable SDK");
    verify_services(driver, progress, false).await?;

    let master = driver.find_toggle(Screen::AppCenter, SET_ENABLED).await?;
    driver.tap(&master).await?;
    progress.step("Enable SDK");
    verify_services(driver, progress, true).await
}

/// Visit every service screen in order and check its switch reads `expected`
async fn verify_services<L: ElementLocator>(
    driver: &mut Driver<L>,
    progress: &mut Progress,
    expected: bool,
) -> Result<()> {
    let word = state_word(expected);

    for service in Service::ALL {
        let screen = service.screen();

        driver.open(screen).await?;
        let toggle = driver.find_toggle(screen, SET_ENABLED).await?;
        let actual = driver.read_toggle_state(&toggle).await?;
        expect_state(&format!("{} {}", service, word), expected, actual)?;
        driver.back_to_root().await?;

        let master = driver.find_toggle(Screen::AppCenter, SET_ENABLED).await?;
        let root = driver.read_toggle_state(&master).await?;
        expect_state(
            &format!("SDK still {} after visiting {}", word, service),
            expected,
            root,
        )?;

        progress.step(format!("{} is {}", service, word));
    }
    Ok(())
}

/// Field validation protocol
pub async fn miscellaneous_info<L: ElementLocator>(
    driver: &mut Driver<L>,
    progress: &mut Progress,
) -> Result<()> {
    driver.open(Screen::DeviceInfo).await?;

    let rows = driver.count_cells(Screen::DeviceInfo).await?;
    for index in 0..rows {
        let row = driver.row_at(Screen::DeviceInfo, index).await?;
        let value = driver.read_label(&row, VALUE_LABEL).await?;
        validate::require_non_blank(&format!("Device Info row {} has a value", index), &value)?;
        progress.detail(format!("row {}: {}", index, value));
    }
    progress.step(format!("Device info has no blank values ({} rows)", rows));

    driver.back_to_root().await?;

    for field in InfoField::ALL {
        let row = driver.find_row(Screen::AppCenter, field.label()).await?;
        let value = driver.read_label(&row, VALUE_LABEL).await?;
        validate::check_field(field, &value)?;
        progress.step(format!("{} is well-formed ({})", field, value));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::{AppFixture, SimulatedApp};
    use std::time::Duration;

    async fn prepared(fixture: AppFixture) -> Driver<SimulatedApp> {
        let mut driver = Driver::new(SimulatedApp::new(fixture), Duration::ZERO);
        driver.launch().await.unwrap();
        ensure_sdk_enabled(&mut driver, &mut Progress::new(false))
            .await
            .unwrap();
        driver
    }

    async fn run(fixture: AppFixture, scenario: Scenario) -> (Result<()>, Driver<SimulatedApp>) {
        let mut driver = prepared(fixture).await;
        let result = scenario.execute(&mut driver, &mut Progress::new(false)).await;
        (result, driver)
    }

    fn failed_step(result: Result<()>) -> String {
        match result {
            Err(Error::AssertionFailed { step, .. }) => step,
            other => panic!("Expected AssertionFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cascade_round_trip_passes() {
        let (result, driver) = run(AppFixture::default(), Scenario::EnableDisableSdk).await;

        result.unwrap();
        let app = driver.locator();
        assert_eq!(app.current_screen(), Some(Screen::AppCenter));
        assert_eq!(app.sdk_enabled(), Some(true));
        for service in Service::ALL {
            assert_eq!(app.service_enabled(service), Some(true));
        }
    }

    #[tokio::test]
    async fn test_detached_service_fails_on_disable() {
        let fixture = AppFixture::default().with_detached(Service::Distribute);
        let (result, driver) = run(fixture, Scenario::EnableDisableSdk).await;

        assert_eq!(failed_step(result), "Distribute disabled");
        // Stopped at the failing screen, Push never visited
        assert_eq!(driver.locator().current_screen(), Some(Screen::Distribute));
    }

    #[tokio::test]
    async fn test_root_state_changed_by_navigation_fails() {
        let fixture = AppFixture::default().with_reenable_on_back();
        let (result, _) = run(fixture, Scenario::EnableDisableSdk).await;

        assert_eq!(failed_step(result), "SDK still disabled after visiting Analytics");
    }

    #[tokio::test]
    async fn test_missing_service_row_ends_scenario() {
        let fixture = AppFixture::default().with_hidden_row("Crashes");
        let (result, driver) = run(fixture, Scenario::EnableDisableSdk).await;

        match result {
            Err(e @ Error::ElementNotFound { .. }) => {
                assert_eq!(e.code(), "ELEMENT_NOT_FOUND");
                assert!(e.to_string().contains("text 'Crashes' on 'App Center'"), "{e}");
            }
            other => panic!("Expected ElementNotFound, got {other:?}"),
        }
        // Analytics was visited and left; the SDK stays disabled mid-protocol
        assert_eq!(driver.locator().current_screen(), Some(Screen::AppCenter));
        assert_eq!(driver.locator().sdk_enabled(), Some(false));
    }

    #[tokio::test]
    async fn test_missing_info_row_ends_scenario() {
        let fixture = AppFixture::default().with_hidden_row("Log URL");
        let (result, _) = run(fixture, Scenario::MiscellaneousInfo).await;

        match result {
            Err(Error::ElementNotFound { query, .. }) => {
                assert_eq!(query, "cell containing 'Log URL' on 'App Center'");
            }
            other => panic!("Expected ElementNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_setup_repairs_disabled_sdk() {
        let fixture = AppFixture::default().with_sdk_enabled(false);
        let (result, _) = run(fixture, Scenario::EnableDisableSdk).await;
        result.unwrap();
    }

    #[tokio::test]
    async fn test_scenario_without_setup_requires_enabled_sdk() {
        let mut driver = Driver::new(
            SimulatedApp::new(AppFixture::default().with_sdk_enabled(false)),
            Duration::ZERO,
        );
        driver.launch().await.unwrap();

        let result = enable_disable_sdk(&mut driver, &mut Progress::new(false)).await;
        assert_eq!(failed_step(result), "SDK enabled on entry");
    }

    #[tokio::test]
    async fn test_miscellaneous_info_passes() {
        let (result, driver) = run(AppFixture::default(), Scenario::MiscellaneousInfo).await;
        result.unwrap();
        assert_eq!(driver.locator().current_screen(), Some(Screen::AppCenter));
    }

    #[tokio::test]
    async fn test_blank_device_info_row_fails() {
        let fixture = AppFixture::default()
            .with_device_info_rows(12)
            .with_blank_device_info(7);
        let (result, _) = run(fixture, Scenario::MiscellaneousInfo).await;

        assert_eq!(failed_step(result), "Device Info row 7 has a value");
    }

    #[tokio::test]
    async fn test_malformed_install_id_fails() {
        let fixture = AppFixture::default().with_install_id("not-a-uuid");
        let (result, _) = run(fixture, Scenario::MiscellaneousInfo).await;

        assert_eq!(failed_step(result), "Install ID is well-formed");
    }

    #[tokio::test]
    async fn test_malformed_app_secret_fails() {
        let fixture = AppFixture::default().with_app_secret("");
        let (result, _) = run(fixture, Scenario::MiscellaneousInfo).await;

        assert_eq!(failed_step(result), "App Secret is well-formed");
    }

    #[tokio::test]
    async fn test_example_log_url_passes() {
        let fixture = AppFixture::default().with_log_url("https://example.com/logs");
        let (result, _) = run(fixture, Scenario::MiscellaneousInfo).await;
        result.unwrap();
    }

    #[tokio::test]
    async fn test_empty_device_info_screen_passes() {
        let fixture = AppFixture::default().with_device_info_rows(0);
        let (result, _) = run(fixture, Scenario::MiscellaneousInfo).await;
        result.unwrap();
    }

    #[test]
    fn test_scenario_from_str() {
        assert_eq!(
            "enable_disable_sdk".parse::<Scenario>().unwrap(),
            Scenario::EnableDisableSdk
        );
        assert_eq!(
            "miscellaneous-info".parse::<Scenario>().unwrap(),
            Scenario::MiscellaneousInfo
        );
        assert!(matches!(
            "crash_app".parse::<Scenario>(),
            Err(Error::UnknownScenario(_))
        ));
    }
}
