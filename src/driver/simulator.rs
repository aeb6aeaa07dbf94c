//! In-memory model of the App Center demo app
//!
//! Implements [`ElementLocator`] so the scenarios can run without a device.
//! The model keeps one screen on display at a time, cascades the master
//! switch to every service, and invalidates all handles on each screen
//! transition. [`AppFixture`] controls the initial state and injects faults.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

use crate::common::{Error, Result};

use super::elements::{InfoField, Screen, Service, BACK_TO_ROOT, SET_ENABLED};
use super::locator::{ElementHandle, ElementLocator, Query};

/// Initial state and fault injection for [`SimulatedApp`]
#[derive(Debug, Clone)]
pub struct AppFixture {
    pub sdk_enabled: bool,
    pub install_id: String,
    pub app_secret: String,
    pub log_url: String,
    pub device_info: Vec<(String, String)>,
    /// Services that ignore the master switch
    pub detached: Vec<Service>,
    /// Root rows missing from the table, by caption
    pub hidden_rows: Vec<String>,
    /// Returning to the root screen switches a disabled SDK back on
    pub reenable_on_back: bool,
    pub launch_failure: Option<String>,
}

impl Default for AppFixture {
    fn default() -> Self {
        Self {
            sdk_enabled: true,
            install_id: "0f4a6e1c-5b0e-4d3a-9c87-2f1b6f6d8a10".to_string(),
            app_secret: "3b1d2c7e-8a4f-4e6b-b5d9-61c0a7e2f934".to_string(),
            log_url: "https://in.appcenter.ms".to_string(),
            device_info: default_device_info(),
            detached: Vec::new(),
            hidden_rows: Vec::new(),
            reenable_on_back: false,
            launch_failure: None,
        }
    }
}

fn default_device_info() -> Vec<(String, String)> {
    [
        ("SDK Name", "appcenter.ios"),
        ("SDK Version", "0.9.0"),
        ("Model", "iPhone9,1"),
        ("OEM Name", "Apple"),
        ("OS Name", "iOS"),
        ("OS Version", "10.3"),
        ("OS Build", "14E269"),
        ("Locale", "en_US"),
        ("Time Zone Offset", "-420"),
        ("App Version", "1.0"),
        ("App Build", "1"),
        ("App Namespace", "com.microsoft.appcenter.puppet"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl AppFixture {
    pub fn with_sdk_enabled(mut self, enabled: bool) -> Self {
        self.sdk_enabled = enabled;
        self
    }

    pub fn with_install_id(mut self, value: impl Into<String>) -> Self {
        self.install_id = value.into();
        self
    }

    pub fn with_app_secret(mut self, value: impl Into<String>) -> Self {
        self.app_secret = value.into();
        self
    }

    pub fn with_log_url(mut self, value: impl Into<String>) -> Self {
        self.log_url = value.into();
        self
    }

    /// Replace the Device Info rows with `count` generated rows
    pub fn with_device_info_rows(mut self, count: usize) -> Self {
        self.device_info = (0..count)
            .map(|i| (format!("Info {}", i), format!("value-{}", i)))
            .collect();
        self
    }

    /// Blank out the value of one Device Info row
    pub fn with_blank_device_info(mut self, index: usize) -> Self {
        if let Some(row) = self.device_info.get_mut(index) {
            row.1.clear();
        }
        self
    }

    pub fn with_detached(mut self, service: Service) -> Self {
        if !self.detached.contains(&service) {
            self.detached.push(service);
        }
        self
    }

    /// Drop the root row captioned `label`
    pub fn with_hidden_row(mut self, label: impl Into<String>) -> Self {
        self.hidden_rows.push(label.into());
        self
    }

    /// Turn the SDK back on (without cascading) whenever the root screen is
    /// shown again
    pub fn with_reenable_on_back(mut self) -> Self {
        self.reenable_on_back = true;
        self
    }

    pub fn with_launch_failure(mut self, reason: impl Into<String>) -> Self {
        self.launch_failure = Some(reason.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Switch(Screen),
    Text { screen: Screen, row: usize },
    Cell { screen: Screen, row: usize },
    BackButton,
}

#[derive(Debug)]
struct AppState {
    screen: Screen,
    sdk_enabled: bool,
    services: [bool; 4],
}

/// Simulated App Center demo app
#[derive(Debug)]
pub struct SimulatedApp {
    fixture: AppFixture,
    state: Option<AppState>,
    generation: u64,
    next_id: u64,
    handles: HashMap<u64, (u64, Target)>,
    launches: usize,
}

fn service_of(screen: Screen) -> Option<Service> {
    Service::ALL.into_iter().find(|s| s.screen() == screen)
}

impl SimulatedApp {
    pub fn new(fixture: AppFixture) -> Self {
        Self {
            fixture,
            state: None,
            generation: 0,
            next_id: 0,
            handles: HashMap::new(),
            launches: 0,
        }
    }

    /// Screen currently on display, `None` when not running
    pub fn current_screen(&self) -> Option<Screen> {
        self.state.as_ref().map(|s| s.screen)
    }

    pub fn sdk_enabled(&self) -> Option<bool> {
        self.state.as_ref().map(|s| s.sdk_enabled)
    }

    pub fn service_enabled(&self, service: Service) -> Option<bool> {
        self.state.as_ref().map(|s| s.services[service.index()])
    }

    /// Number of times the app has been launched
    pub fn launches(&self) -> usize {
        self.launches
    }

    fn cells(&self, screen: Screen) -> Vec<Vec<String>> {
        match screen {
            Screen::AppCenter => {
                let mut cells = vec![vec![SET_ENABLED.to_string()]];
                cells.extend(Service::ALL.iter().map(|s| vec![s.label().to_string()]));
                cells.push(vec![Screen::DeviceInfo.title().to_string()]);
                for field in InfoField::ALL {
                    let value = match field {
                        InfoField::InstallId => &self.fixture.install_id,
                        InfoField::AppSecret => &self.fixture.app_secret,
                        InfoField::LogUrl => &self.fixture.log_url,
                    };
                    cells.push(vec![field.label().to_string(), value.clone()]);
                }
                cells.retain(|cell| {
                    cell.first()
                        .map_or(true, |caption| !self.fixture.hidden_rows.contains(caption))
                });
                cells
            }
            Screen::DeviceInfo => self
                .fixture
                .device_info
                .iter()
                .map(|(label, value)| vec![label.clone(), value.clone()])
                .collect(),
            _ => vec![vec![SET_ENABLED.to_string()]],
        }
    }

    fn issue(&mut self, target: Target) -> ElementHandle {
        self.next_id += 1;
        self.handles.insert(self.next_id, (self.generation, target));
        ElementHandle::new(self.next_id)
    }

    fn resolve(&self, element: ElementHandle) -> Option<Target> {
        self.state.as_ref()?;
        match self.handles.get(&element.id()) {
            Some((generation, target)) if *generation == self.generation => Some(*target),
            _ => None,
        }
    }

    fn navigate(&mut self, screen: Screen) {
        if let Some(state) = self.state.as_mut() {
            state.screen = screen;
            if screen.is_root() && self.fixture.reenable_on_back {
                state.sdk_enabled = true;
            }
        }
        self.generation += 1;
        // Every handle issued so far belongs to an older generation
        self.handles.clear();
    }

    fn lookup(&self, query: &Query) -> Option<Target> {
        let current = self.current_screen()?;
        match query {
            Query::Switch { screen, name } => (*screen == current
                && screen.has_enable_switch()
                && name == SET_ENABLED)
                .then_some(Target::Switch(*screen)),
            Query::StaticText { screen, label } if *screen == current => self
                .cells(current)
                .iter()
                .position(|cell| cell.first() == Some(label))
                .map(|row| Target::Text { screen: current, row }),
            Query::Button { label } => {
                (label == BACK_TO_ROOT && !current.is_root()).then_some(Target::BackButton)
            }
            Query::CellContaining { screen, text } if *screen == current => self
                .cells(current)
                .iter()
                .position(|cell| cell.first().is_some_and(|t| t.contains(text.as_str())))
                .map(|row| Target::Cell { screen: current, row }),
            Query::CellAt { screen, index } if *screen == current => {
                (*index < self.cells(current).len()).then_some(Target::Cell {
                    screen: current,
                    row: *index,
                })
            }
            _ => None,
        }
    }

    fn toggle(&mut self, screen: Screen) {
        let detached = self.fixture.detached.clone();
        let Some(state) = self.state.as_mut() else {
            return;
        };

        match service_of(screen) {
            None => {
                state.sdk_enabled = !state.sdk_enabled;
                for service in Service::ALL {
                    if !detached.contains(&service) {
                        state.services[service.index()] = state.sdk_enabled;
                    }
                }
            }
            // Services can't be switched while the SDK is disabled
            Some(service) if state.sdk_enabled => {
                state.services[service.index()] = !state.services[service.index()];
            }
            Some(_) => {}
        }
    }

    fn activate_row(&mut self, screen: Screen, row: usize) {
        if !screen.is_root() {
            return;
        }
        let caption = self.cells(screen).get(row).and_then(|c| c.first().cloned());
        let destination = match caption.as_deref() {
            Some(t) if t == Screen::DeviceInfo.title() => Some(Screen::DeviceInfo),
            Some(t) => Service::ALL
                .into_iter()
                .find(|s| s.label() == t)
                .map(Service::screen),
            None => None,
        };
        if let Some(destination) = destination {
            self.navigate(destination);
        }
    }
}

#[async_trait]
impl ElementLocator for SimulatedApp {
    async fn launch(&mut self) -> Result<()> {
        if let Some(reason) = &self.fixture.launch_failure {
            return Err(Error::LaunchFailed(reason.clone()));
        }

        let sdk_enabled = self.fixture.sdk_enabled;
        let mut services = [sdk_enabled; 4];
        for service in &self.fixture.detached {
            services[service.index()] = true;
        }

        self.state = Some(AppState {
            screen: Screen::AppCenter,
            sdk_enabled,
            services,
        });
        self.generation += 1;
        self.handles.clear();
        self.launches += 1;
        Ok(())
    }

    async fn find(&mut self, query: &Query, _wait: Duration) -> Result<Option<ElementHandle>> {
        Ok(self.lookup(query).map(|target| self.issue(target)))
    }

    async fn tap(&mut self, element: ElementHandle) -> Result<bool> {
        let Some(target) = self.resolve(element) else {
            return Ok(false);
        };

        match target {
            Target::Switch(screen) => self.toggle(screen),
            Target::Text { screen, row } | Target::Cell { screen, row } => {
                self.activate_row(screen, row)
            }
            Target::BackButton => self.navigate(Screen::AppCenter),
        }
        Ok(true)
    }

    async fn bool_value(&mut self, element: ElementHandle) -> Result<Option<bool>> {
        let (Some(Target::Switch(screen)), Some(state)) = (self.resolve(element), self.state.as_ref())
        else {
            return Ok(None);
        };

        Ok(Some(match service_of(screen) {
            Some(service) => state.services[service.index()],
            None => state.sdk_enabled,
        }))
    }

    async fn static_text(&mut self, element: ElementHandle, index: usize) -> Result<Option<String>> {
        let text = match self.resolve(element) {
            Some(Target::Text { screen, row }) | Some(Target::Cell { screen, row }) => self
                .cells(screen)
                .get(row)
                .and_then(|cell| cell.get(index).cloned()),
            Some(Target::Switch(_)) => (index == 0).then(|| SET_ENABLED.to_string()),
            Some(Target::BackButton) => (index == 0).then(|| BACK_TO_ROOT.to_string()),
            None => None,
        };
        Ok(text)
    }

    async fn cell_count(&mut self, screen: Screen) -> Result<Option<usize>> {
        Ok(match self.current_screen() {
            Some(current) if current == screen => Some(self.cells(screen).len()),
            _ => None,
        })
    }

    async fn terminate(&mut self) -> Result<()> {
        self.state = None;
        self.generation += 1;
        self.handles.clear();
        Ok(())
    }
}
