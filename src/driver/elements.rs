//! Element table for the App Center demo app
//!
//! Every screen title, control label and info-field label the harness relies
//! on is defined here, so the driver facade, the scenarios and the simulated
//! app all agree on one vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the enable switch on the root screen and on every service screen
pub const SET_ENABLED: &str = "Set Enabled";

/// Label of the back control on every sub-screen
pub const BACK_TO_ROOT: &str = "App Center";

/// Index of the value label inside an info cell (index 0 is the caption)
pub const VALUE_LABEL: usize = 1;

/// A navigable screen of the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Screen {
    #[serde(rename = "App Center")]
    AppCenter,
    Analytics,
    Crashes,
    Distribute,
    Push,
    #[serde(rename = "Device Info")]
    DeviceInfo,
}

impl Screen {
    /// Table title, which is also the label of the root row leading here
    pub const fn title(self) -> &'static str {
        match self {
            Screen::AppCenter => "App Center",
            Screen::Analytics => "Analytics",
            Screen::Crashes => "Crashes",
            Screen::Distribute => "Distribute",
            Screen::Push => "Push",
            Screen::DeviceInfo => "Device Info",
        }
    }

    pub const fn is_root(self) -> bool {
        matches!(self, Screen::AppCenter)
    }

    /// Whether the screen carries a "Set Enabled" switch
    pub const fn has_enable_switch(self) -> bool {
        !matches!(self, Screen::DeviceInfo)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A dependent SDK service whose enabled state follows the master switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    Analytics,
    Crashes,
    Distribute,
    Push,
}

impl Service {
    /// Services in verification order
    pub const ALL: [Service; 4] = [
        Service::Analytics,
        Service::Crashes,
        Service::Distribute,
        Service::Push,
    ];

    pub const fn screen(self) -> Screen {
        match self {
            Service::Analytics => Screen::Analytics,
            Service::Crashes => Screen::Crashes,
            Service::Distribute => Screen::Distribute,
            Service::Push => Screen::Push,
        }
    }

    pub const fn label(self) -> &'static str {
        self.screen().title()
    }

    /// Position in [`Service::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Service::ALL
            .into_iter()
            .find(|service| service.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown service '{}'", s))
    }
}

/// Expected syntactic shape of an info field value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    Uuid,
    Url,
}

/// A semantically constrained info field on the root screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoField {
    InstallId,
    AppSecret,
    LogUrl,
}

impl InfoField {
    /// Fields in verification order
    pub const ALL: [InfoField; 3] = [InfoField::InstallId, InfoField::AppSecret, InfoField::LogUrl];

    /// Caption text the row is matched by
    pub const fn label(self) -> &'static str {
        match self {
            InfoField::InstallId => "Install ID",
            InfoField::AppSecret => "App Secret",
            InfoField::LogUrl => "Log URL",
        }
    }

    pub const fn shape(self) -> FieldShape {
        match self {
            InfoField::InstallId | InfoField::AppSecret => FieldShape::Uuid,
            InfoField::LogUrl => FieldShape::Url,
        }
    }
}

impl fmt::Display for InfoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status texts the app shows while Analytics delivers an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendState {
    Sending,
    Sent,
    Failed,
}

impl SendState {
    pub const fn label(self) -> &'static str {
        match self {
            SendState::Sending => "Sending event occurred",
            SendState::Sent => "Sent event occurred",
            SendState::Failed => "Failed to send event occurred",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_order_is_fixed() {
        let labels: Vec<&str> = Service::ALL.iter().map(|s| s.label()).collect();
        assert_eq!(labels, ["Analytics", "Crashes", "Distribute", "Push"]);
        for (i, service) in Service::ALL.iter().enumerate() {
            assert_eq!(service.index(), i);
        }
    }

    #[test]
    fn test_service_from_str() {
        assert_eq!("push".parse::<Service>().unwrap(), Service::Push);
        assert_eq!("Crashes".parse::<Service>().unwrap(), Service::Crashes);
        assert!("Auth".parse::<Service>().is_err());
    }

    #[test]
    fn test_screen_serializes_as_title() {
        let json = serde_json::to_string(&Screen::DeviceInfo).unwrap();
        assert_eq!(json, "\"Device Info\"");
        let screen: Screen = serde_json::from_str("\"App Center\"").unwrap();
        assert_eq!(screen, Screen::AppCenter);
    }

    #[test]
    fn test_field_shapes() {
        assert_eq!(InfoField::InstallId.shape(), FieldShape::Uuid);
        assert_eq!(InfoField::AppSecret.shape(), FieldShape::Uuid);
        assert_eq!(InfoField::LogUrl.shape(), FieldShape::Url);
    }

    #[test]
    fn test_send_state_labels_are_distinct() {
        assert_ne!(SendState::Sending.label(), SendState::Sent.label());
        assert!(SendState::Failed.label().starts_with("Failed"));
    }
}
