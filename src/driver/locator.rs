//! Host automation capability
//!
//! [`ElementLocator`] is the seam between the harness and whatever actually
//! reads the accessibility tree: an external agent process in production, a
//! simulated app in tests. Absence is reported as `None`/`false`, never as an
//! error; the driver facade decides what absence means.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::common::Result;

use super::elements::Screen;

/// Opaque reference to a resolved UI element
///
/// Handles are only valid until the next screen transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    id: u64,
}

impl ElementHandle {
    pub const fn new(id: u64) -> Self {
        Self { id }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }
}

/// Semantic element query, always scoped to the screen expected on display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    /// Switch with the given name
    Switch { screen: Screen, name: String },
    /// Static text whose label equals `label`
    StaticText { screen: Screen, label: String },
    /// Button with the given label
    Button { label: String },
    /// First cell with a static text containing `text`
    CellContaining { screen: Screen, text: String },
    /// Cell at a 0-based position
    CellAt { screen: Screen, index: usize },
}

impl Query {
    pub fn switch(screen: Screen, name: impl Into<String>) -> Self {
        Self::Switch {
            screen,
            name: name.into(),
        }
    }

    pub fn static_text(screen: Screen, label: impl Into<String>) -> Self {
        Self::StaticText {
            screen,
            label: label.into(),
        }
    }

    pub fn button(label: impl Into<String>) -> Self {
        Self::Button {
            label: label.into(),
        }
    }

    pub fn cell_containing(screen: Screen, text: impl Into<String>) -> Self {
        Self::CellContaining {
            screen,
            text: text.into(),
        }
    }

    pub fn cell_at(screen: Screen, index: usize) -> Self {
        Self::CellAt { screen, index }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Switch { screen, name } => write!(f, "switch '{}' on '{}'", name, screen),
            Query::StaticText { screen, label } => write!(f, "text '{}' on '{}'", label, screen),
            Query::Button { label } => write!(f, "button '{}'", label),
            Query::CellContaining { screen, text } => {
                write!(f, "cell containing '{}' on '{}'", text, screen)
            }
            Query::CellAt { screen, index } => write!(f, "cell #{} on '{}'", index, screen),
        }
    }
}

/// Accessibility automation primitives
#[async_trait]
pub trait ElementLocator: Send {
    /// Start (or restart) the application under test
    async fn launch(&mut self) -> Result<()>;

    /// Resolve a query, waiting up to `wait` for the element to exist
    async fn find(&mut self, query: &Query, wait: Duration) -> Result<Option<ElementHandle>>;

    /// Tap an element; `false` if the handle is stale
    async fn tap(&mut self, element: ElementHandle) -> Result<bool>;

    /// Boolean value of a switch; `None` if stale or not a switch
    async fn bool_value(&mut self, element: ElementHandle) -> Result<Option<bool>>;

    /// Label of the `index`-th static text inside an element
    async fn static_text(&mut self, element: ElementHandle, index: usize) -> Result<Option<String>>;

    /// Number of cells rendered on `screen`; `None` if it isn't displayed
    async fn cell_count(&mut self, screen: Screen) -> Result<Option<usize>>;

    /// Stop the application under test
    async fn terminate(&mut self) -> Result<()>;
}
