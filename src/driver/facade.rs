//! UI driver facade
//!
//! Translates semantic requests ("the enable switch on the Push screen",
//! "the row containing Install ID") into locator queries, and locator
//! absence into [`Error::ElementNotFound`]. Every call performs exactly one
//! UI action; nothing is retried beyond the locator's bounded wait.

use std::time::Duration;

use crate::common::{Error, Result};

use super::elements::{Screen, BACK_TO_ROOT};
use super::locator::{ElementHandle, ElementLocator, Query};

/// A resolved element together with the query that found it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    handle: ElementHandle,
    query: Query,
}

/// A located switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toggle(Element);

/// A located table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Element);

impl AsRef<Element> for Element {
    fn as_ref(&self) -> &Element {
        self
    }
}

impl AsRef<Element> for Toggle {
    fn as_ref(&self) -> &Element {
        &self.0
    }
}

impl AsRef<Element> for Row {
    fn as_ref(&self) -> &Element {
        &self.0
    }
}

/// Driver facade over a host automation capability
pub struct Driver<L> {
    locator: L,
    element_wait: Duration,
}

impl<L: ElementLocator> Driver<L> {
    pub fn new(locator: L, element_wait: Duration) -> Self {
        Self {
            locator,
            element_wait,
        }
    }

    pub fn locator(&self) -> &L {
        &self.locator
    }

    /// Start the application under test
    ///
    /// Any failure here is reported as [`Error::LaunchFailed`].
    pub async fn launch(&mut self) -> Result<()> {
        tracing::debug!("Launching application");
        self.locator.launch().await.map_err(|e| match e {
            Error::LaunchFailed(_) => e,
            other => Error::LaunchFailed(other.to_string()),
        })
    }

    /// Stop the application under test
    pub async fn terminate(&mut self) -> Result<()> {
        tracing::debug!("Terminating application");
        self.locator.terminate().await
    }

    async fn locate(&mut self, query: Query) -> Result<Element> {
        tracing::debug!(%query, "Locating element");
        match self.locator.find(&query, self.element_wait).await? {
            Some(handle) => Ok(Element { handle, query }),
            None => Err(Error::element_not_found(&query, self.element_wait)),
        }
    }

    /// Find the switch named `name` on `screen`
    pub async fn find_toggle(&mut self, screen: Screen, name: &str) -> Result<Toggle> {
        self.locate(Query::switch(screen, name)).await.map(Toggle)
    }

    /// Read the on/off state of a switch
    pub async fn read_toggle_state(&mut self, toggle: &Toggle) -> Result<bool> {
        let state = self
            .locator
            .bool_value(toggle.0.handle)
            .await?
            .ok_or_else(|| Error::element_not_found(&toggle.0.query, Duration::ZERO))?;
        tracing::debug!(query = %toggle.0.query, state, "Read toggle state");
        Ok(state)
    }

    /// Tap an element
    pub async fn tap<E: AsRef<Element>>(&mut self, element: &E) -> Result<()> {
        let element = element.as_ref();
        tracing::debug!(query = %element.query, "Tapping element");
        if self.locator.tap(element.handle).await? {
            Ok(())
        } else {
            Err(Error::element_not_found(&element.query, Duration::ZERO))
        }
    }

    /// Find the first row on `screen` with a label containing `text`
    pub async fn find_row(&mut self, screen: Screen, text: &str) -> Result<Row> {
        self.locate(Query::cell_containing(screen, text)).await.map(Row)
    }

    /// Find the row at a 0-based position on `screen`
    pub async fn row_at(&mut self, screen: Screen, index: usize) -> Result<Row> {
        self.locate(Query::cell_at(screen, index)).await.map(Row)
    }

    /// Read the `index`-th static text of a row
    pub async fn read_label(&mut self, row: &Row, index: usize) -> Result<String> {
        self.locator
            .static_text(row.0.handle, index)
            .await?
            .ok_or_else(|| {
                Error::element_not_found(
                    format!("static text #{} of {}", index, row.0.query),
                    Duration::ZERO,
                )
            })
    }

    /// Number of rows currently rendered on `screen`
    pub async fn count_cells(&mut self, screen: Screen) -> Result<usize> {
        self.locator
            .cell_count(screen)
            .await?
            .ok_or_else(|| Error::element_not_found(format!("table '{}'", screen), Duration::ZERO))
    }

    /// Navigate from the root screen to `screen` by tapping its row
    pub async fn open(&mut self, screen: Screen) -> Result<()> {
        let row = self
            .locate(Query::static_text(Screen::AppCenter, screen.title()))
            .await?;
        self.tap(&row).await
    }

    /// Navigate back to the root screen
    pub async fn back_to_root(&mut self) -> Result<()> {
        let back = self.locate(Query::button(BACK_TO_ROOT)).await?;
        self.tap(&back).await
    }
}
