//! UI driver: element vocabulary, host capability seam and facade

pub mod elements;
mod facade;
mod locator;
mod simulator;

pub use elements::{FieldShape, InfoField, Screen, SendState, Service};
pub use facade::{Driver, Element, Row, Toggle};
pub use locator::{ElementHandle, ElementLocator, Query};
pub use simulator::{AppFixture, SimulatedApp};
