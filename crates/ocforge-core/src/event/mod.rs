//! Workbench events: the bus owned by a workbench and the subscriptions
//! views read progress from.

pub mod bus;

pub use bus::{EventBus, WorkbenchEvents};
