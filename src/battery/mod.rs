//! Time-stepped battery state-of-charge simulation.

pub mod dispatch;
pub mod params;
/// Post-hoc dispatch indicators.
pub mod summary;

pub use dispatch::{DispatchStep, DispatchTrace, simulate_battery};
pub use params::{BatteryParams, DispatchOptions};
pub use summary::DispatchSummary;
