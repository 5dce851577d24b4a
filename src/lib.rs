//! Rooftop PV array sizing and time-stepped battery dispatch.

pub mod battery;
pub mod cli;
/// TOML scenario configuration and presets.
pub mod config;
pub mod demand;
pub mod error;
pub mod io;
pub mod pv;
pub mod runner;
pub mod telemetry;

pub use error::SimError;
