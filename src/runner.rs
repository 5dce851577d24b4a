//! Runs a complete scenario: roof sizing and battery dispatch.
//!
//! The two computations share nothing; the runner only feeds both from one
//! configuration and bundles the results for reporting.

use tracing::info;

use crate::battery::{DispatchSummary, DispatchTrace, simulate_battery};
use crate::config::{ConfigError, ScenarioConfig};
use crate::pv::{PvSizing, size_pv_array};

/// Everything a scenario run produces.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub sizing: PvSizing,
    pub demand_kw: Vec<f64>,
    pub trace: DispatchTrace,
    pub summary: DispatchSummary,
}

/// Sizes the PV array and simulates the battery for `config`.
///
/// # Errors
///
/// Returns a `ConfigError` naming the offending field if either computation
/// rejects its inputs.
pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioReport, ConfigError> {
    let roof = &config.roof;
    let panel = config.panel_spec()?;
    let sizing = size_pv_array(roof.length_m, roof.width_m, roof.angle_deg, &panel)?;
    info!(
        n_panels = sizing.n_panels,
        capacity_kw = sizing.capacity_kw,
        "PV array sized"
    );

    let demand_kw = config.demand_profile();
    let params = config.battery_params();
    let trace = simulate_battery(&demand_kw, &params, &config.dispatch_options())?;
    let summary = DispatchSummary::from_trace(&trace, &params);
    info!(
        periods = summary.periods,
        final_soc_kwh = summary.final_soc_kwh,
        "battery dispatch simulated"
    );

    Ok(ScenarioReport {
        sizing,
        demand_kw,
        trace,
        summary,
    })
}
