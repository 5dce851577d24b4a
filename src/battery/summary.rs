//! Post-hoc indicators computed from a dispatch trace.

use std::fmt;

use super::dispatch::DispatchTrace;
use super::params::BatteryParams;

/// Aggregate indicators for one dispatch run.
///
/// Computed from the finished [`DispatchTrace`] so the numbers always agree
/// with the per-period records.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchSummary {
    /// Number of periods simulated.
    pub periods: usize,
    /// State of charge after the last period (kWh); `soc_0` for an empty run.
    pub final_soc_kwh: f64,
    /// Lowest state of charge reached (kWh).
    pub min_soc_seen_kwh: f64,
    /// Highest state of charge reached (kWh).
    pub max_soc_seen_kwh: f64,
    /// Energy taken in while charging (kWh, positive).
    pub energy_charged_kwh: f64,
    /// Energy delivered while discharging (kWh, positive).
    pub energy_discharged_kwh: f64,
    /// Total battery energy throughput (kWh, sum of |power| * dt).
    pub throughput_kwh: f64,
    /// Equivalent full cycles (throughput / 2*max_soc).
    pub equivalent_full_cycles: f64,
    /// Largest battery power magnitude (kW).
    pub peak_power_kw: f64,
    /// Demand energy the battery did not cover (kWh, sum of |net| * dt).
    pub unmet_energy_kwh: f64,
    /// Periods whose state of charge is outside `[min_soc, max_soc]`.
    pub soc_violation_count: usize,
}

impl DispatchSummary {
    /// Computes all indicators from a finished run.
    ///
    /// # Arguments
    ///
    /// * `trace` - Complete dispatch trace
    /// * `params` - Battery parameters the run used
    pub fn from_trace(trace: &DispatchTrace, params: &BatteryParams) -> Self {
        let dt = params.dt_hours;
        if trace.is_empty() {
            return Self {
                periods: 0,
                final_soc_kwh: params.soc_0_kwh,
                min_soc_seen_kwh: params.soc_0_kwh,
                max_soc_seen_kwh: params.soc_0_kwh,
                energy_charged_kwh: 0.0,
                energy_discharged_kwh: 0.0,
                throughput_kwh: 0.0,
                equivalent_full_cycles: 0.0,
                peak_power_kw: 0.0,
                unmet_energy_kwh: 0.0,
                soc_violation_count: 0,
            };
        }

        let mut min_soc = f64::INFINITY;
        let mut max_soc = f64::NEG_INFINITY;
        let mut charged = 0.0_f64;
        let mut discharged = 0.0_f64;
        let mut peak = 0.0_f64;
        let mut unmet = 0.0_f64;
        let mut violations = 0_usize;

        for s in &trace.steps {
            min_soc = min_soc.min(s.soc_kwh);
            max_soc = max_soc.max(s.soc_kwh);

            if s.battery_kw > 0.0 {
                charged += s.battery_kw * dt;
            } else if s.battery_kw < 0.0 {
                discharged += -s.battery_kw * dt;
            }
            peak = peak.max(s.battery_kw.abs());
            unmet += s.net_demand_kw.abs() * dt;

            if s.soc_kwh < params.min_soc_kwh || s.soc_kwh > params.max_soc_kwh {
                violations += 1;
            }
        }

        let throughput = charged + discharged;
        let cycles = if params.max_soc_kwh > 0.0 {
            throughput / (2.0 * params.max_soc_kwh)
        } else {
            0.0
        };

        Self {
            periods: trace.len(),
            final_soc_kwh: trace.final_soc_kwh().unwrap_or(params.soc_0_kwh),
            min_soc_seen_kwh: min_soc,
            max_soc_seen_kwh: max_soc,
            energy_charged_kwh: charged,
            energy_discharged_kwh: discharged,
            throughput_kwh: throughput,
            equivalent_full_cycles: cycles,
            peak_power_kw: peak,
            unmet_energy_kwh: unmet,
            soc_violation_count: violations,
        }
    }
}

impl fmt::Display for DispatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Dispatch Summary ---")?;
        writeln!(f, "Periods:               {}", self.periods)?;
        writeln!(f, "Final state of charge: {:.2} kWh", self.final_soc_kwh)?;
        writeln!(
            f,
            "SoC range seen:        {:.2} .. {:.2} kWh",
            self.min_soc_seen_kwh, self.max_soc_seen_kwh
        )?;
        writeln!(
            f,
            "Energy in / out:       {:.2} / {:.2} kWh",
            self.energy_charged_kwh, self.energy_discharged_kwh
        )?;
        writeln!(
            f,
            "Battery throughput:    {:.2} kWh ({:.2} equiv. cycles)",
            self.throughput_kwh, self.equivalent_full_cycles
        )?;
        writeln!(f, "Peak battery power:    {:.2} kW", self.peak_power_kw)?;
        writeln!(f, "Unmet energy:          {:.2} kWh", self.unmet_energy_kwh)?;
        write!(f, "SoC violations:        {}", self.soc_violation_count)
    }
}
