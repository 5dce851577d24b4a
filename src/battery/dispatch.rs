//! Greedy battery dispatch over a fixed demand profile.

use std::fmt;

use tracing::{debug, trace};

use super::params::{BatteryParams, DispatchOptions};
use crate::error::{SimError, ensure_finite};

/// Record of one dispatch period.
///
/// # Power Convention (Battery)
/// - Positive `battery_kw`: charging (absorbs surplus)
/// - Negative `battery_kw`: discharging (serves load)
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchStep {
    /// Period index.
    pub period: usize,
    /// Start of the period (hours since the run began).
    pub time_hr: f64,
    /// Net demand before the battery acts (kW; positive=load, negative=surplus).
    pub demand_kw: f64,
    /// Battery power actually delivered this period (kW).
    pub battery_kw: f64,
    /// State of charge at the end of the period (kWh).
    pub soc_kwh: f64,
    /// Usable capacity ceiling during the period (kWh).
    pub capacity_kwh: f64,
    /// Demand left after the battery acts, `demand_kw + battery_kw` (kW).
    pub net_demand_kw: f64,
}

impl fmt::Display for DispatchStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} ({:>5.1}h) | demand={:>7.2} kW  bat={:>7.2} kW  net={:>7.2} kW | \
             SoC={:>7.2} kWh (cap {:.2})",
            self.period,
            self.time_hr,
            self.demand_kw,
            self.battery_kw,
            self.net_demand_kw,
            self.soc_kwh,
            self.capacity_kwh,
        )
    }
}

/// Complete output of one dispatch run, one step per demand period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchTrace {
    pub steps: Vec<DispatchStep>,
}

impl DispatchTrace {
    /// Number of periods simulated.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Battery power per period (kW).
    pub fn battery_kw(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.battery_kw).collect()
    }

    /// State of charge per period (kWh).
    pub fn soc_kwh(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.soc_kwh).collect()
    }

    /// Post-battery net demand per period (kW).
    pub fn net_demand_kw(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.net_demand_kw).collect()
    }

    /// State of charge after the last period, if any period ran.
    pub fn final_soc_kwh(&self) -> Option<f64> {
        self.steps.last().map(|s| s.soc_kwh)
    }

    /// Splits the trace into `(battery_kw, soc_kwh, net_demand_kw)`.
    pub fn into_series(self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let n = self.steps.len();
        let mut battery = Vec::with_capacity(n);
        let mut soc = Vec::with_capacity(n);
        let mut net = Vec::with_capacity(n);
        for s in self.steps {
            battery.push(s.battery_kw);
            soc.push(s.soc_kwh);
            net.push(s.net_demand_kw);
        }
        (battery, soc, net)
    }
}

/// Power the greedy rule asks for: exactly cancel the period's demand.
fn requested_power_kw(demand_kw: f64) -> f64 {
    if demand_kw > 0.0 {
        // Load: discharge
        -demand_kw
    } else if demand_kw < 0.0 {
        // Surplus: charge
        -demand_kw
    } else {
        0.0
    }
}

/// Energy that reaches the cells for a given battery power.
fn stored_energy_kwh(battery_kw: f64, params: &BatteryParams, options: &DispatchOptions) -> f64 {
    let energy = battery_kw * params.dt_hours;
    if options.apply_efficiency && battery_kw > 0.0 {
        energy * params.efficiency
    } else {
        energy
    }
}

/// Inverse of [`stored_energy_kwh`].
fn power_for_stored_kwh(delta_kwh: f64, params: &BatteryParams, options: &DispatchOptions) -> f64 {
    if options.apply_efficiency && delta_kwh > 0.0 {
        delta_kwh / (params.dt_hours * params.efficiency)
    } else {
        delta_kwh / params.dt_hours
    }
}

/// Simulates greedy battery dispatch against a demand profile.
///
/// Each period the battery is asked to cancel that period's demand. With
/// [`DispatchOptions::baseline`] nothing limits it, so every net demand is
/// zero and the state of charge is the running sum `soc_0 + Σ bat·dt`, even
/// when that leaves the battery's bounds. Enabling options layers on, in
/// order: the power limit, charging efficiency, capacity fade and the SoC
/// window. When the SoC window bites, the battery power is re-derived from
/// the energy that could actually be moved.
///
/// The state of charge is never pushed further outside `[min_soc, ceiling]`
/// than it already was, so an out-of-range start drifts back only through
/// dispatch in the correct direction.
///
/// # Errors
///
/// Returns [`SimError::InvalidInput`] for non-finite demand values or
/// parameters that the enabled options rely on.
///
/// # Examples
///
/// ```
/// use pv_battery_sim::battery::{BatteryParams, DispatchOptions, simulate_battery};
///
/// let trace = simulate_battery(
///     &[2.0, -3.0],
///     &BatteryParams::default(),
///     &DispatchOptions::baseline(),
/// )
/// .unwrap();
/// assert_eq!(trace.battery_kw(), vec![-2.0, 3.0]);
/// assert_eq!(trace.soc_kwh(), vec![3.0, 6.0]);
/// ```
pub fn simulate_battery(
    demand_kw: &[f64],
    params: &BatteryParams,
    options: &DispatchOptions,
) -> Result<DispatchTrace, SimError> {
    params.validate(options)?;
    for (i, &d) in demand_kw.iter().enumerate() {
        ensure_finite(&format!("demand_kw[{i}]"), d)?;
    }

    let mut steps = Vec::with_capacity(demand_kw.len());
    let mut prev_soc = if options.keep_initial_clamp {
        params.clamped_initial_soc()
    } else {
        params.soc_0_kwh
    };

    for (period, &demand) in demand_kw.iter().enumerate() {
        let capacity_kwh = if options.apply_degradation {
            params.faded_max_soc(period)
        } else {
            params.max_soc_kwh
        };

        let mut battery_kw = requested_power_kw(demand);
        if options.apply_power_limit {
            battery_kw = battery_kw.clamp(-params.max_power_kw, params.max_power_kw);
        }

        let stored_kwh = stored_energy_kwh(battery_kw, params, options);
        let soc_kwh = if options.apply_soc_limits {
            // Energy above a faded ceiling is lost, not discharged.
            let start = if options.apply_degradation {
                prev_soc.min(capacity_kwh)
            } else {
                prev_soc
            };
            let lo = params.min_soc_kwh.min(start);
            let hi = capacity_kwh.max(start);
            let candidate = start + stored_kwh;
            let bounded = candidate.clamp(lo, hi);
            if bounded != candidate {
                battery_kw = power_for_stored_kwh(bounded - start, params, options);
            }
            bounded
        } else {
            prev_soc + stored_kwh
        };

        let step = DispatchStep {
            period,
            time_hr: period as f64 * params.dt_hours,
            demand_kw: demand,
            battery_kw,
            soc_kwh,
            capacity_kwh,
            net_demand_kw: demand + battery_kw,
        };
        trace!(
            period,
            demand_kw = demand,
            battery_kw,
            soc_kwh,
            "dispatch period"
        );
        steps.push(step);
        prev_soc = soc_kwh;
    }

    debug!(
        periods = steps.len(),
        final_soc_kwh = prev_soc,
        baseline = options.is_baseline(),
        "battery dispatch complete"
    );

    Ok(DispatchTrace { steps })
}
