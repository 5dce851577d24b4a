//! Battery parameters and the switches that decide which of them apply.

use crate::error::{SimError, ensure_finite};

/// Electrical and ageing parameters of the battery under dispatch.
///
/// State-of-charge values are absolute energies (kWh), not fractions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryParams {
    /// Duration of one period (hours).
    pub dt_hours: f64,
    /// State of charge before the first period (kWh).
    pub soc_0_kwh: f64,
    /// Lowest allowed state of charge (kWh).
    pub min_soc_kwh: f64,
    /// Highest allowed state of charge when new (kWh).
    pub max_soc_kwh: f64,
    /// Charge and discharge power limit (kW, positive magnitude).
    pub max_power_kw: f64,
    /// Fraction of charging energy that ends up stored (0..=1).
    pub efficiency: f64,
    /// Fractional capacity fade per period.
    pub dt_degradation: f64,
}

impl Default for BatteryParams {
    fn default() -> Self {
        Self {
            dt_hours: 1.0,
            soc_0_kwh: 5.0,
            min_soc_kwh: 1.0,
            max_soc_kwh: 10.0,
            max_power_kw: 15.0,
            efficiency: 0.98,
            dt_degradation: 0.01,
        }
    }
}

/// Selects which battery constraints the dispatch recurrence enforces.
///
/// With everything off the recurrence is the unconstrained greedy rule: the
/// battery cancels every period's demand regardless of its limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Clamp battery power into `[-max_power, max_power]`.
    pub apply_power_limit: bool,
    /// Keep the state of charge inside `[min_soc, max_soc]`.
    pub apply_soc_limits: bool,
    /// Scale stored charging energy by `efficiency`.
    pub apply_efficiency: bool,
    /// Shrink the usable capacity by `dt_degradation` every period.
    pub apply_degradation: bool,
    /// Start the first period from the clamped initial state of charge
    /// instead of the raw `soc_0`.
    pub keep_initial_clamp: bool,
}

impl DispatchOptions {
    /// The literal unconstrained rule.
    pub fn baseline() -> Self {
        Self::default()
    }

    /// Every constraint enabled.
    pub fn constrained() -> Self {
        Self {
            apply_power_limit: true,
            apply_soc_limits: true,
            apply_efficiency: true,
            apply_degradation: true,
            keep_initial_clamp: true,
        }
    }

    /// True if no constraint is enabled.
    pub fn is_baseline(&self) -> bool {
        *self == Self::baseline()
    }
}

impl BatteryParams {
    /// Validates the parameters that `options` actually uses.
    ///
    /// `dt_hours` and `soc_0_kwh` must always be finite; `dt_hours > 0` is
    /// only required with SoC limits. Bounds, power limit,
    /// efficiency and degradation are only checked when their switch is on,
    /// so the unconstrained rule accepts whatever it ignores.
    ///
    /// # Errors
    ///
    /// Returns the first [`SimError::InvalidInput`] found.
    pub fn validate(&self, options: &DispatchOptions) -> Result<(), SimError> {
        ensure_finite("battery.dt_hours", self.dt_hours)?;
        ensure_finite("battery.soc_0_kwh", self.soc_0_kwh)?;
        // Re-deriving power from a clamped SoC change divides by dt.
        if options.apply_soc_limits && self.dt_hours <= 0.0 {
            return Err(SimError::invalid("battery.dt_hours", "must be > 0"));
        }

        if options.apply_soc_limits || options.keep_initial_clamp || options.apply_degradation {
            ensure_finite("battery.min_soc_kwh", self.min_soc_kwh)?;
            ensure_finite("battery.max_soc_kwh", self.max_soc_kwh)?;
            if self.min_soc_kwh > self.max_soc_kwh {
                return Err(SimError::invalid(
                    "battery.min_soc_kwh",
                    "must be <= battery.max_soc_kwh",
                ));
            }
        }
        if options.apply_power_limit {
            ensure_finite("battery.max_power_kw", self.max_power_kw)?;
            if self.max_power_kw < 0.0 {
                return Err(SimError::invalid("battery.max_power_kw", "must be >= 0"));
            }
        }
        if options.apply_efficiency && !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(SimError::invalid(
                "battery.efficiency",
                format!("must be in (0, 1], got {}", self.efficiency),
            ));
        }
        if options.apply_degradation && !(0.0..1.0).contains(&self.dt_degradation) {
            return Err(SimError::invalid(
                "battery.dt_degradation",
                format!("must be in [0, 1), got {}", self.dt_degradation),
            ));
        }
        Ok(())
    }

    /// `soc_0` clamped into `[min_soc, max_soc]`.
    pub fn clamped_initial_soc(&self) -> f64 {
        self.soc_0_kwh.max(self.min_soc_kwh).min(self.max_soc_kwh)
    }

    /// Usable capacity ceiling during `period` after capacity fade.
    ///
    /// Never drops below `min_soc`.
    pub fn faded_max_soc(&self, period: usize) -> f64 {
        let exponent = i32::try_from(period).unwrap_or(i32::MAX);
        (self.max_soc_kwh * (1.0 - self.dt_degradation).powi(exponent)).max(self.min_soc_kwh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_exercise() {
        let p = BatteryParams::default();
        assert_eq!(p.dt_hours, 1.0);
        assert_eq!(p.soc_0_kwh, 5.0);
        assert_eq!(p.min_soc_kwh, 1.0);
        assert_eq!(p.max_soc_kwh, 10.0);
        assert_eq!(p.max_power_kw, 15.0);
        assert_eq!(p.efficiency, 0.98);
        assert_eq!(p.dt_degradation, 0.01);
    }

    #[test]
    fn test_baseline_has_no_constraints() {
        let o = DispatchOptions::baseline();
        assert!(o.is_baseline());
        assert!(!DispatchOptions::constrained().is_baseline());
    }

    #[test]
    fn test_clamped_initial_soc() {
        let mut p = BatteryParams::default();
        assert_eq!(p.clamped_initial_soc(), 5.0);
        p.soc_0_kwh = 0.0;
        assert_eq!(p.clamped_initial_soc(), 1.0);
        p.soc_0_kwh = 50.0;
        assert_eq!(p.clamped_initial_soc(), 10.0);
    }

    #[test]
    fn test_faded_max_soc() {
        let p = BatteryParams::default();
        assert_eq!(p.faded_max_soc(0), 10.0);
        assert!((p.faded_max_soc(1) - 9.9).abs() < 1e-12);
        assert!((p.faded_max_soc(2) - 9.801).abs() < 1e-12);
    }

    #[test]
    fn test_faded_max_soc_floors_at_min_soc() {
        let p = BatteryParams {
            dt_degradation: 0.5,
            ..BatteryParams::default()
        };
        assert_eq!(p.faded_max_soc(10), 1.0);
    }

    #[test]
    fn test_baseline_ignores_unused_parameters() {
        let p = BatteryParams {
            min_soc_kwh: 20.0,
            max_power_kw: -1.0,
            efficiency: 7.0,
            dt_degradation: 2.0,
            ..BatteryParams::default()
        };
        assert!(p.validate(&DispatchOptions::baseline()).is_ok());
        assert!(p.validate(&DispatchOptions::constrained()).is_err());
    }

    #[test]
    fn test_zero_dt_rejected_only_with_soc_limits() {
        let p = BatteryParams {
            dt_hours: 0.0,
            ..BatteryParams::default()
        };
        assert!(p.validate(&DispatchOptions::baseline()).is_ok());
        let opts = DispatchOptions {
            apply_soc_limits: true,
            ..DispatchOptions::baseline()
        };
        let err = p.validate(&opts).unwrap_err();
        assert!(err.to_string().contains("battery.dt_hours"));
    }

    #[test]
    fn test_non_finite_dt_always_rejected() {
        let p = BatteryParams {
            dt_hours: f64::NAN,
            ..BatteryParams::default()
        };
        assert!(p.validate(&DispatchOptions::baseline()).is_err());
    }

    #[test]
    fn test_bad_efficiency_rejected_when_applied() {
        let p = BatteryParams {
            efficiency: 0.0,
            ..BatteryParams::default()
        };
        let opts = DispatchOptions {
            apply_efficiency: true,
            ..DispatchOptions::baseline()
        };
        let err = p.validate(&opts).unwrap_err();
        assert!(err.to_string().contains("battery.efficiency"));
    }

    #[test]
    fn test_inverted_bounds_rejected_when_applied() {
        let p = BatteryParams {
            min_soc_kwh: 11.0,
            ..BatteryParams::default()
        };
        let opts = DispatchOptions {
            apply_soc_limits: true,
            ..DispatchOptions::baseline()
        };
        assert!(p.validate(&opts).is_err());
    }
}
