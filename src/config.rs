//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::battery::{BatteryParams, DispatchOptions};
use crate::demand::{EXERCISE_DEMAND_KW, synthetic_demand};
use crate::error::SimError;
use crate::pv::PanelSpec;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the teaching exercise. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::exercise`] for the built-in default.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Roof geometry.
    #[serde(default)]
    pub roof: RoofConfig,
    /// PV panel data sheet.
    #[serde(default)]
    pub panel: PanelConfig,
    /// Battery parameters.
    #[serde(default)]
    pub battery: BatteryConfig,
    /// Which battery constraints apply.
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Demand profile source.
    #[serde(default)]
    pub demand: DemandConfig,
}

/// Roof geometry.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoofConfig {
    /// Length along the ridge/eaves (m).
    pub length_m: f64,
    /// Plan-view width (m).
    pub width_m: f64,
    /// Pitch from horizontal (degrees).
    pub angle_deg: f64,
}

impl Default for RoofConfig {
    fn default() -> Self {
        Self {
            length_m: 30.0,
            width_m: 10.0,
            angle_deg: 22.0,
        }
    }
}

/// PV panel data sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    pub width_mm: f64,
    pub height_mm: f64,
    pub power_wp: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width_mm: PanelSpec::DEFAULT_WIDTH_MM,
            height_mm: PanelSpec::DEFAULT_HEIGHT_MM,
            power_wp: PanelSpec::DEFAULT_POWER_WP,
        }
    }
}

/// Battery parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatteryConfig {
    /// Period length (hours).
    pub dt_hours: f64,
    /// Initial state of charge (kWh).
    pub soc_0_kwh: f64,
    /// Minimum state of charge (kWh).
    pub min_soc_kwh: f64,
    /// Maximum state of charge (kWh).
    pub max_soc_kwh: f64,
    /// Charge/discharge power limit (kW).
    pub max_power_kw: f64,
    /// Charging efficiency (0.0–1.0).
    pub efficiency: f64,
    /// Capacity fade per period (0.0–1.0).
    pub dt_degradation: f64,
}

impl Default for BatteryConfig {
    fn default() -> Self {
        let p = BatteryParams::default();
        Self {
            dt_hours: p.dt_hours,
            soc_0_kwh: p.soc_0_kwh,
            min_soc_kwh: p.min_soc_kwh,
            max_soc_kwh: p.max_soc_kwh,
            max_power_kw: p.max_power_kw,
            efficiency: p.efficiency,
            dt_degradation: p.dt_degradation,
        }
    }
}

/// Constraint switches; all off reproduces the unconstrained exercise.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub apply_power_limit: bool,
    pub apply_soc_limits: bool,
    pub apply_efficiency: bool,
    pub apply_degradation: bool,
    pub keep_initial_clamp: bool,
}

/// Demand profile source.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DemandConfig {
    /// `"exercise"`, `"fixed"` (uses `values_kw`) or `"synthetic"`.
    pub source: String,
    /// Explicit per-period demand for the `"fixed"` source (kW).
    pub values_kw: Vec<f64>,
    /// Number of periods for the `"synthetic"` source.
    pub periods: usize,
    /// Sinusoid amplitude for the `"synthetic"` source (kW).
    pub amplitude_kw: f64,
    /// Noise standard deviation for the `"synthetic"` source (kW).
    pub noise_std_kw: f64,
    /// Random seed for the `"synthetic"` source.
    pub seed: u64,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            source: "exercise".to_string(),
            values_kw: Vec::new(),
            periods: 24,
            amplitude_kw: 8.0,
            noise_std_kw: 2.0,
            seed: 42,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field} - {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"battery.dt_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<SimError> for ConfigError {
    fn from(e: SimError) -> Self {
        match e {
            SimError::InvalidInput { field, reason } => Self::new(field, reason),
        }
    }
}

impl ScenarioConfig {
    /// The literal exercise: reference roof and panel, fixed ten-period
    /// demand, no battery constraints.
    pub fn exercise() -> Self {
        Self::default()
    }

    /// Exercise inputs with every battery constraint enabled.
    pub fn constrained() -> Self {
        Self {
            dispatch: DispatchConfig {
                apply_power_limit: true,
                apply_soc_limits: true,
                apply_efficiency: true,
                apply_degradation: true,
                keep_initial_clamp: true,
            },
            ..Self::default()
        }
    }

    /// A day of noisy synthetic demand on an ageing, power-limited battery.
    pub fn degrading() -> Self {
        Self {
            battery: BatteryConfig {
                max_power_kw: 6.0,
                dt_degradation: 0.02,
                efficiency: 0.92,
                ..BatteryConfig::default()
            },
            dispatch: DispatchConfig {
                apply_power_limit: true,
                apply_soc_limits: true,
                apply_efficiency: true,
                apply_degradation: true,
                keep_initial_clamp: true,
            },
            demand: DemandConfig {
                source: "synthetic".to_string(),
                ..DemandConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["exercise", "constrained", "degrading"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "exercise" => Ok(Self::exercise()),
            "constrained" => Ok(Self::constrained()),
            "degrading" => Ok(Self::degrading()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e: toml::de::Error| ConfigError::new("toml", e.to_string()))
    }

    /// Panel specification for the sizer.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the panel values are invalid.
    pub fn panel_spec(&self) -> Result<PanelSpec, ConfigError> {
        let p = &self.panel;
        Ok(PanelSpec::new(p.width_mm, p.height_mm, p.power_wp)?)
    }

    pub fn battery_params(&self) -> BatteryParams {
        let b = &self.battery;
        BatteryParams {
            dt_hours: b.dt_hours,
            soc_0_kwh: b.soc_0_kwh,
            min_soc_kwh: b.min_soc_kwh,
            max_soc_kwh: b.max_soc_kwh,
            max_power_kw: b.max_power_kw,
            efficiency: b.efficiency,
            dt_degradation: b.dt_degradation,
        }
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        let d = &self.dispatch;
        DispatchOptions {
            apply_power_limit: d.apply_power_limit,
            apply_soc_limits: d.apply_soc_limits,
            apply_efficiency: d.apply_efficiency,
            apply_degradation: d.apply_degradation,
            keep_initial_clamp: d.keep_initial_clamp,
        }
    }

    /// Builds the demand profile selected by `[demand]`.
    ///
    /// Unknown sources fall back to the exercise profile; [`Self::validate`]
    /// reports them.
    pub fn demand_profile(&self) -> Vec<f64> {
        let d = &self.demand;
        match d.source.as_str() {
            "fixed" => d.values_kw.clone(),
            "synthetic" => synthetic_demand(d.periods, d.amplitude_kw, d.noise_std_kw, d.seed),
            _ => EXERCISE_DEMAND_KW.to_vec(),
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let r = &self.roof;
        for (field, value) in [
            ("roof.length_m", r.length_m),
            ("roof.width_m", r.width_m),
            ("roof.angle_deg", r.angle_deg),
        ] {
            if !value.is_finite() {
                errors.push(ConfigError::new(field, "must be finite"));
            }
        }

        if let Err(e) = self.panel_spec() {
            errors.push(e);
        }

        if let Err(e) = self.battery_params().validate(&self.dispatch_options()) {
            errors.push(e.into());
        }

        let d = &self.demand;
        match d.source.as_str() {
            "exercise" => {}
            "fixed" => {
                if let Some(i) = d.values_kw.iter().position(|v| !v.is_finite()) {
                    errors.push(ConfigError::new(
                        format!("demand.values_kw[{i}]"),
                        "must be finite",
                    ));
                }
            }
            "synthetic" => {
                if !d.amplitude_kw.is_finite() {
                    errors.push(ConfigError::new("demand.amplitude_kw", "must be finite"));
                }
                if !d.noise_std_kw.is_finite() {
                    errors.push(ConfigError::new("demand.noise_std_kw", "must be finite"));
                }
            }
            other => errors.push(ConfigError::new(
                "demand.source",
                format!("must be \"exercise\", \"fixed\" or \"synthetic\", got \"{other}\""),
            )),
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exercise_preset_valid() {
        let cfg = ScenarioConfig::exercise();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "exercise should be valid: {errors:?}");
    }

    #[test]
    fn exercise_uses_fixed_profile_and_baseline_rule() {
        let cfg = ScenarioConfig::exercise();
        assert_eq!(cfg.demand_profile(), EXERCISE_DEMAND_KW.to_vec());
        assert!(cfg.dispatch_options().is_baseline());
        assert_eq!(cfg.battery_params(), BatteryParams::default());
        assert_eq!(cfg.panel_spec().ok(), Some(PanelSpec::default()));
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn constrained_enables_everything() {
        let cfg = ScenarioConfig::constrained();
        assert_eq!(cfg.dispatch_options(), DispatchOptions::constrained());
    }

    #[test]
    fn degrading_uses_synthetic_demand() {
        let cfg = ScenarioConfig::degrading();
        assert_eq!(cfg.demand_profile().len(), 24);
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[roof]
length_m = 12.0
width_m = 6.0
angle_deg = 35.0

[panel]
width_mm = 1134.0
height_mm = 1722.0
power_wp = 410.0

[battery]
dt_hours = 0.5
soc_0_kwh = 4.0
min_soc_kwh = 0.5
max_soc_kwh = 13.5
max_power_kw = 5.0
efficiency = 0.95
dt_degradation = 0.001

[dispatch]
apply_power_limit = true
apply_soc_limits = true

[demand]
source = "fixed"
values_kw = [1.0, -2.0, 3.5]
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.roof.angle_deg), Some(35.0));
        assert_eq!(cfg.as_ref().map(|c| c.battery.dt_hours), Some(0.5));
        assert_eq!(
            cfg.as_ref().map(|c| c.demand_profile()),
            Some(vec![1.0, -2.0, 3.5])
        );
        assert_eq!(
            cfg.as_ref().map(|c| c.dispatch_options().apply_efficiency),
            Some(false)
        );
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[roof]
length_m = 30.0
bogus_field = true
"#;
        assert!(ScenarioConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[roof]
length_m = 40.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.roof.length_m), Some(40.0));
        assert_eq!(cfg.as_ref().map(|c| c.roof.width_m), Some(10.0));
        assert_eq!(cfg.as_ref().map(|c| c.battery.soc_0_kwh), Some(5.0));
        assert_eq!(cfg.as_ref().map(|c| c.demand.source.clone()), Some("exercise".to_string()));
    }

    #[test]
    fn validation_catches_bad_panel() {
        let mut cfg = ScenarioConfig::exercise();
        cfg.panel.height_mm = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "panel.height_mm"));
    }

    #[test]
    fn validation_catches_zero_dt_with_soc_limits() {
        let mut cfg = ScenarioConfig::exercise();
        cfg.battery.dt_hours = 0.0;
        assert!(cfg.validate().is_empty());
        cfg.dispatch.apply_soc_limits = true;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "battery.dt_hours"));
    }

    #[test]
    fn validation_catches_bad_efficiency_only_when_applied() {
        let mut cfg = ScenarioConfig::exercise();
        cfg.battery.efficiency = 1.5;
        assert!(cfg.validate().is_empty());
        cfg.dispatch.apply_efficiency = true;
        assert!(cfg.validate().iter().any(|e| e.field == "battery.efficiency"));
    }

    #[test]
    fn validation_catches_bad_demand_source() {
        let mut cfg = ScenarioConfig::exercise();
        cfg.demand.source = "csv".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "demand.source"));
    }

    #[test]
    fn validation_catches_non_finite_roof() {
        let mut cfg = ScenarioConfig::exercise();
        cfg.roof.angle_deg = f64::NAN;
        assert!(cfg.validate().iter().any(|e| e.field == "roof.angle_deg"));
    }

    #[test]
    fn negative_roof_is_valid_config() {
        let mut cfg = ScenarioConfig::exercise();
        cfg.roof.length_m = -1.0;
        assert!(cfg.validate().is_empty());
    }
}
