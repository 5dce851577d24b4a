//! PV panel data-sheet parameters.

use crate::error::{SimError, ensure_finite};

/// Physical description of a single PV panel.
///
/// Dimensions are stored in millimetres, as printed on manufacturer data
/// sheets. The default is a 400 Wp reference commercial panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    /// Short edge of the panel (mm).
    pub width_mm: f64,
    /// Long edge of the panel (mm).
    pub height_mm: f64,
    /// Nameplate power under standard test conditions (Wp).
    pub power_wp: f64,
}

impl PanelSpec {
    pub const DEFAULT_WIDTH_MM: f64 = 1046.0;
    pub const DEFAULT_HEIGHT_MM: f64 = 1690.0;
    pub const DEFAULT_POWER_WP: f64 = 400.0;

    /// Creates a validated panel specification.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] if any value is non-finite or not
    /// strictly positive.
    pub fn new(width_mm: f64, height_mm: f64, power_wp: f64) -> Result<Self, SimError> {
        let spec = Self {
            width_mm,
            height_mm,
            power_wp,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Checks that every dimension and the power rating are finite and > 0.
    pub fn validate(&self) -> Result<(), SimError> {
        for (field, value) in [
            ("panel.width_mm", self.width_mm),
            ("panel.height_mm", self.height_mm),
            ("panel.power_wp", self.power_wp),
        ] {
            ensure_finite(field, value)?;
            if value <= 0.0 {
                return Err(SimError::invalid(field, format!("must be > 0, got {value}")));
            }
        }
        Ok(())
    }

    /// Panel width in metres.
    pub fn width_m(&self) -> f64 {
        self.width_mm / 1000.0
    }

    /// Panel height in metres.
    pub fn height_m(&self) -> f64 {
        self.height_mm / 1000.0
    }
}

impl Default for PanelSpec {
    fn default() -> Self {
        Self {
            width_mm: Self::DEFAULT_WIDTH_MM,
            height_mm: Self::DEFAULT_HEIGHT_MM,
            power_wp: Self::DEFAULT_POWER_WP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_panel() {
        let p = PanelSpec::default();
        assert_eq!(p.width_mm, 1046.0);
        assert_eq!(p.height_mm, 1690.0);
        assert_eq!(p.power_wp, 400.0);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn metre_conversion() {
        let p = PanelSpec::default();
        assert!((p.width_m() - 1.046).abs() < 1e-12);
        assert!((p.height_m() - 1.690).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_width() {
        assert!(PanelSpec::new(0.0, 1690.0, 400.0).is_err());
    }

    #[test]
    fn rejects_negative_power() {
        assert!(PanelSpec::new(1046.0, 1690.0, -1.0).is_err());
    }

    #[test]
    fn rejects_nan_height() {
        let err = PanelSpec::new(1046.0, f64::NAN, 400.0).unwrap_err();
        assert!(err.to_string().contains("panel.height_mm"));
    }
}
