//! Whole-panel packing of a rectangular mono-pitch roof.

use std::fmt;

use tracing::debug;

use super::panel::PanelSpec;
use crate::error::{SimError, ensure_finite};

/// Which panel edge runs along the building length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Panel width along the length, panel height up the slope.
    Portrait,
    /// Panel height along the length, panel width up the slope.
    Landscape,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Portrait => f.write_str("portrait"),
            Self::Landscape => f.write_str("landscape"),
        }
    }
}

/// Result of fitting whole panels onto a rectangular mono-pitch roof.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PvSizing {
    /// Total nameplate capacity of the placed panels (kW).
    pub capacity_kw: f64,
    /// Number of whole panels placed.
    pub n_panels: u64,
    /// Orientation that produced `n_panels`.
    pub orientation: Orientation,
    /// Along-roof width, `width / cos(pitch)` (m). Zero for the empty result.
    pub sloped_width_m: f64,
}

impl PvSizing {
    /// Result for a roof that cannot hold any panel.
    pub fn empty() -> Self {
        Self {
            capacity_kw: 0.0,
            n_panels: 0,
            orientation: Orientation::Portrait,
            sloped_width_m: 0.0,
        }
    }

    /// `(capacity_kw, n_panels)` pair.
    pub fn as_pair(&self) -> (f64, u64) {
        (self.capacity_kw, self.n_panels)
    }
}

impl fmt::Display for PvSizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of PV panels: {}", self.n_panels)?;
        write!(
            f,
            "Total PV capacity: {:.2} kW ({})",
            self.capacity_kw, self.orientation
        )
    }
}

/// Floor division with the exact semantics of floating-point `//`.
///
/// `(a / b).floor()` rounds the quotient before flooring, so `1.0 / 0.1`
/// becomes `10.0` even though `0.1` does not fit ten times into `1.0`.
/// Deriving the quotient from `fmod` avoids that.
fn floor_div(a: f64, b: f64) -> f64 {
    let rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 && (b < 0.0) != (rem < 0.0) {
        div -= 1.0;
    }
    if div != 0.0 {
        let mut floored = div.floor();
        if div - floored > 0.5 {
            floored += 1.0;
        }
        floored
    } else {
        0.0
    }
}

/// Whole panels that fit along one axis, clamped at zero.
fn whole_fit(span_m: f64, panel_m: f64) -> u64 {
    // `as` saturates for out-of-range floats and maps NaN to 0.
    floor_div(span_m, panel_m).max(0.0) as u64
}

/// Panel count with the panel width along `length_m` and height up the slope.
pub fn portrait_count(length_m: f64, sloped_width_m: f64, panel: &PanelSpec) -> u64 {
    whole_fit(length_m, panel.width_m()).saturating_mul(whole_fit(sloped_width_m, panel.height_m()))
}

/// Panel count with the panel height along `length_m` and width up the slope.
pub fn landscape_count(length_m: f64, sloped_width_m: f64, panel: &PanelSpec) -> u64 {
    whole_fit(length_m, panel.height_m()).saturating_mul(whole_fit(sloped_width_m, panel.width_m()))
}

/// Sizes the largest single-orientation PV array that fits on a roof.
///
/// The roof is a rectangle of `length_m` along the eaves by `width_m` in plan
/// view, pitched at `angle_deg` from horizontal. Each axis is packed
/// independently with whole panels; portrait and landscape are both tried
/// and the larger count wins (portrait on a tie).
///
/// Non-positive dimensions and pitches of 90 degrees or more yield
/// [`PvSizing::empty`].
///
/// # Errors
///
/// Returns [`SimError::InvalidInput`] if a roof dimension or the angle is
/// non-finite, or the panel specification is invalid.
///
/// # Examples
///
/// ```
/// use pv_battery_sim::pv::{PanelSpec, size_pv_array};
///
/// let sizing = size_pv_array(30.0, 10.0, 22.0, &PanelSpec::default()).unwrap();
/// assert_eq!(sizing.n_panels, 170);
/// assert!((sizing.capacity_kw - 68.0).abs() < 1e-9);
/// ```
pub fn size_pv_array(
    length_m: f64,
    width_m: f64,
    angle_deg: f64,
    panel: &PanelSpec,
) -> Result<PvSizing, SimError> {
    ensure_finite("roof.length_m", length_m)?;
    ensure_finite("roof.width_m", width_m)?;
    ensure_finite("roof.angle_deg", angle_deg)?;
    panel.validate()?;

    if length_m <= 0.0 || width_m <= 0.0 {
        debug!(length_m, width_m, "non-positive roof dimension, nothing fits");
        return Ok(PvSizing::empty());
    }

    // cos(90 deg) evaluates to ~6e-17, so the angle itself is checked too.
    let cos_theta = angle_deg.to_radians().cos();
    if angle_deg.abs() >= 90.0 || cos_theta <= 0.0 {
        debug!(angle_deg, "non-physical roof pitch, nothing fits");
        return Ok(PvSizing::empty());
    }

    let sloped_width_m = width_m / cos_theta;
    let n_portrait = portrait_count(length_m, sloped_width_m, panel);
    let n_landscape = landscape_count(length_m, sloped_width_m, panel);

    let (n_panels, orientation) = if n_landscape > n_portrait {
        (n_landscape, Orientation::Landscape)
    } else {
        (n_portrait, Orientation::Portrait)
    };
    let capacity_kw = n_panels as f64 * panel.power_wp / 1000.0;

    debug!(
        sloped_width_m,
        n_portrait,
        n_landscape,
        n_panels,
        capacity_kw,
        %orientation,
        "sized PV array"
    );

    Ok(PvSizing {
        capacity_kw,
        n_panels,
        orientation,
        sloped_width_m,
    })
}

/// [`size_pv_array`] with the reference panel.
pub fn size_pv_array_default(
    length_m: f64,
    width_m: f64,
    angle_deg: f64,
) -> Result<PvSizing, SimError> {
    size_pv_array(length_m, width_m, angle_deg, &PanelSpec::default())
}
