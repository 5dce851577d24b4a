//! Rooftop PV array sizing: how many whole panels fit on a pitched roof.

/// Panel data-sheet parameters.
pub mod panel;
/// Roof sizing for portrait and landscape layouts.
pub mod sizer;

pub use panel::PanelSpec;
pub use sizer::{
    Orientation, PvSizing, landscape_count, portrait_count, size_pv_array, size_pv_array_default,
};
