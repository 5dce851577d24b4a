//! Error type shared by the sizing and dispatch computations.

use thiserror::Error;

/// Errors raised by the core computations.
///
/// Domain edge cases (an empty roof, a vertical pitch, an empty demand
/// profile) are not errors; they produce defined outputs. Only inputs that
/// cannot be computed with at all end up here.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// An input value is non-finite or outside its physical range.
    #[error("invalid input: {field} {reason}")]
    InvalidInput {
        /// Name of the offending input (e.g. `"demand_kw[3]"`).
        field: String,
        /// Human-readable constraint description.
        reason: String,
    },
}

impl SimError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Rejects NaN and infinities.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<(), SimError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SimError::invalid(field, format!("must be finite, got {value}")))
    }
}
