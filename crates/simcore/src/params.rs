//! Parameter resolution for component constructors.
//!
//! Constructors take `Option<f64>` parameters where `None` means "use the
//! built-in default". Values that are supplied are checked here so that a bad
//! internal resistance or heat capacity fails at construction instead of
//! turning into a division by zero a few ticks later.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },
}

/// Sentinel threshold used by interactive front ends: any value `<= -1`
/// means "use the default".
pub const DEFAULT_SENTINEL: f64 = -1.0;

/// Convert a raw sentinel-style value into an optional parameter.
pub fn from_sentinel(value: f64) -> Option<f64> {
    if value <= DEFAULT_SENTINEL {
        None
    } else {
        Some(value)
    }
}

/// Check that `value` is finite and strictly positive.
pub fn require_positive(name: &'static str, value: f64) -> Result<f64, ParamError> {
    if !value.is_finite() {
        return Err(ParamError::NonFinite { name, value });
    }
    if value <= 0.0 {
        return Err(ParamError::NonPositive { name, value });
    }
    Ok(value)
}

/// Check that `value` is finite and not negative.
pub fn require_non_negative(name: &'static str, value: f64) -> Result<f64, ParamError> {
    if !value.is_finite() {
        return Err(ParamError::NonFinite { name, value });
    }
    if value < 0.0 {
        return Err(ParamError::Negative { name, value });
    }
    Ok(value)
}

/// Resolve an optional strictly positive parameter against its default.
pub fn resolve(name: &'static str, value: Option<f64>, default: f64) -> Result<f64, ParamError> {
    match value {
        Some(v) => require_positive(name, v),
        None => Ok(default),
    }
}

/// Resolve an optional parameter where zero is allowed.
pub fn resolve_non_negative(name: &'static str, value: Option<f64>, default: f64) -> Result<f64, ParamError> {
    match value {
        Some(v) => require_non_negative(name, v),
        None => Ok(default),
    }
}
