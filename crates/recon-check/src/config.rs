//! Check configuration and validation.

use std::error::Error;
use std::fmt;

use crate::scan::Comparison;

/// Default tolerance for `omegadot * dt - dX`.
pub const DEFAULT_OMEGADOT_TOLERANCE: f64 = 1.1e-17;

/// Default tolerance for `h_new - (h_old + (H_nuc + H_ext) * dt)`.
pub const DEFAULT_ENTHALPY_TOLERANCE: f64 = 100.0;

/// Tolerances, process gates, and comparison settings for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckConfig {
    /// Per-cell tolerance of the mass-fraction balance. Default: 1.1e-17.
    pub omegadot_tolerance: f64,
    /// Per-cell tolerance of the enthalpy balance. Default: 100.
    pub enthalpy_tolerance: f64,
    /// Whether external heating was enabled in the run. Default: false.
    pub heating_enabled: bool,
    /// Whether burning was enabled in the run. Default: true.
    pub burning_enabled: bool,
    /// Literal or magnitude comparison. Default: literal.
    pub comparison: Comparison,
    /// Reject snapshots whose field count is not exactly `8 + 3N`.
    /// Default: false.
    pub strict_layout: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            omegadot_tolerance: DEFAULT_OMEGADOT_TOLERANCE,
            enthalpy_tolerance: DEFAULT_ENTHALPY_TOLERANCE,
            heating_enabled: false,
            burning_enabled: true,
            comparison: Comparison::Literal,
            strict_layout: false,
        }
    }
}

impl CheckConfig {
    /// Check that both tolerances are finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (which, value) in [
            ("omegadot_tolerance", self.omegadot_tolerance),
            ("enthalpy_tolerance", self.enthalpy_tolerance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTolerance { which, value });
            }
        }
        Ok(())
    }
}

/// Errors detected by [`CheckConfig::validate`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A tolerance is NaN, infinite, or negative.
    InvalidTolerance {
        /// Which tolerance.
        which: &'static str,
        /// The rejected value.
        value: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTolerance { which, value } => {
                write!(f, "{which} must be finite and non-negative, got {value}")
            }
        }
    }
}

impl Error for ConfigError {}
