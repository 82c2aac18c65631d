//! Engine configuration
//!
//! Every constant the engine relies on is named here and defaults to the
//! value existing reports were produced with. The effect-size thresholds are
//! part of the output contract and cannot be configured.

use serde::{Deserialize, Serialize};

pub use splitstat_stats::{
    effect_size::{EFFECT_SIZE_LARGE, EFFECT_SIZE_MEDIUM},
    proportion::WALD_Z_95,
};

/// A test is significant when its p-value is strictly below this level.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("significance level must be in (0, 1), got {value}")]
    SignificanceLevel { value: f64 },
    #[display("confidence z-score must be positive and finite, got {value}")]
    ConfidenceZ { value: f64 },
}

/// Tunable parameters of the summarization engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Threshold below which a p-value is significant.
    pub significance_level: f64,
    /// Critical value used for the Wald confidence interval.
    pub confidence_z: f64,
    /// Apply the Yates continuity correction to 2×2 chi-squared tests.
    pub yates_correction: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            significance_level: SIGNIFICANCE_LEVEL,
            confidence_z: WALD_Z_95,
            yates_correction: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let alpha = self.significance_level;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConfigError::SignificanceLevel { value: alpha });
        }
        let z = self.confidence_z;
        if !(z.is_finite() && z > 0.0) {
            return Err(ConfigError::ConfidenceZ { value: z });
        }
        Ok(())
    }

    /// Whether `p_value` is below the significance level.
    #[must_use]
    pub fn is_significant(&self, p_value: f64) -> bool {
        p_value < self.significance_level
    }
}
