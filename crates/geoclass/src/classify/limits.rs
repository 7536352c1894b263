//! Atterberg limits.

use serde::{Deserialize, Serialize};

use crate::error::{GeoclassError, Result};

/// Liquid and plastic limits, in percent by mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtterbergLimits {
    /// Liquid limit (LL).
    pub ll: f64,
    /// Plastic limit (LP).
    pub lp: f64,
}

impl AtterbergLimits {
    /// Create limits, rejecting negative or non-finite values.
    pub fn new(ll: f64, lp: f64) -> Result<Self> {
        for (name, value) in [("LL", ll), ("LP", lp)] {
            if !value.is_finite() || value < 0.0 {
                return Err(GeoclassError::InvalidLimits(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(Self { ll, lp })
    }

    /// Limits of a non-plastic soil.
    pub fn non_plastic() -> Self {
        Self { ll: 0.0, lp: 0.0 }
    }

    /// Raw plasticity index `LL - LP`; may be negative.
    pub fn ip(&self) -> f64 {
        self.ll - self.lp
    }

    /// Plasticity index clamped to zero, used by every classification rule.
    pub fn ip_eff(&self) -> f64 {
        self.ip().max(0.0)
    }

    /// Whether the soil behaves as non-plastic.
    pub fn is_non_plastic(&self) -> bool {
        self.ip_eff() == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plasticity_index() {
        let limits = AtterbergLimits::new(35.0, 20.0).unwrap();
        assert_eq!(limits.ip(), 15.0);
        assert_eq!(limits.ip_eff(), 15.0);
        assert!(!limits.is_non_plastic());
    }

    #[test]
    fn test_negative_index_is_clamped() {
        let limits = AtterbergLimits::new(20.0, 25.0).unwrap();
        assert_eq!(limits.ip(), -5.0);
        assert_eq!(limits.ip_eff(), 0.0);
        assert!(limits.is_non_plastic());
    }

    #[test]
    fn test_rejects_invalid_limits() {
        assert!(AtterbergLimits::new(-1.0, 0.0).is_err());
        assert!(AtterbergLimits::new(30.0, f64::NAN).is_err());
    }
}
