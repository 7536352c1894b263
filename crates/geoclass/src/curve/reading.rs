//! Raw sieve readings.

use serde::{Deserialize, Serialize};

use crate::error::{GeoclassError, Result};

/// Mass retained on one sieve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SieveReading {
    /// Sieve aperture in millimetres.
    pub aperture_mm: f64,
    /// Dry mass retained on the sieve, in grams.
    pub retained_mass_g: f64,
}

impl SieveReading {
    /// Create a new reading.
    pub fn new(aperture_mm: f64, retained_mass_g: f64) -> Self {
        Self {
            aperture_mm,
            retained_mass_g,
        }
    }

    /// Check that the aperture is positive and the mass non-negative.
    pub fn validate(&self) -> Result<()> {
        if !self.aperture_mm.is_finite() || self.aperture_mm <= 0.0 {
            return Err(GeoclassError::InvalidReading {
                aperture_mm: self.aperture_mm,
                message: "aperture must be a positive number".to_string(),
            });
        }
        if !self.retained_mass_g.is_finite() || self.retained_mass_g < 0.0 {
            return Err(GeoclassError::InvalidReading {
                aperture_mm: self.aperture_mm,
                message: format!(
                    "retained mass must be non-negative, got {}",
                    self.retained_mass_g
                ),
            });
        }
        Ok(())
    }
}

impl From<(f64, f64)> for SieveReading {
    fn from((aperture_mm, retained_mass_g): (f64, f64)) -> Self {
        Self::new(aperture_mm, retained_mass_g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_reading() {
        assert!(SieveReading::new(0.075, 150.0).validate().is_ok());
        assert!(SieveReading::new(50.8, 0.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_aperture() {
        assert!(matches!(
            SieveReading::new(0.0, 10.0).validate(),
            Err(GeoclassError::InvalidReading { .. })
        ));
        assert!(SieveReading::new(-2.0, 10.0).validate().is_err());
        assert!(SieveReading::new(f64::NAN, 10.0).validate().is_err());
    }

    #[test]
    fn test_rejects_negative_mass() {
        assert!(SieveReading::new(2.0, -0.1).validate().is_err());
        assert!(SieveReading::new(2.0, f64::INFINITY).validate().is_err());
    }
}
