//! Engine configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::MctCalibration;
use crate::curve::DEFAULT_MASS_TOLERANCE_PERCENT;
use crate::error::{GeoclassError, Result};

/// Configuration for an analysis run.
///
/// ```json
/// {
///   "mass_tolerance_percent": 2.0,
///   "mct": { "d_prime_threshold": 20.0, "clay_c_prime": 1.5, "immersion_loss_limit": 2.0 }
/// }
/// ```
///
/// Missing fields take their defaults. The d′ threshold has none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Relative tolerance between summed retained mass and declared dry mass, in percent.
    pub mass_tolerance_percent: f64,
    /// MCT calibration.
    pub mct: MctCalibration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            mass_tolerance_percent: DEFAULT_MASS_TOLERANCE_PERCENT,
            mct: MctCalibration::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| GeoclassError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: EngineConfig = serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            GeoclassError::Config(format!("Failed to parse config '{}': {}", path.display(), e))
        })?;
        config.validate()?;

        Ok(config)
    }

    /// Set the d′ laterization threshold.
    pub fn with_d_prime_threshold(mut self, threshold: f64) -> Self {
        self.mct = self.mct.with_d_prime_threshold(threshold);
        self
    }

    /// Set the mass balance tolerance.
    pub fn with_mass_tolerance(mut self, tolerance_percent: f64) -> Self {
        self.mass_tolerance_percent = tolerance_percent;
        self
    }

    /// Reject values no run could use.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(GeoclassError::Config(format!("{} must be a non-negative number, got {}", name, value)))
            }
        };

        positive("mass_tolerance_percent", self.mass_tolerance_percent)?;
        positive("mct.clay_c_prime", self.mct.clay_c_prime)?;
        positive("mct.immersion_loss_limit", self.mct.immersion_loss_limit)?;
        if let Some(threshold) = self.mct.d_prime_threshold {
            positive("mct.d_prime_threshold", threshold)?;
        }
        Ok(())
    }
}
