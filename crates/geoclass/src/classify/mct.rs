//! MCT classification (Nogami & Villibor) from Mini-MCV coefficients.
//!
//! Laterization is read from d′ against a laboratory-calibrated threshold.
//! Published procedures use different d′ scales (thresholds of 1.5 and of 20
//! are both in use), so the threshold has no default: without it the class
//! is reported as unavailable and must be assigned manually.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::rules::{DecisionTable, Rule};

/// Code reported when no MCT class can be assigned automatically.
pub const MANUAL_UNAVAILABLE: &str = "manual/unavailable";

/// Default c′ at and above which the soil behaves as clay.
pub const DEFAULT_CLAY_C_PRIME: f64 = 1.5;

/// Default immersion mass loss above which durability is flagged, in percent.
pub const DEFAULT_IMMERSION_LOSS_LIMIT: f64 = 2.0;

/// Laboratory calibration of the MCT decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MctCalibration {
    /// d′ at and above which the soil is lateritic. `None` until calibrated.
    #[serde(default)]
    pub d_prime_threshold: Option<f64>,
    /// c′ at and above which the soil behaves as clay.
    #[serde(default = "default_clay_c_prime")]
    pub clay_c_prime: f64,
    /// Immersion mass loss above which a durability warning is attached, in percent.
    #[serde(default = "default_immersion_loss_limit")]
    pub immersion_loss_limit: f64,
}

fn default_clay_c_prime() -> f64 {
    DEFAULT_CLAY_C_PRIME
}

fn default_immersion_loss_limit() -> f64 {
    DEFAULT_IMMERSION_LOSS_LIMIT
}

impl Default for MctCalibration {
    fn default() -> Self {
        Self {
            d_prime_threshold: None,
            clay_c_prime: DEFAULT_CLAY_C_PRIME,
            immersion_loss_limit: DEFAULT_IMMERSION_LOSS_LIMIT,
        }
    }
}

impl MctCalibration {
    /// Set the d′ laterization threshold.
    pub fn with_d_prime_threshold(mut self, threshold: f64) -> Self {
        self.d_prime_threshold = Some(threshold);
        self
    }
}

/// Mini-MCV test coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MctCoefficients {
    /// Deformability coefficient c′.
    pub c_prime: f64,
    /// Slope coefficient d′.
    pub d_prime: f64,
    /// Mass loss by immersion, in percent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub immersion_loss: Option<f64>,
}

impl MctCoefficients {
    /// Create coefficients without an immersion test.
    pub fn new(c_prime: f64, d_prime: f64) -> Self {
        Self {
            c_prime,
            d_prime,
            immersion_loss: None,
        }
    }

    /// Set the immersion mass loss.
    pub fn with_immersion_loss(mut self, percent: f64) -> Self {
        self.immersion_loss = Some(percent);
        self
    }

    /// Whether both coefficients are positive numbers.
    pub fn is_complete(&self) -> bool {
        self.c_prime.is_finite() && self.d_prime.is_finite() && self.c_prime > 0.0 && self.d_prime > 0.0
    }
}

/// MCT classes distinguished by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MctClass {
    /// Lateritic clay.
    #[serde(rename = "LG'")]
    LateriticClay,
    /// Non-lateritic silt or clay.
    #[serde(rename = "NG'")]
    NonLateriticSiltClay,
    /// Lateritic sand or silty sand.
    #[serde(rename = "LA'")]
    LateriticSand,
    /// Non-lateritic sand.
    #[serde(rename = "NA")]
    NonLateriticSand,
}

impl MctClass {
    /// Class code.
    pub fn code(&self) -> &'static str {
        match self {
            MctClass::LateriticClay => "LG'",
            MctClass::NonLateriticSiltClay => "NG'",
            MctClass::LateriticSand => "LA'",
            MctClass::NonLateriticSand => "NA",
        }
    }

    /// Class name.
    pub fn name(&self) -> &'static str {
        match self {
            MctClass::LateriticClay => "Lateritic clay",
            MctClass::NonLateriticSiltClay => "Non-lateritic silt/clay",
            MctClass::LateriticSand => "Lateritic sand/silty sand",
            MctClass::NonLateriticSand => "Non-lateritic sand",
        }
    }

    /// Whether the class is lateritic.
    pub fn is_lateritic(&self) -> bool {
        matches!(self, MctClass::LateriticClay | MctClass::LateriticSand)
    }
}

impl fmt::Display for MctClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Inputs of the MCT decision table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctInput {
    /// Coefficient c′.
    pub c_prime: f64,
    /// Coefficient d′.
    pub d_prime: f64,
    /// d′ at or above which the soil is lateritic.
    pub d_prime_threshold: f64,
    /// c′ at or above which the soil behaves as a clay.
    pub clay_c_prime: f64,
}

impl MctInput {
    fn lateritic(&self) -> bool {
        self.d_prime >= self.d_prime_threshold
    }

    fn clayey(&self) -> bool {
        self.c_prime >= self.clay_c_prime
    }
}

/// Outcome of the MCT classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MctOutcome {
    /// Coefficients missing or non-positive.
    AwaitingData,
    /// Coefficients valid but the d′ threshold is not calibrated.
    Uncalibrated,
    /// A class was assigned.
    Classified {
        class: MctClass,
        /// Immersion mass loss above the limit; the class itself is unchanged.
        durability_warning: bool,
        /// Label of the decision-table rule that matched.
        rule: String,
    },
}

impl MctOutcome {
    /// Assigned class, if any.
    pub fn class(&self) -> Option<MctClass> {
        match self {
            MctOutcome::Classified { class, .. } => Some(*class),
            _ => None,
        }
    }

    /// Canonical code: the class code or the manual/unavailable marker.
    pub fn code(&self) -> String {
        match self {
            MctOutcome::Classified { class, .. } => class.code().to_string(),
            _ => MANUAL_UNAVAILABLE.to_string(),
        }
    }

    /// Whether a durability warning is attached.
    pub fn has_durability_warning(&self) -> bool {
        matches!(
            self,
            MctOutcome::Classified {
                durability_warning: true,
                ..
            }
        )
    }

    /// Human-readable explanation, separate from the code.
    pub fn explanation(&self) -> String {
        match self {
            MctOutcome::AwaitingData => {
                "Awaiting Mini-MCV data: c′ and d′ must both be positive".to_string()
            }
            MctOutcome::Uncalibrated => {
                "d′ laterization threshold not calibrated; assign the MCT class manually".to_string()
            }
            MctOutcome::Classified {
                class,
                durability_warning,
                ..
            } => {
                if *durability_warning {
                    format!("{}: {} (durability warning: high immersion mass loss)", class, class.name())
                } else {
                    format!("{}: {}", class, class.name())
                }
            }
        }
    }
}

impl fmt::Display for MctOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

static MCT_TABLE: Lazy<DecisionTable<MctInput, MctClass>> = Lazy::new(|| {
    DecisionTable::new(
        "mct",
        vec![
            Rule::new(
                "LG': d' >= threshold, c' >= clay boundary",
                |i: &MctInput| i.lateritic() && i.clayey(),
                MctClass::LateriticClay,
            ),
            Rule::new(
                "LA': d' >= threshold, c' < clay boundary",
                |i: &MctInput| i.lateritic(),
                MctClass::LateriticSand,
            ),
            Rule::new(
                "NG': d' < threshold, c' >= clay boundary",
                |i: &MctInput| i.clayey(),
                MctClass::NonLateriticSiltClay,
            ),
            Rule::new(
                "NA: d' < threshold, c' < clay boundary",
                |_: &MctInput| true,
                MctClass::NonLateriticSand,
            ),
        ],
    )
});

/// MCT classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct MctClassifier {
    calibration: MctCalibration,
}

impl MctClassifier {
    /// Create a classifier with the given calibration.
    pub fn new(calibration: MctCalibration) -> Self {
        Self { calibration }
    }

    /// The decision table, in evaluation order.
    pub fn table(&self) -> &'static DecisionTable<MctInput, MctClass> {
        &MCT_TABLE
    }

    /// Classify. `None` means the Mini-MCV test was not run.
    pub fn classify(&self, coefficients: Option<&MctCoefficients>) -> MctOutcome {
        let Some(coefficients) = coefficients.filter(|c| c.is_complete()) else {
            return MctOutcome::AwaitingData;
        };
        let Some(d_prime_threshold) = self.calibration.d_prime_threshold else {
            return MctOutcome::Uncalibrated;
        };

        let input = MctInput {
            c_prime: coefficients.c_prime,
            d_prime: coefficients.d_prime,
            d_prime_threshold,
            clay_c_prime: self.calibration.clay_c_prime,
        };
        let (class, rule) = self
            .table()
            .first_match(&input)
            .map(|rule| (rule.then, rule.label))
            .unwrap_or((MctClass::NonLateriticSand, "fallback"));

        let durability_warning = coefficients
            .immersion_loss
            .is_some_and(|loss| loss > self.calibration.immersion_loss_limit);

        MctOutcome::Classified {
            class,
            durability_warning,
            rule: rule.to_string(),
        }
    }
}
