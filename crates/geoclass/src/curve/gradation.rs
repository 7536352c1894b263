//! Characteristic diameters and gradation coefficients.

use serde::{Deserialize, Serialize};

use super::builder::SieveCurve;

/// D10/D30/D60 and the coefficients derived from them.
///
/// A field is `None` when the curve does not cover the percentile it needs.
/// Nothing here is ever defaulted to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GradationParameters {
    /// Diameter with 10% finer, in millimetres.
    pub d10: Option<f64>,
    /// Diameter with 30% finer, in millimetres.
    pub d30: Option<f64>,
    /// Diameter with 60% finer, in millimetres.
    pub d60: Option<f64>,
    /// Coefficient of uniformity, `D60 / D10`.
    pub cu: Option<f64>,
    /// Coefficient of curvature, `D30² / (D60 · D10)`.
    pub cc: Option<f64>,
}

impl GradationParameters {
    /// Derive the parameters from a curve.
    pub fn from_curve(curve: &SieveCurve) -> Self {
        Self::from_diameters(curve.aperture_at(10.0), curve.aperture_at(30.0), curve.aperture_at(60.0))
    }

    /// Derive Cu and Cc from already-known diameters.
    pub fn from_diameters(d10: Option<f64>, d30: Option<f64>, d60: Option<f64>) -> Self {
        let cu = match (d10, d60) {
            (Some(d10), Some(d60)) if d10 > 0.0 => Some(d60 / d10),
            _ => None,
        };
        let cc = match (d10, d30, d60) {
            (Some(d10), Some(d30), Some(d60)) if d60 * d10 != 0.0 => Some(d30 * d30 / (d60 * d10)),
            _ => None,
        };

        Self {
            d10,
            d30,
            d60,
            cu,
            cc,
        }
    }

    /// Whether both coefficients are available.
    pub fn has_coefficients(&self) -> bool {
        self.cu.is_some() && self.cc.is_some()
    }

    /// Names of the characteristic diameters the curve does not cover.
    pub fn missing_diameters(&self) -> Vec<&'static str> {
        [("D10", self.d10), ("D30", self.d30), ("D60", self.d60)]
            .into_iter()
            .filter(|(_, d)| d.is_none())
            .map(|(name, _)| name)
            .collect()
    }
}
