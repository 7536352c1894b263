//! Log-linear interpolation over the sieve curve.
//!
//! Particle-size distributions are close to log-normal, so both lookups
//! interpolate linearly between `log10(aperture)` and percent passing.
//!
//! The two directions treat missing support differently:
//! - [`SieveCurve::passing_at`] substitutes a boundary value (100% above the
//!   coarsest sieve, 0% below the finest) and flags the substitution.
//! - [`SieveCurve::aperture_at`] returns `None` outside the measured
//!   percent-passing range. Characteristic diameters are never extrapolated.

use serde::{Deserialize, Serialize};

use super::builder::{CurvePoint, SieveCurve};

/// Which side of the measured apertures a boundary value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Aperture larger than the coarsest sieve; 100% passing assumed.
    AboveCoarsest,
    /// Aperture smaller than the finest sieve; 0% passing assumed.
    BelowFinest,
}

/// Percent passing at a requested aperture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PassingLookup {
    /// Requested aperture, in millimetres.
    pub aperture_mm: f64,
    /// Percent passing at that aperture.
    pub percent_passing: f64,
    /// Set when the value is a boundary substitution rather than an interpolation.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub boundary: Option<Boundary>,
}

impl PassingLookup {
    /// Whether the value was substituted at a boundary.
    pub fn is_extrapolated(&self) -> bool {
        self.boundary.is_some()
    }
}

impl SieveCurve {
    /// Percent passing at `aperture_mm`.
    ///
    /// Returns the exact curve value when the aperture coincides with a
    /// reading, a log-linear interpolation between the bracketing readings
    /// otherwise, and a flagged boundary value outside the measured range.
    pub fn passing_at(&self, aperture_mm: f64) -> PassingLookup {
        let points = self.points();
        let finest = self.finest();
        let coarsest = self.coarsest();

        if aperture_mm > coarsest.aperture_mm {
            return PassingLookup {
                aperture_mm,
                percent_passing: 100.0,
                boundary: Some(Boundary::AboveCoarsest),
            };
        }
        // NaN also lands here.
        if !(aperture_mm >= finest.aperture_mm) {
            return PassingLookup {
                aperture_mm,
                percent_passing: 0.0,
                boundary: Some(Boundary::BelowFinest),
            };
        }

        let percent_passing = match points.iter().position(|p| p.aperture_mm >= aperture_mm) {
            Some(i) if points[i].aperture_mm == aperture_mm => points[i].percent_passing,
            Some(i) => interpolate_passing(&points[i - 1], &points[i], aperture_mm),
            None => coarsest.percent_passing,
        };

        PassingLookup {
            aperture_mm,
            percent_passing,
            boundary: None,
        }
    }

    /// Aperture at which `percent` of the sample passes, if the curve covers it.
    ///
    /// Walks the curve from the finest sieve and answers from the first
    /// segment that brackets `percent`, so on a flat stretch the finest
    /// aperture reaching that percentage is returned.
    pub fn aperture_at(&self, percent: f64) -> Option<f64> {
        if !percent.is_finite() {
            return None;
        }

        let points = self.points();
        let (min, max) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.percent_passing), hi.max(p.percent_passing))
        });
        if percent < min || percent > max {
            return None;
        }

        for pair in points.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            if lower.percent_passing == percent {
                return Some(lower.aperture_mm);
            }
            let (p0, p1) = (lower.percent_passing, upper.percent_passing);
            let bracketed = (p0 < percent && percent <= p1) || (p1 <= percent && percent < p0);
            if bracketed {
                return Some(interpolate_aperture(lower, upper, percent));
            }
        }

        let last = self.coarsest();
        (last.percent_passing == percent).then_some(last.aperture_mm)
    }
}

fn interpolate_passing(lower: &CurvePoint, upper: &CurvePoint, aperture_mm: f64) -> f64 {
    let (x0, x1) = (lower.aperture_mm.log10(), upper.aperture_mm.log10());
    let t = (aperture_mm.log10() - x0) / (x1 - x0);
    lower.percent_passing + t * (upper.percent_passing - lower.percent_passing)
}

fn interpolate_aperture(lower: &CurvePoint, upper: &CurvePoint, percent: f64) -> f64 {
    let (p0, p1) = (lower.percent_passing, upper.percent_passing);
    if percent == p1 {
        return upper.aperture_mm;
    }
    let (x0, x1) = (lower.aperture_mm.log10(), upper.aperture_mm.log10());
    let t = (percent - p0) / (p1 - p0);
    10f64.powf(x0 + t * (x1 - x0))
}
