//! Percent-passing curve construction from sieve readings.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{GeoclassError, Result};

use super::reading::SieveReading;

/// Relative mass balance tolerance accepted without a warning, in percent.
pub const DEFAULT_MASS_TOLERANCE_PERCENT: f64 = 2.0;

/// One point of the particle-size distribution curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Sieve aperture in millimetres.
    pub aperture_mm: f64,
    /// Cumulative percent of the sample finer than the aperture.
    pub percent_passing: f64,
}

impl CurvePoint {
    /// Create a new point.
    pub fn new(aperture_mm: f64, percent_passing: f64) -> Self {
        Self {
            aperture_mm,
            percent_passing,
        }
    }
}

/// Comparison between the summed retained masses and the declared dry mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassBalance {
    /// Sum of the retained masses, in grams.
    pub retained_total_g: f64,
    /// Declared total dry mass, in grams.
    pub declared_total_g: f64,
    /// `(retained - declared) / declared * 100`.
    pub deviation_percent: f64,
    /// Whether `|deviation_percent|` is within the configured tolerance.
    pub within_tolerance: bool,
}

impl MassBalance {
    fn compute(retained_total_g: f64, declared_total_g: f64, tolerance_percent: f64) -> Self {
        let deviation_percent = (retained_total_g - declared_total_g) / declared_total_g * 100.0;
        Self {
            retained_total_g,
            declared_total_g,
            deviation_percent,
            within_tolerance: deviation_percent.abs() <= tolerance_percent,
        }
    }
}

/// Particle-size distribution curve, sorted by ascending aperture.
///
/// # Invariants
/// - At least one point.
/// - Apertures are unique, positive and strictly increasing.
/// - Every `percent_passing` lies in [0, 100].
///
/// Monotonicity of `percent_passing` is guaranteed for curves built from
/// masses; curves built from reduced points may violate it, which
/// [`CurveChecks`](crate::validation::CurveChecks) reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSieveCurve")]
pub struct SieveCurve {
    points: Vec<CurvePoint>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    mass_balance: Option<MassBalance>,
}

/// Unchecked wire form of a [`SieveCurve`].
#[derive(Deserialize)]
struct RawSieveCurve {
    points: Vec<CurvePoint>,
    #[serde(default)]
    mass_balance: Option<MassBalance>,
}

impl TryFrom<RawSieveCurve> for SieveCurve {
    type Error = GeoclassError;

    fn try_from(raw: RawSieveCurve) -> Result<Self> {
        let mut curve = CurveBuilder::new().from_points(&raw.points)?;
        curve.mass_balance = raw.mass_balance;
        Ok(curve)
    }
}

impl SieveCurve {
    /// Points sorted by ascending aperture.
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Mass balance report, when the curve was built from masses.
    pub fn mass_balance(&self) -> Option<&MassBalance> {
        self.mass_balance.as_ref()
    }

    /// Finest sieve of the curve.
    pub fn finest(&self) -> &CurvePoint {
        &self.points[0]
    }

    /// Coarsest sieve of the curve.
    pub fn coarsest(&self) -> &CurvePoint {
        &self.points[self.points.len() - 1]
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no points. Never true for a constructed curve.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Builds [`SieveCurve`]s from raw readings or reduced points.
#[derive(Debug, Clone)]
pub struct CurveBuilder {
    tolerance_percent: f64,
}

impl CurveBuilder {
    /// Create a builder with the default 2% mass balance tolerance.
    pub fn new() -> Self {
        Self {
            tolerance_percent: DEFAULT_MASS_TOLERANCE_PERCENT,
        }
    }

    /// Set the mass balance tolerance, in percent.
    pub fn with_tolerance(mut self, tolerance_percent: f64) -> Self {
        self.tolerance_percent = tolerance_percent;
        self
    }

    /// Build a curve from retained masses and the total dry mass.
    ///
    /// Readings may arrive in any order. The cumulative retained mass at a
    /// sieve is the mass on that sieve and every coarser one.
    ///
    /// # Errors
    /// - [`GeoclassError::EmptyCurve`] when `readings` is empty.
    /// - [`GeoclassError::InvalidMass`] when `total_dry_mass_g` is not positive.
    /// - [`GeoclassError::InvalidReading`] for a bad aperture or mass.
    /// - [`GeoclassError::DuplicateAperture`] when two readings share an aperture.
    pub fn build(&self, readings: &[SieveReading], total_dry_mass_g: f64) -> Result<SieveCurve> {
        if readings.is_empty() {
            return Err(GeoclassError::EmptyCurve);
        }
        if !total_dry_mass_g.is_finite() || total_dry_mass_g <= 0.0 {
            return Err(GeoclassError::InvalidMass(total_dry_mass_g));
        }
        for reading in readings {
            reading.validate()?;
        }

        let mut sorted = readings.to_vec();
        sorted.sort_by(|a, b| a.aperture_mm.total_cmp(&b.aperture_mm));
        check_unique(sorted.iter().map(|r| r.aperture_mm))?;

        // Accumulate from the coarsest sieve down; the finest is handled last.
        let mut cumulative = 0.0;
        let mut points = vec![CurvePoint::new(0.0, 0.0); sorted.len()];
        for (i, reading) in sorted.iter().enumerate().rev() {
            cumulative += reading.retained_mass_g;
            let passing = 100.0 - 100.0 * cumulative / total_dry_mass_g;
            points[i] = CurvePoint::new(reading.aperture_mm, passing.clamp(0.0, 100.0));
        }

        let mass_balance = MassBalance::compute(cumulative, total_dry_mass_g, self.tolerance_percent);
        debug!(
            "built sieve curve: {} points, retained {:.2} g of {:.2} g ({:+.2}%)",
            points.len(),
            cumulative,
            total_dry_mass_g,
            mass_balance.deviation_percent
        );

        Ok(SieveCurve {
            points,
            mass_balance: Some(mass_balance),
        })
    }

    /// Build a curve from already-reduced (aperture, percent passing) points.
    ///
    /// Percentages are clamped to [0, 100]. Ordering of the percentages is
    /// left as given so that inconsistencies can be reported.
    pub fn from_points(&self, points: &[CurvePoint]) -> Result<SieveCurve> {
        if points.is_empty() {
            return Err(GeoclassError::EmptyCurve);
        }
        for point in points {
            if !point.aperture_mm.is_finite() || point.aperture_mm <= 0.0 {
                return Err(GeoclassError::InvalidReading {
                    aperture_mm: point.aperture_mm,
                    message: "aperture must be a positive number".to_string(),
                });
            }
            if !point.percent_passing.is_finite() {
                return Err(GeoclassError::InvalidReading {
                    aperture_mm: point.aperture_mm,
                    message: "percent passing must be a number".to_string(),
                });
            }
        }

        let mut sorted: Vec<CurvePoint> = points
            .iter()
            .map(|p| CurvePoint::new(p.aperture_mm, p.percent_passing.clamp(0.0, 100.0)))
            .collect();
        sorted.sort_by(|a, b| a.aperture_mm.total_cmp(&b.aperture_mm));
        check_unique(sorted.iter().map(|p| p.aperture_mm))?;

        Ok(SieveCurve {
            points: sorted,
            mass_balance: None,
        })
    }
}

impl Default for CurveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject repeated apertures in an ascending sequence.
fn check_unique(apertures: impl Iterator<Item = f64>) -> Result<()> {
    let mut previous: Option<f64> = None;
    for aperture_mm in apertures {
        if previous == Some(aperture_mm) {
            return Err(GeoclassError::DuplicateAperture { aperture_mm });
        }
        previous = Some(aperture_mm);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario_readings() -> Vec<SieveReading> {
        vec![
            SieveReading::new(50.8, 0.0),
            SieveReading::new(25.4, 0.0),
            SieveReading::new(9.5, 10.0),
            SieveReading::new(4.75, 40.0),
            SieveReading::new(2.0, 200.0),
            SieveReading::new(0.42, 400.0),
            SieveReading::new(0.075, 150.0),
        ]
    }

    #[test]
    fn test_build_sorts_and_accumulates_from_coarsest() {
        let curve = CurveBuilder::new().build(&scenario_readings(), 1000.0).unwrap();
        let passing: Vec<f64> = curve.points().iter().map(|p| p.percent_passing).collect();
        let apertures: Vec<f64> = curve.points().iter().map(|p| p.aperture_mm).collect();

        assert_eq!(apertures, vec![0.075, 0.42, 2.0, 4.75, 9.5, 25.4, 50.8]);
        for (got, want) in passing.iter().zip([20.0, 35.0, 75.0, 95.0, 99.0, 100.0, 100.0]) {
            assert_relative_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mass_balance_within_tolerance() {
        let curve = CurveBuilder::new().build(&scenario_readings(), 1000.0).unwrap();
        let balance = curve.mass_balance().unwrap();
        assert_relative_eq!(balance.retained_total_g, 800.0);
        assert_relative_eq!(balance.deviation_percent, -20.0);
        assert!(!balance.within_tolerance);

        let curve = CurveBuilder::new().build(&scenario_readings(), 810.0).unwrap();
        assert!(curve.mass_balance().unwrap().within_tolerance);
    }

    #[test]
    fn test_excess_mass_clamps_to_zero() {
        let readings = vec![
            SieveReading::new(4.75, 300.0),
            SieveReading::new(2.0, 400.0),
            SieveReading::new(0.075, 400.0),
        ];
        let curve = CurveBuilder::new().build(&readings, 1000.0).unwrap();
        assert_relative_eq!(curve.finest().percent_passing, 0.0);
        assert_relative_eq!(curve.mass_balance().unwrap().deviation_percent, 10.0);
    }

    #[test]
    fn test_empty_readings() {
        assert!(matches!(
            CurveBuilder::new().build(&[], 1000.0),
            Err(GeoclassError::EmptyCurve)
        ));
    }

    #[test]
    fn test_invalid_total_mass() {
        let readings = scenario_readings();
        assert!(matches!(
            CurveBuilder::new().build(&readings, 0.0),
            Err(GeoclassError::InvalidMass(_))
        ));
        assert!(matches!(
            CurveBuilder::new().build(&readings, -5.0),
            Err(GeoclassError::InvalidMass(_))
        ));
    }

    #[test]
    fn test_duplicate_aperture() {
        let readings = vec![
            SieveReading::new(2.0, 10.0),
            SieveReading::new(0.42, 5.0),
            SieveReading::new(2.0, 20.0),
        ];
        match CurveBuilder::new().build(&readings, 100.0) {
            Err(GeoclassError::DuplicateAperture { aperture_mm }) => assert_eq!(aperture_mm, 2.0),
            other => panic!("expected duplicate aperture error, got {:?}", other),
        }
    }

    #[test]
    fn test_from_points_keeps_order_of_percentages() {
        let points = [
            CurvePoint::new(2.0, 60.0),
            CurvePoint::new(0.42, 70.0),
            CurvePoint::new(4.75, 120.0),
        ];
        let curve = CurveBuilder::new().from_points(&points).unwrap();
        assert_eq!(curve.finest().aperture_mm, 0.42);
        assert_eq!(curve.finest().percent_passing, 70.0);
        assert_eq!(curve.coarsest().percent_passing, 100.0);
        assert!(curve.mass_balance().is_none());
    }

    #[test]
    fn test_deserialize_rejects_empty_curve() {
        let err = serde_json::from_str::<SieveCurve>(r#"{"points": []}"#).unwrap_err();
        assert!(err.to_string().contains("at least one"), "{}", err);
    }

    #[test]
    fn test_deserialize_sorts_points() {
        let json = r#"{"points": [
            {"aperture_mm": 4.75, "percent_passing": 90.0},
            {"aperture_mm": 0.075, "percent_passing": 10.0}
        ]}"#;
        let curve: SieveCurve = serde_json::from_str(json).unwrap();
        assert_eq!(curve.finest().aperture_mm, 0.075);
        assert_eq!(curve.coarsest().percent_passing, 90.0);
    }

    #[test]
    fn test_deserialize_rejects_duplicate_aperture() {
        let json = r#"{"points": [
            {"aperture_mm": 2.0, "percent_passing": 50.0},
            {"aperture_mm": 2.0, "percent_passing": 40.0}
        ]}"#;
        assert!(serde_json::from_str::<SieveCurve>(json).is_err());
    }

    #[test]
    fn test_deserialize_keeps_mass_balance() {
        let curve = CurveBuilder::new().build(&scenario_readings(), 1000.0).unwrap();
        let json = serde_json::to_string(&curve).unwrap();
        let restored: SieveCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.points(), curve.points());
        assert!(restored.mass_balance().is_some());
    }
}
