//! Consistency checks run against a built sieve curve.

use serde_json::json;

use crate::curve::SieveCurve;

use super::notice::{Evidence, Notice, NoticeKind};

/// Tolerance below which a drop in percent passing is treated as rounding noise.
const MONOTONIC_EPSILON: f64 = 1e-9;

/// Trait for curve checks.
pub trait CurveCheck {
    /// Run the check and return notices.
    fn check(&self, curve: &SieveCurve) -> Vec<Notice>;
}

/// Flags a retained mass total outside the tolerance of the declared dry mass.
pub struct MassBalanceCheck {
    tolerance_percent: f64,
}

impl MassBalanceCheck {
    /// Create a check with the given tolerance, in percent.
    pub fn new(tolerance_percent: f64) -> Self {
        Self { tolerance_percent }
    }
}

impl CurveCheck for MassBalanceCheck {
    fn check(&self, curve: &SieveCurve) -> Vec<Notice> {
        let Some(balance) = curve.mass_balance() else {
            return Vec::new();
        };
        if balance.deviation_percent.abs() <= self.tolerance_percent {
            return Vec::new();
        }

        let notice = Notice::new(
            NoticeKind::MassBalance,
            "curve",
            format!(
                "Retained mass {:.2} g deviates {:+.2}% from the declared dry mass {:.2} g (tolerance {}%)",
                balance.retained_total_g,
                balance.deviation_percent,
                balance.declared_total_g,
                self.tolerance_percent
            ),
        )
        .with_evidence(
            Evidence::new()
                .with_value(balance.retained_total_g)
                .with_percentage(balance.deviation_percent)
                .with_expected(json!({
                    "declared_total_g": balance.declared_total_g,
                    "tolerance_percent": self.tolerance_percent
                })),
        )
        .with_source("mass_balance_check");

        vec![notice]
    }
}

/// Flags every sieve whose percent passing is lower than the next finer sieve.
pub struct MonotonicityCheck;

impl CurveCheck for MonotonicityCheck {
    fn check(&self, curve: &SieveCurve) -> Vec<Notice> {
        curve
            .points()
            .windows(2)
            .filter(|pair| pair[1].percent_passing + MONOTONIC_EPSILON < pair[0].percent_passing)
            .map(|pair| {
                let (finer, coarser) = (&pair[0], &pair[1]);
                Notice::new(
                    NoticeKind::NonMonotonicCurve,
                    "curve",
                    format!(
                        "{:.2}% passes {} mm but only {:.2}% passes the coarser {} mm sieve",
                        finer.percent_passing,
                        finer.aperture_mm,
                        coarser.percent_passing,
                        coarser.aperture_mm
                    ),
                )
                .with_evidence(
                    Evidence::new()
                        .with_aperture(coarser.aperture_mm)
                        .with_value(coarser.percent_passing)
                        .with_expected(json!({ "min_percent_passing": finer.percent_passing })),
                )
                .with_source("monotonicity_check")
            })
            .collect()
    }
}

/// Runs every curve check in a fixed order.
pub struct CurveChecks {
    checks: Vec<Box<dyn CurveCheck>>,
}

impl CurveChecks {
    /// Create the standard set of checks.
    pub fn new(mass_tolerance_percent: f64) -> Self {
        Self {
            checks: vec![
                Box::new(MassBalanceCheck::new(mass_tolerance_percent)),
                Box::new(MonotonicityCheck),
            ],
        }
    }

    /// Run all checks.
    pub fn run(&self, curve: &SieveCurve) -> Vec<Notice> {
        self.checks.iter().flat_map(|c| c.check(curve)).collect()
    }
}
