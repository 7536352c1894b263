//! Notice types for non-fatal conditions found during an analysis run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of condition a notice reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Summed retained mass deviates from the declared dry mass.
    MassBalance,
    /// Percent passing decreases while the aperture increases.
    NonMonotonicCurve,
    /// A named sieve lies outside the measured apertures and a boundary value was used.
    Extrapolation,
    /// D10/D30/D60 could not be read from the curve, so Cu/Cc are unavailable.
    InsufficientGradationData,
    /// MCT coefficients are missing or non-positive.
    AwaitingMctData,
    /// MCT coefficients are present but no d′ laterization threshold is configured.
    UncalibratedMct,
    /// Immersion mass loss exceeds the durability limit.
    Durability,
}

impl NoticeKind {
    /// Get a human-readable label for the notice kind.
    pub fn label(&self) -> &'static str {
        match self {
            NoticeKind::MassBalance => "Mass Balance",
            NoticeKind::NonMonotonicCurve => "Non-Monotonic Curve",
            NoticeKind::Extrapolation => "Extrapolation",
            NoticeKind::InsufficientGradationData => "Insufficient Gradation Data",
            NoticeKind::AwaitingMctData => "Awaiting MCT Data",
            NoticeKind::UncalibratedMct => "Uncalibrated MCT",
            NoticeKind::Durability => "Durability",
        }
    }

    /// Default severity for this kind.
    pub fn severity(&self) -> Severity {
        match self {
            NoticeKind::MassBalance
            | NoticeKind::NonMonotonicCurve
            | NoticeKind::Extrapolation
            | NoticeKind::Durability => Severity::Warning,
            NoticeKind::InsufficientGradationData
            | NoticeKind::AwaitingMctData
            | NoticeKind::UncalibratedMct => Severity::Info,
        }
    }
}

/// Severity level of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Data-sufficiency information; the result is partial but correct.
    Info,
    /// Consistency problem the operator should review before reporting.
    Warning,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
        }
    }
}

/// Evidence supporting a notice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Aperture involved, in millimetres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture_mm: Option<f64>,
    /// Measured or substituted value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Relative deviation in percent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<f64>,
    /// Expected value or range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<Value>,
}

impl Evidence {
    /// Create empty evidence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the aperture.
    pub fn with_aperture(mut self, aperture_mm: f64) -> Self {
        self.aperture_mm = Some(aperture_mm);
        self
    }

    /// Set the value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    /// Set percentage.
    pub fn with_percentage(mut self, pct: f64) -> Self {
        self.percentage = Some(pct);
        self
    }

    /// Set expected value.
    pub fn with_expected(mut self, expected: impl Into<Value>) -> Self {
        self.expected = Some(expected.into());
        self
    }
}

/// A non-fatal condition attached to an analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    /// Kind of condition.
    #[serde(rename = "type")]
    pub kind: NoticeKind,
    /// Severity level.
    pub severity: Severity,
    /// What the notice is about ("curve", "aashto", "sucs", "mct").
    pub subject: String,
    /// Human-readable description.
    pub description: String,
    /// Supporting evidence.
    pub evidence: Evidence,
    /// What produced this notice.
    pub source: String,
}

impl Notice {
    /// Create a new notice with the kind's default severity.
    pub fn new(kind: NoticeKind, subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            subject: subject.into(),
            description: description.into(),
            evidence: Evidence::new(),
            source: String::new(),
        }
    }

    /// Set the evidence.
    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence = evidence;
        self
    }

    /// Set the source name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_notice() {
        let notice = Notice::new(
            NoticeKind::MassBalance,
            "curve",
            "Retained mass deviates 10.0% from the declared dry mass",
        )
        .with_evidence(Evidence::new().with_percentage(10.0).with_value(1100.0))
        .with_source("mass_balance_check");

        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(notice.subject, "curve");
        assert_eq!(notice.evidence.percentage, Some(10.0));
    }

    #[test]
    fn test_data_sufficiency_kinds_are_info() {
        assert_eq!(NoticeKind::InsufficientGradationData.severity(), Severity::Info);
        assert_eq!(NoticeKind::AwaitingMctData.severity(), Severity::Info);
        assert_eq!(NoticeKind::Extrapolation.severity(), Severity::Warning);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
    }

    #[test]
    fn test_notice_serializes_kind_as_type() {
        let notice = Notice::new(NoticeKind::Extrapolation, "aashto", "boundary");
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["type"], "extrapolation");
        assert_eq!(json["severity"], "warning");
    }
}
