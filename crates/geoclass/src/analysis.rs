//! The analysis pipeline and its result.

use std::fmt;
use std::path::Path;

use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::classify::{
    AashtoClassification, AashtoClassifier, AashtoInput, AtterbergLimits, MctClassifier,
    MctCoefficients, MctOutcome, SIEVE_NO_4_MM, SIEVE_NO_10_MM, SIEVE_NO_40_MM, SIEVE_NO_200_MM,
    SucsClassifier, SucsInput, SucsOutcome,
};
use crate::config::EngineConfig;
use crate::curve::{Boundary, CurveBuilder, GradationParameters, PassingLookup, SieveCurve, SieveReading};
use crate::error::Result;
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::validation::{CurveChecks, Evidence, Notice, NoticeKind, Severity};

/// Everything one analysis run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Sieve readings, in any order.
    pub readings: Vec<SieveReading>,
    /// Total dry mass of the sample, in grams.
    pub total_dry_mass_g: f64,
    /// Atterberg limits.
    pub limits: AtterbergLimits,
    /// Mini-MCV coefficients, when the test was run.
    #[serde(default)]
    pub mct: Option<MctCoefficients>,
}

/// Percent passing at the sieves the classifiers read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeySieves {
    /// No. 4 (4.75 mm).
    pub no_4: PassingLookup,
    /// No. 10 (2.0 mm).
    pub no_10: PassingLookup,
    /// No. 40 (0.42 mm).
    pub no_40: PassingLookup,
    /// No. 200 (0.075 mm).
    pub no_200: PassingLookup,
}

impl KeySieves {
    /// Look up all four sieves on a curve.
    pub fn from_curve(curve: &SieveCurve) -> Self {
        Self {
            no_4: curve.passing_at(SIEVE_NO_4_MM),
            no_10: curve.passing_at(SIEVE_NO_10_MM),
            no_40: curve.passing_at(SIEVE_NO_40_MM),
            no_200: curve.passing_at(SIEVE_NO_200_MM),
        }
    }

    /// Lookups paired with their designations, coarsest first.
    pub fn named(&self) -> [(&'static str, &PassingLookup); 4] {
        [
            ("No. 4", &self.no_4),
            ("No. 10", &self.no_10),
            ("No. 40", &self.no_40),
            ("No. 200", &self.no_200),
        ]
    }
}

/// Gravel, sand and fines fractions, in percent of the dry mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilFractions {
    /// Retained on No. 4.
    pub gravel: f64,
    /// Between No. 4 and No. 200.
    pub sand: f64,
    /// Passing No. 200.
    pub fines: f64,
}

impl SoilFractions {
    /// Split from the percent passing No. 4 and No. 200.
    pub fn from_passing(p4: f64, p200: f64) -> Self {
        Self {
            gravel: 100.0 - p4,
            sand: p4 - p200,
            fines: p200,
        }
    }
}

/// Explanation text for each classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanations {
    /// Why the SUCS symbol was assigned.
    pub sucs: String,
    /// Why the AASHTO group was assigned.
    pub aashto: String,
    /// Why the MCT class was assigned, or what is missing.
    pub mct: String,
}

/// Outcome of the three classifiers.
///
/// The flat code fields are the canonical symbols; the typed outcomes keep
/// the matched rules for auditing and the explanations are free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// SUCS symbol, or "insufficient data".
    pub sucs_symbol: String,
    /// AASHTO group code.
    pub aashto_group: String,
    /// AASHTO Group Index.
    pub aashto_group_index: u32,
    /// MCT class code, or "manual/unavailable".
    pub mct_class: String,
    /// SUCS outcome with rule labels.
    pub sucs: SucsOutcome,
    /// AASHTO outcome with rule label.
    pub aashto: AashtoClassification,
    /// MCT outcome with rule label.
    pub mct: MctOutcome,
    /// Human-readable explanations.
    pub explanations: Explanations,
}

impl ClassificationResult {
    fn new(sucs: SucsOutcome, aashto: AashtoClassification, mct: MctOutcome) -> Self {
        Self {
            sucs_symbol: sucs.code(),
            aashto_group: aashto.group.code().to_string(),
            aashto_group_index: aashto.group_index,
            mct_class: mct.code(),
            explanations: Explanations {
                sucs: sucs.explanation(),
                aashto: aashto.explanation(),
                mct: mct.explanation(),
            },
            sucs,
            aashto,
            mct,
        }
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SUCS {} | AASHTO {} ({}) | MCT {}",
            self.sucs_symbol, self.aashto_group, self.aashto_group_index, self.mct_class
        )
    }
}

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Metadata about the readings file, when the run started from one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<SourceMetadata>,
    /// Percent-passing curve.
    pub curve: SieveCurve,
    /// Percent passing at the classification sieves.
    pub sieves: KeySieves,
    /// Characteristic diameters and coefficients.
    pub gradation: GradationParameters,
    /// Gravel, sand and fines fractions.
    pub fractions: SoilFractions,
    /// Atterberg limits the run used.
    pub limits: AtterbergLimits,
    /// Classification outcome.
    pub classification: ClassificationResult,
    /// Non-fatal conditions found during the run.
    pub notices: Vec<Notice>,
    /// Summary of the notices.
    pub summary: AnalysisSummary,
}

impl AnalysisResult {
    /// Notices of one kind.
    pub fn notices_of(&self, kind: NoticeKind) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(move |n| n.kind == kind)
    }

    /// Whether any notice of `kind` is attached.
    pub fn has_notice(&self, kind: NoticeKind) -> bool {
        self.notices_of(kind).next().is_some()
    }
}

/// Summary of the notices attached to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total number of notices.
    pub total_notices: usize,
    /// Notices by severity.
    pub notices_by_severity: NoticeCounts,
    /// Notices by kind, in order of first appearance.
    pub notices_by_kind: IndexMap<String, usize>,
    /// Human-readable recommendation.
    pub recommendation: String,
}

/// Counts of notices by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeCounts {
    /// Consistency warnings.
    pub warning: usize,
    /// Informational notices.
    pub info: usize,
}

impl AnalysisSummary {
    /// Summarize a list of notices.
    pub fn from_notices(notices: &[Notice]) -> Self {
        let mut notices_by_severity = NoticeCounts::default();
        let mut notices_by_kind: IndexMap<String, usize> = IndexMap::new();

        for notice in notices {
            match notice.severity {
                Severity::Warning => notices_by_severity.warning += 1,
                Severity::Info => notices_by_severity.info += 1,
            }
            *notices_by_kind
                .entry(notice.kind.label().to_string())
                .or_insert(0) += 1;
        }

        let recommendation = recommendation(notices, &notices_by_severity);

        Self {
            total_notices: notices.len(),
            notices_by_severity,
            notices_by_kind,
            recommendation,
        }
    }
}

fn recommendation(notices: &[Notice], counts: &NoticeCounts) -> String {
    let has = |kind: NoticeKind| notices.iter().any(|n| n.kind == kind);

    if has(NoticeKind::MassBalance) {
        "Review mass balance before reporting.".to_string()
    } else if has(NoticeKind::NonMonotonicCurve) {
        "Check the readings: percent passing decreases with aperture.".to_string()
    } else if counts.warning > 0 {
        format!("Review {} warning(s) before reporting.", counts.warning)
    } else if counts.info > 0 {
        "Classification is partial. Supply the missing data to complete it.".to_string()
    } else {
        "All classifications complete.".to_string()
    }
}

/// Runs the full pipeline: curve, gradation, classifiers, notices.
pub struct Analyzer {
    config: EngineConfig,
    parser: Parser,
    builder: CurveBuilder,
    checks: CurveChecks,
    aashto: AashtoClassifier,
    sucs: SucsClassifier,
    mct: MctClassifier,
}

impl Analyzer {
    /// Create an analyzer with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Create an analyzer with a custom configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            parser: Parser::new(),
            builder: CurveBuilder::new().with_tolerance(config.mass_tolerance_percent),
            checks: CurveChecks::new(config.mass_tolerance_percent),
            aashto: AashtoClassifier::new(),
            sucs: SucsClassifier::new(),
            mct: MctClassifier::new(config.mct),
            config,
        }
    }

    /// Use a custom parser configuration for file imports.
    pub fn with_parser(mut self, config: ParserConfig) -> Self {
        self.parser = Parser::with_config(config);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze raw readings.
    ///
    /// Validation errors abort the run. Everything else is attached to the
    /// result as a notice.
    pub fn analyze(&self, input: &AnalysisInput) -> Result<AnalysisResult> {
        let curve = self.builder.build(&input.readings, input.total_dry_mass_g)?;
        self.analyze_curve(curve, input.limits, input.mct.as_ref())
    }

    /// Import readings from a file and analyze them.
    pub fn analyze_file(
        &self,
        path: impl AsRef<Path>,
        total_dry_mass_g: f64,
        limits: AtterbergLimits,
        mct: Option<MctCoefficients>,
    ) -> Result<AnalysisResult> {
        let (table, source) = self.parser.parse_file(path)?;

        let input = AnalysisInput {
            readings: table.readings,
            total_dry_mass_g,
            limits,
            mct,
        };
        let mut result = self.analyze(&input)?;
        result.source = Some(source);
        Ok(result)
    }

    /// Analyze an already-built curve.
    pub fn analyze_curve(
        &self,
        curve: SieveCurve,
        limits: AtterbergLimits,
        mct: Option<&MctCoefficients>,
    ) -> Result<AnalysisResult> {
        let limits = AtterbergLimits::new(limits.ll, limits.lp)?;
        debug!("curve has {} points", curve.len());

        let mut notices = self.checks.run(&curve);

        let sieves = KeySieves::from_curve(&curve);
        notices.extend(extrapolation_notices(&curve, &sieves));

        let gradation = GradationParameters::from_curve(&curve);
        debug!(
            "gradation: D10={:?} D30={:?} D60={:?} Cu={:?} Cc={:?}",
            gradation.d10, gradation.d30, gradation.d60, gradation.cu, gradation.cc
        );

        let ip_eff = limits.ip_eff();

        let aashto = self.aashto.classify(&AashtoInput {
            p10: sieves.no_10.percent_passing,
            p40: sieves.no_40.percent_passing,
            p200: sieves.no_200.percent_passing,
            ll: limits.ll,
            ip_eff,
        });
        debug!("AASHTO {} by rule '{}'", aashto, aashto.rule);

        let sucs = self.sucs.classify(&SucsInput {
            p200: sieves.no_200.percent_passing,
            p4: sieves.no_4.percent_passing,
            ll: limits.ll,
            ip_eff,
            cu: gradation.cu,
            cc: gradation.cc,
        });
        debug!("SUCS {}", sucs);
        if let SucsOutcome::InsufficientData { .. } = sucs {
            notices.push(insufficient_gradation_notice(&gradation));
        }

        let mct_outcome = self.mct.classify(mct);
        debug!("MCT {}", mct_outcome);
        notices.extend(self.mct_notices(&mct_outcome, mct));

        for notice in notices.iter().filter(|n| n.severity == Severity::Warning) {
            warn!("{}: {}", notice.kind.label(), notice.description);
        }

        let summary = AnalysisSummary::from_notices(&notices);

        Ok(AnalysisResult {
            source: None,
            fractions: SoilFractions::from_passing(
                sieves.no_4.percent_passing,
                sieves.no_200.percent_passing,
            ),
            curve,
            sieves,
            gradation,
            limits,
            classification: ClassificationResult::new(sucs, aashto, mct_outcome),
            notices,
            summary,
        })
    }

    fn mct_notices(&self, outcome: &MctOutcome, coefficients: Option<&MctCoefficients>) -> Vec<Notice> {
        let calibration = &self.config.mct;

        match outcome {
            MctOutcome::AwaitingData => {
                let mut evidence = Evidence::new();
                if let Some(c) = coefficients {
                    evidence = evidence.with_value(c.c_prime).with_expected(json!({
                        "c_prime": c.c_prime,
                        "d_prime": c.d_prime
                    }));
                }
                vec![
                    Notice::new(NoticeKind::AwaitingMctData, "mct", outcome.explanation())
                        .with_evidence(evidence)
                        .with_source("mct_classifier"),
                ]
            }
            MctOutcome::Uncalibrated => vec![
                Notice::new(NoticeKind::UncalibratedMct, "mct", outcome.explanation())
                    .with_evidence(Evidence::new().with_expected(json!({
                        "d_prime_threshold": null,
                        "known_scales": [1.5, 20.0]
                    })))
                    .with_source("mct_classifier"),
            ],
            MctOutcome::Classified {
                durability_warning: true,
                class,
                ..
            } => {
                let loss = coefficients.and_then(|c| c.immersion_loss).unwrap_or_default();
                vec![
                    Notice::new(
                        NoticeKind::Durability,
                        "mct",
                        format!(
                            "Immersion mass loss {:.1}% exceeds {:.1}%; {} kept with a durability warning",
                            loss, calibration.immersion_loss_limit, class
                        ),
                    )
                    .with_evidence(
                        Evidence::new()
                            .with_percentage(loss)
                            .with_expected(json!({ "max_percent": calibration.immersion_loss_limit })),
                    )
                    .with_source("mct_classifier"),
                ]
            }
            MctOutcome::Classified { .. } => Vec::new(),
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn extrapolation_notices(curve: &SieveCurve, sieves: &KeySieves) -> Vec<Notice> {
    sieves
        .named()
        .into_iter()
        .filter_map(|(name, lookup)| {
            let boundary = lookup.boundary?;
            let description = match boundary {
                Boundary::AboveCoarsest => format!(
                    "{} ({} mm) is coarser than the coarsest sieve ({} mm); 100% passing assumed",
                    name,
                    lookup.aperture_mm,
                    curve.coarsest().aperture_mm
                ),
                Boundary::BelowFinest => format!(
                    "{} ({} mm) is finer than the finest sieve ({} mm); 0% passing assumed",
                    name,
                    lookup.aperture_mm,
                    curve.finest().aperture_mm
                ),
            };
            Some(
                Notice::new(NoticeKind::Extrapolation, "curve", description)
                    .with_evidence(
                        Evidence::new()
                            .with_aperture(lookup.aperture_mm)
                            .with_percentage(lookup.percent_passing),
                    )
                    .with_source("interpolator"),
            )
        })
        .collect()
}

fn insufficient_gradation_notice(gradation: &GradationParameters) -> Notice {
    let missing = gradation.missing_diameters();
    Notice::new(
        NoticeKind::InsufficientGradationData,
        "sucs",
        format!(
            "Curve does not cover {}; Cu and Cc are undefined",
            missing.join(", ")
        ),
    )
    .with_evidence(Evidence::new().with_expected(json!({ "missing": missing })))
    .with_source("gradation_estimator")
}
