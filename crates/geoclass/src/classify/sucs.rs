//! SUCS (Unified Soil Classification System, ASTM D2487) classification.
//!
//! Coarse soils (less than 50% passing No. 200) take a `G` or `S` prefix and
//! a gradation symbol, a fines symbol, or both:
//!
//! | fines (p200)   | symbol                          |
//! |----------------|---------------------------------|
//! | `< 5`          | `{G,S}{W,P}`                    |
//! | `5 ..= 12`     | `{G,S}{W,P}-{G,S}{M,C}`         |
//! | `> 12`         | `{G,S}{M,C}`                    |
//!
//! Fine soils are placed on the plasticity chart against the A-line
//! `IP = 0.73 (LL - 20)`.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::rules::{DecisionTable, Rule};

/// Marker emitted when the gradation symbol cannot be determined.
pub const INSUFFICIENT_DATA: &str = "insufficient data";

/// Coarse-soil prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoarsePrefix {
    /// Gravel (`G`): more gravel than sand.
    #[serde(rename = "G")]
    Gravel,
    /// Sand (`S`).
    #[serde(rename = "S")]
    Sand,
}

/// SUCS group symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupSymbol {
    GW,
    GP,
    GM,
    GC,
    SW,
    SP,
    SM,
    SC,
    ML,
    CL,
    #[serde(rename = "CL-ML")]
    ClMl,
    MH,
    CH,
}

impl GroupSymbol {
    /// Normative symbol.
    pub fn code(&self) -> &'static str {
        match self {
            GroupSymbol::GW => "GW",
            GroupSymbol::GP => "GP",
            GroupSymbol::GM => "GM",
            GroupSymbol::GC => "GC",
            GroupSymbol::SW => "SW",
            GroupSymbol::SP => "SP",
            GroupSymbol::SM => "SM",
            GroupSymbol::SC => "SC",
            GroupSymbol::ML => "ML",
            GroupSymbol::CL => "CL",
            GroupSymbol::ClMl => "CL-ML",
            GroupSymbol::MH => "MH",
            GroupSymbol::CH => "CH",
        }
    }

    /// Group name.
    pub fn name(&self) -> &'static str {
        match self {
            GroupSymbol::GW => "Well-graded gravel",
            GroupSymbol::GP => "Poorly graded gravel",
            GroupSymbol::GM => "Silty gravel",
            GroupSymbol::GC => "Clayey gravel",
            GroupSymbol::SW => "Well-graded sand",
            GroupSymbol::SP => "Poorly graded sand",
            GroupSymbol::SM => "Silty sand",
            GroupSymbol::SC => "Clayey sand",
            GroupSymbol::ML => "Silt",
            GroupSymbol::CL => "Lean clay",
            GroupSymbol::ClMl => "Silty clay",
            GroupSymbol::MH => "Elastic silt",
            GroupSymbol::CH => "Fat clay",
        }
    }

    fn graded(prefix: CoarsePrefix, grading: Grading) -> Self {
        match (prefix, grading) {
            (CoarsePrefix::Gravel, Grading::Well) => GroupSymbol::GW,
            (CoarsePrefix::Gravel, Grading::Poor) => GroupSymbol::GP,
            (CoarsePrefix::Sand, Grading::Well) => GroupSymbol::SW,
            (CoarsePrefix::Sand, Grading::Poor) => GroupSymbol::SP,
        }
    }

    fn with_fines(prefix: CoarsePrefix, fines: FinesKind) -> Self {
        match (prefix, fines) {
            (CoarsePrefix::Gravel, FinesKind::Silty) => GroupSymbol::GM,
            (CoarsePrefix::Gravel, FinesKind::Clayey) => GroupSymbol::GC,
            (CoarsePrefix::Sand, FinesKind::Silty) => GroupSymbol::SM,
            (CoarsePrefix::Sand, FinesKind::Clayey) => GroupSymbol::SC,
        }
    }
}

impl fmt::Display for GroupSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Gradation of a clean coarse soil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grading {
    /// `W`
    Well,
    /// `P`
    Poor,
}

/// Character of the fines in a coarse soil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinesKind {
    /// `M`
    Silty,
    /// `C`
    Clayey,
}

impl FinesKind {
    fn noun(&self) -> &'static str {
        match self {
            FinesKind::Silty => "silt",
            FinesKind::Clayey => "clay",
        }
    }
}

/// Single or dual SUCS symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SucsSymbol {
    /// First (or only) symbol.
    pub primary: GroupSymbol,
    /// Fines symbol of a dual classification.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub secondary: Option<GroupSymbol>,
}

impl SucsSymbol {
    /// A single symbol.
    pub fn single(primary: GroupSymbol) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// A dual symbol such as `SW-SM`.
    pub fn dual(primary: GroupSymbol, secondary: GroupSymbol) -> Self {
        Self {
            primary,
            secondary: Some(secondary),
        }
    }

    /// Whether this is a dual symbol.
    pub fn is_dual(&self) -> bool {
        self.secondary.is_some()
    }
}

impl fmt::Display for SucsSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.secondary {
            Some(secondary) => write!(f, "{}-{}", self.primary, secondary),
            None => write!(f, "{}", self.primary),
        }
    }
}

/// Quantities the SUCS decision tree reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SucsInput {
    /// Percent passing No. 200 (0.075 mm).
    pub p200: f64,
    /// Percent passing No. 4 (4.75 mm).
    pub p4: f64,
    /// Liquid limit.
    pub ll: f64,
    /// Plasticity index clamped to zero.
    pub ip_eff: f64,
    /// Coefficient of uniformity.
    pub cu: Option<f64>,
    /// Coefficient of curvature.
    pub cc: Option<f64>,
}

impl SucsInput {
    /// Percent retained on No. 4.
    pub fn gravel_fraction(&self) -> f64 {
        100.0 - self.p4
    }

    /// Percent between No. 4 and No. 200.
    pub fn sand_fraction(&self) -> f64 {
        self.p4 - self.p200
    }

    /// Plasticity index on the A-line at this liquid limit.
    pub fn a_line(&self) -> f64 {
        0.73 * (self.ll - 20.0)
    }

    /// Coarse prefix from the gravel and sand fractions.
    pub fn prefix(&self) -> CoarsePrefix {
        if self.gravel_fraction() > self.sand_fraction() {
            CoarsePrefix::Gravel
        } else {
            CoarsePrefix::Sand
        }
    }

    fn plots_as_clay(&self) -> bool {
        self.ip_eff > 7.0 && self.ip_eff >= self.a_line()
    }
}

/// Inputs of the gradation rule once Cu and Cc are known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradingInput {
    /// Gravel or sand prefix.
    pub prefix: CoarsePrefix,
    /// Coefficient of uniformity.
    pub cu: f64,
    /// Coefficient of curvature.
    pub cc: f64,
}

/// Outcome of the SUCS classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SucsOutcome {
    /// A symbol was assigned.
    Classified {
        symbol: SucsSymbol,
        /// Labels of the rules that produced the symbol.
        rules: Vec<String>,
    },
    /// A clean or borderline coarse soil whose Cu/Cc are unavailable.
    InsufficientData { prefix: CoarsePrefix },
}

impl SucsOutcome {
    /// Symbol, when one was assigned.
    pub fn symbol(&self) -> Option<&SucsSymbol> {
        match self {
            SucsOutcome::Classified { symbol, .. } => Some(symbol),
            SucsOutcome::InsufficientData { .. } => None,
        }
    }

    /// Canonical code: the symbol or the insufficient-data marker.
    pub fn code(&self) -> String {
        match self {
            SucsOutcome::Classified { symbol, .. } => symbol.to_string(),
            SucsOutcome::InsufficientData { .. } => INSUFFICIENT_DATA.to_string(),
        }
    }

    /// Human-readable explanation, separate from the code.
    pub fn explanation(&self) -> String {
        match self {
            SucsOutcome::Classified { symbol, .. } => match symbol.secondary {
                Some(fines) => {
                    let kind = match fines {
                        GroupSymbol::GC | GroupSymbol::SC => FinesKind::Clayey,
                        _ => FinesKind::Silty,
                    };
                    format!("{}: {} with {}", symbol, symbol.primary.name(), kind.noun())
                }
                None => format!("{}: {}", symbol, symbol.primary.name()),
            },
            SucsOutcome::InsufficientData { prefix } => {
                let soil = match prefix {
                    CoarsePrefix::Gravel => "gravel",
                    CoarsePrefix::Sand => "sand",
                };
                format!(
                    "Coarse {} needs Cu and Cc to decide between well and poorly graded; the curve does not cover D10/D30/D60",
                    soil
                )
            }
        }
    }
}

impl fmt::Display for SucsOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

static FINE_TABLE: Lazy<DecisionTable<SucsInput, GroupSymbol>> = Lazy::new(|| {
    DecisionTable::new(
        "sucs_fine",
        vec![
            Rule::new(
                "CL: ll < 50, ip > 7, ip >= A-line",
                |i: &SucsInput| i.ll < 50.0 && i.plots_as_clay(),
                GroupSymbol::CL,
            ),
            Rule::new(
                "ML: ll < 50, ip < 4 or below A-line",
                |i: &SucsInput| i.ll < 50.0 && (i.ip_eff < 4.0 || i.ip_eff < i.a_line()),
                GroupSymbol::ML,
            ),
            Rule::new("CL-ML: ll < 50, 4 <= ip <= 7", |i: &SucsInput| i.ll < 50.0, GroupSymbol::ClMl),
            Rule::new(
                "CH: ll >= 50, ip >= A-line",
                |i: &SucsInput| i.ip_eff >= i.a_line(),
                GroupSymbol::CH,
            ),
            Rule::new("MH: ll >= 50, below A-line", |_: &SucsInput| true, GroupSymbol::MH),
        ],
    )
});

static FINES_TABLE: Lazy<DecisionTable<SucsInput, FinesKind>> = Lazy::new(|| {
    DecisionTable::new(
        "sucs_coarse_fines",
        vec![
            Rule::new("C: ip > 7, ip >= A-line", |i: &SucsInput| i.plots_as_clay(), FinesKind::Clayey),
            Rule::new("M: otherwise", |_: &SucsInput| true, FinesKind::Silty),
        ],
    )
});

static GRADING_TABLE: Lazy<DecisionTable<GradingInput, Grading>> = Lazy::new(|| {
    DecisionTable::new(
        "sucs_grading",
        vec![
            Rule::new(
                "W: gravel, cu >= 4, 1 <= cc <= 3",
                |i: &GradingInput| {
                    i.prefix == CoarsePrefix::Gravel && i.cu >= 4.0 && (1.0..=3.0).contains(&i.cc)
                },
                Grading::Well,
            ),
            Rule::new(
                "W: sand, cu >= 6, 1 <= cc <= 3",
                |i: &GradingInput| {
                    i.prefix == CoarsePrefix::Sand && i.cu >= 6.0 && (1.0..=3.0).contains(&i.cc)
                },
                Grading::Well,
            ),
            Rule::new("P: otherwise", |_: &GradingInput| true, Grading::Poor),
        ],
    )
});

/// SUCS classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct SucsClassifier;

impl SucsClassifier {
    /// Create a classifier.
    pub fn new() -> Self {
        Self
    }

    /// Decision table for fine soils.
    pub fn fine_table(&self) -> &'static DecisionTable<SucsInput, GroupSymbol> {
        &FINE_TABLE
    }

    /// Decision table for the fines symbol of coarse soils.
    pub fn fines_table(&self) -> &'static DecisionTable<SucsInput, FinesKind> {
        &FINES_TABLE
    }

    /// Decision table for the gradation symbol of coarse soils.
    pub fn grading_table(&self) -> &'static DecisionTable<GradingInput, Grading> {
        &GRADING_TABLE
    }

    /// Classify.
    pub fn classify(&self, input: &SucsInput) -> SucsOutcome {
        if input.p200 >= 50.0 {
            let (symbol, label) = first(self.fine_table(), input, GroupSymbol::MH);
            return SucsOutcome::Classified {
                symbol: SucsSymbol::single(symbol),
                rules: vec![label.to_string()],
            };
        }

        let prefix = input.prefix();

        if input.p200 > 12.0 {
            let (fines, label) = first(self.fines_table(), input, FinesKind::Silty);
            return SucsOutcome::Classified {
                symbol: SucsSymbol::single(GroupSymbol::with_fines(prefix, fines)),
                rules: vec![label.to_string()],
            };
        }

        let (Some(cu), Some(cc)) = (input.cu, input.cc) else {
            return SucsOutcome::InsufficientData { prefix };
        };
        let grading_input = GradingInput { prefix, cu, cc };
        let (grading, grading_label) = first(self.grading_table(), &grading_input, Grading::Poor);
        let graded = GroupSymbol::graded(prefix, grading);

        if input.p200 < 5.0 {
            return SucsOutcome::Classified {
                symbol: SucsSymbol::single(graded),
                rules: vec![grading_label.to_string()],
            };
        }

        let (fines, fines_label) = first(self.fines_table(), input, FinesKind::Silty);
        SucsOutcome::Classified {
            symbol: SucsSymbol::dual(graded, GroupSymbol::with_fines(prefix, fines)),
            rules: vec![grading_label.to_string(), fines_label.to_string()],
        }
    }
}

/// First-match outcome and label; every table ends in a catch-all rule.
fn first<I, O: Copy>(table: &DecisionTable<I, O>, input: &I, fallback: O) -> (O, &'static str) {
    table
        .first_match(input)
        .map(|rule| (rule.then, rule.label))
        .unwrap_or((fallback, "fallback"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fine(ll: f64, ip: f64) -> SucsInput {
        SucsInput {
            p200: 60.0,
            p4: 100.0,
            ll,
            ip_eff: ip,
            cu: None,
            cc: None,
        }
    }

    fn coarse(p200: f64, p4: f64, ll: f64, ip: f64, cu: Option<f64>, cc: Option<f64>) -> SucsInput {
        SucsInput {
            p200,
            p4,
            ll,
            ip_eff: ip,
            cu,
            cc,
        }
    }

    fn code(input: SucsInput) -> String {
        SucsClassifier::new().classify(&input).code()
    }

    #[test]
    fn test_fine_soils() {
        assert_eq!(code(fine(35.0, 15.0)), "CL");
        assert_eq!(code(fine(35.0, 2.0)), "ML");
        assert_eq!(code(fine(25.0, 5.0)), "CL-ML");
        assert_eq!(code(fine(60.0, 35.0)), "CH");
        assert_eq!(code(fine(60.0, 20.0)), "MH");
    }

    #[test]
    fn test_a_line_boundary_uses_greater_or_equal() {
        // A-line at ll = 42 is 16.06; ip 16 falls below it.
        assert_eq!(code(fine(42.0, 16.0)), "ML");
        assert_eq!(code(fine(42.0, 16.06)), "CL");
        // A-line at ll = 70 is 36.5.
        assert_eq!(code(fine(70.0, 36.49)), "MH");
        assert_eq!(code(fine(70.0, 36.5)), "CH");
    }

    #[test]
    fn test_ll_fifty_is_high_plasticity() {
        assert_eq!(code(fine(50.0, 10.0)), "MH");
        assert_eq!(code(fine(49.9, 25.0)), "CL");
    }

    #[test]
    fn test_clean_coarse_soils() {
        assert_eq!(code(coarse(3.0, 30.0, 0.0, 0.0, Some(5.0), Some(2.0))), "GW");
        assert_eq!(code(coarse(3.0, 30.0, 0.0, 0.0, Some(3.0), Some(2.0))), "GP");
        assert_eq!(code(coarse(3.0, 90.0, 0.0, 0.0, Some(7.0), Some(1.0))), "SW");
        assert_eq!(code(coarse(3.0, 90.0, 0.0, 0.0, Some(5.0), Some(1.5))), "SP");
        assert_eq!(code(coarse(3.0, 90.0, 0.0, 0.0, Some(8.0), Some(3.5))), "SP");
    }

    #[test]
    fn test_clean_coarse_without_coefficients() {
        let outcome = SucsClassifier::new().classify(&coarse(3.0, 90.0, 0.0, 0.0, Some(8.0), None));
        assert_eq!(
            outcome,
            SucsOutcome::InsufficientData {
                prefix: CoarsePrefix::Sand
            }
        );
        assert_eq!(outcome.code(), INSUFFICIENT_DATA);
    }

    #[test]
    fn test_coarse_with_fines() {
        assert_eq!(code(coarse(20.0, 80.0, 35.0, 15.0, None, None)), "SC");
        assert_eq!(code(coarse(20.0, 80.0, 35.0, 5.0, None, None)), "SM");
        assert_eq!(code(coarse(20.0, 40.0, 35.0, 15.0, None, None)), "GC");
        assert_eq!(code(coarse(20.0, 40.0, 60.0, 15.0, None, None)), "GM");
    }

    #[test]
    fn test_borderline_fines_give_dual_symbol() {
        assert_eq!(code(coarse(8.0, 80.0, 30.0, 3.0, Some(7.0), Some(2.0))), "SW-SM");
        assert_eq!(code(coarse(8.0, 80.0, 35.0, 15.0, Some(2.0), Some(2.0))), "SP-SC");
        assert_eq!(code(coarse(12.0, 30.0, 35.0, 15.0, Some(5.0), Some(1.2))), "GW-GC");
        assert_eq!(code(coarse(5.0, 30.0, 35.0, 2.0, Some(2.0), Some(0.5))), "GP-GM");
    }

    #[test]
    fn test_never_emits_bare_c_m() {
        for ip in [0.0, 5.0, 10.0, 20.0] {
            for p200 in [5.0, 8.0, 12.0] {
                let c = code(coarse(p200, 70.0, 40.0, ip, Some(6.0), Some(2.0)));
                assert_ne!(c, "C-M");
                assert!(c.contains('-'), "expected dual symbol, got {}", c);
            }
        }
    }

    #[test]
    fn test_borderline_without_coefficients() {
        let outcome = SucsClassifier::new().classify(&coarse(8.0, 80.0, 30.0, 3.0, None, None));
        assert!(matches!(outcome, SucsOutcome::InsufficientData { .. }));
    }

    #[test]
    fn test_equal_fractions_give_sand() {
        // gravel = 40, sand = 40
        let input = coarse(20.0, 60.0, 0.0, 0.0, None, None);
        assert_eq!(input.prefix(), CoarsePrefix::Sand);
    }

    #[test]
    fn test_explanations() {
        let outcome = SucsClassifier::new().classify(&coarse(8.0, 80.0, 30.0, 3.0, Some(7.0), Some(2.0)));
        assert_eq!(outcome.explanation(), "SW-SM: Well-graded sand with silt");
        let outcome = SucsClassifier::new().classify(&fine(60.0, 35.0));
        assert_eq!(outcome.explanation(), "CH: Fat clay");
    }
}
