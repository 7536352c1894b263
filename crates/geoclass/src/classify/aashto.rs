//! AASHTO M 145 classification and Group Index.

use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use super::rules::{DecisionTable, Rule};

/// AASHTO soil groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AashtoGroup {
    #[serde(rename = "A-1-a")]
    A1a,
    #[serde(rename = "A-1-b")]
    A1b,
    #[serde(rename = "A-3")]
    A3,
    #[serde(rename = "A-2-4")]
    A24,
    #[serde(rename = "A-2-5")]
    A25,
    #[serde(rename = "A-2-6")]
    A26,
    #[serde(rename = "A-2-7")]
    A27,
    #[serde(rename = "A-4")]
    A4,
    #[serde(rename = "A-5")]
    A5,
    #[serde(rename = "A-6")]
    A6,
    #[serde(rename = "A-7-5")]
    A75,
    #[serde(rename = "A-7-6")]
    A76,
}

/// How the Group Index is computed for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupIndexTerms {
    /// Always zero.
    None,
    /// Plasticity term only.
    PlasticityOnly,
    /// Liquid-limit term plus plasticity term.
    Full,
}

impl AashtoGroup {
    /// Normative group code.
    pub fn code(&self) -> &'static str {
        match self {
            AashtoGroup::A1a => "A-1-a",
            AashtoGroup::A1b => "A-1-b",
            AashtoGroup::A3 => "A-3",
            AashtoGroup::A24 => "A-2-4",
            AashtoGroup::A25 => "A-2-5",
            AashtoGroup::A26 => "A-2-6",
            AashtoGroup::A27 => "A-2-7",
            AashtoGroup::A4 => "A-4",
            AashtoGroup::A5 => "A-5",
            AashtoGroup::A6 => "A-6",
            AashtoGroup::A75 => "A-7-5",
            AashtoGroup::A76 => "A-7-6",
        }
    }

    /// Typical significant constituent materials.
    pub fn description(&self) -> &'static str {
        match self {
            AashtoGroup::A1a | AashtoGroup::A1b => "Stone fragments, gravel and sand",
            AashtoGroup::A3 => "Fine sand",
            AashtoGroup::A24 | AashtoGroup::A25 | AashtoGroup::A26 | AashtoGroup::A27 => {
                "Silty or clayey gravel and sand"
            }
            AashtoGroup::A4 | AashtoGroup::A5 => "Silty soils",
            AashtoGroup::A6 | AashtoGroup::A75 | AashtoGroup::A76 => "Clayey soils",
        }
    }

    /// General rating as subgrade.
    pub fn subgrade_rating(&self) -> &'static str {
        if self.is_granular() {
            "Excellent to good"
        } else {
            "Fair to poor"
        }
    }

    /// Whether the group belongs to the granular materials (35% or less passing No. 200).
    pub fn is_granular(&self) -> bool {
        matches!(
            self,
            AashtoGroup::A1a
                | AashtoGroup::A1b
                | AashtoGroup::A3
                | AashtoGroup::A24
                | AashtoGroup::A25
                | AashtoGroup::A26
                | AashtoGroup::A27
        )
    }

    /// Group Index terms applicable to the group.
    pub fn group_index_terms(&self) -> GroupIndexTerms {
        match self {
            AashtoGroup::A1a
            | AashtoGroup::A1b
            | AashtoGroup::A3
            | AashtoGroup::A24
            | AashtoGroup::A25 => GroupIndexTerms::None,
            AashtoGroup::A26 | AashtoGroup::A27 => GroupIndexTerms::PlasticityOnly,
            _ => GroupIndexTerms::Full,
        }
    }
}

impl fmt::Display for AashtoGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Quantities the AASHTO decision tree reads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AashtoInput {
    /// Percent passing No. 10 (2.0 mm).
    pub p10: f64,
    /// Percent passing No. 40 (0.42 mm).
    pub p40: f64,
    /// Percent passing No. 200 (0.075 mm).
    pub p200: f64,
    /// Liquid limit.
    pub ll: f64,
    /// Plasticity index clamped to zero.
    pub ip_eff: f64,
}

/// Result of the AASHTO classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AashtoClassification {
    /// Soil group.
    pub group: AashtoGroup,
    /// Group Index, a non-negative integer.
    pub group_index: u32,
    /// Label of the decision-table rule that matched.
    pub rule: String,
}

impl AashtoClassification {
    /// Human-readable explanation, separate from the normative code.
    pub fn explanation(&self) -> String {
        format!(
            "{}: {}; general subgrade rating {}",
            self.group,
            self.group.description(),
            self.group.subgrade_rating().to_lowercase()
        )
    }
}

impl fmt::Display for AashtoClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.group, self.group_index)
    }
}

static AASHTO_TABLE: Lazy<DecisionTable<AashtoInput, AashtoGroup>> = Lazy::new(|| {
    DecisionTable::new(
        "aashto_m145",
        vec![
            Rule::new(
                "A-1-a: p200 <= 35, p10 <= 50, p40 <= 30, p200 <= 15, ip <= 6",
                |i: &AashtoInput| {
                    i.p200 <= 35.0 && i.p10 <= 50.0 && i.p40 <= 30.0 && i.p200 <= 15.0 && i.ip_eff <= 6.0
                },
                AashtoGroup::A1a,
            ),
            Rule::new(
                "A-1-b: p200 <= 35, p40 <= 50, p200 <= 25, ip <= 6",
                |i: &AashtoInput| i.p200 <= 35.0 && i.p40 <= 50.0 && i.p200 <= 25.0 && i.ip_eff <= 6.0,
                AashtoGroup::A1b,
            ),
            Rule::new(
                "A-3: p200 <= 35, p40 >= 51, p200 <= 10, non-plastic",
                |i: &AashtoInput| i.p200 <= 35.0 && i.p40 >= 51.0 && i.p200 <= 10.0 && i.ip_eff == 0.0,
                AashtoGroup::A3,
            ),
            Rule::new(
                "A-2-4: p200 <= 35, ll <= 40, ip <= 10",
                |i: &AashtoInput| i.p200 <= 35.0 && i.ll <= 40.0 && i.ip_eff <= 10.0,
                AashtoGroup::A24,
            ),
            Rule::new(
                "A-2-6: p200 <= 35, ll <= 40, ip > 10",
                |i: &AashtoInput| i.p200 <= 35.0 && i.ll <= 40.0,
                AashtoGroup::A26,
            ),
            Rule::new(
                "A-2-5: p200 <= 35, ll > 40, ip <= 10",
                |i: &AashtoInput| i.p200 <= 35.0 && i.ip_eff <= 10.0,
                AashtoGroup::A25,
            ),
            Rule::new(
                "A-2-7: p200 <= 35, ll > 40, ip > 10",
                |i: &AashtoInput| i.p200 <= 35.0,
                AashtoGroup::A27,
            ),
            Rule::new(
                "A-4: p200 > 35, ll <= 40, ip <= 10",
                |i: &AashtoInput| i.ll <= 40.0 && i.ip_eff <= 10.0,
                AashtoGroup::A4,
            ),
            Rule::new(
                "A-6: p200 > 35, ll <= 40, ip > 10",
                |i: &AashtoInput| i.ll <= 40.0,
                AashtoGroup::A6,
            ),
            Rule::new(
                "A-5: p200 > 35, ll > 40, ip <= 10",
                |i: &AashtoInput| i.ip_eff <= 10.0,
                AashtoGroup::A5,
            ),
            Rule::new(
                "A-7-5: p200 > 35, ll > 40, ip > 10, ip <= ll - 30",
                |i: &AashtoInput| i.ip_eff <= i.ll - 30.0,
                AashtoGroup::A75,
            ),
            Rule::new(
                "A-7-6: p200 > 35, ll > 40, ip > ll - 30",
                |_: &AashtoInput| true,
                AashtoGroup::A76,
            ),
        ],
    )
});

/// AASHTO M 145 classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct AashtoClassifier;

impl AashtoClassifier {
    /// Create a classifier.
    pub fn new() -> Self {
        Self
    }

    /// The decision table, in evaluation order.
    pub fn table(&self) -> &'static DecisionTable<AashtoInput, AashtoGroup> {
        &AASHTO_TABLE
    }

    /// Classify and compute the Group Index.
    pub fn classify(&self, input: &AashtoInput) -> AashtoClassification {
        // The last rule always holds.
        let (group, rule) = match self.table().first_match(input) {
            Some(rule) => (rule.then, rule.label),
            None => (AashtoGroup::A76, "A-7-6"),
        };

        AashtoClassification {
            group,
            group_index: group_index(group, input),
            rule: rule.to_string(),
        }
    }
}

/// Group Index for `group`, rounded to the nearest integer and never negative.
///
/// `t1 = (p200 - 35)(0.2 + 0.005(ll - 40))` and
/// `t2 = 0.01(p200 - 15)(ip - 10)`, each floored at zero.
pub fn group_index(group: AashtoGroup, input: &AashtoInput) -> u32 {
    let t1 = ((input.p200 - 35.0) * (0.2 + 0.005 * (input.ll - 40.0))).max(0.0);
    let t2 = (0.01 * (input.p200 - 15.0) * (input.ip_eff - 10.0)).max(0.0);

    let raw = match group.group_index_terms() {
        GroupIndexTerms::None => 0.0,
        GroupIndexTerms::PlasticityOnly => t2,
        GroupIndexTerms::Full => t1 + t2,
    };
    raw.max(0.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(p10: f64, p40: f64, p200: f64, ll: f64, ip_eff: f64) -> AashtoInput {
        AashtoInput {
            p10,
            p40,
            p200,
            ll,
            ip_eff,
        }
    }

    fn group_of(i: AashtoInput) -> AashtoGroup {
        AashtoClassifier::new().classify(&i).group
    }

    #[test]
    fn test_granular_groups() {
        assert_eq!(group_of(input(40.0, 20.0, 10.0, 0.0, 0.0)), AashtoGroup::A1a);
        assert_eq!(group_of(input(80.0, 45.0, 20.0, 25.0, 5.0)), AashtoGroup::A1b);
        assert_eq!(group_of(input(100.0, 80.0, 8.0, 0.0, 0.0)), AashtoGroup::A3);
        assert_eq!(group_of(input(90.0, 60.0, 30.0, 35.0, 8.0)), AashtoGroup::A24);
        assert_eq!(group_of(input(90.0, 60.0, 30.0, 45.0, 8.0)), AashtoGroup::A25);
        assert_eq!(group_of(input(90.0, 60.0, 30.0, 35.0, 15.0)), AashtoGroup::A26);
        assert_eq!(group_of(input(90.0, 60.0, 30.0, 50.0, 15.0)), AashtoGroup::A27);
    }

    #[test]
    fn test_a3_requires_non_plastic() {
        assert_eq!(group_of(input(100.0, 80.0, 8.0, 20.0, 0.5)), AashtoGroup::A24);
        assert_eq!(group_of(input(100.0, 80.0, 8.0, 20.0, 0.0)), AashtoGroup::A3);
    }

    #[test]
    fn test_silt_clay_groups() {
        assert_eq!(group_of(input(100.0, 90.0, 60.0, 35.0, 8.0)), AashtoGroup::A4);
        assert_eq!(group_of(input(100.0, 90.0, 60.0, 35.0, 15.0)), AashtoGroup::A6);
        assert_eq!(group_of(input(100.0, 90.0, 60.0, 45.0, 8.0)), AashtoGroup::A5);
        assert_eq!(group_of(input(100.0, 90.0, 60.0, 60.0, 25.0)), AashtoGroup::A75);
        assert_eq!(group_of(input(100.0, 90.0, 60.0, 60.0, 35.0)), AashtoGroup::A76);
    }

    #[test]
    fn test_boundaries() {
        // p200 exactly 35 stays granular.
        assert!(group_of(input(90.0, 60.0, 35.0, 30.0, 5.0)).is_granular());
        assert!(!group_of(input(90.0, 60.0, 35.01, 30.0, 5.0)).is_granular());
        // ll exactly 40 belongs to the lower branch.
        assert_eq!(group_of(input(100.0, 90.0, 60.0, 40.0, 10.0)), AashtoGroup::A4);
        // ip exactly ll - 30 is A-7-5.
        assert_eq!(group_of(input(100.0, 90.0, 60.0, 50.0, 20.0)), AashtoGroup::A75);
    }

    #[test]
    fn test_group_index_zero_groups() {
        for i in [
            input(40.0, 20.0, 10.0, 0.0, 0.0),
            input(100.0, 80.0, 8.0, 0.0, 0.0),
            input(90.0, 60.0, 30.0, 35.0, 8.0),
            input(90.0, 60.0, 30.0, 45.0, 8.0),
        ] {
            assert_eq!(AashtoClassifier::new().classify(&i).group_index, 0);
        }
    }

    #[test]
    fn test_group_index_partial_for_a26() {
        // t2 = 0.01 * (30 - 15) * (25 - 10) = 2.25
        let result = AashtoClassifier::new().classify(&input(90.0, 60.0, 30.0, 35.0, 25.0));
        assert_eq!(result.group, AashtoGroup::A26);
        assert_eq!(result.group_index, 2);
    }

    #[test]
    fn test_group_index_full() {
        // t1 = 25 * (0.2 + 0.005 * 20) = 7.5; t2 = 0.01 * 45 * 15 = 6.75
        let result = AashtoClassifier::new().classify(&input(100.0, 95.0, 60.0, 60.0, 25.0));
        assert_eq!(result.group, AashtoGroup::A75);
        assert_eq!(result.group_index, 14);
        assert_eq!(result.to_string(), "A-7-5 (14)");
    }

    #[test]
    fn test_group_index_never_negative() {
        let result = AashtoClassifier::new().classify(&input(100.0, 90.0, 36.0, 0.0, 0.0));
        assert_eq!(result.group, AashtoGroup::A4);
        assert_eq!(result.group_index, 0);
    }

    #[test]
    fn test_explanation_is_separate_from_code() {
        let result = AashtoClassifier::new().classify(&input(100.0, 80.0, 8.0, 0.0, 0.0));
        assert_eq!(result.group.code(), "A-3");
        assert!(result.explanation().contains("Fine sand"));
        assert!(result.rule.starts_with("A-3"));
    }
}
