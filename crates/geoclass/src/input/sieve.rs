//! Standard sieve series (ASTM E11 / NBR NM ISO 3310-1).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::{GeoclassError, Result};

/// Relative tolerance when matching a measured aperture to a standard sieve.
const APERTURE_MATCH_TOLERANCE: f64 = 0.02;

/// A sieve of the standard series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardSieve {
    /// Usual designation, e.g. `#200` or `3/8"`.
    pub designation: &'static str,
    /// Nominal aperture in millimetres.
    pub aperture_mm: f64,
    /// Mesh number for the fine series.
    pub number: Option<u32>,
    /// Nominal size in inches for the coarse series.
    pub inches: Option<f64>,
}

const fn inch(designation: &'static str, inches: f64, aperture_mm: f64) -> StandardSieve {
    StandardSieve {
        designation,
        aperture_mm,
        number: None,
        inches: Some(inches),
    }
}

const fn mesh(designation: &'static str, number: u32, aperture_mm: f64) -> StandardSieve {
    StandardSieve {
        designation,
        aperture_mm,
        number: Some(number),
        inches: None,
    }
}

/// Standard sieves, coarsest first.
pub const STANDARD_SIEVES: &[StandardSieve] = &[
    inch("3\"", 3.0, 75.0),
    inch("2\"", 2.0, 50.0),
    inch("1.1/2\"", 1.5, 37.5),
    inch("1\"", 1.0, 25.0),
    inch("3/4\"", 0.75, 19.0),
    inch("1/2\"", 0.5, 12.5),
    inch("3/8\"", 0.375, 9.5),
    mesh("#4", 4, 4.75),
    mesh("#8", 8, 2.36),
    mesh("#10", 10, 2.0),
    mesh("#16", 16, 1.18),
    mesh("#30", 30, 0.6),
    mesh("#40", 40, 0.425),
    mesh("#50", 50, 0.3),
    mesh("#60", 60, 0.25),
    mesh("#100", 100, 0.15),
    mesh("#200", 200, 0.075),
];

// "#200", "No. 200", "nº 200", "N200", "200"
static MESH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:#|no\.?|n[º°o]?\.?)?\s*(\d+)$"#).unwrap());

// "3/8\"", "1.1/2\"", "1 1/2in", "2 pol", "3''"
static INCH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:(\d+)[.\s-])?(\d+)(?:/(\d+))?\s*(?:"|''|in\.?|inch(?:es)?|pol\.?)$"#).unwrap()
});

/// Look up a sieve by designation.
pub fn find_by_designation(designation: &str) -> Option<&'static StandardSieve> {
    let normalized = designation.trim().to_lowercase();

    if let Some(caps) = MESH_PATTERN.captures(&normalized) {
        let number: u32 = caps[1].parse().ok()?;
        return STANDARD_SIEVES.iter().find(|s| s.number == Some(number));
    }

    let caps = INCH_PATTERN.captures(&normalized)?;
    let whole: f64 = match caps.get(1) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };
    let numerator: f64 = caps[2].parse().ok()?;
    let inches = match caps.get(3) {
        Some(denominator) => {
            let denominator: f64 = denominator.as_str().parse().ok()?;
            if denominator == 0.0 {
                return None;
            }
            whole + numerator / denominator
        }
        None if caps.get(1).is_none() => numerator,
        None => return None,
    };

    STANDARD_SIEVES
        .iter()
        .find(|s| s.inches.is_some_and(|i| (i - inches).abs() < 1e-9))
}

/// Look up the standard sieve closest to a measured aperture, within 2%.
///
/// Matches common rounded values such as 0.42 mm for No. 40 or 50.8 mm for 2".
pub fn find_by_aperture(aperture_mm: f64) -> Option<&'static StandardSieve> {
    STANDARD_SIEVES
        .iter()
        .filter(|s| ((s.aperture_mm - aperture_mm) / s.aperture_mm).abs() <= APERTURE_MATCH_TOLERANCE)
        .min_by(|a, b| {
            (a.aperture_mm - aperture_mm)
                .abs()
                .total_cmp(&(b.aperture_mm - aperture_mm).abs())
        })
}

/// Resolve a cell holding either a numeric aperture or a sieve designation.
pub fn resolve_aperture(cell: &str) -> Result<f64> {
    if let Some(value) = parse_number(cell) {
        return Ok(value);
    }
    find_by_designation(cell)
        .map(|s| s.aperture_mm)
        .ok_or_else(|| GeoclassError::UnknownSieve(cell.trim().to_string()))
}

/// Parse a number, accepting a decimal comma.
pub fn parse_number(cell: &str) -> Option<f64> {
    let trimmed = cell.trim();
    let value = if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".").parse::<f64>().ok()?
    } else {
        trimmed.parse::<f64>().ok()?
    };
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_designations() {
        assert_eq!(find_by_designation("#200").unwrap().aperture_mm, 0.075);
        assert_eq!(find_by_designation("No. 4").unwrap().aperture_mm, 4.75);
        assert_eq!(find_by_designation("nº 40").unwrap().aperture_mm, 0.425);
        assert_eq!(find_by_designation(" #10 ").unwrap().aperture_mm, 2.0);
        assert!(find_by_designation("#7").is_none());
    }

    #[test]
    fn test_inch_designations() {
        assert_eq!(find_by_designation("3/8\"").unwrap().aperture_mm, 9.5);
        assert_eq!(find_by_designation("1.1/2\"").unwrap().aperture_mm, 37.5);
        assert_eq!(find_by_designation("1 1/2 in").unwrap().aperture_mm, 37.5);
        assert_eq!(find_by_designation("3\"").unwrap().aperture_mm, 75.0);
        assert_eq!(find_by_designation("2 pol").unwrap().aperture_mm, 50.0);
        assert!(find_by_designation("5/8\"").is_none());
    }

    #[test]
    fn test_find_by_aperture_tolerates_rounding() {
        assert_eq!(find_by_aperture(0.42).unwrap().designation, "#40");
        assert_eq!(find_by_aperture(50.8).unwrap().designation, "2\"");
        assert_eq!(find_by_aperture(25.4).unwrap().designation, "1\"");
        assert!(find_by_aperture(7.0).is_none());
    }

    #[test]
    fn test_resolve_aperture() {
        assert_eq!(resolve_aperture("0,075").unwrap(), 0.075);
        assert_eq!(resolve_aperture("4.75").unwrap(), 4.75);
        assert_eq!(resolve_aperture("#200").unwrap(), 0.075);
        assert!(matches!(
            resolve_aperture("pan"),
            Err(GeoclassError::UnknownSieve(_))
        ));
    }

    #[test]
    fn test_series_is_sorted_coarsest_first() {
        assert!(STANDARD_SIEVES.windows(2).all(|w| w[0].aperture_mm > w[1].aperture_mm));
    }
}
