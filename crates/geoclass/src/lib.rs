//! Geoclass: soil classification from sieve analysis and Atterberg limits.
//!
//! Geoclass turns laboratory readings into a percent-passing curve and
//! classifies the soil under three systems: AASHTO M 145 (with Group Index),
//! SUCS (ASTM D2487) and MCT (Nogami & Villibor).
//!
//! # Core Principles
//!
//! - **Explicit rules**: every decision tree is an ordered table of
//!   predicates, first match wins, exposed for auditing
//! - **No guessing**: undefined diameters stay undefined and uncalibrated
//!   MCT thresholds are reported instead of assumed
//! - **Non-fatal notices**: only invalid input aborts a run; everything else
//!   is attached to the result
//!
//! # Example
//!
//! ```no_run
//! use geoclass::{AnalysisInput, Analyzer, AtterbergLimits, SieveReading};
//!
//! let input = AnalysisInput {
//!     readings: vec![
//!         SieveReading::new(4.75, 40.0),
//!         SieveReading::new(2.0, 200.0),
//!         SieveReading::new(0.42, 400.0),
//!         SieveReading::new(0.075, 150.0),
//!     ],
//!     total_dry_mass_g: 1000.0,
//!     limits: AtterbergLimits::new(35.0, 20.0).unwrap(),
//!     mct: None,
//! };
//!
//! let result = Analyzer::new().analyze(&input).unwrap();
//! println!("{}", result.classification);
//! println!("Notices: {}", result.notices.len());
//! ```

pub mod classify;
pub mod curve;
pub mod error;
pub mod input;
pub mod validation;

mod analysis;
mod config;
mod persistence;

pub use crate::analysis::{
    AnalysisInput, AnalysisResult, AnalysisSummary, Analyzer, ClassificationResult, Explanations,
    KeySieves, NoticeCounts, SoilFractions,
};
pub use crate::config::EngineConfig;
pub use classify::{AashtoGroup, AtterbergLimits, MctCalibration, MctClass, MctCoefficients};
pub use curve::{CurveBuilder, CurvePoint, GradationParameters, SieveCurve, SieveReading};
pub use error::{GeoclassError, Result};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use validation::{Notice, NoticeKind, Severity};
