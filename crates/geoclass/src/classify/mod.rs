//! Rule-based soil classifiers.
//!
//! The three classifiers are independent: each reads its own inputs and none
//! consumes another's output.

mod aashto;
mod limits;
mod mct;
mod rules;
mod sucs;

pub use aashto::{
    AashtoClassification, AashtoClassifier, AashtoGroup, AashtoInput, GroupIndexTerms, group_index,
};
pub use limits::AtterbergLimits;
pub use mct::{
    DEFAULT_CLAY_C_PRIME, DEFAULT_IMMERSION_LOSS_LIMIT, MANUAL_UNAVAILABLE, MctCalibration, MctClass,
    MctClassifier, MctCoefficients, MctInput, MctOutcome,
};
pub use rules::{DecisionTable, Rule};
pub use sucs::{
    CoarsePrefix, FinesKind, Grading, GradingInput, GroupSymbol, INSUFFICIENT_DATA, SucsClassifier,
    SucsInput, SucsOutcome, SucsSymbol,
};

/// No. 4 sieve aperture, in millimetres.
pub const SIEVE_NO_4_MM: f64 = 4.75;
/// No. 10 sieve aperture, in millimetres.
pub const SIEVE_NO_10_MM: f64 = 2.0;
/// No. 40 sieve aperture, in millimetres.
pub const SIEVE_NO_40_MM: f64 = 0.42;
/// No. 200 sieve aperture, in millimetres.
pub const SIEVE_NO_200_MM: f64 = 0.075;
