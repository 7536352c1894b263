//! CLI command implementations.

pub mod classify;
pub mod curve;
pub mod sieves;
pub mod show;

mod report;
