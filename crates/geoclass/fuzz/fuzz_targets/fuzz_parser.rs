//! Fuzz target for the readings parser and the analysis pipeline.
//!
//! This fuzzer tests that:
//! 1. The parser never panics on malformed input
//! 2. Any table the parser accepts either analyzes or fails with an error
//! 3. Percent passing always stays in [0, 100]

#![no_main]

use geoclass::{Analyzer, AtterbergLimits, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let Ok(table) = Parser::new().parse_bytes(data) else {
        return;
    };

    let total = table.retained_total().max(1.0);
    let input = geoclass::AnalysisInput {
        readings: table.readings,
        total_dry_mass_g: total,
        limits: AtterbergLimits::new(30.0, 20.0).unwrap(),
        mct: None,
    };

    if let Ok(result) = Analyzer::new().analyze(&input) {
        for point in result.curve.points() {
            assert!((0.0..=100.0).contains(&point.percent_passing));
        }
    }
});
