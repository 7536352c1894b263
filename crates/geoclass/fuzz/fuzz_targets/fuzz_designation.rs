//! Fuzz target for sieve designation lookup.
//!
//! Resolution must never panic, and a resolved aperture must be a positive
//! finite number or come from the standard series.

#![no_main]

use geoclass::input::{STANDARD_SIEVES, find_by_designation, resolve_aperture};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    if let Some(sieve) = find_by_designation(text) {
        assert!(STANDARD_SIEVES.iter().any(|s| s.designation == sieve.designation));
    }

    if let Ok(aperture) = resolve_aperture(text) {
        assert!(aperture.is_finite());
    }
});
