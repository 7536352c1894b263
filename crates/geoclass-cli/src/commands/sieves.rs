//! Sieves command - list the standard sieve series.

use colored::Colorize;
use geoclass::input::STANDARD_SIEVES;

pub fn run(json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(STANDARD_SIEVES)?);
        return Ok(());
    }

    println!("{}", "Standard sieves:".cyan().bold());
    println!("  {:>8}  {:>10}", "sieve", "mm");
    for sieve in STANDARD_SIEVES {
        println!("  {:>8}  {:>10.3}", sieve.designation.white(), sieve.aperture_mm);
    }

    Ok(())
}
