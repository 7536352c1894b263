//! Curve command - print the percent-passing curve of a readings file.

use std::path::PathBuf;

use colored::Colorize;
use geoclass::{CurveBuilder, GradationParameters, Parser};

use super::report;

pub fn run(
    file: PathBuf,
    total_mass: f64,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let (table, source) = Parser::new().parse_file(&file)?;
    let curve = CurveBuilder::new().build(&table.readings, total_mass)?;
    let gradation = GradationParameters::from_curve(&curve);

    if json_output {
        let output = serde_json::json!({
            "file": source.file,
            "curve": curve,
            "gradation": gradation,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Curve for".cyan().bold(),
        source.file.white()
    );
    if verbose {
        println!(
            "  {} readings, {} ({})",
            source.row_count,
            source.format,
            source.hash.dimmed()
        );
    }
    println!();

    report::print_curve(&curve);
    println!();
    report::print_gradation(&gradation);

    Ok(())
}
