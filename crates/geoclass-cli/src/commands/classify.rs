//! Classify command - import readings and run the full analysis.

use std::path::PathBuf;

use colored::Colorize;
use geoclass::{Analyzer, AtterbergLimits, EngineConfig, MctCoefficients};
use log::debug;

use crate::cli::MctArgs;

use super::report;

/// Arguments of the classify command.
pub struct ClassifyArgs {
    pub file: PathBuf,
    pub total_mass: f64,
    pub ll: f64,
    pub lp: f64,
    pub mct: MctArgs,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub output: Option<PathBuf>,
}

pub fn run(args: ClassifyArgs, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !args.file.exists() {
        return Err(format!("File not found: {}", args.file.display()).into());
    }

    let mut config = match &args.config {
        Some(path) => {
            debug!("loading config from {}", path.display());
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };
    if let Some(threshold) = args.mct.d_threshold {
        config = config.with_d_prime_threshold(threshold);
        config.validate()?;
    }

    let limits = AtterbergLimits::new(args.ll, args.lp)?;
    let mct = coefficients(&args.mct);

    let result = Analyzer::with_config(config).analyze_file(&args.file, args.total_mass, limits, mct)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::print_result(&result, verbose);
    }

    if let Some(output) = &args.output {
        result.save(output)?;
        // Keep stdout clean for JSON consumers.
        eprintln!(
            "{} {}",
            "Saved to".green(),
            output.display().to_string().white()
        );
    }

    Ok(())
}

/// Build MCT coefficients from the flags. A missing coefficient counts as
/// zero so that a half-filled test reports as awaiting data.
fn coefficients(args: &MctArgs) -> Option<MctCoefficients> {
    if args.c_prime.is_none() && args.d_prime.is_none() {
        return None;
    }

    let coefficients = MctCoefficients::new(args.c_prime.unwrap_or(0.0), args.d_prime.unwrap_or(0.0));
    Some(match args.immersion_loss {
        Some(loss) => coefficients.with_immersion_loss(loss),
        None => coefficients,
    })
}
