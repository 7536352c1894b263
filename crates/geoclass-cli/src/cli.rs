//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Geoclass: soil classification from sieve analysis and Atterberg limits
#[derive(Parser)]
#[command(name = "geoclass")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a soil sample from a readings file
    Classify {
        /// Path to the readings file (CSV/TSV): aperture or sieve, retained mass
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Total dry mass of the sample, in grams
        #[arg(short = 'm', long)]
        total_mass: f64,

        /// Liquid limit, in percent
        #[arg(long)]
        ll: f64,

        /// Plastic limit, in percent
        #[arg(long)]
        lp: f64,

        #[command(flatten)]
        mct: MctArgs,

        /// Engine configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Save the result to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the percent-passing curve and gradation parameters
    Curve {
        /// Path to the readings file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Total dry mass of the sample, in grams
        #[arg(short = 'm', long)]
        total_mass: f64,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the standard sieve series
    Sieves {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a saved analysis result
    Show {
        /// Path to a result file written by `classify --output`
        #[arg(value_name = "RESULT")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Mini-MCV coefficients and calibration.
#[derive(Args, Debug, Clone, Copy)]
pub struct MctArgs {
    /// MCT coefficient c′
    #[arg(long)]
    pub c_prime: Option<f64>,

    /// MCT coefficient d′
    #[arg(long)]
    pub d_prime: Option<f64>,

    /// Immersion mass loss, in percent
    #[arg(long)]
    pub immersion_loss: Option<f64>,

    /// d′ laterization threshold (overrides the config file)
    #[arg(long)]
    pub d_threshold: Option<f64>,
}
