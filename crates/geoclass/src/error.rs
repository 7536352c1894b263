//! Error types for the geoclass library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for geoclass operations.
///
/// Every variant is fatal to the analysis run that produced it. Non-fatal
/// conditions (mass balance, extrapolation, missing data) are reported as
/// [`Notice`](crate::Notice)s on the result instead.
#[derive(Debug, Error)]
pub enum GeoclassError {
    /// No sieve readings were supplied.
    #[error("Empty curve: at least one sieve reading is required")]
    EmptyCurve,

    /// Total dry mass is zero, negative or not a number.
    #[error("Invalid total dry mass: {0} g (must be positive)")]
    InvalidMass(f64),

    /// The same aperture appears more than once in one analysis.
    #[error("Duplicate aperture: {aperture_mm} mm appears more than once")]
    DuplicateAperture { aperture_mm: f64 },

    /// A reading has a non-positive aperture, a negative mass or a non-finite value.
    #[error("Invalid reading at {aperture_mm} mm: {message}")]
    InvalidReading { aperture_mm: f64, message: String },

    /// Atterberg limits are negative or not a number.
    #[error("Invalid Atterberg limits: {0}")]
    InvalidLimits(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cell in an imported table could not be interpreted.
    #[error("Parse error at row {row}, column {column}: {message}")]
    Parse {
        row: usize,
        column: usize,
        message: String,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File format or table layout not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data rows.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Sieve designation not present in the standard series.
    #[error("Unknown sieve designation: '{0}'")]
    UnknownSieve(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure saving or loading a persisted result.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geoclass operations.
pub type Result<T> = std::result::Result<T, GeoclassError>;
