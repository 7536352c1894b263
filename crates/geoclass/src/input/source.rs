//! Imported reading tables and their source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::curve::SieveReading;

/// Metadata about an imported readings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of readings imported.
    pub row_count: usize,
    /// When the file was imported.
    pub imported_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for an imported file.
    pub fn new(path: PathBuf, hash: String, size_bytes: u64, format: String, row_count: usize) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            imported_at: Utc::now(),
        }
    }
}

/// Sieve readings read from a table.
#[derive(Debug, Clone)]
pub struct ReadingTable {
    /// Readings in file order.
    pub readings: Vec<SieveReading>,
    /// Sieve designation given for each reading, if the table had one.
    pub designations: Vec<Option<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl ReadingTable {
    /// Number of readings.
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the table holds no readings.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Sum of the retained masses, in grams.
    pub fn retained_total(&self) -> f64 {
        self.readings.iter().map(|r| r.retained_mass_g).sum()
    }
}
