//! Save and load analysis results as JSON files.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::analysis::AnalysisResult;
use crate::error::{GeoclassError, Result};

impl AnalysisResult {
    /// Save the result to a pretty-printed JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use geoclass::AnalysisResult;
    /// # fn example(result: &AnalysisResult) -> geoclass::Result<()> {
    /// result.save("sample-17.geoclass.json")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    GeoclassError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            GeoclassError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self).map_err(|e| {
            GeoclassError::Persistence(format!("Failed to serialize analysis result: {}", e))
        })?;

        Ok(())
    }

    /// Load a result saved with [`AnalysisResult::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            GeoclassError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let reader = BufReader::new(file);
        // Curve invariants are checked while deserializing.
        let result: AnalysisResult = serde_json::from_reader(reader).map_err(|e| {
            GeoclassError::Persistence(format!(
                "Failed to parse analysis result '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisInput, Analyzer};
    use crate::classify::{AtterbergLimits, MctCoefficients};
    use crate::curve::SieveReading;
    use tempfile::TempDir;

    fn sample_result() -> AnalysisResult {
        let input = AnalysisInput {
            readings: vec![
                SieveReading::new(4.75, 50.0),
                SieveReading::new(0.42, 300.0),
                SieveReading::new(0.075, 250.0),
            ],
            total_dry_mass_g: 1000.0,
            limits: AtterbergLimits::new(48.0, 27.0).unwrap(),
            mct: Some(MctCoefficients::new(1.2, 30.0)),
        };
        Analyzer::new().analyze(&input).unwrap()
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results").join("sample.json");

        let result = sample_result();
        result.save(&path).unwrap();
        assert!(path.exists());

        let loaded = AnalysisResult::load(&path).unwrap();
        assert_eq!(loaded.classification, result.classification);
        assert_eq!(loaded.notices, result.notices);
        assert_eq!(loaded.curve, result.curve);
        assert_eq!(loaded.summary.notices_by_kind, result.summary.notices_by_kind);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnalysisResult::load("/nonexistent/result.json").unwrap_err();
        assert!(matches!(err, GeoclassError::Persistence(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"curve\": 3}").unwrap();

        let err = AnalysisResult::load(&path).unwrap_err();
        assert!(matches!(err, GeoclassError::Persistence(_)));
    }

    #[test]
    fn test_load_rejects_empty_curve() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");

        let mut value = serde_json::to_value(sample_result()).unwrap();
        value["curve"]["points"] = serde_json::json!([]);
        std::fs::write(&path, value.to_string()).unwrap();

        match AnalysisResult::load(&path) {
            Err(GeoclassError::Persistence(message)) => assert!(message.contains("Empty curve")),
            other => panic!("expected persistence error, got {:?}", other),
        }
    }
}
