//! CSV/TSV readings parser with delimiter and column detection.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use log::debug;
use sha2::{Digest, Sha256};

use crate::curve::SieveReading;
use crate::error::{GeoclassError, Result};

use super::sieve::{find_by_designation, parse_number, resolve_aperture};
use super::source::{ReadingTable, SourceMetadata};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b';', b',', b'|'];

/// Header fragments that identify each column, matched case-insensitively.
const APERTURE_HEADERS: &[&str] = &["aperture", "abertura", "opening", "diameter", "diametro"];
const MASS_HEADERS: &[&str] = &["retained", "retido", "retida", "mass", "peso", "weight"];
const SIEVE_HEADERS: &[&str] = &["sieve", "peneira", "designation"];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row. Without one, column 1 is the
    /// aperture and column 2 the retained mass.
    pub has_header: bool,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            quote: b'"',
        }
    }
}

/// Positions of the columns the engine needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnLayout {
    aperture: Option<usize>,
    sieve: Option<usize>,
    mass: usize,
}

impl ColumnLayout {
    fn positional() -> Self {
        Self {
            aperture: Some(0),
            sieve: None,
            mass: 1,
        }
    }

    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |keys: &[&str], skip: &[Option<usize>]| {
            headers.iter().enumerate().position(|(i, h)| {
                let h = h.to_lowercase();
                !skip.contains(&Some(i)) && keys.iter().any(|k| h.contains(k))
            })
        };

        let aperture = find(APERTURE_HEADERS, &[]);
        let mass = find(MASS_HEADERS, &[aperture]).ok_or_else(|| {
            GeoclassError::UnsupportedFormat(format!(
                "no retained mass column among headers: {}",
                headers.join(", ")
            ))
        })?;
        let sieve = find(SIEVE_HEADERS, &[aperture, Some(mass)]);

        if aperture.is_none() && sieve.is_none() {
            return Err(GeoclassError::UnsupportedFormat(format!(
                "no aperture or sieve column among headers: {}",
                headers.join(", ")
            )));
        }

        Ok(Self { aperture, sieve, mass })
    }
}

/// Parses sieve reading tables.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the readings and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(ReadingTable, SourceMetadata)> {
        let path = path.as_ref();

        let mut file = File::open(path).map_err(|e| GeoclassError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(|e| GeoclassError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let size_bytes = contents.len() as u64;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.parse_bytes(&contents)?;

        let format = match table.delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            "imported {} readings from {} ({})",
            table.len(),
            path.display(),
            format
        );

        let metadata = SourceMetadata::new(path.to_path_buf(), hash, size_bytes, format, table.len());
        Ok((table, metadata))
    }

    /// Parse an in-memory table.
    pub fn parse_str(&self, data: &str) -> Result<ReadingTable> {
        self.parse_bytes(data.as_bytes())
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ReadingTable> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let layout = if self.config.has_header {
            let headers: Vec<String> = reader.headers()?.iter().map(|s| s.trim().to_string()).collect();
            ColumnLayout::from_headers(&headers)?
        } else {
            ColumnLayout::positional()
        };

        let mut readings = Vec::new();
        let mut designations = Vec::new();

        for (row_idx, result) in reader.records().enumerate() {
            let record = result?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            let row = row_idx + 1;
            let cell = |index: usize| record.get(index).map(str::trim).unwrap_or("");

            let designation = layout
                .sieve
                .map(cell)
                .filter(|s| !s.is_empty())
                .map(str::to_string);

            let aperture_mm = match layout.aperture.map(cell).filter(|s| !s.is_empty()) {
                Some(text) => resolve_aperture(text).map_err(|e| parse_error(row, layout.aperture, e))?,
                None => match &designation {
                    Some(text) => find_by_designation(text)
                        .map(|s| s.aperture_mm)
                        .ok_or_else(|| parse_error(row, layout.sieve, GeoclassError::UnknownSieve(text.clone())))?,
                    None => {
                        return Err(GeoclassError::Parse {
                            row,
                            column: layout.aperture.or(layout.sieve).unwrap_or(0) + 1,
                            message: "missing aperture".to_string(),
                        });
                    }
                },
            };

            let mass_text = cell(layout.mass);
            let retained_mass_g = if mass_text.is_empty() {
                0.0
            } else {
                parse_number(mass_text).ok_or_else(|| GeoclassError::Parse {
                    row,
                    column: layout.mass + 1,
                    message: format!("'{}' is not a number", mass_text),
                })?
            };

            readings.push(SieveReading::new(aperture_mm, retained_mass_g));
            designations.push(designation);
        }

        if readings.is_empty() {
            return Err(GeoclassError::EmptyData("No data rows found".to_string()));
        }

        Ok(ReadingTable {
            readings,
            designations,
            delimiter,
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_error(row: usize, column: Option<usize>, source: GeoclassError) -> GeoclassError {
    GeoclassError::Parse {
        row,
        column: column.unwrap_or(0) + 1,
        message: source.to_string(),
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(GeoclassError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts win; semicolon beats comma on ties so that
        // decimal commas in semicolon files are not taken as separators.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"aperture_mm,retained_g\n4.75,40\n2.0,200";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"aperture\tmass\n4.75\t40\n2.0\t200";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_semicolon_with_decimal_commas() {
        let data = "Abertura (mm);Peso Retido (g)\n4,75;40\n0,075;150".as_bytes();
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_csv() {
        let table = Parser::new()
            .parse_str("aperture_mm,retained_g\n4.75,40\n2.0,200\n0.075,150\n")
            .unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.readings[1], SieveReading::new(2.0, 200.0));
        assert_eq!(table.retained_total(), 390.0);
    }

    #[test]
    fn test_parse_portuguese_headers_and_decimal_commas() {
        let table = Parser::new()
            .parse_str("Abertura (mm);Peso Retido (g)\n9,5;10\n0,42;400,5\n")
            .unwrap();
        assert_eq!(table.readings[0], SieveReading::new(9.5, 10.0));
        assert_eq!(table.readings[1], SieveReading::new(0.42, 400.5));
    }

    #[test]
    fn test_parse_sieve_designations() {
        let table = Parser::new()
            .parse_str("sieve,retained\n3/8\",10\n#4,40\n#200,150\n")
            .unwrap();
        let apertures: Vec<f64> = table.readings.iter().map(|r| r.aperture_mm).collect();
        assert_eq!(apertures, vec![9.5, 4.75, 0.075]);
        assert_eq!(table.designations[2].as_deref(), Some("#200"));
    }

    #[test]
    fn test_empty_mass_is_zero_and_blank_rows_skipped() {
        let table = Parser::new()
            .parse_str("aperture,mass\n50.8,\n\n4.75,40\n")
            .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.readings[0].retained_mass_g, 0.0);
    }

    #[test]
    fn test_non_numeric_mass() {
        let err = Parser::new()
            .parse_str("aperture,mass\n4.75,forty\n")
            .unwrap_err();
        match err {
            GeoclassError::Parse { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, 2);
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_sieve() {
        let err = Parser::new().parse_str("sieve,mass\n#7,10\n").unwrap_err();
        assert!(matches!(err, GeoclassError::Parse { column: 1, .. }));
    }

    #[test]
    fn test_missing_mass_column() {
        let err = Parser::new().parse_str("aperture,notes\n4.75,x\n").unwrap_err();
        assert!(matches!(err, GeoclassError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_headerless_table() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..ParserConfig::default()
        });
        let table = parser.parse_str("4.75,40\n2.0,200\n").unwrap();
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_header_only_is_empty() {
        let err = Parser::new().parse_str("aperture,mass\n").unwrap_err();
        assert!(matches!(err, GeoclassError::EmptyData(_)));
    }
}
