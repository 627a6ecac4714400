//! In-memory reference tables for registry adapters.
//!
//! A table is a header row plus string-valued records, loadable from CSV or
//! built directly from rows. Column lookup tolerates the naming variants seen
//! across registry exports ("Company Name", "company_name", "Organization").

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors from reference table loading.
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to read table file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Table has no header row")]
    MissingHeader,

    #[error("Unsupported table format: {0}")]
    UnsupportedFormat(String),
}

/// Column-name variants accepted as the company name column.
const COMPANY_COLUMN_CANDIDATES: &[&str] =
    &["company_name", "Company Name", "Organization", "Name"];

/// A read-only tabular reference dataset.
///
/// Loaded once and treated as immutable for the adapter's lifetime, so it is
/// safe to share across concurrent evaluations.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    headers: Vec<String>,
    rows: Vec<BTreeMap<String, String>>,
}

impl ReferenceTable {
    /// Build a table from pre-parsed rows. Headers are taken from the union
    /// of keys of the first row.
    pub fn from_rows(rows: Vec<BTreeMap<String, String>>) -> Result<Self, TableError> {
        let headers = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .ok_or(TableError::MissingHeader)?;
        Ok(Self { headers, rows })
    }

    /// Load a table from a CSV file path.
    ///
    /// Only `.csv` is supported; other extensions are rejected so a caller
    /// handing over an XLSX export gets a clear error instead of garbage rows.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") | None => {}
            Some(other) => return Err(TableError::UnsupportedFormat(other.to_string())),
        }
        Self::from_csv_reader(File::open(path)?)
    }

    /// Load a table from any CSV reader.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if headers.is_empty() {
            return Err(TableError::MissingHeader);
        }

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let mut row = BTreeMap::new();
            for (header, value) in headers.iter().zip(record.iter()) {
                row.insert(header.clone(), value.trim().to_string());
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[BTreeMap<String, String>] {
        &self.rows
    }

    /// Find the column holding company names, if any.
    pub fn company_column(&self) -> Option<&str> {
        for candidate in COMPANY_COLUMN_CANDIDATES {
            if let Some(header) = self.headers.iter().find(|h| h.as_str() == *candidate) {
                return Some(header);
            }
        }
        // Fall back to any column that plausibly names a company
        self.headers
            .iter()
            .find(|h| {
                let lower = h.to_lowercase();
                lower.contains("company") || lower.contains("org") || lower.contains("name")
            })
            .map(|h| h.as_str())
    }

    /// Find a column matching any of the given names, case-insensitively.
    pub fn column(&self, candidates: &[&str]) -> Option<&str> {
        for candidate in candidates {
            if let Some(header) = self
                .headers
                .iter()
                .find(|h| h.eq_ignore_ascii_case(candidate))
            {
                return Some(header);
            }
        }
        None
    }

    /// Non-empty values of one column, paired with their row index.
    pub fn column_values<'a>(&'a self, column: &str) -> Vec<(usize, &'a str)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| {
                row.get(column)
                    .map(|v| v.as_str())
                    .filter(|v| !v.is_empty())
                    .map(|v| (idx, v))
            })
            .collect()
    }

    /// A cell value by row index and column name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// A cell parsed as i32 (years and similar).
    pub fn cell_i32(&self, row: usize, column: &str) -> Option<i32> {
        self.cell(row, column).and_then(|v| v.parse().ok())
    }

    /// Summarize the rows whose sector column contains `sector`.
    ///
    /// Returns `None` when the table has no sector column. The average is
    /// taken over whatever score/grade column values parse as numbers.
    pub fn sector_benchmark(&self, sector: &str) -> Option<SectorBenchmark> {
        let sector_col = self.column(&["sector", "industry"])?;
        let score_col = self.column(&["score", "grade", "rating"]);

        let needle = sector.to_lowercase();
        let mut companies = 0usize;
        let mut scores = Vec::new();

        for (idx, value) in self.column_values(sector_col) {
            if !value.to_lowercase().contains(&needle) {
                continue;
            }
            companies += 1;
            if let Some(col) = score_col {
                if let Some(score) = self.cell(idx, col).and_then(|v| v.parse::<f64>().ok()) {
                    scores.push(score);
                }
            }
        }

        let average_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        Some(SectorBenchmark {
            companies,
            average_score,
        })
    }
}

/// Per-sector summary of a reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorBenchmark {
    /// Rows matching the sector
    pub companies: usize,

    /// Mean of the numeric score column, when one exists and parses
    pub average_score: Option<f64>,
}
