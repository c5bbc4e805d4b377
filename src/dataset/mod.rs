//! Dataset profiling
//!
//! A one-pass profile of a CSV file: inferred column kinds, missing values,
//! example values and basic statistics. The markdown rendering is fed to the
//! ingestion agent as `{dataset_profile}`.

use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::Write as _;
use std::path::Path;

/// Values treated as missing
const MISSING_MARKERS: &[&str] = &["", "NA", "N/A", "NaN", "nan", "null", "NULL", "None"];

/// Distinct values tracked per column before the count is reported as capped
const DISTINCT_CAP: usize = 1000;

const EXAMPLE_COUNT: usize = 3;

fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value.trim())
}

/// Inferred type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// Every value is missing
    Empty,
}

impl std::fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Text => "text",
            ColumnKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

/// Min, max and mean of a numeric column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnKind,
    pub missing: usize,
    /// Number of distinct non-missing values, at most the cap
    pub distinct: usize,
    /// True when `distinct` hit the cap
    pub distinct_capped: bool,
    pub examples: Vec<String>,
    pub stats: Option<NumericStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetProfile {
    pub rows: usize,
    pub columns: Vec<ColumnProfile>,
}

/// Running state for one column
#[derive(Default)]
struct ColumnAccumulator {
    missing: usize,
    present: usize,
    all_integer: bool,
    all_numeric: bool,
    all_boolean: bool,
    distinct: HashSet<String>,
    distinct_capped: bool,
    examples: Vec<String>,
    sum: f64,
    min: f64,
    max: f64,
}

impl ColumnAccumulator {
    fn new() -> Self {
        Self {
            all_integer: true,
            all_numeric: true,
            all_boolean: true,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            ..Default::default()
        }
    }

    fn observe(&mut self, raw: &str) {
        if is_missing(raw) {
            self.missing += 1;
            return;
        }

        let value = raw.trim();
        self.present += 1;

        if value.parse::<i64>().is_err() {
            self.all_integer = false;
        }
        match value.parse::<f64>() {
            Ok(number) if number.is_finite() => {
                self.sum += number;
                self.min = self.min.min(number);
                self.max = self.max.max(number);
            }
            _ => self.all_numeric = false,
        }
        if !value.eq_ignore_ascii_case("true") && !value.eq_ignore_ascii_case("false") {
            self.all_boolean = false;
        }

        if !self.distinct_capped && !self.distinct.contains(value) {
            if self.distinct.len() == DISTINCT_CAP {
                self.distinct_capped = true;
            } else {
                self.distinct.insert(value.to_string());
                if self.examples.len() < EXAMPLE_COUNT {
                    self.examples.push(value.to_string());
                }
            }
        }
    }

    fn kind(&self) -> ColumnKind {
        if self.present == 0 {
            ColumnKind::Empty
        } else if self.all_integer {
            ColumnKind::Integer
        } else if self.all_numeric {
            ColumnKind::Float
        } else if self.all_boolean {
            ColumnKind::Boolean
        } else {
            ColumnKind::Text
        }
    }

    fn finish(self, name: String) -> ColumnProfile {
        let kind = self.kind();
        let stats = match kind {
            ColumnKind::Integer | ColumnKind::Float => Some(NumericStats {
                min: self.min,
                max: self.max,
                mean: self.sum / self.present as f64,
            }),
            _ => None,
        };

        ColumnProfile {
            name,
            kind,
            missing: self.missing,
            distinct: self.distinct.len(),
            distinct_capped: self.distinct_capped,
            examples: self.examples,
            stats,
        }
    }
}

impl DatasetProfile {
    /// Profile a CSV file with a header row
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|e| AppError::Dataset(format!("Cannot open {}: {}", path.display(), e)))?;

        Self::from_csv(reader)
            .map_err(|e| AppError::Dataset(format!("Cannot read {}: {}", path.display(), e)))
    }

    /// Profile CSV text, mainly for tests and piped input
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        let reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        Self::from_csv(reader).map_err(|e| AppError::Dataset(e.to_string()))
    }

    fn from_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> std::result::Result<Self, csv::Error> {
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        let mut columns: Vec<ColumnAccumulator> =
            headers.iter().map(|_| ColumnAccumulator::new()).collect();

        let mut rows = 0;
        for record in reader.records() {
            let record = record?;
            rows += 1;
            for (index, column) in columns.iter_mut().enumerate() {
                // Short rows count as missing in the trailing columns
                column.observe(record.get(index).unwrap_or(""));
            }
        }

        Ok(Self {
            rows,
            columns: columns
                .into_iter()
                .zip(headers)
                .map(|(column, name)| column.finish(name))
                .collect(),
        })
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Markdown summary table
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Rows: {}, columns: {}\n", self.rows, self.columns.len());
        out.push_str("| Column | Type | Missing | Unique | Examples | Min | Max | Mean |\n");
        out.push_str("|---|---|---|---|---|---|---|---|\n");

        for column in &self.columns {
            let unique = if column.distinct_capped {
                format!("{}+", column.distinct)
            } else {
                column.distinct.to_string()
            };
            let examples = column
                .examples
                .iter()
                .map(|e| escape_cell(e))
                .collect::<Vec<_>>()
                .join(", ");
            let (min, max, mean) = match column.stats {
                Some(stats) => (
                    format_number(stats.min),
                    format_number(stats.max),
                    format_number(stats.mean),
                ),
                None => ("".to_string(), "".to_string(), "".to_string()),
            };

            let _ = writeln!(
                out,
                "| {} | {} | {} | {} | {} | {} | {} | {} |",
                escape_cell(&column.name),
                column.kind,
                column.missing,
                unique,
                examples,
                min,
                max,
                mean
            );
        }

        out
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.3}", value)
    }
}
