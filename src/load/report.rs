//! Load log entries and the aggregated load report

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Persistence target format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SinkFormat {
    Csv,
    Parquet,
    Sqlite,
}

impl SinkFormat {
    pub fn name(self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Parquet => "Parquet",
            Self::Sqlite => "SQLite",
        }
    }

    /// File extension used for `<base_name>.<ext>`
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
            Self::Sqlite => "db",
        }
    }
}

impl fmt::Display for SinkFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One sink attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadEntry {
    pub format: SinkFormat,
    pub path: PathBuf,
    /// Table name, for the relational sink
    pub table: Option<String>,
    pub size_bytes: Option<u64>,
    pub rows: Option<usize>,
    pub success: bool,
    pub error: Option<String>,
}

impl LoadEntry {
    pub fn succeeded(format: SinkFormat, path: &Path, rows: usize) -> Self {
        Self {
            format,
            path: path.to_path_buf(),
            table: None,
            size_bytes: std::fs::metadata(path).map(|m| m.len()).ok(),
            rows: Some(rows),
            success: true,
            error: None,
        }
    }

    pub fn failed(format: SinkFormat, path: &Path, error: impl fmt::Display) -> Self {
        Self {
            format,
            path: path.to_path_buf(),
            table: None,
            size_bytes: None,
            rows: None,
            success: false,
            error: Some(error.to_string()),
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Size in KiB, when the file was written
    pub fn size_kb(&self) -> Option<f64> {
        self.size_bytes.map(|b| b as f64 / 1024.0)
    }
}

/// Aggregate view over the load log
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub entries: Vec<LoadEntry>,
    pub successful_loads: usize,
    pub total_attempts: usize,
}

impl LoadReport {
    pub fn from_entries(entries: &[LoadEntry]) -> Self {
        Self {
            entries: entries.to_vec(),
            successful_loads: entries.iter().filter(|e| e.success).count(),
            total_attempts: entries.len(),
        }
    }

    /// Entry for `format`, if that sink was attempted
    pub fn entry(&self, format: SinkFormat) -> Option<&LoadEntry> {
        self.entries.iter().find(|e| e.format == format)
    }

    pub fn all_succeeded(&self) -> bool {
        self.successful_loads == self.total_attempts
    }
}
