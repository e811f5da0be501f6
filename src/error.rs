//! Error taxonomy shared by the extract, transform and load stages

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the pipeline components
pub type Result<T, E = EtlError> = std::result::Result<T, E>;

/// Errors raised by the pipeline components
///
/// Row-level data problems (bad dates, null labels, null headlines) never
/// surface here; they are resolved by the transformer's drop/fill policy.
#[derive(Debug, Error)]
pub enum EtlError {
    /// The input file does not exist.
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// None of the attempted encodings could decode the input.
    #[error("failed to decode input as {encoding}: invalid byte at offset {position}")]
    Decode {
        encoding: &'static str,
        position: usize,
    },

    /// Reading the input file failed for a reason other than a missing path.
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The decoded text is not a well-formed delimited file.
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A record in the input has more fields than the header.
    #[error("malformed record on line {line} of {}: {detail}", path.display())]
    Malformed {
        path: PathBuf,
        line: u64,
        detail: String,
    },

    /// A row does not match the width of the table schema.
    #[error("row {row} has {found} values, expected {expected}")]
    Shape {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A column the pipeline depends on is absent.
    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    /// A whole column could not be converted to its target type.
    #[error("column '{column}' could not be coerced: {detail}")]
    SchemaCoercion { column: String, detail: String },

    /// Writing an output file failed.
    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sink could not be written.
    #[error("{format} sink failed for {}: {detail}", path.display())]
    SinkWrite {
        format: &'static str,
        path: PathBuf,
        detail: String,
    },

    /// The output directory could not be created.
    #[error("failed to create output directory {}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing delimited text failed.
    #[error("CSV error")]
    Csv(#[from] csv::Error),

    /// A SQLite operation failed.
    #[error("SQLite error")]
    Sqlite(#[from] rusqlite::Error),

    /// Building the Arrow record batch failed.
    #[error("Arrow error")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Writing the Parquet file failed.
    #[error("Parquet error")]
    Parquet(#[from] parquet::errors::ParquetError),
}

impl EtlError {
    /// Short, stable name of the error kind, used in driver output
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "missing-input",
            Self::Decode { .. } => "decode",
            Self::Io { .. } | Self::Parse { .. } | Self::Malformed { .. } => "parse",
            Self::Shape { .. } | Self::MissingColumn { .. } | Self::SchemaCoercion { .. } => {
                "schema-coercion"
            }
            Self::SinkWrite { .. }
            | Self::Write { .. }
            | Self::CreateOutputDir { .. }
            | Self::Csv(_)
            | Self::Sqlite(_)
            | Self::Arrow(_)
            | Self::Parquet(_) => "sink-write",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = EtlError::NotFound {
            path: PathBuf::from("missing.csv"),
        };
        assert_eq!(err.kind(), "missing-input");
        assert!(err.to_string().contains("missing.csv"));

        let err = EtlError::Decode {
            encoding: "UTF-8",
            position: 7,
        };
        assert_eq!(err.kind(), "decode");
        assert!(err.to_string().contains("offset 7"));
    }

    #[test]
    fn test_converts_into_eyre_report() {
        let report: eyre::Report = EtlError::MissingColumn {
            column: "date".to_string(),
        }
        .into();
        let err = report.downcast_ref::<EtlError>().unwrap();
        assert_eq!(err.kind(), "schema-coercion");
    }
}
