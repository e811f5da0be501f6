//! Delimited-text sink

use crate::error::{EtlError, Result};
use crate::table::{DataType, Table, Value};
use std::path::{Path, PathBuf};

/// Writes a table as UTF-8 comma-separated text with a header row
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Write every row of `table`; returns the number of rows written
    ///
    /// Text nulls are replaced with `""` on a private copy first, and any
    /// remaining null renders as an empty field.
    pub fn write(&self, table: &Table) -> Result<usize> {
        let mut data = table.clone();
        for idx in 0..data.num_columns() {
            if data.field(idx).is_some_and(|f| f.dtype == DataType::Utf8) {
                data.map_column(idx, |value| {
                    if value.is_null() {
                        *value = Value::Text(String::new());
                    }
                });
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(data.fields().iter().map(|f| f.name.as_str()))?;
        for row in data.rows() {
            writer.write_record(row.iter().map(Value::to_field_string))?;
        }
        writer.flush().map_err(|source| EtlError::Write {
            path: self.path.clone(),
            source,
        })?;

        Ok(data.num_rows())
    }
}
