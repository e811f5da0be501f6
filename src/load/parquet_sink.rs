//! Columnar sink: Parquet with Snappy compression

use crate::error::{EtlError, Result};
use crate::table::{DataType, Table, Value};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType as ArrowType, Field as ArrowField, Schema};
use arrow::record_batch::RecordBatch;
use chrono::Datelike;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Writes a table as a single Snappy-compressed Parquet row group
pub struct ParquetSink {
    path: PathBuf,
}

impl ParquetSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Write every row of `table`; returns the number of rows written
    pub fn write(&self, table: &Table) -> Result<usize> {
        let batch = to_record_batch(table)?;

        let file = File::create(&self.path).map_err(|source| EtlError::Write {
            path: self.path.clone(),
            source,
        })?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(batch.num_rows())
    }
}

/// Convert a table to one Arrow record batch, column by column
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let fields: Vec<ArrowField> = table
        .fields()
        .iter()
        .map(|f| ArrowField::new(f.name.clone(), arrow_type(f.dtype), true))
        .collect();

    let columns: Vec<ArrayRef> = table
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, f)| column_array(table, idx, f.dtype))
        .collect();

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

fn arrow_type(dtype: DataType) -> ArrowType {
    match dtype {
        DataType::Int64 => ArrowType::Int64,
        DataType::Float64 => ArrowType::Float64,
        DataType::Utf8 => ArrowType::Utf8,
        DataType::Date => ArrowType::Date32,
    }
}

fn column_array(table: &Table, idx: usize, dtype: DataType) -> ArrayRef {
    let values = table.column_values(idx);
    match dtype {
        DataType::Int64 => Arc::new(Int64Array::from(
            values.map(Value::as_int).collect::<Vec<_>>(),
        )),
        DataType::Float64 => Arc::new(Float64Array::from(
            values.map(Value::as_float).collect::<Vec<_>>(),
        )),
        DataType::Utf8 => Arc::new(StringArray::from(
            values
                .map(|v| (!v.is_null()).then(|| v.to_field_string()))
                .collect::<Vec<_>>(),
        )),
        DataType::Date => Arc::new(Date32Array::from(
            values
                .map(|v| v.as_date().map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE))
                .collect::<Vec<_>>(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Field;
    use chrono::NaiveDate;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use tempfile::TempDir;

    fn sample() -> Table {
        Table::from_rows(
            vec![
                Field::new("date", DataType::Date),
                Field::new("label", DataType::Int64),
                Field::new("top1", DataType::Utf8),
            ],
            vec![
                vec![
                    Value::Date(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()),
                    Value::Int(1),
                    Value::from("a"),
                ],
                vec![
                    Value::Date(NaiveDate::from_ymd_opt(2008, 8, 8).unwrap()),
                    Value::Int(0),
                    Value::Null,
                ],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_record_batch_types() {
        let batch = to_record_batch(&sample()).unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.schema().field(0).data_type(), &ArrowType::Date32);

        let dates = batch
            .column(0)
            .as_any()
            .downcast_ref::<Date32Array>()
            .unwrap();
        assert_eq!(dates.value(0), 1);
        assert_eq!(batch.column(2).null_count(), 1);
    }

    #[test]
    fn test_write_uses_snappy() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.parquet");

        let rows = ParquetSink::new(&path).write(&sample()).unwrap();
        assert_eq!(rows, 2);

        let reader = SerializedFileReader::new(File::open(&path).unwrap()).unwrap();
        let metadata = reader.metadata();
        assert_eq!(metadata.file_metadata().num_rows(), 2);
        assert_eq!(
            metadata.row_group(0).column(0).compression(),
            Compression::SNAPPY
        );
    }

    #[test]
    fn test_write_to_directory_path_fails() {
        let temp = TempDir::new().unwrap();
        let err = ParquetSink::new(temp.path()).write(&sample()).unwrap_err();
        assert!(matches!(err, EtlError::Write { .. }));
    }
}
