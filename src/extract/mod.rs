//! Extraction of the raw sentiment dataset from delimited text
//!
//! [`CsvExtractor`] reads a comma-separated file with a header row into a
//! [`Table`], trying each configured [`TextEncoding`] in order until one
//! decodes the whole file.

mod encoding;

pub use encoding::TextEncoding;

use crate::error::{EtlError, Result};
use crate::etl::Extractor;
use crate::table::{DataType, Field, Table, Value};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Cell contents read as a missing value
pub const DEFAULT_NULL_MARKERS: [&str; 9] =
    ["", "NA", "N/A", "NaN", "nan", "NULL", "null", "None", "#N/A"];

/// Default number of rows returned by [`CsvExtractor::preview`]
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Raw table together with the encoding that decoded it
#[derive(Debug, Clone)]
pub struct Extraction {
    pub table: Table,
    pub encoding: TextEncoding,
}

/// Read-only summary of an extracted table
#[derive(Debug, Clone, Serialize)]
pub struct DataInfo {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub dtypes: Vec<(String, DataType)>,
    /// Approximate in-memory size in MiB
    pub memory_mb: f64,
    pub null_counts: Vec<(String, usize)>,
    pub encoding: TextEncoding,
}

impl DataInfo {
    pub fn from_extraction(extraction: &Extraction) -> Self {
        let table = &extraction.table;
        Self {
            rows: table.num_rows(),
            columns: table.num_columns(),
            column_names: table.column_names(),
            dtypes: table.dtypes(),
            memory_mb: table.memory_usage() as f64 / (1024.0 * 1024.0),
            null_counts: table.null_counts(),
            encoding: extraction.encoding,
        }
    }
}

/// Extractor for comma-separated files with a header row
///
/// # Example
/// ```no_run
/// use stock_sentiment_etl::extract::CsvExtractor;
///
/// # fn example() -> eyre::Result<()> {
/// let mut extractor = CsvExtractor::new("stock_senti_analysis.csv");
/// let extraction = extractor.extract_data()?;
/// println!("{} rows decoded as {}", extraction.table.num_rows(), extraction.encoding);
/// # Ok(())
/// # }
/// ```
pub struct CsvExtractor {
    path: PathBuf,
    encodings: Vec<TextEncoding>,
    null_markers: Vec<String>,
    data: Option<Extraction>,
}

impl CsvExtractor {
    /// Create an extractor for `path` with the default encodings and null markers
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            encodings: TextEncoding::DEFAULT_ORDER.to_vec(),
            null_markers: DEFAULT_NULL_MARKERS.iter().map(|s| s.to_string()).collect(),
            data: None,
        }
    }

    /// Replace the ordered list of encodings to try
    pub fn with_encodings(mut self, encodings: Vec<TextEncoding>) -> Self {
        self.encodings = encodings;
        self
    }

    /// Replace the set of cell contents read as null
    pub fn with_null_markers(mut self, markers: Vec<&str>) -> Self {
        self.null_markers = markers.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last extraction, if one has run
    pub fn data(&self) -> Option<&Extraction> {
        self.data.as_ref()
    }

    /// Read, decode and parse the input file
    ///
    /// # Errors
    /// - [`EtlError::NotFound`] if the path does not exist
    /// - [`EtlError::Decode`] if no encoding decodes the file (last attempt's error)
    /// - [`EtlError::Io`], [`EtlError::Parse`], [`EtlError::Malformed`] for other read failures
    pub fn extract_data(&mut self) -> Result<&Extraction> {
        log::info!("Extracting data from {}", self.path.display());

        let bytes = self.read_bytes()?;
        let (text, encoding) = self.decode(&bytes)?;
        let table = self.parse(&text)?;

        log::info!("Decoded {} as {}", self.path.display(), encoding);
        log::info!(
            "Dimensions: {} rows x {} columns",
            table.num_rows(),
            table.num_columns()
        );
        log::debug!("Columns: {:?}", table.column_names());

        Ok(self.data.insert(Extraction { table, encoding }))
    }

    /// Summary of the extracted table, extracting first if needed
    pub fn data_info(&mut self) -> Result<DataInfo> {
        Ok(DataInfo::from_extraction(self.ensure_extracted()?))
    }

    /// First `n_rows` of the extracted table, extracting first if needed
    pub fn preview(&mut self, n_rows: usize) -> Result<Table> {
        Ok(self.ensure_extracted()?.table.head(n_rows))
    }

    fn ensure_extracted(&mut self) -> Result<&Extraction> {
        if self.data.is_none() {
            self.extract_data()?;
        }
        self.data.as_ref().ok_or_else(|| EtlError::NotFound {
            path: self.path.clone(),
        })
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        if !self.path.exists() {
            log::error!("Input file not found: {}", self.path.display());
            return Err(EtlError::NotFound {
                path: self.path.clone(),
            });
        }
        std::fs::read(&self.path).map_err(|source| EtlError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Result<(std::borrow::Cow<'a, str>, TextEncoding)> {
        let mut last_error = None;
        for &encoding in &self.encodings {
            match encoding.decode(bytes) {
                Ok(text) => return Ok((text, encoding)),
                Err(e) => {
                    log::debug!("{} did not decode: {}", encoding, e);
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| EtlError::Decode {
            encoding: "none",
            position: 0,
        }))
    }

    fn parse(&self, text: &str) -> Result<Table> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let names: Vec<String> = reader
            .headers()
            .map_err(|source| self.parse_error(source))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for result in reader.records() {
            let record = result.map_err(|source| self.parse_error(source))?;
            if record.len() > names.len() {
                return Err(EtlError::Malformed {
                    path: self.path.clone(),
                    line: record.position().map_or(0, |p| p.line()),
                    detail: format!(
                        "expected {} fields, found {}",
                        names.len(),
                        record.len()
                    ),
                });
            }
            for (idx, column) in columns.iter_mut().enumerate() {
                let cell = record.get(idx).filter(|c| !self.is_null_marker(c));
                column.push(cell.map(str::to_string));
            }
        }

        let num_rows = columns.first().map_or(0, Vec::len);
        let mut fields = Vec::with_capacity(names.len());
        let mut typed: Vec<std::vec::IntoIter<Value>> = Vec::with_capacity(names.len());
        for (name, cells) in names.into_iter().zip(columns) {
            let (dtype, values) = infer_column(cells);
            fields.push(Field::new(name, dtype));
            typed.push(values.into_iter());
        }

        let rows: Vec<Vec<Value>> = (0..num_rows)
            .map(|_| {
                typed
                    .iter_mut()
                    .map(|c| c.next().unwrap_or_default())
                    .collect::<Vec<_>>()
            })
            .collect();
        Table::from_rows(fields, rows)
    }

    fn is_null_marker(&self, cell: &str) -> bool {
        self.null_markers.iter().any(|m| m == cell)
    }

    fn parse_error(&self, source: csv::Error) -> EtlError {
        log::error!("Failed to parse {}: {}", self.path.display(), source);
        EtlError::Parse {
            path: self.path.clone(),
            source,
        }
    }
}

/// Pick the narrowest type every non-null cell parses as
fn infer_column(cells: Vec<Option<String>>) -> (DataType, Vec<Value>) {
    let present = || cells.iter().flatten();

    if present().all(|c| c.trim().parse::<i64>().is_ok()) && present().next().is_some() {
        let values = cells
            .iter()
            .map(|c| Value::from(c.as_deref().and_then(|c| c.trim().parse::<i64>().ok())))
            .collect();
        return (DataType::Int64, values);
    }

    if present().all(|c| c.trim().parse::<f64>().is_ok()) && present().next().is_some() {
        let values = cells
            .iter()
            .map(|c| Value::from(c.as_deref().and_then(|c| c.trim().parse::<f64>().ok())))
            .collect();
        return (DataType::Float64, values);
    }

    (DataType::Utf8, cells.into_iter().map(Value::from).collect())
}

impl Extractor for CsvExtractor {
    type Output = Table;

    fn extract(&mut self) -> eyre::Result<Self::Output> {
        Ok(self.extract_data()?.table.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(bytes: &[u8]) -> NamedTempFile {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(bytes).unwrap();
        temp.flush().unwrap();
        temp
    }

    #[test]
    fn test_infers_column_types() {
        let temp = write_temp(b"Date,Label,Top1\n2008-08-08,0,first\n2008-08-11,1,\n");
        let mut extractor = CsvExtractor::new(temp.path());
        let extraction = extractor.extract_data().unwrap();

        assert_eq!(extraction.encoding, TextEncoding::Utf8);
        let table = &extraction.table;
        assert_eq!(table.shape(), (2, 3));
        assert_eq!(
            table.dtypes(),
            vec![
                ("Date".to_string(), DataType::Utf8),
                ("Label".to_string(), DataType::Int64),
                ("Top1".to_string(), DataType::Utf8),
            ]
        );
        assert!(table.rows()[1][2].is_null());
    }

    #[test]
    fn test_label_with_gap_is_float() {
        let temp = write_temp(b"date,label\n2008-08-08,1.0\n2008-08-09,NaN\n");
        let mut extractor = CsvExtractor::new(temp.path());
        let table = &extractor.extract_data().unwrap().table;

        assert_eq!(table.fields()[1].dtype, DataType::Float64);
        assert_eq!(table.rows()[0][1], Value::Float(1.0));
        assert!(table.rows()[1][1].is_null());
    }

    #[test]
    fn test_short_records_are_padded() {
        let temp = write_temp(b"a,b,c\n1,2\n");
        let mut extractor = CsvExtractor::new(temp.path());
        let table = &extractor.extract_data().unwrap().table;
        assert_eq!(table.num_rows(), 1);
        assert!(table.rows()[0][2].is_null());
    }

    #[test]
    fn test_custom_null_markers() {
        let temp = write_temp(b"date,top1\n2008-08-08,nan\n2008-08-11,-\n");
        let mut extractor = CsvExtractor::new(temp.path()).with_null_markers(vec!["", "-"]);
        let table = &extractor.extract_data().unwrap().table;

        assert_eq!(table.rows()[0][1], Value::from("nan"));
        assert!(table.rows()[1][1].is_null());
    }

    #[test]
    fn test_long_records_are_rejected() {
        let temp = write_temp(b"a,b\n1,2,3\n");
        let mut extractor = CsvExtractor::new(temp.path());
        let err = extractor.extract_data().unwrap_err();
        assert!(matches!(err, EtlError::Malformed { line: 2, .. }));
        assert_eq!(err.kind(), "parse");
    }

    #[test]
    fn test_missing_file() {
        let mut extractor = CsvExtractor::new("/definitely/not/here.csv");
        let err = extractor.extract_data().unwrap_err();
        assert!(matches!(err, EtlError::NotFound { .. }));
    }

    #[test]
    fn test_falls_through_to_windows1252() {
        let temp = write_temp(b"date,label,top1\n2008-08-08,1,\x93Quoted\x94 news\n");
        let mut extractor = CsvExtractor::new(temp.path());
        let extraction = extractor.extract_data().unwrap();

        assert_eq!(extraction.encoding, TextEncoding::Windows1252);
        assert_eq!(
            extraction.table.rows()[0][2],
            Value::from("\u{201C}Quoted\u{201D} news")
        );
    }

    #[test]
    fn test_last_decode_error_is_surfaced() {
        let temp = write_temp(b"a\n\x81\x93\n");
        let mut extractor = CsvExtractor::new(temp.path());
        let err = extractor.extract_data().unwrap_err();
        assert!(matches!(
            err,
            EtlError::Decode {
                encoding: "cp1252",
                position: 2
            }
        ));
    }

    #[test]
    fn test_info_and_preview_extract_lazily() {
        let temp = write_temp(b"x,y\n1,a\n2,b\n3,\n4,d\n5,e\n6,f\n");
        let mut extractor = CsvExtractor::new(temp.path());

        let preview = extractor.preview(DEFAULT_PREVIEW_ROWS).unwrap();
        assert_eq!(preview.num_rows(), 5);

        let info = extractor.data_info().unwrap();
        assert_eq!(info.rows, 6);
        assert_eq!(info.columns, 2);
        assert_eq!(info.column_names, vec!["x", "y"]);
        assert_eq!(info.null_counts[1], ("y".to_string(), 1));
        assert!(info.memory_mb > 0.0);
    }

    #[test]
    fn test_extractor_trait() {
        let temp = write_temp(b"a\n1\n");
        let mut extractor = CsvExtractor::new(temp.path());
        let table = Extractor::extract(&mut extractor).unwrap();
        assert_eq!(table.num_rows(), 1);
        assert!(extractor.data().is_some());
    }
}
