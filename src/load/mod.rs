//! Persistence of the clean table to text, columnar and relational sinks
//!
//! The CSV and SQLite sinks are fatal on failure. The Parquet sink is not:
//! its failure is logged, recorded in the load log, and the run continues.

mod csv_sink;
mod parquet_sink;
mod report;
mod sqlite_sink;

pub use csv_sink::CsvSink;
pub use parquet_sink::{ParquetSink, to_record_batch};
pub use report::{LoadEntry, LoadReport, SinkFormat};
pub use sqlite_sink::{SqliteSink, query_sqlite};

use crate::error::{EtlError, Result};
use crate::etl::Loader;
use crate::table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default relational table name
pub const DEFAULT_TABLE_NAME: &str = "stock_sentiment";

/// Where the loader is within a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LoaderState {
    #[default]
    Idle,
    WritingText,
    WritingColumnar,
    WritingRelational,
    Done,
    Aborted,
}

/// Loader writing one clean table to `<output_dir>/<base_name>.{csv,parquet,db}`
///
/// # Example
/// ```no_run
/// use stock_sentiment_etl::load::SentimentLoader;
/// # use stock_sentiment_etl::table::Table;
/// # fn example(clean: &Table) -> stock_sentiment_etl::error::Result<()> {
/// let mut loader = SentimentLoader::new("data", "stock_senti_clean")?;
/// let report = loader.load_all(clean)?;
/// assert_eq!(report.total_attempts, 3);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SentimentLoader {
    output_dir: PathBuf,
    base_name: String,
    table_name: String,
    index_columns: Vec<String>,
    state: LoaderState,
    log: Vec<LoadEntry>,
}

impl SentimentLoader {
    /// Create a loader, creating `output_dir` if it does not exist
    ///
    /// # Errors
    /// [`EtlError::CreateOutputDir`] if the directory cannot be created.
    pub fn new(output_dir: impl AsRef<Path>, base_name: impl Into<String>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).map_err(|source| EtlError::CreateOutputDir {
            path: output_dir.clone(),
            source,
        })?;
        log::debug!("Output directory: {}", output_dir.display().bright_black());

        Ok(Self {
            output_dir,
            base_name: base_name.into(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            index_columns: vec!["date".to_string(), "label".to_string()],
            state: LoaderState::Idle,
            log: Vec::new(),
        })
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Columns indexed in the relational sink, when present in the table
    pub fn with_index_columns(mut self, columns: &[&str]) -> Self {
        self.index_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn state(&self) -> LoaderState {
        self.state
    }

    /// Attempts made since the last [`load_all`](Self::load_all)
    pub fn log(&self) -> &[LoadEntry] {
        &self.log
    }

    pub fn report(&self) -> LoadReport {
        LoadReport::from_entries(&self.log)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.sink_path(SinkFormat::Csv)
    }

    pub fn parquet_path(&self) -> PathBuf {
        self.sink_path(SinkFormat::Parquet)
    }

    pub fn sqlite_path(&self) -> PathBuf {
        self.sink_path(SinkFormat::Sqlite)
    }

    fn sink_path(&self, format: SinkFormat) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", self.base_name, format.extension()))
    }

    /// Write the CSV sink
    pub fn load_to_csv(&mut self, table: &Table) -> Result<PathBuf> {
        let path = self.csv_path();
        log::info!("Writing CSV: {}", path.display().bright_black());

        match CsvSink::new(&path).write(table) {
            Ok(rows) => {
                self.record(LoadEntry::succeeded(SinkFormat::Csv, &path, rows));
                Ok(path)
            }
            Err(e) => {
                self.record(LoadEntry::failed(SinkFormat::Csv, &path, &e));
                Err(e)
            }
        }
    }

    /// Write the Parquet sink; failure is logged and yields `None`
    pub fn load_to_parquet(&mut self, table: &Table) -> Option<PathBuf> {
        let path = self.parquet_path();
        log::info!("Writing Parquet: {}", path.display().bright_black());

        match ParquetSink::new(&path).write(table) {
            Ok(rows) => {
                self.record(LoadEntry::succeeded(SinkFormat::Parquet, &path, rows));
                Some(path)
            }
            Err(e) => {
                log::warn!("{} sink failed, continuing: {}", "Parquet".magenta(), e);
                self.record(LoadEntry::failed(SinkFormat::Parquet, &path, &e));
                None
            }
        }
    }

    /// Write the SQLite sink
    pub fn load_to_sqlite(&mut self, table: &Table) -> Result<PathBuf> {
        let path = self.sqlite_path();
        log::info!(
            "Writing SQLite: {} (table {})",
            path.display().bright_black(),
            self.table_name.cyan()
        );

        let index_columns: Vec<&str> = self.index_columns.iter().map(String::as_str).collect();
        let sink = SqliteSink::new(&path, &self.table_name).with_index_columns(&index_columns);
        match sink.write(table) {
            Ok(rows) => {
                let entry = LoadEntry::succeeded(SinkFormat::Sqlite, &path, rows)
                    .with_table(&self.table_name);
                self.record(entry);
                Ok(path)
            }
            Err(e) => {
                let entry =
                    LoadEntry::failed(SinkFormat::Sqlite, &path, &e).with_table(&self.table_name);
                self.record(entry);
                Err(e)
            }
        }
    }

    /// Run all three sinks in order: CSV, Parquet, SQLite
    ///
    /// # Errors
    /// The CSV or SQLite sink error; the state becomes [`LoaderState::Aborted`].
    pub fn load_all(&mut self, table: &Table) -> Result<LoadReport> {
        self.log.clear();
        log::info!(
            "Loading {} rows to {}",
            table.num_rows().cyan(),
            self.output_dir.display().bright_black()
        );

        self.state = LoaderState::WritingText;
        if let Err(e) = self.load_to_csv(table) {
            self.state = LoaderState::Aborted;
            return Err(e);
        }

        self.state = LoaderState::WritingColumnar;
        self.load_to_parquet(table);

        self.state = LoaderState::WritingRelational;
        if let Err(e) = self.load_to_sqlite(table) {
            self.state = LoaderState::Aborted;
            return Err(e);
        }

        self.state = LoaderState::Done;
        let report = self.report();
        log::info!(
            "Loaded {}/{} sinks",
            report.successful_loads.green(),
            report.total_attempts
        );
        Ok(report)
    }

    fn record(&mut self, entry: LoadEntry) {
        if let Some(kb) = entry.size_kb() {
            log::debug!("{} written: {:.1} KB", entry.format, kb);
        }
        self.log.push(entry);
    }
}

impl Loader for SentimentLoader {
    type Input = Table;
    type Output = LoadReport;

    fn load(&mut self, input: Self::Input) -> eyre::Result<Self::Output> {
        Ok(self.load_all(&input)?)
    }
}
