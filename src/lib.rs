//! Stock Sentiment ETL
//!
//! A batch pipeline that cleans a daily news-headline sentiment CSV and
//! persists it as CSV, Parquet and SQLite

pub mod config;
pub mod error;
pub mod etl;
pub mod extract;
pub mod load;
pub mod table;
pub mod transform;

// Re-exports for convenience
pub use config::PipelineConfig;
pub use error::EtlError;
pub use etl::{Extractor, Loader, Pipeline, Transformer};
pub use extract::{CsvExtractor, DataInfo, TextEncoding};
pub use load::{LoadReport, SentimentLoader, query_sqlite};
pub use table::{DataType, Table, Value};
pub use transform::{SentimentTransformer, TransformConfig, TransformationReport};
