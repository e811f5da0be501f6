//! Extractor trait for reading a dataset from a source

use eyre::Result;

/// Extractor trait for extracting a dataset from a source
///
/// Implementors define how to read data from sources like:
/// - Delimited text files
/// - Databases
///
/// # Example
/// ```no_run
/// use stock_sentiment_etl::etl::Extractor;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct LineExtractor {
///     path: PathBuf,
/// }
///
/// impl Extractor for LineExtractor {
///     type Output = Vec<String>;
///
///     fn extract(&mut self) -> Result<Self::Output> {
///         let text = std::fs::read_to_string(&self.path)?;
///         Ok(text.lines().map(str::to_string).collect())
///     }
/// }
/// ```
pub trait Extractor {
    /// The dataset produced by the extractor
    type Output;

    /// Extract the dataset from the source
    ///
    /// # Errors
    /// Returns an error if extraction fails (missing input, I/O, decoding, parsing)
    fn extract(&mut self) -> Result<Self::Output>;
}
