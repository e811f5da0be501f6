//! Transformer trait for dataset transformation

use eyre::Result;

/// Transformer trait for transforming a dataset
///
/// Implementors define how to transform data:
/// - Data cleaning (dropping rows, filling gaps)
/// - Data enrichment (adding derived columns)
/// - Format conversion
/// - Validation
///
/// # Example
/// ```
/// use stock_sentiment_etl::etl::Transformer;
/// use eyre::Result;
///
/// struct Trimmer;
///
/// impl Transformer for Trimmer {
///     type Input = Vec<String>;
///     type Output = Vec<String>;
///
///     fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
///         Ok(input.into_iter().map(|s| s.trim().to_string()).collect())
///     }
/// }
///
/// let output = Trimmer.transform(vec!["  a ".to_string()]).unwrap();
/// assert_eq!(output, vec!["a"]);
/// ```
pub trait Transformer {
    /// Input dataset type
    type Input;

    /// Output dataset type after transformation
    type Output;

    /// Transform the dataset
    ///
    /// # Errors
    /// Returns an error if transformation fails (validation, conversion, etc.)
    fn transform(&mut self, input: Self::Input) -> Result<Self::Output>;
}
