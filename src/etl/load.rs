//! Loader trait for persisting data to destinations

use eyre::Result;

/// Loader trait for loading a dataset to one or more destinations
///
/// Implementors define how to persist data to destinations:
/// - File systems
/// - Databases
///
/// # Example
/// ```no_run
/// use stock_sentiment_etl::etl::Loader;
/// use eyre::Result;
/// use std::path::PathBuf;
///
/// struct FileLoader {
///     path: PathBuf,
/// }
///
/// impl Loader for FileLoader {
///     type Input = Vec<String>;
///     type Output = usize;
///
///     fn load(&mut self, lines: Self::Input) -> Result<Self::Output> {
///         std::fs::write(&self.path, lines.join("\n"))?;
///         Ok(lines.len())
///     }
/// }
/// ```
pub trait Loader {
    /// The dataset accepted by the loader
    type Input;

    /// Summary returned once loading completes
    type Output;

    /// Load the dataset to the destination
    ///
    /// # Errors
    /// Returns an error if loading fails (I/O, encoding, database, etc.)
    fn load(&mut self, input: Self::Input) -> Result<Self::Output>;
}
