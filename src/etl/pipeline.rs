//! Pipeline orchestration for ETL operations

use super::{Extractor, Loader, Transformer};
use eyre::{Context, Result};

/// ETL Pipeline that orchestrates Extract, Transform, and Load operations
///
/// # Type Parameters
/// - `E`: Extractor type
/// - `T`: Transformer type (must transform from E::Output)
/// - `L`: Loader type (must load T::Output)
///
/// # Example
/// ```no_run
/// use stock_sentiment_etl::etl::Pipeline;
/// use stock_sentiment_etl::extract::CsvExtractor;
/// use stock_sentiment_etl::load::SentimentLoader;
/// use stock_sentiment_etl::transform::SentimentTransformer;
/// # use eyre::Result;
///
/// # fn example() -> Result<()> {
/// let mut pipeline = Pipeline::new(
///     CsvExtractor::new("stock_senti_analysis.csv"),
///     SentimentTransformer::default(),
///     SentimentLoader::new("data", "stock_senti_clean")?,
/// );
///
/// let report = pipeline.run()?;
/// println!("Loaded {}/{} sinks", report.successful_loads, report.total_attempts);
/// # Ok(())
/// # }
/// ```
pub struct Pipeline<E, T, L> {
    extractor: E,
    transformer: T,
    loader: L,
}

impl<E, T, L> Pipeline<E, T, L>
where
    E: Extractor,
    T: Transformer<Input = E::Output>,
    L: Loader<Input = T::Output>,
{
    /// Create a new pipeline
    pub fn new(extractor: E, transformer: T, loader: L) -> Self {
        Self {
            extractor,
            transformer,
            loader,
        }
    }

    /// Run the complete ETL pipeline
    ///
    /// Steps:
    /// 1. Extract the dataset from the source
    /// 2. Transform it
    /// 3. Load it to the destination
    ///
    /// # Errors
    /// Returns an error if any stage fails; later stages do not run
    pub fn run(&mut self) -> Result<L::Output> {
        log::info!("Starting ETL pipeline");

        log::debug!("Extracting from source...");
        let extracted = self.extractor.extract().context("Extract stage failed")?;

        log::debug!("Transforming dataset...");
        let transformed = self
            .transformer
            .transform(extracted)
            .context("Transform stage failed")?;

        log::debug!("Loading to destination...");
        let output = self.loader.load(transformed).context("Load stage failed")?;
        log::info!("ETL pipeline complete");

        Ok(output)
    }

    pub fn extractor(&self) -> &E {
        &self.extractor
    }

    pub fn transformer(&self) -> &T {
        &self.transformer
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}
