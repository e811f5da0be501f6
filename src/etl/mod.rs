//! Core ETL (Extract, Transform, Load) abstractions
//!
//! This module provides trait definitions for building batch pipelines
//! that extract a dataset from a source, transform it, and load it to sinks.
//! Every stage runs synchronously over the whole dataset.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::Transformer;
