//! Run configuration resolved from CLI flags, environment and defaults

use crate::load::DEFAULT_TABLE_NAME;
use crate::transform::{HeadlineColumns, TransformConfig};
use eyre::{Context, Result};
use std::path::PathBuf;

pub const DEFAULT_INPUT: &str = "stock_senti_analysis.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_BASE_NAME: &str = "stock_senti_clean";

/// Values given on the command line; `None` falls back to the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub base_name: Option<String>,
    pub table_name: Option<String>,
    pub headline_pattern: Option<String>,
}

/// Settings for one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub base_name: String,
    pub table_name: String,
    pub headlines: HeadlineColumns,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            base_name: DEFAULT_BASE_NAME.to_string(),
            table_name: DEFAULT_TABLE_NAME.to_string(),
            headlines: HeadlineColumns::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables only
    ///
    /// Expected environment variables (all optional):
    /// - SENTI_INPUT: input CSV file
    /// - SENTI_OUTPUT_DIR: directory for the output files
    /// - SENTI_BASE_NAME: file name stem for the output files
    /// - SENTI_TABLE: SQLite table name
    /// - SENTI_HEADLINE_PATTERN: regex selecting headline columns
    pub fn from_env() -> Result<Self> {
        Self::resolve(Overrides::default())
    }

    /// Resolve each setting as CLI override, then environment, then default
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let defaults = Self::default();

        let headlines = match overrides.headline_pattern.or_else(|| env("SENTI_HEADLINE_PATTERN")) {
            Some(pattern) => HeadlineColumns::pattern(&pattern)
                .with_context(|| format!("Invalid headline pattern: {}", pattern))?,
            None => defaults.headlines,
        };

        Ok(Self {
            input: overrides
                .input
                .or_else(|| env("SENTI_INPUT").map(PathBuf::from))
                .unwrap_or(defaults.input),
            output_dir: overrides
                .output_dir
                .or_else(|| env("SENTI_OUTPUT_DIR").map(PathBuf::from))
                .unwrap_or(defaults.output_dir),
            base_name: overrides
                .base_name
                .or_else(|| env("SENTI_BASE_NAME"))
                .unwrap_or(defaults.base_name),
            table_name: overrides
                .table_name
                .or_else(|| env("SENTI_TABLE"))
                .unwrap_or(defaults.table_name),
            headlines,
        })
    }

    /// Transformer settings derived from this configuration
    pub fn transform_config(&self) -> TransformConfig {
        TransformConfig {
            headlines: self.headlines.clone(),
            ..TransformConfig::default()
        }
    }
}

/// Non-empty environment variable
fn env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: [&str; 5] = [
        "SENTI_INPUT",
        "SENTI_OUTPUT_DIR",
        "SENTI_BASE_NAME",
        "SENTI_TABLE",
        "SENTI_HEADLINE_PATTERN",
    ];

    fn clear_env() {
        unsafe {
            for key in KEYS {
                std::env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_defaults() {
        clear_env();

        let config = PipelineConfig::from_env().unwrap();
        assert_eq!(config.input, PathBuf::from("stock_senti_analysis.csv"));
        assert_eq!(config.output_dir, PathBuf::from("data"));
        assert_eq!(config.base_name, "stock_senti_clean");
        assert_eq!(config.table_name, "stock_sentiment");
        assert!(config.headlines.matches("top25"));
    }

    #[test]
    #[serial_test::serial]
    fn test_env_then_override() {
        clear_env();
        unsafe {
            std::env::set_var("SENTI_OUTPUT_DIR", "/tmp/senti");
            std::env::set_var("SENTI_TABLE", "from_env");
            std::env::set_var("SENTI_BASE_NAME", "  ");
        }

        let config = PipelineConfig::resolve(Overrides {
            table_name: Some("from_cli".to_string()),
            ..Overrides::default()
        })
        .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/senti"));
        assert_eq!(config.table_name, "from_cli");
        assert_eq!(config.base_name, "stock_senti_clean");

        clear_env();
    }

    #[test]
    #[serial_test::serial]
    fn test_headline_pattern() {
        clear_env();
        unsafe {
            std::env::set_var("SENTI_HEADLINE_PATTERN", "^news_\\d+$");
        }

        let config = PipelineConfig::from_env().unwrap();
        assert!(config.transform_config().headlines.matches("news_3"));
        assert!(!config.headlines.matches("top3"));

        unsafe {
            std::env::set_var("SENTI_HEADLINE_PATTERN", "(unclosed");
        }
        let result = PipelineConfig::from_env();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Invalid headline pattern")
        );

        clear_env();
    }
}
