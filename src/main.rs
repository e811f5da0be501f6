use clap::{Parser, Subcommand, builder::styling};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use stock_sentiment_etl::{
    CsvExtractor, EtlError, LoadReport, Pipeline, SentimentLoader, SentimentTransformer,
    TextEncoding, TransformationReport,
    config::{Overrides, PipelineConfig},
    extract::DEFAULT_PREVIEW_ROWS,
    load::DEFAULT_TABLE_NAME,
    query_sqlite,
};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Stock Sentiment ETL: clean a daily headline sentiment CSV and persist it as CSV, Parquet and SQLite
#[derive(Parser)]
#[command(name = "senti-etl", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source settings from, if it exists
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract, transform and load the sentiment dataset
    Run {
        /// Input CSV file [env: SENTI_INPUT]
        input: Option<PathBuf>,

        /// Directory for the output files [env: SENTI_OUTPUT_DIR]
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// File name stem for the output files [env: SENTI_BASE_NAME]
        #[arg(short = 'n', long)]
        base_name: Option<String>,

        /// SQLite table name [env: SENTI_TABLE]
        #[arg(short, long)]
        table: Option<String>,

        /// Regex selecting the headline columns [env: SENTI_HEADLINE_PATTERN]
        #[arg(long)]
        headlines: Option<String>,

        /// Write the transformation and load logs to this JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Extract only: show the table summary and a preview
    Inspect {
        /// Input CSV file [env: SENTI_INPUT]
        input: Option<PathBuf>,

        /// Number of rows to preview
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: usize,
    },

    /// Query a database written by `run`
    Query {
        /// SQLite database file
        db: PathBuf,

        /// Table to select from when no query is given
        #[arg(short, long, default_value = DEFAULT_TABLE_NAME)]
        table: String,

        /// Raw SQL query
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum number of rows to print
        #[arg(short, long, default_value_t = 10)]
        rows: usize,
    },
}

/// JSON report written by `run --report`
#[derive(Serialize)]
struct RunReport<'a> {
    input: &'a Path,
    encoding: Option<TextEncoding>,
    transformation: Option<&'a TransformationReport>,
    load: &'a LoadReport,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match dotenvy::from_filename(&cli.env) {
        Ok(_) => {}
        Err(e) if e.not_found() => {}
        Err(e) => return Err(e).with_context(|| format!("Failed to load {}", cli.env)),
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let result = match cli.command {
        Commands::Run {
            input,
            output_dir,
            base_name,
            table,
            headlines,
            report,
        } => {
            let config = PipelineConfig::resolve(Overrides {
                input,
                output_dir,
                base_name,
                table_name: table,
                headline_pattern: headlines,
            })?;
            run(&config, report.as_deref())
        }
        Commands::Inspect { input, rows } => {
            let config = PipelineConfig::resolve(Overrides {
                input,
                ..Overrides::default()
            })?;
            inspect(&config.input, rows)
        }
        Commands::Query {
            db,
            table,
            query,
            rows,
        } => self::query(&db, &table, query.as_deref(), rows),
    };

    if let Err(e) = &result
        && let Some(etl) = e.downcast_ref::<EtlError>()
    {
        log::error!("Pipeline failed ({})", etl.kind().red());
    }
    result
}

fn run(config: &PipelineConfig, report_file: Option<&Path>) -> Result<()> {
    log::info!("Running pipeline on {}", config.input.display().bright_black());

    let loader = SentimentLoader::new(&config.output_dir, &config.base_name)?
        .with_table_name(&config.table_name);
    let mut pipeline = Pipeline::new(
        CsvExtractor::new(&config.input),
        SentimentTransformer::new(config.transform_config()),
        loader,
    );
    let load = pipeline.run()?;

    let encoding = pipeline.extractor().data().map(|d| d.encoding);
    let transformation = pipeline.transformer().report();

    if let Some(t) = transformation {
        log::info!(
            "Shape {:?} -> {:?}, nulls {} -> {}",
            t.original_shape,
            t.clean_shape,
            t.original_nulls,
            t.clean_nulls.cyan()
        );
    }
    for entry in &load.entries {
        match (&entry.error, entry.size_kb()) {
            (Some(error), _) => log::warn!("{} {}: {}", "✗".red(), entry.format, error),
            (None, Some(kb)) => log::info!(
                "{} {} {} ({:.1} KB)",
                "✓".green(),
                entry.format,
                entry.path.display().bright_black(),
                kb
            ),
            (None, None) => log::info!("{} {}", "✓".green(), entry.format),
        }
    }

    if let Some(path) = report_file {
        let report = RunReport {
            input: &config.input,
            encoding,
            transformation,
            load: &load,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize run report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        log::info!("Report written to {}", path.display().bright_black());
    }

    Ok(())
}

fn inspect(input: &Path, rows: usize) -> Result<()> {
    let mut extractor = CsvExtractor::new(input);
    let info = extractor.data_info()?;

    log::info!(
        "{} rows x {} columns, {:.2} MB, decoded as {}",
        info.rows.cyan(),
        info.columns.cyan(),
        info.memory_mb,
        info.encoding.cyan()
    );
    for ((name, dtype), (_, nulls)) in info.dtypes.iter().zip(&info.null_counts) {
        log::info!("  {:<16} {:<8} {} nulls", name, dtype.bright_black(), nulls);
    }

    println!("{}", extractor.preview(rows)?);
    Ok(())
}

fn query(db: &Path, table: &str, sql: Option<&str>, rows: usize) -> Result<()> {
    let result = query_sqlite(db, table, sql)
        .with_context(|| format!("Failed to query {}", db.display()))?;
    log::info!("{} rows returned", result.num_rows().cyan());
    println!("{}", result.head(rows));
    Ok(())
}
