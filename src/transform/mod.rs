//! Cleaning and enrichment of the raw sentiment table
//!
//! [`SentimentTransformer`] runs a fixed sequence of steps over a private copy
//! of the raw table:
//!
//! 1. Column-name normalisation
//! 2. Type coercion (date, label, headlines)
//! 3. Null handling (mode fill for numeric columns, `""` for text)
//! 4. Duplicate removal
//! 5. Date validation and ordering
//! 6. Headline whitespace trimming
//! 7. Feature derivation (calendar parts and sentiment name)
//!
//! Each step appends a [`StepRecord`] to the transformation log.

mod columns;
mod features;

pub use columns::{HeadlineColumns, normalize_column_name};
pub use features::{DateOrder, SentimentLabels, day_of_week, parse_date, parse_date_with, quarter};

use crate::error::{EtlError, Result};
use crate::etl::Transformer;
use crate::table::{DataType, Field, Table, Value};
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Names of the derived columns, in the order they are added
pub const DERIVED_COLUMNS: [&str; 6] = ["year", "month", "day", "day_of_week", "quarter", "sentiment"];

/// Transformer configuration
#[derive(Debug, Clone)]
pub struct TransformConfig {
    /// Normalised name of the date column
    pub date_column: String,
    /// Normalised name of the integer label column
    pub label_column: String,
    /// Which columns hold headlines
    pub headlines: HeadlineColumns,
    /// Label to sentiment name mapping
    pub sentiment: SentimentLabels,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            label_column: "label".to_string(),
            headlines: HeadlineColumns::default(),
            sentiment: SentimentLabels::default(),
        }
    }
}

/// A step of the transformation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformStep {
    NormalizeColumns,
    CoerceTypes,
    FillNulls,
    RemoveDuplicates,
    ValidateDates,
    NormalizeValues,
    DeriveFeatures,
}

impl fmt::Display for TransformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NormalizeColumns => "Column normalization",
            Self::CoerceTypes => "Type coercion",
            Self::FillNulls => "Null handling",
            Self::RemoveDuplicates => "Duplicate removal",
            Self::ValidateDates => "Date validation",
            Self::NormalizeValues => "Value normalization",
            Self::DeriveFeatures => "Feature derivation",
        };
        f.write_str(name)
    }
}

/// One entry of the transformation log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: TransformStep,
    pub rows_before: usize,
    pub rows_after: usize,
    pub detail: String,
}

/// Summary of a completed transformation
#[derive(Debug, Clone, Serialize)]
pub struct TransformationReport {
    pub steps: Vec<StepRecord>,
    pub original_shape: (usize, usize),
    pub clean_shape: (usize, usize),
    pub original_nulls: usize,
    pub clean_nulls: usize,
}

/// Cleans and enriches the raw sentiment table
///
/// # Example
/// ```
/// use stock_sentiment_etl::table::{DataType, Field, Table, Value};
/// use stock_sentiment_etl::transform::SentimentTransformer;
///
/// let raw = Table::from_rows(
///     vec![
///         Field::new("Date", DataType::Utf8),
///         Field::new("Label", DataType::Int64),
///         Field::new("Top1", DataType::Utf8),
///     ],
///     vec![vec![Value::from("2008-08-08"), Value::Int(1), Value::from(" News ")]],
/// )
/// .unwrap();
///
/// let mut transformer = SentimentTransformer::default();
/// let clean = transformer.transform_all(&raw).unwrap();
///
/// assert_eq!(clean.column_names()[..3], ["date", "label", "top1"]);
/// assert_eq!(clean.rows()[0][2], Value::from("News"));
/// assert_eq!(transformer.log().len(), 7);
/// ```
#[derive(Debug, Default)]
pub struct SentimentTransformer {
    config: TransformConfig,
    log: Vec<StepRecord>,
    report: Option<TransformationReport>,
}

impl SentimentTransformer {
    pub fn new(config: TransformConfig) -> Self {
        Self {
            config,
            log: Vec::new(),
            report: None,
        }
    }

    pub fn config(&self) -> &TransformConfig {
        &self.config
    }

    /// Ordered log of the last run
    pub fn log(&self) -> &[StepRecord] {
        &self.log
    }

    /// Report of the last completed run
    pub fn report(&self) -> Option<&TransformationReport> {
        self.report.as_ref()
    }

    /// Run every step over a copy of `raw` and return the clean table
    ///
    /// # Errors
    /// - [`EtlError::MissingColumn`] if the date column is absent
    /// - [`EtlError::SchemaCoercion`] if no value of the date column parses
    pub fn transform_all(&mut self, raw: &Table) -> Result<Table> {
        log::info!("Starting transformation of {} rows", raw.num_rows());
        self.log.clear();
        self.report = None;

        let mut table = raw.clone();
        self.run_step(TransformStep::NormalizeColumns, &mut table, Self::normalize_columns)?;
        self.run_step(TransformStep::CoerceTypes, &mut table, Self::coerce_types)?;
        self.run_step(TransformStep::FillNulls, &mut table, Self::fill_nulls)?;
        self.run_step(TransformStep::RemoveDuplicates, &mut table, Self::remove_duplicates)?;
        self.run_step(TransformStep::ValidateDates, &mut table, Self::validate_dates)?;
        self.run_step(TransformStep::NormalizeValues, &mut table, Self::normalize_values)?;
        self.run_step(TransformStep::DeriveFeatures, &mut table, Self::derive_features)?;

        let report = TransformationReport {
            steps: self.log.clone(),
            original_shape: raw.shape(),
            clean_shape: table.shape(),
            original_nulls: raw.total_nulls(),
            clean_nulls: table.total_nulls(),
        };
        log::info!(
            "Transformation complete: {:?} -> {:?}, nulls {} -> {}",
            report.original_shape,
            report.clean_shape,
            report.original_nulls,
            report.clean_nulls
        );
        self.report = Some(report);

        Ok(table)
    }

    fn run_step(
        &mut self,
        step: TransformStep,
        table: &mut Table,
        apply: fn(&Self, &mut Table) -> Result<String>,
    ) -> Result<()> {
        let rows_before = table.num_rows();
        let detail = apply(self, table)?;
        log::debug!("{}: {}", step, detail);
        self.log.push(StepRecord {
            step,
            rows_before,
            rows_after: table.num_rows(),
            detail,
        });
        Ok(())
    }

    fn headline_indices(&self, table: &Table) -> Vec<usize> {
        self.config.headlines.select(&table.column_names())
    }

    fn normalize_columns(&self, table: &mut Table) -> Result<String> {
        let before = table.column_names();
        table.rename_columns(normalize_column_name);
        let renamed = before
            .iter()
            .zip(table.column_names())
            .filter(|(old, new)| *old != new)
            .count();
        Ok(format!("{} of {} columns renamed", renamed, before.len()))
    }

    fn coerce_types(&self, table: &mut Table) -> Result<String> {
        let mut converted = 0;

        self.coerce_date_column(table)?;
        converted += 1;

        if self.coerce_label_column(table)? {
            converted += 1;
        }

        for idx in self.headline_indices(table) {
            table.map_column(idx, |value| {
                *value = match std::mem::take(value) {
                    Value::Null => Value::Text(String::new()),
                    text @ Value::Text(_) => text,
                    other => Value::Text(other.to_string()),
                };
            });
            table.set_dtype(idx, DataType::Utf8);
            converted += 1;
        }

        Ok(format!("{} columns converted", converted))
    }

    fn coerce_date_column(&self, table: &mut Table) -> Result<()> {
        let column = &self.config.date_column;
        let idx = table
            .column_index(column)
            .ok_or_else(|| EtlError::MissingColumn {
                column: column.clone(),
            })?;

        let order = DateOrder::infer(table.column_values(idx).filter_map(Value::as_str));
        if order == DateOrder::DayFirst {
            log::debug!("Reading '{}' day-first", column);
        }

        let mut present = 0;
        let mut parsed = 0;
        let values: Vec<Value> = table
            .column_values(idx)
            .map(|value| {
                let date = match value {
                    Value::Null => None,
                    Value::Date(d) => Some(*d),
                    Value::Text(s) => parse_date_with(s, order),
                    Value::Int(i) => parse_date_with(&i.to_string(), order),
                    Value::Float(_) => None,
                };
                present += usize::from(!value.is_null());
                parsed += usize::from(date.is_some());
                Value::from(date)
            })
            .collect();

        if present > 0 && parsed == 0 {
            return Err(EtlError::SchemaCoercion {
                column: column.clone(),
                detail: format!("none of {} values parsed as a date", present),
            });
        }
        if parsed < present {
            log::warn!(
                "{} values in '{}' are not valid dates and will be dropped",
                present - parsed,
                column
            );
        }

        table.upsert_column(Field::new(column.clone(), DataType::Date), values)
    }

    /// Coerce the label to integers; leaves the column untouched on failure
    fn coerce_label_column(&self, table: &mut Table) -> Result<bool> {
        let column = &self.config.label_column;
        let Some(idx) = table.column_index(column) else {
            log::warn!("Label column '{}' not found, skipping coercion", column);
            return Ok(false);
        };

        let coerced: Option<Vec<Value>> = table
            .column_values(idx)
            .map(|value| match value {
                Value::Null => Some(Value::Null),
                other => coerce_int(other).map(Value::Int),
            })
            .collect();

        match coerced {
            Some(values) => {
                table.upsert_column(Field::new(column.clone(), DataType::Int64), values)?;
                Ok(true)
            }
            None => {
                log::warn!(
                    "Could not convert '{}' to integers, leaving it unconverted",
                    column
                );
                Ok(false)
            }
        }
    }

    fn fill_nulls(&self, table: &mut Table) -> Result<String> {
        let nulls_before = table.total_nulls();
        if nulls_before == 0 {
            return Ok("no null values found".to_string());
        }

        let date_idx = table.column_index(&self.config.date_column);
        let label_idx = table.column_index(&self.config.label_column);

        for idx in 0..table.num_columns() {
            if Some(idx) == date_idx || table.column_values(idx).all(|v| !v.is_null()) {
                continue;
            }
            let Some(dtype) = table.field(idx).map(|f| f.dtype) else {
                continue;
            };

            let fill = if dtype.is_numeric() || Some(idx) == label_idx {
                let fill = column_mode(table, idx).unwrap_or(match dtype {
                    DataType::Float64 => Value::Float(0.0),
                    DataType::Utf8 => Value::Text("0".to_string()),
                    _ => Value::Int(0),
                });
                log::debug!("Filling nulls in '{}' with mode {}", table.fields()[idx].name, fill);
                fill
            } else if dtype == DataType::Utf8 {
                Value::Text(String::new())
            } else {
                continue;
            };

            table.map_column(idx, |value| {
                if value.is_null() {
                    *value = fill.clone();
                }
            });
        }

        let nulls_after = table.total_nulls();
        Ok(format!("nulls before: {}, after: {}", nulls_before, nulls_after))
    }

    fn remove_duplicates(&self, table: &mut Table) -> Result<String> {
        let removed = table.dedup_rows();
        if removed > 0 {
            log::info!("Removed {} duplicate rows", removed);
        }
        Ok(format!("{} duplicate rows removed", removed))
    }

    fn validate_dates(&self, table: &mut Table) -> Result<String> {
        let column = &self.config.date_column;
        let idx = table
            .column_index(column)
            .ok_or_else(|| EtlError::MissingColumn {
                column: column.clone(),
            })?;

        let dropped = table.retain_rows(|row| row.get(idx).is_some_and(|v| !v.is_null()));
        if dropped > 0 {
            log::info!("Dropped {} rows with invalid dates", dropped);
        }
        table.sort_by_column(idx);
        Ok(format!("{} invalid dates dropped, rows sorted by {}", dropped, column))
    }

    fn normalize_values(&self, table: &mut Table) -> Result<String> {
        let headlines = self.headline_indices(table);
        for &idx in &headlines {
            table.map_column(idx, |value| {
                if let Value::Text(text) = value {
                    let trimmed = text.trim();
                    if trimmed.len() != text.len() {
                        *text = trimmed.to_string();
                    }
                }
            });
        }
        Ok(format!("{} headline columns trimmed", headlines.len()))
    }

    fn derive_features(&self, table: &mut Table) -> Result<String> {
        let date_column = &self.config.date_column;
        let idx = table
            .column_index(date_column)
            .ok_or_else(|| EtlError::MissingColumn {
                column: date_column.clone(),
            })?;
        let dates: Vec<Option<chrono::NaiveDate>> =
            table.column_values(idx).map(Value::as_date).collect();

        let derive = |f: fn(chrono::NaiveDate) -> i64| -> Vec<Value> {
            dates.iter().map(|d| Value::from(d.map(f))).collect()
        };
        table.upsert_column(
            Field::new("year", DataType::Int64),
            derive(|d| i64::from(d.year())),
        )?;
        table.upsert_column(
            Field::new("month", DataType::Int64),
            derive(|d| i64::from(d.month())),
        )?;
        table.upsert_column(
            Field::new("day", DataType::Int64),
            derive(|d| i64::from(d.day())),
        )?;
        table.upsert_column(
            Field::new("day_of_week", DataType::Int64),
            derive(|d| i64::from(day_of_week(d))),
        )?;
        table.upsert_column(
            Field::new("quarter", DataType::Int64),
            derive(|d| i64::from(quarter(d))),
        )?;
        let mut created = 5;

        if let Some(label_idx) = table.column_index(&self.config.label_column) {
            let labels = &self.config.sentiment;
            let mut unknown = 0;
            let sentiments: Vec<Value> = table
                .column_values(label_idx)
                .map(|value| {
                    let name = coerce_int(value).and_then(|label| labels.name_for(label));
                    unknown += usize::from(name.is_none());
                    Value::from(name.unwrap_or(labels.unknown()))
                })
                .collect();
            table.upsert_column(Field::new("sentiment", DataType::Utf8), sentiments)?;
            created += 1;

            if unknown > 0 {
                log::warn!("{} labels outside the sentiment mapping", unknown);
                return Ok(format!(
                    "{} features created, {} labels mapped to '{}'",
                    created,
                    unknown,
                    labels.unknown()
                ));
            }
        }

        Ok(format!("{} features created", created))
    }
}

/// Integer view of a label cell: integers, integral floats and numeric text
fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
        Value::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| {
                s.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite() && f.fract() == 0.0)
                    .map(|f| f as i64)
            })
        }
        _ => None,
    }
}

/// Most frequent non-null value; ties go to the smallest value
fn column_mode(table: &Table, idx: usize) -> Option<Value> {
    let mut counts: BTreeMap<&Value, usize> = BTreeMap::new();
    for value in table.column_values(idx).filter(|v| !v.is_null()) {
        *counts.entry(value).or_default() += 1;
    }
    let max = counts.values().copied().max()?;
    counts
        .into_iter()
        .find(|(_, count)| *count == max)
        .map(|(value, _)| value.clone())
}

impl Transformer for SentimentTransformer {
    type Input = Table;
    type Output = Table;

    fn transform(&mut self, input: Self::Input) -> eyre::Result<Self::Output> {
        Ok(self.transform_all(&input)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn raw(rows: Vec<Vec<Value>>) -> Table {
        Table::from_rows(
            vec![
                Field::new("Date", DataType::Utf8),
                Field::new("Label", DataType::Float64),
                Field::new("Top1", DataType::Utf8),
                Field::new("Top2", DataType::Utf8),
            ],
            rows,
        )
        .unwrap()
    }

    fn row(date: &str, label: Option<f64>, top1: Option<&str>, top2: Option<&str>) -> Vec<Value> {
        vec![
            Value::from(date),
            Value::from(label),
            Value::from(top1),
            Value::from(top2),
        ]
    }

    #[test]
    fn test_three_row_scenario() {
        // bad date, exact duplicate, null label
        let table = raw(vec![
            row("2008-08-08", Some(1.0), Some("a"), Some("b")),
            row("2008-08-08", Some(1.0), Some("a"), Some("b")),
            row("garbage", None, Some("c"), None),
        ]);

        let mut transformer = SentimentTransformer::default();
        let clean = transformer.transform_all(&table).unwrap();

        assert_eq!(clean.num_rows(), 1);
        let label = clean.column_index("label").unwrap();
        assert_eq!(clean.rows()[0][label], Value::Int(1));
        assert_eq!(clean.total_nulls(), 0);
    }

    #[test]
    fn test_null_label_filled_with_mode() {
        let table = raw(vec![
            row("2008-08-08", Some(0.0), Some("a"), Some("b")),
            row("2008-08-09", Some(1.0), Some("c"), Some("d")),
            row("2008-08-10", Some(1.0), Some("e"), Some("f")),
            row("2008-08-11", None, Some("g"), Some("h")),
        ]);

        let clean = SentimentTransformer::default()
            .transform_all(&table)
            .unwrap();
        let label = clean.column_index("label").unwrap();
        assert_eq!(clean.rows()[3][label], Value::Int(1));
        assert_eq!(clean.fields()[label].dtype, DataType::Int64);
    }

    #[test]
    fn test_mode_tie_takes_smallest_and_empty_column_uses_zero() {
        let table = raw(vec![
            row("2008-08-08", Some(1.0), Some("a"), Some("b")),
            row("2008-08-09", Some(0.0), Some("c"), Some("d")),
            row("2008-08-10", None, Some("e"), Some("f")),
        ]);
        let clean = SentimentTransformer::default()
            .transform_all(&table)
            .unwrap();
        let label = clean.column_index("label").unwrap();
        // rows sorted by date; the filled row is last
        assert_eq!(clean.rows()[2][label], Value::Int(0));

        let table = raw(vec![row("2008-08-08", None, Some("a"), Some("b"))]);
        let clean = SentimentTransformer::default()
            .transform_all(&table)
            .unwrap();
        assert_eq!(clean.rows()[0][label], Value::Int(0));
    }

    #[test]
    fn test_sorts_by_date_and_derives_features() {
        let table = raw(vec![
            row("2016-07-01", Some(1.0), Some(" late "), Some("x")),
            row("2008-08-08", Some(0.0), Some("early"), None),
        ]);

        let clean = SentimentTransformer::default()
            .transform_all(&table)
            .unwrap();

        let col = |name: &str| clean.column_index(name).unwrap();
        let first = &clean.rows()[0];
        assert_eq!(
            first[col("date")],
            Value::Date(NaiveDate::from_ymd_opt(2008, 8, 8).unwrap())
        );
        assert_eq!(first[col("year")], Value::Int(2008));
        assert_eq!(first[col("month")], Value::Int(8));
        assert_eq!(first[col("day")], Value::Int(8));
        assert_eq!(first[col("day_of_week")], Value::Int(4));
        assert_eq!(first[col("quarter")], Value::Int(3));
        assert_eq!(first[col("sentiment")], Value::from("Negative"));
        assert_eq!(first[col("top2")], Value::from(""));

        let second = &clean.rows()[1];
        assert_eq!(second[col("top1")], Value::from("late"));
        assert_eq!(second[col("sentiment")], Value::from("Positive"));
    }

    #[test]
    fn test_slash_dates_use_one_order_per_column() {
        let ymd = |y, m, d| Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap());
        let dates = |clean: &Table| -> Vec<Value> {
            clean.column("date").unwrap().cloned().collect()
        };

        let month_first = raw(vec![
            row("03/04/2010", Some(1.0), Some("a"), Some("b")),
            row("12/25/2010", Some(0.0), Some("c"), Some("d")),
        ]);
        let clean = SentimentTransformer::default()
            .transform_all(&month_first)
            .unwrap();
        assert_eq!(dates(&clean), [ymd(2010, 3, 4), ymd(2010, 12, 25)]);

        let day_first = raw(vec![
            row("03/04/2010", Some(1.0), Some("a"), Some("b")),
            row("25/12/2010", Some(0.0), Some("c"), Some("d")),
        ]);
        let clean = SentimentTransformer::default()
            .transform_all(&day_first)
            .unwrap();
        assert_eq!(dates(&clean), [ymd(2010, 4, 3), ymd(2010, 12, 25)]);
        let month = clean.column_index("month").unwrap();
        assert_eq!(clean.rows()[0][month], Value::Int(4));
    }

    #[test]
    fn test_unparseable_date_column_is_fatal() {
        let table = raw(vec![
            row("yesterday", Some(1.0), Some("a"), Some("b")),
            row("tomorrow", Some(0.0), Some("c"), Some("d")),
        ]);
        let err = SentimentTransformer::default()
            .transform_all(&table)
            .unwrap_err();
        assert!(matches!(err, EtlError::SchemaCoercion { ref column, .. } if column == "date"));
    }

    #[test]
    fn test_missing_date_column_is_fatal() {
        let table = Table::from_rows(
            vec![Field::new("label", DataType::Int64)],
            vec![vec![Value::Int(1)]],
        )
        .unwrap();
        let err = SentimentTransformer::default()
            .transform_all(&table)
            .unwrap_err();
        assert!(matches!(err, EtlError::MissingColumn { .. }));
    }

    #[test]
    fn test_label_coercion_failure_is_not_fatal() {
        let table = Table::from_rows(
            vec![
                Field::new("date", DataType::Utf8),
                Field::new("label", DataType::Utf8),
            ],
            vec![
                vec![Value::from("2008-08-08"), Value::from("1")],
                vec![Value::from("2008-08-09"), Value::from("up")],
            ],
        )
        .unwrap();

        let mut transformer = SentimentTransformer::default();
        let clean = transformer.transform_all(&table).unwrap();
        let label = clean.column_index("label").unwrap();
        let sentiment = clean.column_index("sentiment").unwrap();

        assert_eq!(clean.fields()[label].dtype, DataType::Utf8);
        assert_eq!(clean.rows()[0][sentiment], Value::from("Positive"));
        assert_eq!(clean.rows()[1][sentiment], Value::from("Unknown"));
        assert_eq!(transformer.log()[1].detail, "1 columns converted");
    }

    #[test]
    fn test_log_and_report() {
        let table = raw(vec![
            row("2008-08-08", Some(1.0), Some("a"), None),
            row("2008-08-08", Some(1.0), Some("a"), None),
        ]);
        let mut transformer = SentimentTransformer::default();
        transformer.transform_all(&table).unwrap();

        let steps: Vec<TransformStep> = transformer.log().iter().map(|r| r.step).collect();
        assert_eq!(
            steps,
            vec![
                TransformStep::NormalizeColumns,
                TransformStep::CoerceTypes,
                TransformStep::FillNulls,
                TransformStep::RemoveDuplicates,
                TransformStep::ValidateDates,
                TransformStep::NormalizeValues,
                TransformStep::DeriveFeatures,
            ]
        );
        let dedup = &transformer.log()[3];
        assert_eq!((dedup.rows_before, dedup.rows_after), (2, 1));

        let report = transformer.report().unwrap();
        assert_eq!(report.original_shape, (2, 4));
        assert_eq!(report.clean_shape, (1, 10));
        assert_eq!(report.original_nulls, 2);
        assert_eq!(report.clean_nulls, 0);
    }

    #[test]
    fn test_rerun_is_a_no_op() {
        let table = raw(vec![
            row("2016-07-01", Some(1.0), Some(" b "), None),
            row("2008-08-08", None, Some("a"), Some("z")),
            row("bad", Some(0.0), Some("c"), Some("d")),
        ]);
        let mut transformer = SentimentTransformer::default();
        let once = transformer.transform_all(&table).unwrap();
        let twice = transformer.transform_all(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_explicit_headline_columns() {
        let table = Table::from_rows(
            vec![
                Field::new("date", DataType::Utf8),
                Field::new("label", DataType::Int64),
                Field::new("news", DataType::Utf8),
                Field::new("top1", DataType::Utf8),
            ],
            vec![vec![
                Value::from("2008-08-08"),
                Value::Int(1),
                Value::from("  kept  "),
                Value::from("  untouched  "),
            ]],
        )
        .unwrap();

        let config = TransformConfig {
            headlines: HeadlineColumns::Names(vec!["news".to_string()]),
            ..TransformConfig::default()
        };
        let clean = SentimentTransformer::new(config)
            .transform_all(&table)
            .unwrap();
        assert_eq!(clean.rows()[0][2], Value::from("kept"));
        assert_eq!(clean.rows()[0][3], Value::from("  untouched  "));
    }
}
