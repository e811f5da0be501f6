//! Date parsing and derived feature columns

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

const ISO_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

const MONTH_FIRST_FORMATS: [&str; 2] = ["%m/%d/%Y", "%m-%d-%Y"];

const DAY_FIRST_FORMATS: [&str; 2] = ["%d/%m/%Y", "%d-%m-%Y"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Field order used for `a/b/yyyy` and `a-b-yyyy` dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateOrder {
    #[default]
    MonthFirst,
    DayFirst,
}

impl DateOrder {
    /// Convention for a whole column: day-first only if some value cannot be
    /// read month-first but can be read day-first
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let day_first_only = |raw: &str| {
            let raw = raw.trim();
            let parses = |formats: &[&str]| {
                formats
                    .iter()
                    .any(|fmt| NaiveDate::parse_from_str(raw, fmt).is_ok())
            };
            !parses(&MONTH_FIRST_FORMATS) && parses(&DAY_FIRST_FORMATS)
        };
        match values.into_iter().any(day_first_only) {
            true => Self::DayFirst,
            false => Self::MonthFirst,
        }
    }

    fn formats(self) -> &'static [&'static str] {
        match self {
            Self::MonthFirst => &MONTH_FIRST_FORMATS,
            Self::DayFirst => &DAY_FIRST_FORMATS,
        }
    }
}

/// Parse a calendar date, reading ambiguous numeric dates month-first
///
/// Date-times are accepted and truncated to their date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_date_with(raw, DateOrder::MonthFirst)
}

/// Parse a calendar date, reading numeric dates in `order` only
pub fn parse_date_with(raw: &str, order: DateOrder) -> Option<NaiveDate> {
    let raw = raw.trim();
    ISO_FORMATS
        .iter()
        .chain(order.formats())
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Calendar quarter, 1-4
pub fn quarter(date: NaiveDate) -> u32 {
    (date.month() - 1) / 3 + 1
}

/// Day of the week, 0 = Monday .. 6 = Sunday
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Fixed mapping from label values to sentiment names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentLabels {
    labels: Vec<(i64, String)>,
    unknown: String,
}

impl Default for SentimentLabels {
    fn default() -> Self {
        Self {
            labels: vec![(0, "Negative".to_string()), (1, "Positive".to_string())],
            unknown: "Unknown".to_string(),
        }
    }
}

impl SentimentLabels {
    pub fn new(labels: Vec<(i64, String)>, unknown: impl Into<String>) -> Self {
        Self {
            labels,
            unknown: unknown.into(),
        }
    }

    /// Sentiment name for `label`, `None` if the label is outside the mapping
    pub fn name_for(&self, label: i64) -> Option<&str> {
        self.labels
            .iter()
            .find(|(value, _)| *value == label)
            .map(|(_, name)| name.as_str())
    }

    /// Name used for labels outside the mapping
    pub fn unknown(&self) -> &str {
        &self.unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2008-08-08"), Some(ymd(2008, 8, 8)));
        assert_eq!(parse_date(" 2008/08/08 "), Some(ymd(2008, 8, 8)));
        assert_eq!(parse_date("12/25/2010"), Some(ymd(2010, 12, 25)));
        assert_eq!(parse_date("25/12/2010"), None);
        assert_eq!(parse_date("20160701"), Some(ymd(2016, 7, 1)));
        assert_eq!(parse_date("2016-07-01 00:00:00"), Some(ymd(2016, 7, 1)));
        assert_eq!(parse_date("2016-07-01T09:30:00"), Some(ymd(2016, 7, 1)));
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2016-02-30"), None);
    }

    #[test]
    fn test_ambiguous_dates_read_month_first() {
        assert_eq!(parse_date("03/04/2010"), Some(ymd(2010, 3, 4)));
        assert_eq!(parse_date("03-04-2010"), Some(ymd(2010, 3, 4)));
        assert_eq!(
            parse_date_with("03/04/2010", DateOrder::DayFirst),
            Some(ymd(2010, 4, 3))
        );
        assert_eq!(parse_date_with("12/25/2010", DateOrder::DayFirst), None);
    }

    #[test]
    fn test_infer_date_order() {
        assert_eq!(
            DateOrder::infer(["03/04/2010", "12/25/2010"]),
            DateOrder::MonthFirst
        );
        assert_eq!(
            DateOrder::infer(["03/04/2010", "25/12/2010"]),
            DateOrder::DayFirst
        );
        assert_eq!(
            DateOrder::infer(["2010-03-04", "garbage"]),
            DateOrder::MonthFirst
        );
    }

    #[test]
    fn test_quarter_and_weekday() {
        assert_eq!(quarter(ymd(2016, 1, 31)), 1);
        assert_eq!(quarter(ymd(2016, 3, 31)), 1);
        assert_eq!(quarter(ymd(2016, 4, 1)), 2);
        assert_eq!(quarter(ymd(2016, 12, 31)), 4);

        // 2008-08-08 was a Friday
        assert_eq!(day_of_week(ymd(2008, 8, 8)), 4);
        assert_eq!(day_of_week(ymd(2008, 8, 11)), 0);
        assert_eq!(day_of_week(ymd(2008, 8, 10)), 6);
    }

    #[test]
    fn test_sentiment_labels() {
        let labels = SentimentLabels::default();
        assert_eq!(labels.name_for(0), Some("Negative"));
        assert_eq!(labels.name_for(1), Some("Positive"));
        assert_eq!(labels.name_for(2), None);
        assert_eq!(labels.unknown(), "Unknown");
    }
}
