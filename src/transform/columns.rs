//! Column naming rules and headline column selection

use regex::Regex;

/// Normalise a column name: trimmed, lower-case, spaces and hyphens as `_`
///
/// # Example
/// ```
/// use stock_sentiment_etl::transform::normalize_column_name;
///
/// assert_eq!(normalize_column_name("  Top-1 Headline "), "top_1_headline");
/// ```
pub fn normalize_column_name(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Selects which columns hold free-text headlines
///
/// Selection runs against normalised column names, so configure selectors in
/// lower case.
#[derive(Debug, Clone)]
pub enum HeadlineColumns {
    /// A prefix followed by a numeric suffix, with an optional `_` between
    /// them (`top1`, `headline_12`)
    Numbered { prefixes: Vec<String> },
    /// Every column whose name matches the regular expression
    Pattern(Regex),
    /// Exactly these column names
    Names(Vec<String>),
    /// `<prefix><n>` for every `n` in `start..=end`
    IndexRange {
        prefix: String,
        start: usize,
        end: usize,
    },
}

impl Default for HeadlineColumns {
    /// `top<n>` and `headline<n>` / `headline_<n>`
    fn default() -> Self {
        Self::Numbered {
            prefixes: vec!["top".to_string(), "headline".to_string()],
        }
    }
}

impl HeadlineColumns {
    /// Build a selector from a regular expression
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::Pattern)
    }

    /// True if `name` is a headline column under this selector
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Numbered { prefixes } => prefixes.iter().any(|prefix| {
                name.strip_prefix(prefix.as_str())
                    .map(|rest| rest.strip_prefix('_').unwrap_or(rest))
                    .is_some_and(|digits| {
                        !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
                    })
            }),
            Self::Pattern(regex) => regex.is_match(name),
            Self::Names(names) => names.iter().any(|n| n == name),
            Self::IndexRange { prefix, start, end } => name
                .strip_prefix(prefix.as_str())
                .and_then(|suffix| suffix.parse::<usize>().ok().map(|n| (suffix, n)))
                .is_some_and(|(suffix, n)| {
                    (*start..=*end).contains(&n) && suffix == n.to_string()
                }),
        }
    }

    /// Indices of the headline columns among `names`
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Vec<usize> {
        names
            .iter()
            .enumerate()
            .filter(|(_, name)| self.matches(name.as_ref()))
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_column_name() {
        assert_eq!(normalize_column_name("Date"), "date");
        assert_eq!(normalize_column_name(" Label "), "label");
        assert_eq!(normalize_column_name("Top 1"), "top_1");
        assert_eq!(normalize_column_name("day-of-week"), "day_of_week");
        assert_eq!(normalize_column_name("already_clean"), "already_clean");
    }

    #[test]
    fn test_default_selector() {
        let selector = HeadlineColumns::default();
        assert!(selector.matches("top1"));
        assert!(selector.matches("top25"));
        assert!(selector.matches("headline_3"));
        assert!(!selector.matches("top"));
        assert!(!selector.matches("topic"));
        assert!(!selector.matches("date"));
        assert!(!selector.matches("day_of_week"));
    }

    #[test]
    fn test_index_range_selector() {
        let selector = HeadlineColumns::IndexRange {
            prefix: "headline_".to_string(),
            start: 1,
            end: 3,
        };
        assert!(selector.matches("headline_1"));
        assert!(selector.matches("headline_3"));
        assert!(!selector.matches("headline_4"));
        assert!(!selector.matches("headline_01"));
    }

    #[test]
    fn test_pattern_and_names() {
        let selector = HeadlineColumns::pattern(r"^news_\d+$").unwrap();
        assert_eq!(selector.select(&["date", "news_1", "news_x", "news_2"]), vec![1, 3]);

        assert!(HeadlineColumns::pattern("(").is_err());

        let selector = HeadlineColumns::Names(vec!["title".to_string()]);
        assert_eq!(selector.select(&["title", "body"]), vec![0]);
    }
}
