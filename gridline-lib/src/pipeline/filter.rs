//! Filter stage.

use std::collections::BTreeSet;

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

use crate::model::{Column, Row};

/// How filter text is matched against cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Case-insensitive substring match.
    #[default]
    Substring,
    /// Case-insensitive fuzzy match (nucleo scoring, any score matches).
    Fuzzy,
}

/// Per-cell matcher built once per filter pass.
enum CellMatcher {
    Substring(String),
    Fuzzy {
        pattern: Pattern,
        matcher: Box<Matcher>,
        buf: Vec<char>,
    },
}

impl CellMatcher {
    fn new(needle: &str, mode: FilterMode) -> Self {
        match mode {
            FilterMode::Substring => CellMatcher::Substring(needle.to_lowercase()),
            FilterMode::Fuzzy => CellMatcher::Fuzzy {
                pattern: Pattern::new(
                    needle,
                    CaseMatching::Ignore,
                    Normalization::Smart,
                    AtomKind::Fuzzy,
                ),
                matcher: Box::new(Matcher::new(Config::DEFAULT)),
                buf: Vec::new(),
            },
        }
    }

    fn matches(&mut self, haystack: &str) -> bool {
        match self {
            CellMatcher::Substring(needle) => haystack.to_lowercase().contains(needle.as_str()),
            CellMatcher::Fuzzy {
                pattern,
                matcher,
                buf,
            } => {
                let haystack = Utf32Str::new(haystack, buf);
                pattern.score(haystack, matcher).is_some()
            }
        }
    }
}

/// Column keys a filter pass looks at: `filter_columns` if any, else every column.
fn targeted_keys<'a>(filter_columns: &'a BTreeSet<String>, columns: &'a [Column]) -> Vec<&'a str> {
    if filter_columns.is_empty() {
        columns.iter().map(|c| c.key.as_str()).collect()
    } else {
        filter_columns.iter().map(String::as_str).collect()
    }
}

/// Keep the rows where any targeted column's text matches `text`.
///
/// Blank `text` (after trimming) keeps every row. Null and missing cells read
/// as the empty string, so they never match non-empty text. Input order is
/// preserved and the rows themselves are never touched; the result is a fresh
/// sequence of references.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use gridline_lib::model::{Column, Row};
/// use gridline_lib::pipeline::{filter, FilterMode};
///
/// let columns = vec![Column::new("name", "Name")];
/// let rows = vec![Row::new().set("name", "Apple"), Row::new().set("name", "Kiwi")];
/// let matched = filter(&rows, "app", &BTreeSet::new(), &columns, FilterMode::Substring);
/// assert_eq!(matched.len(), 1);
/// ```
pub fn filter<'a, I>(
    rows: I,
    text: &str,
    filter_columns: &BTreeSet<String>,
    columns: &[Column],
    mode: FilterMode,
) -> Vec<&'a Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let needle = text.trim();
    if needle.is_empty() {
        return rows.into_iter().collect();
    }

    let keys = targeted_keys(filter_columns, columns);
    let mut matcher = CellMatcher::new(needle, mode);

    let matched: Vec<&Row> = rows
        .into_iter()
        .filter(|row| {
            keys.iter().any(|key| {
                let value = row.get(key);
                !value.is_null() && matcher.matches(&value.to_string())
            })
        })
        .collect();

    log::trace!("filter {:?} ({:?}) kept {} rows", needle, mode, matched.len());
    matched
}
