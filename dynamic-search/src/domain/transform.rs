//! Local filtering and capture-group transform of datasource rows.

use regex::Regex;

use super::models::{Candidate, RawResult};
use super::options::SearchMode;

/// Keep rows whose text matches `input` case-insensitively.
///
/// An empty input keeps every row. Source order is preserved.
pub fn filter_by_input(rows: Vec<RawResult>, input: &str, mode: SearchMode) -> Vec<RawResult> {
    if input.is_empty() {
        return rows;
    }

    let needle = input.to_lowercase();
    rows.into_iter()
        .filter(|row| mode.matches(&row.text().to_lowercase(), &needle))
        .collect()
}

/// Map raw rows to candidates, extracting capture group 1 when it matches.
///
/// Rows are never dropped or reordered. Without a pattern, or when a row does
/// not match, or matches with an absent or empty group 1, the full row text
/// is used.
///
/// # Examples
///
/// ```
/// use dynamic_search::{transform, RawResult};
/// use regex::Regex;
///
/// let pattern = Regex::new(r"node-(\d+)").unwrap();
/// let candidates = transform(&[RawResult::new("node-01")], Some(&pattern));
/// assert_eq!(candidates[0].value, "01");
/// ```
pub fn transform(rows: &[RawResult], pattern: Option<&Regex>) -> Vec<Candidate> {
    rows.iter()
        .map(|row| {
            let text = row.text();
            let captured = pattern
                .and_then(|pattern| pattern.captures(text))
                .and_then(|captures| captures.get(1))
                .map(|group| group.as_str())
                .filter(|group| !group.is_empty());

            Candidate::from_text(captured.unwrap_or(text), row.description.clone())
        })
        .collect()
}
