//! Query construction from typed panel options.

use super::options::QueryKind;

/// Options required for building a query.
#[derive(Debug, Clone, Copy)]
pub struct QueryOptions<'a> {
    pub query_kind: &'a QueryKind,
    pub label: &'a str,
    pub metric: &'a str,
}

/// Build the datasource query string for the given options.
///
/// An empty string means the options cannot produce a query yet and the
/// caller must not call out to the datasource.
///
/// # Examples
///
/// ```
/// use dynamic_search::{build_query, domain::QueryOptions, QueryKind};
///
/// let query = build_query(&QueryOptions {
///     query_kind: &QueryKind::LabelValues,
///     label: "job",
///     metric: "up",
/// });
/// assert_eq!(query, "label_values(up, job)");
/// ```
pub fn build_query(options: &QueryOptions<'_>) -> String {
    let QueryOptions {
        query_kind,
        label,
        metric,
    } = *options;

    match query_kind {
        QueryKind::LabelValues => match (metric.is_empty(), label.is_empty()) {
            (false, false) => format!("label_values({metric}, {label})"),
            (true, false) => format!("label_values({label})"),
            _ => String::new(),
        },
        QueryKind::LabelNames if !metric.is_empty() => format!("label_names({metric})"),
        QueryKind::LabelNames => "label_names()".to_string(),
        QueryKind::Metrics if !metric.is_empty() => format!("metrics({metric})"),
        QueryKind::Metrics => "metrics(.*)".to_string(),
        QueryKind::Unrecognized(_) => String::new(),
    }
}
