//! Panel options as supplied by the host's options editor.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display, EnumString};

use super::query::QueryOptions;

/// Minimum characters required before a search is triggered.
pub const MIN_SEARCH_LENGTH: usize = 3;

pub const DEFAULT_PLACEHOLDER: &str = "Search...";

/// Opaque identifier of a datasource in the host's registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasourceRef(String);

impl DatasourceRef {
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Kind of metadata query issued against the datasource.
///
/// Parsing never fails: unknown tags are kept as [`QueryKind::Unrecognized`]
/// and build an empty query.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Default, EnumString, DeserializeFromStr, SerializeDisplay,
)]
pub enum QueryKind {
    #[default]
    #[strum(serialize = "label_values")]
    LabelValues,
    #[strum(serialize = "label_names")]
    LabelNames,
    #[strum(serialize = "metrics")]
    Metrics,
    #[strum(default)]
    Unrecognized(String),
}

impl QueryKind {
    pub fn as_tag(&self) -> &str {
        match self {
            QueryKind::LabelValues => "label_values",
            QueryKind::LabelNames => "label_names",
            QueryKind::Metrics => "metrics",
            QueryKind::Unrecognized(tag) => tag,
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// How typed input is matched against candidate text. Always case-insensitive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchMode {
    #[default]
    Contains,
    StartsWith,
    Exact,
}

impl SearchMode {
    /// Both arguments are expected to be lowercased already.
    pub fn matches(&self, haystack: &str, needle: &str) -> bool {
        match self {
            SearchMode::Contains => haystack.contains(needle),
            SearchMode::StartsWith => haystack.starts_with(needle),
            SearchMode::Exact => haystack == needle,
        }
    }
}

/// Panel configuration, owned by the host and read-only to the search core.
///
/// Field names follow the host's camelCase JSON (`datasourceUid`,
/// `queryType`, `variableName`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PanelOptions {
    #[serde(rename = "datasourceUid", skip_serializing_if = "Option::is_none")]
    pub datasource: Option<DatasourceRef>,
    #[serde(rename = "queryType")]
    pub query_kind: QueryKind,
    pub label: String,
    pub metric: String,
    /// Dashboard variable updated on selection, without the `$`.
    pub variable_name: String,
    /// Optional capture pattern; empty means no transform.
    pub regex: String,
    pub min_chars: usize,
    /// 0 means unbounded.
    pub max_results: usize,
    pub placeholder: String,
    pub search_mode: SearchMode,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            datasource: None,
            query_kind: QueryKind::default(),
            label: String::new(),
            metric: String::new(),
            variable_name: String::new(),
            regex: String::new(),
            min_chars: MIN_SEARCH_LENGTH,
            max_results: 0,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            search_mode: SearchMode::default(),
        }
    }
}

impl PanelOptions {
    /// The subset of options the query builder depends on.
    pub fn query_options(&self) -> QueryOptions<'_> {
        QueryOptions {
            query_kind: &self.query_kind,
            label: &self.label,
            metric: &self.metric,
        }
    }
}
