//! In-memory metrics datasource answering metadata queries over fixed series.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    ports::outbound::{DatasourceHandle, DatasourceRegistry, LookupContext, MetricLookup},
    DatasourceError, DatasourceRef, RawResult,
};

// Query patterns compiled once
static LABEL_VALUES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^label_values\(\s*(?:([^,()]+?)\s*,\s*)?([^,()]+?)\s*\)$").unwrap()
});
static LABEL_NAMES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^label_names\(\s*([^,()]*?)\s*\)$").unwrap());
static METRICS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^metrics\((.*)\)$").unwrap());

/// One time series: a metric name plus its label set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub metric: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl Series {
    pub fn new<K, V>(metric: impl Into<String>, labels: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            metric: metric.into(),
            labels: labels
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Datasource backed by a fixed list of series.
///
/// Understands the metadata query forms produced by the query builder:
/// `label_values([metric, ]label)`, `label_names([metric])` and
/// `metrics(<regex>)`. Results are de-duplicated and sorted.
#[derive(Debug, Clone)]
pub struct InMemoryDatasource {
    uid: String,
    series: Vec<Series>,
    lookup_enabled: bool,
}

impl InMemoryDatasource {
    pub fn new(uid: impl Into<String>, series: Vec<Series>) -> Self {
        Self {
            uid: uid.into(),
            series,
            lookup_enabled: true,
        }
    }

    /// Load series from a JSON array of `{"metric": .., "labels": {..}}`.
    pub fn from_json(uid: impl Into<String>, json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(uid, serde_json::from_str(json)?))
    }

    /// A datasource that offers no metric lookup capability.
    pub fn without_lookup(uid: impl Into<String>) -> Self {
        Self {
            lookup_enabled: false,
            ..Self::new(uid, Vec::new())
        }
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    fn evaluate(&self, query: &str) -> Result<BTreeSet<String>, DatasourceError> {
        let query = query.trim();

        if let Some(captures) = LABEL_VALUES_PATTERN.captures(query) {
            let metric = captures.get(1).map(|m| m.as_str());
            let label = &captures[2];
            return Ok(self
                .matching_series(metric)
                .filter_map(|series| series.labels.get(label).cloned())
                .collect());
        }

        if let Some(captures) = LABEL_NAMES_PATTERN.captures(query) {
            let metric = Some(&captures[1]).filter(|m| !m.is_empty());
            return Ok(self
                .matching_series(metric)
                .flat_map(|series| series.labels.keys().cloned())
                .collect());
        }

        if let Some(captures) = METRICS_PATTERN.captures(query) {
            let pattern = Regex::new(&format!("^(?:{})$", &captures[1]))
                .map_err(|e| DatasourceError::InvalidQuery(e.to_string()))?;
            return Ok(self
                .series
                .iter()
                .filter(|series| pattern.is_match(&series.metric))
                .map(|series| series.metric.clone())
                .collect());
        }

        Err(DatasourceError::InvalidQuery(query.to_string()))
    }

    fn matching_series<'a>(&'a self, metric: Option<&'a str>) -> impl Iterator<Item = &'a Series> {
        self.series
            .iter()
            .filter(move |series| metric.map_or(true, |metric| series.metric == metric))
    }
}

impl DatasourceHandle for InMemoryDatasource {
    fn uid(&self) -> &str {
        &self.uid
    }

    fn metric_lookup(&self) -> Option<&dyn MetricLookup> {
        if self.lookup_enabled {
            Some(self)
        } else {
            None
        }
    }
}

#[async_trait]
impl MetricLookup for InMemoryDatasource {
    async fn lookup(
        &self,
        query: &str,
        context: &LookupContext,
    ) -> Result<Vec<RawResult>, DatasourceError> {
        let values = self.evaluate(query)?;
        debug!(
            datasource = %self.uid,
            query,
            request_id = context.request_id,
            rows = values.len(),
            "In-memory lookup"
        );
        Ok(values.into_iter().map(RawResult::new).collect())
    }
}

/// Registry resolving datasource uids to registered handles.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    datasources: HashMap<String, Arc<dyn DatasourceHandle>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle under its own uid.
    pub fn with_datasource(mut self, handle: Arc<dyn DatasourceHandle>) -> Self {
        self.datasources.insert(handle.uid().to_string(), handle);
        self
    }

    pub fn len(&self) -> usize {
        self.datasources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasources.is_empty()
    }
}

#[async_trait]
impl DatasourceRegistry for InMemoryRegistry {
    async fn get(
        &self,
        datasource: &DatasourceRef,
    ) -> Result<Arc<dyn DatasourceHandle>, DatasourceError> {
        self.datasources
            .get(datasource.as_str())
            .cloned()
            .ok_or_else(|| DatasourceError::NotFound(datasource.to_string()))
    }
}
