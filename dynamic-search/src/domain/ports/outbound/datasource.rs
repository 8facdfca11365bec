use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{DatasourceError, DatasourceRef, RawResult};

/// Outbound port for the host's datasource registry.
///
/// Resolution may involve I/O and may fail; failures are logged by the
/// caller and never reach the presentation layer.
#[async_trait]
pub trait DatasourceRegistry: Send + Sync + 'static {
    /// Resolve the datasource handle for `datasource`.
    async fn get(
        &self,
        datasource: &DatasourceRef,
    ) -> Result<Arc<dyn DatasourceHandle>, DatasourceError>;
}

/// A resolved datasource instance.
pub trait DatasourceHandle: Send + Sync {
    /// Datasource uid, used for log context.
    fn uid(&self) -> &str;

    /// The metadata lookup capability, if this datasource offers one.
    ///
    /// `None` is a valid state and means no candidates can be produced.
    fn metric_lookup(&self) -> Option<&dyn MetricLookup>;
}

/// Metadata lookup, e.g. `label_values(up, job)`.
#[async_trait]
pub trait MetricLookup: Send + Sync {
    async fn lookup(
        &self,
        query: &str,
        context: &LookupContext,
    ) -> Result<Vec<RawResult>, DatasourceError>;
}

/// Per-request context passed alongside the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupContext {
    pub request_id: u64,
    /// The text the user typed; the query itself does not contain it.
    pub search_text: String,
}
