//! Test doubles for the outbound ports.

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{
    ports::outbound::{
        DatasourceHandle, DatasourceRegistry, ErrorSink, LookupContext, MetricLookup,
        VariablePublisher, VariableUpdate,
    },
    DatasourceError, DatasourceRef, RawResult,
};

/// Metric lookup returning fixed rows, with optional delay and failures.
///
/// Clones share call counters, so a test can keep one clone for assertions.
#[derive(Clone, Default)]
pub struct MockLookup {
    rows: Arc<Vec<RawResult>>,
    delay: Option<Duration>,
    failure: Option<String>,
    fail_on_call: Option<usize>,
    hang_on_call: Option<usize>,
    call_count: Arc<AtomicUsize>,
    queries: Arc<Mutex<Vec<String>>>,
    contexts: Arc<Mutex<Vec<LookupContext>>>,
}

impl MockLookup {
    pub fn returning(rows: Vec<RawResult>) -> Self {
        Self {
            rows: Arc::new(rows),
            ..Default::default()
        }
    }

    /// Every call fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail only the call with this zero-based index.
    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    /// Never complete the call with this zero-based index.
    pub fn hanging_on_call(mut self, call: usize) -> Self {
        self.hang_on_call = Some(call);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn last_context(&self) -> Option<LookupContext> {
        self.contexts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl MetricLookup for MockLookup {
    async fn lookup(
        &self,
        query: &str,
        context: &LookupContext,
    ) -> Result<Vec<RawResult>, DatasourceError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        self.contexts.lock().unwrap().push(context.clone());

        if self.hang_on_call == Some(call) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(DatasourceError::LookupFailed(message.clone()));
        }
        if self.fail_on_call == Some(call) {
            return Err(DatasourceError::LookupFailed(format!("call {call} failed")));
        }

        Ok(self.rows.as_ref().clone())
    }
}

struct MockDatasource {
    lookup: Option<MockLookup>,
}

impl DatasourceHandle for MockDatasource {
    fn uid(&self) -> &str {
        "mock"
    }

    fn metric_lookup(&self) -> Option<&dyn MetricLookup> {
        self.lookup.as_ref().map(|lookup| lookup as &dyn MetricLookup)
    }
}

/// Registry that resolves any uid to a single mock datasource.
#[derive(Clone)]
pub struct MockRegistry {
    datasource: Arc<MockDatasource>,
    failure: Option<String>,
    delay: Option<Duration>,
    get_count: Arc<AtomicUsize>,
}

impl MockRegistry {
    pub fn with_lookup(lookup: MockLookup) -> Self {
        Self::build(Some(lookup), None)
    }

    pub fn without_lookup() -> Self {
        Self::build(None, None)
    }

    /// Datasource resolution always fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self::build(None, Some(message.to_string()))
    }

    fn build(lookup: Option<MockLookup>, failure: Option<String>) -> Self {
        Self {
            datasource: Arc::new(MockDatasource { lookup }),
            failure,
            delay: None,
            get_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Hold every `get` for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn get_count(&self) -> usize {
        self.get_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasourceRegistry for MockRegistry {
    async fn get(
        &self,
        _datasource: &DatasourceRef,
    ) -> Result<Arc<dyn DatasourceHandle>, DatasourceError> {
        self.get_count.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(DatasourceError::unknown(message.clone()));
        }
        let handle: Arc<dyn DatasourceHandle> = self.datasource.clone();
        Ok(handle)
    }
}

/// Error sink that records messages.
#[derive(Clone, Default)]
pub struct RecordingSink {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingSink {
    pub fn count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ErrorSink for RecordingSink {
    fn log_error(&self, message: &str, error: &(dyn Error + 'static)) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("{message}: {error}"));
    }
}

/// Variable publisher that records every update.
#[derive(Clone, Default)]
pub struct RecordingPublisher {
    updates: Arc<Mutex<Vec<VariableUpdate>>>,
}

impl RecordingPublisher {
    pub fn updates(&self) -> Vec<VariableUpdate> {
        self.updates.lock().unwrap().clone()
    }
}

impl VariablePublisher for RecordingPublisher {
    fn set_variable(&self, update: VariableUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}
