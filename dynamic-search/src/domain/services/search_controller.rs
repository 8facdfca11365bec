//! Debounced, sequenced candidate resolution.
//!
//! Every call to [`SearchController::resolve`] becomes a request with a
//! strictly increasing id and its own cancellation token. Starting a request
//! cancels the previous one, so only the newest request's token is ever live.
//! After each suspension point (debounce, registry lookup, metric lookup) the
//! request re-checks that it is still the newest; stale requests settle to an
//! empty list instead of an error.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

use strum::Display;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::domain::{
    build_query, filter_by_input,
    ports::outbound::{DatasourceRegistry, ErrorSink, LookupContext},
    transform, Candidate, PanelOptions, PatternCompilation,
};

/// Quiet interval after the last keystroke before a lookup is issued.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(350);

/// Phase of the newest request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SearchState {
    Idle,
    Debouncing,
    Fetching,
}

/// How the newest finished request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SearchOutcome {
    /// A guard short-circuited before debouncing (no datasource, input too short).
    Skipped,
    Resolved,
    /// A newer request, an options change or teardown took over.
    Superseded,
    /// Datasource resolution or lookup failed; the fault was logged.
    Failed,
}

struct ActiveRequest {
    id: u64,
    token: CancellationToken,
    state: SearchState,
    outcome: Option<SearchOutcome>,
}

struct Slot {
    next_id: u64,
    active: ActiveRequest,
    closed: bool,
}

/// Options snapshot with the pattern compiled once per change.
struct Prepared {
    options: PanelOptions,
    compilation: PatternCompilation,
}

impl Prepared {
    fn new(options: PanelOptions, previous: Option<&Prepared>) -> Self {
        let compilation = match previous {
            Some(previous) if previous.options.regex == options.regex => {
                previous.compilation.clone()
            }
            _ => PatternCompilation::compile(&options.regex),
        };
        if let Some(error) = &compilation.error {
            warn!(pattern = %options.regex, error = %error, "Invalid capture pattern, results will not be transformed");
        }
        Self {
            options,
            compilation,
        }
    }
}

/// Orchestrates debounce, lookup and result shaping for one search box.
///
/// # Type Parameters
///
/// * `R` - Registry used to resolve the configured datasource
///
/// # Examples
///
/// ```ignore
/// let controller = SearchController::new(registry, Arc::new(TracingErrorSink), options);
/// let candidates = controller.resolve("node").await;
/// ```
pub struct SearchController<R: DatasourceRegistry> {
    registry: Arc<R>,
    sink: Arc<dyn ErrorSink>,
    debounce: Duration,
    prepared: RwLock<Arc<Prepared>>,
    slot: Mutex<Slot>,
}

impl<R: DatasourceRegistry> SearchController<R> {
    pub fn new(registry: Arc<R>, sink: Arc<dyn ErrorSink>, options: PanelOptions) -> Self {
        Self {
            registry,
            sink,
            debounce: DEBOUNCE_DELAY,
            prepared: RwLock::new(Arc::new(Prepared::new(options, None))),
            slot: Mutex::new(Slot {
                next_id: 0,
                active: ActiveRequest {
                    id: 0,
                    token: CancellationToken::new(),
                    state: SearchState::Idle,
                    outcome: None,
                },
                closed: false,
            }),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Replace the options; recompiles the pattern if it changed.
    ///
    /// Any in-flight request was built from the old options and is cancelled.
    pub fn set_options(&self, options: PanelOptions) {
        {
            let mut prepared = self
                .prepared
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let previous: &Prepared = &prepared;
            let next = Prepared::new(options, Some(previous));
            *prepared = Arc::new(next);
        }
        self.lock_slot().active.token.cancel();
    }

    pub fn options(&self) -> PanelOptions {
        self.prepared().options.clone()
    }

    /// Compile error of the configured pattern, shown as configuration feedback.
    pub fn pattern_error(&self) -> Option<String> {
        self.prepared().compilation.error.clone()
    }

    pub fn compilation(&self) -> PatternCompilation {
        self.prepared().compilation.clone()
    }

    pub fn state(&self) -> SearchState {
        self.lock_slot().active.state
    }

    pub fn last_outcome(&self) -> Option<SearchOutcome> {
        self.lock_slot().active.outcome
    }

    /// Id of the newest request, 0 before the first.
    pub fn current_request_id(&self) -> u64 {
        self.lock_slot().active.id
    }

    /// Tear down: signal the outstanding request and ignore further input.
    pub fn close(&self) {
        let mut slot = self.lock_slot();
        slot.closed = true;
        slot.active.token.cancel();
        slot.active.state = SearchState::Idle;
    }

    pub fn is_closed(&self) -> bool {
        self.lock_slot().closed
    }

    /// Resolve candidates for the current input.
    ///
    /// Never fails: guards, stale requests and datasource faults all settle
    /// to an empty list.
    #[tracing::instrument(skip(self), fields(request_id))]
    pub async fn resolve(&self, input: &str) -> Vec<Candidate> {
        let Some((id, token)) = self.begin() else {
            debug!("Search controller closed, ignoring input");
            return vec![];
        };
        tracing::Span::current().record("request_id", id);

        let prepared = self.prepared();
        // The error side carries why the request produced nothing.
        let (outcome, candidates) = match self.run(id, &token, input, &prepared).await {
            Ok(candidates) => (SearchOutcome::Resolved, candidates),
            Err(outcome) => (outcome, vec![]),
        };
        self.finish(id, outcome);
        candidates
    }

    async fn run(
        &self,
        id: u64,
        token: &CancellationToken,
        input: &str,
        prepared: &Prepared,
    ) -> Result<Vec<Candidate>, SearchOutcome> {
        let options = &prepared.options;

        let Some(datasource) = options.datasource.as_ref() else {
            debug!("No datasource configured");
            return Err(SearchOutcome::Skipped);
        };
        if input.chars().count() < options.min_chars {
            return Err(SearchOutcome::Skipped);
        }

        self.transition(id, SearchState::Debouncing);
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                debug!("Debounce abandoned by newer input");
                return Err(SearchOutcome::Superseded);
            }
            _ = tokio::time::sleep(self.debounce) => {}
        }
        self.ensure_current(id, token)?;

        self.transition(id, SearchState::Fetching);
        let handle = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(SearchOutcome::Superseded),
            handle = self.registry.get(datasource) => handle,
        };
        let handle = handle.map_err(|e| {
            self.sink
                .log_error(&format!("Failed to resolve datasource {datasource}"), &e);
            SearchOutcome::Failed
        })?;
        self.ensure_current(id, token)?;

        let Some(lookup) = handle.metric_lookup() else {
            debug!(datasource = handle.uid(), "Datasource has no metric lookup");
            return Ok(vec![]);
        };

        let query = build_query(&options.query_options());
        if query.is_empty() {
            debug!(query_kind = %options.query_kind, "Options do not produce a query");
            return Ok(vec![]);
        }

        let context = LookupContext {
            request_id: id,
            search_text: input.to_string(),
        };
        // Dropping the lookup future on cancellation aborts it where the
        // transport supports that; the id check below is what guarantees it.
        let rows = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(SearchOutcome::Superseded),
            rows = lookup.lookup(&query, &context) => rows,
        };
        let rows = rows.map_err(|e| {
            self.sink.log_error(
                &format!("Failed to load options from {} for query {query}", handle.uid()),
                &e,
            );
            SearchOutcome::Failed
        })?;
        self.ensure_current(id, token)?;

        let rows = filter_by_input(rows, input, options.search_mode);
        if rows.is_empty() {
            return Ok(vec![]);
        }

        let mut candidates = transform(&rows, prepared.compilation.pattern.as_ref());
        if options.max_results > 0 {
            candidates.truncate(options.max_results);
        }

        debug!(query = %query, candidates = candidates.len(), "Search resolved");
        Ok(candidates)
    }

    fn begin(&self) -> Option<(u64, CancellationToken)> {
        let mut slot = self.lock_slot();
        if slot.closed {
            return None;
        }

        slot.active.token.cancel();
        slot.next_id += 1;
        let token = CancellationToken::new();
        slot.active = ActiveRequest {
            id: slot.next_id,
            token: token.clone(),
            state: SearchState::Idle,
            outcome: None,
        };
        Some((slot.next_id, token))
    }

    fn ensure_current(&self, id: u64, token: &CancellationToken) -> Result<(), SearchOutcome> {
        if token.is_cancelled() || self.lock_slot().active.id != id {
            debug!(request_id = id, "Discarding stale search request");
            return Err(SearchOutcome::Superseded);
        }
        Ok(())
    }

    fn transition(&self, id: u64, state: SearchState) {
        let mut slot = self.lock_slot();
        if slot.active.id == id {
            debug!(request_id = id, from = %slot.active.state, to = %state, "Search state transition");
            slot.active.state = state;
        }
    }

    fn finish(&self, id: u64, outcome: SearchOutcome) {
        let mut slot = self.lock_slot();
        if slot.active.id == id {
            slot.active.state = SearchState::Idle;
            slot.active.outcome = Some(outcome);
        }
        debug!(request_id = id, %outcome, "Search request finished");
    }

    fn prepared(&self) -> Arc<Prepared> {
        self.prepared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: DatasourceRegistry> Drop for SearchController<R> {
    fn drop(&mut self) {
        self.close();
    }
}
