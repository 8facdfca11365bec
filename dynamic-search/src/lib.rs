//! Dynamic Search - type-ahead candidate resolution for dashboard variables.
//!
//! A search box embedded in a dashboard panel: the user types a partial
//! string, candidates are resolved asynchronously from a metrics datasource,
//! optionally reshaped with a regex capture group, and the picked value is
//! published into a dashboard variable.
//!
//! # Architecture
//!
//! The pipeline is split into pure functions and one stateful orchestrator:
//!
//! - [`validate`] - configuration completeness
//! - [`build_query`] - options to query string (`label_values(up, job)`, ...)
//! - [`transform`] - raw rows to display candidates via an optional capture group
//! - [`SearchController`] - debounce, request sequencing and cancellation
//! - [`SelectionPublisher`] - picked value to a shared variable update
//!
//! Collaborators owned by the host are reached through the outbound ports in
//! [`domain::ports::outbound`]; in-memory and tracing-backed adapters live in
//! [`adapters::outbound`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use dynamic_search::adapters::outbound::{InMemoryRegistry, TracingErrorSink};
//! use dynamic_search::SearchController;
//!
//! let controller = SearchController::new(Arc::new(registry), Arc::new(TracingErrorSink), options);
//! let candidates = controller.resolve("node").await;
//! ```

pub mod adapters;
pub mod domain;

pub use domain::{
    build_query, transform, validate, Candidate, ConfigStatus, DatasourceError, DatasourceRef,
    MissingField, PanelOptions, PanelView, PatternCompilation, QueryKind, QueryPreview,
    RawResult, RegexFeedback, SearchController, SearchMode, SearchOutcome, SearchState,
    SelectionPublisher, SelectionState,
};
