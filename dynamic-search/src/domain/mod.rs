mod error;
mod models;
mod options;
mod panel;
mod pattern;
mod query;
mod transform;
mod validation;

pub mod ports;
pub mod services;

pub use error::DatasourceError;
pub use models::{Candidate, RawResult};
pub use options::{
    DatasourceRef, PanelOptions, QueryKind, SearchMode, DEFAULT_PLACEHOLDER, MIN_SEARCH_LENGTH,
};
pub use panel::{Footer, PanelView, QueryPreview, SelectionState};
pub use pattern::{PatternCompilation, RegexFeedback, RegexField};
pub use query::{build_query, QueryOptions};
pub use services::{
    SearchController, SearchOutcome, SearchState, SelectionPublisher, DEBOUNCE_DELAY,
};
pub use transform::{filter_by_input, transform};
pub use validation::{validate, ConfigStatus, MissingField};
