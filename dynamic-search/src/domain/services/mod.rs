mod search_controller;
mod selection;

pub use search_controller::{SearchController, SearchOutcome, SearchState, DEBOUNCE_DELAY};
pub use selection::SelectionPublisher;
