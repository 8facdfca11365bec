//! Presentation state derived from the options and the current selection.
//!
//! Nothing here renders; these are the values a host view binds to.

use std::fmt;

use super::{
    build_query,
    options::{PanelOptions, DEFAULT_PLACEHOLDER},
    services::SelectionPublisher,
    validate, Candidate, MissingField, PatternCompilation,
};

/// Preview of the query the current options will issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPreview {
    query: String,
}

impl QueryPreview {
    pub const EMPTY_HINT: &'static str = "Configure query options above";

    pub fn from_options(options: &PanelOptions) -> Self {
        Self {
            query: build_query(&options.query_options()),
        }
    }

    /// The query, or `None` when the options cannot build one yet.
    pub fn query(&self) -> Option<&str> {
        (!self.query.is_empty()).then_some(self.query.as_str())
    }
}

impl fmt::Display for QueryPreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.query().unwrap_or(Self::EMPTY_HINT))
    }
}

/// Footer under the search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Footer {
    RegexError(String),
    Hint { min_chars: usize, max_results: usize },
}

impl fmt::Display for Footer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Footer::RegexError(error) => write!(f, "Invalid regex: {error}"),
            Footer::Hint {
                min_chars,
                max_results,
            } => {
                write!(f, "Min {min_chars} characters")?;
                if *max_results > 0 {
                    write!(f, " • Max {max_results} results")?;
                }
                Ok(())
            }
        }
    }
}

/// What the panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    ConfigWarning {
        missing: Vec<MissingField>,
    },
    Search {
        placeholder: String,
        footer: Footer,
        /// Value shown in the selected badge.
        selected: Option<String>,
    },
}

impl PanelView {
    pub const WARNING_TITLE: &'static str = "Panel not configured";
    pub const WARNING_TEXT: &'static str =
        "Open panel options to set datasource, query settings, and target variable";

    pub fn build(
        options: &PanelOptions,
        compilation: &PatternCompilation,
        selection: &SelectionState,
    ) -> Self {
        let status = validate(options);
        if !status.configured {
            return PanelView::ConfigWarning {
                missing: status.missing,
            };
        }

        let footer = match &compilation.error {
            Some(error) => Footer::RegexError(error.clone()),
            None => Footer::Hint {
                min_chars: options.min_chars,
                max_results: options.max_results,
            },
        };
        let placeholder = if options.placeholder.is_empty() {
            DEFAULT_PLACEHOLDER.to_string()
        } else {
            options.placeholder.clone()
        };

        PanelView::Search {
            placeholder,
            footer,
            selected: selection
                .selected()
                .map(|candidate| candidate.value.clone())
                .filter(|value| !value.is_empty()),
        }
    }
}

/// The user's current pick, held by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    selected: Option<Candidate>,
}

impl SelectionState {
    pub fn selected(&self) -> Option<&Candidate> {
        self.selected.as_ref()
    }

    /// Store the pick and publish its value. Returns whether an update was sent.
    pub fn select(
        &mut self,
        candidate: Candidate,
        variable_name: &str,
        publisher: &SelectionPublisher,
    ) -> bool {
        let published = publisher.publish(variable_name, &candidate.value);
        self.selected = Some(candidate);
        published
    }

    /// Drop the pick; publishes the reset only if something was selected.
    pub fn clear(&mut self, variable_name: &str, publisher: &SelectionPublisher) -> bool {
        match self.selected.take() {
            Some(_) => publisher.clear(variable_name),
            None => false,
        }
    }
}
