use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::outbound::{VariablePublisher, VariableUpdate};

/// Publishes picked values into a dashboard variable.
pub struct SelectionPublisher {
    publisher: Arc<dyn VariablePublisher>,
}

impl SelectionPublisher {
    pub fn new(publisher: Arc<dyn VariablePublisher>) -> Self {
        Self { publisher }
    }

    /// Publish `value` into `variable_name`, merged into the current state.
    ///
    /// No-op when either is empty. Returns whether an update was sent.
    pub fn publish(&self, variable_name: &str, value: &str) -> bool {
        if variable_name.is_empty() || value.is_empty() {
            debug!(variable_name, "Nothing to publish");
            return false;
        }

        self.publisher
            .set_variable(VariableUpdate::merge(variable_name, value));
        debug!(variable_name, value, "Published selection");
        true
    }

    /// Reset `variable_name` to an empty string so subscribers see the clear.
    pub fn clear(&self, variable_name: &str) -> bool {
        if variable_name.is_empty() {
            return false;
        }

        self.publisher
            .set_variable(VariableUpdate::merge(variable_name, ""));
        debug!(variable_name, "Cleared selection");
        true
    }
}
