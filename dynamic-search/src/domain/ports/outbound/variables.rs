/// A single-variable update of shared dashboard state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableUpdate {
    /// Variable name, without the `$` or `var-` prefix.
    pub key: String,
    pub value: String,
    /// Merge into current state rather than replacing it.
    pub merge: bool,
    /// Replace the current history entry instead of pushing a new one.
    pub replace_history: bool,
}

impl VariableUpdate {
    /// A merging update that replaces the current history entry.
    pub fn merge(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            merge: true,
            replace_history: true,
        }
    }

    /// URL query parameter carrying this variable, e.g. `var-instance`.
    pub fn param_name(&self) -> String {
        format!("var-{}", self.key)
    }
}

/// Outbound port for the host's "set variable" capability.
///
/// Fire-and-forget: the caller neither awaits nor verifies application.
pub trait VariablePublisher: Send + Sync {
    fn set_variable(&self, update: VariableUpdate);
}
