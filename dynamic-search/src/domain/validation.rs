//! Configuration completeness checks.

use strum::Display;

use super::options::{PanelOptions, QueryKind};

/// A required option the user has not filled in yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MissingField {
    #[strum(to_string = "Datasource")]
    Datasource,
    #[strum(to_string = "Metric")]
    Metric,
    #[strum(to_string = "Target Variable")]
    TargetVariable,
    #[strum(to_string = "Label (required for Label Values query)")]
    Label,
}

/// Result of validating panel options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStatus {
    pub configured: bool,
    pub missing: Vec<MissingField>,
}

/// Check that the options are complete enough to search.
///
/// Every rule is evaluated, so `missing` lists all gaps at once.
pub fn validate(options: &PanelOptions) -> ConfigStatus {
    let mut missing = Vec::new();

    if options.datasource.is_none() {
        missing.push(MissingField::Datasource);
    }
    if options.metric.is_empty() {
        missing.push(MissingField::Metric);
    }
    if options.variable_name.is_empty() {
        missing.push(MissingField::TargetVariable);
    }
    if options.query_kind == QueryKind::LabelValues && options.label.is_empty() {
        missing.push(MissingField::Label);
    }

    ConfigStatus {
        configured: missing.is_empty(),
        missing,
    }
}
