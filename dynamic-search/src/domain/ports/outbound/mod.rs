mod datasource;
mod observability;
mod variables;

pub use datasource::{DatasourceHandle, DatasourceRegistry, LookupContext, MetricLookup};
pub use observability::ErrorSink;
pub use variables::{VariablePublisher, VariableUpdate};
