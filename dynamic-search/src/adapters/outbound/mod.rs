mod memory;
mod tracing_sink;
mod url_state;

#[cfg(test)]
pub(crate) mod mock;

pub use memory::{InMemoryDatasource, InMemoryRegistry, Series};
pub use tracing_sink::TracingErrorSink;
pub use url_state::UrlState;
