use std::error::Error;

use tracing::error;

use crate::domain::ports::outbound::ErrorSink;

/// Error sink that writes recovered faults to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn log_error(&self, message: &str, error: &(dyn Error + 'static)) {
        error!(error = %error, "{message}");
    }
}
