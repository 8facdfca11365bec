use std::error::Error;

/// One-way sink for recovered faults.
///
/// Implementations must not panic or block.
pub trait ErrorSink: Send + Sync {
    fn log_error(&self, message: &str, error: &(dyn Error + 'static));
}
