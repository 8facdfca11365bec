use thiserror::Error;

/// Errors raised by datasource collaborators.
///
/// The search pipeline never surfaces these to its caller; they are logged
/// and the affected request resolves to an empty candidate list.
#[derive(Debug, Error)]
pub enum DatasourceError {
    #[error("datasource not found: {0}")]
    NotFound(String),
    #[error("invalid query: {0}")]
    InvalidQuery(String),
    #[error("lookup failed: {0}")]
    LookupFailed(String),
    #[error("{0}")]
    Unknown(String),
}

impl DatasourceError {
    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }
}
