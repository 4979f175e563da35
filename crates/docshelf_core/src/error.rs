use thiserror::Error;

/// User-visible failure taxonomy of catalog operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Malformed user input; the caller keeps the input for correction.
    #[error("{0}")]
    Validation(String),
    /// The roster endpoint returned no documents. Informational, not a failure.
    #[error("no documents found")]
    EmptyResult,
    /// Transport or HTTP failure talking to a remote endpoint.
    #[error("network error: {0}")]
    Network(String),
}

impl CatalogError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
