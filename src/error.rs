use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Error taxonomy for the marketplace core.
///
/// `NotFound`, `InvalidTransition` and `AuthenticationFailed` are terminal
/// and name the offending entity or states. `Unavailable` is retryable by
/// the caller with backoff; the core never retries gateway calls itself.
/// `Conflict` means a reconciliation attempt hit a payment that is already
/// in a different terminal state: re-read, do not re-mutate.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
    #[error("webhook signature verification failed")]
    AuthenticationFailed,
    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
    #[error("payment {reference} is already {state}")]
    Conflict { reference: String, state: String },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}
