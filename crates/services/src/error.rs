//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by submission gateways.
///
/// The taxonomy matches the wire contract: `NotConfigured` is the 503
/// degraded mode, `Rejected` the 400 validation class, and everything else
/// surfaces as a generic persistence failure.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// No persistence collaborator is configured. Non-retryable; review
    /// degrades to unavailable.
    #[error("submission persistence is not configured")]
    NotConfigured,

    /// The submission failed boundary validation.
    #[error("invalid submission: {0}")]
    Rejected(String),

    #[error("submission service returned status {0}")]
    UpstreamStatus(reqwest::StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz session and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("question bank is empty")]
    Empty,

    /// The forward-transition gate (correct option + minimum reasoning
    /// length) does not hold for the current draft.
    #[error("answer gate not met for question {index}")]
    GateNotMet { index: usize },

    #[error("not an offered option: {key}")]
    UnknownOption { key: String },

    #[error("already at the first question")]
    AtStart,

    #[error("session is already reviewing")]
    AlreadyReviewing,

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
