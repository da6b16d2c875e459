//! Error types for the help-request system.

use thiserror::Error;

use crate::request::{RequestId, RequestStatus};

/// Result type alias using the helpline error type.
pub type Result<T> = std::result::Result<T, HelplineError>;

/// Main error type for the help-request system.
///
/// Every error is surfaced to the caller for display; nothing is retried or
/// recovered internally, and there is no fatal class.
#[derive(Error, Debug)]
pub enum HelplineError {
    /// Request not found
    #[error("Request not found: {0}")]
    RequestNotFound(RequestId),

    /// Request is in a state that does not permit the requested transition
    #[error("Invalid status transition: request {0} is '{1}' and cannot become '{2}'")]
    InvalidTransition(RequestId, RequestStatus, RequestStatus),

    /// Validation error (e.g., missing required field on create)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The assistant was called before an API key was configured
    #[error("API key not set. Please set your Gemini API key first.")]
    MissingApiKey,

    /// HTTP client error from a collaborator call
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Opaque failure from an upstream collaborator (LLM, geolocation)
    #[error("Upstream failure: {0}")]
    Upstream(#[from] anyhow::Error),
}
