//! Generative-backend client error types.

/// Errors from calls to the generative-text backend.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        /// The endpoint that was called.
        endpoint: String,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// The backend returned a non-2xx status.
    #[error("backend {endpoint} returned {status}: {body}")]
    Api {
        /// The endpoint that was called.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Response body excerpt.
        body: String,
    },

    /// Response deserialization failed.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        /// The endpoint that was called.
        endpoint: String,
        /// The underlying decode error.
        source: reqwest::Error,
    },

    /// The backend answered but produced no completion text.
    #[error("backend returned an empty completion")]
    EmptyCompletion,

    /// Client configuration is invalid.
    #[error("configuration error: {0}")]
    InvalidConfig(String),
}
