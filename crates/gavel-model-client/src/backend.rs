//! # Completion Backend Trait
//!
//! Abstracts over the generative-text service that renders judicial
//! decisions. The adjudication pipeline depends only on this seam: a
//! prompt string goes in, untrusted raw text comes out. Implementations
//! must be `Send + Sync` so they can be shared across async tasks behind
//! an `Arc`; the trait is object-safe to support runtime selection (and
//! in-process fakes in tests).

use async_trait::async_trait;

use crate::error::BackendError;

/// Health status of a completion backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendHealth {
    /// Backend is reachable and producing completions.
    Healthy,
    /// Backend is reachable but degraded (e.g. slow or partial responses).
    Degraded {
        /// Human-readable reason for the degraded state.
        reason: String,
    },
    /// Backend is not reachable or not configured.
    Unavailable {
        /// Human-readable reason for unavailability.
        reason: String,
    },
}

impl std::fmt::Display for BackendHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::Degraded { reason } => write!(f, "Degraded: {reason}"),
            Self::Unavailable { reason } => write!(f, "Unavailable: {reason}"),
        }
    }
}

/// A generative-text completion backend.
///
/// The caller treats any returned string as untrusted raw text requiring
/// normalization and parsing. Implementations must not retry internally —
/// a failure is surfaced unchanged to the caller.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Generate raw completion text for a prompt.
    ///
    /// # Errors
    ///
    /// Any [`BackendError`]; never retried at this layer.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;

    /// Probe backend connectivity with a minimal request.
    async fn probe(&self) -> BackendHealth;
}
