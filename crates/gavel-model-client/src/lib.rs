//! # gavel-model-client — Generative Backend Client
//!
//! Typed Rust HTTP client for the generative-text backend that renders
//! GAVEL's judicial decisions:
//!
//! - **Backend** ([`backend`]): the [`CompletionBackend`] trait seam the
//!   adjudication pipeline depends on, plus health probing.
//!
//! - **Gemini** ([`gemini`]): production client for Google's Gemini
//!   `generateContent` API.
//!
//! - **Error** ([`error`]): structured error hierarchy with endpoint and
//!   status diagnostics.
//!
//! The client never retries: a backend failure is surfaced unchanged, and
//! returned text is untrusted raw output requiring downstream extraction.

pub mod backend;
pub mod error;
pub mod gemini;

pub use backend::{BackendHealth, CompletionBackend};
pub use error::BackendError;
pub use gemini::{GeminiClient, GeminiConfig};
