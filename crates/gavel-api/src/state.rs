// SPDX-License-Identifier: BUSL-1.1
//! Application configuration and shared state.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use gavel_core::CaseRegistry;
use gavel_model_client::CompletionBackend;

use crate::prompts::PromptLibrary;

/// Service version reported by the health endpoint.
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported by the health endpoint.
pub const SERVICE_NAME: &str = "GAVEL Dispute Resolution API";

/// Runtime configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port to listen on (`GAVEL_PORT`, default 3001).
    pub port: u16,
    /// Backend base URL (`GAVEL_BACKEND_URL`).
    pub backend_url: String,
    /// Backend API key (`GAVEL_BACKEND_API_KEY`); absent means the
    /// backend is not configured and dispute routes return 503.
    pub backend_api_key: Option<String>,
    /// Backend model name (`GAVEL_BACKEND_MODEL`).
    pub backend_model: String,
    /// Directory holding the prompt pack (`GAVEL_PROMPT_DIR`).
    pub prompt_dir: PathBuf,
}

impl AppConfig {
    /// Read configuration from environment variables, with defaults.
    pub fn from_env() -> Self {
        Self {
            port: std::env::var("GAVEL_PORT")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(3001),
            backend_url: std::env::var("GAVEL_BACKEND_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".to_string()),
            backend_api_key: std::env::var("GAVEL_BACKEND_API_KEY").ok(),
            backend_model: std::env::var("GAVEL_BACKEND_MODEL")
                .unwrap_or_else(|_| "gemini-1.5-flash".to_string()),
            prompt_dir: std::env::var("GAVEL_PROMPT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            backend_url: "https://generativelanguage.googleapis.com".to_string(),
            backend_api_key: None,
            backend_model: "gemini-1.5-flash".to_string(),
            prompt_dir: PathBuf::from("."),
        }
    }
}

/// Shared application state, cheaply cloneable into handlers.
///
/// The case registry is constructed exactly once here and injected by
/// handle — there is no ambient global store.
#[derive(Clone)]
pub struct AppState {
    /// Completed-case store.
    pub registry: CaseRegistry,
    /// Generative backend, when configured.
    pub backend: Option<Arc<dyn CompletionBackend>>,
    /// Prompt pack loaded at startup.
    pub prompts: PromptLibrary,
    /// Process start instant, for uptime reporting.
    pub started_at: Instant,
}

impl AppState {
    /// Build state with no backend and an empty prompt library.
    pub fn new() -> Self {
        Self {
            registry: CaseRegistry::new(),
            backend: None,
            prompts: PromptLibrary::empty(),
            started_at: Instant::now(),
        }
    }

    /// Build state with an explicit backend and prompt library.
    pub fn with_backend(backend: Arc<dyn CompletionBackend>, prompts: PromptLibrary) -> Self {
        Self {
            registry: CaseRegistry::new(),
            backend: Some(backend),
            prompts,
            started_at: Instant::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
