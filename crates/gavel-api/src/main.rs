// SPDX-License-Identifier: BUSL-1.1
//! GAVEL dispute-resolution API server.
//!
//! Reads configuration from the environment, wires the Gemini backend
//! when an API key is present (dispute routes return 503 without one),
//! loads the prompt pack, and serves the Axum router.

use std::net::SocketAddr;
use std::sync::Arc;

use gavel_api::prompts::PromptLibrary;
use gavel_api::state::{AppConfig, AppState};
use gavel_model_client::{CompletionBackend, GeminiClient, GeminiConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let backend: Option<Arc<dyn CompletionBackend>> = match &config.backend_api_key {
        Some(api_key) => {
            let mut gemini = GeminiConfig::new(config.backend_url.clone(), api_key.clone());
            gemini.model = config.backend_model.clone();
            match GeminiClient::new(gemini) {
                Ok(client) => Some(Arc::new(client)),
                Err(err) => {
                    tracing::error!(error = %err, "backend client misconfigured; disputes disabled");
                    None
                }
            }
        }
        None => {
            tracing::warn!("GAVEL_BACKEND_API_KEY not set; dispute routes will return 503");
            None
        }
    };

    let prompts = PromptLibrary::load(&config.prompt_dir);

    let state = AppState {
        registry: gavel_core::CaseRegistry::new(),
        backend,
        prompts,
        started_at: std::time::Instant::now(),
    };
    let app = gavel_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("gavel-api listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("server error");
}
