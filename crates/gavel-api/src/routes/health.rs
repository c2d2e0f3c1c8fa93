// SPDX-License-Identifier: BUSL-1.1
//! # Health Routes
//!
//! Rich health document at `/api/health` (backend probe, prompt files,
//! registry stats) and a bare `/api/health/simple` for load balancers.
//!
//! Overall status: an unreachable or unconfigured backend makes the
//! service `unhealthy` (503, it cannot adjudicate); a missing prompt pack
//! only degrades it (200, the inline instructions still work).

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use gavel_model_client::BackendHealth;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::{AppState, SERVICE_NAME, SERVICE_VERSION};

/// Rich health document.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    /// Overall status: `healthy`, `degraded`, or `unhealthy`.
    pub status: String,
    /// Report timestamp (UTC).
    pub timestamp: DateTime<Utc>,
    /// Service version.
    pub version: String,
    /// Service name.
    pub service: String,
    /// Seconds since process start.
    pub uptime_secs: u64,
    /// Per-dependency check results.
    pub checks: HealthChecks,
    /// Processing statistics.
    pub stats: HealthStats,
}

/// Per-dependency check results.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthChecks {
    /// The HTTP server itself.
    pub server: String,
    /// The generative backend.
    pub backend: String,
    /// The on-disk prompt pack.
    pub prompt_files: String,
}

/// Processing statistics.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthStats {
    /// Cases adjudicated since process start.
    pub total_disputes_processed: usize,
    /// Time spent assembling this report, in milliseconds.
    pub response_time_ms: u64,
}

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/health/simple", get(health_simple))
}

/// GET /api/health — Rich health document.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service healthy or degraded", body = HealthReport),
        (status = 503, description = "Service unhealthy", body = HealthReport),
    ),
    tag = "health"
)]
pub(crate) async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let started = Instant::now();

    let backend_check = match &state.backend {
        None => "not_configured".to_string(),
        Some(backend) => match backend.probe().await {
            BackendHealth::Healthy => "healthy".to_string(),
            BackendHealth::Degraded { .. } => "degraded".to_string(),
            BackendHealth::Unavailable { .. } => "unhealthy".to_string(),
        },
    };

    let prompt_check = if state.prompts.files_present() {
        "healthy".to_string()
    } else {
        "unhealthy".to_string()
    };

    // The service cannot adjudicate without a backend; missing prompt
    // files only degrade it.
    let status = if backend_check != "healthy" {
        "unhealthy"
    } else if prompt_check != "healthy" {
        "degraded"
    } else {
        "healthy"
    };

    let report = HealthReport {
        status: status.to_string(),
        timestamp: Utc::now(),
        version: SERVICE_VERSION.to_string(),
        service: SERVICE_NAME.to_string(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        checks: HealthChecks {
            server: "healthy".to_string(),
            backend: backend_check,
            prompt_files: prompt_check,
        },
        stats: HealthStats {
            total_disputes_processed: state.registry.len(),
            response_time_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        },
    };

    let code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (code, Json(report))
}

/// GET /api/health/simple — Bare 200 for load balancers.
#[utoipa::path(
    get,
    path = "/api/health/simple",
    responses((status = 200, description = "Process is running")),
    tag = "health"
)]
pub(crate) async fn health_simple() -> &'static str {
    "OK"
}
