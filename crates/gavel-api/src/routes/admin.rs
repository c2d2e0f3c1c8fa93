// SPDX-License-Identifier: BUSL-1.1
//! # Admin Console Routes
//!
//! Read-only surface over the case registry for the reasoning dashboard,
//! plus a one-shot backend connectivity probe.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use gavel_core::{CaseEntry, CaseSummary};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::state::AppState;

/// Listing row returned by the dispute index.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DisputeSummary {
    /// Case identifier.
    pub dispute_id: String,
    /// When the request was received (UTC).
    pub timestamp: DateTime<Utc>,
    /// Dispute category.
    pub category: String,
    /// Which party filed the dispute.
    pub claimant_type: String,
    /// Tribunal confidence in the ruling.
    pub confidence: f64,
}

impl From<CaseSummary> for DisputeSummary {
    fn from(summary: CaseSummary) -> Self {
        Self {
            dispute_id: summary.dispute_id,
            timestamp: summary.timestamp,
            category: summary.category.as_str().to_string(),
            claimant_type: summary.claimant_type.as_str().to_string(),
            confidence: summary.confidence,
        }
    }
}

/// Response of the backend connectivity probe.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProbeResponse {
    /// Whether the probe round-tripped.
    pub success: bool,
    /// Raw probe completion text.
    pub response: String,
}

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/reasoning/:dispute_id", get(get_reasoning))
        .route("/api/admin/disputes", get(list_disputes))
        .route("/api/test-backend", get(test_backend))
}

/// GET /api/admin/reasoning/:dispute_id — Full case entry with trace.
#[utoipa::path(
    get,
    path = "/api/admin/reasoning/{dispute_id}",
    params(("dispute_id" = String, Path, description = "Case identifier")),
    responses(
        (status = 200, description = "Full case entry including the reasoning trace"),
        (status = 404, description = "No case registered under this identifier"),
    ),
    tag = "admin"
)]
pub(crate) async fn get_reasoning(
    State(state): State<AppState>,
    Path(dispute_id): Path<String>,
) -> Result<Json<CaseEntry>, AppError> {
    state
        .registry
        .get(&dispute_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("no reasoning data for dispute {dispute_id}")))
}

/// GET /api/admin/disputes — All adjudicated cases, oldest first.
#[utoipa::path(
    get,
    path = "/api/admin/disputes",
    responses(
        (status = 200, description = "Case summaries in insertion order", body = [DisputeSummary]),
    ),
    tag = "admin"
)]
pub(crate) async fn list_disputes(State(state): State<AppState>) -> Json<Vec<DisputeSummary>> {
    Json(
        state
            .registry
            .list()
            .into_iter()
            .map(DisputeSummary::from)
            .collect(),
    )
}

/// GET /api/test-backend — One-shot backend connectivity check.
#[utoipa::path(
    get,
    path = "/api/test-backend",
    responses(
        (status = 200, description = "Probe round-tripped", body = ProbeResponse),
        (status = 502, description = "Backend reachable but failed"),
        (status = 503, description = "No generative backend configured"),
    ),
    tag = "admin"
)]
pub(crate) async fn test_backend(State(state): State<AppState>) -> Result<Json<ProbeResponse>, AppError> {
    let backend = state.backend.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("generative backend not configured".to_string())
    })?;

    let response = backend
        .generate("Say 'the backend is working!' in JSON format with a field called 'message'")
        .await?;

    Ok(Json(ProbeResponse {
        success: true,
        response,
    }))
}
