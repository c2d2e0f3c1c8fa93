// SPDX-License-Identifier: BUSL-1.1
//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single spec served at
//! `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "GAVEL — Dispute Resolution API",
        version = "0.1.0",
        description = "AI-judge dispute adjudication service.\n\nSubmit a dispute and receive a structured judicial decision rendered by a generative-text backend, recovered through a resilient extraction pipeline, together with a deterministic 4-step reasoning trace available on the admin console.",
        license(name = "BUSL-1.1")
    ),
    servers(
        (url = "http://localhost:3001", description = "Local development server"),
    ),
    paths(
        crate::routes::disputes::submit_dispute,
        crate::routes::admin::get_reasoning,
        crate::routes::admin::list_disputes,
        crate::routes::admin::test_backend,
        crate::routes::health::health,
        crate::routes::health::health_simple,
    ),
    components(schemas(
        crate::routes::admin::DisputeSummary,
        crate::routes::admin::ProbeResponse,
        crate::routes::health::HealthReport,
        crate::routes::health::HealthChecks,
        crate::routes::health::HealthStats,
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "disputes", description = "Dispute adjudication"),
        (name = "admin", description = "Reasoning console"),
        (name = "health", description = "Health probes"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_spec))
}

/// GET /openapi.json — The assembled spec.
async fn serve_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
