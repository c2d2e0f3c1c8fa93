// SPDX-License-Identifier: BUSL-1.1
//! # gavel-api — Axum API Service for GAVEL
//!
//! HTTP surface of the AI-judge dispute adjudication service.
//!
//! ## API Surface
//!
//! | Route                               | Module              | Purpose                   |
//! |-------------------------------------|---------------------|---------------------------|
//! | `POST /api/dispute`                 | [`routes::disputes`]| Adjudicate a dispute      |
//! | `GET /api/admin/reasoning/:id`      | [`routes::admin`]   | Full case entry + trace   |
//! | `GET /api/admin/disputes`           | [`routes::admin`]   | Case listing              |
//! | `GET /api/test-backend`             | [`routes::admin`]   | Backend connectivity probe|
//! | `GET /api/health`                   | [`routes::health`]  | Rich health document      |
//! | `GET /api/health/simple`            | [`routes::health`]  | Load-balancer probe       |
//! | `GET /openapi.json`                 | [`openapi`]         | OpenAPI 3 spec            |
//!
//! The adjudication pipeline lives in `gavel-core`; this crate is the thin
//! I/O shell around it: request validation, prompt assembly, the backend
//! call, and error mapping to HTTP.

pub mod error;
pub mod openapi;
pub mod prompts;
pub mod routes;
pub mod state;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// CORS is permissive: the dispute form and admin dashboard are served
/// from separate origins. Health probes and the OpenAPI spec share the
/// same router — there is no authentication anywhere on this surface.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::disputes::router())
        .merge(routes::admin::router())
        .merge(routes::health::router())
        .merge(openapi::router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
