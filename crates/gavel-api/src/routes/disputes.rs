// SPDX-License-Identifier: BUSL-1.1
//! # Dispute Submission Route
//!
//! HTTP surface for the adjudication pipeline. One POST runs the whole
//! case: prompt assembly → backend generation → resilient extraction →
//! trace synthesis → registry insertion → decision response.
//!
//! A case is registered only after every stage has succeeded; any failure
//! surfaces as a typed error and leaves no partial record behind.

use std::time::Instant;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use gavel_core::{extract_decision, synthesize_trace, CaseEntry, CaseId, CaseRequest, DecisionEnvelope};

use crate::error::AppError;
use crate::prompts::build_dispute_prompt;
use crate::state::AppState;

/// Days granted for remedy compliance, per Article 9.1.
const COMPLIANCE_DAYS: i64 = 5;

/// Build the dispute submission router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/dispute", post(submit_dispute))
}

/// POST /api/dispute — Adjudicate a dispute.
#[utoipa::path(
    post,
    path = "/api/dispute",
    responses(
        (status = 200, description = "Decision envelope for the adjudicated case"),
        (status = 422, description = "Request validation error"),
        (status = 502, description = "Backend failed or produced unusable output"),
        (status = 503, description = "No generative backend configured"),
    ),
    tag = "disputes"
)]
pub(crate) async fn submit_dispute(
    State(state): State<AppState>,
    Json(request): Json<CaseRequest>,
) -> Result<Json<DecisionEnvelope>, AppError> {
    let started = Instant::now();

    let backend = state.backend.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("generative backend not configured".to_string())
    })?;

    if request.statement_of_claim.trim().is_empty() {
        return Err(AppError::Validation(
            "statement_of_claim must not be empty".to_string(),
        ));
    }

    let case_id = CaseId::generate();
    let received_at = Utc::now();
    let amount = request.resolved_amount();
    let deadline = received_at + Duration::days(COMPLIANCE_DAYS);
    let prompt = build_dispute_prompt(
        &state.prompts,
        &request,
        &case_id,
        amount,
        received_at,
        deadline,
    );

    tracing::info!(
        case_id = %case_id,
        category = %request.dispute_category,
        claimant = %request.claimant_type,
        amount,
        "dispute received"
    );

    let raw = backend.generate(&prompt).await?;
    let mut envelope = extract_decision(&raw)?;

    // The identifier is caller identity, not model content: stamp it so
    // the record always matches the registry key even when the backend
    // mis-echoes it.
    envelope.decision.dispute_id = case_id.to_string();

    let reasoning = synthesize_trace(&request, amount, &envelope);

    state.registry.put(CaseEntry {
        case_id: case_id.clone(),
        received_at,
        request,
        prompt,
        decision: envelope.clone(),
        reasoning,
        processing_ms: processing_ms(started),
    })?;

    tracing::info!(
        case_id = %case_id,
        confidence = envelope.decision.confidence_score,
        remedy = %envelope.decision.remedy_awarded.remedy_type.as_str(),
        "dispute adjudicated"
    );

    Ok(Json(envelope))
}

fn processing_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
