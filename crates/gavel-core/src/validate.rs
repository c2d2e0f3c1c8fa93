//! # Record Validator
//!
//! Asserts that a decoded JSON value carries the minimal decision shape
//! before the rest of the system trusts it. Required fields (category,
//! confidence score, remedy object, finding summary) fail with a typed
//! error naming the field — they are never coerced and never defaulted.
//! Everything else is genuinely optional and falls back to a neutral value.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::case::DisputeCategory;
use crate::decision::{DecisionEnvelope, DecisionRecord, MisconductFlag, RemedyAward, RemedyType};
use crate::error::ExtractionError;

/// Validate a decoded value into a typed decision envelope.
///
/// # Errors
///
/// [`ExtractionError::InvalidRecord`] naming the first required field that
/// is missing or wrong-typed. The confidence score must additionally be a
/// finite number in `[0, 1]` — an out-of-domain score is rejected rather
/// than clamped.
pub fn validate_decision(value: &Value) -> Result<DecisionEnvelope, ExtractionError> {
    let decision = value
        .get("decision")
        .and_then(Value::as_object)
        .ok_or(ExtractionError::InvalidRecord { field: "decision" })?;

    let category = decision
        .get("dispute_category")
        .and_then(Value::as_str)
        .ok_or(ExtractionError::InvalidRecord {
            field: "dispute_category",
        })?;

    let confidence = decision
        .get("confidence_score")
        .and_then(Value::as_f64)
        .ok_or(ExtractionError::InvalidRecord {
            field: "confidence_score",
        })?;
    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(ExtractionError::InvalidRecord {
            field: "confidence_score",
        });
    }

    let remedy = decision
        .get("remedy_awarded")
        .and_then(Value::as_object)
        .ok_or(ExtractionError::InvalidRecord {
            field: "remedy_awarded",
        })?;

    let finding_summary = decision
        .get("finding_summary")
        .and_then(Value::as_str)
        .ok_or(ExtractionError::InvalidRecord {
            field: "finding_summary",
        })?;

    let misconduct = decision
        .get("misconduct_flag")
        .and_then(Value::as_object)
        .map(|flag| MisconductFlag {
            misleading_conduct: flag
                .get("misleading_conduct")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            fraudulent_behavior: flag
                .get("fraudulent_behavior")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            tier: flag
                .get("tier")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
        .unwrap_or_default();

    Ok(DecisionEnvelope {
        decision: DecisionRecord {
            dispute_id: decision
                .get("dispute_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            dispute_category: DisputeCategory::from(category.to_string()),
            rules_applied: decision
                .get("rules_applied")
                .and_then(Value::as_array)
                .map(|rules| {
                    rules
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            confidence_score: confidence,
            finding_summary: finding_summary.to_string(),
            remedy_awarded: RemedyAward {
                remedy_type: remedy
                    .get("type")
                    .and_then(Value::as_str)
                    .map_or(RemedyType::NoRemedy, |kind| {
                        RemedyType::from(kind.to_string())
                    }),
                amount_usd: remedy.get("amount_usd").and_then(Value::as_f64).unwrap_or(0.0),
                return_required: remedy
                    .get("return_required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                notes: remedy
                    .get("notes")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
            },
            compliance_deadline: decision
                .get("compliance_deadline")
                .and_then(Value::as_str)
                .and_then(parse_deadline),
            misconduct_flag: misconduct,
            appealable: decision
                .get("appealable")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
    })
}

/// Parse an RFC 3339 deadline, tolerating (by dropping) anything else.
fn parse_deadline(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
