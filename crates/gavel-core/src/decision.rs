//! # Decision Record Model
//!
//! The validated structured output of an adjudicated case. Field names and
//! nesting are a compatibility contract with external consumers: the wire
//! form is a top-level `decision` object carrying `dispute_id`,
//! `dispute_category`, `rules_applied`, `confidence_score`,
//! `finding_summary`, `remedy_awarded`, `compliance_deadline`,
//! `misconduct_flag`, and `appealable`. A record is produced exactly once
//! per successful case and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::case::DisputeCategory;

// ── Remedy ─────────────────────────────────────────────────────────────

/// Kind of remedy awarded by the tribunal.
///
/// Known kinds are closed; anything else the backend names is preserved
/// verbatim in the [`Other`](RemedyType::Other) arm rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RemedyType {
    /// Full refund of the disputed amount.
    FullRefund,
    /// Partial refund of the disputed amount.
    PartialRefund,
    /// No remedy awarded.
    NoRemedy,
    /// A remedy kind outside the known enumeration.
    Other(String),
}

impl RemedyType {
    /// The canonical string identifier for serialization.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FullRefund => "full_refund",
            Self::PartialRefund => "partial_refund",
            Self::NoRemedy => "none",
            Self::Other(raw) => raw,
        }
    }

    /// The remedy kind with underscores spaced out, for prose.
    pub fn spaced(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<String> for RemedyType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "full_refund" => Self::FullRefund,
            "partial_refund" => Self::PartialRefund,
            "none" => Self::NoRemedy,
            _ => Self::Other(raw),
        }
    }
}

impl From<RemedyType> for String {
    fn from(remedy: RemedyType) -> Self {
        remedy.as_str().to_string()
    }
}

/// The remedy awarded by a decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemedyAward {
    /// Kind of remedy.
    #[serde(rename = "type")]
    pub remedy_type: RemedyType,
    /// Awarded amount in USD.
    pub amount_usd: f64,
    /// Whether the goods must be returned as a condition of the remedy.
    pub return_required: bool,
    /// Free-text notes accompanying the remedy.
    pub notes: String,
}

// ── Misconduct ─────────────────────────────────────────────────────────

/// Misconduct findings attached to a decision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MisconductFlag {
    /// Indicators of misleading conduct were identified.
    pub misleading_conduct: bool,
    /// Indicators of fraudulent behavior were identified.
    pub fraudulent_behavior: bool,
    /// Severity tier, when the tribunal assigned one.
    pub tier: Option<String>,
}

impl MisconductFlag {
    /// Whether any misconduct indicator is set.
    pub fn any(&self) -> bool {
        self.misleading_conduct || self.fraudulent_behavior
    }
}

// ── Decision Record ────────────────────────────────────────────────────

/// The validated structured adjudication output for one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRecord {
    /// Case identifier this decision belongs to.
    pub dispute_id: String,
    /// Category of the adjudicated dispute.
    pub dispute_category: DisputeCategory,
    /// Procedural rules applied, in citation order.
    pub rules_applied: Vec<String>,
    /// Tribunal confidence in the ruling, in `[0, 1]`.
    pub confidence_score: f64,
    /// Full formatted decision text.
    pub finding_summary: String,
    /// Remedy awarded.
    pub remedy_awarded: RemedyAward,
    /// Deadline for complying with the remedy.
    pub compliance_deadline: Option<DateTime<Utc>>,
    /// Misconduct findings.
    pub misconduct_flag: MisconductFlag,
    /// Whether the decision may be appealed.
    pub appealable: bool,
}

/// Wire envelope around a [`DecisionRecord`]: `{ "decision": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEnvelope {
    /// The decision itself.
    pub decision: DecisionRecord,
}
