//! # Case Request Model
//!
//! The immutable input side of a dispute case: who is claiming, what they
//! claim, the category, and any supporting evidence descriptors. A case
//! request is received once over the wire and never mutated afterwards.

use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Identifiers ────────────────────────────────────────────────────────

/// A unique identifier for a dispute case.
///
/// Generated at request arrival as `CASE-{year}-{unix_millis}-{suffix}`
/// where the suffix is the first 8 hex characters of a random UUID. The
/// timestamp plus 32 random bits keeps the identifier collision-resistant
/// across a process lifetime well beyond 10⁶ cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaseId(String);

impl CaseId {
    /// Generate a fresh case identifier.
    pub fn generate() -> Self {
        let now = Utc::now();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!(
            "CASE-{}-{}-{}",
            now.year(),
            now.timestamp_millis(),
            &suffix[..8]
        ))
    }

    /// Wrap an existing identifier string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CaseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Claimant Role ──────────────────────────────────────────────────────

/// Which side of the transaction filed the dispute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClaimantRole {
    /// The purchasing party.
    Buyer,
    /// The selling party.
    Seller,
}

impl ClaimantRole {
    /// The canonical string name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buyer => "Buyer",
            Self::Seller => "Seller",
        }
    }

    /// The opposing party in the transaction.
    pub fn counterparty(&self) -> Self {
        match self {
            Self::Buyer => Self::Seller,
            Self::Seller => Self::Buyer,
        }
    }
}

impl std::fmt::Display for ClaimantRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Dispute Category ───────────────────────────────────────────────────

/// Categories of disputes the tribunal adjudicates.
///
/// The closed enumeration carries one explicit
/// [`Unrecognized`](DisputeCategory::Unrecognized) arm so that a category string the
/// service has never seen still round-trips losslessly instead of being
/// silently rewritten. Adding a category is a compile-time-checked change:
/// every `match` on this enum must handle it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DisputeCategory {
    /// Delivered goods are allegedly defective.
    DefectiveItem,
    /// Goods were allegedly never delivered.
    NonDelivery,
    /// Goods or services were allegedly misrepresented.
    Misrepresentation,
    /// A category string outside the known enumeration.
    Unrecognized(String),
}

impl DisputeCategory {
    /// All known categories as a slice (excludes the fallback arm).
    pub fn known() -> &'static [DisputeCategory] {
        &[
            Self::DefectiveItem,
            Self::NonDelivery,
            Self::Misrepresentation,
        ]
    }

    /// The canonical string identifier for serialization.
    pub fn as_str(&self) -> &str {
        match self {
            Self::DefectiveItem => "defective_item",
            Self::NonDelivery => "non_delivery",
            Self::Misrepresentation => "misrepresentation",
            Self::Unrecognized(raw) => raw,
        }
    }

    /// The category name with underscores spaced out, for prose.
    pub fn spaced(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl From<String> for DisputeCategory {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "defective_item" => Self::DefectiveItem,
            "non_delivery" => Self::NonDelivery,
            "misrepresentation" => Self::Misrepresentation,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<DisputeCategory> for String {
    fn from(category: DisputeCategory) -> Self {
        category.as_str().to_string()
    }
}

impl std::fmt::Display for DisputeCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ── Case Request ───────────────────────────────────────────────────────

/// A dispute-resolution request as received from the caller.
///
/// Immutable once received. Evidence descriptors are opaque to the
/// adjudication pipeline — only their count is consulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRequest {
    /// Which party filed the dispute.
    pub claimant_type: ClaimantRole,
    /// Free-text statement of the claim.
    pub statement_of_claim: String,
    /// Free-text statement of the defence, if one was submitted.
    #[serde(default)]
    pub statement_of_defence: Option<String>,
    /// Category of the dispute.
    pub dispute_category: DisputeCategory,
    /// Disputed monetary amount in USD, if stated explicitly.
    #[serde(default)]
    pub dispute_amount: Option<f64>,
    /// Opaque evidence descriptors (strings or objects).
    #[serde(default)]
    pub submitted_evidence: Vec<serde_json::Value>,
}

impl CaseRequest {
    /// Whether a non-empty defence statement was submitted.
    pub fn has_defence(&self) -> bool {
        self.statement_of_defence
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }

    /// Number of submitted evidence descriptors.
    pub fn evidence_count(&self) -> usize {
        self.submitted_evidence.len()
    }

    /// The disputed amount used throughout the pipeline.
    ///
    /// The explicit `dispute_amount` wins; otherwise the first dollar
    /// figure found in the claim text; otherwise 100.0.
    pub fn resolved_amount(&self) -> f64 {
        self.dispute_amount
            .or_else(|| scan_dollar_amount(&self.statement_of_claim))
            .unwrap_or(100.0)
    }
}

/// Scan text for the first number, optionally `$`-prefixed and optionally
/// carrying a two-digit decimal part (`250`, `$49.99`).
///
/// Written as a hand scanner rather than a regex: the digits are taken as
/// one run, and a fractional part is only included when a `.` is followed
/// by at least two digits, of which exactly two are consumed.
fn scan_dollar_amount(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let mut end = i;
            if bytes.get(i) == Some(&b'.')
                && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_digit)
            {
                end = i + 3;
            }
            return text[start..end].parse().ok();
        }
        i += 1;
    }
    None
}
