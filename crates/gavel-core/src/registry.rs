//! # Case Registry
//!
//! In-memory, write-once-per-key store of completed cases, kept for the
//! admin console. Constructed once per server instance and passed by
//! handle — cheaply cloneable, all clones share the same data.
//!
//! A case entry exists here iff its case completed successfully: insertion
//! happens only after extraction, validation, and trace synthesis have all
//! succeeded, so a failed case leaves no trace in the registry.
//!
//! Operational note: entries are never evicted and nothing is persisted —
//! the store grows for the lifetime of the process and is lost on restart.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::case::{CaseId, CaseRequest, ClaimantRole, DisputeCategory};
use crate::decision::DecisionEnvelope;
use crate::reasoning::ReasoningTrace;

/// Errors from registry operations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// A second write was attempted for an existing case identifier.
    ///
    /// Identifier generation makes this unreachable in correct operation;
    /// hitting it is a programming-invariant violation, not a user error.
    #[error("case entry already registered for {case_id}")]
    Conflict {
        /// The case identifier of the rejected write.
        case_id: String,
    },
}

/// Everything recorded for one completed case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseEntry {
    /// Case identifier (equals the registry key).
    pub case_id: CaseId,
    /// When the request was received (UTC).
    pub received_at: DateTime<Utc>,
    /// The original request.
    pub request: CaseRequest,
    /// The full prompt text sent to the generative backend.
    pub prompt: String,
    /// The validated decision.
    pub decision: DecisionEnvelope,
    /// The synthesized 4-step reasoning trace.
    pub reasoning: ReasoningTrace,
    /// End-to-end processing time in milliseconds.
    pub processing_ms: u64,
}

/// Listing projection of a case entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    /// Case identifier.
    pub dispute_id: String,
    /// When the request was received (UTC).
    pub timestamp: DateTime<Utc>,
    /// Dispute category.
    pub category: DisputeCategory,
    /// Which party filed the dispute.
    pub claimant_type: ClaimantRole,
    /// Tribunal confidence in the ruling.
    pub confidence: f64,
}

/// Entry plus its insertion sequence number, used to order listings.
#[derive(Debug)]
struct Stored {
    seq: u64,
    entry: CaseEntry,
}

/// Shared registry handle.
#[derive(Clone, Default)]
pub struct CaseRegistry {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: DashMap<String, Stored>,
    next_seq: AtomicU64,
}

impl CaseRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a completed case. Write-once per identifier.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Conflict`] when the identifier is already present;
    /// the existing entry is left untouched.
    pub fn put(&self, entry: CaseEntry) -> Result<(), RegistryError> {
        match self.inner.entries.entry(entry.case_id.as_str().to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(RegistryError::Conflict {
                case_id: entry.case_id.to_string(),
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst);
                slot.insert(Stored { seq, entry });
                Ok(())
            }
        }
    }

    /// Retrieve the full entry for a case.
    pub fn get(&self, case_id: &str) -> Option<CaseEntry> {
        self.inner
            .entries
            .get(case_id)
            .map(|stored| stored.entry.clone())
    }

    /// All case summaries in insertion order.
    pub fn list(&self) -> Vec<CaseSummary> {
        let mut rows: Vec<(u64, CaseSummary)> = self
            .inner
            .entries
            .iter()
            .map(|stored| {
                let entry = &stored.entry;
                (
                    stored.seq,
                    CaseSummary {
                        dispute_id: entry.case_id.to_string(),
                        timestamp: entry.received_at,
                        category: entry.request.dispute_category.clone(),
                        claimant_type: entry.request.claimant_type,
                        confidence: entry.decision.decision.confidence_score,
                    },
                )
            })
            .collect();
        rows.sort_by_key(|(seq, _)| *seq);
        rows.into_iter().map(|(_, summary)| summary).collect()
    }

    /// Number of registered cases.
    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{DecisionRecord, MisconductFlag, RemedyAward, RemedyType};
    use crate::reasoning::synthesize_trace;

    fn entry(case_id: &str, confidence: f64) -> CaseEntry {
        let request = CaseRequest {
            claimant_type: ClaimantRole::Buyer,
            statement_of_claim: "never arrived".to_string(),
            statement_of_defence: None,
            dispute_category: DisputeCategory::NonDelivery,
            dispute_amount: Some(40.0),
            submitted_evidence: vec![],
        };
        let decision = DecisionEnvelope {
            decision: DecisionRecord {
                dispute_id: case_id.to_string(),
                dispute_category: DisputeCategory::NonDelivery,
                rules_applied: vec!["Article 5.3".to_string()],
                confidence_score: confidence,
                finding_summary: "Decision Rendered".to_string(),
                remedy_awarded: RemedyAward {
                    remedy_type: RemedyType::FullRefund,
                    amount_usd: 40.0,
                    return_required: false,
                    notes: String::new(),
                },
                compliance_deadline: None,
                misconduct_flag: MisconductFlag::default(),
                appealable: false,
            },
        };
        let reasoning = synthesize_trace(&request, 40.0, &decision);
        CaseEntry {
            case_id: CaseId::from_string(case_id),
            received_at: Utc::now(),
            request,
            prompt: "prompt".to_string(),
            decision,
            reasoning,
            processing_ms: 12,
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let registry = CaseRegistry::new();
        let original = entry("CASE-2026-1-aaaa0001", 0.9);
        registry.put(original.clone()).unwrap();

        let fetched = registry.get("CASE-2026-1-aaaa0001").unwrap();
        assert_eq!(fetched.decision, original.decision);
        assert_eq!(fetched.reasoning, original.reasoning);
        assert_eq!(fetched.processing_ms, 12);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let registry = CaseRegistry::new();
        assert!(registry.get("CASE-2026-1-missing0").is_none());
    }

    #[test]
    fn duplicate_put_is_rejected() {
        let registry = CaseRegistry::new();
        registry.put(entry("CASE-2026-1-aaaa0001", 0.9)).unwrap();

        let err = registry
            .put(entry("CASE-2026-1-aaaa0001", 0.2))
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::Conflict {
                case_id: "CASE-2026-1-aaaa0001".to_string()
            }
        );

        // The original entry survives the rejected write.
        let kept = registry.get("CASE-2026-1-aaaa0001").unwrap();
        assert_eq!(kept.decision.decision.confidence_score, 0.9);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let registry = CaseRegistry::new();
        for (index, id) in ["c-3", "c-1", "c-2"].iter().enumerate() {
            registry.put(entry(id, 0.5 + index as f64 * 0.1)).unwrap();
        }

        let summaries = registry.list();
        let ids: Vec<&str> = summaries.iter().map(|s| s.dispute_id.as_str()).collect();
        assert_eq!(ids, ["c-3", "c-1", "c-2"]);
        assert_eq!(summaries[1].confidence, 0.6);
        assert_eq!(summaries[0].claimant_type, ClaimantRole::Buyer);
    }

    #[test]
    fn len_tracks_insertions() {
        let registry = CaseRegistry::new();
        assert!(registry.is_empty());
        registry.put(entry("c-1", 0.5)).unwrap();
        registry.put(entry("c-2", 0.5)).unwrap();
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn clones_share_state() {
        let registry = CaseRegistry::new();
        let clone = registry.clone();
        clone.put(entry("c-1", 0.5)).unwrap();
        assert_eq!(registry.len(), 1);
    }
}
