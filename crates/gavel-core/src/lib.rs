//! # gavel-core — Dispute Adjudication Domain
//!
//! Foundational crate for the GAVEL dispute-resolution service:
//!
//! - **Case** ([`case`]): case identifiers, claimant roles, dispute
//!   categories, and the immutable case request.
//!
//! - **Decision** ([`decision`]): the validated structured adjudication
//!   record and its wire envelope.
//!
//! - **Recovery** ([`recovery`]): resilient JSON extraction from raw
//!   backend text — prose/fence normalization plus the depth-counting
//!   salvage of truncated output.
//!
//! - **Validate** ([`validate`]): the record validator that gates what the
//!   rest of the system is allowed to trust.
//!
//! - **Reasoning** ([`reasoning`]): deterministic synthesis of the 4-step
//!   reasoning trace from the request and the decision record.
//!
//! - **Registry** ([`registry`]): in-memory, write-once-per-key store of
//!   completed cases.

pub mod case;
pub mod decision;
pub mod error;
pub mod reasoning;
pub mod recovery;
pub mod registry;
pub mod validate;

// Re-export primary types for ergonomic imports.

// Errors
pub use error::ExtractionError;
pub use registry::RegistryError;

// Case model
pub use case::{CaseId, CaseRequest, ClaimantRole, DisputeCategory};

// Decision model
pub use decision::{DecisionEnvelope, DecisionRecord, MisconductFlag, RemedyAward, RemedyType};

// Extraction
pub use recovery::{extract_decision, normalize_candidate, recover_json, salvage_offset};
pub use validate::validate_decision;

// Reasoning
pub use reasoning::{
    select_rationale, synthesize_trace, RationaleContext, ReasoningStep, ReasoningTrace,
    TRACE_STEPS,
};

// Registry
pub use registry::{CaseEntry, CaseRegistry, CaseSummary};
