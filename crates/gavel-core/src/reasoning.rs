//! # Reasoning Trace Synthesis
//!
//! Derives a fixed 4-step narrative explaining how a decision record
//! relates to the original case request. The synthesizer is a pure
//! function of (request, amount, record): it never calls the generative
//! backend, never re-parses anything, and identical inputs always produce
//! the identical trace.
//!
//! Step order is fixed: Initial Case Assessment → Evidence Evaluation →
//! Legal Framework Analysis → Final Decision Formulation.
//!
//! The step-4 rationale is selected from an ordered table of
//! (predicate, rationale) pairs evaluated top to bottom, first match wins
//! — the priority order is explicit data rather than nested conditionals.

use serde::{Deserialize, Serialize};

use crate::case::{CaseRequest, ClaimantRole, DisputeCategory};
use crate::decision::{DecisionEnvelope, RemedyType};

/// Number of steps in every reasoning trace.
pub const TRACE_STEPS: usize = 4;

/// Preview bound applied to claim and defence statements.
const PREVIEW_CHARS: usize = 150;

/// One labeled step of a reasoning trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningStep {
    /// 1-based step index.
    pub step: u32,
    /// Step title.
    pub title: String,
    /// Narrative of what was examined.
    pub thought: String,
    /// Narrative of what was concluded.
    pub conclusion: String,
}

/// A complete reasoning trace: exactly four steps, in fixed order.
pub type ReasoningTrace = [ReasoningStep; TRACE_STEPS];

// ── Rationale table ────────────────────────────────────────────────────

/// Inputs to rationale selection for the final step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RationaleContext {
    /// Confidence as a whole percentage, `round(score × 100)`.
    pub percent: u32,
    /// A non-empty defence statement was submitted.
    pub has_defence: bool,
    /// At least one evidence descriptor was submitted.
    pub has_evidence: bool,
    /// Any misconduct indicator is set on the record.
    pub misconduct: bool,
}

const HIGH_NO_DEFENCE: &str = "The high confidence stems from the absence of a defence statement, which under Article 5.4 allows for adverse inference. The uncontested claims and evidence strongly support this ruling.";
const HIGH_MISCONDUCT: &str = "The high confidence reflects clear indicators of misconduct identified in the submitted materials. The evidence overwhelmingly contradicts one party's claims, making the decision straightforward.";
const HIGH_DEFAULT: &str = "The high confidence is due to consistent evidence alignment and clear application of relevant rules. Both parties' submissions were coherent, but the evidence strongly favored one side.";
const MODERATE_NO_EVIDENCE: &str = "The moderate confidence reflects reliance primarily on party statements without supporting documentation. While the claims appear credible, additional evidence would have strengthened the determination.";
const MODERATE_DEFAULT: &str = "The moderate confidence indicates some conflicting elements in the evidence or partially applicable rules. The preponderance of evidence supports this ruling, though some uncertainties remain.";
const LOW_DEFAULT: &str = "The lower confidence reflects significant gaps in evidence or conflicting statements that could not be fully resolved. This decision represents the most probable outcome based on available information, but substantial uncertainties exist.";

fn high_without_defence(c: &RationaleContext) -> bool {
    c.percent >= 80 && !c.has_defence
}
fn high_with_misconduct(c: &RationaleContext) -> bool {
    c.percent >= 80 && c.misconduct
}
fn high(c: &RationaleContext) -> bool {
    c.percent >= 80
}
fn moderate_without_evidence(c: &RationaleContext) -> bool {
    c.percent >= 60 && !c.has_evidence
}
fn moderate(c: &RationaleContext) -> bool {
    c.percent >= 60
}
fn low(_: &RationaleContext) -> bool {
    true
}

/// Ordered (predicate, rationale) pairs; the first matching row wins.
const RATIONALE_TABLE: &[(fn(&RationaleContext) -> bool, &str)] = &[
    (high_without_defence, HIGH_NO_DEFENCE),
    (high_with_misconduct, HIGH_MISCONDUCT),
    (high, HIGH_DEFAULT),
    (moderate_without_evidence, MODERATE_NO_EVIDENCE),
    (moderate, MODERATE_DEFAULT),
    (low, LOW_DEFAULT),
];

/// Select the rationale sentence for a context. Total: the final table row
/// always matches.
pub fn select_rationale(context: &RationaleContext) -> &'static str {
    RATIONALE_TABLE
        .iter()
        .find(|(predicate, _)| predicate(context))
        .map_or(LOW_DEFAULT, |(_, rationale)| rationale)
}

// ── Synthesis ──────────────────────────────────────────────────────────

/// Synthesize the 4-step reasoning trace for a validated decision.
///
/// `amount` is the disputed amount the pipeline resolved for the case
/// (see [`CaseRequest::resolved_amount`]).
pub fn synthesize_trace(
    request: &CaseRequest,
    amount: f64,
    envelope: &DecisionEnvelope,
) -> ReasoningTrace {
    [
        assessment_step(request, amount),
        evidence_step(request, envelope),
        framework_step(request, envelope),
        determination_step(request, envelope),
    ]
}

/// Step 1 — restate the claim and classify the dispute.
fn assessment_step(request: &CaseRequest, amount: f64) -> ReasoningStep {
    let (claim_preview, truncated) = preview(&request.statement_of_claim);
    let ellipsis = if truncated { "..." } else { "" };
    ReasoningStep {
        step: 1,
        title: "Initial Case Assessment".to_string(),
        thought: format!(
            "Reviewing the {}'s claim: \"{claim_preview}{ellipsis}\"",
            request.claimant_type
        ),
        conclusion: format!(
            "This is a {} dispute where the {} seeks ${amount}. {}",
            request.dispute_category,
            request.claimant_type,
            category_gloss(&request.dispute_category)
        ),
    }
}

/// Step 2 — weigh evidence and the counterparty's response.
fn evidence_step(request: &CaseRequest, envelope: &DecisionEnvelope) -> ReasoningStep {
    let evidence_count = request.evidence_count();
    let examined = if evidence_count > 0 {
        format!("{evidence_count} piece(s) of submitted evidence")
    } else {
        "the statements provided".to_string()
    };

    let (defence_preview, ellipsis) = match request.statement_of_defence.as_deref() {
        Some(defence) => {
            let (text, truncated) = preview(defence);
            (text, if truncated { "..." } else { "" })
        }
        None => ("No defence submitted".to_string(), ""),
    };

    let facts = established_facts(&envelope.decision.finding_summary, 2);
    let mut conclusion = if facts.is_empty() {
        "Evidence has been evaluated for credibility and relevance.".to_string()
    } else {
        format!("Key findings: {}", facts.join("; "))
    };
    if envelope.decision.misconduct_flag.misleading_conduct {
        conclusion.push_str(" Note: Indicators of misleading conduct were identified.");
    }

    ReasoningStep {
        step: 2,
        title: "Evidence Evaluation".to_string(),
        thought: format!(
            "Analyzing {examined} along with the {}'s response: \"{defence_preview}{ellipsis}\"",
            request.claimant_type.counterparty()
        ),
        conclusion,
    }
}

/// Step 3 — cite the applied rules and assign the burden of proof.
fn framework_step(request: &CaseRequest, envelope: &DecisionEnvelope) -> ReasoningStep {
    let rules = &envelope.decision.rules_applied;

    let families: Vec<&str> = [
        ("Article 5.3", "burden of proof requirements"),
        ("Article 7.3", "incorrect item procedures"),
        ("Article 8.1", "remedy provisions"),
    ]
    .iter()
    .filter(|(article, _)| rules.iter().any(|rule| rule == article))
    .map(|(_, family)| *family)
    .collect();

    let thought = if families.is_empty() {
        format!(
            "Applying procedural rules specific to {} disputes.",
            request.dispute_category.spaced()
        )
    } else {
        format!(
            "Applying procedural rules specific to {} disputes, including {}.",
            request.dispute_category.spaced(),
            oxford_join(&families)
        )
    };

    let listing = if rules.is_empty() {
        "No specific procedural rules were cited.".to_string()
    } else {
        let shown: Vec<&str> = rules.iter().take(3).map(String::as_str).collect();
        let remainder = if rules.len() > 3 {
            format!(" and {} others", rules.len() - 3)
        } else {
            String::new()
        };
        format!(
            "Applied {} relevant rules: {}{remainder}.",
            rules.len(),
            shown.join(", ")
        )
    };

    let burden = match request.claimant_type {
        ClaimantRole::Buyer => {
            "The burden of proof rests with the Buyer to substantiate their claim."
        }
        ClaimantRole::Seller => "The Seller must demonstrate compliance with transaction terms.",
    };

    ReasoningStep {
        step: 3,
        title: "Legal Framework Analysis".to_string(),
        thought,
        conclusion: format!("{listing} {burden}"),
    }
}

/// Step 4 — select the rationale and state the ruling.
fn determination_step(request: &CaseRequest, envelope: &DecisionEnvelope) -> ReasoningStep {
    let decision = &envelope.decision;
    // Score is validated into [0,1], so the percentage fits in u32.
    let percent = (decision.confidence_score * 100.0).round() as u32;

    let context = RationaleContext {
        percent,
        has_defence: request.has_defence(),
        has_evidence: request.evidence_count() > 0,
        misconduct: decision.misconduct_flag.any(),
    };

    let weighing = if percent >= 80 {
        "the strong evidence presented"
    } else if percent >= 60 {
        "the preponderance of evidence"
    } else {
        "the available evidence with some uncertainties"
    };

    let amount = decision.remedy_awarded.amount_usd;
    let prevailing = if amount > 0.0 {
        request.claimant_type
    } else {
        request.claimant_type.counterparty()
    };

    let remedy_sentence = match &decision.remedy_awarded.remedy_type {
        RemedyType::FullRefund => format!("Full refund of ${amount} ordered."),
        RemedyType::PartialRefund => format!("Partial refund of ${amount} ordered."),
        RemedyType::NoRemedy => "No remedy awarded.".to_string(),
        other @ RemedyType::Other(_) => format!("{} of ${amount} ordered.", other.spaced()),
    };

    ReasoningStep {
        step: 4,
        title: "Final Decision Formulation".to_string(),
        thought: format!(
            "After weighing the evidence against applicable rules, considering {weighing}, \
             a determination has been reached. {}",
            select_rationale(&context)
        ),
        conclusion: format!(
            "Ruling in favor of the {prevailing}. {remedy_sentence} Confidence level: {percent}%."
        ),
    }
}

// ── Text helpers ───────────────────────────────────────────────────────

/// Bounded preview of a statement: first 150 characters, newlines
/// collapsed to spaces, trimmed. The flag reports whether anything was
/// cut off.
fn preview(text: &str) -> (String, bool) {
    let truncated = text.chars().count() > PREVIEW_CHARS;
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    (head.replace('\n', " ").trim().to_string(), truncated)
}

/// One-sentence gloss per category. Exhaustive over the closed
/// enumeration; the fallback arm covers anything unrecognized.
fn category_gloss(category: &DisputeCategory) -> &'static str {
    match category {
        DisputeCategory::DefectiveItem => "The claim involves allegedly defective merchandise.",
        DisputeCategory::NonDelivery => {
            "The claim involves items that were allegedly not delivered."
        }
        DisputeCategory::Misrepresentation => {
            "The claim involves alleged misrepresentation of goods/services."
        }
        DisputeCategory::Unrecognized(_) => {
            "The claim involves a transaction dispute between parties."
        }
    }
}

/// Up to `max` bullet-point fact lines from the `ESTABLISHED FACTS`
/// section of the decision text. The section runs from its heading to the
/// `III.` heading (or end of text); bullets are `•` lines.
fn established_facts(finding_summary: &str, max: usize) -> Vec<String> {
    let Some(start) = find_ignore_ascii_case(finding_summary, "ESTABLISHED FACTS") else {
        return Vec::new();
    };
    let section = &finding_summary[start..];
    let end = find_ignore_ascii_case(section, "III.").unwrap_or(section.len());

    section[..end]
        .lines()
        .filter_map(|line| line.split_once('•'))
        .map(|(_, fact)| fact.trim())
        .filter(|fact| !fact.is_empty())
        .take(max)
        .map(str::to_string)
        .collect()
}

/// Byte offset of the first ASCII-case-insensitive occurrence of `needle`.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .find(|&at| haystack[at..at + needle.len()].eq_ignore_ascii_case(needle))
}

/// Join phrases as prose: `a`, `a and b`, `a, b, and c`.
fn oxford_join(phrases: &[&str]) -> String {
    match phrases {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [head @ .., last] => format!("{}, and {last}", head.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decision::{DecisionRecord, MisconductFlag, RemedyAward};

    fn request() -> CaseRequest {
        CaseRequest {
            claimant_type: ClaimantRole::Buyer,
            statement_of_claim: "The seller never shipped my $50 order.".to_string(),
            statement_of_defence: None,
            dispute_category: DisputeCategory::NonDelivery,
            dispute_amount: Some(50.0),
            submitted_evidence: vec![],
        }
    }

    fn envelope(confidence: f64) -> DecisionEnvelope {
        DecisionEnvelope {
            decision: DecisionRecord {
                dispute_id: "CASE-2026-1-abcd1234".to_string(),
                dispute_category: DisputeCategory::NonDelivery,
                rules_applied: vec![
                    "Article 5.3".to_string(),
                    "Article 5.4".to_string(),
                    "Article 7.3".to_string(),
                    "Article 8.1".to_string(),
                ],
                confidence_score: confidence,
                finding_summary: "II. ESTABLISHED FACTS\n\
                                  • The order was paid for on 1 June.\n\
                                  • No tracking number was ever produced.\n\
                                  • The seller stopped responding.\n\
                                  III. EVIDENCE CONSIDERED"
                    .to_string(),
                remedy_awarded: RemedyAward {
                    remedy_type: RemedyType::FullRefund,
                    amount_usd: 50.0,
                    return_required: false,
                    notes: String::new(),
                },
                compliance_deadline: None,
                misconduct_flag: MisconductFlag::default(),
                appealable: false,
            },
        }
    }

    #[test]
    fn trace_has_four_steps_in_fixed_order() {
        let trace = synthesize_trace(&request(), 50.0, &envelope(0.9));
        let titles: Vec<&str> = trace.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Initial Case Assessment",
                "Evidence Evaluation",
                "Legal Framework Analysis",
                "Final Decision Formulation"
            ]
        );
        for (index, step) in trace.iter().enumerate() {
            assert_eq!(step.step as usize, index + 1);
        }
    }

    #[test]
    fn trace_handles_minimal_record() {
        let mut req = request();
        req.submitted_evidence.clear();
        req.statement_of_defence = None;
        let mut env = envelope(0.5);
        env.decision.rules_applied.clear();
        env.decision.finding_summary = "short".to_string();

        let trace = synthesize_trace(&req, 50.0, &env);
        assert_eq!(trace.len(), TRACE_STEPS);
        assert!(trace[1]
            .conclusion
            .contains("Evidence has been evaluated for credibility and relevance."));
        assert!(trace[2].conclusion.contains("No specific procedural rules"));
    }

    #[test]
    fn assessment_previews_claim_and_glosses_category() {
        let trace = synthesize_trace(&request(), 50.0, &envelope(0.9));
        assert!(trace[0].thought.contains("Buyer's claim"));
        assert!(trace[0]
            .conclusion
            .contains("This is a non_delivery dispute where the Buyer seeks $50."));
        assert!(trace[0]
            .conclusion
            .contains("items that were allegedly not delivered"));
    }

    #[test]
    fn long_claim_preview_is_bounded_and_marked() {
        let mut req = request();
        req.statement_of_claim = "x".repeat(400);
        let trace = synthesize_trace(&req, 50.0, &envelope(0.9));
        assert!(trace[0].thought.contains(&format!("{}...", "x".repeat(150))));
    }

    #[test]
    fn evidence_step_swaps_roles() {
        let mut req = request();
        req.claimant_type = ClaimantRole::Seller;
        req.statement_of_defence = Some("The buyer broke it themselves.".to_string());
        let trace = synthesize_trace(&req, 50.0, &envelope(0.9));
        assert!(trace[1].thought.contains("the Buyer's response"));
        assert!(trace[1].thought.contains("The buyer broke it themselves."));
    }

    #[test]
    fn evidence_step_extracts_two_facts() {
        let trace = synthesize_trace(&request(), 50.0, &envelope(0.9));
        assert!(trace[1].conclusion.starts_with(
            "Key findings: The order was paid for on 1 June.; \
             No tracking number was ever produced."
        ));
        assert!(!trace[1].conclusion.contains("stopped responding"));
    }

    #[test]
    fn evidence_step_notes_misleading_conduct() {
        let mut env = envelope(0.9);
        env.decision.misconduct_flag.misleading_conduct = true;
        let trace = synthesize_trace(&request(), 50.0, &env);
        assert!(trace[1]
            .conclusion
            .ends_with("Note: Indicators of misleading conduct were identified."));
    }

    #[test]
    fn framework_step_lists_three_rules_and_remainder() {
        let trace = synthesize_trace(&request(), 50.0, &envelope(0.9));
        assert!(trace[2]
            .conclusion
            .contains("Applied 4 relevant rules: Article 5.3, Article 5.4, Article 7.3 and 1 others."));
        assert!(trace[2]
            .conclusion
            .contains("burden of proof rests with the Buyer"));
    }

    #[test]
    fn framework_step_seller_burden() {
        let mut req = request();
        req.claimant_type = ClaimantRole::Seller;
        let trace = synthesize_trace(&req, 50.0, &envelope(0.9));
        assert!(trace[2]
            .conclusion
            .contains("The Seller must demonstrate compliance with transaction terms."));
    }

    #[test]
    fn determination_names_prevailing_claimant_on_positive_award() {
        let trace = synthesize_trace(&request(), 50.0, &envelope(0.9));
        assert!(trace[3].conclusion.starts_with("Ruling in favor of the Buyer."));
        assert!(trace[3].conclusion.contains("Full refund of $50 ordered."));
        assert!(trace[3].conclusion.ends_with("Confidence level: 90%."));
    }

    #[test]
    fn determination_names_counterparty_on_zero_award() {
        let mut env = envelope(0.7);
        env.decision.remedy_awarded.amount_usd = 0.0;
        env.decision.remedy_awarded.remedy_type = RemedyType::NoRemedy;
        let trace = synthesize_trace(&request(), 50.0, &env);
        assert!(trace[3].conclusion.starts_with("Ruling in favor of the Seller."));
        assert!(trace[3].conclusion.contains("No remedy awarded."));
    }

    // ── Rationale table ────────────────────────────────────────────

    fn context(percent: u32) -> RationaleContext {
        RationaleContext {
            percent,
            has_defence: true,
            has_evidence: true,
            misconduct: false,
        }
    }

    #[test]
    fn rationale_priority_order() {
        // High confidence without a defence beats the misconduct row.
        let ctx = RationaleContext {
            percent: 90,
            has_defence: false,
            has_evidence: true,
            misconduct: true,
        };
        assert_eq!(select_rationale(&ctx), HIGH_NO_DEFENCE);

        let ctx = RationaleContext {
            percent: 90,
            has_defence: true,
            has_evidence: true,
            misconduct: true,
        };
        assert_eq!(select_rationale(&ctx), HIGH_MISCONDUCT);

        assert_eq!(select_rationale(&context(85)), HIGH_DEFAULT);

        let ctx = RationaleContext {
            percent: 70,
            has_defence: true,
            has_evidence: false,
            misconduct: false,
        };
        assert_eq!(select_rationale(&ctx), MODERATE_NO_EVIDENCE);

        assert_eq!(select_rationale(&context(70)), MODERATE_DEFAULT);
        assert_eq!(select_rationale(&context(59)), LOW_DEFAULT);
    }

    #[test]
    fn rationale_thresholds_are_inclusive() {
        assert_eq!(select_rationale(&context(80)), HIGH_DEFAULT);
        assert_eq!(select_rationale(&context(60)), MODERATE_DEFAULT);
    }

    #[test]
    fn rationale_selection_is_deterministic() {
        let ctx = RationaleContext {
            percent: 64,
            has_defence: false,
            has_evidence: false,
            misconduct: true,
        };
        assert_eq!(select_rationale(&ctx), select_rationale(&ctx));
    }
}
