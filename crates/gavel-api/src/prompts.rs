// SPDX-License-Identifier: BUSL-1.1
//! # Prompt Pack Loading & Assembly
//!
//! Loads the on-disk prompt pack (system prompt, rulebook, output
//! template) at startup and assembles the full adjudication prompt for a
//! case. Missing pack files only degrade the health report — the inline
//! instruction block below keeps the pipeline functional without them.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use gavel_core::{CaseId, CaseRequest};

/// The three files making up a prompt pack, relative to the pack root.
const PACK_FILES: [&str; 3] = [
    "prompts/system_prompt.txt",
    "rulebook/rules.txt",
    "prompts/output_template.txt",
];

/// Contents of a fully loaded prompt pack.
#[derive(Debug, Clone)]
pub struct PromptPack {
    /// Judge persona and general instructions.
    pub system_prompt: String,
    /// The rules of procedure text.
    pub rules: String,
    /// The output-format template text.
    pub output_template: String,
}

/// Prompt pack plus its on-disk location.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    dir: PathBuf,
    pack: Option<PromptPack>,
}

impl PromptLibrary {
    /// Load the pack from `dir`. A partial or missing pack logs a warning
    /// and yields a library without contents.
    pub fn load(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let read = |name: &str| std::fs::read_to_string(dir.join(name));

        let pack = match (
            read(PACK_FILES[0]),
            read(PACK_FILES[1]),
            read(PACK_FILES[2]),
        ) {
            (Ok(system_prompt), Ok(rules), Ok(output_template)) => Some(PromptPack {
                system_prompt,
                rules,
                output_template,
            }),
            _ => {
                tracing::warn!(dir = %dir.display(), "prompt pack incomplete; using inline instructions");
                None
            }
        };

        Self { dir, pack }
    }

    /// A library with no contents (tests, unconfigured deployments).
    pub fn empty() -> Self {
        Self {
            dir: PathBuf::from("."),
            pack: None,
        }
    }

    /// The loaded pack, if all files were present at startup.
    pub fn pack(&self) -> Option<&PromptPack> {
        self.pack.as_ref()
    }

    /// Whether all pack files currently exist on disk. Checked fresh on
    /// every call so the health report reflects live filesystem state.
    pub fn files_present(&self) -> bool {
        PACK_FILES
            .iter()
            .all(|name| file_exists(&self.dir.join(name)))
    }
}

fn file_exists(path: &Path) -> bool {
    std::fs::metadata(path).is_ok()
}

/// Assemble the full adjudication prompt for one case.
///
/// The instruction block pins the exact decision-text format and the JSON
/// envelope the extraction pipeline expects back; when a prompt pack is
/// loaded its system prompt is prepended.
pub fn build_dispute_prompt(
    library: &PromptLibrary,
    request: &CaseRequest,
    case_id: &CaseId,
    amount: f64,
    now: DateTime<Utc>,
    deadline: DateTime<Utc>,
) -> String {
    let rendered_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    let deadline_at = deadline.to_rfc3339_opts(SecondsFormat::Millis, true);
    let defence = request
        .statement_of_defence
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or("No defence provided");

    let mut prompt = String::new();
    if let Some(pack) = library.pack() {
        prompt.push_str(pack.system_prompt.trim_end());
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!(
        "You are an AI judge. Create a complete judicial decision for this dispute.\n\
         \n\
         DISPUTE: {claim}\n\
         CATEGORY: {category}\n\
         AMOUNT: ${amount}\n\
         DEFENCE: {defence}\n\
         \n\
         Generate the complete decision text in this EXACT format:\n\
         \n\
         Decision Rendered: {rendered_at}\n\
         \n\
         I. SUMMARY OF DISPUTE\n\
         \n\
         [Write 2-3 sentences summarizing the dispute between buyer and seller]\n\
         \n\
         II. ESTABLISHED FACTS\n\
         \n\
         Based on the evidence provided, the Tribunal finds that:\n\
         \u{2022} [Fact 1 about the dispute]\n\
         \u{2022} [Fact 2 about the dispute]\n\
         \u{2022} [Fact 3 about the dispute]\n\
         \u{2022} [Additional facts as needed]\n\
         \n\
         III. EVIDENCE CONSIDERED\n\
         \n\
         The Tribunal assessed, inter alia:\n\
         \u{2022} [Evidence type 1] \u{2013} [relevant notes about credibility/weight]\n\
         \u{2022} [Evidence type 2] \u{2013} [relevant notes about credibility/weight]\n\
         \u{2022} [Additional evidence as needed]\n\
         \n\
         IV. APPLICABLE RULES\n\
         \n\
         This dispute is governed by the following provisions of the Rules of Procedure:\n\
         \u{2022} Article 5.3 \u{2013} Burden of proof on claimant\n\
         \u{2022} Article 5.4 \u{2013} Adverse inference for withheld evidence\n\
         \u{2022} Article 7.3 \u{2013} Incorrect item procedures\n\
         \u{2022} Article 8.1 \u{2013} Remedy provisions\n\
         \u{2022} [Additional relevant articles]\n\
         \n\
         V. TRIBUNAL REASONING\n\
         \n\
         [Write 3-4 paragraphs analyzing the dispute, applying the rules to the facts, \
         and explaining your reasoning]\n\
         \n\
         VI. RULING AND REMEDY\n\
         \n\
         The Tribunal orders [specific remedy description] of ${amount} to the [Buyer/Seller].\n\
         \n\
         Compliance deadline: {deadline_at} pursuant to Article 9.1.\n\
         \n\
         VII. ADDITIONAL NOTES\n\
         \n\
         Misconduct: [None / specific finding]\n\
         \n\
         Confidence Score: [0.00-1.00]\n\
         \n\
         [Additional notes about confidence level and appeal rights if applicable]\n\
         \n\
         Return JSON with the complete formatted decision text:",
        claim = request.statement_of_claim,
        category = request.dispute_category,
    ));

    // The JSON envelope the backend is told to fill in. Assembled as a
    // real Value so the skeleton always round-trips through the same
    // extraction pipeline that will parse the reply.
    let skeleton = serde_json::json!({
        "decision": {
            "dispute_id": case_id.to_string(),
            "dispute_category": request.dispute_category.as_str(),
            "rules_applied": [
                "Article 5.3", "Article 5.4", "Article 7.3",
                "Article 8.1", "Article 13.1", "Article 17"
            ],
            "confidence_score": 0.85,
            "finding_summary": "[PUT THE ENTIRE FORMATTED DECISION TEXT HERE - FROM 'Decision Rendered:' THROUGH THE END OF SECTION VII, INCLUDING ALL BULLET POINTS AND CONTENT]",
            "remedy_awarded": {
                "type": "full_refund",
                "amount_usd": amount,
                "return_required": false,
                "notes": "Remedy pursuant to Article 8.1(a)"
            },
            "compliance_deadline": deadline_at,
            "misconduct_flag": {
                "misleading_conduct": false,
                "fraudulent_behavior": false,
                "tier": null
            },
            "appealable": false
        }
    });
    prompt.push_str("\n\n");
    prompt.push_str(&serde_json::to_string_pretty(&skeleton).unwrap_or_default());

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use gavel_core::{ClaimantRole, DisputeCategory};

    fn request() -> CaseRequest {
        CaseRequest {
            claimant_type: ClaimantRole::Buyer,
            statement_of_claim: "The blender arrived shattered.".to_string(),
            statement_of_defence: None,
            dispute_category: DisputeCategory::DefectiveItem,
            dispute_amount: Some(79.99),
            submitted_evidence: vec![],
        }
    }

    #[test]
    fn prompt_carries_case_fields() {
        let now = Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap();
        let deadline = now + chrono::Duration::days(5);
        let case_id = CaseId::from_string("CASE-2026-1-abcd1234");

        let prompt = build_dispute_prompt(
            &PromptLibrary::empty(),
            &request(),
            &case_id,
            79.99,
            now,
            deadline,
        );

        assert!(prompt.contains("DISPUTE: The blender arrived shattered."));
        assert!(prompt.contains("CATEGORY: defective_item"));
        assert!(prompt.contains("AMOUNT: $79.99"));
        assert!(prompt.contains("DEFENCE: No defence provided"));
        assert!(prompt.contains("\"dispute_id\": \"CASE-2026-1-abcd1234\""));
        assert!(prompt.contains("\"compliance_deadline\": \"2026-08-11T12:00:00.000Z\""));
    }

    #[test]
    fn prompt_skeleton_is_extractable() {
        // The embedded JSON skeleton must itself survive the extraction
        // pipeline — it is the shape the backend is told to produce.
        let now = Utc::now();
        let prompt = build_dispute_prompt(
            &PromptLibrary::empty(),
            &request(),
            &CaseId::from_string("CASE-1"),
            79.99,
            now,
            now + chrono::Duration::days(5),
        );
        let skeleton = &prompt[prompt.find("{\n").unwrap()..];
        let envelope = gavel_core::extract_decision(skeleton).unwrap();
        assert_eq!(envelope.decision.remedy_awarded.amount_usd, 79.99);
    }

    #[test]
    fn blank_defence_reads_as_not_provided() {
        let mut req = request();
        req.statement_of_defence = Some("  ".to_string());
        let now = Utc::now();
        let prompt = build_dispute_prompt(
            &PromptLibrary::empty(),
            &req,
            &CaseId::from_string("CASE-1"),
            10.0,
            now,
            now,
        );
        assert!(prompt.contains("DEFENCE: No defence provided"));
    }

    #[test]
    fn missing_pack_dir_loads_empty() {
        let library = PromptLibrary::load("/nonexistent/prompt/dir");
        assert!(library.pack().is_none());
        assert!(!library.files_present());
    }
}
