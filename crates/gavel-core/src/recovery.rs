//! # Resilient JSON Extraction
//!
//! Generative-text backends intermittently wrap their JSON in prose or
//! markdown fences, append commentary after it, or truncate it mid-structure
//! near token limits. This module recovers a usable decision payload from
//! such output in three stages:
//!
//! 1. **Normalize** ([`normalize_candidate`]): strip the prose framing and
//!    isolate the substring most likely to be JSON.
//! 2. **Recover** ([`recover_json`]): strict decode; on a
//!    position-addressable syntax error, truncate to the outermost complete
//!    `{...}` unit before the failure ([`salvage_offset`]) and retry once.
//! 3. **Validate** ([`extract_decision`] via [`crate::validate`]): confirm
//!    the decoded value has the required decision shape.
//!
//! Everything here is deterministic: identical input text always yields the
//! same value or the same failure kind. There is exactly one recovery pass,
//! never a retry loop, and a failed case never produces a fabricated
//! default record.

use serde_json::Value;

use crate::decision::DecisionEnvelope;
use crate::error::ExtractionError;
use crate::validate::validate_decision;

/// Maximum raw-text length carried in a [`ExtractionError::MalformedOutput`]
/// diagnostic snippet.
const SNIPPET_CHARS: usize = 1000;

// ── Normalizer ─────────────────────────────────────────────────────────

/// Isolate the substring of `raw` most likely to be a JSON document.
///
/// A fenced ```` ```json ```` block wins; otherwise the inclusive span from
/// the first `{` to the last `}` (commentary after the last close brace is
/// a common backend artifact and is discarded here). With no braces at all
/// the trimmed original is returned and will fail downstream with a typed
/// error. Purely textual — no validation happens here.
pub fn normalize_candidate(raw: &str) -> String {
    if let Some(inner) = fenced_json_block(raw) {
        return inner.trim().to_string();
    }
    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if end > start => raw[start..=end].to_string(),
        _ => raw.trim().to_string(),
    }
}

/// Interior of the first ```` ```json ... ``` ```` fence, if present.
fn fenced_json_block(raw: &str) -> Option<&str> {
    let open = raw.find("```json")?;
    let body = &raw[open + "```json".len()..];
    let close = body.find("```")?;
    Some(&body[..close])
}

// ── Recovery parser ────────────────────────────────────────────────────

/// Decode `candidate` as JSON, salvaging the outermost complete object on a
/// truncated tail.
///
/// The strict decode runs first and wins outright for well-formed input.
/// When it fails at a reportable position, a single depth-counting pass
/// finds the end of the outermost balanced `{...}` unit before that
/// position; if one exists the truncated prefix is decoded strictly. Any
/// other outcome returns the *original* decoder error.
///
/// # Errors
///
/// Returns the strict decoder's error when neither the full candidate nor
/// a salvaged prefix parses.
pub fn recover_json(candidate: &str) -> Result<Value, serde_json::Error> {
    let first = match serde_json::from_str(candidate) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    if let Some(offset) = error_byte_offset(candidate, &first) {
        if let Some(end) = salvage_offset(candidate, offset) {
            if let Ok(value) = serde_json::from_str(&candidate[..=end]) {
                return Ok(value);
            }
        }
    }

    Err(first)
}

/// Byte offset of the end of the outermost complete `{...}` unit within
/// `text[..failure_offset]`, if one exists.
///
/// A single O(n) scan tracks nesting depth over raw characters: `{`
/// increments, `}` decrements, and the offset of the close brace at which
/// depth returns to exactly zero is remembered. An offset of zero is never
/// salvageable (the unit would be empty), matching the invariant that the
/// returned offset is always > 0. Independent of any decoder, so the scan
/// is testable in isolation.
pub fn salvage_offset(text: &str, failure_offset: usize) -> Option<usize> {
    let mut depth: i64 = 0;
    let mut last_complete = None;

    for (pos, ch) in text.char_indices() {
        if pos >= failure_offset {
            break;
        }
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    last_complete = Some(pos);
                }
            }
            _ => {}
        }
    }

    last_complete.filter(|pos| *pos > 0)
}

/// Convert a serde_json line/column error position into a byte offset into
/// `text`. Returns `None` for errors without a position (line 0).
fn error_byte_offset(text: &str, err: &serde_json::Error) -> Option<usize> {
    let (line, column) = (err.line(), err.column());
    if line == 0 {
        return None;
    }

    let mut offset = 0usize;
    for (index, line_text) in text.split('\n').enumerate() {
        if index + 1 == line {
            // Column is 1-based and counts characters, not bytes.
            let within = if column == 0 {
                0
            } else {
                line_text
                    .char_indices()
                    .nth(column - 1)
                    .map_or(line_text.len(), |(byte, _)| byte)
            };
            return Some(offset + within);
        }
        offset += line_text.len() + 1;
    }
    None
}

// ── Full extraction ────────────────────────────────────────────────────

/// Normalize, recover, and validate raw backend text into a decision
/// envelope.
///
/// # Errors
///
/// [`ExtractionError::MalformedOutput`] when no JSON value can be decoded
/// even after recovery; [`ExtractionError::InvalidRecord`] when a value
/// decodes but lacks a required decision field.
pub fn extract_decision(raw: &str) -> Result<DecisionEnvelope, ExtractionError> {
    let candidate = normalize_candidate(raw);
    let value = recover_json(&candidate).map_err(|err| ExtractionError::MalformedOutput {
        message: err.to_string(),
        snippet: head_chars(raw, SNIPPET_CHARS),
    })?;
    validate_decision(&value)
}

/// First `limit` characters of `text`, char-boundary safe.
fn head_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Normalizer ─────────────────────────────────────────────────

    #[test]
    fn normalize_extracts_fenced_block() {
        let raw = "Here is the decision:\n```json\n{\"a\": 1}\n```\nHope that helps!";
        assert_eq!(normalize_candidate(raw), "{\"a\": 1}");
    }

    #[test]
    fn normalize_brackets_first_to_last_brace() {
        let raw = "prefix {\"a\": {\"b\": 2}} trailing junk";
        assert_eq!(normalize_candidate(raw), "{\"a\": {\"b\": 2}}");
    }

    #[test]
    fn normalize_without_braces_returns_trimmed_original() {
        assert_eq!(normalize_candidate("  no json here  "), "no json here");
    }

    #[test]
    fn normalize_discards_text_after_last_close_brace() {
        let raw = "{\"a\": 1} and some commentary } oh wait";
        // The last `}` wins, so the commentary between braces survives the
        // span and strict decode fails — recovery salvages the object.
        let candidate = normalize_candidate(raw);
        let value = recover_json(&candidate).unwrap();
        assert_eq!(value["a"], 1);
    }

    // ── salvage_offset ─────────────────────────────────────────────

    #[test]
    fn salvage_finds_outermost_close() {
        //        0123456789012345
        let text = "{\"a\": {\"b\": 2}} trailing";
        assert_eq!(salvage_offset(text, text.len()), Some(14));
    }

    #[test]
    fn salvage_ignores_units_after_failure_offset() {
        let text = "{\"a\": 1} {\"b\": 2}";
        assert_eq!(salvage_offset(text, 8), Some(7));
    }

    #[test]
    fn salvage_none_when_no_balanced_unit() {
        assert_eq!(salvage_offset("{\"a\": {\"b\":", 11), None);
        assert_eq!(salvage_offset("no braces", 9), None);
    }

    #[test]
    fn salvage_never_returns_zero() {
        // A close brace at byte 0 starts at depth -1 and never balances.
        assert_eq!(salvage_offset("} {\"a\": 1}", 1), None);
    }

    // ── recover_json ───────────────────────────────────────────────

    #[test]
    fn well_formed_input_decodes_strictly() {
        let value = recover_json("{\"a\": [1, 2, 3]}").unwrap();
        assert_eq!(value["a"][2], 3);
    }

    #[test]
    fn truncated_tail_is_salvaged() {
        // Complete object followed by the beginning of another structure,
        // as produced when the backend runs into its token limit.
        let text = "{\"decision\": {\"ok\": true}}\n{\"second\": ";
        let value = recover_json(text).unwrap();
        assert_eq!(value["decision"]["ok"], true);
    }

    #[test]
    fn hopeless_input_returns_original_error() {
        let err = recover_json("{\"a\": ").unwrap_err();
        assert!(err.to_string().contains("EOF"));
    }

    #[test]
    fn recovery_is_deterministic() {
        let text = "{\"a\": {\"b\": 1}} {\"broken\": ";
        let first = recover_json(text).unwrap();
        let second = recover_json(text).unwrap();
        assert_eq!(first, second);
    }

    // ── extract_decision ───────────────────────────────────────────

    fn decision_json(confidence: &str) -> String {
        format!(
            "{{\"decision\":{{\"dispute_category\":\"non_delivery\",\
             \"confidence_score\":{confidence},\
             \"remedy_awarded\":{{\"type\":\"full_refund\",\"amount_usd\":50}},\
             \"finding_summary\":\"Decision Rendered\"}}}}"
        )
    }

    #[test]
    fn extracts_from_noisy_wrapping() {
        let raw = format!("Sure! Here you go:\n{} trailing junk", decision_json("0.9"));
        let envelope = extract_decision(&raw).unwrap();
        assert_eq!(envelope.decision.confidence_score, 0.9);
        assert_eq!(envelope.decision.remedy_awarded.amount_usd, 50.0);
    }

    #[test]
    fn extracts_from_truncated_output() {
        // The junk tail contains a close brace inside an unterminated
        // string, so the normalizer's last-brace span keeps it and only
        // the recovery pass can isolate the complete leading envelope.
        let raw = format!("{}{}", decision_json("0.75"), "\n{\"cut\": \"off}");
        let envelope = extract_decision(&raw).unwrap();
        assert_eq!(envelope.decision.confidence_score, 0.75);
    }

    #[test]
    fn malformed_output_carries_bounded_snippet() {
        let raw = format!("{{\"broken\": {}", "x".repeat(3000));
        let err = extract_decision(&raw).unwrap_err();
        match err {
            ExtractionError::MalformedOutput { snippet, .. } => {
                assert_eq!(snippet.chars().count(), 1000);
            }
            other => panic!("expected MalformedOutput, got: {other:?}"),
        }
    }

    #[test]
    fn empty_input_is_malformed() {
        assert!(matches!(
            extract_decision(""),
            Err(ExtractionError::MalformedOutput { .. })
        ));
    }

    // ── Properties ─────────────────────────────────────────────────

    proptest! {
        /// Recovery never changes the result for already-valid JSON.
        #[test]
        fn recovery_matches_strict_decode_on_valid_json(
            keys in proptest::collection::vec("[a-z]{1,8}", 1..5),
            numbers in proptest::collection::vec(0u32..1000, 1..5),
        ) {
            let mut object = serde_json::Map::new();
            for (key, number) in keys.iter().zip(&numbers) {
                object.insert(key.clone(), Value::from(*number));
            }
            let text = serde_json::to_string(&Value::Object(object)).unwrap();
            let strict: Value = serde_json::from_str(&text).unwrap();
            let recovered = recover_json(&text).unwrap();
            prop_assert_eq!(strict, recovered);
        }

        /// A complete unit followed by garbage is always salvaged intact.
        #[test]
        fn complete_prefix_survives_garbage_tail(
            number in 0u32..10_000,
            tail in "\\{\"[a-z]{1,6}\": ?",
        ) {
            let prefix = format!("{{\"value\": {number}}}");
            let text = format!("{prefix}{tail}");
            let value = recover_json(&text).unwrap();
            prop_assert_eq!(value["value"].as_u64(), Some(u64::from(number)));
        }

        /// The scan is total: any input and offset yields None or a
        /// strictly positive in-bounds offset at a close brace.
        #[test]
        fn salvage_offset_is_well_behaved(text in ".{0,200}", offset in 0usize..300) {
            if let Some(pos) = salvage_offset(&text, offset) {
                prop_assert!(pos > 0);
                prop_assert!(pos < text.len());
                prop_assert_eq!(text.as_bytes()[pos], b'}');
            }
        }
    }
}
