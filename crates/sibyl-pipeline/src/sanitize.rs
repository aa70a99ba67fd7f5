//! Response sanitizer
//!
//! Models wrap their SQL in markdown fences and, for reasoning models,
//! `<think>` transcripts. This stage strips both and nothing else. An
//! empty result is a valid outcome the orchestrator turns into
//! `AskOutcome::NoSql`; it is never an error here.

use once_cell::sync::Lazy;
use regex::Regex;

static THINK_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());

/// Reduce a raw completion to bare SQL.
///
/// Idempotent: sanitizing already-clean output returns it unchanged.
pub fn sanitize_response(raw: &str) -> String {
    let without_reasoning = THINK_BLOCK.replace_all(raw, "");

    // An opening marker with no close swallows everything after it; a
    // model that never finished thinking produced no SQL
    let text = match without_reasoning.find("<think>") {
        Some(pos) => &without_reasoning[..pos],
        None => &without_reasoning[..],
    };

    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = rest
            .strip_prefix("sql")
            .or_else(|| rest.strip_prefix("SQL"))
            .unwrap_or(rest)
            .trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }

    text.trim().to_string()
}
