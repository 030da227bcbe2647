//! Extraction of (explanation, candidate plan JSON) from raw model output.
//!
//! Model replies are expected to contain a free-text explanation followed by
//! the literal marker word `PLAN` and a fenced JSON object, but none of that
//! is guaranteed. This module tolerates a missing marker, stray code fences,
//! trailing prose after the object, and unbalanced braces, and only hands a
//! candidate onward when it is parseable and plan-shaped. Extraction never
//! fails the request; the explanation is always returned.

use log::{info, warn};
use serde_json::Value;

use crate::schema;

/// Marker word separating explanation from the structured payload.
const PLAN_MARKER: &str = "PLAN";

/// Split raw model text into explanation and candidate plan JSON.
///
/// The candidate has already passed the structural pre-checks (parseable,
/// `meta`/`weeks` present after repair, plausible `weeks` mapping) but not
/// strict schema validation.
pub fn parse_reply(raw: &str) -> (String, Option<Value>) {
    info!("Parsing model reply ({} chars)", raw.len());

    let (explanation, candidate_region) = split_at_marker(raw);

    let Some(block) = extract_json_block(candidate_region) else {
        warn!("No plan-shaped JSON block found in model reply");
        return (explanation, None);
    };

    let mut value: Value = match serde_json::from_str(&block) {
        Ok(value) => value,
        Err(e) => {
            warn!("Candidate block failed to parse as JSON: {e}");
            return (explanation, None);
        }
    };

    schema::repair(&mut value);

    let missing: Vec<&str> = ["meta", "weeks"]
        .into_iter()
        .filter(|key| value.get(key).is_none())
        .collect();
    if !missing.is_empty() {
        warn!("Candidate block missing required keys after repair: {missing:?}");
        return (explanation, None);
    }

    if !schema::weeks_look_valid(&value) {
        warn!("Candidate block has a malformed 'weeks' structure");
        return (explanation, None);
    }

    (explanation, Some(value))
}

/// Split the text at the first case-insensitive occurrence of the marker.
///
/// Without a marker the whole trimmed text doubles as both explanation and
/// candidate region, since the model may embed a block without announcing it.
fn split_at_marker(text: &str) -> (String, &str) {
    // Byte-window search keeps offsets valid for slicing regardless of any
    // non-ASCII content around the marker.
    let marker = PLAN_MARKER.as_bytes();
    let found = text
        .as_bytes()
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker));

    match found {
        Some(idx) => {
            let explanation = text[..idx].trim().to_string();
            let candidate = &text[idx + marker.len()..];
            (explanation, candidate)
        }
        None => (text.trim().to_string(), text),
    }
}

/// Extract the first balanced `{...}` block that looks like a plan document.
///
/// Returns `None` when there is no opening brace, the block never closes, or
/// the block lacks the `"meta"`/`"weeks"` key markers (a cheap pre-filter
/// before parsing).
pub fn extract_json_block(region: &str) -> Option<String> {
    let candidate = strip_fences(region);

    let start = candidate.find('{')?;
    let end = find_matching_brace(&candidate[start..])?;
    let block = &candidate[start..start + end + 1];

    if block.contains("\"meta\"") && block.contains("\"weeks\"") {
        Some(block.to_string())
    } else {
        None
    }
}

/// Strip leading/trailing triple-backtick fences (optionally tagged `json`).
fn strip_fences(text: &str) -> &str {
    let mut candidate = text.trim();
    if let Some(rest) = candidate.strip_prefix("```json") {
        candidate = rest;
    } else if let Some(rest) = candidate.strip_prefix("```") {
        candidate = rest;
    }
    if let Some(rest) = candidate.strip_suffix("```") {
        candidate = rest;
    }
    candidate.trim()
}

/// Find the byte offset of the brace matching the opening brace at offset 0.
///
/// Depth counting ignores braces inside JSON string literals, including
/// escaped quotes, so workout notes like `"{hard} effort"` cannot skew the
/// depth.
fn find_matching_brace(text: &str) -> Option<usize> {
    debug_assert!(text.starts_with('{'));

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}
