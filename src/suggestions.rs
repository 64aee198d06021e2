//! Suggestion extractor.
//!
//! The model is asked for "only a JSON array of strings" but is free to
//! ignore that: it may wrap the array in prose, put it in a fenced code
//! block, or answer with a plain bulleted list. [`extract_suggestions`]
//! tries, in order:
//!
//! 1. the whole response as a JSON array,
//! 2. the first fenced block (optionally tagged `json`) as a JSON array,
//! 3. the shortest `[ ... ]` substring starting at the first `[`,
//! 4. one suggestion per non-empty line, with bullet markers stripped.
//!
//! The first strategy that succeeds wins. Step 3 truncates arrays whose
//! strings contain a `]`; in that case parsing fails and step 4 takes over.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)```(?:json)?\s*([\s\S]*?)```").expect("valid fence pattern"));

static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([\s\S]*?)\]").expect("valid bracket pattern"));

// ---

/// Recover an ordered list of suggestions from raw model output.
///
/// Never fails. An empty or blank response yields an empty list; a parsed
/// empty array is also returned as-is.
pub fn extract_suggestions(raw: &str) -> Vec<String> {
    // ---
    if let Some(items) = parse_string_array(raw) {
        return items;
    }
    debug!("model response is not a bare JSON array");

    if let Some(items) = from_fenced_block(raw) {
        return items;
    }
    debug!("no parsable fenced block in model response");

    if let Some(items) = from_bracketed(raw) {
        return items;
    }
    debug!("no parsable bracketed array, splitting model response into lines");

    split_lines(raw)
}

/// Parse `text` as JSON and, when it is an array, stringify each element.
fn parse_string_array(text: &str) -> Option<Vec<String>> {
    // ---
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Some(items.into_iter().map(stringify).collect()),
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "JSON array parse failed");
            None
        }
    }
}

fn from_fenced_block(raw: &str) -> Option<Vec<String>> {
    // ---
    let inner = FENCED_BLOCK.captures(raw)?.get(1)?.as_str().trim();
    parse_string_array(inner)
}

fn from_bracketed(raw: &str) -> Option<Vec<String>> {
    // ---
    let inner = BRACKETED.captures(raw)?.get(1)?.as_str();
    parse_string_array(&format!("[{inner}]"))
}

fn split_lines(raw: &str) -> Vec<String> {
    // ---
    raw.lines()
        .map(|line| {
            line.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '>' | '*' | '-' | '•'))
                .trim()
        })
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strings pass through unquoted; anything else keeps its JSON rendering,
/// except that whole floats drop the `.0` (`1.0` reads as `1`).
fn stringify(value: Value) -> String {
    // ---
    match value {
        Value::String(s) => s,
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => {
                // `+ 0.0` folds -0 into 0.
                format!("{:.0}", f + 0.0)
            }
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}
