//! Reply text cleanup shared by the model-backed services.
//!
//! Each service decides when to apply it; the order differs between them.

use serde_json::Value;

const OPENING_FENCES: [&str; 3] = ["```json", "```JSON", "```"];
const CLOSING_FENCE: &str = "```";

/// Remove a leading ```` ```json ```` (or bare ```` ``` ````) marker and a
/// trailing ```` ``` ````, then trim. Fences inside the body are kept.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    let body = OPENING_FENCES
        .iter()
        .find_map(|fence| trimmed.strip_prefix(fence))
        .unwrap_or(trimmed)
        .trim_end();
    body.strip_suffix(CLOSING_FENCE).unwrap_or(body).trim().to_string()
}

/// Parse reply text as JSON. A blank reply reads as an empty object.
pub fn parse_reply_json(text: &str) -> Result<Value, serde_json::Error> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(trimmed)
}
