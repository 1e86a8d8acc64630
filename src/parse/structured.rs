//! JSON object contract: `{"bias_score", "strength_score", "comment"}`.

use serde::Deserialize;

use super::RawFields;
use crate::{MimirError, Result};

#[derive(Debug, Deserialize)]
struct StructuredReply {
    bias_score: f64,
    strength_score: f64,
    comment: String,
}

pub(super) fn extract(raw: &str) -> Result<RawFields> {
    let body = strip_code_fence(raw);
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| MimirError::parse(format!("reply is not valid JSON: {e}"), raw))?;
    // serde would also accept a positional array for a struct
    if !value.is_object() {
        return Err(MimirError::parse("reply is not a JSON object", raw));
    }
    let reply: StructuredReply = serde_json::from_value(value)
        .map_err(|e| MimirError::parse(format!("unexpected reply shape: {e}"), raw))?;
    Ok(RawFields {
        polarity: reply.bias_score,
        intensity: reply.strength_score,
        comment: reply.comment,
    })
}

/// Trim whitespace and one enclosing Markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop an info string such as `json` on the opening line
    match body.split_once('\n') {
        Some((info, inner)) if !info.trim_start().starts_with('{') => inner.trim(),
        _ => body.trim(),
    }
}
