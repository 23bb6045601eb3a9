//! JSON extraction from free-form completions

/// Pull a JSON object out of an LLM reply.
///
/// Handles ```` ```json ```` fences and prose around the object; falls back to
/// the span between the first `{` and the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with("```") {
        let mut inner = trimmed.split_once('\n').map_or("", |(_, rest)| rest);
        if let Some(end) = inner.rfind("```") {
            inner = &inner[..end];
        }
        let inner = inner.trim();
        return (!inner.is_empty()).then_some(inner);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trimmed[start..=end].trim())
}

/// Whether the reply looks like it is meant to be a JSON document
pub fn looks_like_json(text: &str) -> bool {
    let trimmed = text.trim_start();
    trimmed.starts_with('{') || trimmed.starts_with("```json")
}
