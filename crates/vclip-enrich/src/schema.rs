//! The LLM's JSON response shape, decoded tolerantly.

use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct RawEnrichment {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(default)]
    pub short_summary: Option<String>,
    #[serde(default)]
    pub topics: Vec<RawTopic>,
    #[serde(default)]
    pub entities: Vec<RawEntity>,
    #[serde(default)]
    pub tags: Vec<RawTag>,
    /// Accepted but unused: some prompt variants emit a richer
    /// `content_analysis` block the persistence contract does not require.
    #[serde(default)]
    #[allow(dead_code)]
    pub content_analysis: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawMetadata {
    pub content_type: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTopic {
    pub name: Option<String>,
    #[serde(default)]
    pub canonical_name: Option<String>,
    pub prominence: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RawEntity {
    pub name: Option<String>,
    #[serde(default)]
    pub canonical_name: Option<String>,
    pub importance: Option<f64>,
    #[serde(default)]
    pub entity_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawTag {
    pub tag: Option<String>,
    pub weight: Option<f64>,
}

/// Decode tolerantly: try the text as a JSON object first (after stripping
/// a markdown code fence, if present); on failure, fall back to a greedy
/// scan for the outermost `{...}` span.
pub fn decode_tolerant(text: &str) -> Result<RawEnrichment, String> {
    let stripped = strip_markdown_fence(text.trim());
    if let Ok(parsed) = serde_json::from_str::<RawEnrichment>(stripped) {
        return Ok(parsed);
    }
    if let Some(span) = greedy_brace_scan(stripped) {
        if let Ok(parsed) = serde_json::from_str::<RawEnrichment>(span) {
            return Ok(parsed);
        }
    }
    Err("no valid JSON object found in LLM response".to_string())
}

fn strip_markdown_fence(text: &str) -> &str {
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

fn greedy_brace_scan(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_plain_object() {
        let raw = decode_tolerant(r#"{"short_summary":"s","topics":[],"entities":[],"tags":[]}"#)
            .unwrap();
        assert_eq!(raw.short_summary.as_deref(), Some("s"));
    }

    #[test]
    fn decodes_fenced_object() {
        let raw = decode_tolerant("```json\n{\"short_summary\":\"s\"}\n```").unwrap();
        assert_eq!(raw.short_summary.as_deref(), Some("s"));
    }

    #[test]
    fn decodes_via_greedy_brace_scan_with_leading_commentary() {
        let raw =
            decode_tolerant("Sure, here is the JSON:\n{\"short_summary\":\"s\"}\nhope that helps")
                .unwrap();
        assert_eq!(raw.short_summary.as_deref(), Some("s"));
    }
}
