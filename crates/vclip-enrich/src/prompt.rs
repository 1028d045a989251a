//! Prompt construction and the stable embedding-text layout.

/// Hard cap on the transcript portion of the prompt.
pub const MAX_TRANSCRIPT_CHARS: usize = 60_000;

/// Concatenate chunk texts up to [`MAX_TRANSCRIPT_CHARS`], never splitting
/// a chunk — the boundary-respecting clip the prompt builder uses.
pub fn clip_transcript(chunk_texts: &[String]) -> String {
    let mut out = String::new();
    for (i, chunk) in chunk_texts.iter().enumerate() {
        let sep_len = if i == 0 { 0 } else { 1 };
        if out.len() + sep_len + chunk.len() > MAX_TRANSCRIPT_CHARS {
            break;
        }
        if i > 0 {
            out.push(' ');
        }
        out.push_str(chunk);
    }
    out
}

pub fn build_prompt(title: &str, description: &str, chunk_texts: &[String]) -> String {
    let transcript = clip_transcript(chunk_texts);
    format!(
        r#"You are a metadata extraction system for a video platform. Given a video's
title, description, and transcript, return a single strict JSON object with
this exact shape and nothing else (no markdown fences, no commentary):

{{
  "metadata": {{ "content_type": "<string or null>", "language": "<ISO 639-1 code or null>" }},
  "short_summary": "<one or two sentence summary>",
  "topics": [ {{ "name": "<string>", "canonical_name": "<lowercase trimmed>", "prominence": <0..1> }} ],
  "entities": [ {{ "name": "<string>", "canonical_name": "<lowercase trimmed>", "importance": <0..1>, "entity_type": "<string or null>" }} ],
  "tags": [ {{ "tag": "<string>", "weight": <0..1> }} ]
}}

Title: {title}
Description: {description}
Transcript: {transcript}
"#
    )
}

/// Build the stable, byte-for-byte embedding text layout.
pub fn build_embedding_text(
    title: &str,
    description: &str,
    summary: &str,
    topic_names: &[String],
    entity_names: &[String],
    tag_names: &[String],
    content_type: Option<&str>,
    language: Option<&str>,
) -> String {
    let join_or_na = |names: &[String]| {
        if names.is_empty() {
            "n/a".to_string()
        } else {
            names.join(" | ")
        }
    };
    let ct = content_type.unwrap_or("other");
    let lang = language.unwrap_or("en");
    format!(
        "Title: {title}\n\nDescription: {description}\n\nSummary: {summary}\n\nTopics: {}\nEntities: {}\nTags: {}\n\nMetadata: content_type={ct}, language={lang}",
        join_or_na(topic_names),
        join_or_na(entity_names),
        join_or_na(tag_names),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_text_matches_scenario_literally() {
        let text = build_embedding_text(
            "X",
            "",
            "s",
            &["A".to_string(), "B".to_string()],
            &[],
            &[],
            None,
            None,
        );
        assert_eq!(
            text,
            "Title: X\n\nDescription: \n\nSummary: s\n\nTopics: A | B\nEntities: n/a\nTags: n/a\n\nMetadata: content_type=other, language=en"
        );
    }

    #[test]
    fn clip_transcript_never_splits_a_chunk() {
        let chunks = vec!["a".repeat(59_990), "b".repeat(20)];
        let clipped = clip_transcript(&chunks);
        assert_eq!(clipped, "a".repeat(59_990));
    }

    #[test]
    fn clip_transcript_joins_with_single_space() {
        let chunks = vec!["hello".to_string(), "world".to_string()];
        assert_eq!(clip_transcript(&chunks), "hello world");
    }
}
