//! Chunking for indexing: greedy accumulation of transcript segments into
//! windows of `[80, 200]` characters, carrying the true segment times.

use crate::transcript::TranscriptSegment;

pub const CHUNK_MIN_CHARS: usize = 80;
pub const CHUNK_MAX_CHARS: usize = 200;

/// A chunk of transcript text ready for indexing, with the start/end time
/// of the segments it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptChunk {
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub lang: Option<String>,
}

/// Greedily accumulate consecutive segments until the chunk reaches at
/// least [`CHUNK_MIN_CHARS`], flushing before exceeding [`CHUNK_MAX_CHARS`].
/// A single segment longer than the max is emitted as its own chunk
/// rather than split further.
pub fn chunk_segments(segments: &[TranscriptSegment]) -> Vec<TranscriptChunk> {
    let mut chunks = Vec::new();
    let mut buf = String::new();
    let mut buf_start: Option<f64> = None;
    let mut buf_end = 0.0;
    let mut buf_lang: Option<String> = None;

    let flush = |buf: &mut String, buf_start: &mut Option<f64>, buf_end: f64, buf_lang: &Option<String>, out: &mut Vec<TranscriptChunk>| {
        if let Some(start) = *buf_start {
            if !buf.trim().is_empty() {
                out.push(TranscriptChunk {
                    text: buf.trim().to_string(),
                    start_seconds: start,
                    end_seconds: buf_end,
                    lang: buf_lang.clone(),
                });
            }
        }
        buf.clear();
        *buf_start = None;
    };

    for seg in segments {
        let text = seg.text.trim();
        if text.is_empty() {
            continue;
        }

        let would_be_len = if buf.is_empty() { text.len() } else { buf.len() + 1 + text.len() };

        if !buf.is_empty() && buf.len() >= CHUNK_MIN_CHARS && would_be_len > CHUNK_MAX_CHARS {
            flush(&mut buf, &mut buf_start, buf_end, &buf_lang, &mut chunks);
        }

        if buf.is_empty() {
            buf_start = Some(seg.start);
            buf_lang = seg.lang.clone();
        }
        if !buf.is_empty() {
            buf.push(' ');
        }
        buf.push_str(text);
        buf_end = seg.end;

        if buf.len() >= CHUNK_MAX_CHARS {
            flush(&mut buf, &mut buf_start, buf_end, &buf_lang, &mut chunks);
        }
    }

    flush(&mut buf, &mut buf_start, buf_end, &buf_lang, &mut chunks);
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment { start, end, text: text.to_string(), lang: Some("en".into()) }
    }

    #[test]
    fn empty_segments_yield_no_chunks() {
        assert!(chunk_segments(&[]).is_empty());
    }

    #[test]
    fn chunks_stay_within_the_target_window() {
        let segments: Vec<_> = (0..20)
            .map(|i| seg(i as f64 * 2.0, i as f64 * 2.0 + 2.0, "a short clause here"))
            .collect();
        let chunks = chunk_segments(&segments);
        assert!(!chunks.is_empty());
        for c in &chunks {
            assert!(c.text.len() <= CHUNK_MAX_CHARS, "chunk exceeded max: {}", c.text.len());
        }
    }

    #[test]
    fn chunk_text_union_equals_normalized_input_concatenation() {
        let segments = vec![seg(0.0, 1.0, "hello"), seg(1.0, 2.0, "world")];
        let chunks = chunk_segments(&segments);
        let joined: String = chunks.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
        assert_eq!(joined, "hello world");
    }

    #[test]
    fn times_reflect_true_segment_bounds() {
        let segments = vec![seg(0.0, 1.0, "hello"), seg(1.0, 2.0, "world")];
        let chunks = chunk_segments(&segments);
        assert_eq!(chunks[0].start_seconds, 0.0);
        assert_eq!(chunks[0].end_seconds, 2.0);
    }
}
