//! WebVTT emission and parsing.
//!
//! Emission is the forward path (write a caption object after
//! transcription); parsing is the recovery path the Job Worker takes when
//! a caption object already exists but the chunk index needs rebuilding.

use crate::transcript::TranscriptSegment;

/// Render segments as a WebVTT document: `WEBVTT` header, 1-based cue
/// indices, `HH:MM:SS.mmm --> HH:MM:SS.mmm` timestamps with a dot
/// fractional-seconds separator.
pub fn emit_vtt(segments: &[TranscriptSegment]) -> String {
    let mut out = String::from("WEBVTT\n");
    for (i, seg) in segments.iter().enumerate() {
        out.push('\n');
        out.push_str(&(i + 1).to_string());
        out.push('\n');
        out.push_str(&format_timestamp(seg.start));
        out.push_str(" --> ");
        out.push_str(&format_timestamp(seg.end));
        out.push('\n');
        out.push_str(&seg.text);
        out.push('\n');
    }
    out
}

fn format_timestamp(total_seconds: f64) -> String {
    let total_seconds = total_seconds.max(0.0);
    let millis = ((total_seconds * 1000.0).round() as i64).max(0);
    let hours = millis / 3_600_000;
    let minutes = (millis % 3_600_000) / 60_000;
    let seconds = (millis % 60_000) / 1000;
    let frac = millis % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{frac:03}")
}

/// Parse a WebVTT document back into segments, dropping the language tag
/// (VTT has no per-cue language field; the caller supplies one from the
/// object key, e.g. `captions/{video}/{lang}.vtt`).
pub fn parse_vtt(content: &str, lang: Option<&str>) -> Vec<TranscriptSegment> {
    let mut segments = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        if let Some((start, end)) = parse_cue_line(line) {
            let mut text_lines = Vec::new();
            for text_line in lines.by_ref() {
                if text_line.trim().is_empty() {
                    break;
                }
                text_lines.push(text_line.to_string());
            }
            segments.push(TranscriptSegment {
                start,
                end,
                text: text_lines.join("\n"),
                lang: lang.map(|s| s.to_string()),
            });
        }
    }
    segments
}

fn parse_cue_line(line: &str) -> Option<(f64, f64)> {
    let (start, end) = line.split_once("-->")?;
    Some((parse_timestamp(start.trim())?, parse_timestamp(end.trim())?))
}

fn parse_timestamp(s: &str) -> Option<f64> {
    let (hms, frac) = s.split_once('.')?;
    let frac: f64 = frac.get(..3)?.parse().ok()?;
    let parts: Vec<&str> = hms.split(':').collect();
    let (h, m, s) = match parts.as_slice() {
        [h, m, s] => (h.parse::<f64>().ok()?, m.parse::<f64>().ok()?, s.parse::<f64>().ok()?),
        [m, s] => (0.0, m.parse::<f64>().ok()?, s.parse::<f64>().ok()?),
        _ => return None,
    };
    Some(h * 3600.0 + m * 60.0 + s + frac / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_exact_layout_from_spec_scenario() {
        let segments = vec![TranscriptSegment {
            start: 3.5,
            end: 7.25,
            text: "hi there".to_string(),
            lang: None,
        }];
        let vtt = emit_vtt(&segments);
        assert_eq!(
            vtt,
            "WEBVTT\n\n1\n00:00:03.500 --> 00:00:07.250\nhi there\n"
        );
    }

    #[test]
    fn round_trips_through_parse() {
        let segments = vec![
            TranscriptSegment { start: 0.0, end: 1.2, text: "a".into(), lang: Some("en".into()) },
            TranscriptSegment { start: 1.2, end: 4.0, text: "b c".into(), lang: Some("en".into()) },
        ];
        let vtt = emit_vtt(&segments);
        let parsed = parse_vtt(&vtt, Some("en"));
        assert_eq!(parsed.len(), 2);
        assert!((parsed[0].start - 0.0).abs() < 1e-6);
        assert!((parsed[1].end - 4.0).abs() < 1e-6);
        assert_eq!(parsed[1].text, "b c");
    }
}
