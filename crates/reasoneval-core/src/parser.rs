//! Step Parser: converts raw model text into an ordered reasoning trace.
//!
//! The parser is total. Malformed or unstructured input never fails;
//! content with no recognizable structure degrades to `Unclassified`
//! steps. Recognition is layered: the final-answer marker is split off
//! first, the remainder is segmented on step-boundary markers tried in
//! priority order, and each segment's kind is classified by lightweight
//! keyword matching.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ReasoningStep, ReasoningTrace, StepKind};

lazy_static! {
    /// Case-insensitive final-answer delimiter, e.g. "FINAL ANSWER:".
    /// The colon is required: a prose mention of the phrase ("verify
    /// your final answer") is not a delimiter and stays reasoning text.
    static ref FINAL_ANSWER_MARKER: Regex =
        Regex::new(r"(?i)\bfinal\s+answer\s*:\s*").unwrap();

    /// Numbered list items: "1.", "2)", "**3.**".
    static ref NUMBERED_ITEM: Regex =
        Regex::new(r"(?m)^\s*(?:\*\*)?\d{1,3}[.)](?:\*\*)?\s+").unwrap();

    /// Explicit step labels: "Step 1:", "**Step 2**".
    static ref STEP_LABEL: Regex =
        Regex::new(r"(?mi)^\s*(?:\*\*)?step\s+\d{1,3}(?:\*\*)?\s*[:.]?\s*").unwrap();

    /// Bullet items: "-", "*", "•".
    static ref BULLET_ITEM: Regex =
        Regex::new(r"(?m)^\s*[-*•]\s+").unwrap();

    /// Ordinal/sequencing words at the start of a line.
    static ref ORDINAL_LEAD: Regex =
        Regex::new(r"(?mi)^\s*(?:first|second|third|fourth|fifth|next|then|finally)\b[,:]?\s*")
            .unwrap();

    /// Blank-line paragraph boundary.
    static ref PARAGRAPH_BREAK: Regex =
        Regex::new(r"\n\s*\n").unwrap();

    /// Sentence boundary for the last-resort split.
    static ref SENTENCE_BOUNDARY: Regex =
        Regex::new(r"[.!?]+\s+").unwrap();

    /// Axiom/assumption vocabulary near the start of a segment.
    static ref AXIOM_LEAD: Regex = Regex::new(
        r"(?i)^\W{0,8}(?:axioms?|assumptions?|assume|assuming|given|premise|by definition|we (?:assume|define|know)|fundamental truth)\b"
    )
    .unwrap();
}

/// An intermediate segment before kind classification. `structured`
/// records whether the segment came from a recognized step marker.
struct Segment {
    text: String,
    structured: bool,
}

/// Parse raw model text into a [`ReasoningTrace`].
///
/// Empty input yields a trace with zero steps and no final answer.
/// When multiple final-answer markers appear, the first occurrence
/// wins; later ones remain ordinary text inside the answer span.
pub fn parse(raw_text: &str) -> ReasoningTrace {
    let raw_len = raw_text.len();
    let trimmed = raw_text.trim();
    if trimmed.is_empty() {
        return ReasoningTrace {
            steps: Vec::new(),
            has_final_answer: false,
            raw_len,
        };
    }

    let (body, final_answer) = split_final_answer(trimmed);

    let mut steps: Vec<ReasoningStep> = split_segments(body)
        .into_iter()
        .enumerate()
        .map(|(index, segment)| ReasoningStep {
            kind: classify(&segment.text, segment.structured),
            text: segment.text,
            index,
        })
        .collect();

    let has_final_answer = final_answer.is_some();
    if let Some(answer) = final_answer {
        let index = steps.len();
        steps.push(ReasoningStep {
            kind: StepKind::FinalAnswer,
            text: answer.to_string(),
            index,
        });
    }

    ReasoningTrace {
        steps,
        has_final_answer,
        raw_len,
    }
}

/// Split off the content after the first final-answer marker.
fn split_final_answer(text: &str) -> (&str, Option<&str>) {
    match FINAL_ANSWER_MARKER.find(text) {
        Some(m) => (&text[..m.start()], Some(text[m.end()..].trim())),
        None => (text, None),
    }
}

/// Segment the reasoning body, trying boundary markers in priority
/// order: numbered items, step labels, bullets, ordinal leads, blank
/// lines, sentences. The whole body becomes a single segment when
/// nothing matches.
fn split_segments(body: &str) -> Vec<Segment> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    // Explicit markers are trusted even when they appear only once.
    for marker in [&*NUMBERED_ITEM, &*STEP_LABEL] {
        if let Some(segments) = split_on_markers(body, marker, 1) {
            return segments;
        }
    }

    // Weaker markers need at least two hits to avoid false positives.
    for marker in [&*BULLET_ITEM, &*ORDINAL_LEAD] {
        if let Some(segments) = split_on_markers(body, marker, 2) {
            return segments;
        }
    }

    let paragraphs: Vec<&str> = PARAGRAPH_BREAK
        .split(body)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.len() >= 2 {
        return paragraphs
            .into_iter()
            .map(|p| Segment {
                text: p.to_string(),
                structured: false,
            })
            .collect();
    }

    let sentences: Vec<&str> = SENTENCE_BOUNDARY
        .split(body)
        .map(str::trim)
        .filter(|s| s.len() > 10)
        .collect();
    if sentences.len() >= 2 {
        return sentences
            .into_iter()
            .map(|s| Segment {
                text: s.to_string(),
                structured: false,
            })
            .collect();
    }

    vec![Segment {
        text: body.trim().to_string(),
        structured: false,
    }]
}

/// Split `text` at each match of `marker`, keeping any preamble before
/// the first marker as an unstructured segment.
fn split_on_markers(text: &str, marker: &Regex, min_matches: usize) -> Option<Vec<Segment>> {
    let matches: Vec<regex::Match> = marker.find_iter(text).collect();
    if matches.len() < min_matches {
        return None;
    }

    let mut segments = Vec::new();

    let preamble = text[..matches[0].start()].trim();
    if !preamble.is_empty() {
        segments.push(Segment {
            text: preamble.to_string(),
            structured: false,
        });
    }

    for (i, m) in matches.iter().enumerate() {
        let end = matches
            .get(i + 1)
            .map(|next| next.start())
            .unwrap_or(text.len());
        let content = text[m.end()..end].trim();
        if !content.is_empty() {
            segments.push(Segment {
                text: content.to_string(),
                structured: true,
            });
        }
    }

    if segments.iter().any(|s| s.structured) {
        Some(segments)
    } else {
        None
    }
}

fn classify(text: &str, structured: bool) -> StepKind {
    if AXIOM_LEAD.is_match(text) {
        StepKind::Axiom
    } else if structured {
        StepKind::Step
    } else {
        StepKind::Unclassified
    }
}
