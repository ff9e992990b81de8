//! Shared lexicons and detection patterns for the heuristic rules.
//!
//! Several rules inspect the same surface features (causal connectors,
//! numeric literals, hedging phrases), so the patterns live here rather
//! than inside any one rule. The word lists are tuned for English and
//! the First Principles prompt template.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Connectors that tie a step to earlier content.
    pub static ref CAUSAL_CONNECTOR: Regex = Regex::new(
        r"(?i)\b(?:because|therefore|since|thus|hence|consequently|implies|due to|leads to|it follows|as a result|this means|which gives)\b"
    )
    .unwrap();

    /// Numeric literal, with optional thousands separators and decimals.
    pub static ref NUMBER: Regex = Regex::new(r"\d+(?:,\d{3})*(?:\.\d+)?").unwrap();

    /// Arithmetic operators or operator words that tie a number to a
    /// computation.
    pub static ref ARITHMETIC_LINK: Regex = Regex::new(
        r"(?i)[-+*/=×÷]|\b(?:times|plus|minus|divided|equals|sum|product|total|multiplied|added|subtract(?:ed)?|half|twice|doubled?)\b"
    )
    .unwrap();

    /// Unit tokens, for questions that involve physical or monetary
    /// quantities.
    pub static ref UNIT_TOKEN: Regex = Regex::new(
        r"(?i)[$%€£]|\b(?:km|kilomet(?:er|re)s?|met(?:er|re)s?|cm|mm|kg|kilograms?|grams?|pounds?|miles?|mph|hours?|minutes?|seconds?|days?|weeks?|months?|years?|dollars?|euros?|percent|lit(?:er|re)s?|degrees?)\b"
    )
    .unwrap();

    /// "<subject> is [not] <polar predicate>" claims, for contradiction
    /// detection.
    pub static ref POLAR_CLAIM: Regex = Regex::new(
        r"(?i)\b([a-z][a-z0-9 ]{0,40}?)\s+is\s+(not\s+)?(true|false|correct|incorrect|right|wrong|possible|impossible|valid|invalid|even|odd)\b"
    )
    .unwrap();

    /// Hedging and filler phrases that assert without deriving.
    pub static ref HEDGING_PHRASES: Vec<&'static str> = vec![
        "it is well known",
        "obviously",
        "clearly",
        "of course",
        "everyone knows",
        "it is evident",
        "needless to say",
        "it must be",
        "probably",
        "perhaps",
        "maybe",
        "might be",
        "kind of",
        "sort of",
        "it seems",
        "presumably",
    ];

    /// Markers of an explicit re-check of the result.
    pub static ref VERIFICATION_MARKERS: Vec<&'static str> = vec![
        "verify",
        "verifying",
        "verification",
        "double-check",
        "double check",
        "sanity check",
        "to confirm",
        "re-check",
        "recheck",
        "let's check",
        "checking the answer",
    ];

    /// Markers of a mid-trace self-correction.
    pub static ref SELF_CORRECTION_MARKERS: Vec<&'static str> = vec![
        "but actually",
        "correction:",
        "i was wrong",
        "that was incorrect",
        "scratch that",
    ];

    /// Markers that reconcile an apparent contradiction (two senses of
    /// the same claim rather than a flat reversal).
    pub static ref RECONCILIATION_MARKERS: Vec<&'static str> = vec![
        "however",
        "on the other hand",
        "in contrast",
        "whereas",
        "in another sense",
        "depending on",
    ];
}

/// A normalized "<subject> is <predicate>" claim with its polarity.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarClaim {
    pub subject: String,
    /// Identifier of the antonym pair the predicate belongs to.
    pub pair: &'static str,
    pub positive: bool,
}

/// Extract polar claims from a step's text.
pub fn polar_claims(text: &str) -> Vec<PolarClaim> {
    POLAR_CLAIM
        .captures_iter(text)
        .filter_map(|captures| {
            let raw_subject = captures.get(1)?.as_str();
            let negated = captures.get(2).is_some();
            let predicate = captures.get(3)?.as_str().to_lowercase();

            let (pair, polarity) = match predicate.as_str() {
                "true" => ("true/false", true),
                "false" => ("true/false", false),
                "correct" | "right" => ("correct/incorrect", true),
                "incorrect" | "wrong" => ("correct/incorrect", false),
                "possible" => ("possible/impossible", true),
                "impossible" => ("possible/impossible", false),
                "valid" => ("valid/invalid", true),
                "invalid" => ("valid/invalid", false),
                "even" => ("even/odd", true),
                "odd" => ("even/odd", false),
                _ => return None,
            };

            let subject = normalize_subject(raw_subject);
            if subject.is_empty() {
                return None;
            }

            Some(PolarClaim {
                subject,
                pair,
                positive: polarity != negated,
            })
        })
        .collect()
}

/// Strip leading articles and discourse words so "the claim X" and "X"
/// compare equal.
fn normalize_subject(raw: &str) -> String {
    let mut words: Vec<&str> = raw.split_whitespace().collect();
    while let Some(first) = words.first() {
        match first.to_lowercase().as_str() {
            "the" | "a" | "an" | "that" | "this" | "so" | "thus" | "therefore" | "statement"
            | "claim" => {
                words.remove(0);
            }
            _ => break,
        }
    }
    words.join(" ").to_lowercase()
}

/// All numeric literals in `text`, parsed with separators stripped.
pub fn numbers_in(text: &str) -> Vec<f64> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse().ok())
        .collect()
}

/// Whether `value` appears among `known`, up to float noise.
pub fn contains_number(known: &[f64], value: f64) -> bool {
    known.iter().any(|n| (n - value).abs() < 1e-9)
}

/// Render a number the way it would read in an issue description.
pub fn format_number(value: f64) -> String {
    if value.fract().abs() < 1e-9 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Whether any phrase from `phrases` occurs in the lowercased text.
pub fn contains_any(text_lower: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| text_lower.contains(p))
}

/// Total occurrence count across all phrases.
pub fn count_occurrences(text_lower: &str, phrases: &[&str]) -> usize {
    phrases
        .iter()
        .map(|p| text_lower.matches(p).count())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_causal_connector_detection() {
        assert!(CAUSAL_CONNECTOR.is_match("Therefore the total is 12."));
        assert!(CAUSAL_CONNECTOR.is_match("This holds because both sides are equal."));
        assert!(!CAUSAL_CONNECTOR.is_match("The total is 12."));
    }

    #[test]
    fn test_numbers_in_handles_separators() {
        assert_eq!(numbers_in("4,000 plus 2.5"), vec![4000.0, 2.5]);
        assert!(numbers_in("no digits here").is_empty());
    }

    #[test]
    fn test_polar_claims_extraction() {
        let claims = polar_claims("The statement X is true.");
        assert_eq!(claims.len(), 1);
        assert_eq!(claims[0].subject, "x");
        assert_eq!(claims[0].pair, "true/false");
        assert!(claims[0].positive);
    }

    #[test]
    fn test_polar_claims_negation_flips_polarity() {
        let claims = polar_claims("X is not true.");
        assert_eq!(claims.len(), 1);
        assert!(!claims[0].positive);
    }

    #[test]
    fn test_unit_token_detection() {
        assert!(UNIT_TOKEN.is_match("The train covers 60 km in 2 hours."));
        assert!(UNIT_TOKEN.is_match("That costs $40."));
        assert!(!UNIT_TOKEN.is_match("Just a plain sentence."));
    }

    #[test]
    fn test_count_occurrences() {
        let text = "clearly this is clearly obvious";
        assert_eq!(count_occurrences(text, &["clearly"]), 2);
        assert_eq!(count_occurrences(text, &HEDGING_PHRASES), 2);
    }
}
