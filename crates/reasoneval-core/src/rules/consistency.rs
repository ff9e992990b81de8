//! Logical Consistency rules.
//!
//! These rules ask whether the steps actually connect: do they cite
//! earlier content, avoid reversing themselves, and derive the
//! quantities they use?

use crate::types::{Dimension, ReasoningStep, ReasoningTrace, RuleFinding};

use super::lexicon::{
    contains_any, contains_number, format_number, numbers_in, polar_claims, ARITHMETIC_LINK,
    CAUSAL_CONNECTOR, RECONCILIATION_MARKERS, SELF_CORRECTION_MARKERS,
};
use super::Rule;

/// Minimum fraction of steps expected to carry a causal connector.
const CAUSAL_RATIO_FLOOR: f64 = 0.3;

/// Penalizes traces whose steps rarely connect to earlier content with
/// because/therefore/since; rewards well-linked chains.
pub(super) struct CausalLinkage;

impl Rule for CausalLinkage {
    fn name(&self) -> &'static str {
        "causal_linkage"
    }

    fn dimension(&self) -> Dimension {
        Dimension::LogicalConsistency
    }

    fn apply(&self, _question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let steps: Vec<&ReasoningStep> = trace.reasoning_steps().collect();
        if steps.len() < 2 {
            // One step has no chain to link.
            return Vec::new();
        }

        let linked = steps
            .iter()
            .filter(|s| CAUSAL_CONNECTOR.is_match(&s.text))
            .count();

        if (linked as f64) < steps.len() as f64 * CAUSAL_RATIO_FLOOR {
            vec![self.finding(
                -10.0,
                Some(
                    "Weak causal linkage: steps rarely connect to earlier ones with \
                     because/therefore/since"
                        .to_string(),
                ),
            )]
        } else {
            vec![self.finding(4.0, None)]
        }
    }
}

/// Detects a later step asserting the negation of an earlier asserted
/// fact, with no reconciliation. Also flags explicit self-corrections.
pub(super) struct Contradiction;

impl Rule for Contradiction {
    fn name(&self) -> &'static str {
        "contradiction"
    }

    fn dimension(&self) -> Dimension {
        Dimension::LogicalConsistency
    }

    fn apply(&self, _question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let steps: Vec<&ReasoningStep> = trace.reasoning_steps().collect();
        let mut findings = Vec::new();

        for (i, step) in steps.iter().enumerate() {
            let lower = step.text.to_lowercase();
            if contains_any(&lower, &SELF_CORRECTION_MARKERS) {
                findings.push(self.finding(
                    -8.0,
                    Some(format!("Possible self-correction in step {}", i + 1)),
                ));
            }
        }

        // (subject, antonym pair, polarity, step position)
        let mut asserted: Vec<(String, &'static str, bool, usize)> = Vec::new();

        for (i, step) in steps.iter().enumerate() {
            let reconciled = contains_any(&step.text.to_lowercase(), &RECONCILIATION_MARKERS);

            for claim in polar_claims(&step.text) {
                let earlier = asserted
                    .iter()
                    .find(|(subject, pair, _, _)| *subject == claim.subject && *pair == claim.pair);

                if let Some(&(_, _, polarity, at)) = earlier {
                    if polarity != claim.positive && !reconciled {
                        findings.push(self.finding(
                            -15.0,
                            Some(format!(
                                "Step {} contradicts step {}: \"{}\" is asserted with opposite polarity",
                                i + 1,
                                at + 1,
                                claim.subject
                            )),
                        ));
                        continue;
                    }
                }

                asserted.push((claim.subject, claim.pair, claim.positive, i));
            }
        }

        findings
    }
}

/// Flags steps that introduce a quantity never derived from or present
/// in prior steps or the question.
pub(super) struct NonSequitur;

impl Rule for NonSequitur {
    fn name(&self) -> &'static str {
        "non_sequitur"
    }

    fn dimension(&self) -> Dimension {
        Dimension::LogicalConsistency
    }

    fn apply(&self, question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let mut seen = numbers_in(question);
        let mut findings = Vec::new();

        for (i, step) in trace.reasoning_steps().enumerate() {
            let nums = numbers_in(&step.text);
            if nums.is_empty() {
                continue;
            }

            let novel: Vec<f64> = nums
                .iter()
                .copied()
                .filter(|n| !contains_number(&seen, *n))
                .collect();

            if !novel.is_empty() && !ARITHMETIC_LINK.is_match(&step.text) {
                findings.push(self.finding(
                    -8.0,
                    Some(format!(
                        "Step {} introduces {} without deriving it from the question or earlier steps",
                        i + 1,
                        format_number(novel[0])
                    )),
                ));
            }

            seen.extend(nums);
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_causal_linkage_rewards_connected_steps() {
        let trace = parse(
            "1. The input is 6 because the problem states it.\n\
             2. Therefore doubling gives 12.\n\
             3. Thus the result is 12.",
        );
        let findings = CausalLinkage.apply("", &trace);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contribution > 0.0);
        assert!(findings[0].issue.is_none());
    }

    #[test]
    fn test_causal_linkage_penalizes_disconnected_steps() {
        let trace = parse("1. The sky has clouds.\n2. Water boils at 100 degrees.\n3. Cats sleep a lot.");
        let findings = CausalLinkage.apply("", &trace);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contribution < 0.0);
        assert!(findings[0].issue.is_some());
    }

    #[test]
    fn test_causal_linkage_skips_single_step() {
        let trace = parse("Step 1: 25 times 4 is 100.");
        assert!(CausalLinkage.apply("", &trace).is_empty());
    }

    #[test]
    fn test_contradiction_assert_then_negate() {
        let trace = parse("1. X is true because of the premise.\n2. X is false.");
        let findings = Contradiction.apply("", &trace);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].contribution, -15.0);
        assert!(findings[0].issue.as_deref().unwrap().contains("contradicts"));
    }

    #[test]
    fn test_contradiction_reconciled_is_not_flagged() {
        let trace = parse(
            "1. X is true by definition.\n\
             2. However, X is false in the colloquial sense.",
        );
        // The reconciliation marker suppresses the penalty even though
        // the polarity flips in the second step.
        let findings = Contradiction.apply("", &trace);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_contradiction_self_correction_marker() {
        let trace = parse("1. The sum equals 11.\n2. But actually the sum equals 12.");
        let findings = Contradiction.apply("", &trace);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].issue.as_deref().unwrap().contains("self-correction"));
    }

    #[test]
    fn test_non_sequitur_flags_underived_quantity() {
        let trace = parse("1. We start from the problem statement.\n2. The value 42 settles the question.");
        let findings = NonSequitur.apply("What do you get from 6 and 7?", &trace);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].issue.as_deref().unwrap().contains("42"));
    }

    #[test]
    fn test_non_sequitur_accepts_derived_quantity() {
        let trace = parse("1. 6 times 7 equals 42.");
        let findings = NonSequitur.apply("What is 6 × 7?", &trace);
        assert!(findings.is_empty());
    }
}
