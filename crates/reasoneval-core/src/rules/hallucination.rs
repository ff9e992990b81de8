//! Hallucination Risk rules.
//!
//! These rules look for assertions that arrive from nowhere: hedging
//! language standing in for derivation, and numbers with no arithmetic
//! or antecedent behind them. An explicit self-verification step earns
//! a bonus.

use crate::types::{Dimension, ReasoningTrace, RuleFinding};

use super::lexicon::{
    contains_any, contains_number, count_occurrences, numbers_in, ARITHMETIC_LINK,
    CAUSAL_CONNECTOR, HEDGING_PHRASES, VERIFICATION_MARKERS,
};
use super::Rule;

const HEDGING_PENALTY_PER_HIT: f64 = 5.0;
const HEDGING_PENALTY_CAP: f64 = 20.0;

/// Penalizes hedging/filler phrases, scaled by frequency. Steps that
/// carry a causal connector are exempt: the assertion is backed by
/// some derivation.
pub(super) struct HedgedAssertions;

impl Rule for HedgedAssertions {
    fn name(&self) -> &'static str {
        "hedged_assertions"
    }

    fn dimension(&self) -> Dimension {
        Dimension::HallucinationRisk
    }

    fn apply(&self, _question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let mut hits = 0;
        for step in trace.reasoning_steps() {
            if CAUSAL_CONNECTOR.is_match(&step.text) {
                continue;
            }
            hits += count_occurrences(&step.text.to_lowercase(), &HEDGING_PHRASES);
        }

        if hits == 0 {
            return Vec::new();
        }

        let penalty = (HEDGING_PENALTY_PER_HIT * hits as f64).min(HEDGING_PENALTY_CAP);
        vec![self.finding(
            -penalty,
            Some(format!(
                "Hedging or filler language used {hits} time(s) without supporting derivation"
            )),
        )]
    }
}

const UNSUPPORTED_PENALTY_PER_STEP: f64 = 6.0;
const UNSUPPORTED_PENALTY_CAP: f64 = 18.0;

/// Flags steps whose numbers have no arithmetic operator and no
/// antecedent number linking them to prior content.
pub(super) struct UnsupportedNumbers;

impl Rule for UnsupportedNumbers {
    fn name(&self) -> &'static str {
        "unsupported_numbers"
    }

    fn dimension(&self) -> Dimension {
        Dimension::HallucinationRisk
    }

    fn apply(&self, question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let mut prior = numbers_in(question);
        let mut flagged = 0;

        for step in trace.reasoning_steps() {
            let nums = numbers_in(&step.text);
            if nums.is_empty() {
                continue;
            }

            let all_novel = nums.iter().all(|n| !contains_number(&prior, *n));
            if all_novel && !ARITHMETIC_LINK.is_match(&step.text) {
                flagged += 1;
            }

            prior.extend(nums);
        }

        if flagged == 0 {
            return Vec::new();
        }

        let penalty = (UNSUPPORTED_PENALTY_PER_STEP * flagged as f64).min(UNSUPPORTED_PENALTY_CAP);
        vec![self.finding(
            -penalty,
            Some(format!(
                "{flagged} step(s) state numbers with no arithmetic or antecedent linking them to prior content"
            )),
        )]
    }
}

/// Bonus for an explicit re-check of the result.
pub(super) struct SelfVerification;

impl Rule for SelfVerification {
    fn name(&self) -> &'static str {
        "self_verification"
    }

    fn dimension(&self) -> Dimension {
        Dimension::HallucinationRisk
    }

    fn apply(&self, _question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let verified = trace
            .steps
            .iter()
            .any(|s| contains_any(&s.text.to_lowercase(), &VERIFICATION_MARKERS));

        if verified {
            vec![self.finding(5.0, None)]
        } else {
            Vec::new()
        }
    }
}
