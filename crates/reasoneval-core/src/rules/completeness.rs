//! Completeness rules.
//!
//! These rules ask whether enough work is shown: step count against
//! question complexity, a final answer that traces back to the steps,
//! and unit discipline when the question carries units.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{Dimension, ReasoningTrace, RuleFinding};

use super::lexicon::{
    contains_number, format_number, numbers_in, ARITHMETIC_LINK, NUMBER, UNIT_TOKEN,
};
use super::Rule;

lazy_static! {
    /// Question vocabulary implying a computation is expected.
    static ref COMPUTATION_CUE: Regex = Regex::new(
        r"(?i)\b(?:calculate|compute|how many|how much|sum|total|average|product|difference)\b"
    )
    .unwrap();
}

/// Total reasoning text below this length counts as too brief.
const BRIEF_REASONING_CHARS: usize = 40;

/// Checks step count against the question's apparent complexity and
/// that numeric questions show numeric work.
pub(super) struct StepSufficiency;

impl StepSufficiency {
    fn expects_computation(question: &str) -> bool {
        NUMBER.is_match(question) || COMPUTATION_CUE.is_match(question)
    }

    /// Rough step expectation: multiple quantities or clauses in the
    /// question imply multiple derivation steps.
    fn expected_steps(question: &str) -> usize {
        let quantities = numbers_in(question).len();
        let clauses = question.matches(',').count()
            + question.to_lowercase().matches(" and ").count()
            + 1;
        quantities.max(clauses).saturating_sub(1).max(1)
    }
}

impl Rule for StepSufficiency {
    fn name(&self) -> &'static str {
        "step_sufficiency"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Completeness
    }

    fn apply(&self, question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let count = trace.reasoning_steps().count();
        let mut findings = Vec::new();

        if count == 0 {
            findings.push(self.finding(-25.0, Some("No reasoning steps found".to_string())));
        } else {
            let expected = Self::expected_steps(question);
            if count < expected {
                findings.push(self.finding(
                    -10.0,
                    Some(format!(
                        "Only {count} reasoning step(s) where the question suggests at least {expected}"
                    )),
                ));
            }

            let total_len: usize = trace.reasoning_steps().map(|s| s.text.len()).sum();
            if total_len < BRIEF_REASONING_CHARS {
                findings.push(self.finding(-10.0, Some("Reasoning is too brief".to_string())));
            }
        }

        if Self::expects_computation(question) {
            let numeric_work = trace
                .reasoning_steps()
                .any(|s| !numbers_in(&s.text).is_empty() || ARITHMETIC_LINK.is_match(&s.text));
            if !numeric_work {
                findings.push(self.finding(
                    -15.0,
                    Some("Question calls for computation but no numeric work is shown".to_string()),
                ));
            }
        }

        findings
    }
}

/// Checks that the numbers stated in the final answer are traceable to
/// the question or some step's computation.
pub(super) struct AnswerTraceability;

impl Rule for AnswerTraceability {
    fn name(&self) -> &'static str {
        "answer_traceability"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Completeness
    }

    fn apply(&self, question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let answer = match trace.final_answer() {
            Some(step) => step,
            None => {
                return vec![self.finding(
                    -10.0,
                    Some("No final answer to trace back to the reasoning".to_string()),
                )]
            }
        };

        let answer_numbers = numbers_in(&answer.text);
        if answer_numbers.is_empty() {
            return Vec::new();
        }

        let mut prior = numbers_in(question);
        for step in trace.reasoning_steps() {
            prior.extend(numbers_in(&step.text));
        }

        let untraced: Vec<f64> = answer_numbers
            .into_iter()
            .filter(|n| !contains_number(&prior, *n))
            .collect();

        if untraced.is_empty() {
            vec![self.finding(5.0, None)]
        } else {
            vec![self.finding(
                -12.0,
                Some(format!(
                    "Final answer states {} but no step derives it",
                    format_number(untraced[0])
                )),
            )]
        }
    }
}

/// Bonus for unit-carrying calculations when the question involves
/// units. Finding nothing is the normal outcome for unitless questions.
pub(super) struct UnitDiscipline;

impl Rule for UnitDiscipline {
    fn name(&self) -> &'static str {
        "unit_discipline"
    }

    fn dimension(&self) -> Dimension {
        Dimension::Completeness
    }

    fn apply(&self, question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        if !UNIT_TOKEN.is_match(question) {
            return Vec::new();
        }

        let carries_units = trace
            .reasoning_steps()
            .any(|s| UNIT_TOKEN.is_match(&s.text) && !numbers_in(&s.text).is_empty());

        if carries_units {
            vec![self.finding(5.0, None)]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_no_steps_is_penalized() {
        let trace = parse("");
        let findings = StepSufficiency.apply("What is 2 + 2?", &trace);
        assert!(findings
            .iter()
            .any(|f| f.issue.as_deref() == Some("No reasoning steps found")));
        // The numeric question also gets the missing-computation penalty.
        assert!(findings.len() >= 2);
    }

    #[test]
    fn test_too_few_steps_for_complex_question() {
        let trace = parse("The answer follows directly from the problem statement somehow.");
        let findings = StepSufficiency.apply(
            "A train travels 60 km in 2 hours, rests, and then travels 30 km in 1 hour. \
             What is its average speed?",
            &trace,
        );
        assert!(findings
            .iter()
            .any(|f| f.issue.as_deref().unwrap_or("").contains("suggests at least")));
    }

    #[test]
    fn test_numeric_work_satisfies_computation_check() {
        let trace = parse("Step 1: 25 times 4 is 100.");
        let findings = StepSufficiency.apply("What is 25 × 4?", &trace);
        assert!(!findings
            .iter()
            .any(|f| f.issue.as_deref().unwrap_or("").contains("no numeric work")));
    }

    #[test]
    fn test_missing_final_answer_is_flagged() {
        let trace = parse("1. Add 2 and 2.\n2. The total equals 4.");
        let findings = AnswerTraceability.apply("What is 2 + 2?", &trace);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contribution < 0.0);
    }

    #[test]
    fn test_untraceable_answer_number() {
        let trace = parse("1. 2 plus 2 equals 4.\nFinal Answer: 7");
        let findings = AnswerTraceability.apply("What is 2 + 2?", &trace);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].issue.as_deref().unwrap().contains('7'));
    }

    #[test]
    fn test_traceable_answer_gets_bonus() {
        let trace = parse("1. 2 plus 2 equals 4.\nFinal Answer: 4");
        let findings = AnswerTraceability.apply("What is 2 + 2?", &trace);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contribution > 0.0);
        assert!(findings[0].issue.is_none());
    }

    #[test]
    fn test_unit_bonus_when_question_and_steps_carry_units() {
        let trace = parse("1. Speed is 60 km divided by 2 hours, which gives 30 km per hour.");
        let findings = UnitDiscipline.apply("A car covers 60 km in 2 hours; how fast is it?", &trace);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].contribution > 0.0);
    }

    #[test]
    fn test_no_unit_finding_for_unitless_question() {
        let trace = parse("1. 2 plus 2 equals 4.");
        assert!(UnitDiscipline.apply("What is 2 + 2?", &trace).is_empty());
    }
}
