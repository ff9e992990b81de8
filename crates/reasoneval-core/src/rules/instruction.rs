//! Instruction Following rules.
//!
//! The structured prompt asks for axioms, enumerated steps, and a
//! delimited final answer. One finding per structural requirement:
//! reward when satisfied, penalty with an issue when missing.

use crate::types::{Dimension, ReasoningTrace, RuleFinding, StepKind};

use super::Rule;

const STRUCTURE_REWARD: f64 = 5.0;
const STRUCTURE_PENALTY: f64 = -5.0;

/// Checks adherence to the First Principles response template.
pub(super) struct TemplateAdherence;

impl Rule for TemplateAdherence {
    fn name(&self) -> &'static str {
        "template_adherence"
    }

    fn dimension(&self) -> Dimension {
        Dimension::InstructionFollowing
    }

    fn apply(&self, _question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding> {
        let mut findings = Vec::new();

        let has_axioms = trace.steps.iter().any(|s| s.kind == StepKind::Axiom);
        findings.push(if has_axioms {
            self.finding(STRUCTURE_REWARD, None)
        } else {
            self.finding(
                STRUCTURE_PENALTY,
                Some("No explicit axioms or assumptions are stated".to_string()),
            )
        });

        let has_enumerated = trace.steps.iter().any(|s| s.kind == StepKind::Step);
        findings.push(if has_enumerated {
            self.finding(STRUCTURE_REWARD, None)
        } else {
            self.finding(
                STRUCTURE_PENALTY,
                Some("Steps are not enumerated or clearly delimited".to_string()),
            )
        });

        findings.push(if trace.has_final_answer {
            self.finding(STRUCTURE_REWARD, None)
        } else {
            self.finding(
                STRUCTURE_PENALTY,
                Some("Missing final answer marker".to_string()),
            )
        });

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_fully_structured_response_scores_positive() {
        let trace = parse(
            "1. Assume the standard order of operations.\n\
             2. Multiply 6 by 7 to get 42.\n\
             Final Answer: 42",
        );
        let findings = TemplateAdherence.apply("", &trace);
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.contribution > 0.0));
        assert!(findings.iter().all(|f| f.issue.is_none()));
    }

    #[test]
    fn test_missing_final_answer_issue() {
        let trace = parse("1. Multiply 6 by 7 to get 42.");
        let findings = TemplateAdherence.apply("", &trace);
        assert!(findings
            .iter()
            .any(|f| f.issue.as_deref() == Some("Missing final answer marker")));
    }

    #[test]
    fn test_empty_trace_fails_every_requirement() {
        let trace = parse("");
        let findings = TemplateAdherence.apply("", &trace);
        assert_eq!(findings.len(), 3);
        assert!(findings.iter().all(|f| f.contribution < 0.0));
        assert_eq!(findings.iter().filter(|f| f.issue.is_some()).count(), 3);
    }
}
