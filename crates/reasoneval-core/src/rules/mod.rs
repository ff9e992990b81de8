//! Dimension Rule Engine.
//!
//! A fixed-order registry of independent heuristic rules. Each rule
//! inspects the question and the parsed trace and contributes zero or
//! more findings to exactly one dimension. Contributions are summed by
//! the scorer, never short-circuited, so ordering only matters for
//! reproducible issue-list ordering in the report.
//!
//! Individual heuristics are expected to be fragile against unusual
//! input, so every rule invocation runs behind a local failure
//! boundary: a panicking rule contributes zero findings and is logged
//! as a non-fatal diagnostic.

mod completeness;
mod consistency;
mod hallucination;
mod instruction;
pub(crate) mod lexicon;

use std::panic::{catch_unwind, AssertUnwindSafe};

use lazy_static::lazy_static;

use crate::types::{Dimension, ReasoningTrace, RuleFinding};

/// One heuristic rule. Implementations are stateless and targeted at a
/// single dimension; returning no findings is a normal outcome, not an
/// error path.
pub trait Rule: Send + Sync {
    /// Stable identifier used in findings and diagnostics.
    fn name(&self) -> &'static str;

    /// The one dimension this rule contributes to.
    fn dimension(&self) -> Dimension;

    /// Inspect the trace and question, return zero or more findings.
    fn apply(&self, question: &str, trace: &ReasoningTrace) -> Vec<RuleFinding>;

    /// Build a finding attributed to this rule.
    fn finding(&self, contribution: f64, issue: Option<String>) -> RuleFinding {
        RuleFinding::new(self.dimension(), self.name(), contribution, issue)
    }
}

lazy_static! {
    /// Process-wide read-only rule registry, initialized once. Adding a
    /// rule here never requires touching the scorer.
    static ref REGISTRY: Vec<Box<dyn Rule>> = vec![
        Box::new(consistency::CausalLinkage),
        Box::new(consistency::Contradiction),
        Box::new(consistency::NonSequitur),
        Box::new(completeness::StepSufficiency),
        Box::new(completeness::AnswerTraceability),
        Box::new(completeness::UnitDiscipline),
        Box::new(instruction::TemplateAdherence),
        Box::new(hallucination::HedgedAssertions),
        Box::new(hallucination::UnsupportedNumbers),
        Box::new(hallucination::SelfVerification),
    ];
}

/// Findings grouped by dimension, in registry order within each
/// dimension.
#[derive(Debug, Default, Clone)]
pub struct FindingsByDimension {
    pub logical_consistency: Vec<RuleFinding>,
    pub completeness: Vec<RuleFinding>,
    pub instruction_following: Vec<RuleFinding>,
    pub hallucination_risk: Vec<RuleFinding>,
}

impl FindingsByDimension {
    fn push(&mut self, finding: RuleFinding) {
        match finding.dimension {
            Dimension::LogicalConsistency => self.logical_consistency.push(finding),
            Dimension::Completeness => self.completeness.push(finding),
            Dimension::InstructionFollowing => self.instruction_following.push(finding),
            Dimension::HallucinationRisk => self.hallucination_risk.push(finding),
        }
    }

    pub fn for_dimension(&self, dimension: Dimension) -> &[RuleFinding] {
        match dimension {
            Dimension::LogicalConsistency => &self.logical_consistency,
            Dimension::Completeness => &self.completeness,
            Dimension::InstructionFollowing => &self.instruction_following,
            Dimension::HallucinationRisk => &self.hallucination_risk,
        }
    }

    /// The four finding lists in canonical dimension order.
    pub fn into_parts(self) -> [Vec<RuleFinding>; 4] {
        [
            self.logical_consistency,
            self.completeness,
            self.instruction_following,
            self.hallucination_risk,
        ]
    }
}

/// Run the full registry over one trace.
pub fn run_all(question: &str, trace: &ReasoningTrace) -> FindingsByDimension {
    run_rules(&REGISTRY, question, trace)
}

fn run_rules(
    rules: &[Box<dyn Rule>],
    question: &str,
    trace: &ReasoningTrace,
) -> FindingsByDimension {
    let mut findings = FindingsByDimension::default();

    for rule in rules {
        match catch_unwind(AssertUnwindSafe(|| rule.apply(question, trace))) {
            Ok(list) => {
                for finding in list {
                    findings.push(finding);
                }
            }
            Err(_) => {
                tracing::warn!(rule = rule.name(), "rule failed; contributing no findings");
            }
        }
    }

    findings
}
