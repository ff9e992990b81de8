//! Core data types for reasoning evaluation.
//!
//! Everything here is an immutable value created fresh per evaluation.
//! The pipeline shares no mutable state across invocations, so reports
//! from concurrent evaluations never interfere.

use serde::{Deserialize, Serialize};

/// One of the four independent quality axes.
///
/// The order of [`Dimension::ALL`] is the canonical order used for
/// report layout and issue-list concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    LogicalConsistency,
    Completeness,
    InstructionFollowing,
    HallucinationRisk,
}

impl Dimension {
    /// All dimensions in canonical report order.
    pub const ALL: [Dimension; 4] = [
        Dimension::LogicalConsistency,
        Dimension::Completeness,
        Dimension::InstructionFollowing,
        Dimension::HallucinationRisk,
    ];

    /// Human-readable name for display.
    pub fn name(&self) -> &'static str {
        match self {
            Dimension::LogicalConsistency => "Logical Consistency",
            Dimension::Completeness => "Completeness",
            Dimension::InstructionFollowing => "Instruction Following",
            Dimension::HallucinationRisk => "Hallucination Risk",
        }
    }
}

/// Classification of a parsed segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// A stated assumption, definition, or given fact.
    Axiom,
    /// A recognized reasoning step.
    Step,
    /// The delimited final answer.
    FinalAnswer,
    /// Content with no recognizable structure.
    Unclassified,
}

/// One unit of the parsed trace. Ordering is meaningful: later steps
/// may depend on earlier ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningStep {
    pub kind: StepKind,
    /// Verbatim text span from the raw response.
    pub text: String,
    /// Zero-based position within the trace.
    pub index: usize,
}

/// The ordered decomposition of a raw model response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningTrace {
    pub steps: Vec<ReasoningStep>,
    pub has_final_answer: bool,
    /// Length of the raw text the trace was parsed from.
    pub raw_len: usize,
}

impl ReasoningTrace {
    /// Total number of steps, final answer included.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Steps that carry reasoning content (everything but the final answer).
    pub fn reasoning_steps(&self) -> impl Iterator<Item = &ReasoningStep> {
        self.steps
            .iter()
            .filter(|s| s.kind != StepKind::FinalAnswer)
    }

    /// The final-answer step, if the response delimited one.
    pub fn final_answer(&self) -> Option<&ReasoningStep> {
        self.steps.iter().find(|s| s.kind == StepKind::FinalAnswer)
    }
}

/// A single rule's scored observation about the trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleFinding {
    pub dimension: Dimension,
    /// Name of the rule that produced this finding.
    pub rule: &'static str,
    /// Signed contribution added to the dimension baseline. Negative
    /// values are penalties.
    pub contribution: f64,
    /// Human-readable issue description, when the finding flags a problem.
    pub issue: Option<String>,
}

impl RuleFinding {
    pub fn new(
        dimension: Dimension,
        rule: &'static str,
        contribution: f64,
        issue: Option<String>,
    ) -> Self {
        Self {
            dimension,
            rule,
            contribution,
            issue,
        }
    }
}

/// A dimension's normalized score together with the findings behind it.
///
/// Invariant: `score` lies in [0, 100] regardless of the raw signal sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub score: f64,
    pub findings: Vec<RuleFinding>,
}

/// Discrete quality label derived from the overall score.
///
/// Ordered so that `Verdict::Good >= Verdict::Weak` reads naturally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verdict {
    Poor,
    Weak,
    Good,
    Excellent,
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Poor => "Poor",
            Verdict::Weak => "Weak",
            Verdict::Good => "Good",
            Verdict::Excellent => "Excellent",
        }
    }
}

/// The terminal artifact of one evaluation. Produced once, never
/// mutated, safe to serialize and hand to any consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// The four dimension scores in canonical order.
    pub dimensions: Vec<DimensionScore>,
    /// Weighted combination of the dimension scores, clamped to [0, 100].
    pub overall_score: f64,
    pub verdict: Verdict,
    /// All issue descriptions across dimensions, in stable
    /// dimension-then-rule order.
    pub issues: Vec<String>,
}

impl EvaluationReport {
    /// Look up one dimension's score.
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionScore> {
        self.dimensions.iter().find(|d| d.dimension == dimension)
    }
}

/// Inbound request shape for callers that deserialize from the wire.
///
/// `raw_model_text` may be empty or arbitrarily malformed; only its
/// complete absence is rejected.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationRequest {
    pub question: String,
    #[serde(default)]
    pub raw_model_text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_order_is_stable() {
        assert_eq!(Dimension::ALL[0], Dimension::LogicalConsistency);
        assert_eq!(Dimension::ALL[3], Dimension::HallucinationRisk);
    }

    #[test]
    fn test_verdict_ordering() {
        assert!(Verdict::Excellent > Verdict::Good);
        assert!(Verdict::Good > Verdict::Weak);
        assert!(Verdict::Weak > Verdict::Poor);
    }

    #[test]
    fn test_trace_accessors() {
        let trace = ReasoningTrace {
            steps: vec![
                ReasoningStep {
                    kind: StepKind::Step,
                    text: "2 + 2 = 4".to_string(),
                    index: 0,
                },
                ReasoningStep {
                    kind: StepKind::FinalAnswer,
                    text: "4".to_string(),
                    index: 1,
                },
            ],
            has_final_answer: true,
            raw_len: 30,
        };

        assert_eq!(trace.step_count(), 2);
        assert_eq!(trace.reasoning_steps().count(), 1);
        assert_eq!(trace.final_answer().map(|s| s.text.as_str()), Some("4"));
    }

    #[test]
    fn test_request_tolerates_missing_text() {
        let req: EvaluationRequest =
            serde_json::from_str(r#"{"question": "What is 2 + 2?"}"#).unwrap();
        assert!(req.raw_model_text.is_none());
    }
}
