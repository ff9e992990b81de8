//! # reasoneval-core
//!
//! Deterministic reasoning-quality evaluation engine.
//!
//! This crate scores the reasoning trace a language model produces for
//! a logic/math question along four dimensions — Logical Consistency,
//! Completeness, Instruction Following, Hallucination Risk — and maps
//! the weighted overall score to a discrete verdict.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces the same report
//! 2. **Total**: Malformed or empty model text never fails parsing
//! 3. **Isolated heuristics**: One brittle rule cannot blank a report
//! 4. **Parallel-safe**: Evaluations share no mutable state
//!
//! ## Example
//!
//! ```rust,ignore
//! use reasoneval_core::{evaluate_reasoning, EvalConfig};
//!
//! let config = EvalConfig::default();
//! let report = evaluate_reasoning(
//!     "What is 25 × 4?",
//!     "Step 1: 25 times 4 is 100. Final Answer: 100.",
//!     &config,
//! )?;
//!
//! println!("{} ({:.1})", report.verdict.label(), report.overall_score);
//! for issue in &report.issues {
//!     println!("- {issue}");
//! }
//! ```

pub mod config;
pub mod parser;
pub mod rules;
pub mod scorer;
pub mod types;

// Re-export main types at crate root
pub use config::{ConfigError, DimensionWeights, EvalConfig};
pub use rules::{FindingsByDimension, Rule};
pub use types::{
    Dimension, DimensionScore, EvaluationReport, EvaluationRequest, ReasoningStep, ReasoningTrace,
    RuleFinding, StepKind, Verdict,
};

use thiserror::Error;

/// Errors that can occur when starting an evaluation.
///
/// Nothing inside the pipeline itself fails: rule failures are isolated
/// and parsing is total.
#[derive(Error, Debug)]
pub enum EvaluationError {
    /// The raw model text was absent entirely. An empty string is
    /// valid input and yields a uniformly low-completeness report.
    #[error("raw model text is missing")]
    MissingInput,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Evaluate a raw model response against a question.
///
/// This is the main entry point. The config is validated first (a bad
/// config is fatal before any scoring runs), then the pipeline is a
/// pure function: parse the trace, run every registered rule over it,
/// aggregate the findings into a report.
pub fn evaluate_reasoning(
    question: &str,
    raw_model_text: &str,
    config: &EvalConfig,
) -> Result<EvaluationReport, EvaluationError> {
    config.validate()?;

    let trace = parser::parse(raw_model_text);
    let findings = rules::run_all(question, &trace);
    Ok(scorer::aggregate(findings, config))
}

/// Evaluate a deserialized request, rejecting absent model text.
pub fn evaluate_request(
    request: &EvaluationRequest,
    config: &EvalConfig,
) -> Result<EvaluationReport, EvaluationError> {
    let raw = request
        .raw_model_text
        .as_deref()
        .ok_or(EvaluationError::MissingInput)?;
    evaluate_reasoning(&request.question, raw, config)
}
