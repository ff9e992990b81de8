//! Evaluation configuration: dimension weights, baseline, and verdict
//! threshold bands.
//!
//! Configuration is validated eagerly, before any evaluation runs, so a
//! bad deployment config cannot silently skew every report. Loaded
//! configs are read-only for their lifetime and safe to share across
//! concurrent evaluations.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::Dimension;

/// Tolerance for the weights-sum-to-one check.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Errors raised when a configuration is structurally invalid.
///
/// All of these are fatal: evaluation never starts with a bad config.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("dimension weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("dimension weight for {0} is negative")]
    NegativeWeight(&'static str),

    #[error("verdict thresholds must be strictly increasing within (0, 100), got {0:?}")]
    Thresholds([f64; 3]),

    #[error("baseline score must lie in [0, 100], got {0}")]
    Baseline(f64),
}

/// Relative weight of each dimension in the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub logical_consistency: f64,
    pub completeness: f64,
    pub instruction_following: f64,
    pub hallucination_risk: f64,
}

impl DimensionWeights {
    pub fn for_dimension(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::LogicalConsistency => self.logical_consistency,
            Dimension::Completeness => self.completeness,
            Dimension::InstructionFollowing => self.instruction_following,
            Dimension::HallucinationRisk => self.hallucination_risk,
        }
    }

    fn sum(&self) -> f64 {
        self.logical_consistency
            + self.completeness
            + self.instruction_following
            + self.hallucination_risk
    }
}

impl Default for DimensionWeights {
    /// Equal weighting. Explicit policy, not an assumption baked into
    /// downstream logic; override via config file to retune.
    fn default() -> Self {
        Self {
            logical_consistency: 0.25,
            completeness: 0.25,
            instruction_following: 0.25,
            hallucination_risk: 0.25,
        }
    }
}

/// Evaluation tuning parameters.
///
/// The defaults satisfy the documented scoring properties but are not
/// load-bearing beyond that; all of them are overridable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Per-dimension weights for the overall score. Must sum to 1.0.
    pub weights: DimensionWeights,

    /// Neutral-good prior each dimension starts from before findings
    /// move it.
    pub baseline: f64,

    /// Three increasing cut points partitioning [0, 100] into the
    /// Poor / Weak / Good / Excellent bands.
    pub verdict_thresholds: [f64; 3],
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            weights: DimensionWeights::default(),
            baseline: 70.0,
            verdict_thresholds: [40.0, 60.0, 80.0],
        }
    }
}

impl EvalConfig {
    /// Parse a config from a YAML string. Validation runs before the
    /// config is returned.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: EvalConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Check the structural invariants: non-negative weights summing to
    /// 1.0, strictly increasing thresholds inside (0, 100), baseline in
    /// [0, 100].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("logical_consistency", self.weights.logical_consistency),
            ("completeness", self.weights.completeness),
            (
                "instruction_following",
                self.weights.instruction_following,
            ),
            ("hallucination_risk", self.weights.hallucination_risk),
        ];
        for (name, weight) in named {
            if weight < 0.0 {
                return Err(ConfigError::NegativeWeight(name));
            }
        }

        let sum = self.weights.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSum(sum));
        }

        let [a, b, c] = self.verdict_thresholds;
        if !(0.0 < a && a < b && b < c && c < 100.0) {
            return Err(ConfigError::Thresholds(self.verdict_thresholds));
        }

        if !(0.0..=100.0).contains(&self.baseline) {
            return Err(ConfigError::Baseline(self.baseline));
        }

        Ok(())
    }
}
