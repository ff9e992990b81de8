//! Scorer: turns raw rule findings into the final report.
//!
//! Each dimension starts from a neutral-good baseline and moves by
//! evidence; the sum is clamped to [0, 100] regardless of how large the
//! raw signals get. The overall score is a weighted average of the four
//! dimensions and the verdict is a monotone step function of it.

use crate::config::EvalConfig;
use crate::rules::FindingsByDimension;
use crate::types::{Dimension, DimensionScore, EvaluationReport, Verdict};

/// Combine per-dimension findings into an [`EvaluationReport`].
///
/// Deterministic: identical findings and config always produce an
/// identical report.
pub fn aggregate(findings: FindingsByDimension, config: &EvalConfig) -> EvaluationReport {
    let parts = findings.into_parts();

    let mut dimensions = Vec::with_capacity(Dimension::ALL.len());
    for (dimension, findings) in Dimension::ALL.into_iter().zip(parts) {
        let raw: f64 = findings.iter().map(|f| f.contribution).sum();
        let score = (config.baseline + raw).clamp(0.0, 100.0);
        dimensions.push(DimensionScore {
            dimension,
            score,
            findings,
        });
    }

    let overall_score = dimensions
        .iter()
        .map(|d| d.score * config.weights.for_dimension(d.dimension))
        .sum::<f64>()
        .clamp(0.0, 100.0);

    let verdict = verdict_for(overall_score, config.verdict_thresholds);

    let issues = dimensions
        .iter()
        .flat_map(|d| d.findings.iter().filter_map(|f| f.issue.clone()))
        .collect();

    EvaluationReport {
        dimensions,
        overall_score,
        verdict,
        issues,
    }
}

/// Map an overall score to its verdict band. Bands are contiguous and
/// cover [0, 100] with no gaps.
fn verdict_for(score: f64, thresholds: [f64; 3]) -> Verdict {
    let [poor_below, weak_below, good_below] = thresholds;
    if score < poor_below {
        Verdict::Poor
    } else if score < weak_below {
        Verdict::Weak
    } else if score < good_below {
        Verdict::Good
    } else {
        Verdict::Excellent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RuleFinding;
    use proptest::prelude::*;

    fn findings_with(dimension: Dimension, contributions: &[f64]) -> Vec<RuleFinding> {
        contributions
            .iter()
            .map(|&c| RuleFinding::new(dimension, "synthetic", c, None))
            .collect()
    }

    #[test]
    fn test_baseline_with_no_findings() {
        let report = aggregate(FindingsByDimension::default(), &EvalConfig::default());
        for d in &report.dimensions {
            assert_eq!(d.score, 70.0);
        }
        assert_eq!(report.overall_score, 70.0);
        assert_eq!(report.verdict, Verdict::Good);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_clamping_against_adversarial_contributions() {
        let findings = FindingsByDimension {
            logical_consistency: findings_with(Dimension::LogicalConsistency, &[1e6]),
            completeness: findings_with(Dimension::Completeness, &[-1e6]),
            ..FindingsByDimension::default()
        };

        let report = aggregate(findings, &EvalConfig::default());
        assert_eq!(
            report.dimension(Dimension::LogicalConsistency).unwrap().score,
            100.0
        );
        assert_eq!(report.dimension(Dimension::Completeness).unwrap().score, 0.0);
        assert!((0.0..=100.0).contains(&report.overall_score));
    }

    #[test]
    fn test_verdict_band_boundaries() {
        let thresholds = [40.0, 60.0, 80.0];
        assert_eq!(verdict_for(0.0, thresholds), Verdict::Poor);
        assert_eq!(verdict_for(39.9, thresholds), Verdict::Poor);
        assert_eq!(verdict_for(40.0, thresholds), Verdict::Weak);
        assert_eq!(verdict_for(59.9, thresholds), Verdict::Weak);
        assert_eq!(verdict_for(60.0, thresholds), Verdict::Good);
        assert_eq!(verdict_for(79.9, thresholds), Verdict::Good);
        assert_eq!(verdict_for(80.0, thresholds), Verdict::Excellent);
        assert_eq!(verdict_for(100.0, thresholds), Verdict::Excellent);
    }

    #[test]
    fn test_issue_order_is_dimension_then_rule() {
        let findings = FindingsByDimension {
            logical_consistency: vec![RuleFinding::new(
                Dimension::LogicalConsistency,
                "a",
                -1.0,
                Some("first".to_string()),
            )],
            hallucination_risk: vec![RuleFinding::new(
                Dimension::HallucinationRisk,
                "b",
                -1.0,
                Some("last".to_string()),
            )],
            ..FindingsByDimension::default()
        };

        let report = aggregate(findings, &EvalConfig::default());
        assert_eq!(report.issues, vec!["first".to_string(), "last".to_string()]);
    }

    #[test]
    fn test_weight_shift_toward_strong_dimension_raises_overall() {
        use crate::config::DimensionWeights;

        // Logical Consistency scores above the others; shifting weight
        // toward it (renormalized) must not decrease the overall score.
        let strong = FindingsByDimension {
            logical_consistency: findings_with(Dimension::LogicalConsistency, &[20.0]),
            completeness: findings_with(Dimension::Completeness, &[-10.0]),
            ..FindingsByDimension::default()
        };

        let equal = EvalConfig::default();
        let tilted = EvalConfig {
            weights: DimensionWeights {
                logical_consistency: 0.55,
                completeness: 0.15,
                instruction_following: 0.15,
                hallucination_risk: 0.15,
            },
            ..EvalConfig::default()
        };
        tilted.validate().unwrap();

        let base = aggregate(strong.clone(), &equal).overall_score;
        let shifted = aggregate(strong, &tilted).overall_score;
        assert!(shifted >= base);
    }

    proptest! {
        #[test]
        fn prop_scores_always_clamped(
            lc in proptest::collection::vec(-500.0f64..500.0, 0..8),
            comp in proptest::collection::vec(-500.0f64..500.0, 0..8),
            instr in proptest::collection::vec(-500.0f64..500.0, 0..8),
            hall in proptest::collection::vec(-500.0f64..500.0, 0..8),
        ) {
            let findings = FindingsByDimension {
                logical_consistency: findings_with(Dimension::LogicalConsistency, &lc),
                completeness: findings_with(Dimension::Completeness, &comp),
                instruction_following: findings_with(Dimension::InstructionFollowing, &instr),
                hallucination_risk: findings_with(Dimension::HallucinationRisk, &hall),
            };

            let report = aggregate(findings, &EvalConfig::default());
            for d in &report.dimensions {
                prop_assert!((0.0..=100.0).contains(&d.score));
            }
            prop_assert!((0.0..=100.0).contains(&report.overall_score));
        }
    }
}
