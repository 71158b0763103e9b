//! Final score reduction.
//!
//! Blends the local metric scores with the pooled judge mean under
//! configured weights, with an explicit degraded branch for the case
//! where no judge produced a usable score.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::aggregate::Aggregate;

/// Tolerance for the weight-sum invariant.
const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Weight configuration violations. Fatal at startup, never a
/// per-request condition.
#[derive(Error, Debug, PartialEq)]
pub enum WeightError {
    #[error("weight '{name}' is negative: {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("weights must sum to 1.0 (±{tolerance}), got {sum}")]
    BadSum { sum: f64, tolerance: f64 },
}

/// The weight triple for the blended formula.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the semantic similarity score
    pub semantic: f64,

    /// Weight of the keyword coverage score
    pub coverage: f64,

    /// Weight of the pooled judge mean
    pub llm: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            semantic: 0.2,
            coverage: 0.2,
            llm: 0.6,
        }
    }
}

impl ScoreWeights {
    /// Validate the startup invariant: non-negative weights summing
    /// to 1.0 within tolerance.
    pub fn validate(&self) -> Result<(), WeightError> {
        for (name, value) in [
            ("semantic", self.semantic),
            ("coverage", self.coverage),
            ("llm", self.llm),
        ] {
            if value < 0.0 {
                return Err(WeightError::Negative { name, value });
            }
        }

        let sum = self.semantic + self.coverage + self.llm;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(WeightError::BadSum {
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        Ok(())
    }
}

/// Local heuristic scores feeding the reduction.
#[derive(Debug, Clone, Copy)]
pub struct LocalScores {
    /// Semantic similarity, `[0, 10]`
    pub semantic: f64,

    /// Keyword coverage, `[0, 10]`
    pub coverage: f64,

    /// Readability, `[0, 10]`; reported but not blended
    pub readability: f64,
}

/// The reduced final score with its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reduction {
    /// Blended (or fallback) score, `[0, 10]`
    pub final_score: f64,

    /// Confidence after any degraded-mode override, `[0, 1]`
    pub confidence: f64,

    /// True when the degraded fallback formula was used
    pub degraded: bool,
}

/// Produce the final bounded score.
///
/// Normal path: `sem·W_sem + cov·W_cov + pooled_mean·W_llm`.
///
/// Degraded path (empty pool): `(sem + cov) / 2` with confidence
/// forced to 0.0. This is a distinct formula, not the weighted blend
/// with a zero LLM weight, and the result is flagged as degraded.
pub fn reduce(weights: &ScoreWeights, local: &LocalScores, aggregate: &Aggregate) -> Reduction {
    match aggregate.pooled_mean {
        Some(judge_mean) => Reduction {
            final_score: local.semantic * weights.semantic
                + local.coverage * weights.coverage
                + judge_mean * weights.llm,
            confidence: aggregate.confidence,
            degraded: false,
        },
        None => {
            tracing::warn!("no judge produced a score, falling back to local metrics only");
            Reduction {
                final_score: (local.semantic + local.coverage) / 2.0,
                confidence: 0.0,
                degraded: true,
            }
        }
    }
}
