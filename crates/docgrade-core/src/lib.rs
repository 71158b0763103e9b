//! # docgrade-core
//!
//! Deterministic scoring engine for documentation evaluation.
//!
//! This crate holds everything about scoring that does not touch the
//! network: the data model, self-consistency round planning, outcome
//! aggregation, score reduction, and the built-in local heuristic
//! metrics.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: the same multiset of task outcomes always
//!    reduces to the same result, regardless of completion order
//! 2. **No I/O**: judge calls live in `docgrade-runtime`; this crate
//!    only consumes their outcomes
//! 3. **Bounded**: every produced score is in `[0, 10]`, variance is
//!    non-negative, confidence is in `[0, 1]`
//!
//! ## Example
//!
//! ```rust
//! use docgrade_core::{aggregate, reduce, JudgeId, JudgeTask, LocalScores, RoundPlan,
//!     ScoreWeights, TaskOutcome};
//!
//! let judges = [JudgeId::Gigachat, JudgeId::Gemini];
//! let tasks = RoundPlan::default().tasks(&judges);
//! assert_eq!(tasks.len(), 6); // 3 rounds x 2 judges
//!
//! // Outcomes normally come from the runtime executor.
//! let outcomes: Vec<(JudgeTask, TaskOutcome)> = tasks
//!     .into_iter()
//!     .map(|t| (t, TaskOutcome::Success(8.0)))
//!     .collect();
//!
//! let agg = aggregate(&judges, &outcomes);
//! let local = LocalScores { semantic: 8.0, coverage: 8.0, readability: 7.0 };
//! let reduction = reduce(&ScoreWeights::default(), &local, &agg);
//! assert!((reduction.final_score - 8.0).abs() < 1e-9);
//! ```

pub mod aggregate;
pub mod metrics;
pub mod plan;
pub mod reduce;
pub mod types;

// Re-export main types at crate root
pub use aggregate::{aggregate, Aggregate};
pub use metrics::{LexicalMetrics, LocalMetrics};
pub use plan::RoundPlan;
pub use reduce::{reduce, LocalScores, Reduction, ScoreWeights, WeightError};
pub use types::{
    round2, EvaluationError, EvaluationInput, EvaluationResult, FailureKind, JudgeId, JudgeTask,
    TaskOutcome,
};
