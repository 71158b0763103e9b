//! Fan-in statistics over judge task outcomes.
//!
//! Reduces the flat `(JudgeTask, TaskOutcome)` list into per-judge
//! means and a pooled global sample with variance and confidence.
//! Deterministic for a given multiset of outcomes: completion order
//! never matters, and grouping uses a `BTreeMap` keyed by judge
//! identity.

use std::collections::BTreeMap;

use crate::types::{JudgeId, JudgeTask, TaskOutcome};

/// Aggregated view of all task outcomes for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    /// Mean of successful scores per judge. `None` when a judge had
    /// zero successes: absence, not a score of 0.0.
    pub judge_means: BTreeMap<JudgeId, Option<f64>>,

    /// Mean of the pooled global sample, `None` when the pool is
    /// empty. A judge with more successful rounds weighs
    /// proportionally more here.
    pub pooled_mean: Option<f64>,

    /// Sample variance of the pooled global sample. 0.0 for pools
    /// of size <= 1, including the empty pool.
    pub variance: f64,

    /// `1 / (1 + variance)`, forced to 0.0 when the pool is empty.
    /// A dispersion heuristic, not a statistical confidence
    /// interval.
    pub confidence: f64,
}

impl Aggregate {
    /// Whether any judge produced a usable score.
    pub fn has_opinions(&self) -> bool {
        self.pooled_mean.is_some()
    }
}

/// Reduce task outcomes into per-judge and global statistics.
///
/// `judges` is the active judge set; every member gets an entry in
/// the per-judge map even when all of its tasks failed or declined.
pub fn aggregate(judges: &[JudgeId], outcomes: &[(JudgeTask, TaskOutcome)]) -> Aggregate {
    let mut by_judge: BTreeMap<JudgeId, Vec<f64>> =
        judges.iter().map(|&j| (j, Vec::new())).collect();

    for (task, outcome) in outcomes {
        if let Some(score) = outcome.score() {
            by_judge.entry(task.judge).or_default().push(score);
        }
    }

    let judge_means = by_judge
        .iter()
        .map(|(&judge, scores)| (judge, mean(scores)))
        .collect();

    let pooled: Vec<f64> = by_judge.values().flatten().copied().collect();
    let pooled_mean = mean(&pooled);

    let variance = sample_variance(&pooled);
    let confidence = if pooled.is_empty() {
        // Absence of evidence is zero confidence, not the maximal
        // confidence the formula would give a zero-variance pool.
        0.0
    } else {
        1.0 / (1.0 + variance)
    };

    tracing::debug!(
        pool_size = pooled.len(),
        variance,
        confidence,
        "aggregated judge outcomes"
    );

    Aggregate {
        judge_means,
        pooled_mean,
        variance,
        confidence,
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample variance with the n-1 denominator; 0.0 for n <= 1.
fn sample_variance(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / values.len() as f64;
    let squared: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    squared / (values.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureKind;

    fn task(judge: JudgeId) -> JudgeTask {
        JudgeTask {
            judge,
            temperature: 0.1,
        }
    }

    const THREE: [JudgeId; 3] = [JudgeId::Gigachat, JudgeId::Gemini, JudgeId::Ollama];

    #[test]
    fn test_per_judge_means() {
        let outcomes = vec![
            (task(JudgeId::Gigachat), TaskOutcome::Success(8.0)),
            (task(JudgeId::Gigachat), TaskOutcome::Success(9.0)),
            (task(JudgeId::Gemini), TaskOutcome::Success(6.0)),
            (task(JudgeId::Ollama), TaskOutcome::NoOpinion),
        ];

        let agg = aggregate(&THREE, &outcomes);

        assert_eq!(agg.judge_means[&JudgeId::Gigachat], Some(8.5));
        assert_eq!(agg.judge_means[&JudgeId::Gemini], Some(6.0));
        assert_eq!(agg.judge_means[&JudgeId::Ollama], None);
    }

    #[test]
    fn test_zero_success_mean_is_absent_not_zero() {
        let outcomes = vec![
            (task(JudgeId::Gigachat), TaskOutcome::Success(0.0)),
            (
                task(JudgeId::Gemini),
                TaskOutcome::Failure(FailureKind::Timeout),
            ),
        ];

        let agg = aggregate(&THREE, &outcomes);

        // A real score of 0.0 is present; a failed judge is absent.
        assert_eq!(agg.judge_means[&JudgeId::Gigachat], Some(0.0));
        assert_eq!(agg.judge_means[&JudgeId::Gemini], None);
    }

    #[test]
    fn test_pooled_mean_weighs_by_success_count() {
        // Gigachat has two successes, Gemini one: the pool is the
        // union of raw scores, not the mean of per-judge means.
        let outcomes = vec![
            (task(JudgeId::Gigachat), TaskOutcome::Success(10.0)),
            (task(JudgeId::Gigachat), TaskOutcome::Success(10.0)),
            (task(JudgeId::Gemini), TaskOutcome::Success(4.0)),
        ];

        let agg = aggregate(&THREE, &outcomes);
        assert!((agg.pooled_mean.unwrap() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_score_has_full_confidence() {
        let outcomes = vec![(task(JudgeId::Ollama), TaskOutcome::Success(7.0))];
        let agg = aggregate(&THREE, &outcomes);

        assert_eq!(agg.variance, 0.0);
        assert_eq!(agg.confidence, 1.0);
    }

    #[test]
    fn test_empty_pool_forces_zero_confidence() {
        let outcomes = vec![
            (task(JudgeId::Gigachat), TaskOutcome::NoOpinion),
            (
                task(JudgeId::Gemini),
                TaskOutcome::Failure(FailureKind::Transport("connection refused".into())),
            ),
        ];

        let agg = aggregate(&THREE, &outcomes);

        assert!(!agg.has_opinions());
        assert_eq!(agg.variance, 0.0);
        assert_eq!(agg.confidence, 0.0);
    }

    #[test]
    fn test_sample_variance_uses_n_minus_one() {
        let outcomes = vec![
            (task(JudgeId::Gigachat), TaskOutcome::Success(6.0)),
            (task(JudgeId::Gemini), TaskOutcome::Success(10.0)),
        ];

        let agg = aggregate(&THREE, &outcomes);
        // Sample variance of {6, 10}: ((2)^2 + (2)^2) / 1 = 8.
        assert!((agg.variance - 8.0).abs() < 1e-9);
        assert!((agg.confidence - 1.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_permutation_invariance() {
        let mut outcomes = vec![
            (task(JudgeId::Gigachat), TaskOutcome::Success(8.0)),
            (task(JudgeId::Gemini), TaskOutcome::Success(5.0)),
            (task(JudgeId::Ollama), TaskOutcome::Success(9.5)),
            (task(JudgeId::Gemini), TaskOutcome::NoOpinion),
        ];

        let forward = aggregate(&THREE, &outcomes);
        outcomes.reverse();
        let backward = aggregate(&THREE, &outcomes);

        assert_eq!(forward, backward);
    }
}
