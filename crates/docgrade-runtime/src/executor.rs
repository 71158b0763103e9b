//! Concurrent task execution under a single global deadline.
//!
//! Every judge task runs as its own future; all of them race against
//! one shared deadline instant and are joined through a single
//! fan-in barrier. A failing or slow task degrades to a failure
//! outcome for that task alone; nothing propagates as an error out
//! of the fan-in, and nothing blocks the other tasks.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::time::{timeout_at, Instant};

use docgrade_core::{EvaluationInput, FailureKind, JudgeTask, TaskOutcome};

use crate::judges::{Judge, JudgeError};

fn failure_kind(error: JudgeError) -> FailureKind {
    match error {
        JudgeError::Http(msg) => FailureKind::Transport(msg),
        JudgeError::Api { status, message } => FailureKind::Api { status, message },
        JudgeError::Parse(msg) => FailureKind::Malformed(msg),
    }
}

/// Run all tasks concurrently, producing exactly one outcome per
/// task.
///
/// The deadline is global: tasks still pending when it elapses are
/// abandoned and recorded as `Failure(Timeout)`, while tasks that
/// already completed keep their real outcome. Outcomes are paired
/// with their task by identity; completion order carries no meaning.
pub async fn run_tasks(
    judges: &[Arc<dyn Judge>],
    input: &EvaluationInput,
    tasks: &[JudgeTask],
    deadline: Duration,
) -> Vec<(JudgeTask, TaskOutcome)> {
    let deadline_at = Instant::now() + deadline;

    let futures = tasks.iter().map(|task| {
        let judge = judges.iter().find(|j| j.id() == task.judge).cloned();
        async move {
            let outcome = match judge {
                Some(judge) => {
                    let call = judge.evaluate(&input.code, &input.doc, task.temperature);
                    match timeout_at(deadline_at, call).await {
                        Ok(Ok(Some(score))) => TaskOutcome::Success(score.clamp(0.0, 10.0)),
                        Ok(Ok(None)) => TaskOutcome::NoOpinion,
                        Ok(Err(e)) => {
                            tracing::warn!(judge = %task.judge, error = %e, "judge call failed");
                            TaskOutcome::Failure(failure_kind(e))
                        }
                        Err(_) => {
                            tracing::warn!(judge = %task.judge, "judge call hit the deadline");
                            TaskOutcome::Failure(FailureKind::Timeout)
                        }
                    }
                }
                // Tasks are planned from the registered judge set, so
                // this arm only fires on a misassembled orchestrator.
                None => TaskOutcome::NoOpinion,
            };
            (*task, outcome)
        }
    });

    join_all(futures).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use docgrade_core::JudgeId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test double that replies according to a fixed script.
    struct ScriptedJudge {
        id: JudgeId,
        reply: Result<Option<f64>, ()>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl ScriptedJudge {
        fn scoring(id: JudgeId, score: f64) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: Ok(Some(score)),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn declining(id: JudgeId) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: Ok(None),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(id: JudgeId) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: Err(()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
            })
        }

        fn slow(id: JudgeId, score: f64, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                id,
                reply: Ok(Some(score)),
                delay,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Judge for ScriptedJudge {
        fn id(&self) -> JudgeId {
            self.id
        }

        fn configured(&self) -> bool {
            true
        }

        async fn evaluate(
            &self,
            _code: &str,
            _doc: &str,
            _temperature: f64,
        ) -> Result<Option<f64>, JudgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Ok(opinion) => Ok(*opinion),
                Err(()) => Err(JudgeError::Http("connection refused".to_string())),
            }
        }
    }

    fn input() -> EvaluationInput {
        EvaluationInput::new("def add(a, b): return a + b", "Adds two numbers")
    }

    fn task(judge: JudgeId, temperature: f64) -> JudgeTask {
        JudgeTask { judge, temperature }
    }

    #[tokio::test]
    async fn test_one_outcome_per_task() {
        let judges: Vec<Arc<dyn Judge>> = vec![
            ScriptedJudge::scoring(JudgeId::Gigachat, 8.0),
            ScriptedJudge::declining(JudgeId::Gemini),
            ScriptedJudge::failing(JudgeId::Ollama),
        ];
        let tasks = vec![
            task(JudgeId::Gigachat, 0.1),
            task(JudgeId::Gemini, 0.1),
            task(JudgeId::Ollama, 0.1),
        ];

        let outcomes = run_tasks(&judges, &input(), &tasks, Duration::from_secs(60)).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].1, TaskOutcome::Success(8.0));
        assert_eq!(outcomes[1].1, TaskOutcome::NoOpinion);
        assert!(matches!(
            outcomes[2].1,
            TaskOutcome::Failure(FailureKind::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_failure_does_not_poison_other_tasks() {
        let judges: Vec<Arc<dyn Judge>> = vec![
            ScriptedJudge::failing(JudgeId::Gigachat),
            ScriptedJudge::scoring(JudgeId::Gemini, 9.0),
        ];
        let tasks = vec![task(JudgeId::Gigachat, 0.1), task(JudgeId::Gemini, 0.1)];

        let outcomes = run_tasks(&judges, &input(), &tasks, Duration::from_secs(60)).await;

        assert!(matches!(outcomes[0].1, TaskOutcome::Failure(_)));
        assert_eq!(outcomes[1].1, TaskOutcome::Success(9.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_deadline_degrades_pending_tasks() {
        let judges: Vec<Arc<dyn Judge>> = vec![
            ScriptedJudge::slow(JudgeId::Gigachat, 8.0, Duration::from_secs(300)),
            ScriptedJudge::scoring(JudgeId::Gemini, 7.0),
            ScriptedJudge::scoring(JudgeId::Ollama, 9.0),
        ];
        let tasks = vec![
            task(JudgeId::Gigachat, 0.1),
            task(JudgeId::Gemini, 0.1),
            task(JudgeId::Ollama, 0.1),
        ];

        let outcomes = run_tasks(&judges, &input(), &tasks, Duration::from_secs(60)).await;

        // The slow judge times out; completed outcomes are kept.
        assert_eq!(outcomes[0].1, TaskOutcome::Failure(FailureKind::Timeout));
        assert_eq!(outcomes[1].1, TaskOutcome::Success(7.0));
        assert_eq!(outcomes[2].1, TaskOutcome::Success(9.0));
    }

    #[tokio::test]
    async fn test_outcomes_correlated_by_task_identity() {
        let judges: Vec<Arc<dyn Judge>> = vec![
            ScriptedJudge::scoring(JudgeId::Gigachat, 6.0),
            ScriptedJudge::scoring(JudgeId::Gemini, 7.0),
        ];
        let tasks = vec![
            task(JudgeId::Gemini, 0.3),
            task(JudgeId::Gigachat, 0.1),
            task(JudgeId::Gemini, 0.1),
        ];

        let outcomes = run_tasks(&judges, &input(), &tasks, Duration::from_secs(60)).await;

        assert_eq!(outcomes[0].0.judge, JudgeId::Gemini);
        assert_eq!(outcomes[0].1, TaskOutcome::Success(7.0));
        assert_eq!(outcomes[1].0.judge, JudgeId::Gigachat);
        assert_eq!(outcomes[1].1, TaskOutcome::Success(6.0));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_clamped() {
        let judges: Vec<Arc<dyn Judge>> = vec![ScriptedJudge::scoring(JudgeId::Qwen, 14.0)];
        let tasks = vec![task(JudgeId::Qwen, 0.1)];

        let outcomes = run_tasks(&judges, &input(), &tasks, Duration::from_secs(60)).await;
        assert_eq!(outcomes[0].1, TaskOutcome::Success(10.0));
    }
}
