//! Top-level evaluation orchestrator.
//!
//! Composes one request end to end: input validation, local metric
//! scoring and the concurrent judge fan-out (independent branches,
//! joined before aggregation), then aggregation and reduction. One
//! request yields exactly one result or one validation error; judge
//! trouble never surfaces past this point.

use std::sync::Arc;

use chrono::Utc;

use docgrade_core::{
    aggregate, metrics::LocalMetrics, reduce, round2, EvaluationError, EvaluationInput,
    EvaluationResult, JudgeId, LexicalMetrics, LocalScores,
};

use crate::config::{ConfigError, RuntimeConfig};
use crate::executor::run_tasks;
use crate::judges::{ApiCredential, GeminiJudge, GigachatJudge, Judge, OpenAiCompatJudge};

/// The evaluation orchestrator.
///
/// Holds immutable configuration and shared capability handles; one
/// instance serves many concurrent evaluation requests.
pub struct Orchestrator {
    config: RuntimeConfig,
    metrics: Arc<dyn LocalMetrics>,
    judges: Vec<Arc<dyn Judge>>,
    judge_ids: Vec<JudgeId>,
}

impl Orchestrator {
    /// Assemble an orchestrator with the stock judge set from a
    /// validated configuration.
    ///
    /// Judges missing credentials still join the set and decline
    /// every task, so their absence shows up as a `null` mean in the
    /// result rather than silently shrinking the judge list.
    pub fn from_config(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut judges: Vec<Arc<dyn Judge>> = vec![
            Arc::new(build_gigachat(&config)),
            Arc::new(build_gemini(&config)),
        ];

        if config.judges.ollama.enabled {
            judges.push(Arc::new(OpenAiCompatJudge::ollama(
                config.judges.ollama.base_url.clone(),
                config.judges.ollama.model.clone(),
            )));
        }

        judges.push(Arc::new(OpenAiCompatJudge::qwen(
            config.judges.qwen.base_url.clone(),
            config.judges.qwen.model.clone(),
            ApiCredential::from_config_or_env(
                config.judges.qwen.api_key.as_deref(),
                "QWEN_API_KEY",
                "Qwen API key",
            ),
        )));

        Ok(Self::assemble(config, LexicalMetrics::shared(), judges))
    }

    /// Build with explicit capabilities. The config must already be
    /// validated; [`OrchestratorBuilder`] and [`from_config`] both
    /// guarantee that.
    ///
    /// [`from_config`]: Orchestrator::from_config
    fn assemble(
        config: RuntimeConfig,
        metrics: Arc<dyn LocalMetrics>,
        judges: Vec<Arc<dyn Judge>>,
    ) -> Self {
        let judge_ids = judges.iter().map(|j| j.id()).collect();
        Self {
            config,
            metrics,
            judges,
            judge_ids,
        }
    }

    /// Evaluate one code/doc pair.
    ///
    /// The caller receives either a validation error or a complete,
    /// internally consistent result. Per-task judge failures are
    /// logged and absorbed during aggregation.
    pub async fn evaluate(
        &self,
        input: &EvaluationInput,
    ) -> Result<EvaluationResult, EvaluationError> {
        // Rejected inputs schedule no work at all.
        input.validate(self.config.min_input_len)?;

        let tasks = self.config.round_plan().tasks(&self.judge_ids);

        // Local metrics are CPU-bound; score them off the runtime
        // while the judge fan-out is in flight.
        let metrics = Arc::clone(&self.metrics);
        let metrics_input = input.clone();
        let local_branch = tokio::task::spawn_blocking(move || LocalScores {
            semantic: metrics.semantic_similarity(&metrics_input.code, &metrics_input.doc),
            coverage: metrics.keyword_coverage(&metrics_input.code, &metrics_input.doc),
            readability: metrics.readability(&metrics_input.doc),
        });

        let judge_branch = run_tasks(&self.judges, input, &tasks, self.config.deadline);

        let (local, outcomes) = tokio::join!(local_branch, judge_branch);
        let local = local.map_err(|e| EvaluationError::Internal(e.to_string()))?;

        let agg = aggregate(&self.judge_ids, &outcomes);
        let reduction = reduce(&self.config.weights, &local, &agg);

        tracing::debug!(
            final_score = reduction.final_score,
            confidence = reduction.confidence,
            degraded = reduction.degraded,
            "evaluation complete"
        );

        Ok(EvaluationResult {
            semantic_score: round2(local.semantic),
            keyword_coverage: round2(local.coverage),
            readability_score: round2(local.readability),
            judge_means: agg
                .judge_means
                .into_iter()
                .map(|(judge, mean)| (judge, mean.map(round2)))
                .collect(),
            final_score: round2(reduction.final_score),
            score_variance: round2(agg.variance),
            confidence_score: round2(reduction.confidence),
            degraded: reduction.degraded,
            evaluated_at: Utc::now(),
        })
    }

    /// The active judge identities, in task-planning order.
    pub fn judge_ids(&self) -> &[JudgeId] {
        &self.judge_ids
    }

    /// The configuration this orchestrator runs with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

fn build_gigachat(config: &RuntimeConfig) -> GigachatJudge {
    let credential = ApiCredential::from_config_or_env(
        config.judges.gigachat.credentials.as_deref(),
        crate::judges::GIGACHAT_CREDENTIALS_ENV,
        "GigaChat credential",
    );
    let mut judge = GigachatJudge::new(credential);
    if let Some(url) = &config.judges.gigachat.base_url {
        judge = judge.with_base_url(url.clone());
    }
    judge
}

fn build_gemini(config: &RuntimeConfig) -> GeminiJudge {
    let credential = ApiCredential::from_config_or_env(
        config.judges.gemini.api_key.as_deref(),
        crate::judges::GEMINI_API_KEY_ENV,
        "Gemini API key",
    );
    let mut judge = GeminiJudge::new(credential);
    if let Some(model) = &config.judges.gemini.model {
        judge = judge.with_model(model.clone());
    }
    judge
}

/// Builder for orchestrators with custom capabilities, mainly used
/// to wire in test doubles.
pub struct OrchestratorBuilder {
    config: RuntimeConfig,
    metrics: Option<Arc<dyn LocalMetrics>>,
    judges: Vec<Arc<dyn Judge>>,
}

impl OrchestratorBuilder {
    /// Start from a configuration.
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            metrics: None,
            judges: Vec::new(),
        }
    }

    /// Use a specific local metrics capability.
    pub fn metrics(mut self, metrics: Arc<dyn LocalMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Register a judge.
    pub fn judge(mut self, judge: Arc<dyn Judge>) -> Self {
        self.judges.push(judge);
        self
    }

    /// Validate the configuration and build the orchestrator.
    pub fn build(self) -> Result<Orchestrator, ConfigError> {
        self.config.validate()?;
        let metrics: Arc<dyn LocalMetrics> = match self.metrics {
            Some(metrics) => metrics,
            None => LexicalMetrics::shared(),
        };
        Ok(Orchestrator::assemble(self.config, metrics, self.judges))
    }
}
