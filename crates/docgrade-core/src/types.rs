//! Core data model for documentation evaluation.
//!
//! Everything here is plain data: inputs, judge identities, task
//! descriptions, task outcomes, and the final result returned to the
//! caller. No I/O, no async.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced to the caller of an evaluation.
///
/// Per-task judge failures are never represented here; they are
/// absorbed during aggregation. Only input validation and unexpected
/// internal failures reach the caller.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("{field} too short: {len} chars, minimum {min}")]
    InputTooShort {
        field: &'static str,
        len: usize,
        min: usize,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

/// The pair of texts being scored: source code and the documentation
/// generated for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationInput {
    /// Source code the documentation describes
    pub code: String,

    /// Generated documentation under evaluation
    pub doc: String,
}

impl EvaluationInput {
    /// Create a new input pair.
    pub fn new(code: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            doc: doc.into(),
        }
    }

    /// Validate minimum lengths before any work is scheduled.
    ///
    /// Rejected inputs never reach the local metrics or any judge.
    pub fn validate(&self, min_len: usize) -> Result<(), EvaluationError> {
        if self.code.chars().count() < min_len {
            return Err(EvaluationError::InputTooShort {
                field: "code",
                len: self.code.chars().count(),
                min: min_len,
            });
        }
        if self.doc.chars().count() < min_len {
            return Err(EvaluationError::InputTooShort {
                field: "doc",
                len: self.doc.chars().count(),
                min: min_len,
            });
        }
        Ok(())
    }
}

/// Identity of a judge backend.
///
/// A closed set, stable for the lifetime of an orchestrator instance.
/// New backends extend this enum rather than subclassing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JudgeId {
    Gigachat,
    Gemini,
    Ollama,
    Qwen,
}

impl JudgeId {
    /// All known judge identities, in stable order.
    pub const ALL: [JudgeId; 4] = [
        JudgeId::Gigachat,
        JudgeId::Gemini,
        JudgeId::Ollama,
        JudgeId::Qwen,
    ];

    /// Stable string name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeId::Gigachat => "gigachat",
            JudgeId::Gemini => "gemini",
            JudgeId::Ollama => "ollama",
            JudgeId::Qwen => "qwen",
        }
    }
}

impl fmt::Display for JudgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One scheduled judge call: which judge, at which sampling
/// temperature. Created per evaluation request and discarded after
/// aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgeTask {
    /// Originating judge identity
    pub judge: JudgeId,

    /// Sampling temperature for this self-consistency round
    pub temperature: f64,
}

/// Why a task produced no usable score.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// The global deadline elapsed before the task completed
    Timeout,

    /// Transport-level failure (connect, TLS, request I/O)
    Transport(String),

    /// The backend answered with an error status
    Api { status: u16, message: String },

    /// The backend answered but the reply could not be scored
    Malformed(String),
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "timed out"),
            FailureKind::Transport(msg) => write!(f, "transport error: {msg}"),
            FailureKind::Api { status, message } => {
                write!(f, "api error {status}: {message}")
            }
            FailureKind::Malformed(msg) => write!(f, "malformed reply: {msg}"),
        }
    }
}

/// Outcome of exactly one judge task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// The judge returned a score in `[0, 10]`
    Success(f64),

    /// The judge declined to give an opinion (e.g. not configured)
    NoOpinion,

    /// The call failed; the score is treated as statistical absence
    Failure(FailureKind),
}

impl TaskOutcome {
    /// The score, if this outcome carries one.
    pub fn score(&self) -> Option<f64> {
        match self {
            TaskOutcome::Success(s) => Some(*s),
            _ => None,
        }
    }
}

/// Round a score to the two-decimal boundary precision.
///
/// Applied only when constructing an [`EvaluationResult`]; all
/// intermediate math runs at full precision.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Complete result of one evaluation request.
///
/// Immutable once constructed. Every score is bounded and rounded to
/// two decimals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    /// Embedding-style similarity between code and doc, `[0, 10]`
    pub semantic_score: f64,

    /// Identifier coverage of the doc, `[0, 10]`
    pub keyword_coverage: f64,

    /// Readability of the doc text, `[0, 10]`
    pub readability_score: f64,

    /// Per-judge mean of successful scores. `None` means the judge
    /// produced no usable score at all, which is distinct from a
    /// real mean of 0.0.
    pub judge_means: BTreeMap<JudgeId, Option<f64>>,

    /// Blended score, `[0, 10]`
    pub final_score: f64,

    /// Sample variance of the pooled judge scores, `>= 0`
    pub score_variance: f64,

    /// Inverse-dispersion confidence heuristic, `[0, 1]`
    pub confidence_score: f64,

    /// True when no judge contributed and `final_score` fell back to
    /// the local-metrics-only formula
    pub degraded: bool,

    /// When the evaluation completed
    pub evaluated_at: DateTime<Utc>,
}
