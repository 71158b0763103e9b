//! Judge backend abstractions.
//!
//! A judge is an external, possibly unavailable opinion source that
//! returns a bounded quality score for a documentation sample. All
//! backends sit behind the [`Judge`] trait; the orchestrator never
//! knows which concrete backend it is talking to.
//!
//! ## Security
//!
//! Backends that need credentials use the [`secrets`] module; see
//! [`ApiCredential`] for the handling rules.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use docgrade_core::JudgeId;

mod gemini;
mod gigachat;
mod openai_compat;
pub mod secrets;

pub use gemini::{GeminiJudge, GEMINI_API_KEY_ENV};
pub use gigachat::{GigachatJudge, GIGACHAT_CREDENTIALS_ENV};
pub use openai_compat::{OpenAiCompatJudge, OLLAMA_DEFAULT_MODEL, OLLAMA_DEFAULT_URL};
pub use secrets::{ApiCredential, CredentialSource};

/// Errors from judge backends.
///
/// These never reach the caller of an evaluation; the executor
/// degrades them into per-task failure outcomes.
#[derive(Error, Debug)]
pub enum JudgeError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("could not parse reply: {0}")]
    Parse(String),
}

/// An opinion source scoring a documentation sample.
///
/// `Ok(None)` is a declined opinion: the judge had nothing to say,
/// typically because it is not configured. That is not an error and
/// must never become one. Transport and protocol problems are `Err`.
#[async_trait]
pub trait Judge: Send + Sync {
    /// The stable identity of this judge.
    fn id(&self) -> JudgeId;

    /// Whether this judge has what it needs to produce opinions.
    /// Unconfigured judges return `Ok(None)` from [`evaluate`]
    /// rather than erroring.
    ///
    /// [`evaluate`]: Judge::evaluate
    fn configured(&self) -> bool;

    /// Score the documentation for the given code at the given
    /// sampling temperature. Scores are in `[0, 10]`.
    async fn evaluate(
        &self,
        code: &str,
        doc: &str,
        temperature: f64,
    ) -> Result<Option<f64>, JudgeError>;
}

lazy_static! {
    static ref SCORE: Regex = Regex::new(r"\d+(\.\d+)?").unwrap();
}

/// Parse the first number out of a judge's reply, clamped to
/// `[0, 10]`.
///
/// Judges are asked to reply with a bare number, but models pad
/// their answers; the first numeric token wins.
pub fn extract_score(text: &str) -> Result<f64, JudgeError> {
    let matched = SCORE.find(text).ok_or_else(|| {
        let snippet: String = text.chars().take(40).collect();
        JudgeError::Parse(format!("no score in reply: {snippet:?}"))
    })?;

    let score: f64 = matched
        .as_str()
        .parse()
        .map_err(|e| JudgeError::Parse(format!("bad number '{}': {e}", matched.as_str())))?;

    Ok(score.clamp(0.0, 10.0))
}

/// Pull a human-readable message out of an API error body.
///
/// Every backend here wraps errors as `{"error": {"message": ...}}`;
/// anything else is reported verbatim.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_owned)
        })
        .unwrap_or_else(|| body.to_string())
}

/// Shared HTTP client for all judge backends.
///
/// Pooled connections are reused across concurrent evaluation
/// requests; the one-time guard keeps concurrent first callers from
/// building two clients.
pub(crate) fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client")
    })
}
