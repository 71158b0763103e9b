//! # docgrade-runtime
//!
//! Concurrent LLM judge orchestration for docgrade.
//!
//! This crate owns everything that touches the network: the judge
//! backends, the concurrent executor with its global deadline, and
//! the top-level [`Orchestrator`] that composes local metrics and
//! judge opinions into one [`EvaluationResult`].
//!
//! ## Failure model
//!
//! Judges are unreliable by assumption. A judge with no credentials
//! declines every task; a judge that errors or outruns the deadline
//! fails only its own task. Neither ever fails an evaluation
//! request: the caller sees a validation error or a complete result,
//! nothing in between.
//!
//! ## Example
//!
//! ```rust,no_run
//! use docgrade_core::EvaluationInput;
//! use docgrade_runtime::{Orchestrator, RuntimeConfig};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let orchestrator = Orchestrator::from_config(RuntimeConfig::default())?;
//! let input = EvaluationInput::new(
//!     "def add(a, b): return a + b",
//!     "Adds two numbers and returns their sum.",
//! );
//! let result = orchestrator.evaluate(&input).await?;
//! println!("final score: {}", result.final_score);
//! # Ok(())
//! # }
//! ```
//!
//! [`EvaluationResult`]: docgrade_core::EvaluationResult

pub mod config;
pub mod executor;
pub mod judges;
pub mod orchestrator;
pub mod prompts;

// Re-export main types at crate root
pub use config::{ConfigError, RuntimeConfig};
pub use judges::{Judge, JudgeError};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};
