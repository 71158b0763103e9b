//! Local heuristic metrics over `(code, doc)`.
//!
//! Three synchronous, CPU-bound scorers: semantic similarity,
//! keyword coverage, and readability. The [`LocalMetrics`] trait is
//! the seam where a model-backed implementation (e.g. a code
//! embedding service) plugs in; [`LexicalMetrics`] is the built-in
//! deterministic implementation.

use std::sync::{Arc, OnceLock};

mod coverage;
mod readability;
mod similarity;

/// Synchronous scoring capability over code/doc pairs.
///
/// All scores are bounded to `[0, 10]`. Implementations may hold
/// internal model state; they must be safe to share across
/// concurrent evaluation requests.
pub trait LocalMetrics: Send + Sync {
    /// How close the doc is to the code in meaning, `[0, 10]`.
    fn semantic_similarity(&self, code: &str, doc: &str) -> f64;

    /// Fraction of code identifiers mentioned in the doc, `[0, 10]`.
    fn keyword_coverage(&self, code: &str, doc: &str) -> f64;

    /// How readable the doc text is, `[0, 10]`.
    fn readability(&self, doc: &str) -> f64;
}

/// Built-in lexical implementation of [`LocalMetrics`].
///
/// Pure text statistics: token-frequency cosine for similarity,
/// identifier lookup for coverage, a Flesch-style reading-ease
/// formula for readability.
#[derive(Debug, Default)]
pub struct LexicalMetrics;

impl LexicalMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Process-wide shared instance.
    ///
    /// Heavy metric backends load models at first use; the checked
    /// once-only guard means concurrent first callers can never
    /// construct two instances.
    pub fn shared() -> Arc<LexicalMetrics> {
        static INSTANCE: OnceLock<Arc<LexicalMetrics>> = OnceLock::new();
        INSTANCE.get_or_init(|| Arc::new(LexicalMetrics::new())).clone()
    }
}

impl LocalMetrics for LexicalMetrics {
    fn semantic_similarity(&self, code: &str, doc: &str) -> f64 {
        similarity::cosine_similarity(code, doc)
    }

    fn keyword_coverage(&self, code: &str, doc: &str) -> f64 {
        coverage::keyword_coverage(code, doc)
    }

    fn readability(&self, doc: &str) -> f64 {
        readability::reading_ease(doc)
    }
}
