//! Semantic similarity between code and doc.
//!
//! The built-in metric is a cosine over token frequency vectors.
//! Identifier-style tokens are split on underscores and camelCase so
//! `compute_total` in code can meet "total" in prose. A model-backed
//! embedding metric can replace this through the [`LocalMetrics`]
//! trait without touching callers.
//!
//! [`LocalMetrics`]: super::LocalMetrics

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"[A-Za-z][A-Za-z0-9]*").unwrap();
    static ref CAMEL_BOUNDARY: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
}

/// Cosine similarity of code and doc token distributions, scaled to
/// `[0, 10]`.
pub fn cosine_similarity(code: &str, doc: &str) -> f64 {
    let code_vec = term_frequencies(code);
    let doc_vec = term_frequencies(doc);

    if code_vec.is_empty() || doc_vec.is_empty() {
        return 0.0;
    }

    let dot: f64 = code_vec
        .iter()
        .filter_map(|(term, &a)| doc_vec.get(term).map(|&b| a * b))
        .sum();

    let norm = |v: &HashMap<String, f64>| v.values().map(|x| x * x).sum::<f64>().sqrt();

    let cosine = dot / (norm(&code_vec) * norm(&doc_vec));

    cosine.clamp(0.0, 1.0) * 10.0
}

fn term_frequencies(text: &str) -> HashMap<String, f64> {
    let spaced = CAMEL_BOUNDARY.replace_all(text, "$1 $2");
    let mut freq = HashMap::new();
    for word in spaced.split(['_', ' ', '\t', '\n']) {
        for m in TOKEN.find_iter(word) {
            let token = m.as_str().to_lowercase();
            if token.len() > 2 {
                *freq.entry(token).or_insert(0.0) += 1.0;
            }
        }
    }
    freq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_text_scores_ten() {
        let text = "compute the running total of all items";
        let score = cosine_similarity(text, text);
        assert!((score - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_text_scores_zero() {
        let score = cosine_similarity("alpha bravo charlie", "xylophone zephyr quartz");
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_related_doc_beats_unrelated() {
        let code = "fn compute_total(items: &[Item]) -> u64";
        let related = "Computes the total over the given items.";
        let unrelated = "Configures the network retry policy.";

        assert!(cosine_similarity(code, related) > cosine_similarity(code, unrelated));
    }

    #[test]
    fn test_camel_case_splitting() {
        let score = cosine_similarity("parseHeader", "parse the header");
        assert!(score > 5.0, "camelCase should meet prose, got {score}");
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(cosine_similarity("", "some doc"), 0.0);
        assert_eq!(cosine_similarity("code here", ""), 0.0);
    }
}
