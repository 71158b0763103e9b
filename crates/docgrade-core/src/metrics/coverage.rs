//! Keyword coverage: how many code identifiers the doc mentions.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"\b[a-zA-Z_][a-zA-Z0-9_]*\b").unwrap();
}

/// Language keywords that carry no documentation value.
const STOPWORDS: &[&str] = &[
    "val", "var", "fun", "return", "class", "override", "private", "public", "import", "package",
    "self", "this", "true", "false", "none", "null",
];

/// Score the doc by the fraction of significant code identifiers it
/// mentions (case-insensitive), scaled to `[0, 10]`.
///
/// Identifiers shorter than four characters are ignored as noise.
/// Code with no significant identifiers scores a full 10.0: there is
/// nothing the doc could have missed.
pub fn keyword_coverage(code: &str, doc: &str) -> f64 {
    let keywords: HashSet<String> = IDENTIFIER
        .find_iter(code)
        .map(|m| m.as_str().to_lowercase())
        .filter(|t| t.len() > 3 && !STOPWORDS.contains(&t.as_str()))
        .collect();

    if keywords.is_empty() {
        return 10.0;
    }

    let doc_lower = doc.to_lowercase();
    let found = keywords.iter().filter(|k| doc_lower.contains(*k)).count();

    (found as f64 / keywords.len() as f64) * 10.0
}
