//! Shared judge prompt.

/// The rubric every judge backend is asked to apply. The reply must
/// be a bare number so [`extract_score`] can parse it.
///
/// [`extract_score`]: crate::judges::extract_score
pub const JUDGE_PROMPT: &str = "\
You are a senior technical writer. Rate the quality of the \
documentation for the given code.

Code:
{code}

Documentation:
{doc}

Rate on a scale from 0 to 10. Reply with ONLY the number.";

/// Fill the judge prompt with a code/doc pair.
pub fn render_judge_prompt(code: &str, doc: &str) -> String {
    JUDGE_PROMPT
        .replace("{code}", code)
        .replace("{doc}", doc)
}
