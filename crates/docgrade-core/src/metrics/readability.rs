//! Readability scoring via Flesch reading ease.

/// Score the doc's readability on `[0, 10]`.
///
/// Computes Flesch reading ease
/// (`206.835 - 1.015·(words/sentences) - 84.6·(syllables/words)`),
/// clamps it to `[0, 100]`, then divides by 10. Text with no words
/// gets a neutral 5.0.
pub fn reading_ease(doc: &str) -> f64 {
    let words: Vec<&str> = doc
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return 5.0;
    }

    let sentences = doc
        .split(['.', '!', '?'])
        .filter(|s| s.chars().any(|c| c.is_alphanumeric()))
        .count()
        .max(1);

    let syllables: usize = words.iter().map(|w| syllable_count(w)).sum();

    let words_per_sentence = words.len() as f64 / sentences as f64;
    let syllables_per_word = syllables as f64 / words.len() as f64;

    let ease = 206.835 - 1.015 * words_per_sentence - 84.6 * syllables_per_word;

    ease.clamp(0.0, 100.0) / 10.0
}

/// Rough English syllable estimate: runs of vowels, with a silent-e
/// adjustment. Always at least 1 for a non-empty word.
fn syllable_count(word: &str) -> usize {
    let lower = word.to_lowercase();
    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut count = 0;
    let mut prev_vowel = false;
    for c in lower.chars() {
        let vowel = is_vowel(c);
        if vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = vowel;
    }

    if lower.ends_with('e') && !lower.ends_with("le") && count > 1 {
        count -= 1;
    }

    count.max(1)
}
