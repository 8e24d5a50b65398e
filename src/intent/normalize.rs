//! Canonical matching form for utterance text
//!
//! Lowercases, deletes punctuation (without replacing it by a space) and
//! trims the ends. Internal whitespace runs survive; `tokens` splits on them.

use std::str::SplitWhitespace;

/// Normalize raw utterance text for lexicon matching.
///
/// "Uh, huh!" becomes "uh huh" and "don't" becomes "dont".
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| is_word_char(*c) || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Split normalized text into whitespace-delimited tokens
pub fn tokens(normalized: &str) -> SplitWhitespace<'_> {
    normalized.split_whitespace()
}

/// Word characters are Unicode letters, digits and underscore
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
