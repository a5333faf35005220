use crate::types::{Language, Token};

/// Characters split off into their own tokens.
const SPLIT_PUNCTUATION: [char; 6] = ['.', ',', '!', '?', ';', ':'];

/// Characters treated as punctuation when scoring and coloring.
const PUNCTUATION: [char; 14] = [
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}',
];

/// True when `text` is exactly one punctuation character.
pub fn is_punctuation(text: &str) -> bool {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => PUNCTUATION.contains(&c),
        _ => false,
    }
}

pub fn tokenize_words(text: &str, language: Language) -> Vec<Token> {
    let lowered = text.to_lowercase();

    let mut spaced = String::with_capacity(lowered.len() + 8);
    for c in lowered.chars() {
        if SPLIT_PUNCTUATION.contains(&c) {
            spaced.push(' ');
            spaced.push(c);
            spaced.push(' ');
        } else {
            spaced.push(c);
        }
    }

    spaced
        .split_whitespace()
        .enumerate()
        .map(|(index, word)| {
            // First occurrence only; duplicates report the same span.
            let start = lowered
                .find(word)
                .map(|byte| lowered[..byte].chars().count())
                .unwrap_or(0);
            Token {
                text: word.to_string(),
                index,
                start,
                end: start + word.chars().count(),
                language,
            }
        })
        .collect()
}
