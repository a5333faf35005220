use std::collections::HashSet;

use crate::types::{AlignmentEdge, AlignmentResult, OrderedLinks, Phrase, Token, WordAlignment};

fn token_text(tokens: &[Token], index: usize) -> &str {
    tokens.get(index).map_or("", |t| t.text.as_str())
}

fn join_texts(tokens: &[Token], indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| token_text(tokens, i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve edge text and build the bidirectional index maps, then detect phrases.
pub fn group_alignment(
    edges: &[AlignmentEdge],
    source_tokens: &[Token],
    target_tokens: &[Token],
) -> AlignmentResult {
    let mut result = AlignmentResult::default();

    for edge in edges {
        result.word_alignment.push(WordAlignment {
            source_index: edge.source,
            target_index: edge.target,
            source_word: token_text(source_tokens, edge.source).to_string(),
            target_word: token_text(target_tokens, edge.target).to_string(),
            confidence: edge.confidence,
        });
        result.source_to_target.push(edge.source, edge.target);
        result.target_to_source.push(edge.target, edge.source);
    }

    result.phrase_alignment = detect_phrases(
        &result.source_to_target,
        &result.target_to_source,
        source_tokens,
        target_tokens,
    );
    result
}

/// A target index links into a phrase when it sits directly next to one of its
/// members or is already one of them. The second case widens the plain +-1 rule
/// so that many-to-one groups such as `rumah sakit` -> `hospital` join up.
fn links_into(target: usize, phrase_targets: &[usize]) -> bool {
    phrase_targets.contains(&target)
        || phrase_targets.contains(&(target + 1))
        || target
            .checked_sub(1)
            .is_some_and(|prev| phrase_targets.contains(&prev))
}

/// Ascending, duplicate-free copy of a map entry. Repeated edges count once.
fn distinct(indices: &[usize]) -> Vec<usize> {
    let mut out = indices.to_vec();
    out.sort_unstable();
    out.dedup();
    out
}

/// Every member has exactly one distinct partner and that partner points back
/// only to it.
fn is_one_to_one_chain(
    sources: &[usize],
    targets: &[usize],
    source_to_target: &OrderedLinks,
    target_to_source: &OrderedLinks,
) -> bool {
    sources
        .iter()
        .all(|&s| source_to_target.get(s).is_some_and(|t| distinct(t).len() == 1))
        && targets
            .iter()
            .all(|&t| target_to_source.get(t).is_some_and(|s| distinct(s).len() == 1))
}

/// Greedy forward phrase detection.
///
/// Starting at each unvisited source index (in map order) the run is extended to
/// the next source index while its targets link into the run's target set. A
/// target links when it is adjacent (+-1) to the set or already in it; the latter
/// is broader than adjacency alone. A run becomes a phrase when it spans at least
/// two distinct tokens on one side and is not a plain chain of one-to-one pairs,
/// which the word alignment already expresses.
pub fn detect_phrases(
    source_to_target: &OrderedLinks,
    target_to_source: &OrderedLinks,
    source_tokens: &[Token],
    target_tokens: &[Token],
) -> Vec<Phrase> {
    let mut phrases = Vec::new();
    let mut visited = HashSet::new();

    for (source_idx, targets) in source_to_target.iter() {
        if visited.contains(&source_idx) {
            continue;
        }

        let mut source_phrase = vec![source_idx];
        let mut target_phrase = distinct(targets);

        let mut next_source = source_idx + 1;
        while let Some(next_targets) = source_to_target.get(next_source) {
            if !next_targets.iter().any(|&t| links_into(t, &target_phrase)) {
                break;
            }
            source_phrase.push(next_source);
            for &t in next_targets {
                if !target_phrase.contains(&t) {
                    target_phrase.push(t);
                }
            }
            visited.insert(next_source);
            next_source += 1;
        }

        if source_phrase.len() < 2 && target_phrase.len() < 2 {
            continue;
        }
        if is_one_to_one_chain(&source_phrase, &target_phrase, source_to_target, target_to_source)
        {
            continue;
        }

        target_phrase.sort_unstable();
        tracing::debug!(
            sources = ?source_phrase,
            targets = ?target_phrase,
            "alignment: phrase detected"
        );
        phrases.push(Phrase {
            source_text: join_texts(source_tokens, &source_phrase),
            target_text: join_texts(target_tokens, &target_phrase),
            source_indices: source_phrase,
            target_indices: target_phrase,
        });
    }

    phrases
}
