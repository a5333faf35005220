use std::collections::HashMap;
use std::path::Path;

use crate::alignment::tokenization::is_punctuation;
use crate::config::ScoringConfig;
use crate::error::AlignmentError;
use crate::types::Token;

/// Source-to-target lexical evidence.
pub trait Lexicon: Send + Sync {
    /// True when `target` is a known translation of `source`.
    fn is_translation(&self, source: &str, target: &str) -> bool;
}

/// Small word-sense table from Indonesian to English.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BilingualDictionary {
    entries: HashMap<String, Vec<String>>,
}

const BUILTIN_ENTRIES: &[(&str, &[&str])] = &[
    ("saya", &["i", "me", "my"]),
    ("aku", &["i", "me", "my"]),
    ("kamu", &["you", "your"]),
    ("anda", &["you", "your"]),
    ("dia", &["he", "she", "him", "her"]),
    ("kami", &["we", "us", "our"]),
    ("kita", &["we", "us", "our"]),
    ("mereka", &["they", "them", "their"]),
    ("ini", &["this"]),
    ("itu", &["that"]),
    ("dan", &["and"]),
    ("atau", &["or"]),
    ("tetapi", &["but"]),
    ("dengan", &["with"]),
    ("untuk", &["for", "to"]),
    ("dari", &["from", "of"]),
    ("ke", &["to"]),
    ("di", &["at", "in", "on"]),
    ("yang", &["which", "that", "who"]),
    ("tidak", &["not", "no"]),
    ("ada", &["there", "exist", "have"]),
    ("adalah", &["is", "are"]),
    ("akan", &["will", "going"]),
    ("sudah", &["already", "have"]),
    ("bisa", &["can", "able"]),
    ("harus", &["must", "have to"]),
    ("pergi", &["go", "going", "went"]),
    ("datang", &["come", "coming", "came"]),
    ("makan", &["eat", "eating", "ate"]),
    ("minum", &["drink", "drinking", "drank"]),
    ("tidur", &["sleep", "sleeping", "slept"]),
    ("bekerja", &["work", "working", "worked"]),
    ("belajar", &["study", "learn", "studying", "learning"]),
    ("rumah", &["house", "home"]),
    ("sekolah", &["school"]),
    ("pasar", &["market"]),
    ("toko", &["shop", "store"]),
    ("mobil", &["car"]),
    ("motor", &["motorcycle", "bike"]),
    ("buku", &["book"]),
    ("air", &["water"]),
    ("makanan", &["food"]),
    ("minuman", &["drink", "beverage"]),
    ("besar", &["big", "large"]),
    ("kecil", &["small", "little"]),
    ("baru", &["new"]),
    ("lama", &["old", "long"]),
    ("baik", &["good", "well"]),
    ("buruk", &["bad"]),
    ("panas", &["hot"]),
    ("dingin", &["cold"]),
    ("cepat", &["fast", "quick"]),
    ("lambat", &["slow"]),
    ("satu", &["one", "1"]),
    ("dua", &["two", "2"]),
    ("tiga", &["three", "3"]),
    ("empat", &["four", "4"]),
    ("lima", &["five", "5"]),
];

impl BilingualDictionary {
    pub fn indonesian_english() -> Self {
        Self::from_entries(BUILTIN_ENTRIES.iter().map(|(source, targets)| {
            (source.to_string(), targets.iter().map(|t| t.to_string()).collect())
        }))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<String>)>) -> Self {
        let mut dictionary = Self::default();
        dictionary.extend(entries);
        dictionary
    }

    /// Reads a `{"word": ["translation", ...]}` JSON object.
    pub fn load(path: &Path) -> Result<Self, AlignmentError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| AlignmentError::io("read dictionary", e))?;
        let raw: HashMap<String, Vec<String>> = serde_json::from_str(&data)
            .map_err(|e| AlignmentError::json("parse dictionary", e))?;
        Ok(Self::from_entries(raw))
    }

    /// Adds entries; translations for an existing word are appended without duplicates.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, Vec<String>)>) {
        for (source, targets) in entries {
            let known = self.entries.entry(source.to_lowercase()).or_default();
            for target in targets {
                let target = target.to_lowercase();
                if !known.contains(&target) {
                    known.push(target);
                }
            }
        }
    }

    pub fn translations(&self, source: &str) -> Option<&[String]> {
        self.entries
            .get(&source.to_lowercase())
            .map(|targets| targets.as_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(source, targets)| (source.as_str(), targets.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Lexicon for BilingualDictionary {
    fn is_translation(&self, source: &str, target: &str) -> bool {
        let target = target.to_lowercase();
        self.translations(source)
            .is_some_and(|known| known.iter().any(|t| *t == target))
    }
}

/// Row-major `source_len x target_len` score table.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    rows: usize,
    cols: usize,
    scores: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_fn(rows: usize, cols: usize, mut score: impl FnMut(usize, usize) -> f64) -> Self {
        let mut scores = Vec::with_capacity(rows * cols);
        for i in 0..rows {
            for j in 0..cols {
                scores.push(score(i, j));
            }
        }
        Self { rows, cols, scores }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.scores[i * self.cols + j]
    }
}

/// Cell score: lexical hit, then punctuation pairing, then relative position.
pub fn token_similarity(
    lexicon: &dyn Lexicon,
    scoring: &ScoringConfig,
    source: &Token,
    target: &Token,
    position: (usize, usize),
    lengths: (usize, usize),
) -> f64 {
    if lexicon.is_translation(&source.text, &target.text) {
        return scoring.dictionary_score;
    }
    if is_punctuation(&source.text) && is_punctuation(&target.text) {
        return scoring.punctuation_score;
    }
    let (i, j) = position;
    let (source_len, target_len) = lengths;
    let relative = (i as f64 / source_len as f64 - j as f64 / target_len as f64).abs();
    (1.0 - relative) * scoring.position_weight
}

pub fn build_similarity_matrix(
    lexicon: &dyn Lexicon,
    scoring: &ScoringConfig,
    source_tokens: &[Token],
    target_tokens: &[Token],
) -> SimilarityMatrix {
    let lengths = (source_tokens.len(), target_tokens.len());
    SimilarityMatrix::from_fn(lengths.0, lengths.1, |i, j| {
        token_similarity(
            lexicon,
            scoring,
            &source_tokens[i],
            &target_tokens[j],
            (i, j),
            lengths,
        )
    })
}
