use serde::{Deserialize, Serialize};

/// Untagged tokens default to the source side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "id")]
    Indonesian,
    #[serde(rename = "en")]
    English,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Indonesian => "id",
            Self::English => "en",
        }
    }
}

/// Externally supplied tokens may omit any field; missing text compares as the
/// empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub text: String,
    /// Zero-based position in the sequence the token was produced from.
    #[serde(default)]
    pub index: usize,
    /// Character offset of the first occurrence of `text` in the lower-cased source.
    /// Repeated words share the offsets of their first occurrence.
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub end: usize,
    #[serde(default)]
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignmentEdge {
    pub source: usize,
    pub target: usize,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordAlignment {
    pub source_index: usize,
    pub target_index: usize,
    pub source_word: String,
    pub target_word: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Phrase {
    pub source_indices: Vec<usize>,
    pub target_indices: Vec<usize>,
    pub source_text: String,
    pub target_text: String,
}

/// Token index -> aligned indices on the other side.
///
/// Entries keep first-insertion order and iteration follows it. Color assignment
/// and phrase detection rely on that order, so it is part of the contract rather
/// than an artifact of the container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OrderedLinks {
    entries: Vec<(usize, Vec<usize>)>,
}

impl OrderedLinks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: usize, value: usize) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn get(&self, key: usize) -> Option<&[usize]> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, values)| values.as_slice())
    }

    pub fn contains_key(&self, key: usize) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentResult {
    pub word_alignment: Vec<WordAlignment>,
    pub phrase_alignment: Vec<Phrase>,
    pub source_to_target: OrderedLinks,
    pub target_to_source: OrderedLinks,
}

impl AlignmentResult {
    pub fn is_empty(&self) -> bool {
        self.word_alignment.is_empty()
    }

    /// Aggregate counts over the alignment, classifying each source index by the
    /// multiplicity of its links.
    pub fn statistics(&self) -> AlignmentStatistics {
        let total_alignments = self.word_alignment.len();
        let average_confidence = if total_alignments == 0 {
            0.0
        } else {
            self.word_alignment.iter().map(|w| w.confidence).sum::<f64>()
                / total_alignments as f64
        };

        let mut stats = AlignmentStatistics {
            total_alignments,
            average_confidence,
            phrase_count: self.phrase_alignment.len(),
            ..AlignmentStatistics::default()
        };

        for (_, targets) in self.source_to_target.iter() {
            match targets {
                [only] => {
                    let back = self.target_to_source.get(*only).map_or(0, |s| s.len());
                    if back == 1 {
                        stats.one_to_one += 1;
                    } else {
                        stats.many_to_one += 1;
                    }
                }
                [] => {}
                _ => stats.one_to_many += 1,
            }
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlignmentStatistics {
    pub total_alignments: usize,
    pub average_confidence: f64,
    pub phrase_count: usize,
    pub one_to_one: usize,
    pub one_to_many: usize,
    pub many_to_one: usize,
}
