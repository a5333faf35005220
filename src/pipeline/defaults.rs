use crate::alignment::grouping::group_alignment;
use crate::alignment::path::global_alignment_path;
use crate::alignment::similarity::{build_similarity_matrix, Lexicon, SimilarityMatrix};
use crate::alignment::tokenization::tokenize_words;
use crate::config::ScoringConfig;
use crate::pipeline::traits::{AlignmentGrouper, SequenceAligner, SimilarityScorer, Tokenizer};
use crate::types::{AlignmentEdge, AlignmentResult, Language, Token};

pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str, language: Language) -> Vec<Token> {
        tokenize_words(text, language)
    }
}

pub struct DictionaryScorer {
    lexicon: Box<dyn Lexicon>,
    scoring: ScoringConfig,
}

impl DictionaryScorer {
    pub fn new(lexicon: Box<dyn Lexicon>, scoring: ScoringConfig) -> Self {
        Self { lexicon, scoring }
    }
}

impl SimilarityScorer for DictionaryScorer {
    fn score_matrix(&self, source_tokens: &[Token], target_tokens: &[Token]) -> SimilarityMatrix {
        build_similarity_matrix(
            self.lexicon.as_ref(),
            &self.scoring,
            source_tokens,
            target_tokens,
        )
    }
}

pub struct GlobalSequenceAligner {
    pub skip_penalty: f64,
}

impl Default for GlobalSequenceAligner {
    fn default() -> Self {
        Self {
            skip_penalty: ScoringConfig::DEFAULT_SKIP_PENALTY,
        }
    }
}

impl SequenceAligner for GlobalSequenceAligner {
    fn align_path(&self, matrix: &SimilarityMatrix) -> Vec<AlignmentEdge> {
        global_alignment_path(matrix, self.skip_penalty)
    }
}

pub struct DefaultAlignmentGrouper;

impl AlignmentGrouper for DefaultAlignmentGrouper {
    fn group(
        &self,
        edges: &[AlignmentEdge],
        source_tokens: &[Token],
        target_tokens: &[Token],
    ) -> AlignmentResult {
        group_alignment(edges, source_tokens, target_tokens)
    }
}

#[cfg(test)]
mod tests {
    use crate::alignment::similarity::BilingualDictionary;

    use super::*;

    #[test]
    fn whitespace_tokenizer_tokenize() {
        let tokens = WhitespaceTokenizer.tokenize("Halo, dunia", Language::Indonesian);
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, ["halo", ",", "dunia"]);
    }

    #[test]
    fn dictionary_scorer_matches_free_function() {
        let scorer = DictionaryScorer::new(
            Box::new(BilingualDictionary::indonesian_english()),
            ScoringConfig::default(),
        );
        let src = tokenize_words("saya makan", Language::Indonesian);
        let tgt = tokenize_words("i eat", Language::English);
        let expected = build_similarity_matrix(
            &BilingualDictionary::indonesian_english(),
            &ScoringConfig::default(),
            &src,
            &tgt,
        );
        assert_eq!(scorer.score_matrix(&src, &tgt), expected);
    }

    #[test]
    fn global_sequence_aligner_align_path() {
        let aligner = GlobalSequenceAligner::default();
        let matrix = SimilarityMatrix::from_fn(2, 2, |i, j| if i == j { 0.9 } else { 0.0 });
        assert_eq!(aligner.align_path(&matrix), global_alignment_path(&matrix, 0.1));
    }

    #[test]
    fn default_grouper_group() {
        let src = tokenize_words("saya", Language::Indonesian);
        let tgt = tokenize_words("i", Language::English);
        let edges = [AlignmentEdge {
            source: 0,
            target: 0,
            confidence: 0.9,
        }];
        let grouped = DefaultAlignmentGrouper.group(&edges, &src, &tgt);
        assert_eq!(grouped, group_alignment(&edges, &src, &tgt));
    }
}
