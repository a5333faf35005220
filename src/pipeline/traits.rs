use crate::alignment::similarity::SimilarityMatrix;
use crate::types::{AlignmentEdge, AlignmentResult, Language, Token};

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str, language: Language) -> Vec<Token>;
}

pub trait SimilarityScorer: Send + Sync {
    fn score_matrix(&self, source_tokens: &[Token], target_tokens: &[Token]) -> SimilarityMatrix;
}

pub trait SequenceAligner: Send + Sync {
    fn align_path(&self, matrix: &SimilarityMatrix) -> Vec<AlignmentEdge>;
}

pub trait AlignmentGrouper: Send + Sync {
    fn group(
        &self,
        edges: &[AlignmentEdge],
        source_tokens: &[Token],
        target_tokens: &[Token],
    ) -> AlignmentResult;
}
