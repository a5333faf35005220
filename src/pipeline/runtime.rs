use std::sync::{Arc, Mutex, MutexGuard};

use crate::alignment::cache::{BoundedCache, CacheStats};
use crate::pipeline::traits::{AlignmentGrouper, SequenceAligner, SimilarityScorer, Tokenizer};
use crate::types::{AlignmentEdge, AlignmentResult, Language, Token};

type CacheKey = (String, String);

/// Word/phrase aligner for Indonesian source text and its English translation.
///
/// `align` never fails: degenerate input produces an empty result. Results are
/// shared through a bounded cache keyed on the exact text pair.
pub struct AlignmentEngine {
    tokenizer: Box<dyn Tokenizer>,
    scorer: Box<dyn SimilarityScorer>,
    sequence_aligner: Box<dyn SequenceAligner>,
    grouper: Box<dyn AlignmentGrouper>,
    cache: Mutex<BoundedCache<CacheKey, Arc<AlignmentResult>>>,
}

pub(crate) struct AlignmentEngineParts {
    pub tokenizer: Box<dyn Tokenizer>,
    pub scorer: Box<dyn SimilarityScorer>,
    pub sequence_aligner: Box<dyn SequenceAligner>,
    pub grouper: Box<dyn AlignmentGrouper>,
    pub cache_capacity: usize,
}

impl AlignmentEngine {
    pub(crate) fn from_parts(parts: AlignmentEngineParts) -> Self {
        Self {
            tokenizer: parts.tokenizer,
            scorer: parts.scorer,
            sequence_aligner: parts.sequence_aligner,
            grouper: parts.grouper,
            cache: Mutex::new(BoundedCache::new(parts.cache_capacity)),
        }
    }

    /// Align `source_text` (Indonesian) with `target_text` (English).
    ///
    /// Pre-tokenized sequences from a translation provider are used as-is; a
    /// missing side is tokenized internally. The cache key is the text pair only,
    /// so a cached result wins over tokens supplied on a later call.
    pub fn align(
        &self,
        source_text: &str,
        target_text: &str,
        source_tokens: Option<&[Token]>,
        target_tokens: Option<&[Token]>,
    ) -> Arc<AlignmentResult> {
        let key = (source_text.to_string(), target_text.to_string());
        if let Some(hit) = self.lock_cache().get(&key) {
            tracing::debug!(source = source_text, "alignment: cache hit");
            return hit;
        }

        let owned_source;
        let source_tokens = match source_tokens {
            Some(tokens) => tokens,
            None => {
                owned_source = self.tokenizer.tokenize(source_text, Language::Indonesian);
                &owned_source
            }
        };
        let owned_target;
        let target_tokens = match target_tokens {
            Some(tokens) => tokens,
            None => {
                owned_target = self.tokenizer.tokenize(target_text, Language::English);
                &owned_target
            }
        };

        let result = Arc::new(self.align_tokens(source_tokens, target_tokens));
        if let Some((evicted, _)) = self.lock_cache().insert(key, Arc::clone(&result)) {
            tracing::debug!(evicted = evicted.as_str(), "alignment: cache eviction");
        }
        result
    }

    /// Uncached alignment of two token sequences.
    pub fn align_tokens(&self, source_tokens: &[Token], target_tokens: &[Token]) -> AlignmentResult {
        if source_tokens.is_empty() || target_tokens.is_empty() {
            return AlignmentResult::default();
        }
        let matrix = self.scorer.score_matrix(source_tokens, target_tokens);
        let edges = self.sequence_aligner.align_path(&matrix);
        self.grouper.group(&edges, source_tokens, target_tokens)
    }

    /// Group an externally produced edge list with this engine's grouper.
    pub fn group_edges(
        &self,
        edges: &[AlignmentEdge],
        source_tokens: &[Token],
        target_tokens: &[Token],
    ) -> AlignmentResult {
        self.grouper.group(edges, source_tokens, target_tokens)
    }

    pub fn tokenize(&self, text: &str, language: Language) -> Vec<Token> {
        self.tokenizer.tokenize(text, language)
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
        tracing::debug!("alignment: cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    fn lock_cache(&self) -> MutexGuard<'_, BoundedCache<CacheKey, Arc<AlignmentResult>>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
