use std::path::Path;

use crate::alignment::similarity::{BilingualDictionary, Lexicon};
use crate::config::EngineConfig;
use crate::error::AlignmentError;
use crate::pipeline::defaults::{
    DefaultAlignmentGrouper, DictionaryScorer, GlobalSequenceAligner, WhitespaceTokenizer,
};
use crate::pipeline::runtime::{AlignmentEngine, AlignmentEngineParts};
use crate::pipeline::traits::{AlignmentGrouper, SequenceAligner, SimilarityScorer, Tokenizer};

pub struct AlignmentEngineBuilder {
    config: EngineConfig,
    lexicon: Option<Box<dyn Lexicon>>,
    tokenizer: Option<Box<dyn Tokenizer>>,
    scorer: Option<Box<dyn SimilarityScorer>>,
    sequence_aligner: Option<Box<dyn SequenceAligner>>,
    grouper: Option<Box<dyn AlignmentGrouper>>,
}

impl Default for AlignmentEngineBuilder {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl AlignmentEngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            lexicon: None,
            tokenizer: None,
            scorer: None,
            sequence_aligner: None,
            grouper: None,
        }
    }

    /// Lexicon for the default scorer. Ignored when a custom scorer is set.
    pub fn with_lexicon(mut self, lexicon: Box<dyn Lexicon>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: Box<dyn Tokenizer>) -> Self {
        self.tokenizer = Some(tokenizer);
        self
    }

    pub fn with_scorer(mut self, scorer: Box<dyn SimilarityScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    pub fn with_sequence_aligner(mut self, sequence_aligner: Box<dyn SequenceAligner>) -> Self {
        self.sequence_aligner = Some(sequence_aligner);
        self
    }

    pub fn with_grouper(mut self, grouper: Box<dyn AlignmentGrouper>) -> Self {
        self.grouper = Some(grouper);
        self
    }

    pub fn build(self) -> Result<AlignmentEngine, AlignmentError> {
        self.config.validate()?;
        let scoring = self.config.scoring;

        let scorer: Box<dyn SimilarityScorer> = match self.scorer {
            Some(scorer) => scorer,
            None => {
                let lexicon: Box<dyn Lexicon> = match self.lexicon {
                    Some(lexicon) => lexicon,
                    None => Box::new(load_dictionary(&self.config)?),
                };
                Box::new(DictionaryScorer::new(lexicon, scoring))
            }
        };

        tracing::debug!(
            cache_capacity = self.config.cache_capacity,
            skip_penalty = scoring.skip_penalty,
            position_weight = scoring.position_weight,
            "alignment engine configured"
        );

        Ok(AlignmentEngine::from_parts(AlignmentEngineParts {
            tokenizer: self
                .tokenizer
                .unwrap_or_else(|| Box::new(WhitespaceTokenizer)),
            scorer,
            sequence_aligner: self.sequence_aligner.unwrap_or_else(|| {
                Box::new(GlobalSequenceAligner {
                    skip_penalty: scoring.skip_penalty,
                })
            }),
            grouper: self
                .grouper
                .unwrap_or_else(|| Box::new(DefaultAlignmentGrouper)),
            cache_capacity: self.config.cache_capacity,
        }))
    }
}

fn load_dictionary(config: &EngineConfig) -> Result<BilingualDictionary, AlignmentError> {
    let Some(path) = config.dictionary_path.as_deref() else {
        return Ok(BilingualDictionary::indonesian_english());
    };
    let loaded = BilingualDictionary::load(Path::new(path))?;
    if !config.extend_builtin_dictionary {
        return Ok(loaded);
    }
    let mut dictionary = BilingualDictionary::indonesian_english();
    dictionary.extend(
        loaded
            .entries()
            .map(|(source, targets)| (source.to_string(), targets.to_vec())),
    );
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use crate::alignment::similarity::SimilarityMatrix;
    use crate::types::{AlignmentEdge, Language, Token};

    use super::*;

    struct NoLexicon;

    impl Lexicon for NoLexicon {
        fn is_translation(&self, _source: &str, _target: &str) -> bool {
            false
        }
    }

    struct ReversedAligner;

    impl SequenceAligner for ReversedAligner {
        fn align_path(&self, matrix: &SimilarityMatrix) -> Vec<AlignmentEdge> {
            let n = matrix.rows().min(matrix.cols());
            (0..n)
                .map(|i| AlignmentEdge {
                    source: i,
                    target: n - 1 - i,
                    confidence: matrix.get(i, n - 1 - i),
                })
                .collect()
        }
    }

    struct CharTokenizer;

    impl Tokenizer for CharTokenizer {
        fn tokenize(&self, text: &str, language: Language) -> Vec<Token> {
            text.chars()
                .filter(|c| !c.is_whitespace())
                .enumerate()
                .map(|(index, c)| Token {
                    text: c.to_string(),
                    index,
                    start: index,
                    end: index + 1,
                    language,
                })
                .collect()
        }
    }

    #[test]
    fn default_builder_builds() {
        let engine = AlignmentEngineBuilder::default().build().expect("build");
        assert_eq!(engine.cache_stats().capacity, 500);
    }

    #[test]
    fn invalid_config_fails_build() {
        let config = EngineConfig {
            cache_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(AlignmentEngineBuilder::new(config).build().is_err());
    }

    #[test]
    fn missing_dictionary_file_fails_build() {
        let config = EngineConfig {
            dictionary_path: Some("/nonexistent/dictionary.json".to_string()),
            ..EngineConfig::default()
        };
        assert!(matches!(
            AlignmentEngineBuilder::new(config).build(),
            Err(AlignmentError::Io { .. })
        ));
    }

    #[test]
    fn dictionary_file_extends_or_replaces_builtin() {
        let path = std::env::temp_dir().join("kata_align_builder_dictionary.json");
        std::fs::write(&path, r#"{"suka": ["like"]}"#).expect("write dictionary");

        let config = EngineConfig {
            dictionary_path: Some(path.to_string_lossy().to_string()),
            ..EngineConfig::default()
        };
        let engine = AlignmentEngineBuilder::new(config.clone()).build().expect("build");
        let result = engine.align("saya suka kamu", "i like you", None, None);
        assert!(result.word_alignment.iter().all(|w| w.confidence == 0.9));

        let replacing = EngineConfig {
            extend_builtin_dictionary: false,
            ..config
        };
        let engine = AlignmentEngineBuilder::new(replacing).build().expect("build");
        let result = engine.align("saya suka kamu", "i like you", None, None);
        assert_eq!(result.word_alignment[1].confidence, 0.9);
        assert!(result.word_alignment[0].confidence < 0.9);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn custom_lexicon_drops_dictionary_hits() {
        let engine = AlignmentEngineBuilder::default()
            .with_lexicon(Box::new(NoLexicon))
            .build()
            .expect("build");
        let result = engine.align("saya kamu", "i you", None, None);
        assert!(result.word_alignment.iter().all(|w| w.confidence < 0.9));
    }

    #[test]
    fn custom_components_are_used() {
        let engine = AlignmentEngineBuilder::default()
            .with_tokenizer(Box::new(CharTokenizer))
            .with_sequence_aligner(Box::new(ReversedAligner))
            .build()
            .expect("build");
        let result = engine.align("ab", "xy", None, None);
        let pairs: Vec<(usize, usize)> = result
            .word_alignment
            .iter()
            .map(|w| (w.source_index, w.target_index))
            .collect();
        assert_eq!(pairs, [(0, 1), (1, 0)]);
        assert_eq!(result.word_alignment[0].source_word, "a");
    }
}
