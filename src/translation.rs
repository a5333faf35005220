use std::sync::{Arc, Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::alignment::cache::{BoundedCache, CacheStats};
use crate::coloring::{ColorAssignment, ColorCoordinator};
use crate::error::AlignmentError;
use crate::pipeline::runtime::AlignmentEngine;
use crate::types::{AlignmentResult, Language, Token};

pub const TRANSLATION_CACHE_CAPACITY: usize = 1000;

/// What a translation backend hands back. Token sequences are optional; when
/// absent the engine tokenizes the text itself.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOutput {
    pub text: String,
    #[serde(default)]
    pub source_tokens: Option<Vec<Token>>,
    #[serde(default)]
    pub target_tokens: Option<Vec<Token>>,
}

impl ProviderOutput {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_tokens: None,
            target_tokens: None,
        }
    }
}

/// Opaque Indonesian-to-English translator.
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &str;
    fn translate(&self, text: &str) -> Result<ProviderOutput, AlignmentError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Translation {
    Simple {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Aligned {
        text: String,
        original_text: String,
        alignment: Arc<AlignmentResult>,
        colors: Option<ColorAssignment>,
    },
}

impl Translation {
    pub fn text(&self) -> &str {
        match self {
            Self::Simple { text } | Self::Aligned { text, .. } => text,
        }
    }

    pub fn alignment(&self) -> Option<&AlignmentResult> {
        match self {
            Self::Simple { .. } => None,
            Self::Aligned { alignment, .. } => Some(&**alignment),
        }
    }

    pub fn colors(&self) -> Option<&ColorAssignment> {
        match self {
            Self::Simple { .. } => None,
            Self::Aligned { colors, .. } => colors.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranslateOptions {
    pub use_cache: bool,
    pub include_alignment: bool,
    pub include_colors: bool,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            include_alignment: true,
            include_colors: true,
        }
    }
}

/// Provider -> alignment -> colors, with a bounded cache keyed on trimmed text.
pub struct TranslationService {
    provider: Box<dyn TranslationProvider>,
    engine: AlignmentEngine,
    coordinator: ColorCoordinator,
    cache: Mutex<BoundedCache<String, Translation>>,
}

impl TranslationService {
    pub fn new(
        provider: Box<dyn TranslationProvider>,
        engine: AlignmentEngine,
        coordinator: ColorCoordinator,
    ) -> Self {
        Self::with_cache_capacity(provider, engine, coordinator, TRANSLATION_CACHE_CAPACITY)
    }

    pub fn with_cache_capacity(
        provider: Box<dyn TranslationProvider>,
        engine: AlignmentEngine,
        coordinator: ColorCoordinator,
        capacity: usize,
    ) -> Self {
        Self {
            provider,
            engine,
            coordinator,
            cache: Mutex::new(BoundedCache::new(capacity)),
        }
    }

    pub fn engine(&self) -> &AlignmentEngine {
        &self.engine
    }

    pub fn coordinator(&self) -> &ColorCoordinator {
        &self.coordinator
    }

    /// Settings changes do not touch translations that are already cached.
    pub fn coordinator_mut(&mut self) -> &mut ColorCoordinator {
        &mut self.coordinator
    }

    pub fn translate(
        &self,
        text: &str,
        options: TranslateOptions,
    ) -> Result<Translation, AlignmentError> {
        let clean = text.trim();
        if clean.is_empty() {
            return Ok(Translation::Simple {
                text: String::new(),
            });
        }

        if options.use_cache {
            if let Some(hit) = self.lock_cache().get(&clean.to_string()) {
                tracing::debug!(text = clean, "translation: cache hit");
                return Ok(hit);
            }
        }

        let output = self.provider.translate(clean)?;
        tracing::debug!(
            provider = self.provider.name(),
            source = clean,
            target = output.text.as_str(),
            "translation: provider returned"
        );
        let translation = self.resolve(clean, output, options);

        if options.use_cache {
            let evicted = self
                .lock_cache()
                .insert(clean.to_string(), translation.clone());
            if let Some(evicted) = evicted {
                tracing::debug!(evicted = evicted.as_str(), "translation: cache eviction");
            }
        }
        Ok(translation)
    }

    /// Translate each text in order, stopping at the first provider failure.
    pub fn translate_batch<S: AsRef<str>>(
        &self,
        texts: &[S],
        options: TranslateOptions,
    ) -> Result<Vec<Translation>, AlignmentError> {
        texts
            .iter()
            .map(|text| self.translate(text.as_ref(), options))
            .collect()
    }

    /// Warm the cache with texts that are not cached yet. Failures are logged and
    /// skipped; returns how many texts were newly translated.
    pub fn pre_translate<S: AsRef<str>>(&self, texts: &[S]) -> usize {
        let pending: Vec<&str> = {
            let cache = self.lock_cache();
            texts
                .iter()
                .map(|text| text.as_ref().trim())
                .filter(|text| !text.is_empty() && !cache.contains(&text.to_string()))
                .collect()
        };
        if pending.is_empty() {
            tracing::debug!("translation: all upcoming texts already cached");
            return 0;
        }

        let mut warmed = 0;
        for text in pending {
            match self.translate(text, TranslateOptions::default()) {
                Ok(_) => warmed += 1,
                Err(err) => tracing::warn!(text, error = %err, "translation: pre-translate failed"),
            }
        }
        tracing::debug!(warmed, "translation: pre-translate complete");
        warmed
    }

    pub fn clear_cache(&self) {
        self.lock_cache().clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.lock_cache().stats()
    }

    fn resolve(&self, clean: &str, output: ProviderOutput, options: TranslateOptions) -> Translation {
        if !options.include_alignment {
            return Translation::Simple { text: output.text };
        }

        let source_tokens = output
            .source_tokens
            .unwrap_or_else(|| self.engine.tokenize(clean, Language::Indonesian));
        let target_tokens = output
            .target_tokens
            .unwrap_or_else(|| self.engine.tokenize(&output.text, Language::English));

        let alignment = self.engine.align(
            clean,
            &output.text,
            Some(source_tokens.as_slice()),
            Some(target_tokens.as_slice()),
        );
        let colors = options
            .include_colors
            .then(|| self.coordinator.assign_colors(&alignment, &source_tokens, &target_tokens));

        Translation::Aligned {
            text: output.text,
            original_text: clean.to_string(),
            alignment,
            colors,
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, BoundedCache<String, Translation>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::coloring::ColorSettings;
    use crate::pipeline::builder::AlignmentEngineBuilder;

    struct TableProvider {
        table: HashMap<&'static str, &'static str>,
        calls: AtomicUsize,
    }

    impl TableProvider {
        fn new() -> Self {
            Self {
                table: HashMap::from([
                    ("saya suka kamu", "I like you"),
                    ("saya makan nasi.", "I eat rice."),
                ]),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TranslationProvider for TableProvider {
        fn name(&self) -> &str {
            "table"
        }

        fn translate(&self, text: &str) -> Result<ProviderOutput, AlignmentError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.table
                .get(text)
                .map(|t| ProviderOutput::text_only(*t))
                .ok_or_else(|| AlignmentError::runtime("table provider", format!("no entry for {text}")))
        }
    }

    fn service() -> TranslationService {
        TranslationService::new(
            Box::new(TableProvider::new()),
            AlignmentEngineBuilder::default().build().expect("engine"),
            ColorCoordinator::new(ColorSettings::default()),
        )
    }

    #[test]
    fn empty_text_is_simple_and_skips_provider() {
        let service = service();
        let translation = service.translate("   ", TranslateOptions::default()).unwrap();
        assert_eq!(translation, Translation::Simple { text: String::new() });
        assert_eq!(service.cache_stats().len, 0);
    }

    #[test]
    fn aligned_translation_carries_alignment_and_colors() {
        let service = service();
        let translation = service
            .translate("  saya suka kamu ", TranslateOptions::default())
            .unwrap();

        assert_eq!(translation.text(), "I like you");
        let Translation::Aligned { original_text, alignment, colors, .. } = &translation else {
            panic!("expected aligned translation");
        };
        assert_eq!(original_text, "saya suka kamu");
        assert_eq!(alignment.word_alignment.len(), 3);
        assert_eq!(alignment.word_alignment[0].target_word, "i");
        let colors = colors.as_ref().expect("colors requested");
        assert_eq!(colors.source_colors, colors.target_colors);
    }

    #[test]
    fn cached_translations_skip_the_provider() {
        let provider = TableProvider::new();
        let service = TranslationService::new(
            Box::new(provider),
            AlignmentEngineBuilder::default().build().expect("engine"),
            ColorCoordinator::new(ColorSettings::default()),
        );
        let first = service.translate("saya suka kamu", TranslateOptions::default()).unwrap();
        let second = service.translate("saya suka kamu  ", TranslateOptions::default()).unwrap();
        assert_eq!(first, second);
        let stats = service.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));

        let uncached = TranslateOptions {
            use_cache: false,
            ..TranslateOptions::default()
        };
        service.translate("saya makan nasi.", uncached).unwrap();
        assert_eq!(service.cache_stats().len, 1);
    }

    #[test]
    fn options_control_the_shape() {
        let service = service();
        let plain = TranslateOptions {
            include_alignment: false,
            use_cache: false,
            ..TranslateOptions::default()
        };
        assert_eq!(
            service.translate("saya suka kamu", plain).unwrap(),
            Translation::Simple { text: "I like you".to_string() }
        );

        let no_colors = TranslateOptions {
            include_colors: false,
            use_cache: false,
            ..TranslateOptions::default()
        };
        let translation = service.translate("saya suka kamu", no_colors).unwrap();
        assert!(translation.alignment().is_some());
        assert!(translation.colors().is_none());
    }

    #[test]
    fn provider_tokens_are_used() {
        struct Tokenized;
        impl TranslationProvider for Tokenized {
            fn name(&self) -> &str {
                "tokenized"
            }
            fn translate(&self, _text: &str) -> Result<ProviderOutput, AlignmentError> {
                let output = serde_json::json!({
                    "text": "hello",
                    "sourceTokens": [
                        { "text": "halo", "index": 0, "start": 0, "end": 4, "language": "id" }
                    ],
                    "targetTokens": [
                        { "text": "hello", "index": 0, "start": 0, "end": 5, "language": "en" }
                    ]
                });
                serde_json::from_value(output).map_err(|e| AlignmentError::runtime("decode", e))
            }
        }

        let service = TranslationService::new(
            Box::new(Tokenized),
            AlignmentEngineBuilder::default().build().expect("engine"),
            ColorCoordinator::new(ColorSettings::default()),
        );
        let translation = service.translate("halo", TranslateOptions::default()).unwrap();
        let alignment = translation.alignment().expect("aligned");
        assert_eq!(alignment.word_alignment[0].source_word, "halo");
        assert_eq!(alignment.word_alignment[0].target_word, "hello");
    }

    #[test]
    fn provider_token_without_text_still_aligns() {
        struct Partial;
        impl TranslationProvider for Partial {
            fn name(&self) -> &str {
                "partial"
            }
            fn translate(&self, _text: &str) -> Result<ProviderOutput, AlignmentError> {
                serde_json::from_str(
                    r#"{"text":"hello","targetTokens":[{"index":0,"start":0,"end":5,"language":"en"}]}"#,
                )
                .map_err(|e| AlignmentError::runtime("decode", e))
            }
        }

        let service = TranslationService::new(
            Box::new(Partial),
            AlignmentEngineBuilder::default().build().expect("engine"),
            ColorCoordinator::new(ColorSettings::default()),
        );
        let translation = service.translate("halo", TranslateOptions::default()).unwrap();
        assert_eq!(translation.text(), "hello");
        let alignment = translation.alignment().expect("aligned");
        assert!(alignment.word_alignment.iter().all(|w| w.target_word.is_empty()));
        let colors = translation.colors().expect("colors requested");
        assert_eq!(colors.source_colors.len(), 1);
        assert_eq!(colors.target_colors.len(), 1);
    }

    #[test]
    fn provider_failure_propagates_and_batch_stops() {
        let service = service();
        assert!(matches!(
            service.translate("tidak ada", TranslateOptions::default()),
            Err(AlignmentError::Runtime { .. })
        ));
        assert!(service
            .translate_batch(&["saya suka kamu", "tidak ada"], TranslateOptions::default())
            .is_err());
        let ok = service
            .translate_batch(&["saya suka kamu", "saya makan nasi."], TranslateOptions::default())
            .unwrap();
        assert_eq!(ok[1].text(), "I eat rice.");
    }

    #[test]
    fn pre_translate_warms_only_missing_entries() {
        let service = service();
        service.translate("saya suka kamu", TranslateOptions::default()).unwrap();
        let warmed = service.pre_translate(&["saya suka kamu", " saya makan nasi. ", "tidak ada", ""]);
        assert_eq!(warmed, 1);
        assert_eq!(service.cache_stats().len, 2);
        assert_eq!(service.pre_translate(&["saya makan nasi."]), 0);
    }

    #[test]
    fn translation_cache_is_bounded() {
        let service = TranslationService::with_cache_capacity(
            Box::new(TableProvider::new()),
            AlignmentEngineBuilder::default().build().expect("engine"),
            ColorCoordinator::new(ColorSettings::default()),
            1,
        );
        service.translate("saya suka kamu", TranslateOptions::default()).unwrap();
        service.translate("saya makan nasi.", TranslateOptions::default()).unwrap();
        let stats = service.cache_stats();
        assert_eq!((stats.len, stats.capacity), (1, 1));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Translation::Simple { text: "hi".to_string() }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "simple", "text": "hi" }));
    }
}
