pub mod alignment;
pub mod coloring;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod settings;
pub mod translation;
pub mod types;

pub use alignment::similarity::{BilingualDictionary, Lexicon};
pub use coloring::{ColorAssignment, ColorCoordinator, ColorScheme, ColorSettings};
pub use config::{EngineConfig, ScoringConfig};
pub use error::AlignmentError;
pub use pipeline::builder::AlignmentEngineBuilder;
pub use pipeline::runtime::AlignmentEngine;
pub use pipeline::traits::{AlignmentGrouper, SequenceAligner, SimilarityScorer, Tokenizer};
pub use settings::{JsonFileSettingsStore, MemorySettingsStore, SettingsStore};
pub use translation::{TranslateOptions, Translation, TranslationProvider, TranslationService};
pub use types::{AlignmentResult, Language, Phrase, Token, WordAlignment};
