use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::coloring::{ColorAssignment, ColorCoordinator, ColorScheme};
use crate::pipeline::runtime::AlignmentEngine;
use crate::types::{AlignmentStatistics, Language, Phrase, WordAlignment};

pub const SCHEMA_VERSION: u32 = 1;

const OUTLIER_TOP_N: usize = 10;
const LOW_CONF_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: u32,
    pub meta: Meta,
    pub pairs: Vec<PairReport>,
    pub aggregates: AggregateReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct Meta {
    pub generated_at: String,
    pub scheme: ColorScheme,
    pub accessibility_mode: bool,
    pub pair_count: usize,
}

/// One sentence pair to report on; `expected` holds reference `(source, target)` links.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PairInput {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub expected: Option<Vec<(usize, usize)>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PairReport {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_tokens: Vec<String>,
    pub target_tokens: Vec<String>,
    pub words: Vec<WordAlignment>,
    pub phrases: Vec<Phrase>,
    pub statistics: AlignmentStatistics,
    pub low_conf_link_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<ReferenceMetrics>,
    pub colors: ColorAssignment,
    pub notes: Vec<String>,
}

/// Link-level agreement with a reference alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReferenceMetrics {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AggregateReport {
    pub counts: AggregateCounts,
    pub confidence: Option<MetricDistribution>,
    pub links_per_pair: Option<MetricDistribution>,
    pub phrase_count: usize,
    pub reference_f1: Option<MetricDistribution>,
    pub lowest_confidence: Vec<OutlierEntry>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AggregateCounts {
    pub total: u32,
    pub empty: u32,
    pub with_reference: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricDistribution {
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlierEntry {
    pub id: String,
    pub value: f64,
}

pub fn compute_pair_report(
    id: &str,
    input: &PairInput,
    engine: &AlignmentEngine,
    coordinator: &ColorCoordinator,
) -> PairReport {
    let mut notes = Vec::new();
    let source_tokens = engine.tokenize(&input.source, Language::Indonesian);
    let target_tokens = engine.tokenize(&input.target, Language::English);
    if source_tokens.is_empty() {
        notes.push("empty_source".to_string());
    }
    if target_tokens.is_empty() {
        notes.push("empty_target".to_string());
    }

    let alignment = engine.align(
        &input.source,
        &input.target,
        Some(source_tokens.as_slice()),
        Some(target_tokens.as_slice()),
    );
    let colors = coordinator.assign_colors(&alignment, &source_tokens, &target_tokens);
    let statistics = alignment.statistics();

    let low_conf = alignment
        .word_alignment
        .iter()
        .filter(|w| w.confidence < LOW_CONF_THRESHOLD)
        .count();
    let low_conf_link_ratio = ratio(low_conf, alignment.word_alignment.len());

    let unaligned_sources = source_tokens.len().saturating_sub(alignment.source_to_target.len());
    if unaligned_sources > 0 {
        notes.push(format!("unaligned_source_tokens={unaligned_sources}"));
    }
    let unaligned_targets = target_tokens.len().saturating_sub(alignment.target_to_source.len());
    if unaligned_targets > 0 {
        notes.push(format!("unaligned_target_tokens={unaligned_targets}"));
    }

    let reference = input
        .expected
        .as_deref()
        .map(|expected| reference_metrics(&alignment.word_alignment, expected));

    PairReport {
        id: id.to_string(),
        source: input.source.clone(),
        target: input.target.clone(),
        source_tokens: source_tokens.into_iter().map(|t| t.text).collect(),
        target_tokens: target_tokens.into_iter().map(|t| t.text).collect(),
        words: alignment.word_alignment.clone(),
        phrases: alignment.phrase_alignment.clone(),
        statistics,
        low_conf_link_ratio,
        reference,
        colors,
        notes,
    }
}

pub fn reference_metrics(predicted: &[WordAlignment], expected: &[(usize, usize)]) -> ReferenceMetrics {
    let predicted: HashSet<(usize, usize)> = predicted
        .iter()
        .map(|w| (w.source_index, w.target_index))
        .collect();
    let expected: HashSet<(usize, usize)> = expected.iter().copied().collect();
    let matched = predicted.intersection(&expected).count();

    // two empty alignments agree perfectly
    if predicted.is_empty() && expected.is_empty() {
        return ReferenceMetrics {
            precision: 1.0,
            recall: 1.0,
            f1: 1.0,
        };
    }
    let precision = ratio(matched, predicted.len());
    let recall = ratio(matched, expected.len());
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    ReferenceMetrics {
        precision,
        recall,
        f1,
    }
}

pub fn aggregate_reports(pairs: &[PairReport]) -> AggregateReport {
    let empty = pairs.iter().filter(|p| p.words.is_empty()).count();
    let with_reference: Vec<f64> = pairs
        .iter()
        .filter_map(|p| p.reference.map(|r| r.f1))
        .collect();

    let confidences: Vec<f64> = pairs
        .iter()
        .flat_map(|p| p.words.iter().map(|w| w.confidence))
        .collect();
    let links: Vec<f64> = pairs.iter().map(|p| p.words.len() as f64).collect();

    AggregateReport {
        counts: AggregateCounts {
            total: to_u32(pairs.len()),
            empty: to_u32(empty),
            with_reference: to_u32(with_reference.len()),
        },
        confidence: distribution_or_none(&confidences),
        links_per_pair: distribution_or_none(&links),
        phrase_count: pairs.iter().map(|p| p.phrases.len()).sum(),
        reference_f1: distribution_or_none(&with_reference),
        lowest_confidence: lowest_confidence(pairs, OUTLIER_TOP_N),
    }
}

fn lowest_confidence(pairs: &[PairReport], top_n: usize) -> Vec<OutlierEntry> {
    let mut entries: Vec<OutlierEntry> = pairs
        .iter()
        .filter(|p| !p.words.is_empty())
        .map(|p| OutlierEntry {
            id: p.id.clone(),
            value: p.statistics.average_confidence,
        })
        .collect();

    entries.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    entries.truncate(top_n);
    entries
}

fn distribution_or_none(values: &[f64]) -> Option<MetricDistribution> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    Some(MetricDistribution {
        mean: mean(&sorted),
        p50: percentile_sorted(&sorted, 0.5),
        p90: percentile_sorted(&sorted, 0.9),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    })
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn percentile_sorted(sorted_values: &[f64], percentile: f64) -> f64 {
    if sorted_values.is_empty() {
        return 0.0;
    }
    if sorted_values.len() == 1 {
        return sorted_values[0];
    }

    let clamped = percentile.clamp(0.0, 1.0);
    let max_index = (sorted_values.len() - 1) as f64;
    let rank = clamped * max_index;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        sorted_values[lower]
    } else {
        let weight = rank - lower as f64;
        sorted_values[lower] * (1.0 - weight) + sorted_values[upper] * weight
    }
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
