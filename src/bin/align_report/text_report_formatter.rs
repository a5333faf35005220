use std::fmt::Write;

use kata_align::report::{MetricDistribution, PairReport, Report};

pub fn render_report(report: &Report) -> String {
    let mut out = String::new();
    for pair in &report.pairs {
        render_pair(&mut out, pair);
        out.push('\n');
    }

    let aggregates = &report.aggregates;
    let _ = writeln!(
        out,
        "scheme: {}{}",
        report.meta.scheme,
        if report.meta.accessibility_mode {
            " (accessibility)"
        } else {
            ""
        }
    );
    let _ = writeln!(
        out,
        "pairs: {} total, {} empty, {} with reference; phrases: {}",
        aggregates.counts.total,
        aggregates.counts.empty,
        aggregates.counts.with_reference,
        aggregates.phrase_count
    );
    if let Some(confidence) = &aggregates.confidence {
        let _ = writeln!(out, "confidence: {}", distribution_line(confidence));
    }
    if let Some(f1) = &aggregates.reference_f1 {
        let _ = writeln!(out, "reference f1: {}", distribution_line(f1));
    }
    out
}

fn render_pair(out: &mut String, pair: &PairReport) {
    let _ = writeln!(out, "[{}] {}", pair.id, pair.source);
    let _ = writeln!(out, "{}  {}", " ".repeat(pair.id.len() + 2), pair.target);

    for word in &pair.words {
        let color = pair
            .colors
            .source_colors
            .get(word.source_index)
            .copied()
            .flatten()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  {:>3} {:<14} -> {:>3} {:<14} {:.2}  {color}",
            word.source_index,
            word.source_word,
            word.target_index,
            word.target_word,
            word.confidence
        );
    }
    for phrase in &pair.phrases {
        let _ = writeln!(
            out,
            "  phrase {:?} \"{}\" <-> {:?} \"{}\"",
            phrase.source_indices, phrase.source_text, phrase.target_indices, phrase.target_text
        );
    }
    if let Some(reference) = &pair.reference {
        let _ = writeln!(
            out,
            "  reference: precision {:.2} recall {:.2} f1 {:.2}",
            reference.precision, reference.recall, reference.f1
        );
    }
    if !pair.notes.is_empty() {
        let _ = writeln!(out, "  notes: {}", pair.notes.join(", "));
    }
}

fn distribution_line(d: &MetricDistribution) -> String {
    format!(
        "mean {:.3} p50 {:.3} p90 {:.3} min {:.3} max {:.3}",
        d.mean, d.p50, d.p90, d.min, d.max
    )
}
