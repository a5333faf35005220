use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use kata_align::report::{
    aggregate_reports, compute_pair_report, Meta, PairInput, PairReport, Report, SCHEMA_VERSION,
};
use kata_align::{
    AlignmentEngine, AlignmentEngineBuilder, ColorCoordinator, ColorScheme, ColorSettings,
    EngineConfig, JsonFileSettingsStore,
};

#[path = "align_report/json_report_formatter.rs"]
mod json_report_formatter;
#[path = "align_report/text_report_formatter.rs"]
mod text_report_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SchemeChoice {
    Vibrant,
    Pastel,
    #[value(name = "high-contrast", alias = "highContrast")]
    HighContrast,
    Monochrome,
}

impl SchemeChoice {
    fn color_scheme(self) -> ColorScheme {
        match self {
            Self::Vibrant => ColorScheme::Vibrant,
            Self::Pastel => ColorScheme::Pastel,
            Self::HighContrast => ColorScheme::HighContrast,
            Self::Monochrome => ColorScheme::Monochrome,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "align_report")]
#[command(about = "Align Indonesian/English sentence pairs and report words, phrases and colors")]
struct Args {
    /// Indonesian sentence (single-pair mode).
    #[arg(long, requires = "target", conflicts_with = "input")]
    source: Option<String>,
    /// English translation (single-pair mode).
    #[arg(long, requires = "source", conflicts_with = "input")]
    target: Option<String>,
    /// JSONL file, one `{"id"?, "source", "target", "expected"?}` object per line.
    #[arg(long, env = "KATA_ALIGN_INPUT")]
    input: Option<PathBuf>,
    /// Engine configuration JSON.
    #[arg(long, env = "KATA_ALIGN_CONFIG")]
    config: Option<PathBuf>,
    /// Extra dictionary JSON, merged according to the engine configuration.
    #[arg(long, env = "KATA_ALIGN_DICTIONARY")]
    dictionary: Option<PathBuf>,
    /// Settings file holding the persisted color preferences.
    #[arg(long, env = "KATA_ALIGN_SETTINGS")]
    settings: Option<PathBuf>,
    #[arg(long, env = "KATA_ALIGN_SCHEME", value_enum)]
    scheme: Option<SchemeChoice>,
    #[arg(long, env = "KATA_ALIGN_ACCESSIBILITY", default_value_t = false)]
    accessibility: bool,
    #[arg(
        long,
        env = "KATA_ALIGN_FORMAT",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    output_format: OutputFormat,
    /// Write the report here instead of stdout.
    #[arg(long, env = "KATA_ALIGN_OUT")]
    out: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("align_report: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();
    init_logging(args.verbose);

    let pairs = load_pairs(&args)?;
    if pairs.is_empty() {
        return Err("No sentence pairs to align.".to_string());
    }

    let engine = build_engine(args.config.as_deref(), args.dictionary.as_deref())?;
    let coordinator = build_coordinator(&args);

    let progress = if args.input.is_some() {
        let bar = ProgressBar::new(pairs.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        bar
    } else {
        ProgressBar::hidden()
    };

    let mut reports: Vec<PairReport> = Vec::with_capacity(pairs.len());
    for (idx, pair) in pairs.iter().enumerate() {
        let id = pair.id.clone().unwrap_or_else(|| format!("pair-{idx}"));
        reports.push(compute_pair_report(&id, pair, &engine, &coordinator));
        progress.inc(1);
    }
    progress.finish_and_clear();

    let aggregates = aggregate_reports(&reports);
    let report = Report {
        schema_version: SCHEMA_VERSION,
        meta: Meta {
            generated_at: Utc::now().to_rfc3339(),
            scheme: coordinator.color_scheme(),
            accessibility_mode: coordinator.accessibility_mode(),
            pair_count: reports.len(),
        },
        pairs: reports,
        aggregates,
    };

    let rendered = match args.output_format {
        OutputFormat::Json => json_report_formatter::render_report(&report)?,
        OutputFormat::Text => text_report_formatter::render_report(&report),
    };
    match args.out.as_deref() {
        Some(path) => {
            write_output(path, &rendered)?;
            tracing::info!(path = %path.display(), pairs = report.meta.pair_count, "report written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn build_engine(config_path: Option<&Path>, dictionary: Option<&Path>) -> Result<AlignmentEngine, String> {
    let mut config = match config_path {
        Some(path) => EngineConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(path) = dictionary {
        config.dictionary_path = Some(path.to_string_lossy().into_owned());
    }
    AlignmentEngineBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build alignment engine: {err}"))
}

fn build_coordinator(args: &Args) -> ColorCoordinator {
    ColorCoordinator::new(resolve_color_settings(
        args.settings.as_deref(),
        args.scheme,
        args.accessibility,
    ))
}

/// Stored preferences overlaid with command-line flags. The settings file is only
/// read; a report run never rewrites saved preferences.
fn resolve_color_settings(
    settings_path: Option<&Path>,
    scheme: Option<SchemeChoice>,
    accessibility: bool,
) -> ColorSettings {
    let mut settings = match settings_path {
        Some(path) => ColorCoordinator::with_store(
            ColorSettings::default(),
            Box::new(JsonFileSettingsStore::new(path)),
        )
        .settings()
        .clone(),
        None => ColorSettings::default(),
    };
    if let Some(choice) = scheme {
        settings.color_scheme = choice.color_scheme();
    }
    if accessibility {
        settings.accessibility_mode = true;
    }
    settings
}

fn load_pairs(args: &Args) -> Result<Vec<PairInput>, String> {
    if let Some(path) = args.input.as_deref() {
        return load_jsonl_pairs(path);
    }
    match (&args.source, &args.target) {
        (Some(source), Some(target)) => Ok(vec![PairInput {
            id: None,
            source: source.clone(),
            target: target.clone(),
            expected: None,
        }]),
        _ => Err("Provide --source and --target, or --input <file.jsonl>.".to_string()),
    }
}

fn load_jsonl_pairs(path: &Path) -> Result<Vec<PairInput>, String> {
    let data = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read input '{}': {err}", path.display()))?;
    data.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line_idx, line)| {
            serde_json::from_str::<PairInput>(line).map_err(|err| {
                format!(
                    "Invalid pair on line {} of '{}': {err}",
                    line_idx + 1,
                    path.display()
                )
            })
        })
        .collect()
}

fn write_output(path: &Path, rendered: &str) -> Result<(), String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create report output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    fs::write(path, rendered)
        .map_err(|err| format!("Failed to write report file '{}': {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_stored_preferences_without_saving() {
        let path = std::env::temp_dir().join("kata_align_report_settings.json");
        let stored = r#"{"colorScheme":"pastel","accessibilityMode":false}"#;
        fs::write(&path, stored).expect("write settings");

        let settings = resolve_color_settings(Some(&path), Some(SchemeChoice::Monochrome), true);
        assert_eq!(settings.color_scheme, ColorScheme::Monochrome);
        assert!(settings.accessibility_mode);
        assert_eq!(fs::read_to_string(&path).expect("read settings"), stored);

        let settings = resolve_color_settings(Some(&path), None, false);
        assert_eq!(settings.color_scheme, ColorScheme::Pastel);
        let _ = fs::remove_file(&path);
    }
}
