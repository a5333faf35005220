use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::alignment::tokenization::is_punctuation;
use crate::coloring::palette::{
    Color, ColorScheme, ACCESSIBLE_UNALIGNED_COLOR, UNALIGNED_COLOR,
};
use crate::error::AlignmentError;
use crate::settings::SettingsStore;
use crate::types::{AlignmentResult, OrderedLinks, Phrase, Token};

const COLOR_SCHEME_KEY: &str = "colorScheme";
const ACCESSIBILITY_MODE_KEY: &str = "accessibilityMode";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorSettings {
    #[serde(default)]
    pub color_scheme: ColorScheme,
    /// Forces the high-contrast palette and bold text.
    #[serde(default)]
    pub accessibility_mode: bool,
}

impl Default for ColorSettings {
    fn default() -> Self {
        Self {
            color_scheme: ColorScheme::Vibrant,
            accessibility_mode: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhraseGroup {
    pub id: String,
    pub color: Color,
    pub source_indices: Vec<usize>,
    pub target_indices: Vec<usize>,
    pub source_text: String,
    pub target_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorAssignment {
    /// Parallel to the source tokens.
    pub source_colors: Vec<Option<Color>>,
    /// Parallel to the target tokens.
    pub target_colors: Vec<Option<Color>>,
    pub phrase_groups: Vec<PhraseGroup>,
    /// The configured scheme, even when accessibility mode overrides the palette.
    pub scheme: ColorScheme,
    pub palette: Vec<Color>,
}

pub struct ColorCoordinator {
    settings: ColorSettings,
    store: Option<Box<dyn SettingsStore>>,
}

impl ColorCoordinator {
    pub fn new(settings: ColorSettings) -> Self {
        Self {
            settings,
            store: None,
        }
    }

    /// Like [`ColorCoordinator::new`], then overrides `settings` with any
    /// preferences found in `store`. Store failures keep the given settings.
    pub fn with_store(settings: ColorSettings, store: Box<dyn SettingsStore>) -> Self {
        let mut coordinator = Self {
            settings,
            store: Some(store),
        };
        coordinator.load_preferences();
        coordinator
    }

    fn load_preferences(&mut self) {
        let Some(store) = self.store.as_deref() else {
            return;
        };

        match store.get(COLOR_SCHEME_KEY) {
            Ok(Some(Value::String(name))) => match name.parse::<ColorScheme>() {
                Ok(scheme) => self.settings.color_scheme = scheme,
                Err(err) => tracing::warn!(error = %err, "ignoring stored color scheme"),
            },
            Ok(Some(other)) => {
                tracing::warn!(value = %other, "ignoring non-string stored color scheme")
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "could not load color preferences"),
        }

        match store.get(ACCESSIBILITY_MODE_KEY) {
            Ok(Some(Value::Bool(enabled))) => self.settings.accessibility_mode = enabled,
            Ok(Some(other)) => {
                tracing::warn!(value = %other, "ignoring non-boolean stored accessibility mode")
            }
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "could not load accessibility preference"),
        }
    }

    fn save_preference(&self, key: &str, value: Value) {
        if let Some(store) = self.store.as_deref() {
            if let Err(err) = store.set(key, value) {
                tracing::warn!(key, error = %err, "could not save color preference");
            }
        }
    }

    pub fn settings(&self) -> &ColorSettings {
        &self.settings
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.settings.color_scheme
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.settings.color_scheme = scheme;
        tracing::info!(scheme = scheme.as_str(), "color scheme changed");
        self.save_preference(COLOR_SCHEME_KEY, Value::String(scheme.as_str().to_string()));
    }

    /// Name-based variant of [`ColorCoordinator::set_color_scheme`]; unknown names
    /// leave the current scheme untouched.
    pub fn set_color_scheme_by_name(&mut self, name: &str) -> Result<(), AlignmentError> {
        let scheme = name.parse::<ColorScheme>()?;
        self.set_color_scheme(scheme);
        Ok(())
    }

    pub fn accessibility_mode(&self) -> bool {
        self.settings.accessibility_mode
    }

    pub fn set_accessibility_mode(&mut self, enabled: bool) {
        self.settings.accessibility_mode = enabled;
        tracing::info!(enabled, "accessibility mode changed");
        self.save_preference(ACCESSIBILITY_MODE_KEY, Value::Bool(enabled));
    }

    pub fn toggle_accessibility_mode(&mut self) -> bool {
        let enabled = !self.settings.accessibility_mode;
        self.set_accessibility_mode(enabled);
        enabled
    }

    pub fn available_schemes(&self) -> &'static [ColorScheme] {
        &ColorScheme::ALL
    }

    pub fn current_palette(&self) -> &'static [Color] {
        if self.settings.accessibility_mode {
            ColorScheme::HighContrast.palette()
        } else {
            self.settings.color_scheme.palette()
        }
    }

    pub fn unaligned_color(&self) -> Color {
        if self.settings.accessibility_mode {
            ACCESSIBLE_UNALIGNED_COLOR
        } else {
            UNALIGNED_COLOR
        }
    }

    /// Color every alignment group and fill the remaining words.
    ///
    /// Phrases are colored first and keep their color; word groups follow in
    /// word-alignment order. Both passes share one running palette index, so the
    /// eleventh group reuses the first color.
    pub fn assign_colors(
        &self,
        alignment: &AlignmentResult,
        source_tokens: &[Token],
        target_tokens: &[Token],
    ) -> ColorAssignment {
        let palette = self.current_palette();
        let mut assignment = ColorAssignment {
            source_colors: vec![None; source_tokens.len()],
            target_colors: vec![None; target_tokens.len()],
            phrase_groups: Vec::with_capacity(alignment.phrase_alignment.len()),
            scheme: self.settings.color_scheme,
            palette: palette.to_vec(),
        };

        assign_phrase_colors(&alignment.phrase_alignment, &mut assignment, palette);
        assign_word_colors(alignment, &mut assignment, palette);
        fill_unaligned(&mut assignment, source_tokens, target_tokens, self.unaligned_color());

        tracing::debug!(
            scheme = assignment.scheme.as_str(),
            phrase_groups = assignment.phrase_groups.len(),
            "coloring: assignment complete"
        );
        assignment
    }
}

fn set_color(colors: &mut [Option<Color>], index: usize, color: Color) {
    if let Some(slot) = colors.get_mut(index) {
        *slot = Some(color);
    }
}

fn assign_phrase_colors(phrases: &[Phrase], assignment: &mut ColorAssignment, palette: &[Color]) {
    for (color_index, phrase) in phrases.iter().enumerate() {
        let color = palette[color_index % palette.len()];
        for &s in &phrase.source_indices {
            set_color(&mut assignment.source_colors, s, color);
        }
        for &t in &phrase.target_indices {
            set_color(&mut assignment.target_colors, t, color);
        }
        assignment.phrase_groups.push(PhraseGroup {
            id: format!("phrase-{color_index}"),
            color,
            source_indices: phrase.source_indices.clone(),
            target_indices: phrase.target_indices.clone(),
            source_text: phrase.source_text.clone(),
            target_text: phrase.target_text.clone(),
        });
    }
}

fn assign_word_colors(
    alignment: &AlignmentResult,
    assignment: &mut ColorAssignment,
    palette: &[Color],
) {
    let used_sources: Vec<bool> = assignment.source_colors.iter().map(Option::is_some).collect();
    let mut used_targets: Vec<bool> = assignment.target_colors.iter().map(Option::is_some).collect();

    let mut groups = OrderedLinks::new();
    for word in &alignment.word_alignment {
        groups.push(word.source_index, word.target_index);
    }

    let mut color_index = assignment.phrase_groups.len();
    for (source_idx, targets) in groups.iter() {
        if used_sources.get(source_idx).copied().unwrap_or(false) {
            continue;
        }
        let color = palette[color_index % palette.len()];
        set_color(&mut assignment.source_colors, source_idx, color);

        for &t in targets {
            if let Some(used) = used_targets.get_mut(t) {
                if !*used {
                    assignment.target_colors[t] = Some(color);
                    *used = true;
                }
            }
        }
        color_index += 1;
    }
}

fn fill_unaligned(
    assignment: &mut ColorAssignment,
    source_tokens: &[Token],
    target_tokens: &[Token],
    unaligned: Color,
) {
    let sides = [
        (&mut assignment.source_colors, source_tokens),
        (&mut assignment.target_colors, target_tokens),
    ];
    for (colors, tokens) in sides {
        for (slot, token) in colors.iter_mut().zip(tokens) {
            if slot.is_none() && !is_punctuation(&token.text) {
                *slot = Some(unaligned);
            }
        }
    }
}
