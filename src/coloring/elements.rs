use serde::Serialize;

use crate::coloring::palette::Color;
use crate::types::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Target,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

/// Render descriptor for one token of a colored sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColoredElement {
    pub index: usize,
    pub side: Side,
    pub text: String,
    pub class_name: String,
    pub color: Option<Color>,
    pub bold: bool,
    /// Inline CSS; empty for uncolored tokens.
    pub style: String,
}

/// Pair each token with its color. `colors` is indexed by token position, so a
/// token without an entry is left uncolored.
pub fn colored_elements(
    tokens: &[Token],
    colors: &[Option<Color>],
    side: Side,
    bold: bool,
) -> Vec<ColoredElement> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| {
            let color = colors.get(index).copied().flatten();
            let mut style = String::new();
            if let Some(color) = color {
                style.push_str(&format!("color: {color};"));
                if bold {
                    style.push_str(" font-weight: bold;");
                }
            }
            ColoredElement {
                index,
                side,
                text: token.text.clone(),
                class_name: format!("aligned-word {}-word-{index}", side.as_str()),
                color,
                bold,
                style,
            }
        })
        .collect()
}
