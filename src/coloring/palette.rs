use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlignmentError;

/// Hex display color, e.g. `#FF6B6B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(&'static str);

impl Color {
    pub const fn new(hex: &'static str) -> Self {
        Self(hex)
    }

    pub fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

pub const PALETTE_LEN: usize = 10;

pub const UNALIGNED_COLOR: Color = Color::new("#CCCCCC");
pub const ACCESSIBLE_UNALIGNED_COLOR: Color = Color::new("#808080");

const VIBRANT: [Color; PALETTE_LEN] = [
    Color::new("#FF6B6B"),
    Color::new("#4ECDC4"),
    Color::new("#45B7D1"),
    Color::new("#96CEB4"),
    Color::new("#FFEAA7"),
    Color::new("#DDA0DD"),
    Color::new("#98D8C8"),
    Color::new("#FFD93D"),
    Color::new("#6C63FF"),
    Color::new("#FF9FF3"),
];

const PASTEL: [Color; PALETTE_LEN] = [
    Color::new("#FFB5B5"),
    Color::new("#B5E7E7"),
    Color::new("#B5D9E6"),
    Color::new("#C8E6C8"),
    Color::new("#FFF5CC"),
    Color::new("#E6CCE6"),
    Color::new("#D4F1E6"),
    Color::new("#FFE6B3"),
    Color::new("#C8BFFF"),
    Color::new("#FFD4E6"),
];

const HIGH_CONTRAST: [Color; PALETTE_LEN] = [
    Color::new("#FF0000"),
    Color::new("#00FF00"),
    Color::new("#0000FF"),
    Color::new("#FFFF00"),
    Color::new("#FF00FF"),
    Color::new("#00FFFF"),
    Color::new("#FF8800"),
    Color::new("#8800FF"),
    Color::new("#00FF88"),
    Color::new("#FF0088"),
];

const MONOCHROME: [Color; PALETTE_LEN] = [
    Color::new("#2C3E50"),
    Color::new("#34495E"),
    Color::new("#546E7A"),
    Color::new("#607D8B"),
    Color::new("#78909C"),
    Color::new("#90A4AE"),
    Color::new("#B0BEC5"),
    Color::new("#CFD8DC"),
    Color::new("#ECEFF1"),
    Color::new("#B3E5FC"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorScheme {
    #[default]
    Vibrant,
    Pastel,
    HighContrast,
    Monochrome,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 4] = [
        ColorScheme::Vibrant,
        ColorScheme::Pastel,
        ColorScheme::HighContrast,
        ColorScheme::Monochrome,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Vibrant => "vibrant",
            Self::Pastel => "pastel",
            Self::HighContrast => "highContrast",
            Self::Monochrome => "monochrome",
        }
    }

    pub fn palette(self) -> &'static [Color; PALETTE_LEN] {
        match self {
            Self::Vibrant => &VIBRANT,
            Self::Pastel => &PASTEL,
            Self::HighContrast => &HIGH_CONTRAST,
            Self::Monochrome => &MONOCHROME,
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = AlignmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == s)
            .ok_or_else(|| AlignmentError::invalid_input("color scheme", format!("unknown name '{s}'")))
    }
}
