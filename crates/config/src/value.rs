// Preference categories and the values stored for them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::node_style::NodeStyle;
use crate::palette::DEFAULT_PALETTE_ID;

/// A preference family resolved independently of the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreferenceCategory {
    /// Color palette for the story canvas
    Palette,
    /// Node drawing style
    NodeStyle,
}

impl PreferenceCategory {
    pub fn all() -> [PreferenceCategory; 2] {
        [PreferenceCategory::Palette, PreferenceCategory::NodeStyle]
    }

    /// The application-supplied value backing the global scope for this
    /// category. The global entry is seeded from this and never goes missing.
    pub fn hard_default(&self) -> PreferenceValue {
        match self {
            PreferenceCategory::Palette => {
                PreferenceValue::Palette(DEFAULT_PALETTE_ID.to_string())
            }
            PreferenceCategory::NodeStyle => PreferenceValue::NodeStyle(NodeStyle::default()),
        }
    }
}

impl fmt::Display for PreferenceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceCategory::Palette => write!(f, "palette"),
            PreferenceCategory::NodeStyle => write!(f, "node-style"),
        }
    }
}

impl FromStr for PreferenceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "palette" => Ok(PreferenceCategory::Palette),
            "node-style" => Ok(PreferenceCategory::NodeStyle),
            other => Err(format!("unknown preference category: '{other}'")),
        }
    }
}

/// A stored preference value. Equality is structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum PreferenceValue {
    /// A palette token, e.g. "dark-forest"
    Palette(String),
    /// A node style record
    NodeStyle(NodeStyle),
}

impl PreferenceValue {
    /// The category this value belongs to. A value is only ever stored under
    /// its own category.
    pub fn category(&self) -> PreferenceCategory {
        match self {
            PreferenceValue::Palette(_) => PreferenceCategory::Palette,
            PreferenceValue::NodeStyle(_) => PreferenceCategory::NodeStyle,
        }
    }

    /// The palette token, if this is a palette value.
    pub fn as_palette_id(&self) -> Option<&str> {
        match self {
            PreferenceValue::Palette(id) => Some(id),
            PreferenceValue::NodeStyle(_) => None,
        }
    }
}

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceValue::Palette(id) => write!(f, "{id}"),
            PreferenceValue::NodeStyle(style) => {
                // Compact JSON is the canonical text form for style records
                match serde_json::to_string(style) {
                    Ok(json) => write!(f, "{json}"),
                    Err(_) => write!(f, "<node style>"),
                }
            }
        }
    }
}
