// Palette configuration
// Supports: built-in palettes and custom JSON palettes from the user palette directory

use crate::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Palette token backing the global scope when nothing has ever been set.
pub const DEFAULT_PALETTE_ID: &str = "light-default";

/// JSON-serializable palette definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Token used by preference values to refer to this palette
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_dark: bool,
    pub colors: PaletteColorsConfig,
}

/// JSON color definitions (hex strings)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteColorsConfig {
    // Base colors
    pub background: String,
    #[serde(default = "default_surface")]
    pub surface: String,
    pub ink: String,
    #[serde(default = "default_ink_muted")]
    pub ink_muted: String,

    // Canvas
    pub accent: String,
    #[serde(default = "default_node_fill")]
    pub node_fill: String,
    #[serde(default = "default_node_outline")]
    pub node_outline: String,
    #[serde(default = "default_connection")]
    pub connection: String,

    #[serde(default = "default_selection_alpha")]
    pub selection_alpha: f32,
}

fn default_surface() -> String { "#f1f5f9".into() }
fn default_ink_muted() -> String { "#64748b".into() }
fn default_node_fill() -> String { "#e2e8f0".into() }
fn default_node_outline() -> String { "#94a3b8".into() }
fn default_connection() -> String { "#94a3b8".into() }
fn default_selection_alpha() -> f32 { 0.2 }

/// Runtime palette colors for the story canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub surface: Color,
    pub ink: Color,
    pub ink_muted: Color,
    pub accent: Color,
    pub node_fill: Color,
    pub node_outline: Color,
    pub connection: Color,
    pub selection: Color,
}

impl Palette {
    /// Built-in light palette (the terminal fallback)
    pub fn light_default() -> Self {
        Palette {
            background: Color::from_rgb(0.973, 0.980, 0.988),   // #f8fafc
            surface: Color::from_rgb(0.945, 0.961, 0.976),      // #f1f5f9
            ink: Color::from_rgb(0.059, 0.090, 0.165),          // #0f172a
            ink_muted: Color::from_rgb(0.392, 0.439, 0.529),    // #64748b
            accent: Color::from_rgb(0.231, 0.510, 0.965),       // #3b82f6
            node_fill: Color::from_rgb(0.886, 0.910, 0.941),    // #e2e8f0
            node_outline: Color::from_rgb(0.580, 0.639, 0.722), // #94a3b8
            connection: Color::from_rgb(0.580, 0.639, 0.722),   // #94a3b8
            selection: Color::from_rgba(0.231, 0.510, 0.965, 0.15), // #3b82f6 @ 15%
        }
    }

    /// Built-in dark palette
    pub fn dark_forest() -> Self {
        Palette {
            background: Color::from_rgb(0.039, 0.098, 0.075),   // #0a1913
            surface: Color::from_rgb(0.071, 0.149, 0.118),      // #12261e
            ink: Color::from_rgb(0.902, 0.949, 0.925),          // #e6f2ec
            ink_muted: Color::from_rgb(0.455, 0.584, 0.522),    // #749585
            accent: Color::from_rgb(0.306, 0.769, 0.533),       // #4ec488
            node_fill: Color::from_rgb(0.106, 0.212, 0.169),    // #1b362b
            node_outline: Color::from_rgb(0.212, 0.369, 0.298), // #365e4c
            connection: Color::from_rgb(0.212, 0.369, 0.298),   // #365e4c
            selection: Color::from_rgba(0.306, 0.769, 0.533, 0.2), // #4ec488 @ 20%
        }
    }

    /// Built-in warm reading palette
    pub fn sepia() -> Self {
        Palette {
            background: Color::from_rgb(0.957, 0.914, 0.827),   // #f4e9d3
            surface: Color::from_rgb(0.925, 0.871, 0.765),      // #ecdec3
            ink: Color::from_rgb(0.243, 0.180, 0.114),          // #3e2e1d
            ink_muted: Color::from_rgb(0.533, 0.447, 0.337),    // #887256
            accent: Color::from_rgb(0.698, 0.380, 0.157),       // #b26128
            node_fill: Color::from_rgb(0.890, 0.827, 0.702),    // #e3d3b3
            node_outline: Color::from_rgb(0.702, 0.608, 0.471), // #b39b78
            connection: Color::from_rgb(0.702, 0.608, 0.471),   // #b39b78
            selection: Color::from_rgba(0.698, 0.380, 0.157, 0.2), // #b26128 @ 20%
        }
    }

    /// Parse hex color (#rrggbb)
    pub fn hex_to_color(hex: &str) -> Option<Color> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
        Some(Color::from_rgb(r, g, b))
    }

    /// Lighten a color by mixing with white
    fn lighten(color: Color, amount: f32) -> Color {
        Color::from_rgb(
            color.r + (1.0 - color.r) * amount,
            color.g + (1.0 - color.g) * amount,
            color.b + (1.0 - color.b) * amount,
        )
    }

    /// Darken a color by mixing with black
    fn darken(color: Color, amount: f32) -> Color {
        Color::from_rgb(
            color.r * (1.0 - amount),
            color.g * (1.0 - amount),
            color.b * (1.0 - amount),
        )
    }

    /// Create a Palette from a PaletteConfig (JSON palette)
    pub fn from_config(config: &PaletteColorsConfig, is_dark: bool) -> Self {
        let bg = Self::hex_to_color(&config.background).unwrap_or(
            if is_dark { Color::from_rgb(0.039, 0.098, 0.075) }
            else { Color::from_rgb(0.973, 0.980, 0.988) }
        );
        let ink = Self::hex_to_color(&config.ink).unwrap_or(
            if is_dark { Color::from_rgb(0.902, 0.949, 0.925) }
            else { Color::from_rgb(0.059, 0.090, 0.165) }
        );
        let accent = Self::hex_to_color(&config.accent).unwrap_or(
            Color::from_rgb(0.231, 0.510, 0.965)
        );
        let ink_muted = Self::hex_to_color(&config.ink_muted).unwrap_or(
            Color::from_rgb(0.392, 0.439, 0.529)
        );
        let surface = Self::hex_to_color(&config.surface).unwrap_or(
            if is_dark { Self::lighten(bg, 0.04) } else { Self::darken(bg, 0.02) }
        );
        let node_outline = Self::hex_to_color(&config.node_outline).unwrap_or(
            if is_dark { Self::lighten(bg, 0.18) } else { Self::darken(bg, 0.25) }
        );
        let node_fill = Self::hex_to_color(&config.node_fill).unwrap_or(
            if is_dark { Self::lighten(bg, 0.08) } else { Self::darken(bg, 0.06) }
        );
        let connection = Self::hex_to_color(&config.connection).unwrap_or(node_outline);

        Palette {
            background: bg,
            surface,
            ink,
            ink_muted,
            accent,
            node_fill,
            node_outline,
            connection,
            selection: Color::from_rgba(accent.r, accent.g, accent.b, config.selection_alpha),
        }
    }
}

/// Listing entry for built-in and custom palettes
#[derive(Debug, Clone, Serialize)]
pub struct PaletteInfo {
    pub id: String,
    pub name: String,
    pub builtin: bool,
}

/// Look up a palette by token: built-ins first, then the custom directory.
pub fn load_palette(id: &str) -> Option<Palette> {
    match id {
        "light-default" => return Some(Palette::light_default()),
        "dark-forest" => return Some(Palette::dark_forest()),
        "sepia" => return Some(Palette::sepia()),
        _ => {}
    }
    load_custom_palette(id)
}

/// Load a custom palette by id from the palette directory
fn load_custom_palette(id: &str) -> Option<Palette> {
    let dir = custom_palettes_dir()?;
    let path = dir.join(format!("{id}.json"));
    let content = fs::read_to_string(&path).ok()?;
    let config: PaletteConfig = serde_json::from_str(&content).ok()?;
    Some(Palette::from_config(&config.colors, config.is_dark))
}

/// List available palettes (built-in + custom)
pub fn list_palettes() -> Vec<PaletteInfo> {
    let mut palettes = vec![
        PaletteInfo { id: "light-default".into(), name: "Light".into(), builtin: true },
        PaletteInfo { id: "dark-forest".into(), name: "Dark Forest".into(), builtin: true },
        PaletteInfo { id: "sepia".into(), name: "Sepia".into(), builtin: true },
    ];

    if let Some(dir) = custom_palettes_dir() {
        if let Ok(entries) = fs::read_dir(&dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e == "json").unwrap_or(false) {
                    if let Ok(content) = fs::read_to_string(&path) {
                        if let Ok(config) = serde_json::from_str::<PaletteConfig>(&content) {
                            palettes.push(PaletteInfo {
                                id: config.id,
                                name: config.name,
                                builtin: false,
                            });
                        }
                    }
                }
            }
        }
    }

    palettes
}

/// Get the custom palettes directory path
pub fn custom_palettes_dir() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("lorecraft").join("palettes"))
}

/// Create example custom palette file
pub fn create_example_palette() -> Result<PathBuf, String> {
    let dir = custom_palettes_dir()
        .ok_or_else(|| "Could not determine config directory".to_string())?;

    fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create palettes directory: {e}"))?;

    let example = PaletteConfig {
        id: "midnight-ocean".into(),
        name: "Midnight Ocean".into(),
        is_dark: true,
        colors: PaletteColorsConfig {
            background: "#0b1622".into(),
            surface: "#122234".into(),
            ink: "#d6e4f0".into(),
            ink_muted: "#5c7590".into(),
            accent: "#4aa8ff".into(),
            node_fill: "#1a3049".into(),
            node_outline: "#2e4d6e".into(),
            connection: "#2e4d6e".into(),
            selection_alpha: 0.25,
        },
    };

    let example_path = dir.join(format!("{}.json", example.id));

    let json = serde_json::to_string_pretty(&example)
        .map_err(|e| format!("Failed to serialize palette: {e}"))?;

    fs::write(&example_path, json)
        .map_err(|e| format!("Failed to write palette file: {e}"))?;

    Ok(example_path)
}
