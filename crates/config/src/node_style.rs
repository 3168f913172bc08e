// Node style preferences for story canvases

use serde::{Deserialize, Serialize};

/// Outline shape used when drawing canvas nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    /// Rounded rectangle (default)
    #[default]
    Rounded,
    /// Sharp-cornered rectangle
    Rectangle,
    /// Ellipse
    Ellipse,
    /// Diamond (decision/branch nodes)
    Diamond,
}

/// How connection strokes between nodes are routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConnectorStyle {
    /// Bezier curves (default)
    #[default]
    Curved,
    /// Straight lines
    Straight,
    /// Right-angle segments
    Orthogonal,
}

/// When node labels are shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LabelVisibility {
    /// Labels always visible (default)
    #[default]
    Always,
    /// Labels appear on hover only
    OnHover,
    /// Labels hidden
    Hidden,
}

/// A node style preference: the record of style fields a folder, story, or
/// the global scope can override as a unit.
///
/// Equality is structural; `Default` is the hard application default that
/// backs the global scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NodeStyle {
    pub shape: NodeShape,
    pub connector: ConnectorStyle,
    pub labels: LabelVisibility,
    /// Render character thumbnails inside nodes when available
    pub show_thumbnails: bool,
}

impl NodeStyle {
    /// Parse a node style from JSON, accepting partial documents
    /// (missing fields take their defaults).
    pub fn from_json(json: &str) -> Result<Self, String> {
        serde_json::from_str(json).map_err(|e| format!("invalid node style: {e}"))
    }
}
