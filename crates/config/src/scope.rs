// Scope model for preference resolution
// Precedence is fixed: folder > project > global

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Key under which the single global entry per category is stored.
///
/// The global scope has exactly one entry per category, so it does not need
/// caller-supplied keys the way folder/project scopes do.
pub const GLOBAL_KEY: &str = "global";

/// A level of specificity at which a preference may be independently set.
///
/// Ordering is part of the contract: resolution walks levels from most
/// specific (`Folder`) to least specific (`Global`) and never reorders them
/// at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeLevel {
    /// A folder inside a story (canvas folder, character group, ...)
    Folder,
    /// A story (the project-level container)
    Project,
    /// The application-wide terminal fallback
    Global,
}

impl ScopeLevel {
    /// The fixed precedence chain, most specific first.
    pub fn chain() -> [ScopeLevel; 3] {
        [ScopeLevel::Folder, ScopeLevel::Project, ScopeLevel::Global]
    }
}

impl fmt::Display for ScopeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeLevel::Folder => write!(f, "folder"),
            ScopeLevel::Project => write!(f, "project"),
            ScopeLevel::Global => write!(f, "global"),
        }
    }
}

impl FromStr for ScopeLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "folder" => Ok(ScopeLevel::Folder),
            "project" => Ok(ScopeLevel::Project),
            "global" => Ok(ScopeLevel::Global),
            other => Err(format!("unknown scope level: '{other}'")),
        }
    }
}

/// The keys a lookup runs against: current folder and current story, either
/// of which may be absent (a canvas outside any folder, a fresh workspace
/// with no story open).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl ResolutionContext {
    /// Context with no specific scopes: resolution lands on the global entry.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// The key this context supplies for a given level, if any.
    /// The global level always has its constant key.
    pub fn key_for(&self, level: ScopeLevel) -> Option<&str> {
        match level {
            ScopeLevel::Folder => self.folder.as_deref(),
            ScopeLevel::Project => self.project.as_deref(),
            ScopeLevel::Global => Some(GLOBAL_KEY),
        }
    }
}
