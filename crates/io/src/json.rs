// JSON document backend
// Default store: ~/.config/lorecraft/preferences.json

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lorecraft_config::{PersistedEntry, PreferenceBackend, PreferenceCategory, ScopeLevel};

/// On-disk document shape
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
struct PreferencesDoc {
    version: u32,
    entries: Vec<PersistedEntry>,
}

const DOC_VERSION: u32 = 1;

/// Backend storing all entries in a single pretty-printed JSON document.
///
/// Writes are atomic (write-to-temp-then-rename) so a crash mid-write cannot
/// corrupt the store. A missing document reads as empty; an unreadable or
/// unparseable one is a persistence error, not a silent reset.
pub struct JsonFileBackend {
    path: PathBuf,
    entries: Vec<PersistedEntry>,
    loaded: bool,
}

impl JsonFileBackend {
    /// Backend at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), entries: Vec::new(), loaded: false }
    }

    /// The default preferences document path.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("lorecraft").join("preferences.json"))
    }

    /// Backend at the default path.
    pub fn open_default() -> Result<Self, String> {
        let path = Self::default_path()
            .ok_or_else(|| "could not determine config directory".to_string())?;
        Ok(Self::at(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_loaded(&mut self) -> Result<(), String> {
        if self.loaded {
            return Ok(());
        }
        if self.path.exists() {
            let contents = fs::read_to_string(&self.path)
                .map_err(|e| format!("read {}: {e}", self.path.display()))?;
            let doc: PreferencesDoc = serde_json::from_str(&contents)
                .map_err(|e| format!("parse {}: {e}", self.path.display()))?;
            self.entries = doc.entries;
        }
        self.loaded = true;
        Ok(())
    }

    /// Atomic write: temp file in the same directory, then rename.
    fn write_doc(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let doc = PreferencesDoc { version: DOC_VERSION, entries: self.entries.clone() };
        let json = serde_json::to_string_pretty(&doc).map_err(|e| e.to_string())?;

        let temp = self.path.with_extension("json.tmp");
        fs::write(&temp, json).map_err(|e| format!("write {}: {e}", temp.display()))?;
        fs::rename(&temp, &self.path)
            .map_err(|e| format!("rename into {}: {e}", self.path.display()))
    }
}

impl PreferenceBackend for JsonFileBackend {
    fn load_all(&mut self) -> Result<Vec<PersistedEntry>, String> {
        self.ensure_loaded()?;
        Ok(self.entries.clone())
    }

    fn save(&mut self, entry: &PersistedEntry) -> Result<(), String> {
        self.ensure_loaded()?;
        self.entries.retain(|e| {
            !(e.level == entry.level && e.key == entry.key && e.category == entry.category)
        });
        self.entries.push(entry.clone());
        self.write_doc()
    }

    fn remove(
        &mut self,
        level: ScopeLevel,
        key: &str,
        category: PreferenceCategory,
    ) -> Result<(), String> {
        self.ensure_loaded()?;
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.level == level && e.key == key && e.category == category));
        if self.entries.len() == before {
            // Nothing removed; skip the disk write
            return Ok(());
        }
        self.write_doc()
    }
}
