// Durable storage seam
// Backends live in lorecraft-io; the trait lives here so the store does not
// depend on any concrete storage.

use serde::{Deserialize, Serialize};

use crate::scope::ScopeLevel;
use crate::value::{PreferenceCategory, PreferenceValue};

/// One persisted preference entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedEntry {
    pub level: ScopeLevel,
    pub key: String,
    pub category: PreferenceCategory,
    pub value: PreferenceValue,
}

/// Durable key-value persistence for preference entries.
///
/// Any store satisfying this contract works: the shipped backends are a JSON
/// document, a SQLite database, and an in-memory map. Errors are plain
/// strings at this seam; the preference store wraps them into
/// `PrefsError::Persistence`.
pub trait PreferenceBackend {
    /// Load every persisted entry. A backend with no persisted state yet
    /// returns an empty list, not an error.
    fn load_all(&mut self) -> Result<Vec<PersistedEntry>, String>;

    /// Write or overwrite one entry.
    fn save(&mut self, entry: &PersistedEntry) -> Result<(), String>;

    /// Remove one entry. Removing an absent entry is not an error.
    fn remove(
        &mut self,
        level: ScopeLevel,
        key: &str,
        category: PreferenceCategory,
    ) -> Result<(), String>;
}
