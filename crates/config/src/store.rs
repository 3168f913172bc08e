// Preference store and resolution
//
// One store instance per process, created explicitly at startup and threaded
// through by reference. Resolution walks folder > project > global and the
// global entry is always present, so reads never fail.

use std::collections::HashMap;

use crate::backend::{PersistedEntry, PreferenceBackend};
use crate::error::PrefsError;
use crate::palette::{load_palette, Palette};
use crate::scope::{ResolutionContext, ScopeLevel, GLOBAL_KEY};
use crate::sink::{NullPaletteSink, PaletteSink};
use crate::value::{PreferenceCategory, PreferenceValue};

/// Entries for one preference category across all scopes.
///
/// Folder and project scopes are open-ended keyed maps; the global scope is a
/// single always-present value (the terminal fallback).
#[derive(Debug, Clone, PartialEq)]
struct CategoryEntries {
    folder: HashMap<String, PreferenceValue>,
    project: HashMap<String, PreferenceValue>,
    global: PreferenceValue,
}

impl CategoryEntries {
    fn seeded(category: PreferenceCategory) -> Self {
        Self {
            folder: HashMap::new(),
            project: HashMap::new(),
            global: category.hard_default(),
        }
    }

    fn get(&self, level: ScopeLevel, key: &str) -> Option<&PreferenceValue> {
        match level {
            ScopeLevel::Folder => self.folder.get(key),
            ScopeLevel::Project => self.project.get(key),
            ScopeLevel::Global => Some(&self.global),
        }
    }
}

/// The preference store: in-memory entries plus a durable backend and the
/// presentation-layer sink.
///
/// Writes are optimistic: the in-memory entry (and palette application) land
/// before the durable write, so a persistence failure leaves the new value
/// visible to `resolve` and is reported to the caller as recoverable.
pub struct PreferenceStore {
    palette: CategoryEntries,
    node_style: CategoryEntries,
    backend: Box<dyn PreferenceBackend>,
    sink: Box<dyn PaletteSink>,
}

impl PreferenceStore {
    /// Open the store: load persisted entries and seed the global fallback
    /// for any category the backend has no global entry for.
    ///
    /// Seeding is in-memory only; the hard default is application-supplied
    /// and does not need to be written back. Persisted entries whose value
    /// does not match their recorded category are skipped.
    pub fn open(mut backend: Box<dyn PreferenceBackend>) -> Result<Self, PrefsError> {
        let persisted = backend.load_all().map_err(PrefsError::Persistence)?;

        let mut store = Self {
            palette: CategoryEntries::seeded(PreferenceCategory::Palette),
            node_style: CategoryEntries::seeded(PreferenceCategory::NodeStyle),
            backend,
            sink: Box::new(NullPaletteSink),
        };

        for entry in persisted {
            if entry.value.category() != entry.category {
                continue;
            }
            let entries = store.entries_mut(entry.category);
            match entry.level {
                ScopeLevel::Folder => {
                    entries.folder.insert(entry.key, entry.value);
                }
                ScopeLevel::Project => {
                    entries.project.insert(entry.key, entry.value);
                }
                ScopeLevel::Global => entries.global = entry.value,
            }
        }

        Ok(store)
    }

    /// Replace the palette sink (defaults to a null sink).
    pub fn with_sink(mut self, sink: Box<dyn PaletteSink>) -> Self {
        self.sink = sink;
        self
    }

    fn entries(&self, category: PreferenceCategory) -> &CategoryEntries {
        match category {
            PreferenceCategory::Palette => &self.palette,
            PreferenceCategory::NodeStyle => &self.node_style,
        }
    }

    fn entries_mut(&mut self, category: PreferenceCategory) -> &mut CategoryEntries {
        match category {
            PreferenceCategory::Palette => &mut self.palette,
            PreferenceCategory::NodeStyle => &mut self.node_style,
        }
    }

    /// Compute the effective value for a context: first hit walking
    /// folder > project > global wins. Pure lookup, no side effects, and it
    /// cannot fail: the global entry is always present.
    pub fn resolve(
        &self,
        ctx: &ResolutionContext,
        category: PreferenceCategory,
    ) -> &PreferenceValue {
        let entries = self.entries(category);
        for level in ScopeLevel::chain() {
            if let Some(key) = ctx.key_for(level) {
                if let Some(value) = entries.get(level, key) {
                    return value;
                }
            }
        }
        // The chain terminates at Global, which always yields a value.
        &entries.global
    }

    /// Set a value at one scope without touching any other scope.
    ///
    /// Order of effects: in-memory entry, palette application (palette
    /// category only), durable write. `Err(Persistence)` therefore means the
    /// value is live but not yet durable.
    pub fn set_at(
        &mut self,
        level: ScopeLevel,
        key: &str,
        category: PreferenceCategory,
        value: PreferenceValue,
    ) -> Result<(), PrefsError> {
        if value.category() != category {
            return Err(PrefsError::Configuration(format!(
                "value for category '{}' given for category '{category}'",
                value.category()
            )));
        }

        // The global scope keeps exactly one entry per category.
        let storage_key = match level {
            ScopeLevel::Global => GLOBAL_KEY.to_string(),
            _ => key.to_string(),
        };

        let entries = self.entries_mut(category);
        match level {
            ScopeLevel::Folder => {
                entries.folder.insert(storage_key.clone(), value.clone());
            }
            ScopeLevel::Project => {
                entries.project.insert(storage_key.clone(), value.clone());
            }
            ScopeLevel::Global => entries.global = value.clone(),
        }

        if let Some(id) = value.as_palette_id() {
            let palette = load_palette(id).unwrap_or_else(|| {
                eprintln!("Unknown palette '{id}', applying default");
                Palette::light_default()
            });
            self.sink.apply_palette(&palette);
        }

        self.backend
            .save(&PersistedEntry { level, key: storage_key, category, value })
            .map_err(PrefsError::Persistence)
    }

    /// Remove the entry at one scope, if present. Resolution in that scope
    /// then falls through to the next level. Idempotent; the global entry is
    /// the terminal fallback and cannot be unset.
    pub fn unset_at(
        &mut self,
        level: ScopeLevel,
        key: &str,
        category: PreferenceCategory,
    ) -> Result<(), PrefsError> {
        if level == ScopeLevel::Global {
            return Err(PrefsError::Configuration(format!(
                "the global {category} entry is the terminal fallback and cannot be unset"
            )));
        }

        let entries = self.entries_mut(category);
        match level {
            ScopeLevel::Folder => entries.folder.remove(key),
            ScopeLevel::Project => entries.project.remove(key),
            ScopeLevel::Global => unreachable!(),
        };

        self.backend
            .remove(level, key, category)
            .map_err(PrefsError::Persistence)
    }

    /// Snapshot of every entry, globals included, in a stable order
    /// (category, then scope chain, then key).
    pub fn snapshot(&self) -> Vec<PersistedEntry> {
        let mut out = Vec::new();
        for category in PreferenceCategory::all() {
            let entries = self.entries(category);
            for level in ScopeLevel::chain() {
                match level {
                    ScopeLevel::Folder | ScopeLevel::Project => {
                        let map = if level == ScopeLevel::Folder {
                            &entries.folder
                        } else {
                            &entries.project
                        };
                        let mut keys: Vec<&String> = map.keys().collect();
                        keys.sort();
                        for key in keys {
                            out.push(PersistedEntry {
                                level,
                                key: key.clone(),
                                category,
                                value: map[key].clone(),
                            });
                        }
                    }
                    ScopeLevel::Global => out.push(PersistedEntry {
                        level,
                        key: GLOBAL_KEY.to_string(),
                        category,
                        value: entries.global.clone(),
                    }),
                }
            }
        }
        out
    }
}
