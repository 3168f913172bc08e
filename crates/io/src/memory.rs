// In-memory backend for tests and ephemeral runs

use lorecraft_config::{PersistedEntry, PreferenceBackend, PreferenceCategory, ScopeLevel};

/// Backend that never touches disk. Entries live for the backend's lifetime.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Vec<PersistedEntry>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated backend, for seeding test fixtures.
    pub fn with_entries(entries: Vec<PersistedEntry>) -> Self {
        Self { entries }
    }
}

impl PreferenceBackend for MemoryBackend {
    fn load_all(&mut self) -> Result<Vec<PersistedEntry>, String> {
        Ok(self.entries.clone())
    }

    fn save(&mut self, entry: &PersistedEntry) -> Result<(), String> {
        self.remove(entry.level, &entry.key, entry.category)?;
        self.entries.push(entry.clone());
        Ok(())
    }

    fn remove(
        &mut self,
        level: ScopeLevel,
        key: &str,
        category: PreferenceCategory,
    ) -> Result<(), String> {
        self.entries
            .retain(|e| !(e.level == level && e.key == key && e.category == category));
        Ok(())
    }
}
