// SQLite backend
// One row per (level, key, category); values are stored as JSON text

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection};

use lorecraft_config::{PersistedEntry, PreferenceBackend, PreferenceCategory, ScopeLevel};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS preferences (
    level TEXT NOT NULL,       -- 'folder' | 'project' | 'global'
    key TEXT NOT NULL,
    category TEXT NOT NULL,    -- 'palette' | 'node-style'
    value TEXT NOT NULL,       -- JSON-encoded PreferenceValue
    updated_at TEXT NOT NULL,  -- RFC 3339
    PRIMARY KEY (level, key, category)
);
"#;

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and ensure the schema exists.
    pub fn open(path: &Path) -> Result<Self, String> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
            }
        }
        let conn = Connection::open(path).map_err(|e| e.to_string())?;
        conn.execute_batch(SCHEMA).map_err(|e| e.to_string())?;
        Ok(Self { conn })
    }

    /// In-memory database, for tests.
    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory().map_err(|e| e.to_string())?;
        conn.execute_batch(SCHEMA).map_err(|e| e.to_string())?;
        Ok(Self { conn })
    }
}

impl PreferenceBackend for SqliteBackend {
    fn load_all(&mut self) -> Result<Vec<PersistedEntry>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT level, key, category, value FROM preferences ORDER BY category, level, key")
            .map_err(|e| e.to_string())?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })
            .map_err(|e| e.to_string())?;

        let mut entries = Vec::new();
        for row in rows {
            let (level, key, category, value) = row.map_err(|e| e.to_string())?;
            let level: ScopeLevel = level
                .parse()
                .map_err(|e| format!("preferences row '{key}': {e}"))?;
            let category: PreferenceCategory = category
                .parse()
                .map_err(|e| format!("preferences row '{key}': {e}"))?;
            let value = serde_json::from_str(&value)
                .map_err(|e| format!("preferences row '{key}': bad value: {e}"))?;
            entries.push(PersistedEntry { level, key, category, value });
        }
        Ok(entries)
    }

    fn save(&mut self, entry: &PersistedEntry) -> Result<(), String> {
        let value = serde_json::to_string(&entry.value).map_err(|e| e.to_string())?;
        self.conn
            .execute(
                "INSERT OR REPLACE INTO preferences (level, key, category, value, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.level.to_string(),
                    entry.key,
                    entry.category.to_string(),
                    value,
                    Utc::now().to_rfc3339(),
                ],
            )
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    fn remove(
        &mut self,
        level: ScopeLevel,
        key: &str,
        category: PreferenceCategory,
    ) -> Result<(), String> {
        self.conn
            .execute(
                "DELETE FROM preferences WHERE level = ?1 AND key = ?2 AND category = ?3",
                params![level.to_string(), key, category.to_string()],
            )
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}
