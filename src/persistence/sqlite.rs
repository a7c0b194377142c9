use super::{
    PersistenceError, PersistenceResult, PresetStore, normalize_preset_name, validate_preset,
};
use crate::Planner;
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqlitePresetStore {
    connection: Mutex<Connection>,
}

impl SqlitePresetStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS presets (
                name TEXT PRIMARY KEY,
                preset_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection mutex poisoned".into()))
    }
}

impl PresetStore for SqlitePresetStore {
    fn save_preset(&self, name: &str, planner: &Planner) -> PersistenceResult<()> {
        let name = normalize_preset_name(name)?;
        validate_preset(planner)?;
        let json = serde_json::to_string(planner)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO presets (name, preset_json) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET preset_json = excluded.preset_json",
            params![name, json],
        )?;
        Ok(())
    }

    fn load_preset(&self, name: &str) -> PersistenceResult<Option<Planner>> {
        let name = normalize_preset_name(name)?;
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT preset_json FROM presets WHERE name = ?1")?;
        let json: Option<String> = stmt
            .query_row(params![name], |row| row.get(0))
            .optional()?;

        let Some(json) = json else {
            return Ok(None);
        };
        let planner: Planner = serde_json::from_str(&json)?;
        validate_preset(&planner)?;
        Ok(Some(planner))
    }

    fn list_presets(&self) -> PersistenceResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM presets ORDER BY name ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut names = Vec::new();
        for name in rows {
            names.push(name?);
        }
        Ok(names)
    }

    fn delete_preset(&self, name: &str) -> PersistenceResult<bool> {
        let name = normalize_preset_name(name)?;
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM presets WHERE name = ?1", params![name])?;
        Ok(removed > 0)
    }
}
