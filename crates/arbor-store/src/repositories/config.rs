//! Config repository — key/value tunables in the `configs` table.

use rusqlite::{Connection, params, params_from_iter};

use crate::errors::Result;
use crate::models::ConfigEntry;
use crate::repositories::placeholders;

const COLUMNS: &str = "id, key_name, name, value";

fn map_config(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConfigEntry> {
    Ok(ConfigEntry {
        id: row.get(0)?,
        key_name: row.get(1)?,
        name: row.get(2)?,
        value: row.get(3)?,
    })
}

/// Config repository.
pub struct ConfigRepo;

impl ConfigRepo {
    /// Entries for a set of keys (missing keys are silently absent).
    pub fn get_by_keys(conn: &Connection, keys: &[&str]) -> Result<Vec<ConfigEntry>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM configs WHERE key_name IN ({})",
            placeholders(keys.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(keys.iter()), map_config)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// All entries.
    pub fn get_all(conn: &Connection) -> Result<Vec<ConfigEntry>> {
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM configs ORDER BY id"))?;
        let rows = stmt
            .query_map([], map_config)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Update an entry's value by row id. Returns whether a row changed.
    pub fn update_value(conn: &Connection, id: i64, value: &str) -> Result<bool> {
        let updated = conn.execute(
            "UPDATE configs SET value = ?2 WHERE id = ?1",
            params![id, value],
        )?;
        Ok(updated > 0)
    }
}
