//! User profile repository — the `user_infos` table.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::errors::Result;
use crate::models::UserInfo;
use crate::repositories::placeholders;

const COLUMNS: &str = "id, user_id, vip, history_recommend";

fn map_info(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserInfo> {
    Ok(UserInfo {
        id: row.get(0)?,
        user_id: row.get(1)?,
        vip: row.get(2)?,
        history_recommend: row.get(3)?,
    })
}

/// User profile repository.
pub struct UserInfoRepo;

impl UserInfoRepo {
    /// Create the profile row for a new user.
    pub fn create(conn: &Connection, user_id: i64) -> Result<UserInfo> {
        let _ = conn.execute(
            "INSERT INTO user_infos (user_id, vip, history_recommend) VALUES (?1, 0, 0)",
            params![user_id],
        )?;
        Ok(UserInfo {
            id: conn.last_insert_rowid(),
            user_id,
            vip: 0,
            history_recommend: 0,
        })
    }

    /// Get the profile for a user.
    pub fn get_by_user(conn: &Connection, user_id: i64) -> Result<Option<UserInfo>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM user_infos WHERE user_id = ?1"),
                params![user_id],
                map_info,
            )
            .optional()?;
        Ok(row)
    }

    /// Get profiles for a set of users, keyed by user id.
    pub fn get_by_users(conn: &Connection, user_ids: &[i64]) -> Result<HashMap<i64, UserInfo>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM user_infos WHERE user_id IN ({})",
            placeholders(user_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(user_ids.iter()), map_info)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().map(|i| (i.user_id, i)).collect())
    }

    /// Bump a user's lifetime direct-recommend counter.
    pub fn increment_history_recommend(conn: &Connection, user_id: i64) -> Result<()> {
        let _ = conn.execute(
            "UPDATE user_infos SET history_recommend = history_recommend + 1 WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(())
    }
}
