//! Area repository — per-user aggregated subtree totals and tier level.

use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::errors::Result;
use crate::models::UserArea;
use crate::repositories::placeholders;

const COLUMNS: &str = "id, user_id, amount, self_amount, level";

fn map_area(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserArea> {
    Ok(UserArea {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        self_amount: row.get(3)?,
        level: row.get(4)?,
    })
}

/// Area repository.
pub struct AreaRepo;

impl AreaRepo {
    /// Create the area row for a new user.
    pub fn create(conn: &Connection, user_id: i64) -> Result<UserArea> {
        let _ = conn.execute(
            "INSERT INTO user_areas (user_id, amount, self_amount, level)
             VALUES (?1, 0, 0, 0)",
            params![user_id],
        )?;
        Ok(UserArea {
            id: conn.last_insert_rowid(),
            user_id,
            amount: 0,
            self_amount: 0,
            level: 0,
        })
    }

    /// Get the area row for a user.
    pub fn get_by_user(conn: &Connection, user_id: i64) -> Result<Option<UserArea>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM user_areas WHERE user_id = ?1"),
                params![user_id],
                map_area,
            )
            .optional()?;
        Ok(row)
    }

    /// Area rows for a set of users.
    pub fn get_by_users(conn: &Connection, user_ids: &[i64]) -> Result<Vec<UserArea>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM user_areas WHERE user_id IN ({})",
            placeholders(user_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(user_ids.iter()), map_area)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Set subtree totals directly (fixtures and payout jobs).
    pub fn set_amounts(
        conn: &Connection,
        user_id: i64,
        amount: i64,
        self_amount: i64,
    ) -> Result<()> {
        let _ = conn.execute(
            "UPDATE user_areas SET amount = ?2, self_amount = ?3 WHERE user_id = ?1",
            params![user_id, amount, self_amount],
        )?;
        Ok(())
    }

    /// Set the manually assigned tier level.
    pub fn set_level(conn: &Connection, user_id: i64, level: i64) -> Result<()> {
        let _ = conn.execute(
            "UPDATE user_areas SET level = ?2 WHERE user_id = ?1",
            params![user_id, level],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::setup_conn;
    use crate::repositories::user::UserRepo;

    #[test]
    fn create_get_and_update() {
        let conn = setup_conn();
        let user = UserRepo::create(&conn, "0xarea000000000000000000").unwrap();
        let _ = AreaRepo::create(&conn, user.id).unwrap();

        AreaRepo::set_amounts(&conn, user.id, 500, 100).unwrap();
        AreaRepo::set_level(&conn, user.id, 2).unwrap();

        let area = AreaRepo::get_by_user(&conn, user.id).unwrap().unwrap();
        assert_eq!(area.amount, 500);
        assert_eq!(area.self_amount, 100);
        assert_eq!(area.level, 2);
    }

    #[test]
    fn get_by_users_empty_ids() {
        let conn = setup_conn();
        assert!(AreaRepo::get_by_users(&conn, &[]).unwrap().is_empty());
    }
}
