//! User repository — CRUD for the `users` table.

use std::collections::HashMap;

use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::errors::Result;
use crate::models::{Pagination, User};
use crate::repositories::placeholders;
use crate::time::now_iso;

const COLUMNS: &str = "id, address, undo, created_at";

fn map_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        address: row.get(1)?,
        undo: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// User repository. Stateless; every method takes `&Connection`.
pub struct UserRepo;

impl UserRepo {
    /// Create a user for an address.
    pub fn create(conn: &Connection, address: &str) -> Result<User> {
        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO users (address, undo, created_at) VALUES (?1, 0, ?2)",
            params![address, now],
        )?;
        Ok(User {
            id: conn.last_insert_rowid(),
            address: address.to_string(),
            undo: 0,
            created_at: now,
        })
    }

    /// Get a user by id.
    pub fn get_by_id(conn: &Connection, user_id: i64) -> Result<Option<User>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
                params![user_id],
                map_user,
            )
            .optional()?;
        Ok(row)
    }

    /// Get a user by address.
    pub fn get_by_address(conn: &Connection, address: &str) -> Result<Option<User>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM users WHERE address = ?1"),
                params![address],
                map_user,
            )
            .optional()?;
        Ok(row)
    }

    /// Get users by a set of ids, keyed by id.
    pub fn get_by_ids(conn: &Connection, user_ids: &[i64]) -> Result<HashMap<i64, User>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT {COLUMNS} FROM users WHERE id IN ({})",
            placeholders(user_ids.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(user_ids.iter()), map_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().map(|u| (u.id, u)).collect())
    }

    /// Paged user list, newest first, with an optional address substring
    /// filter. Returns the page plus the total row count.
    pub fn list(
        conn: &Connection,
        page: &Pagination,
        address: Option<&str>,
    ) -> Result<(Vec<User>, i64)> {
        let filter = address.unwrap_or("");
        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE (?1 = '' OR address LIKE '%' || ?1 || '%')",
            params![filter],
            |row| row.get(0),
        )?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM users
             WHERE (?1 = '' OR address LIKE '%' || ?1 || '%')
             ORDER BY id DESC LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
            .query_map(params![filter, page.limit(), page.offset()], map_user)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok((rows, total))
    }

    /// Total registered users.
    pub fn count(conn: &Connection) -> Result<i64> {
        let n = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        Ok(n)
    }

    /// Users registered at or after the given cutoff timestamp.
    pub fn count_since(conn: &Connection, cutoff: &str) -> Result<i64> {
        let n = conn.query_row(
            "SELECT COUNT(*) FROM users WHERE created_at >= ?1",
            params![cutoff],
            |row| row.get(0),
        )?;
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::setup_conn;

    #[test]
    fn create_and_get() {
        let conn = setup_conn();
        let user = UserRepo::create(&conn, "0xabc0000000000000000000").unwrap();
        assert!(user.id > 0);

        let by_id = UserRepo::get_by_id(&conn, user.id).unwrap().unwrap();
        assert_eq!(by_id.address, "0xabc0000000000000000000");

        let by_addr = UserRepo::get_by_address(&conn, &user.address).unwrap().unwrap();
        assert_eq!(by_addr.id, user.id);
    }

    #[test]
    fn duplicate_address_rejected() {
        let conn = setup_conn();
        let _ = UserRepo::create(&conn, "0xsame00000000000000000").unwrap();
        assert!(UserRepo::create(&conn, "0xsame00000000000000000").is_err());
    }

    #[test]
    fn get_by_ids_keys_by_id() {
        let conn = setup_conn();
        let a = UserRepo::create(&conn, "0xaaa0000000000000000000").unwrap();
        let b = UserRepo::create(&conn, "0xbbb0000000000000000000").unwrap();
        let map = UserRepo::get_by_ids(&conn, &[a.id, b.id, 999]).unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&a.id].address, a.address);
        assert_eq!(map[&b.id].address, b.address);
    }

    #[test]
    fn list_filters_by_address() {
        let conn = setup_conn();
        let _ = UserRepo::create(&conn, "0xalpha000000000000000000").unwrap();
        let _ = UserRepo::create(&conn, "0xbeta0000000000000000000").unwrap();

        let (all, total) = UserRepo::list(&conn, &Pagination::default(), None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(total, 2);

        let (filtered, total) =
            UserRepo::list(&conn, &Pagination::default(), Some("alpha")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(total, 1);
    }

    #[test]
    fn count_since_cutoff() {
        let conn = setup_conn();
        let _ = UserRepo::create(&conn, "0xearly000000000000000000").unwrap();
        assert_eq!(UserRepo::count(&conn).unwrap(), 1);
        assert_eq!(UserRepo::count_since(&conn, "2000-01-01T00:00:00Z").unwrap(), 1);
        assert_eq!(UserRepo::count_since(&conn, "2999-01-01T00:00:00Z").unwrap(), 0);
    }
}
