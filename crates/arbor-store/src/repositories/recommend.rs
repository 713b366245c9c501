//! Referral tree repository — the `user_recommends` table.
//!
//! A row's `recommend_code` is the owner's ancestor chain (`D<id>` tokens,
//! root first, possibly empty). Direct children of a user are rows whose
//! code equals the user's subtree prefix exactly; the whole subtree is a
//! prefix match.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError};
use crate::models::UserRecommend;
use crate::time::now_iso;

const COLUMNS: &str = "id, user_id, recommend_code, created_at";

fn map_recommend(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRecommend> {
    Ok(UserRecommend {
        id: row.get(0)?,
        user_id: row.get(1)?,
        recommend_code: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Referral tree repository.
pub struct RecommendRepo;

impl RecommendRepo {
    /// Create the referral row for a new user with the given ancestry.
    pub fn create(conn: &Connection, user_id: i64, ancestry: &str) -> Result<UserRecommend> {
        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO user_recommends (user_id, recommend_code, created_at)
             VALUES (?1, ?2, ?3)",
            params![user_id, ancestry, now],
        )?;
        Ok(UserRecommend {
            id: conn.last_insert_rowid(),
            user_id,
            recommend_code: ancestry.to_string(),
            created_at: now,
        })
    }

    /// Get a user's referral row.
    pub fn get_by_user(conn: &Connection, user_id: i64) -> Result<Option<UserRecommend>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM user_recommends WHERE user_id = ?1"),
                params![user_id],
                map_recommend,
            )
            .optional()?;
        Ok(row)
    }

    /// Rows whose ancestry equals `code` exactly: the direct children of
    /// the user whose subtree prefix is `code`.
    pub fn list_direct(conn: &Connection, code: &str) -> Result<Vec<UserRecommend>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM user_recommends WHERE recommend_code = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![code], map_recommend)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Rows whose ancestry starts with `prefix`: the whole subtree below
    /// the user whose subtree prefix is `prefix`.
    pub fn list_subtree(conn: &Connection, prefix: &str) -> Result<Vec<UserRecommend>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM user_recommends WHERE recommend_code LIKE ?1 || '%' ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![prefix], map_recommend)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Move a user (and their whole subtree) under a new ancestry.
    ///
    /// Rewrites the user's own row to `new_ancestry` and replaces the old
    /// subtree prefix with the new one on every descendant row.
    pub fn rebind(conn: &Connection, user_id: i64, new_ancestry: &str) -> Result<()> {
        let current = Self::get_by_user(conn, user_id)?
            .ok_or_else(|| StoreError::InvalidOperation(format!("user {user_id} has no referral row")))?;

        let own_token = arbor_core::node_token(user_id);
        let old_prefix = format!("{}{own_token}", current.recommend_code);
        let new_prefix = format!("{new_ancestry}{own_token}");

        let _ = conn.execute(
            "UPDATE user_recommends SET recommend_code = ?1 WHERE user_id = ?2",
            params![new_ancestry, user_id],
        )?;
        #[allow(clippy::cast_possible_wrap)]
        let old_len = old_prefix.len() as i64;
        let _ = conn.execute(
            "UPDATE user_recommends
             SET recommend_code = ?1 || substr(recommend_code, ?2 + 1)
             WHERE recommend_code LIKE ?3 || '%'",
            params![new_prefix, old_len, old_prefix],
        )?;
        Ok(())
    }
}
