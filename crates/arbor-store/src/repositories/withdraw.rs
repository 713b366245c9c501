//! Withdraw repository — the `withdraws` table.

use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};

use crate::errors::{Result, StoreError};
use crate::models::{Pagination, Withdraw};
use crate::time::now_iso;

/// Newly created withdraws awaiting processing.
pub const STATUS_REWARDED: &str = "rewarded";
/// Approved by review, awaiting processing.
pub const STATUS_PASS: &str = "pass";
/// Picked up by the payout worker.
pub const STATUS_DOING: &str = "doing";
/// Paid out.
pub const STATUS_SUCCESS: &str = "success";

const COLUMNS: &str =
    "id, user_id, amount, rel_amount, balance_record_id, status, coin_type, created_at";

fn map_withdraw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Withdraw> {
    Ok(Withdraw {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        rel_amount: row.get(3)?,
        balance_record_id: row.get(4)?,
        status: row.get(5)?,
        coin_type: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Withdraw repository.
pub struct WithdrawRepo;

impl WithdrawRepo {
    /// Create a withdraw in the initial `rewarded` status.
    pub fn create(
        conn: &Connection,
        user_id: i64,
        amount: i64,
        rel_amount: i64,
        balance_record_id: i64,
        coin_type: &str,
    ) -> Result<Withdraw> {
        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO withdraws (user_id, amount, rel_amount, balance_record_id,
                                    status, coin_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![user_id, amount, rel_amount, balance_record_id, STATUS_REWARDED, coin_type, now],
        )?;
        Ok(Withdraw {
            id: conn.last_insert_rowid(),
            user_id,
            amount,
            rel_amount,
            balance_record_id,
            status: STATUS_REWARDED.to_string(),
            coin_type: coin_type.to_string(),
            created_at: now,
        })
    }

    /// A user's withdraws, newest first, optionally filtered by coin type.
    pub fn list_by_user(
        conn: &Connection,
        user_id: i64,
        coin_type: Option<&str>,
    ) -> Result<Vec<Withdraw>> {
        let coin = coin_type.unwrap_or("");
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM withdraws
             WHERE user_id = ?1 AND (?2 = '' OR coin_type = ?2)
             ORDER BY id DESC"
        ))?;
        let rows = stmt
            .query_map(params![user_id, coin], map_withdraw)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Paged withdraws, newest first, optionally filtered by user.
    pub fn list_paged(
        conn: &Connection,
        page: &Pagination,
        user_id: Option<i64>,
    ) -> Result<(Vec<Withdraw>, i64)> {
        let mut values: Vec<Value> = Vec::new();
        let where_sql = if let Some(user_id) = user_id {
            values.push(Value::Integer(user_id));
            "WHERE user_id = ?1"
        } else {
            ""
        };

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM withdraws {where_sql}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM withdraws {where_sql}
             ORDER BY id DESC LIMIT {} OFFSET {}",
            page.limit(),
            page.offset()
        ))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), map_withdraw)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok((rows, total))
    }

    /// Get a withdraw by id.
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Withdraw>> {
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM withdraws WHERE id = ?1"),
                params![id],
                map_withdraw,
            )
            .optional()?;
        Ok(row)
    }

    /// Withdraws awaiting the payout worker (`pass` or `rewarded`), oldest
    /// first.
    pub fn list_pass_or_rewarded(conn: &Connection) -> Result<Vec<Withdraw>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM withdraws WHERE status IN (?1, ?2) ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![STATUS_PASS, STATUS_REWARDED], map_withdraw)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Advance a withdraw to a new status and return the updated row.
    ///
    /// # Errors
    ///
    /// [`StoreError::WithdrawNotFound`] when the id does not exist.
    pub fn update_status(conn: &Connection, id: i64, status: &str) -> Result<Withdraw> {
        let updated = conn.execute(
            "UPDATE withdraws SET status = ?2 WHERE id = ?1",
            params![id, status],
        )?;
        if updated == 0 {
            return Err(StoreError::WithdrawNotFound(id));
        }
        Self::get_by_id(conn, id)?.ok_or(StoreError::WithdrawNotFound(id))
    }
}
