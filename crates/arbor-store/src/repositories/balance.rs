//! Balance repository — the `user_balances` and `balance_records` tables.
//!
//! Debits are conditional updates: the row is only touched when the balance
//! covers the amount, so overdrafts are impossible even with concurrent
//! writers.

use rusqlite::{Connection, OptionalExtension, params};

use crate::errors::{Result, StoreError};
use crate::models::UserBalance;
use crate::time::now_iso;

/// Coin discriminator for USDT.
pub const COIN_USDT: &str = "usdt";
/// Coin discriminator for the platform coin.
pub const COIN_DHB: &str = "dhb";

fn balance_column(coin_type: &str) -> Result<&'static str> {
    match coin_type {
        COIN_USDT => Ok("balance_usdt"),
        COIN_DHB => Ok("balance_dhb"),
        other => Err(StoreError::InvalidOperation(format!(
            "unknown coin type: {other}"
        ))),
    }
}

fn map_balance(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserBalance> {
    Ok(UserBalance {
        id: row.get(0)?,
        user_id: row.get(1)?,
        balance_usdt: row.get(2)?,
        balance_dhb: row.get(3)?,
    })
}

/// Balance repository.
pub struct BalanceRepo;

impl BalanceRepo {
    /// Create the balance row for a new user.
    pub fn create(conn: &Connection, user_id: i64) -> Result<UserBalance> {
        let _ = conn.execute(
            "INSERT INTO user_balances (user_id, balance_usdt, balance_dhb) VALUES (?1, 0, 0)",
            params![user_id],
        )?;
        Ok(UserBalance {
            id: conn.last_insert_rowid(),
            user_id,
            balance_usdt: 0,
            balance_dhb: 0,
        })
    }

    /// Get the balance row for a user.
    pub fn get_by_user(conn: &Connection, user_id: i64) -> Result<Option<UserBalance>> {
        let row = conn
            .query_row(
                "SELECT id, user_id, balance_usdt, balance_dhb
                 FROM user_balances WHERE user_id = ?1",
                params![user_id],
                map_balance,
            )
            .optional()?;
        Ok(row)
    }

    /// Credit a deposit and write its balance record. Returns the record id.
    pub fn deposit(conn: &Connection, user_id: i64, amount: i64, coin_type: &str) -> Result<i64> {
        let column = balance_column(coin_type)?;
        let updated = conn.execute(
            &format!("UPDATE user_balances SET {column} = {column} + ?2 WHERE user_id = ?1"),
            params![user_id, amount],
        )?;
        if updated == 0 {
            return Err(StoreError::UserNotFound(user_id));
        }
        let _ = conn.execute(
            "INSERT INTO balance_records (user_id, amount, record_type, coin_type, created_at)
             VALUES (?1, ?2, 'deposit', ?3, ?4)",
            params![user_id, amount, coin_type, now_iso()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Debit a withdrawal and write its balance record. Returns the record id.
    ///
    /// # Errors
    ///
    /// [`StoreError::InsufficientBalance`] when the balance does not cover
    /// the amount.
    pub fn withdraw(conn: &Connection, user_id: i64, amount: i64, coin_type: &str) -> Result<i64> {
        let column = balance_column(coin_type)?;
        let updated = conn.execute(
            &format!(
                "UPDATE user_balances SET {column} = {column} - ?2
                 WHERE user_id = ?1 AND {column} >= ?2"
            ),
            params![user_id, amount],
        )?;
        if updated == 0 {
            return Err(StoreError::InsufficientBalance { user_id });
        }
        let _ = conn.execute(
            "INSERT INTO balance_records (user_id, amount, record_type, coin_type, created_at)
             VALUES (?1, ?2, 'withdraw', ?3, ?4)",
            params![user_id, amount, coin_type, now_iso()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// A user's lifetime USDT deposit total.
    pub fn user_deposit_total(conn: &Connection, user_id: i64) -> Result<i64> {
        let total = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM balance_records
             WHERE user_id = ?1 AND record_type = 'deposit' AND coin_type = 'usdt'",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Platform-wide USDT deposit total, optionally since a cutoff.
    pub fn deposit_total(conn: &Connection, since: Option<&str>) -> Result<i64> {
        let cutoff = since.unwrap_or("");
        let total = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM balance_records
             WHERE record_type = 'deposit' AND coin_type = 'usdt' AND created_at >= ?1",
            params![cutoff],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Platform-wide USDT withdraw total, optionally since a cutoff.
    pub fn withdraw_total(conn: &Connection, since: Option<&str>) -> Result<i64> {
        let cutoff = since.unwrap_or("");
        let total = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM balance_records
             WHERE record_type = 'withdraw' AND coin_type = 'usdt' AND created_at >= ?1",
            params![cutoff],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}
