//! Balance reward repository — the `balance_rewards` table.
//!
//! Allocations move spendable USDT into discretionary reward rows; releases
//! move it back. Both sides touch `user_balances`, so callers run them
//! inside a transaction.

use rusqlite::{Connection, params};

use crate::errors::{Result, StoreError};
use crate::models::BalanceReward;
use crate::time::now_iso;

/// Allocation is active and spendable.
pub const STATUS_ACTIVE: i64 = 1;
/// Allocation has been fully released.
pub const STATUS_CONSUMED: i64 = 2;

const COLUMNS: &str = "id, user_id, status, amount, set_date, updated_at, created_at";

fn map_balance_reward(row: &rusqlite::Row<'_>) -> rusqlite::Result<BalanceReward> {
    Ok(BalanceReward {
        id: row.get(0)?,
        user_id: row.get(1)?,
        status: row.get(2)?,
        amount: row.get(3)?,
        set_date: row.get(4)?,
        updated_at: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Balance reward repository.
pub struct BalanceRewardRepo;

impl BalanceRewardRepo {
    /// Allocate: debit the user's USDT balance and create an active row.
    ///
    /// # Errors
    ///
    /// [`StoreError::InsufficientBalance`] when the balance does not cover
    /// the amount.
    pub fn allocate(conn: &Connection, user_id: i64, amount: i64) -> Result<BalanceReward> {
        let updated = conn.execute(
            "UPDATE user_balances SET balance_usdt = balance_usdt - ?2
             WHERE user_id = ?1 AND balance_usdt >= ?2",
            params![user_id, amount],
        )?;
        if updated == 0 {
            return Err(StoreError::InsufficientBalance { user_id });
        }

        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO balance_rewards (user_id, status, amount, set_date, updated_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?4, ?4)",
            params![user_id, STATUS_ACTIVE, amount, now],
        )?;
        Ok(BalanceReward {
            id: conn.last_insert_rowid(),
            user_id,
            status: STATUS_ACTIVE,
            amount,
            set_date: now.clone(),
            updated_at: now.clone(),
            created_at: now,
        })
    }

    /// Active allocations for a user, oldest first.
    pub fn list_active_by_user(conn: &Connection, user_id: i64) -> Result<Vec<BalanceReward>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM balance_rewards
             WHERE user_id = ?1 AND status = ?2 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![user_id, STATUS_ACTIVE], map_balance_reward)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Release part of one allocation back to the user's USDT balance.
    ///
    /// Reduces the row's remaining amount, sets its status (consumed when
    /// exhausted), and credits the balance.
    pub fn release(
        conn: &Connection,
        user_id: i64,
        id: i64,
        amount: i64,
        status: i64,
    ) -> Result<()> {
        let updated = conn.execute(
            "UPDATE balance_rewards
             SET amount = amount - ?3, status = ?4, updated_at = ?5
             WHERE id = ?2 AND user_id = ?1 AND status = ?6 AND amount >= ?3",
            params![user_id, id, amount, status, now_iso(), STATUS_ACTIVE],
        )?;
        if updated == 0 {
            return Err(StoreError::InvalidOperation(format!(
                "balance reward {id} cannot release {amount}"
            )));
        }
        let _ = conn.execute(
            "UPDATE user_balances SET balance_usdt = balance_usdt + ?2 WHERE user_id = ?1",
            params![user_id, amount],
        )?;
        Ok(())
    }
}
