//! Location repository — the `locations` table (deposit slots).

use rusqlite::{Connection, params};

use crate::errors::Result;
use crate::models::{Location, NewLocation, Pagination};
use crate::time::now_iso;

/// Slot is accruing payouts.
pub const STATUS_RUNNING: &str = "running";
/// Slot reached its payout cap.
pub const STATUS_STOP: &str = "stop";

const COLUMNS: &str = "id, user_id, status, current, current_max, stop_location_again, \
                       out_rate, stop_coin, stop_date, created_at";

fn map_location(row: &rusqlite::Row<'_>) -> rusqlite::Result<Location> {
    Ok(Location {
        id: row.get(0)?,
        user_id: row.get(1)?,
        status: row.get(2)?,
        current: row.get(3)?,
        current_max: row.get(4)?,
        stop_location_again: row.get(5)?,
        out_rate: row.get(6)?,
        stop_coin: row.get(7)?,
        stop_date: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Location repository.
pub struct LocationRepo;

impl LocationRepo {
    /// Create a location slot.
    pub fn create(conn: &Connection, location: &NewLocation) -> Result<Location> {
        let now = now_iso();
        let status = if location.status.is_empty() {
            STATUS_RUNNING
        } else {
            &location.status
        };
        let _ = conn.execute(
            "INSERT INTO locations (user_id, status, current, current_max,
                                    stop_location_again, out_rate, stop_coin,
                                    stop_date, created_at)
             VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6, ?7, ?8)",
            params![
                location.user_id,
                status,
                location.current,
                location.current_max,
                location.out_rate,
                location.stop_coin,
                location.stop_date,
                now,
            ],
        )?;
        Ok(Location {
            id: conn.last_insert_rowid(),
            user_id: location.user_id,
            status: status.to_string(),
            current: location.current,
            current_max: location.current_max,
            stop_location_again: 0,
            out_rate: location.out_rate,
            stop_coin: location.stop_coin,
            stop_date: location.stop_date.clone(),
            created_at: now,
        })
    }

    /// A user's locations, oldest first.
    pub fn list_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Location>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM locations WHERE user_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![user_id], map_location)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// A user's stopped locations, most recently stopped first.
    pub fn last_stopped_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Location>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM locations
             WHERE user_id = ?1 AND status = ?2
             ORDER BY stop_date DESC, id DESC"
        ))?;
        let rows = stmt
            .query_map(params![user_id, STATUS_STOP], map_location)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Paged locations, newest first.
    pub fn list_paged(conn: &Connection, page: &Pagination) -> Result<(Vec<Location>, i64)> {
        let total: i64 =
            conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM locations ORDER BY id DESC LIMIT ?1 OFFSET ?2"
        ))?;
        let rows = stmt
            .query_map(params![page.limit(), page.offset()], map_location)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok((rows, total))
    }
}
