//! Current-month recommend repository.

use rusqlite::{Connection, params};

use crate::errors::Result;
use crate::models::{MonthRecommend, Pagination};

const COLUMNS: &str = "id, user_id, recommend_user_id, date";

fn map_month(row: &rusqlite::Row<'_>) -> rusqlite::Result<MonthRecommend> {
    Ok(MonthRecommend {
        id: row.get(0)?,
        user_id: row.get(1)?,
        recommend_user_id: row.get(2)?,
        date: row.get(3)?,
    })
}

/// Current-month recommend repository.
pub struct MonthRecommendRepo;

impl MonthRecommendRepo {
    /// Record a direct recommend.
    pub fn insert(
        conn: &Connection,
        user_id: i64,
        recommend_user_id: i64,
        date: &str,
    ) -> Result<MonthRecommend> {
        let _ = conn.execute(
            "INSERT INTO user_current_month_recommends (user_id, recommend_user_id, date)
             VALUES (?1, ?2, ?3)",
            params![user_id, recommend_user_id, date],
        )?;
        Ok(MonthRecommend {
            id: conn.last_insert_rowid(),
            user_id,
            recommend_user_id,
            date: date.to_string(),
        })
    }

    /// A recommender's records at or after the month start.
    pub fn list_by_user(
        conn: &Connection,
        user_id: i64,
        month_start: &str,
    ) -> Result<Vec<MonthRecommend>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM user_current_month_recommends
             WHERE user_id = ?1 AND date >= ?2 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![user_id, month_start], map_month)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Paged records at or after the month start, newest first.
    pub fn list_paged(
        conn: &Connection,
        page: &Pagination,
        month_start: &str,
    ) -> Result<(Vec<MonthRecommend>, i64)> {
        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM user_current_month_recommends WHERE date >= ?1",
            params![month_start],
            |row| row.get(0),
        )?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM user_current_month_recommends
             WHERE date >= ?1 ORDER BY id DESC LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
            .query_map(params![month_start, page.limit(), page.offset()], map_month)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok((rows, total))
    }
}
