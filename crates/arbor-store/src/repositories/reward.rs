//! Reward repository — the `rewards` table.

use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};

use crate::errors::Result;
use crate::models::{NewReward, Pagination, Reward};
use crate::time::now_iso;

const COLUMNS: &str = "id, user_id, amount, balance_record_id, record_type, type_record_id, \
                       reason, reason_location_id, location_type, created_at";

fn map_reward(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reward> {
    Ok(Reward {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        balance_record_id: row.get(3)?,
        record_type: row.get(4)?,
        type_record_id: row.get(5)?,
        reason: row.get(6)?,
        reason_location_id: row.get(7)?,
        location_type: row.get(8)?,
        created_at: row.get(9)?,
    })
}

/// Reward repository.
pub struct RewardRepo;

impl RewardRepo {
    /// Insert a tagged reward.
    pub fn insert(conn: &Connection, reward: &NewReward) -> Result<Reward> {
        let now = now_iso();
        let _ = conn.execute(
            "INSERT INTO rewards (user_id, amount, balance_record_id, record_type,
                                  type_record_id, reason, reason_location_id,
                                  location_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                reward.user_id,
                reward.amount,
                reward.balance_record_id,
                reward.record_type,
                reward.type_record_id,
                reward.reason,
                reward.reason_location_id,
                reward.location_type,
                now,
            ],
        )?;
        Ok(Reward {
            id: conn.last_insert_rowid(),
            user_id: reward.user_id,
            amount: reward.amount,
            balance_record_id: reward.balance_record_id,
            record_type: reward.record_type.clone(),
            type_record_id: reward.type_record_id,
            reason: reward.reason.clone(),
            reason_location_id: reward.reason_location_id,
            location_type: reward.location_type.clone(),
            created_at: now,
        })
    }

    /// All rewards for a user, oldest first.
    pub fn list_by_user(conn: &Connection, user_id: i64) -> Result<Vec<Reward>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM rewards WHERE user_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
            .query_map(params![user_id], map_reward)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Paged rewards, newest first, optionally filtered by user and by a
    /// set of reasons. Returns the page plus the total row count.
    pub fn list_paged(
        conn: &Connection,
        page: &Pagination,
        user_id: Option<i64>,
        reasons: Option<&[&str]>,
    ) -> Result<(Vec<Reward>, i64)> {
        let mut clauses: Vec<String> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(user_id) = user_id {
            values.push(Value::Integer(user_id));
            clauses.push(format!("user_id = ?{}", values.len()));
        }
        if let Some(reasons) = reasons {
            let mut marks = Vec::with_capacity(reasons.len());
            for reason in reasons {
                values.push(Value::Text((*reason).to_string()));
                marks.push(format!("?{}", values.len()));
            }
            clauses.push(format!("reason IN ({})", marks.join(", ")));
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let total: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM rewards {where_sql}"),
            params_from_iter(values.iter()),
            |row| row.get(0),
        )?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM rewards {where_sql}
             ORDER BY id DESC LIMIT {} OFFSET {}",
            page.limit(),
            page.offset()
        ))?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), map_reward)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok((rows, total))
    }

    /// A user's reward total at or after the given cutoff timestamp.
    pub fn total_since(conn: &Connection, user_id: i64, cutoff: &str) -> Result<i64> {
        let total = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM rewards
             WHERE user_id = ?1 AND created_at >= ?2",
            params![user_id, cutoff],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Platform-wide reward total.
    pub fn platform_total(conn: &Connection) -> Result<i64> {
        let total = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0) FROM rewards",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::setup_conn;
    use crate::repositories::user::UserRepo;

    fn make_user(conn: &Connection) -> i64 {
        UserRepo::create(conn, "0xrew0000000000000000000").unwrap().id
    }

    fn insert_reward(conn: &Connection, user_id: i64, amount: i64, reason: &str) {
        let _ = RewardRepo::insert(
            conn,
            &NewReward {
                user_id,
                amount,
                reason: reason.to_string(),
                ..NewReward::default()
            },
        )
        .unwrap();
    }

    #[test]
    fn insert_and_list() {
        let conn = setup_conn();
        let user_id = make_user(&conn);
        insert_reward(&conn, user_id, 100, "recommend");
        insert_reward(&conn, user_id, 200, "recommend_team");

        let rewards = RewardRepo::list_by_user(&conn, user_id).unwrap();
        assert_eq!(rewards.len(), 2);
        assert_eq!(rewards[0].amount, 100);
    }

    #[test]
    fn list_paged_filters_by_reason() {
        let conn = setup_conn();
        let user_id = make_user(&conn);
        insert_reward(&conn, user_id, 100, "recommend");
        insert_reward(&conn, user_id, 200, "recommend_team");
        insert_reward(&conn, user_id, 300, "fee");

        let (rows, total) = RewardRepo::list_paged(
            &conn,
            &Pagination::default(),
            Some(user_id),
            Some(&["recommend", "recommend_team"]),
        )
        .unwrap();
        assert_eq!(total, 2);
        // Newest first.
        assert_eq!(rows[0].amount, 200);
        assert_eq!(rows[1].amount, 100);
    }

    #[test]
    fn list_paged_no_filters() {
        let conn = setup_conn();
        let user_id = make_user(&conn);
        insert_reward(&conn, user_id, 1, "recommend");
        let (rows, total) =
            RewardRepo::list_paged(&conn, &Pagination::default(), None, None).unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn total_since_cutoff() {
        let conn = setup_conn();
        let user_id = make_user(&conn);
        insert_reward(&conn, user_id, 100, "recommend");
        assert_eq!(
            RewardRepo::total_since(&conn, user_id, "2000-01-01T00:00:00Z").unwrap(),
            100
        );
        assert_eq!(
            RewardRepo::total_since(&conn, user_id, "2999-01-01T00:00:00Z").unwrap(),
            0
        );
    }

    #[test]
    fn platform_total_sums_all_users() {
        let conn = setup_conn();
        let a = make_user(&conn);
        let b = UserRepo::create(&conn, "0xother00000000000000000").unwrap().id;
        insert_reward(&conn, a, 100, "recommend");
        insert_reward(&conn, b, 50, "fee");
        assert_eq!(RewardRepo::platform_total(&conn).unwrap(), 150);
    }
}
