//! Row-mapped entity types.
//!
//! These mirror the database schema one-to-one. Aggregation and reply
//! shaping happen in the domain layer, not here.

use serde::{Deserialize, Serialize};

/// A registered platform user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Row id.
    pub id: i64,
    /// Ethereum-style account address (unique).
    pub address: String,
    /// Flag freezing the account for manual review.
    pub undo: i64,
    /// Creation timestamp.
    pub created_at: String,
}

/// Per-user profile counters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserInfo {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// VIP tier.
    pub vip: i64,
    /// Lifetime direct-recommend count.
    pub history_recommend: i64,
}

/// A user's position in the referral tree.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserRecommend {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Ancestor chain as concatenated `D<id>` tokens (may be empty).
    pub recommend_code: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Aggregated subtree totals and manually assigned tier level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserArea {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Subtree deposit total (area scale).
    pub amount: i64,
    /// User's own deposit total (area scale).
    pub self_amount: i64,
    /// Manually assigned tier level (0 = unset).
    pub level: i64,
}

/// A current-month direct-recommend record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonthRecommend {
    /// Row id.
    pub id: i64,
    /// Recommender.
    pub user_id: i64,
    /// The newly recommended user.
    pub recommend_user_id: i64,
    /// Recommend date.
    pub date: String,
}

/// Spendable balances per user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserBalance {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// USDT balance in base units.
    pub balance_usdt: i64,
    /// Platform coin balance in base units.
    pub balance_dhb: i64,
}

/// A balance mutation record (deposit or withdraw).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Mutation amount in base units.
    pub amount: i64,
    /// `deposit` or `withdraw`.
    pub record_type: String,
    /// `usdt` or `dhb`.
    pub coin_type: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A withdrawal request. Status lifecycle: `rewarded` -> `doing` -> `success`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Withdraw {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// Requested amount in base units.
    pub amount: i64,
    /// Amount actually paid out in base units.
    pub rel_amount: i64,
    /// Balance record created by the debit.
    pub balance_record_id: i64,
    /// Processing status.
    pub status: String,
    /// `usdt` or `dhb`.
    pub coin_type: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A reward entry tagged by reason.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Reward {
    /// Row id.
    pub id: i64,
    /// Receiving user.
    pub user_id: i64,
    /// Reward amount in base units.
    pub amount: i64,
    /// Balance record created by the credit.
    pub balance_record_id: i64,
    /// Coarse record type.
    pub record_type: String,
    /// Id of the record that triggered the reward.
    pub type_record_id: i64,
    /// Reward reason tag.
    pub reason: String,
    /// Location that triggered the reward, if any.
    pub reason_location_id: i64,
    /// Location type discriminator.
    pub location_type: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields for inserting a new reward.
#[derive(Clone, Debug, Default)]
pub struct NewReward {
    /// Receiving user.
    pub user_id: i64,
    /// Reward amount in base units.
    pub amount: i64,
    /// Balance record created by the credit.
    pub balance_record_id: i64,
    /// Coarse record type.
    pub record_type: String,
    /// Id of the record that triggered the reward.
    pub type_record_id: i64,
    /// Reward reason tag.
    pub reason: String,
    /// Location that triggered the reward, if any.
    pub reason_location_id: i64,
    /// Location type discriminator.
    pub location_type: String,
}

/// A discretionary balance reward. Status 1 = active, 2 = consumed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BalanceReward {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// 1 = active, 2 = consumed.
    pub status: i64,
    /// Remaining allocated amount in base units.
    pub amount: i64,
    /// When the allocation was made.
    pub set_date: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A deposit slot with a payout lifecycle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    /// Row id.
    pub id: i64,
    /// Owning user.
    pub user_id: i64,
    /// `running` or `stop`.
    pub status: String,
    /// Accrued payout in base units.
    pub current: i64,
    /// Payout cap in base units.
    pub current_max: i64,
    /// Whether the slot re-opens after stopping.
    pub stop_location_again: i64,
    /// Payout rate discriminator.
    pub out_rate: i64,
    /// Coin amount frozen at stop time.
    pub stop_coin: i64,
    /// When the slot stopped (empty while running).
    pub stop_date: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Fields for inserting a new location.
#[derive(Clone, Debug, Default)]
pub struct NewLocation {
    /// Owning user.
    pub user_id: i64,
    /// `running` or `stop`.
    pub status: String,
    /// Accrued payout in base units.
    pub current: i64,
    /// Payout cap in base units.
    pub current_max: i64,
    /// Payout rate discriminator.
    pub out_rate: i64,
    /// Coin amount frozen at stop time.
    pub stop_coin: i64,
    /// When the slot stopped (empty while running).
    pub stop_date: String,
}

/// A key/value tunable.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigEntry {
    /// Row id.
    pub id: i64,
    /// Lookup key.
    pub key_name: String,
    /// Display name.
    pub name: String,
    /// Raw value.
    pub value: String,
}

/// Page request for list queries (1-based page numbers).
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Rows per page.
    pub page_size: u32,
}

impl Pagination {
    /// Create a page request, clamping page to at least 1.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size,
        }
    }

    /// SQL offset for this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }

    /// SQL limit for this page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 20,
        }
    }
}
