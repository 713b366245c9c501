//! Reply DTOs returned to the RPC layer.
//!
//! Amount fields are pre-formatted decimal strings; timestamps are display
//! strings in UTC+8. Several mutation replies carry a `status` field
//! (`"ok"`, `"fail"`, or a short failure description) instead of an error
//! value — that asymmetry is part of the platform's behavior.

use serde::Serialize;

/// Dashboard reply for one user.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoReply {
    /// Account address.
    pub address: String,
    /// Location status: `no`, `stop`, `yes`, or `running`.
    pub status: String,
    /// Summed payout of running locations (2 dp).
    pub amount: String,
    /// Spendable USDT balance (4 dp).
    pub balance_usdt: String,
    /// Spendable platform coin balance (4 dp).
    pub balance_dhb: String,
    /// The user's shareable invite code.
    pub invite_url: String,
    /// Direct referrer's address (empty for roots).
    pub invite_user_address: String,
    /// Lifetime direct-recommend count.
    pub recommend_num: i64,
    /// Size of the whole referral subtree.
    pub recommend_team_num: i64,
    /// Lifetime reward total (4 dp).
    pub total: String,
    /// Lifetime withdrawn total (3 dp).
    pub withdraw_amount: String,
    /// Direct recommend reward total (4 dp).
    pub recommend_total: String,
    /// Team recommend reward total (4 dp).
    pub recommend_team_total: String,
    /// Area/tier bonus reward total (4 dp).
    pub recommend_area_total: String,
    /// Location payout reward total (4 dp).
    pub location_reward_total: String,
    /// USDT token contract address.
    pub usdt_contract: String,
    /// Platform collection account address.
    pub collection_account: String,
    /// Payout shortfall credited back on relocation (4 dp).
    pub relocation_amount: String,
    /// Coin frozen by recently stopped locations (4 dp).
    pub stop_coin_amount: String,
    /// Displayed platform user count (config value).
    pub user_count: String,
    /// Lifetime deposit total (4 dp).
    pub total_deposit: String,
    /// Number of location slots ever opened.
    pub location_count: i64,
    /// Reward total since the last daily settlement (4 dp).
    pub today_reward: String,
    /// Platform coin price (4 dp).
    pub coin_price: String,
    /// Account freeze flag.
    pub undo: i64,
    /// Area tier display name (empty when unranked).
    pub area_name: String,
    /// Small-area amount: subtree total minus its largest branch (4 dp).
    pub area_amount: String,
    /// Largest branch amount (4 dp).
    pub area_max_amount: String,
    /// Active balance-reward allocation total (4 dp).
    pub amount_balance_reward: String,
}

/// Reply to a referral rebind request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendUpdateReply {
    /// The (possibly unchanged) direct referrer's address.
    pub invite_user_address: String,
}

/// One reward entry in a listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardItem {
    /// Display timestamp (UTC+8).
    pub created_at: String,
    /// Reward amount (4 dp).
    pub amount: String,
    /// Reward reason tag.
    pub reason: String,
    /// Location type discriminator, if any.
    pub location_type: String,
}

/// Paged reward listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardListReply {
    /// Rewards, newest first.
    pub rewards: Vec<RewardItem>,
    /// Total matching rows.
    pub total: i64,
}

/// One withdraw entry in a listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawItem {
    /// Display timestamp (UTC+8).
    pub created_at: String,
    /// Paid-out amount (2 dp).
    pub amount: String,
    /// Processing status.
    pub status: String,
    /// Coin type.
    pub coin_type: String,
}

/// Withdraw listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawListReply {
    /// Withdraws, newest first.
    pub withdraws: Vec<WithdrawItem>,
}

/// Mutation outcome carried as a status string.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReply {
    /// `"ok"`, `"fail"`, or a short failure description.
    pub status: String,
}

impl StatusReply {
    /// Success.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }

    /// Generic failure.
    #[must_use]
    pub fn fail() -> Self {
        Self {
            status: "fail".to_string(),
        }
    }

    /// Failure with a short description.
    #[must_use]
    pub fn message(status: &str) -> Self {
        Self {
            status: status.to_string(),
        }
    }
}

// ── Admin replies ───────────────────────────────────────────────────

/// One user row in the admin listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserItem {
    /// User id.
    pub user_id: i64,
    /// Account address.
    pub address: String,
    /// VIP tier.
    pub vip: i64,
    /// Lifetime direct-recommend count.
    pub history_recommend: i64,
    /// Spendable USDT balance (4 dp).
    pub balance_usdt: String,
    /// Display registration timestamp (UTC+8).
    pub created_at: String,
}

/// Paged admin user listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserListReply {
    /// Users, newest first.
    pub users: Vec<AdminUserItem>,
    /// Total matching rows.
    pub total: i64,
}

/// One reward row in the admin listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRewardItem {
    /// Receiving user id.
    pub user_id: i64,
    /// Receiving user address.
    pub address: String,
    /// Reward amount (4 dp).
    pub amount: String,
    /// Reward reason tag.
    pub reason: String,
    /// Display timestamp (UTC+8).
    pub created_at: String,
}

/// Paged admin reward listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRewardListReply {
    /// Rewards, newest first.
    pub rewards: Vec<AdminRewardItem>,
    /// Total matching rows.
    pub total: i64,
}

/// One location row in the admin listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLocationItem {
    /// Owning user id.
    pub user_id: i64,
    /// Slot status.
    pub status: String,
    /// Accrued payout (4 dp).
    pub current: String,
    /// Payout cap (4 dp).
    pub current_max: String,
    /// Display creation timestamp (UTC+8).
    pub created_at: String,
}

/// Paged admin location listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLocationListReply {
    /// Locations, newest first.
    pub locations: Vec<AdminLocationItem>,
    /// Total matching rows.
    pub total: i64,
}

/// One withdraw row in the admin listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminWithdrawItem {
    /// Withdraw id.
    pub id: i64,
    /// Owning user id.
    pub user_id: i64,
    /// Owning user address.
    pub address: String,
    /// Requested amount (2 dp).
    pub amount: String,
    /// Paid-out amount (2 dp).
    pub rel_amount: String,
    /// Processing status.
    pub status: String,
    /// Coin type.
    pub coin_type: String,
    /// Display timestamp (UTC+8).
    pub created_at: String,
}

/// Paged admin withdraw listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminWithdrawListReply {
    /// Withdraws, newest first.
    pub withdraws: Vec<AdminWithdrawItem>,
    /// Total matching rows.
    pub total: i64,
}

/// One direct referral in the admin recommend listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecommendItem {
    /// Referred user id.
    pub user_id: i64,
    /// Referred user address.
    pub address: String,
    /// Display timestamp of the referral (UTC+8).
    pub created_at: String,
}

/// Direct referrals of one user.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminRecommendListReply {
    /// Direct referrals.
    pub users: Vec<AdminRecommendItem>,
}

/// One current-month recommend in the admin listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMonthRecommendItem {
    /// Recommender user id.
    pub user_id: i64,
    /// Recommender address.
    pub address: String,
    /// Referred user id.
    pub recommend_user_id: i64,
    /// Referred user address.
    pub recommend_address: String,
    /// Recommend date (display, UTC+8).
    pub date: String,
}

/// Paged current-month recommend listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMonthRecommendReply {
    /// Records, newest first.
    pub users: Vec<AdminMonthRecommendItem>,
    /// Total matching rows.
    pub total: i64,
}

/// One config entry in the admin listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfigItem {
    /// Row id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Raw value.
    pub value: String,
}

/// Config listing.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminConfigReply {
    /// Entries in id order.
    pub config: Vec<AdminConfigItem>,
}

/// Platform-wide totals.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTotalsReply {
    /// Registered users.
    pub total_users: i64,
    /// Users registered since the last daily settlement.
    pub today_users: i64,
    /// Lifetime USDT deposit total (4 dp).
    pub total_deposit: String,
    /// USDT deposits since the last daily settlement (4 dp).
    pub today_deposit: String,
    /// Lifetime USDT withdraw total (4 dp).
    pub total_withdraw: String,
    /// USDT withdraws since the last daily settlement (4 dp).
    pub today_withdraw: String,
    /// Lifetime reward total (4 dp).
    pub total_reward: String,
}
