//! Admin-facing business logic: listings, config updates, the withdraw
//! payout queue, and platform totals.

use std::collections::HashMap;

use chrono::Utc;
use rusqlite::Connection;
use tracing::info;

use arbor_core::{format_amount, subtree_prefix};
use arbor_store::models::{Pagination, User, Withdraw};
use arbor_store::repositories::withdraw::{STATUS_DOING, STATUS_SUCCESS};
use arbor_store::repositories::{
    BalanceRepo, ConfigRepo, LocationRepo, MonthRecommendRepo, RecommendRepo, RewardRepo,
    UserInfoRepo, UserRepo, WithdrawRepo,
};
use arbor_store::time::format_iso;
use arbor_store::StoreError;

use crate::clock::{daily_cutoff, display_time, month_start};
use crate::errors::DomainError;
use crate::replies::{
    AdminConfigItem, AdminConfigReply, AdminLocationItem, AdminLocationListReply,
    AdminMonthRecommendItem, AdminMonthRecommendReply, AdminRecommendItem,
    AdminRecommendListReply, AdminRewardItem, AdminRewardListReply, AdminTotalsReply,
    AdminUserItem, AdminUserListReply, AdminWithdrawItem, AdminWithdrawListReply, StatusReply,
};

fn address_of(users: &HashMap<i64, User>, user_id: i64) -> String {
    users
        .get(&user_id)
        .map(|user| user.address.clone())
        .unwrap_or_default()
}

/// Admin service.
pub struct AdminService;

impl AdminService {
    /// Paged user listing with profile and balance columns.
    pub fn user_list(
        conn: &Connection,
        page: &Pagination,
        address: Option<&str>,
    ) -> Result<AdminUserListReply, DomainError> {
        let (users, total) = UserRepo::list(conn, page, address)?;
        let ids: Vec<i64> = users.iter().map(|user| user.id).collect();
        let infos = UserInfoRepo::get_by_users(conn, &ids)?;

        let mut items = Vec::with_capacity(users.len());
        for user in users {
            let balance = BalanceRepo::get_by_user(conn, user.id)?;
            let info = infos.get(&user.id);
            items.push(AdminUserItem {
                user_id: user.id,
                address: user.address,
                vip: info.map_or(0, |i| i.vip),
                history_recommend: info.map_or(0, |i| i.history_recommend),
                balance_usdt: format_amount(balance.map_or(0, |b| b.balance_usdt), 4),
                created_at: display_time(&user.created_at),
            });
        }
        Ok(AdminUserListReply {
            users: items,
            total,
        })
    }

    /// Paged reward listing, optionally filtered by user.
    pub fn reward_list(
        conn: &Connection,
        page: &Pagination,
        user_id: Option<i64>,
    ) -> Result<AdminRewardListReply, DomainError> {
        let (rewards, total) = RewardRepo::list_paged(conn, page, user_id, None)?;
        let ids: Vec<i64> = rewards.iter().map(|reward| reward.user_id).collect();
        let users = UserRepo::get_by_ids(conn, &ids)?;

        Ok(AdminRewardListReply {
            rewards: rewards
                .iter()
                .map(|reward| AdminRewardItem {
                    user_id: reward.user_id,
                    address: address_of(&users, reward.user_id),
                    amount: format_amount(reward.amount, 4),
                    reason: reward.reason.clone(),
                    created_at: display_time(&reward.created_at),
                })
                .collect(),
            total,
        })
    }

    /// Paged location listing.
    pub fn location_list(
        conn: &Connection,
        page: &Pagination,
    ) -> Result<AdminLocationListReply, DomainError> {
        let (locations, total) = LocationRepo::list_paged(conn, page)?;
        Ok(AdminLocationListReply {
            locations: locations
                .iter()
                .map(|location| AdminLocationItem {
                    user_id: location.user_id,
                    status: location.status.clone(),
                    current: format_amount(location.current, 4),
                    current_max: format_amount(location.current_max, 4),
                    created_at: display_time(&location.created_at),
                })
                .collect(),
            total,
        })
    }

    /// Paged withdraw listing, optionally filtered by user.
    pub fn withdraw_list(
        conn: &Connection,
        page: &Pagination,
        user_id: Option<i64>,
    ) -> Result<AdminWithdrawListReply, DomainError> {
        let (withdraws, total) = WithdrawRepo::list_paged(conn, page, user_id)?;
        let ids: Vec<i64> = withdraws.iter().map(|w| w.user_id).collect();
        let users = UserRepo::get_by_ids(conn, &ids)?;

        Ok(AdminWithdrawListReply {
            withdraws: withdraws
                .iter()
                .map(|w| AdminWithdrawItem {
                    id: w.id,
                    user_id: w.user_id,
                    address: address_of(&users, w.user_id),
                    amount: format_amount(w.amount, 2),
                    rel_amount: format_amount(w.rel_amount, 2),
                    status: w.status.clone(),
                    coin_type: w.coin_type.clone(),
                    created_at: display_time(&w.created_at),
                })
                .collect(),
            total,
        })
    }

    /// Direct referrals of one user.
    pub fn recommend_list(
        conn: &Connection,
        user_id: i64,
    ) -> Result<AdminRecommendListReply, DomainError> {
        let row = RecommendRepo::get_by_user(conn, user_id)?
            .ok_or_else(|| StoreError::InvalidOperation(format!("user {user_id} has no referral row")))?;
        let my_code = subtree_prefix(&row.recommend_code, user_id);
        let direct = RecommendRepo::list_direct(conn, &my_code)?;
        let ids: Vec<i64> = direct.iter().map(|r| r.user_id).collect();
        let users = UserRepo::get_by_ids(conn, &ids)?;

        Ok(AdminRecommendListReply {
            users: direct
                .iter()
                .map(|r| AdminRecommendItem {
                    user_id: r.user_id,
                    address: address_of(&users, r.user_id),
                    created_at: display_time(&r.created_at),
                })
                .collect(),
        })
    }

    /// Paged current-month recommend listing.
    pub fn month_recommend(
        conn: &Connection,
        page: &Pagination,
    ) -> Result<AdminMonthRecommendReply, DomainError> {
        let start = format_iso(month_start(Utc::now()));
        let (records, total) = MonthRecommendRepo::list_paged(conn, page, &start)?;
        let mut ids: Vec<i64> = Vec::with_capacity(records.len() * 2);
        for record in &records {
            ids.push(record.user_id);
            ids.push(record.recommend_user_id);
        }
        let users = UserRepo::get_by_ids(conn, &ids)?;

        Ok(AdminMonthRecommendReply {
            users: records
                .iter()
                .map(|record| AdminMonthRecommendItem {
                    user_id: record.user_id,
                    address: address_of(&users, record.user_id),
                    recommend_user_id: record.recommend_user_id,
                    recommend_address: address_of(&users, record.recommend_user_id),
                    date: display_time(&record.date),
                })
                .collect(),
            total,
        })
    }

    /// All config entries.
    pub fn config_list(conn: &Connection) -> Result<AdminConfigReply, DomainError> {
        let entries = ConfigRepo::get_all(conn)?;
        Ok(AdminConfigReply {
            config: entries
                .iter()
                .map(|entry| AdminConfigItem {
                    id: entry.id,
                    name: entry.name.clone(),
                    value: entry.value.clone(),
                })
                .collect(),
        })
    }

    /// Update one config entry's value.
    pub fn config_update(
        conn: &Connection,
        id: i64,
        value: &str,
    ) -> Result<StatusReply, DomainError> {
        if ConfigRepo::update_value(conn, id, value)? {
            info!(config_id = id, "config updated");
            Ok(StatusReply::ok())
        } else {
            Ok(StatusReply::fail())
        }
    }

    /// Withdraws awaiting the payout worker.
    pub fn withdraws_pending(conn: &Connection) -> Result<Vec<Withdraw>, DomainError> {
        Ok(WithdrawRepo::list_pass_or_rewarded(conn)?)
    }

    /// Mark a withdraw picked up by the payout worker.
    pub fn withdraw_doing(conn: &Connection, id: i64) -> Result<Withdraw, DomainError> {
        Ok(WithdrawRepo::update_status(conn, id, STATUS_DOING)?)
    }

    /// Mark a withdraw paid out.
    pub fn withdraw_success(conn: &Connection, id: i64) -> Result<Withdraw, DomainError> {
        Ok(WithdrawRepo::update_status(conn, id, STATUS_SUCCESS)?)
    }

    /// Platform-wide totals.
    pub fn totals(conn: &Connection) -> Result<AdminTotalsReply, DomainError> {
        let cutoff = format_iso(daily_cutoff(Utc::now()));
        Ok(AdminTotalsReply {
            total_users: UserRepo::count(conn)?,
            today_users: UserRepo::count_since(conn, &cutoff)?,
            total_deposit: format_amount(BalanceRepo::deposit_total(conn, None)?, 4),
            today_deposit: format_amount(BalanceRepo::deposit_total(conn, Some(&cutoff))?, 4),
            total_withdraw: format_amount(BalanceRepo::withdraw_total(conn, None)?, 4),
            today_withdraw: format_amount(BalanceRepo::withdraw_total(conn, Some(&cutoff))?, 4),
            total_reward: format_amount(RewardRepo::platform_total(conn)?, 4),
        })
    }
}
