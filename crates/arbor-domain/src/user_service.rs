//! User-facing business logic.
//!
//! Wraps the repositories with the platform's business rules:
//!
//! - **Registration** creates the user, profile, referral row, area row,
//!   and balance row in one transaction, and credits the referrer's
//!   recommend counters.
//! - **Rebinding** is only possible before the first deposit; moving a user
//!   rewrites the ancestry of their whole subtree.
//! - **Dashboard** aggregates locations, withdraws, rewards by reason, the
//!   team subtree, and the small-area tier in one pass.
//! - **Withdraw / balance reward** flows report validation failures as a
//!   `status` string, not an error value.

use chrono::{Duration, Utc};
use rusqlite::Connection;
use tracing::info;

use arbor_core::{
    decode_invite_code, direct_referrer, format_amount, format_scaled, invite_code, parse_amount,
    subtree_prefix, AREA_SCALE, PRICE_SCALE,
};
use arbor_settings::PlatformSettings;
use arbor_store::models::{ConfigEntry, Pagination, Reward, User};
use arbor_store::repositories::balance::{COIN_DHB, COIN_USDT};
use arbor_store::repositories::balance_reward::{STATUS_ACTIVE, STATUS_CONSUMED};
use arbor_store::repositories::location::STATUS_RUNNING;
use arbor_store::repositories::{
    AreaRepo, BalanceRepo, BalanceRewardRepo, ConfigRepo, LocationRepo, MonthRecommendRepo,
    RecommendRepo, RewardRepo, UserInfoRepo, UserRepo, WithdrawRepo,
};
use arbor_store::time::{format_iso, now_iso, parse_iso};
use arbor_store::StoreError;

use crate::clock::{daily_cutoff, display_time};
use crate::errors::DomainError;
use crate::reasons;
use crate::replies::{
    RecommendUpdateReply, RewardItem, RewardListReply, StatusReply, UserInfoReply, WithdrawItem,
    WithdrawListReply,
};

/// Config keys read by the dashboard.
const DASHBOARD_CONFIG_KEYS: &[&str] = &[
    "user_count",
    "coin_price",
    "time_again",
    "recommend_area_one",
    "recommend_area_two",
    "recommend_area_three",
    "recommend_area_four",
];

fn config_value<'a>(entries: &'a [ConfigEntry], key: &str) -> Option<&'a ConfigEntry> {
    entries.iter().find(|entry| entry.key_name == key)
}

fn config_i64(entries: &[ConfigEntry], key: &str) -> i64 {
    config_value(entries, key)
        .and_then(|entry| entry.value.parse().ok())
        .unwrap_or(0)
}

fn reward_item(reward: &Reward) -> RewardItem {
    RewardItem {
        created_at: display_time(&reward.created_at),
        amount: format_amount(reward.amount, 4),
        reason: reward.reason.clone(),
        location_type: reward.location_type.clone(),
    }
}

/// User service with business logic and validation.
pub struct UserService;

impl UserService {
    /// Look up a user by address, creating them on first sight.
    ///
    /// New registrations need a valid invite code resolving to an existing
    /// referrer, unless the code is the configured root invite code. All
    /// rows for the new user are created in one transaction, together with
    /// the referrer's recommend counters.
    pub fn authorize(
        conn: &mut Connection,
        platform: &PlatformSettings,
        address: &str,
        invite: &str,
    ) -> Result<User, DomainError> {
        if address.len() < 20 {
            return Err(DomainError::InvalidAddress);
        }
        if let Some(user) = UserRepo::get_by_address(conn, address)? {
            return Ok(user);
        }

        let referrer = if invite == platform.root_invite_code {
            None
        } else {
            let referrer_id = decode_invite_code(invite)?;
            let row = RecommendRepo::get_by_user(conn, referrer_id)?
                .ok_or(DomainError::InvalidCode)?;
            Some(row)
        };

        let tx = conn.transaction().map_err(StoreError::from)?;
        let user = UserRepo::create(&tx, address)?;
        let _ = UserInfoRepo::create(&tx, user.id)?;
        let ancestry = referrer
            .as_ref()
            .map(|row| subtree_prefix(&row.recommend_code, row.user_id))
            .unwrap_or_default();
        let _ = RecommendRepo::create(&tx, user.id, &ancestry)?;
        let _ = AreaRepo::create(&tx, user.id)?;
        let _ = BalanceRepo::create(&tx, user.id)?;
        if let Some(row) = &referrer {
            UserInfoRepo::increment_history_recommend(&tx, row.user_id)?;
            let _ = MonthRecommendRepo::insert(&tx, row.user_id, user.id, &now_iso())?;
        }
        tx.commit().map_err(StoreError::from)?;

        info!(user_id = user.id, "registered new user");
        Ok(user)
    }

    /// The dashboard aggregation.
    #[allow(clippy::too_many_lines)]
    pub fn user_info(
        conn: &Connection,
        platform: &PlatformSettings,
        user_id: i64,
    ) -> Result<UserInfoReply, DomainError> {
        let configs = ConfigRepo::get_by_keys(conn, DASHBOARD_CONFIG_KEYS)?;
        let user_count = config_value(&configs, "user_count")
            .map(|entry| entry.value.clone())
            .unwrap_or_default();
        let coin_price = config_i64(&configs, "coin_price");
        let time_again = config_i64(&configs, "time_again");
        let tiers: Vec<(i64, String)> = [
            "recommend_area_one",
            "recommend_area_two",
            "recommend_area_three",
            "recommend_area_four",
        ]
        .iter()
        .map(|key| {
            (
                config_i64(&configs, key),
                config_value(&configs, key)
                    .map(|entry| entry.name.clone())
                    .unwrap_or_default(),
            )
        })
        .collect();

        let user = UserRepo::get_by_id(conn, user_id)?.ok_or(StoreError::UserNotFound(user_id))?;
        let info = UserInfoRepo::get_by_user(conn, user.id)?
            .ok_or_else(|| StoreError::InvalidOperation(format!("user {user_id} has no profile")))?;

        // Location status: no slots at all, all stopped, running but not yet
        // paying, or running with an accrued payout.
        let locations = LocationRepo::list_by_user(conn, user.id)?;
        let mut status = "no".to_string();
        let mut amount = "0".to_string();
        if !locations.is_empty() {
            status = "stop".to_string();
            let mut total_current = 0;
            for location in &locations {
                if location.status == STATUS_RUNNING {
                    status = "yes".to_string();
                    total_current += location.current;
                }
            }
            if total_current > 0 {
                status = "running".to_string();
                amount = format_amount(total_current, 2);
            }
        }
        #[allow(clippy::cast_possible_wrap)]
        let location_count = locations.len() as i64;

        let withdraws = WithdrawRepo::list_by_user(conn, user.id, None)?;
        let withdraw_total: i64 = withdraws.iter().map(|w| w.rel_amount).sum();

        let total_deposit = BalanceRepo::user_deposit_total(conn, user.id)?;

        // Recently stopped slots still inside the relocation window carry
        // their payout shortfall and frozen coin forward.
        let now = Utc::now();
        let mut relocation_amount = 0;
        let mut stop_coin_total = 0;
        for location in LocationRepo::last_stopped_by_user(conn, user.id)? {
            if let Some(stopped_at) = parse_iso(&location.stop_date) {
                if now < stopped_at + Duration::minutes(time_again) {
                    relocation_amount += location.current - location.current_max;
                    stop_coin_total += location.stop_coin;
                }
            }
        }

        let balance = BalanceRepo::get_by_user(conn, user.id)?
            .ok_or_else(|| StoreError::InvalidOperation(format!("user {user_id} has no balance")))?;
        let recommend = RecommendRepo::get_by_user(conn, user.id)?
            .ok_or_else(|| StoreError::InvalidOperation(format!("user {user_id} has no referral row")))?;

        let mut invite_user_address = String::new();
        if !recommend.recommend_code.is_empty() {
            let referrer_id = direct_referrer(&recommend.recommend_code).unwrap_or(0);
            let referrer = UserRepo::get_by_id(conn, referrer_id)?
                .ok_or(StoreError::UserNotFound(referrer_id))?;
            invite_user_address = referrer.address;
        }
        let my_code = subtree_prefix(&recommend.recommend_code, user.id);

        #[allow(clippy::cast_possible_wrap)]
        let recommend_team_num = RecommendRepo::list_subtree(conn, &my_code)?.len() as i64;

        // Per-reason reward totals.
        let mut reward_total = 0;
        let mut recommend_total = 0;
        let mut recommend_team_total = 0;
        let mut recommend_area_total = 0;
        let mut location_daily_total = 0;
        for reward in RewardRepo::list_by_user(conn, user.id)? {
            reward_total += reward.amount;
            match reward.reason.as_str() {
                reasons::RECOMMEND => recommend_total += reward.amount,
                reasons::RECOMMEND_TEAM => recommend_team_total += reward.amount,
                reasons::DAILY_RECOMMEND_AREA => recommend_area_total += reward.amount,
                reasons::LOCATION_DAILY_REWARD => location_daily_total += reward.amount,
                _ => {}
            }
        }
        let today_reward =
            RewardRepo::total_since(conn, user.id, &format_iso(daily_cutoff(now)))?;

        // Small-area computation: each direct child roots a branch; the
        // area amount is the subtree total minus its largest branch.
        let mut area_amount = 0;
        let mut max_area_amount = 0;
        let mut area_name = String::new();
        let direct_ids: Vec<i64> = RecommendRepo::list_direct(conn, &my_code)?
            .iter()
            .map(|row| row.user_id)
            .collect();
        if !direct_ids.is_empty() {
            let mut total_area = 0;
            for area in AreaRepo::get_by_users(conn, &direct_ids)? {
                let branch = area.amount + area.self_amount;
                total_area += branch;
                if branch > max_area_amount {
                    max_area_amount = branch;
                }
            }
            area_amount = total_area - max_area_amount;

            for (threshold, name) in &tiers {
                if area_amount >= *threshold {
                    area_name.clone_from(name);
                }
            }
        }

        // A manually assigned level takes precedence over the computed tier.
        if let Some(my_area) = AreaRepo::get_by_user(conn, user.id)? {
            if my_area.level > 0 {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let level = my_area.level.min(tiers.len() as i64) as usize;
                area_name.clone_from(&tiers[level - 1].1);
            }
        }

        let balance_reward_total: i64 = BalanceRewardRepo::list_active_by_user(conn, user.id)?
            .iter()
            .map(|row| row.amount)
            .sum();

        Ok(UserInfoReply {
            address: user.address,
            status,
            amount,
            balance_usdt: format_amount(balance.balance_usdt, 4),
            balance_dhb: format_amount(balance.balance_dhb, 4),
            invite_url: invite_code(user.id),
            invite_user_address,
            recommend_num: info.history_recommend,
            recommend_team_num,
            total: format_amount(reward_total, 4),
            withdraw_amount: format_amount(withdraw_total, 3),
            recommend_total: format_amount(recommend_total, 4),
            recommend_team_total: format_amount(recommend_team_total, 4),
            recommend_area_total: format_amount(recommend_area_total, 4),
            location_reward_total: format_amount(location_daily_total, 4),
            usdt_contract: platform.usdt_contract.clone(),
            collection_account: platform.collection_account.clone(),
            relocation_amount: format_amount(relocation_amount, 4),
            stop_coin_amount: format_amount(stop_coin_total, 4),
            user_count,
            total_deposit: format_amount(total_deposit, 4),
            location_count,
            today_reward: format_amount(today_reward, 4),
            coin_price: format_scaled(coin_price, PRICE_SCALE, 4),
            undo: user.undo,
            area_name,
            area_amount: format_scaled(area_amount, AREA_SCALE, 4),
            area_max_amount: format_scaled(max_area_amount, AREA_SCALE, 4),
            amount_balance_reward: format_amount(balance_reward_total, 4),
        })
    }

    /// Rebind the caller under a new referrer.
    ///
    /// No-ops (returning the current referrer's address) when the code is
    /// the root invite code, the referrer is unchanged, or the caller has
    /// already opened a location. Rebinding rewrites the ancestry of the
    /// caller's whole subtree.
    pub fn update_recommend(
        conn: &mut Connection,
        platform: &PlatformSettings,
        user_id: i64,
        invite: &str,
    ) -> Result<RecommendUpdateReply, DomainError> {
        let my_row = RecommendRepo::get_by_user(conn, user_id)?
            .ok_or_else(|| StoreError::InvalidOperation(format!("user {user_id} has no referral row")))?;

        let current_referrer = if my_row.recommend_code.is_empty() {
            None
        } else {
            let referrer_id = direct_referrer(&my_row.recommend_code).unwrap_or(0);
            UserRepo::get_by_id(conn, referrer_id)?
        };
        let current_address = current_referrer
            .as_ref()
            .map(|u| u.address.clone())
            .unwrap_or_default();

        if invite == platform.root_invite_code {
            return Ok(RecommendUpdateReply {
                invite_user_address: current_address,
            });
        }

        let target_id = decode_invite_code(invite)?;
        if current_referrer.as_ref().is_some_and(|u| u.id == target_id) {
            return Ok(RecommendUpdateReply {
                invite_user_address: current_address,
            });
        }

        // Binding is frozen once the user has opened a location.
        if !LocationRepo::list_by_user(conn, user_id)?.is_empty() {
            return Ok(RecommendUpdateReply {
                invite_user_address: current_address,
            });
        }

        let target_row =
            RecommendRepo::get_by_user(conn, target_id)?.ok_or(DomainError::InvalidCode)?;

        // Rebinding under yourself or your own descendant would cycle the tree.
        let target_in_own_subtree = target_row
            .recommend_code
            .split('D')
            .skip(1)
            .any(|segment| segment.parse::<i64>() == Ok(user_id));
        if target_id == user_id || target_in_own_subtree {
            return Err(DomainError::InvalidCode);
        }

        let target_user = UserRepo::get_by_id(conn, target_id)?
            .ok_or(StoreError::UserNotFound(target_id))?;
        let new_ancestry = subtree_prefix(&target_row.recommend_code, target_id);

        let tx = conn.transaction().map_err(StoreError::from)?;
        RecommendRepo::rebind(&tx, user_id, &new_ancestry)?;
        tx.commit().map_err(StoreError::from)?;

        info!(user_id, target_id, "rebound referrer");
        Ok(RecommendUpdateReply {
            invite_user_address: target_user.address,
        })
    }

    /// Paged reward history, newest first.
    pub fn reward_list(
        conn: &Connection,
        user_id: i64,
        page: &Pagination,
    ) -> Result<RewardListReply, DomainError> {
        let (rewards, total) = RewardRepo::list_paged(conn, page, Some(user_id), None)?;
        Ok(RewardListReply {
            rewards: rewards.iter().map(reward_item).collect(),
            total,
        })
    }

    /// Recommend-reason rewards, newest first.
    pub fn recommend_reward_list(
        conn: &Connection,
        user_id: i64,
    ) -> Result<RewardListReply, DomainError> {
        let mut rewards = RewardRepo::list_by_user(conn, user_id)?;
        rewards.retain(|reward| reasons::RECOMMEND_REASONS.contains(&reward.reason.as_str()));
        rewards.reverse();
        #[allow(clippy::cast_possible_wrap)]
        let total = rewards.len() as i64;
        Ok(RewardListReply {
            rewards: rewards.iter().map(reward_item).collect(),
            total,
        })
    }

    /// Fee rewards, newest first.
    pub fn fee_reward_list(
        conn: &Connection,
        user_id: i64,
    ) -> Result<RewardListReply, DomainError> {
        let mut rewards = RewardRepo::list_by_user(conn, user_id)?;
        rewards.retain(|reward| reward.reason == reasons::FEE);
        rewards.reverse();
        #[allow(clippy::cast_possible_wrap)]
        let total = rewards.len() as i64;
        Ok(RewardListReply {
            rewards: rewards.iter().map(reward_item).collect(),
            total,
        })
    }

    /// Withdraw history, newest first, optionally filtered by coin type.
    pub fn withdraw_list(
        conn: &Connection,
        user_id: i64,
        coin_type: Option<&str>,
    ) -> Result<WithdrawListReply, DomainError> {
        let withdraws = WithdrawRepo::list_by_user(conn, user_id, coin_type)?;
        Ok(WithdrawListReply {
            withdraws: withdraws
                .iter()
                .map(|w| WithdrawItem {
                    created_at: display_time(&w.created_at),
                    amount: format_amount(w.rel_amount, 2),
                    status: w.status.clone(),
                    coin_type: w.coin_type.clone(),
                })
                .collect(),
        })
    }

    /// Request a withdrawal.
    ///
    /// Validation failures (unknown coin, bad amount, short balance) reply
    /// `status: "fail"`; the debit and the withdraw row are written in one
    /// transaction.
    pub fn withdraw(
        conn: &mut Connection,
        user_id: i64,
        coin_type: &str,
        amount_input: &str,
    ) -> Result<StatusReply, DomainError> {
        if coin_type != COIN_USDT && coin_type != COIN_DHB {
            return Ok(StatusReply::fail());
        }
        let Some(amount) = parse_amount(amount_input) else {
            return Ok(StatusReply::fail());
        };
        if amount <= 0 {
            return Ok(StatusReply::fail());
        }

        let balance = BalanceRepo::get_by_user(conn, user_id)?
            .ok_or(StoreError::UserNotFound(user_id))?;
        let available = if coin_type == COIN_USDT {
            balance.balance_usdt
        } else {
            balance.balance_dhb
        };
        if available < amount {
            return Ok(StatusReply::fail());
        }

        let tx = conn.transaction().map_err(StoreError::from)?;
        let record_id = match BalanceRepo::withdraw(&tx, user_id, amount, coin_type) {
            Ok(record_id) => record_id,
            Err(StoreError::InsufficientBalance { .. }) => return Ok(StatusReply::fail()),
            Err(e) => return Err(e.into()),
        };
        let _ = WithdrawRepo::create(&tx, user_id, amount, amount, record_id, coin_type)?;
        tx.commit().map_err(StoreError::from)?;

        info!(user_id, amount, coin_type, "withdraw requested");
        Ok(StatusReply::ok())
    }

    /// Allocate spendable USDT into a discretionary balance reward.
    pub fn set_balance_reward(
        conn: &mut Connection,
        user_id: i64,
        amount_input: &str,
    ) -> Result<StatusReply, DomainError> {
        let Some(amount) = parse_amount(amount_input) else {
            return Ok(StatusReply::fail());
        };
        if amount <= 0 {
            return Ok(StatusReply::fail());
        }

        let balance = BalanceRepo::get_by_user(conn, user_id)?
            .ok_or(StoreError::UserNotFound(user_id))?;
        if balance.balance_usdt < amount {
            return Ok(StatusReply::fail());
        }

        let tx = conn.transaction().map_err(StoreError::from)?;
        match BalanceRewardRepo::allocate(&tx, user_id, amount) {
            Ok(_) => {}
            Err(StoreError::InsufficientBalance { .. }) => return Ok(StatusReply::fail()),
            Err(e) => return Err(e.into()),
        }
        tx.commit().map_err(StoreError::from)?;
        Ok(StatusReply::ok())
    }

    /// Release discretionary balance rewards back to the spendable balance.
    ///
    /// Walks active allocations oldest-first, each release in its own
    /// transaction, consuming rows as they are exhausted.
    pub fn delete_balance_reward(
        conn: &mut Connection,
        user_id: i64,
        amount_input: &str,
    ) -> Result<StatusReply, DomainError> {
        let Some(amount) = parse_amount(amount_input) else {
            return Ok(StatusReply::fail());
        };
        if amount <= 0 {
            return Ok(StatusReply::fail());
        }

        let rows = BalanceRewardRepo::list_active_by_user(conn, user_id)?;
        if rows.is_empty() {
            return Ok(StatusReply::message("no balance reward records"));
        }
        let total: i64 = rows.iter().map(|row| row.amount).sum();
        if total < amount {
            return Ok(StatusReply::message("insufficient balance reward"));
        }

        let mut owed = amount;
        for row in rows {
            let (take, status) = if owed < row.amount {
                (owed, STATUS_ACTIVE)
            } else {
                (row.amount, STATUS_CONSUMED)
            };

            let tx = conn.transaction().map_err(StoreError::from)?;
            BalanceRewardRepo::release(&tx, user_id, row.id, take, status)?;
            tx.commit().map_err(StoreError::from)?;

            owed -= take;
            if owed <= 0 {
                break;
            }
        }

        Ok(StatusReply::ok())
    }
}
