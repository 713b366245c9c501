//! End-to-end business-rule tests over an in-memory database.
//!
//! Fixtures register users through the real authorize flow so referral
//! codes stay consistent with production writes.

use rusqlite::Connection;

use arbor_core::invite_code;
use arbor_domain::replies::StatusReply;
use arbor_domain::{AdminService, UserService};
use arbor_settings::PlatformSettings;
use arbor_store::models::{NewLocation, NewReward, Pagination};
use arbor_store::repositories::{BalanceRepo, LocationRepo, RecommendRepo, RewardRepo, AreaRepo};
use arbor_store::run_migrations;

fn setup() -> (Connection, PlatformSettings) {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    let _ = run_migrations(&conn).unwrap();
    (conn, PlatformSettings::default())
}

fn register_root(conn: &mut Connection, platform: &PlatformSettings, tag: &str) -> i64 {
    let address = format!("0x{tag:0<40}");
    UserService::authorize(conn, platform, &address, &platform.root_invite_code)
        .unwrap()
        .id
}

fn register_under(
    conn: &mut Connection,
    platform: &PlatformSettings,
    tag: &str,
    referrer_id: i64,
) -> i64 {
    let address = format!("0x{tag:0<40}");
    UserService::authorize(conn, platform, &address, &invite_code(referrer_id))
        .unwrap()
        .id
}

fn fund(conn: &Connection, user_id: i64, amount: i64) {
    let _ = BalanceRepo::deposit(conn, user_id, amount, "usdt").unwrap();
}

// ── Registration ────────────────────────────────────────────────────

#[test]
fn authorize_creates_full_row_set() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");

    let info = UserService::user_info(&conn, &platform, root).unwrap();
    assert_eq!(info.status, "no");
    assert_eq!(info.recommend_num, 0);
    assert_eq!(info.recommend_team_num, 0);
    assert_eq!(info.balance_usdt, "0.0000");
    assert_eq!(info.invite_url, invite_code(root));
    assert_eq!(info.invite_user_address, "");
}

#[test]
fn authorize_is_idempotent_per_address() {
    let (mut conn, platform) = setup();
    let address = format!("0x{:0<40}", "same");
    let first = UserService::authorize(&mut conn, &platform, &address, &platform.root_invite_code)
        .unwrap();
    // A bad invite code is irrelevant for an existing address.
    let second = UserService::authorize(&mut conn, &platform, &address, "garbage").unwrap();
    assert_eq!(first.id, second.id);
}

#[test]
fn authorize_rejects_short_address() {
    let (mut conn, platform) = setup();
    let err =
        UserService::authorize(&mut conn, &platform, "0xshort", &platform.root_invite_code)
            .unwrap_err();
    assert!(matches!(err, arbor_domain::DomainError::InvalidAddress));
}

#[test]
fn authorize_rejects_unknown_referrer() {
    let (mut conn, platform) = setup();
    let address = format!("0x{:0<40}", "orphan");
    let err =
        UserService::authorize(&mut conn, &platform, &address, &invite_code(999)).unwrap_err();
    assert!(matches!(err, arbor_domain::DomainError::InvalidCode));
}

#[test]
fn referral_chain_builds_ancestry_codes() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    let child = register_under(&mut conn, &platform, "child", root);
    let grandchild = register_under(&mut conn, &platform, "grand", child);

    let child_row = RecommendRepo::get_by_user(&conn, child).unwrap().unwrap();
    assert_eq!(child_row.recommend_code, format!("D{root}"));
    let grand_row = RecommendRepo::get_by_user(&conn, grandchild).unwrap().unwrap();
    assert_eq!(grand_row.recommend_code, format!("D{root}D{child}"));
}

#[test]
fn referral_updates_recommend_counters() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    let _ = register_under(&mut conn, &platform, "childa", root);
    let _ = register_under(&mut conn, &platform, "childb", root);

    let info = UserService::user_info(&conn, &platform, root).unwrap();
    assert_eq!(info.recommend_num, 2);
    assert_eq!(info.recommend_team_num, 2);
}

// ── Dashboard ───────────────────────────────────────────────────────

#[test]
fn dashboard_team_counts_whole_subtree() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    let child = register_under(&mut conn, &platform, "child", root);
    let _ = register_under(&mut conn, &platform, "grand", child);

    let info = UserService::user_info(&conn, &platform, root).unwrap();
    assert_eq!(info.recommend_num, 1);
    assert_eq!(info.recommend_team_num, 2);

    let child_info = UserService::user_info(&conn, &platform, child).unwrap();
    assert_eq!(child_info.invite_user_address, format!("0x{:0<40}", "root"));
}

#[test]
fn dashboard_aggregates_rewards_by_reason() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    for (amount, reason) in [
        (10_000_000_000, "recommend"),
        (20_000_000_000, "recommend_team"),
        (30_000_000_000, "daily_recommend_area"),
        (40_000_000_000, "location_daily_reward"),
    ] {
        let _ = RewardRepo::insert(
            &conn,
            &NewReward {
                user_id: root,
                amount,
                reason: reason.to_string(),
                ..NewReward::default()
            },
        )
        .unwrap();
    }

    let info = UserService::user_info(&conn, &platform, root).unwrap();
    assert_eq!(info.total, "10.0000");
    assert_eq!(info.recommend_total, "1.0000");
    assert_eq!(info.recommend_team_total, "2.0000");
    assert_eq!(info.recommend_area_total, "3.0000");
    assert_eq!(info.location_reward_total, "4.0000");
    // All four rewards landed inside the current settlement window.
    assert_eq!(info.today_reward, "10.0000");
}

#[test]
fn dashboard_location_status_progression() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");

    // A stopped slot alone: status "stop".
    let _ = LocationRepo::create(
        &conn,
        &NewLocation {
            user_id: root,
            status: "stop".to_string(),
            stop_date: "2020-01-01T00:00:00Z".to_string(),
            ..NewLocation::default()
        },
    )
    .unwrap();
    let info = UserService::user_info(&conn, &platform, root).unwrap();
    assert_eq!(info.status, "stop");
    assert_eq!(info.location_count, 1);

    // A running slot with no payout yet: status "yes".
    let _ = LocationRepo::create(
        &conn,
        &NewLocation {
            user_id: root,
            current_max: 50_000_000_000,
            ..NewLocation::default()
        },
    )
    .unwrap();
    let info = UserService::user_info(&conn, &platform, root).unwrap();
    assert_eq!(info.status, "yes");

    // A running slot with accrued payout: status "running" plus the sum.
    let _ = LocationRepo::create(
        &conn,
        &NewLocation {
            user_id: root,
            current: 25_000_000_000,
            current_max: 50_000_000_000,
            ..NewLocation::default()
        },
    )
    .unwrap();
    let info = UserService::user_info(&conn, &platform, root).unwrap();
    assert_eq!(info.status, "running");
    assert_eq!(info.amount, "2.50");
}

#[test]
fn dashboard_area_tier_from_direct_branches() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    let a = register_under(&mut conn, &platform, "childa", root);
    let b = register_under(&mut conn, &platform, "childb", root);
    let c = register_under(&mut conn, &platform, "childc", root);

    // Branch totals at area scale (1e5): a=9000, b=2000, c=1500.
    AreaRepo::set_amounts(&conn, a, 800_000_000, 100_000_000).unwrap();
    AreaRepo::set_amounts(&conn, b, 150_000_000, 50_000_000).unwrap();
    AreaRepo::set_amounts(&conn, c, 100_000_000, 50_000_000).unwrap();

    let info = UserService::user_info(&conn, &platform, root).unwrap();
    // Small area drops the largest branch: 2000 + 1500 = 3500.
    assert_eq!(info.area_amount, "3500.0000");
    assert_eq!(info.area_max_amount, "9000.0000");
    // 3500 clears the V1 threshold (1000) but not V2 (5000).
    assert_eq!(info.area_name, "V1");
}

#[test]
fn dashboard_area_level_override_wins() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    AreaRepo::set_level(&conn, root, 3).unwrap();

    let info = UserService::user_info(&conn, &platform, root).unwrap();
    assert_eq!(info.area_name, "V3");
}

// ── Rebinding ───────────────────────────────────────────────────────

#[test]
fn rebind_moves_subtree_to_new_referrer() {
    let (mut conn, platform) = setup();
    let first = register_root(&mut conn, &platform, "first");
    let second = register_root(&mut conn, &platform, "second");
    let user = register_under(&mut conn, &platform, "mover", first);
    let descendant = register_under(&mut conn, &platform, "below", user);

    let reply =
        UserService::update_recommend(&mut conn, &platform, user, &invite_code(second)).unwrap();
    assert_eq!(reply.invite_user_address, format!("0x{:0<40}", "second"));

    let moved = RecommendRepo::get_by_user(&conn, user).unwrap().unwrap();
    assert_eq!(moved.recommend_code, format!("D{second}"));
    let below = RecommendRepo::get_by_user(&conn, descendant).unwrap().unwrap();
    assert_eq!(below.recommend_code, format!("D{second}D{user}"));
}

#[test]
fn rebind_same_referrer_is_a_noop() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    let user = register_under(&mut conn, &platform, "child", root);

    let reply =
        UserService::update_recommend(&mut conn, &platform, user, &invite_code(root)).unwrap();
    assert_eq!(reply.invite_user_address, format!("0x{:0<40}", "root"));
}

#[test]
fn rebind_blocked_after_first_location() {
    let (mut conn, platform) = setup();
    let first = register_root(&mut conn, &platform, "first");
    let second = register_root(&mut conn, &platform, "second");
    let user = register_under(&mut conn, &platform, "locked", first);
    let _ = LocationRepo::create(
        &conn,
        &NewLocation {
            user_id: user,
            current_max: 100,
            ..NewLocation::default()
        },
    )
    .unwrap();

    let reply =
        UserService::update_recommend(&mut conn, &platform, user, &invite_code(second)).unwrap();
    // Still bound to the first referrer.
    assert_eq!(reply.invite_user_address, format!("0x{:0<40}", "first"));
    let row = RecommendRepo::get_by_user(&conn, user).unwrap().unwrap();
    assert_eq!(row.recommend_code, format!("D{first}"));
}

#[test]
fn rebind_rejects_own_descendant() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    let user = register_under(&mut conn, &platform, "parent", root);
    let child = register_under(&mut conn, &platform, "child", user);

    let err = UserService::update_recommend(&mut conn, &platform, user, &invite_code(child))
        .unwrap_err();
    assert!(matches!(err, arbor_domain::DomainError::InvalidCode));
}

#[test]
fn rebind_rejects_garbage_code() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "root");
    let user = register_under(&mut conn, &platform, "child", root);

    let err =
        UserService::update_recommend(&mut conn, &platform, user, "!!!not-base64!!!").unwrap_err();
    assert!(matches!(err, arbor_domain::DomainError::InvalidCode));
}

// ── Withdrawals ─────────────────────────────────────────────────────

#[test]
fn withdraw_happy_path() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "rich");
    fund(&conn, user, 100_000_000_000); // 10 USDT

    let reply = UserService::withdraw(&mut conn, user, "usdt", "4").unwrap();
    assert_eq!(reply.status, "ok");

    let balance = BalanceRepo::get_by_user(&conn, user).unwrap().unwrap();
    assert_eq!(balance.balance_usdt, 60_000_000_000);

    let listing = UserService::withdraw_list(&conn, user, None).unwrap();
    assert_eq!(listing.withdraws.len(), 1);
    assert_eq!(listing.withdraws[0].amount, "4.00");
    assert_eq!(listing.withdraws[0].status, "rewarded");
}

#[test]
fn withdraw_validation_failures_are_status_fail() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "poor");
    fund(&conn, user, 10_000_000_000); // 1 USDT

    for (coin, amount) in [
        ("doge", "1"),  // unknown coin
        ("usdt", "0"),  // non-positive
        ("usdt", "-1"), // negative
        ("usdt", "x"),  // unparseable
        ("usdt", "2"),  // over balance
    ] {
        let reply = UserService::withdraw(&mut conn, user, coin, amount).unwrap();
        assert_eq!(reply.status, "fail", "coin={coin} amount={amount}");
    }

    // Nothing was debited by the failed attempts.
    let balance = BalanceRepo::get_by_user(&conn, user).unwrap().unwrap();
    assert_eq!(balance.balance_usdt, 10_000_000_000);
}

#[test]
fn withdraw_dhb_uses_dhb_balance() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "coins");
    let _ = BalanceRepo::deposit(&conn, user, 50_000_000_000, "dhb").unwrap();

    let reply = UserService::withdraw(&mut conn, user, "dhb", "5").unwrap();
    assert_eq!(reply.status, "ok");
    let balance = BalanceRepo::get_by_user(&conn, user).unwrap().unwrap();
    assert_eq!(balance.balance_dhb, 0);
    assert_eq!(balance.balance_usdt, 0);
}

// ── Balance rewards ─────────────────────────────────────────────────

#[test]
fn balance_reward_allocate_and_release_across_rows() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "saver");
    fund(&conn, user, 100_000_000_000); // 10 USDT

    assert_eq!(
        UserService::set_balance_reward(&mut conn, user, "3").unwrap().status,
        "ok"
    );
    assert_eq!(
        UserService::set_balance_reward(&mut conn, user, "2").unwrap().status,
        "ok"
    );
    let balance = BalanceRepo::get_by_user(&conn, user).unwrap().unwrap();
    assert_eq!(balance.balance_usdt, 50_000_000_000);

    let info = UserService::user_info(&conn, &platform, user).unwrap();
    assert_eq!(info.amount_balance_reward, "5.0000");

    // Release 4: consumes the first row (3) and part of the second (1).
    let reply = UserService::delete_balance_reward(&mut conn, user, "4").unwrap();
    assert_eq!(reply.status, "ok");

    let balance = BalanceRepo::get_by_user(&conn, user).unwrap().unwrap();
    assert_eq!(balance.balance_usdt, 90_000_000_000);
    let info = UserService::user_info(&conn, &platform, user).unwrap();
    assert_eq!(info.amount_balance_reward, "1.0000");
}

#[test]
fn balance_reward_release_failures() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "empty");
    fund(&conn, user, 10_000_000_000);

    let reply = UserService::delete_balance_reward(&mut conn, user, "1").unwrap();
    assert_eq!(reply.status, "no balance reward records");

    assert_eq!(
        UserService::set_balance_reward(&mut conn, user, "1").unwrap().status,
        "ok"
    );
    let reply = UserService::delete_balance_reward(&mut conn, user, "2").unwrap();
    assert_eq!(reply.status, "insufficient balance reward");
}

#[test]
fn balance_reward_allocate_over_balance_fails() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "broke");
    fund(&conn, user, 10_000_000_000);

    let reply: StatusReply = UserService::set_balance_reward(&mut conn, user, "2").unwrap();
    assert_eq!(reply.status, "fail");
}

// ── Reward listings ─────────────────────────────────────────────────

#[test]
fn reward_listings_split_by_reason() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "lists");
    for (amount, reason) in [
        (10_000_000_000_i64, "recommend"),
        (20_000_000_000, "fee"),
        (30_000_000_000, "location_daily_reward"),
    ] {
        let _ = RewardRepo::insert(
            &conn,
            &NewReward {
                user_id: user,
                amount,
                reason: reason.to_string(),
                ..NewReward::default()
            },
        )
        .unwrap();
    }

    let all = UserService::reward_list(&conn, user, &Pagination::default()).unwrap();
    assert_eq!(all.total, 3);
    assert_eq!(all.rewards[0].amount, "3.0000"); // newest first

    let recommend = UserService::recommend_reward_list(&conn, user).unwrap();
    assert_eq!(recommend.total, 1);
    assert_eq!(recommend.rewards[0].reason, "recommend");

    let fees = UserService::fee_reward_list(&conn, user).unwrap();
    assert_eq!(fees.total, 1);
    assert_eq!(fees.rewards[0].amount, "2.0000");
}

// ── Admin ───────────────────────────────────────────────────────────

#[test]
fn admin_withdraw_queue_advances() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "queue");
    fund(&conn, user, 100_000_000_000);
    let _ = UserService::withdraw(&mut conn, user, "usdt", "5").unwrap();

    let pending = AdminService::withdraws_pending(&conn).unwrap();
    assert_eq!(pending.len(), 1);

    let doing = AdminService::withdraw_doing(&conn, pending[0].id).unwrap();
    assert_eq!(doing.status, "doing");
    assert!(AdminService::withdraws_pending(&conn).unwrap().is_empty());

    let done = AdminService::withdraw_success(&conn, pending[0].id).unwrap();
    assert_eq!(done.status, "success");
}

#[test]
fn admin_totals_reflect_activity() {
    let (mut conn, platform) = setup();
    let user = register_root(&mut conn, &platform, "stats");
    fund(&conn, user, 100_000_000_000);
    let _ = UserService::withdraw(&mut conn, user, "usdt", "2").unwrap();

    let totals = AdminService::totals(&conn).unwrap();
    assert_eq!(totals.total_users, 1);
    assert_eq!(totals.today_users, 1);
    assert_eq!(totals.total_deposit, "10.0000");
    assert_eq!(totals.total_withdraw, "2.0000");
}

#[test]
fn admin_user_list_joins_profile_and_balance() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "admina");
    let _ = register_under(&mut conn, &platform, "adminb", root);
    fund(&conn, root, 30_000_000_000);

    let reply = AdminService::user_list(&conn, &Pagination::default(), None).unwrap();
    assert_eq!(reply.total, 2);
    let root_item = reply
        .users
        .iter()
        .find(|item| item.user_id == root)
        .unwrap();
    assert_eq!(root_item.history_recommend, 1);
    assert_eq!(root_item.balance_usdt, "3.0000");
}

#[test]
fn admin_recommend_list_returns_direct_children() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "tree");
    let child = register_under(&mut conn, &platform, "leafa", root);
    let _ = register_under(&mut conn, &platform, "leafb", child);

    let reply = AdminService::recommend_list(&conn, root).unwrap();
    assert_eq!(reply.users.len(), 1);
    assert_eq!(reply.users[0].user_id, child);
}

#[test]
fn admin_config_roundtrip() {
    let (conn, _platform) = setup();
    let listing = AdminService::config_list(&conn).unwrap();
    assert!(listing.config.len() >= 7);

    let coin_price = listing
        .config
        .iter()
        .find(|entry| entry.name == "Coin price")
        .unwrap();
    let reply = AdminService::config_update(&conn, coin_price.id, "4200").unwrap();
    assert_eq!(reply.status, "ok");

    let listing = AdminService::config_list(&conn).unwrap();
    let updated = listing
        .config
        .iter()
        .find(|entry| entry.id == coin_price.id)
        .unwrap();
    assert_eq!(updated.value, "4200");

    assert_eq!(
        AdminService::config_update(&conn, 99_999, "x").unwrap().status,
        "fail"
    );
}

#[test]
fn admin_month_recommend_lists_current_month() {
    let (mut conn, platform) = setup();
    let root = register_root(&mut conn, &platform, "months");
    let _ = register_under(&mut conn, &platform, "fresh", root);

    let reply = AdminService::month_recommend(&conn, &Pagination::default()).unwrap();
    assert_eq!(reply.total, 1);
    assert_eq!(reply.users[0].user_id, root);
}
