//! RPC handler modules and registration.

pub mod admin;
pub mod auth;
pub mod balance_reward;
pub mod reward;
pub mod user;
pub mod withdraw;

use serde::Serialize;
use serde_json::Value;

use crate::errors::RpcError;
use crate::registry::MethodRegistry;

/// Register all RPC handlers with the registry.
pub fn register_all(registry: &mut MethodRegistry) {
    // Auth
    registry.register("auth.ethAuthorize", auth::EthAuthorizeHandler);
    registry.register("deposit", auth::DepositHandler);

    // User
    registry.register("user.info", user::UserInfoHandler);
    registry.register("user.recommendUpdate", user::RecommendUpdateHandler);

    // Rewards
    registry.register("reward.list", reward::RewardListHandler);
    registry.register("reward.recommendList", reward::RecommendRewardListHandler);
    registry.register("reward.feeList", reward::FeeRewardListHandler);

    // Withdrawals
    registry.register("withdraw.list", withdraw::WithdrawListHandler);
    registry.register("withdraw.create", withdraw::WithdrawCreateHandler);

    // Balance rewards
    registry.register("balanceReward.set", balance_reward::SetBalanceRewardHandler);
    registry.register(
        "balanceReward.delete",
        balance_reward::DeleteBalanceRewardHandler,
    );

    // Admin
    registry.register("admin.userList", admin::UserListHandler);
    registry.register("admin.rewardList", admin::RewardListHandler);
    registry.register("admin.locationList", admin::LocationListHandler);
    registry.register("admin.withdrawList", admin::WithdrawListHandler);
    registry.register("admin.userRecommend", admin::UserRecommendHandler);
    registry.register("admin.monthRecommend", admin::MonthRecommendHandler);
    registry.register("admin.config", admin::ConfigHandler);
    registry.register("admin.configUpdate", admin::ConfigUpdateHandler);
    registry.register("admin.withdraw", admin::WithdrawHandler);
    registry.register("admin.all", admin::TotalsHandler);
}

// ── Param helpers ───────────────────────────────────────────────────

/// Require a string parameter.
pub(crate) fn require_string_param(params: Option<&Value>, key: &str) -> Result<String, RpcError> {
    params
        .and_then(|p| p.get(key))
        .and_then(Value::as_str)
        .map(String::from)
        .ok_or_else(|| RpcError::InvalidParams {
            message: format!("Missing required parameter: {key}"),
        })
}

/// Optional string parameter.
pub(crate) fn optional_string_param(params: Option<&Value>, key: &str) -> Option<String> {
    params
        .and_then(|p| p.get(key))
        .and_then(Value::as_str)
        .map(String::from)
}

/// Optional integer parameter.
pub(crate) fn optional_i64_param(params: Option<&Value>, key: &str) -> Option<i64> {
    params.and_then(|p| p.get(key)).and_then(Value::as_i64)
}

/// Required integer parameter.
pub(crate) fn require_i64_param(params: Option<&Value>, key: &str) -> Result<i64, RpcError> {
    optional_i64_param(params, key).ok_or_else(|| RpcError::InvalidParams {
        message: format!("Missing required parameter: {key}"),
    })
}

/// Page request from `page`/`pageSize` params with sane bounds.
pub(crate) fn page_param(params: Option<&Value>) -> arbor_store::models::Pagination {
    let page = params
        .and_then(|p| p.get("page"))
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(1);
    let page_size = params
        .and_then(|p| p.get("pageSize"))
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(20)
        .min(200);
    arbor_store::models::Pagination::new(page, page_size)
}

/// Serialize a reply into a JSON value.
pub(crate) fn to_value<T: Serialize>(reply: &T) -> Result<Value, RpcError> {
    serde_json::to_value(reply).map_err(|e| RpcError::Internal {
        message: e.to_string(),
    })
}

// ── Test support ────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod test_helpers {
    use arbor_auth::{Claims, USER_TYPE_USER};
    use arbor_settings::ArborSettings;
    use arbor_store::{ConnectionConfig, new_in_memory, run_migrations};

    use crate::context::{RequestScope, RpcContext};

    /// Context over a fresh in-memory database.
    pub fn make_test_context() -> RpcContext {
        let pool = new_in_memory(&ConnectionConfig::default()).unwrap();
        {
            let conn = pool.get().unwrap();
            let _ = run_migrations(&conn).unwrap();
        }
        RpcContext {
            pool,
            settings: ArborSettings::default(),
        }
    }

    /// Scope authenticated as the given user.
    pub fn user_scope(user_id: i64) -> RequestScope {
        RequestScope::authenticated(Claims {
            user_id,
            user_type: USER_TYPE_USER.to_string(),
            iss: "arbor".to_string(),
            nbf: 0,
            exp: i64::MAX,
        })
    }

    /// Register a user through the real authorize flow and return their id.
    pub fn register_user(ctx: &RpcContext, tag: &str) -> i64 {
        let mut conn = ctx.pool.get().unwrap();
        let address = format!("0x{tag:0<40}");
        arbor_domain::UserService::authorize(
            &mut conn,
            &ctx.settings.platform,
            &address,
            &ctx.settings.platform.root_invite_code,
        )
        .unwrap()
        .id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_all_registers_every_method() {
        let mut registry = MethodRegistry::new();
        register_all(&mut registry);
        assert_eq!(registry.len(), 21);
    }

    #[test]
    fn require_string_param_missing() {
        let err = require_string_param(None, "address").unwrap_err();
        assert_eq!(err.code(), crate::errors::INVALID_PARAMS);
    }

    #[test]
    fn page_param_defaults_and_bounds() {
        let page = page_param(None);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 20);

        let params = serde_json::json!({"page": 0, "pageSize": 100_000});
        let page = page_param(Some(&params));
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 200);
    }
}
