//! Admin handlers: platform listings, config updates, and the withdraw
//! payout queue.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::instrument;

use arbor_domain::AdminService;

use crate::context::{RequestScope, RpcContext};
use crate::errors::RpcError;
use crate::handlers::{
    optional_i64_param, optional_string_param, page_param, require_i64_param,
    require_string_param, to_value,
};
use crate::registry::MethodHandler;

/// Paged user listing with an optional address filter.
pub struct UserListHandler;

#[async_trait]
impl MethodHandler for UserListHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.userList"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let page = page_param(params.as_ref());
        let address = optional_string_param(params.as_ref(), "address");
        let conn = ctx.conn()?;
        let reply = AdminService::user_list(&conn, &page, address.as_deref())?;
        to_value(&reply)
    }
}

/// Paged reward listing with an optional user filter.
pub struct RewardListHandler;

#[async_trait]
impl MethodHandler for RewardListHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.rewardList"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let page = page_param(params.as_ref());
        let user_id = optional_i64_param(params.as_ref(), "userId");
        let conn = ctx.conn()?;
        let reply = AdminService::reward_list(&conn, &page, user_id)?;
        to_value(&reply)
    }
}

/// Paged location listing.
pub struct LocationListHandler;

#[async_trait]
impl MethodHandler for LocationListHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.locationList"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let page = page_param(params.as_ref());
        let conn = ctx.conn()?;
        let reply = AdminService::location_list(&conn, &page)?;
        to_value(&reply)
    }
}

/// Paged withdraw listing with an optional user filter.
pub struct WithdrawListHandler;

#[async_trait]
impl MethodHandler for WithdrawListHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.withdrawList"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let page = page_param(params.as_ref());
        let user_id = optional_i64_param(params.as_ref(), "userId");
        let conn = ctx.conn()?;
        let reply = AdminService::withdraw_list(&conn, &page, user_id)?;
        to_value(&reply)
    }
}

/// Direct referrals of one user.
pub struct UserRecommendHandler;

#[async_trait]
impl MethodHandler for UserRecommendHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.userRecommend"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = require_i64_param(params.as_ref(), "userId")?;
        let conn = ctx.conn()?;
        let reply = AdminService::recommend_list(&conn, user_id)?;
        to_value(&reply)
    }
}

/// Paged current-month recommend listing.
pub struct MonthRecommendHandler;

#[async_trait]
impl MethodHandler for MonthRecommendHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.monthRecommend"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let page = page_param(params.as_ref());
        let conn = ctx.conn()?;
        let reply = AdminService::month_recommend(&conn, &page)?;
        to_value(&reply)
    }
}

/// All config entries.
pub struct ConfigHandler;

#[async_trait]
impl MethodHandler for ConfigHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.config"))]
    async fn handle(
        &self,
        _params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let conn = ctx.conn()?;
        let reply = AdminService::config_list(&conn)?;
        to_value(&reply)
    }
}

/// Update one config entry.
pub struct ConfigUpdateHandler;

#[async_trait]
impl MethodHandler for ConfigUpdateHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.configUpdate"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let id = require_i64_param(params.as_ref(), "id")?;
        let value = require_string_param(params.as_ref(), "value")?;
        let conn = ctx.conn()?;
        let reply = AdminService::config_update(&conn, id, &value)?;
        to_value(&reply)
    }
}

/// Withdraw payout queue: without a `withdrawId`, list pending withdraws;
/// with one, advance it (`action`: `doing` or `success`).
pub struct WithdrawHandler;

#[async_trait]
impl MethodHandler for WithdrawHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.withdraw"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let conn = ctx.conn()?;

        let Some(withdraw_id) = optional_i64_param(params.as_ref(), "withdrawId") else {
            let pending = AdminService::withdraws_pending(&conn)?;
            let withdraws: Vec<Value> = pending
                .iter()
                .map(|w| {
                    json!({
                        "id": w.id,
                        "userId": w.user_id,
                        "amount": arbor_core::format_amount(w.amount, 2),
                        "status": w.status,
                        "coinType": w.coin_type,
                    })
                })
                .collect();
            return Ok(json!({ "withdraws": withdraws }));
        };

        let action = require_string_param(params.as_ref(), "action")?;
        let updated = match action.as_str() {
            "doing" => AdminService::withdraw_doing(&conn, withdraw_id)?,
            "success" => AdminService::withdraw_success(&conn, withdraw_id)?,
            other => {
                return Err(RpcError::InvalidParams {
                    message: format!("unknown action: {other}"),
                });
            }
        };
        Ok(json!({ "id": updated.id, "status": updated.status }))
    }
}

/// Platform totals.
pub struct TotalsHandler;

#[async_trait]
impl MethodHandler for TotalsHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "admin.all"))]
    async fn handle(
        &self,
        _params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let conn = ctx.conn()?;
        let reply = AdminService::totals(&conn)?;
        to_value(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_store::repositories::BalanceRepo;

    use crate::handlers::test_helpers::{make_test_context, register_user, user_scope};

    #[tokio::test]
    async fn user_list_includes_registered_users() {
        let ctx = make_test_context();
        let _ = register_user(&ctx, "lista");
        let _ = register_user(&ctx, "listb");

        let result = UserListHandler
            .handle(None, &RequestScope::anonymous(), &ctx)
            .await
            .unwrap();
        assert_eq!(result["total"], 2);
    }

    #[tokio::test]
    async fn withdraw_queue_lists_and_advances() {
        let ctx = make_test_context();
        let user_id = register_user(&ctx, "payout");
        {
            let conn = ctx.pool.get().unwrap();
            let _ = BalanceRepo::deposit(&conn, user_id, 100_000_000_000, "usdt").unwrap();
        }
        let _ = crate::handlers::withdraw::WithdrawCreateHandler
            .handle(
                Some(json!({ "coinType": "usdt", "amount": "5" })),
                &user_scope(user_id),
                &ctx,
            )
            .await
            .unwrap();

        let pending = WithdrawHandler
            .handle(None, &RequestScope::anonymous(), &ctx)
            .await
            .unwrap();
        let id = pending["withdraws"][0]["id"].as_i64().unwrap();

        let doing = WithdrawHandler
            .handle(
                Some(json!({ "withdrawId": id, "action": "doing" })),
                &RequestScope::anonymous(),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(doing["status"], "doing");

        let bad = WithdrawHandler
            .handle(
                Some(json!({ "withdrawId": id, "action": "explode" })),
                &RequestScope::anonymous(),
                &ctx,
            )
            .await
            .unwrap_err();
        assert_eq!(bad.code(), "INVALID_PARAMS");
    }

    #[tokio::test]
    async fn config_update_round_trip() {
        let ctx = make_test_context();

        let listing = ConfigHandler
            .handle(None, &RequestScope::anonymous(), &ctx)
            .await
            .unwrap();
        let id = listing["config"][0]["id"].as_i64().unwrap();

        let updated = ConfigUpdateHandler
            .handle(
                Some(json!({ "id": id, "value": "777" })),
                &RequestScope::anonymous(),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(updated["status"], "ok");
    }

    #[tokio::test]
    async fn totals_count_users() {
        let ctx = make_test_context();
        let _ = register_user(&ctx, "tally");

        let result = TotalsHandler
            .handle(None, &RequestScope::anonymous(), &ctx)
            .await
            .unwrap();
        assert_eq!(result["totalUsers"], 1);
    }
}
