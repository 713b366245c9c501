//! Reward listing handlers.

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use arbor_domain::UserService;

use crate::context::{RequestScope, RpcContext};
use crate::errors::RpcError;
use crate::handlers::{page_param, to_value};
use crate::registry::MethodHandler;

/// Paged reward history for the authenticated user.
pub struct RewardListHandler;

#[async_trait]
impl MethodHandler for RewardListHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "reward.list"))]
    async fn handle(
        &self,
        params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let page = page_param(params.as_ref());
        let conn = ctx.conn()?;
        let reply = UserService::reward_list(&conn, user_id, &page)?;
        to_value(&reply)
    }
}

/// Recommend-reason rewards for the authenticated user.
pub struct RecommendRewardListHandler;

#[async_trait]
impl MethodHandler for RecommendRewardListHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "reward.recommendList"))]
    async fn handle(
        &self,
        _params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let conn = ctx.conn()?;
        let reply = UserService::recommend_reward_list(&conn, user_id)?;
        to_value(&reply)
    }
}

/// Fee rewards for the authenticated user.
pub struct FeeRewardListHandler;

#[async_trait]
impl MethodHandler for FeeRewardListHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "reward.feeList"))]
    async fn handle(
        &self,
        _params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let conn = ctx.conn()?;
        let reply = UserService::fee_reward_list(&conn, user_id)?;
        to_value(&reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_store::models::NewReward;
    use arbor_store::repositories::RewardRepo;

    use crate::handlers::test_helpers::{make_test_context, register_user, user_scope};

    #[tokio::test]
    async fn reward_list_pages_newest_first() {
        let ctx = make_test_context();
        let user_id = register_user(&ctx, "rewards");
        {
            let conn = ctx.pool.get().unwrap();
            for amount in [10_000_000_000_i64, 20_000_000_000] {
                let _ = RewardRepo::insert(
                    &conn,
                    &NewReward {
                        user_id,
                        amount,
                        reason: "recommend".to_string(),
                        ..NewReward::default()
                    },
                )
                .unwrap();
            }
        }

        let result = RewardListHandler
            .handle(None, &user_scope(user_id), &ctx)
            .await
            .unwrap();
        assert_eq!(result["total"], 2);
        assert_eq!(result["rewards"][0]["amount"], "2.0000");
    }

    #[tokio::test]
    async fn recommend_list_requires_token() {
        let ctx = make_test_context();
        let err = RecommendRewardListHandler
            .handle(None, &RequestScope::anonymous(), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "ERROR_TOKEN");
    }

    #[tokio::test]
    async fn fee_list_filters_reason() {
        let ctx = make_test_context();
        let user_id = register_user(&ctx, "fees");
        {
            let conn = ctx.pool.get().unwrap();
            for reason in ["fee", "recommend"] {
                let _ = RewardRepo::insert(
                    &conn,
                    &NewReward {
                        user_id,
                        amount: 10_000_000_000,
                        reason: reason.to_string(),
                        ..NewReward::default()
                    },
                )
                .unwrap();
            }
        }

        let result = FeeRewardListHandler
            .handle(None, &user_scope(user_id), &ctx)
            .await
            .unwrap();
        assert_eq!(result["total"], 1);
        assert_eq!(result["rewards"][0]["reason"], "fee");
    }
}
