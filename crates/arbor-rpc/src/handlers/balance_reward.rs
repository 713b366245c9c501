//! Discretionary balance reward handlers.

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use arbor_domain::UserService;

use crate::context::{RequestScope, RpcContext};
use crate::errors::RpcError;
use crate::handlers::{require_string_param, to_value};
use crate::registry::MethodHandler;

/// Allocate spendable USDT into a balance reward.
pub struct SetBalanceRewardHandler;

#[async_trait]
impl MethodHandler for SetBalanceRewardHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "balanceReward.set"))]
    async fn handle(
        &self,
        params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let amount = require_string_param(params.as_ref(), "amount")?;
        let mut conn = ctx.conn()?;
        let reply = UserService::set_balance_reward(&mut conn, user_id, &amount)?;
        to_value(&reply)
    }
}

/// Release balance rewards back to the spendable balance.
pub struct DeleteBalanceRewardHandler;

#[async_trait]
impl MethodHandler for DeleteBalanceRewardHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "balanceReward.delete"))]
    async fn handle(
        &self,
        params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let amount = require_string_param(params.as_ref(), "amount")?;
        let mut conn = ctx.conn()?;
        let reply = UserService::delete_balance_reward(&mut conn, user_id, &amount)?;
        to_value(&reply)
    }
}
