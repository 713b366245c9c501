//! Withdraw handlers.

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use arbor_domain::UserService;

use crate::context::{RequestScope, RpcContext};
use crate::errors::RpcError;
use crate::handlers::{optional_string_param, require_string_param, to_value};
use crate::registry::MethodHandler;

/// Withdraw history for the authenticated user.
pub struct WithdrawListHandler;

#[async_trait]
impl MethodHandler for WithdrawListHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "withdraw.list"))]
    async fn handle(
        &self,
        params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let coin_type = optional_string_param(params.as_ref(), "coinType");
        let conn = ctx.conn()?;
        let reply = UserService::withdraw_list(&conn, user_id, coin_type.as_deref())?;
        to_value(&reply)
    }
}

/// Request a withdrawal for the authenticated user.
pub struct WithdrawCreateHandler;

#[async_trait]
impl MethodHandler for WithdrawCreateHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "withdraw.create"))]
    async fn handle(
        &self,
        params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let coin_type = require_string_param(params.as_ref(), "coinType")?;
        let amount = require_string_param(params.as_ref(), "amount")?;
        let mut conn = ctx.conn()?;
        let reply = UserService::withdraw(&mut conn, user_id, &coin_type, &amount)?;
        to_value(&reply)
    }
}
