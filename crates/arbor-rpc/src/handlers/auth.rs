//! Auth handlers: address-based authorization and the deposit stub.

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::instrument;

use arbor_auth::USER_TYPE_USER;
use arbor_domain::UserService;

use crate::context::{RequestScope, RpcContext};
use crate::errors::{self, RpcError};
use crate::handlers::{optional_string_param, require_string_param};
use crate::registry::MethodHandler;

/// Authorize by address, creating the user on first sight, and reply with
/// a signed bearer token.
pub struct EthAuthorizeHandler;

#[async_trait]
impl MethodHandler for EthAuthorizeHandler {
    #[instrument(skip(self, ctx, _scope), fields(method = "auth.ethAuthorize"))]
    async fn handle(
        &self,
        params: Option<Value>,
        _scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let address = require_string_param(params.as_ref(), "address")?;
        let invite = optional_string_param(params.as_ref(), "code").unwrap_or_default();

        let mut conn = ctx.conn()?;
        let user =
            UserService::authorize(&mut conn, &ctx.settings.platform, &address, &invite)?;

        let token = arbor_auth::issue_token(user.id, USER_TYPE_USER, &ctx.settings.auth)
            .map_err(|e| RpcError::Custom {
                code: errors::AUTHORIZE_ERROR.to_owned(),
                message: format!("failed to issue token: {e}"),
            })?;

        Ok(json!({ "token": token, "address": user.address }))
    }
}

/// Deposits are observed on-chain by the record watcher, not requested
/// over RPC; the method exists for protocol compatibility.
pub struct DepositHandler;

#[async_trait]
impl MethodHandler for DepositHandler {
    #[instrument(skip(self, _ctx, _scope), fields(method = "deposit"))]
    async fn handle(
        &self,
        _params: Option<Value>,
        _scope: &RequestScope,
        _ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        Ok(json!({}))
    }
}
