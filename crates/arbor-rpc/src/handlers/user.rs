//! User handlers: dashboard info and referral rebinding.

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use arbor_domain::UserService;

use crate::context::{RequestScope, RpcContext};
use crate::errors::RpcError;
use crate::handlers::{require_string_param, to_value};
use crate::registry::MethodHandler;

/// Fetch the authenticated user's dashboard.
pub struct UserInfoHandler;

#[async_trait]
impl MethodHandler for UserInfoHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "user.info"))]
    async fn handle(
        &self,
        _params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let conn = ctx.conn()?;
        let reply = UserService::user_info(&conn, &ctx.settings.platform, user_id)?;
        to_value(&reply)
    }
}

/// Rebind the authenticated user under a new referrer.
pub struct RecommendUpdateHandler;

#[async_trait]
impl MethodHandler for RecommendUpdateHandler {
    #[instrument(skip(self, ctx, scope), fields(method = "user.recommendUpdate"))]
    async fn handle(
        &self,
        params: Option<Value>,
        scope: &RequestScope,
        ctx: &RpcContext,
    ) -> Result<Value, RpcError> {
        let user_id = scope.require_user()?;
        let invite = require_string_param(params.as_ref(), "code")?;
        let mut conn = ctx.conn()?;
        let reply =
            UserService::update_recommend(&mut conn, &ctx.settings.platform, user_id, &invite)?;
        to_value(&reply)
    }
}
