//! RPC dependency-injection context and per-request scope.

use arbor_auth::Claims;
use arbor_settings::ArborSettings;
use arbor_store::{ConnectionPool, PooledConnection};

use crate::errors::RpcError;

/// Shared context passed to every RPC handler.
pub struct RpcContext {
    /// Database connection pool.
    pub pool: ConnectionPool,
    /// Loaded settings.
    pub settings: ArborSettings,
}

impl RpcContext {
    /// Check out a pooled connection.
    pub fn conn(&self) -> Result<PooledConnection, RpcError> {
        self.pool.get().map_err(|e| RpcError::Internal {
            message: e.to_string(),
        })
    }
}

/// Per-request state: the verified bearer claims, if any.
#[derive(Clone, Debug, Default)]
pub struct RequestScope {
    /// Claims from a verified bearer token.
    pub claims: Option<Claims>,
}

impl RequestScope {
    /// Scope for an anonymous request.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { claims: None }
    }

    /// Scope for an authenticated request.
    #[must_use]
    pub fn authenticated(claims: Claims) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    /// The authenticated user id, or an `ERROR_TOKEN` error.
    pub fn require_user(&self) -> Result<i64, RpcError> {
        match &self.claims {
            Some(claims) if claims.user_id > 0 => Ok(claims.user_id),
            _ => Err(RpcError::token()),
        }
    }
}
