//! RPC error codes and error type.

use crate::types::RpcErrorBody;

// ── Error code constants ────────────────────────────────────────────

/// Invalid or missing parameters.
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
/// Unexpected internal error.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
/// Method not found in the registry.
pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";
/// Generic not-found.
pub const NOT_FOUND: &str = "NOT_FOUND";
/// Domain validation failure (e.g. invalid invite code).
pub const USER_ERROR: &str = "USER_ERROR";
/// Missing or unusable bearer claims.
pub const ERROR_TOKEN: &str = "ERROR_TOKEN";
/// Registration/authorization failure.
pub const AUTHORIZE_ERROR: &str = "AUTHORIZE_ERROR";

/// RPC error type returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Required parameter missing or wrong type.
    #[error("{message}")]
    InvalidParams {
        /// Description of what is wrong.
        message: String,
    },

    /// Requested resource not found.
    #[error("{message}")]
    NotFound {
        /// Human-readable message.
        message: String,
    },

    /// Internal server error.
    #[error("{message}")]
    Internal {
        /// Description.
        message: String,
    },

    /// Domain-specific error with a stable code.
    #[error("{message}")]
    Custom {
        /// Machine-readable code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl RpcError {
    /// Machine-readable error code for this variant.
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::NotFound { .. } => NOT_FOUND,
            Self::Internal { .. } => INTERNAL_ERROR,
            Self::Custom { code, .. } => code,
        }
    }

    /// Convert to the wire-format error body.
    pub fn to_error_body(&self) -> RpcErrorBody {
        RpcErrorBody {
            code: self.code().to_owned(),
            message: self.to_string(),
        }
    }

    /// Missing-token error.
    pub fn token() -> Self {
        Self::Custom {
            code: ERROR_TOKEN.to_owned(),
            message: "invalid token".to_owned(),
        }
    }
}

impl From<arbor_domain::DomainError> for RpcError {
    fn from(err: arbor_domain::DomainError) -> Self {
        use arbor_domain::DomainError;
        use arbor_store::StoreError;
        match err {
            DomainError::InvalidCode => Self::Custom {
                code: USER_ERROR.to_owned(),
                message: "invalid invite code".to_owned(),
            },
            DomainError::InvalidAddress => Self::Custom {
                code: AUTHORIZE_ERROR.to_owned(),
                message: "invalid account address".to_owned(),
            },
            DomainError::Store(
                e @ (StoreError::UserNotFound(_) | StoreError::WithdrawNotFound(_)),
            ) => Self::NotFound {
                message: e.to_string(),
            },
            DomainError::Store(e) => Self::Internal {
                message: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_params_code() {
        let err = RpcError::InvalidParams {
            message: "bad".into(),
        };
        assert_eq!(err.code(), INVALID_PARAMS);
        assert_eq!(err.to_string(), "bad");
    }

    #[test]
    fn custom_code() {
        let err = RpcError::Custom {
            code: USER_ERROR.into(),
            message: "invalid invite code".into(),
        };
        assert_eq!(err.code(), USER_ERROR);
        let body = err.to_error_body();
        assert_eq!(body.code, USER_ERROR);
    }

    #[test]
    fn token_helper() {
        assert_eq!(RpcError::token().code(), ERROR_TOKEN);
    }

    #[test]
    fn domain_invalid_code_maps_to_user_error() {
        let err: RpcError = arbor_domain::DomainError::InvalidCode.into();
        assert_eq!(err.code(), USER_ERROR);
    }

    #[test]
    fn domain_invalid_address_maps_to_authorize_error() {
        let err: RpcError = arbor_domain::DomainError::InvalidAddress.into();
        assert_eq!(err.code(), AUTHORIZE_ERROR);
    }

    #[test]
    fn domain_not_found_maps_to_not_found() {
        let err: RpcError =
            arbor_domain::DomainError::Store(arbor_store::StoreError::UserNotFound(3)).into();
        assert_eq!(err.code(), NOT_FOUND);
    }
}
