//! Auth error types.

/// Errors that can occur during token operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Token encoding/decoding failed (bad signature, expired, malformed).
    #[error("token error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Token decoded but its claims are unusable.
    #[error("invalid claims: {0}")]
    InvalidClaims(String),
}
