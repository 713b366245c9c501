//! JWT issue and verify.

use arbor_settings::AuthSettings;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AuthError;

/// Claim value for ordinary platform users.
pub const USER_TYPE_USER: &str = "user";
/// Claim value for admin users.
pub const USER_TYPE_ADMIN: &str = "admin";

/// Token claims carried by every bearer token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Authenticated user id.
    pub user_id: i64,
    /// User type (`user` or `admin`).
    pub user_type: String,
    /// Issuer.
    pub iss: String,
    /// Not-before timestamp (seconds).
    pub nbf: i64,
    /// Expiry timestamp (seconds).
    pub exp: i64,
}

/// Issue a signed token for a user.
pub fn issue_token(
    user_id: i64,
    user_type: &str,
    settings: &AuthSettings,
) -> Result<String, AuthError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id,
        user_type: user_type.to_string(),
        iss: settings.issuer.clone(),
        nbf: now,
        exp: now + settings.token_ttl_days * 24 * 60 * 60,
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verify a token and return its claims.
///
/// Validates signature, expiry, not-before, and issuer. A decoded token
/// with a non-positive user id is rejected.
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&settings.issuer]);
    validation.validate_nbf = true;

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_bytes()),
        &validation,
    )?;

    if data.claims.user_id <= 0 {
        return Err(AuthError::InvalidClaims("non-positive user id".into()));
    }
    Ok(data.claims)
}
