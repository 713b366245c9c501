//! # arbor-auth
//!
//! Bearer-token authentication for the RPC surface.
//!
//! Tokens are HS256 JWTs carrying the authenticated user id. The transport
//! layer verifies the `Authorization: Bearer` header once per request and
//! hands the claims to handlers.

#![deny(unsafe_code)]

pub mod errors;
pub mod token;

pub use errors::AuthError;
pub use token::{Claims, USER_TYPE_ADMIN, USER_TYPE_USER, issue_token, verify_token};
