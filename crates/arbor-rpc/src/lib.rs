//! # arbor-rpc
//!
//! RPC protocol layer, method registry, and handlers.
//!
//! The surface splits in two:
//! - User methods (`auth.*`, `user.*`, `reward.*`, `withdraw.*`,
//!   `balanceReward.*`) act on the authenticated user from the request's
//!   bearer claims.
//! - Admin methods (`admin.*`) are list/update endpoints over the whole
//!   platform.
//!
//! Handlers receive a per-request [`context::RequestScope`] with the
//! verified claims and a shared [`context::RpcContext`] with the pool and
//! settings.

#![deny(unsafe_code)]

pub mod context;
pub mod errors;
pub mod handlers;
pub mod registry;
pub mod types;

pub use context::{RequestScope, RpcContext};
pub use errors::RpcError;
pub use registry::{MethodHandler, MethodRegistry};
pub use types::{RpcErrorBody, RpcRequest, RpcResponse};
