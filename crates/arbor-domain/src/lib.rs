//! # arbor-domain
//!
//! Business rules for the arbor platform: referral-tree bookkeeping, the
//! dashboard aggregation, withdrawals, and discretionary balance rewards.
//!
//! Services are stateless structs whose methods take a `&Connection` (or
//! `&mut Connection` when they own a transaction) and call the repository
//! layer. Reply types carry formatted strings ready for the RPC layer.

#![deny(unsafe_code)]

pub mod admin_service;
pub mod clock;
pub mod errors;
pub mod reasons;
pub mod replies;
pub mod user_service;

pub use admin_service::AdminService;
pub use errors::DomainError;
pub use user_service::UserService;
