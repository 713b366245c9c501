//! # arbor-core
//!
//! Shared primitives for the arbor platform:
//! - Fixed-point amount handling (balances, prices, area totals)
//! - Referral code encoding/decoding (`D<id>` ancestry tokens, base64
//!   invite codes)

#![deny(unsafe_code)]

pub mod amount;
pub mod referral;

pub use amount::{AMOUNT_SCALE, AREA_SCALE, PRICE_SCALE, format_amount, format_scaled, parse_amount};
pub use referral::{
    CodeError, decode_invite_code, direct_referrer, invite_code, node_token, subtree_prefix,
};
