//! Referral code encoding.
//!
//! A user's ancestry is stored as a string of concatenated `D<id>` tokens,
//! root first. A user's own subtree is addressed by appending their own
//! token to the ancestry string, so descendant lookups are a prefix match.
//!
//! Invite codes shared with users are the standard base64 encoding of a
//! single `D<id>` token.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

/// Referral code decoding failure.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodeError {
    /// The invite code was not decodable to a positive user id.
    #[error("invalid invite code")]
    Invalid,
}

/// The `D<id>` ancestry token for a user.
#[must_use]
pub fn node_token(user_id: i64) -> String {
    format!("D{user_id}")
}

/// The base64 invite code a user shares with others.
#[must_use]
pub fn invite_code(user_id: i64) -> String {
    BASE64.encode(node_token(user_id))
}

/// Decode an invite code back to the inviter's user id.
///
/// The decoded token must be at least two bytes (marker plus digits) and
/// everything after the leading marker byte must parse as a positive id.
pub fn decode_invite_code(code: &str) -> Result<i64, CodeError> {
    let bytes = BASE64.decode(code).map_err(|_| CodeError::Invalid)?;
    let decoded = String::from_utf8(bytes).map_err(|_| CodeError::Invalid)?;
    if decoded.len() <= 1 {
        return Err(CodeError::Invalid);
    }
    let user_id: i64 = decoded[1..].parse().map_err(|_| CodeError::Invalid)?;
    if user_id <= 0 {
        return Err(CodeError::Invalid);
    }
    Ok(user_id)
}

/// The immediate parent encoded in an ancestry string, if any.
///
/// The ancestry is split on the literal `D`; the last numeric segment is
/// the direct referrer. An empty or malformed ancestry has none.
#[must_use]
pub fn direct_referrer(ancestry: &str) -> Option<i64> {
    let segments: Vec<&str> = ancestry.split('D').collect();
    if segments.len() < 2 {
        return None;
    }
    segments.last()?.parse().ok()
}

/// The subtree prefix for a user: their ancestry plus their own token.
#[must_use]
pub fn subtree_prefix(ancestry: &str, user_id: i64) -> String {
    format!("{ancestry}{}", node_token(user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_token_format() {
        assert_eq!(node_token(42), "D42");
    }

    #[test]
    fn invite_code_round_trips() {
        let code = invite_code(7);
        assert_eq!(decode_invite_code(&code), Ok(7));
    }

    #[test]
    fn decode_rejects_bad_base64() {
        assert_eq!(decode_invite_code("!!!"), Err(CodeError::Invalid));
    }

    #[test]
    fn decode_rejects_short_token() {
        let code = BASE64.encode("D");
        assert_eq!(decode_invite_code(&code), Err(CodeError::Invalid));
    }

    #[test]
    fn decode_rejects_non_numeric() {
        let code = BASE64.encode("Dxyz");
        assert_eq!(decode_invite_code(&code), Err(CodeError::Invalid));
    }

    #[test]
    fn decode_rejects_zero_and_negative() {
        assert_eq!(decode_invite_code(&BASE64.encode("D0")), Err(CodeError::Invalid));
        assert_eq!(decode_invite_code(&BASE64.encode("D-5")), Err(CodeError::Invalid));
    }

    #[test]
    fn direct_referrer_takes_last_segment() {
        assert_eq!(direct_referrer("D1D2D9"), Some(9));
    }

    #[test]
    fn direct_referrer_single_ancestor() {
        assert_eq!(direct_referrer("D1"), Some(1));
    }

    #[test]
    fn direct_referrer_empty_is_none() {
        assert_eq!(direct_referrer(""), None);
    }

    #[test]
    fn direct_referrer_malformed_is_none() {
        assert_eq!(direct_referrer("D1Dx"), None);
    }

    #[test]
    fn subtree_prefix_appends_own_token() {
        assert_eq!(subtree_prefix("D1D2", 9), "D1D2D9");
        assert_eq!(subtree_prefix("", 1), "D1");
    }
}
