//! Domain error types.

use thiserror::Error;

/// Errors surfaced by the business-rule layer.
///
/// Validation failures on user input get their own variants so the RPC
/// layer can map them to stable error codes; everything else is a
/// propagated store failure.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Propagated persistence failure.
    #[error("store error: {0}")]
    Store(#[from] arbor_store::StoreError),

    /// The supplied invite code did not resolve to a referrer.
    #[error("invalid invite code")]
    InvalidCode,

    /// The supplied account address is not plausible.
    #[error("invalid account address")]
    InvalidAddress,
}

impl From<arbor_core::CodeError> for DomainError {
    fn from(_: arbor_core::CodeError) -> Self {
        Self::InvalidCode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_error_converts() {
        let err: DomainError = arbor_core::CodeError::Invalid.into();
        assert!(matches!(err, DomainError::InvalidCode));
    }

    #[test]
    fn store_error_converts() {
        let err: DomainError = arbor_store::StoreError::UserNotFound(1).into();
        assert!(matches!(err, DomainError::Store(_)));
    }
}
