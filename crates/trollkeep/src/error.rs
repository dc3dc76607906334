//! Unified error type for Trollkeep.

use trollkeep_account::CredentialError;
use trollkeep_engine::VerifyError;
use trollkeep_guard::GuardError;
use trollkeep_store::StoreError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `trollkeep` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate. The
/// `#[from]` attribute on each variant auto-generates `From` impls, so
/// the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum TrollkeepError {
    /// A data-model error (malformed credential).
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// A persistence error (duplicate id, corrupt row, backend down).
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A rate-guard machinery error (the guard breaking, not saying no).
    #[error(transparent)]
    Guard(#[from] GuardError),

    /// A verification-engine error (policy rejection, rate limit, ...).
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use trollkeep_account::AccountId;

    #[test]
    fn test_from_credential_error() {
        let err = CredentialError::WrongLength { length: 3 };
        let top: TrollkeepError = err.into();
        assert!(matches!(top, TrollkeepError::Credential(_)));
        assert!(top.to_string().contains("8 characters"));
    }

    #[test]
    fn test_from_store_error() {
        let err = StoreError::DuplicateAccount(AccountId(5));
        let top: TrollkeepError = err.into();
        assert!(matches!(top, TrollkeepError::Store(_)));
        assert!(top.to_string().contains("T-5"));
    }

    #[test]
    fn test_from_guard_error() {
        let err = GuardError::Backend("gone".into());
        let top: TrollkeepError = err.into();
        assert!(matches!(top, TrollkeepError::Guard(_)));
        assert!(top.to_string().contains("gone"));
    }

    #[test]
    fn test_from_verify_error() {
        let err = VerifyError::RateLimited(AccountId(9));
        let top: TrollkeepError = err.into();
        assert!(matches!(top, TrollkeepError::Verify(_)));
    }
}
