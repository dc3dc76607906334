//! Error types for the verification engine.

use trollkeep_account::AccountId;
use trollkeep_guard::GuardError;
use trollkeep_store::StoreError;

/// Ways `verify_or_reconcile` can fail.
///
/// Two outcomes are conspicuously NOT errors:
///
/// - "credential is wrong" — that is an authorized-`false` result, not a
///   failure of the engine.
/// - a remote transport failure — folded into the stored
///   `verification_error` status and an authorized-`false` result (see
///   the crate docs for why this conflation is kept).
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    /// The candidate credential has the wrong length. Rejected before
    /// any I/O — the store is never consulted for malformed input.
    #[error("a restricted credential must be 8 characters, got {length}")]
    MalformedCredential {
        /// Length of the rejected candidate, in characters.
        length: usize,
    },

    /// The id is unknown and the engine is configured not to create
    /// accounts on first contact.
    #[error("account creation on first contact is disabled")]
    CreationDisallowed,

    /// The credential changed and the engine is configured not to
    /// re-verify remotely.
    #[error("remote re-verification of changed credentials is disabled")]
    VerificationDisallowed,

    /// The rate guard denied the remote call. Policy, not transport:
    /// callers should back off rather than retry. Nothing was written.
    #[error("too many remote verification calls for {0} in the current window")]
    RateLimited(AccountId),

    /// The account store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The rate guard itself failed (as opposed to saying no).
    #[error(transparent)]
    Guard(#[from] GuardError),
}
