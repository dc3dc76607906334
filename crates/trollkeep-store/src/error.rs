//! Error types for the store layer.

use trollkeep_account::AccountId;

/// Errors a store operation can surface.
///
/// Note what is NOT here: "account not found" on reads. Lookups return
/// `Ok(None)` for unknown ids — absence is a normal answer the engine
/// acts on (it triggers account creation). Only writes that need an
/// existing row treat absence as an error.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// `create` was called for an id that already has a row.
    #[error("account {0} already exists")]
    DuplicateAccount(AccountId),

    /// An update targeted an id with no row.
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    /// A profile write was requested for an account that carries no
    /// profile payload.
    #[error("account {0} has no profile data to persist")]
    MissingProfile(AccountId),

    /// A persisted row could not be mapped back into an [`Account`]
    /// (status string outside the closed set, malformed credential, ...).
    ///
    /// [`Account`]: trollkeep_account::Account
    #[error("corrupt record for account {id}: {detail}")]
    CorruptRecord {
        /// The account whose row is unreadable.
        id: AccountId,
        /// What was wrong with it.
        detail: String,
    },

    /// The backing medium failed (I/O, poisoned lock, connection loss).
    #[error("store backend failure: {0}")]
    Backend(String),
}
