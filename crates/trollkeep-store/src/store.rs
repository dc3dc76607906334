//! The account store contract.

use trollkeep_account::{Account, AccountId, RestrictedCredential};

use crate::StoreError;

/// Persistence operations the verification engine requires.
///
/// Implement this against your actual database; the engine never sees
/// anything but this trait, which is what lets the whole reconciliation
/// state machine run against [`MemoryStore`](crate::MemoryStore) in tests.
///
/// # Trait bounds
///
/// - `Send + Sync` — the store is shared across async tasks.
/// - `'static` — it doesn't borrow temporary data; it lives as long as
///   the engine holding it.
///
/// # Write split
///
/// Writes are split on purpose: `update_management_fields` touches only
/// the trust state (status + credential), `update_profile` touches only
/// the gameplay payload. A credential re-verification must never clobber
/// a troll's position, and a position update must never clobber a
/// credential.
pub trait AccountStore: Send + Sync + 'static {
    /// Reads an account by id. `Ok(None)` means "unknown account" —
    /// not an error.
    fn find(
        &self,
        id: AccountId,
    ) -> impl Future<Output = Result<Option<Account>, StoreError>> + Send;

    /// Reads an account by id, but only if the stored credential equals
    /// `credential`. `Ok(None)` covers both "unknown id" and "credential
    /// mismatch" — callers that need to tell the two apart use
    /// [`find`](AccountStore::find).
    fn find_if_credential_matches(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> impl Future<Output = Result<Option<Account>, StoreError>> + Send;

    /// Inserts a brand-new record. Persists management fields only — a
    /// freshly created account has no gameplay history worth writing.
    ///
    /// # Errors
    /// [`StoreError::DuplicateAccount`] if the id already has a row.
    fn create(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Persists `status` and `credential`, leaving the profile untouched.
    ///
    /// # Errors
    /// [`StoreError::AccountNotFound`] if the id has no row.
    fn update_management_fields(
        &self,
        account: &Account,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Persists the gameplay profile, leaving management fields untouched.
    ///
    /// Position (`x`, `y`, `z`) is written unconditionally. The remaining
    /// profile fields — health, fatigue, action points, turn schedule —
    /// plus a fresh `updated_at` timestamp are written only when
    /// `full_profile` is true. Callers usually pass
    /// [`TrollProfile::is_meaningful`] here: a profile with no turn data
    /// is zeroes that must not overwrite real values.
    ///
    /// [`TrollProfile::is_meaningful`]: trollkeep_account::TrollProfile::is_meaningful
    ///
    /// # Errors
    /// - [`StoreError::AccountNotFound`] if the id has no row.
    /// - [`StoreError::MissingProfile`] if `account.profile` is `None`.
    fn update_profile(
        &self,
        account: &Account,
        full_profile: bool,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A shared handle to a store is itself a store. The engine and the
/// gameplay subsystems usually hold the same `Arc<MemoryStore>` (or its
/// database-backed equivalent).
impl<T: AccountStore> AccountStore for std::sync::Arc<T> {
    async fn find(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        (**self).find(id).await
    }

    async fn find_if_credential_matches(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> Result<Option<Account>, StoreError> {
        (**self).find_if_credential_matches(id, credential).await
    }

    async fn create(&self, account: &Account) -> Result<(), StoreError> {
        (**self).create(account).await
    }

    async fn update_management_fields(
        &self,
        account: &Account,
    ) -> Result<(), StoreError> {
        (**self).update_management_fields(account).await
    }

    async fn update_profile(
        &self,
        account: &Account,
        full_profile: bool,
    ) -> Result<(), StoreError> {
        (**self).update_profile(account, full_profile).await
    }
}
