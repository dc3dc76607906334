//! In-memory reference store.
//!
//! `MemoryStore` keeps rows in a `HashMap` behind a mutex, but it is not
//! a plain map of `Account`s: rows hold the same shapes a SQL table
//! would — the status as a string, timestamps in whole seconds — and get
//! mapped through the same boundary guards a real store needs. That way
//! tests running against `MemoryStore` exercise the row mapping too, and
//! swapping in a database store later changes no behavior.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use trollkeep_account::{
    Account, AccountId, AccountStatus, RestrictedCredential, TrollProfile,
};

use crate::{AccountStore, StoreError};

/// One persisted row, in storage representation.
///
/// `status` is a free string here (the closed-enum guard runs on read,
/// as it would when scanning a database row), and the two timestamps in
/// `profile` are stored in seconds rather than the in-memory
/// milliseconds.
#[derive(Debug, Clone)]
struct Row {
    status: String,
    credential: String,
    profile: Option<TrollProfile>,
}

impl Row {
    /// Maps a row back into an [`Account`], rejecting anything outside
    /// the data model's closed sets.
    fn to_account(&self, id: AccountId) -> Result<Account, StoreError> {
        let status =
            AccountStatus::try_from(self.status.as_str()).map_err(|e| {
                StoreError::CorruptRecord {
                    id,
                    detail: e.to_string(),
                }
            })?;
        let credential = RestrictedCredential::parse(&self.credential)
            .map_err(|e| StoreError::CorruptRecord {
                id,
                detail: e.to_string(),
            })?;
        let mut account = Account::new(id, status, credential);
        account.profile = self.profile.clone().map(|mut p| {
            // Stored in seconds, carried in milliseconds.
            p.next_turn *= 1000;
            p.updated_at *= 1000;
            p
        });
        Ok(account)
    }
}

/// Milliseconds since the epoch, for `updated_at` stamping.
fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// A thread-safe, in-memory [`AccountStore`].
///
/// Used by the test suites and the quickstart demo. All operations take
/// `&self`; interior mutability lives behind a single mutex, which is
/// never held across an await point.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<HashMap<AccountId, Row>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<AccountId, Row>>, StoreError> {
        self.rows
            .lock()
            .map_err(|_| StoreError::Backend("account table lock poisoned".into()))
    }

    /// Number of stored accounts. Handy in tests.
    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Returns `true` if no accounts are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AccountStore for MemoryStore {
    async fn find(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let rows = self.lock()?;
        rows.get(&id).map(|row| row.to_account(id)).transpose()
    }

    async fn find_if_credential_matches(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> Result<Option<Account>, StoreError> {
        let rows = self.lock()?;
        match rows.get(&id) {
            Some(row) if row.credential == credential.as_str() => {
                row.to_account(id).map(Some)
            }
            // Unknown id and credential mismatch look the same on purpose.
            _ => Ok(None),
        }
    }

    async fn create(&self, account: &Account) -> Result<(), StoreError> {
        let mut rows = self.lock()?;
        let id = account.id();
        if rows.contains_key(&id) {
            return Err(StoreError::DuplicateAccount(id));
        }
        // Management fields only; a brand-new account has no profile
        // worth persisting even if the caller attached one.
        rows.insert(
            id,
            Row {
                status: account.status.as_str().to_string(),
                credential: account.credential.as_str().to_string(),
                profile: None,
            },
        );
        tracing::debug!(account_id = %id, status = %account.status, "account created");
        Ok(())
    }

    async fn update_management_fields(
        &self,
        account: &Account,
    ) -> Result<(), StoreError> {
        let mut rows = self.lock()?;
        let id = account.id();
        let row = rows
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))?;
        row.status = account.status.as_str().to_string();
        row.credential = account.credential.as_str().to_string();
        tracing::debug!(account_id = %id, status = %account.status, "management fields updated");
        Ok(())
    }

    async fn update_profile(
        &self,
        account: &Account,
        full_profile: bool,
    ) -> Result<(), StoreError> {
        let mut rows = self.lock()?;
        let id = account.id();
        let incoming = account
            .profile
            .as_ref()
            .ok_or(StoreError::MissingProfile(id))?;
        let row = rows
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))?;

        let stored = row.profile.get_or_insert_with(TrollProfile::default);
        stored.x = incoming.x;
        stored.y = incoming.y;
        stored.z = incoming.z;
        if full_profile {
            stored.max_health = incoming.max_health;
            stored.current_health = incoming.current_health;
            stored.fatigue = incoming.fatigue;
            stored.action_points = incoming.action_points;
            stored.view_range = incoming.view_range;
            // Timestamps live in seconds inside the row.
            stored.next_turn = incoming.next_turn / 1000;
            stored.turn_duration = incoming.turn_duration;
            stored.updated_at = now_ms() / 1000;
        }
        tracing::debug!(account_id = %id, full_profile, "profile updated");
        Ok(())
    }
}

// =========================================================================
// Tests (internal: these need to plant raw rows)
// =========================================================================
