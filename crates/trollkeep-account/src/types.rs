//! Account identity, trust status, and the record that ties them together.

use std::fmt;

use crate::{RestrictedCredential, TrollProfile};

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// A unique identifier for a troll account.
///
/// This is a newtype wrapper around `u32` — you can't accidentally pass a
/// health value where an account id is expected, and signatures like
/// `fn find(id: AccountId)` read better than `fn find(id: u32)`.
///
/// Ids come from the game itself and are positive: id 0 is never stored,
/// and the lightweight authorization predicate short-circuits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub u32);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AccountStatus
// ---------------------------------------------------------------------------

/// The current trust state of an account.
///
/// This is a closed set — exactly four states, nothing else. The backing
/// store may hold these as strings; [`AccountStatus::try_from`] is the
/// boundary guard that refuses anything outside the set.
///
/// The reconciliation engine only ever **writes** two of them:
///
/// - [`Ok`](AccountStatus::Ok) — the last remote verification of the
///   current credential succeeded.
/// - [`VerificationError`](AccountStatus::VerificationError) — it failed,
///   either because the remote service said "invalid" or because the call
///   itself failed. (Yes, those are two different things collapsed into
///   one state; the engine logs them apart but the stored status does not
///   distinguish them.)
///
/// [`BadPassword`](AccountStatus::BadPassword) and
/// [`Off`](AccountStatus::Off) are set by operators or other subsystems.
/// This core reads them — any non-`Ok` status means "not authorized" —
/// but never assigns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStatus {
    /// Last verification of the current credential succeeded.
    Ok,

    /// An operator or another subsystem flagged the credential as bad.
    BadPassword,

    /// The account is switched off (deactivated upstream).
    Off,

    /// The last verification attempt did not succeed — remote said
    /// "invalid", or the remote call itself failed.
    VerificationError,
}

impl AccountStatus {
    /// Returns `true` only for [`AccountStatus::Ok`] — the single state
    /// in which an account is authorized.
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// The canonical string form, as persisted by stores.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::BadPassword => "bad_password",
            Self::Off => "off",
            Self::VerificationError => "verification_error",
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string that is not one of the four known states.
///
/// Returned by the store-boundary guard when a persisted row carries a
/// value outside the closed set (schema drift, manual edits, ...).
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown account status: {0:?}")]
pub struct UnknownStatus(pub String);

impl TryFrom<&str> for AccountStatus {
    type Error = UnknownStatus;

    fn try_from(s: &str) -> Result<Self, UnknownStatus> {
        match s {
            "ok" => Ok(Self::Ok),
            "bad_password" => Ok(Self::BadPassword),
            "off" => Ok(Self::Off),
            "verification_error" => Ok(Self::VerificationError),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// A troll's persisted identity: trust status, last-known credential, and
/// (optionally) the gameplay profile carried alongside.
///
/// The id is immutable once the record exists; there is deliberately no
/// way to change it. The profile is `Option` because a record created on
/// first contact has management fields only — gameplay fills the profile
/// in later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    id: AccountId,
    /// Current trust state.
    pub status: AccountStatus,
    /// The last credential that was verified or is pending verification.
    pub credential: RestrictedCredential,
    /// Gameplay payload; `None` until the game subsystems fill it in.
    pub profile: Option<TrollProfile>,
}

impl Account {
    /// Creates a fresh record with no profile, as the engine does on
    /// first contact with an unknown id.
    pub fn new(
        id: AccountId,
        status: AccountStatus,
        credential: RestrictedCredential,
    ) -> Self {
        Self {
            id,
            status,
            credential,
            profile: None,
        }
    }

    /// The immutable account id.
    pub fn id(&self) -> AccountId {
        self.id
    }
}

// =========================================================================
// Tests
// =========================================================================
