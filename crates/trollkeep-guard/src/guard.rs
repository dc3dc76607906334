//! The call-rate guard contract.

use std::fmt;

use trollkeep_account::AccountId;

use crate::GuardError;

/// The family of remote call being rate-limited.
///
/// The remote service exposes several call families with separate
/// quotas, so calls are counted per (subject, category) pair. The
/// verification engine only ever uses [`Dynamics`](CallCategory::Dynamics)
/// — the lightweight "current dynamic state" call that doubles as a
/// credential check — but tools sharing the same guard count their
/// profile and view fetches against their own buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallCategory {
    /// Dynamic state fetch (turn timers, action points). Used for
    /// credential verification.
    Dynamics,
    /// Full profile fetch.
    Profile,
    /// View / surroundings fetch.
    View,
}

impl fmt::Display for CallCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Dynamics => "dynamics",
            Self::Profile => "profile",
            Self::View => "view",
        })
    }
}

/// The guard's answer: may this remote call be made right now?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Go ahead — and the call has been counted.
    Allowed,
    /// Over the limit for this subject and category. Not an error;
    /// the caller should surface a rate-limit result and back off.
    Denied,
}

impl Admission {
    /// Returns `true` for [`Admission::Allowed`].
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Admits or denies remote calls based on recent call volume.
///
/// Implementations track calls per (subject, category) over a trailing
/// time window. An `Allowed` answer must also record the call — check
/// and record are one atomic step, otherwise concurrent callers could
/// both pass the check and blow the budget together.
pub trait CallRateGuard: Send + Sync + 'static {
    /// Asks whether a remote call may be made now for `subject` in
    /// `category`, recording it if so.
    ///
    /// # Errors
    /// [`GuardError`] only for guard-machinery failures. A policy "no"
    /// is `Ok(Admission::Denied)`.
    fn admit(
        &self,
        subject: AccountId,
        category: CallCategory,
    ) -> impl Future<Output = Result<Admission, GuardError>> + Send;
}

/// A shared handle to a guard is itself a guard — every tool talking to
/// the remote service should count against the same buckets.
impl<T: CallRateGuard> CallRateGuard for std::sync::Arc<T> {
    async fn admit(
        &self,
        subject: AccountId,
        category: CallCategory,
    ) -> Result<Admission, GuardError> {
        (**self).admit(subject, category).await
    }
}
