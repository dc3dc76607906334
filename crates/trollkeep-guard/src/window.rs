//! Sliding-window guard implementation.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use trollkeep_account::AccountId;

use crate::{Admission, CallCategory, CallRateGuard, GuardError};

type Bucket = VecDeque<Instant>;
type Buckets = HashMap<(AccountId, CallCategory), Bucket>;

/// Configuration for [`SlidingWindowGuard`].
///
/// Defaults allow 24 calls per trailing 24 hours per (subject, category)
/// — one an hour on average, which is plenty for credential churn and
/// stingy enough to keep the remote operators happy.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Maximum calls per (subject, category) inside the window.
    pub max_calls: usize,

    /// The trailing window width.
    pub window: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            max_calls: 24,
            window: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// In-process [`CallRateGuard`] over a trailing window.
///
/// Keeps, per (subject, category), the instants of recently admitted
/// calls. On every `admit` the bucket is pruned to the window, then the
/// call is either denied (bucket full) or recorded and allowed — all
/// under one lock, so concurrent callers can't both squeeze into the
/// last slot.
///
/// Uses `Instant` (the monotonic clock): wall-clock adjustments must not
/// open or shrink anyone's call budget.
pub struct SlidingWindowGuard {
    config: GuardConfig,
    buckets: Mutex<Buckets>,
}

impl SlidingWindowGuard {
    /// Creates a guard with the given limits.
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Buckets>, GuardError> {
        self.buckets
            .lock()
            .map_err(|_| GuardError::Backend("guard lock poisoned".into()))
    }

    /// Calls currently on record for a (subject, category) pair,
    /// including ones that would be pruned on the next `admit`.
    pub fn recorded(&self, subject: AccountId, category: CallCategory) -> usize {
        self.buckets
            .lock()
            .map(|b| b.get(&(subject, category)).map_or(0, Bucket::len))
            .unwrap_or(0)
    }
}

impl Default for SlidingWindowGuard {
    fn default() -> Self {
        Self::new(GuardConfig::default())
    }
}

impl CallRateGuard for SlidingWindowGuard {
    async fn admit(
        &self,
        subject: AccountId,
        category: CallCategory,
    ) -> Result<Admission, GuardError> {
        let now = Instant::now();
        let mut buckets = self.lock()?;
        let bucket = buckets.entry((subject, category)).or_default();

        // Drop everything that has aged out of the window.
        while let Some(oldest) = bucket.front() {
            if now.duration_since(*oldest) >= self.config.window {
                bucket.pop_front();
            } else {
                break;
            }
        }

        if bucket.len() >= self.config.max_calls {
            tracing::info!(
                %subject,
                %category,
                recent_calls = bucket.len(),
                "remote call denied by rate guard"
            );
            return Ok(Admission::Denied);
        }

        bucket.push_back(now);
        Ok(Admission::Allowed)
    }
}

// =========================================================================
// Tests
// =========================================================================
