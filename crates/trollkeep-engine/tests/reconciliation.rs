//! Integration tests for the verification engine, run against the
//! in-memory store, the real sliding-window guard, and a scripted
//! remote verifier.
//!
//! The fakes record everything: the verifier counts its calls (several
//! properties are "…and the remote service was NOT called"), and the
//! store wrapper counts operations (malformed input must never reach
//! persistence).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use trollkeep_account::{
    Account, AccountId, AccountStatus, RestrictedCredential,
};
use trollkeep_engine::{
    CredentialVerifier, EngineConfig, Verdict, VerificationEngine,
    VerifierError, VerifyError,
};
use trollkeep_guard::{CallCategory, GuardConfig, SlidingWindowGuard};
use trollkeep_store::{AccountStore, MemoryStore, StoreError};

// =========================================================================
// Fakes
// =========================================================================

/// What the scripted verifier should answer.
#[derive(Clone, Copy)]
enum Script {
    /// The credential is valid.
    Accept,
    /// The credential is invalid ("determined invalid").
    Reject,
    /// The call itself fails ("could not determine").
    Unreachable,
}

/// A remote verifier that follows a fixed script and counts its calls.
struct ScriptedVerifier {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedVerifier {
    fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CredentialVerifier for ScriptedVerifier {
    async fn verify(
        &self,
        _id: AccountId,
        _credential: &RestrictedCredential,
    ) -> Result<Verdict, VerifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script {
            Script::Accept => Ok(Verdict {
                valid: true,
                details: "welcome".into(),
            }),
            Script::Reject => Ok(Verdict {
                valid: false,
                details: "wrong password".into(),
            }),
            Script::Unreachable => {
                Err(VerifierError::Transport("connection reset".into()))
            }
        }
    }
}

/// A store wrapper that counts every operation reaching it.
struct CountingStore {
    inner: MemoryStore,
    ops: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            ops: AtomicUsize::new(0),
        }
    }

    fn ops(&self) -> usize {
        self.ops.load(Ordering::SeqCst)
    }

    /// Forget operations made while seeding test data.
    fn reset(&self) {
        self.ops.store(0, Ordering::SeqCst);
    }
}

impl AccountStore for CountingStore {
    async fn find(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.inner.find(id).await
    }

    async fn find_if_credential_matches(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> Result<Option<Account>, StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.inner.find_if_credential_matches(id, credential).await
    }

    async fn create(&self, account: &Account) -> Result<(), StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.inner.create(account).await
    }

    async fn update_management_fields(
        &self,
        account: &Account,
    ) -> Result<(), StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.inner.update_management_fields(account).await
    }

    async fn update_profile(
        &self,
        account: &Account,
        full_profile: bool,
    ) -> Result<(), StoreError> {
        self.ops.fetch_add(1, Ordering::SeqCst);
        self.inner.update_profile(account, full_profile).await
    }
}

// =========================================================================
// Harness
// =========================================================================

type TestEngine = VerificationEngine<
    Arc<CountingStore>,
    Arc<SlidingWindowGuard>,
    Arc<ScriptedVerifier>,
>;

struct Harness {
    store: Arc<CountingStore>,
    guard: Arc<SlidingWindowGuard>,
    verifier: Arc<ScriptedVerifier>,
    engine: TestEngine,
}

/// Builds an engine with a generous guard budget and the given verifier
/// script and config.
fn harness_with(script: Script, config: EngineConfig) -> Harness {
    harness_with_budget(script, config, 100)
}

fn harness(script: Script) -> Harness {
    harness_with(script, EngineConfig::default())
}

fn harness_with_budget(
    script: Script,
    config: EngineConfig,
    guard_budget: usize,
) -> Harness {
    let store = Arc::new(CountingStore::new());
    let guard = Arc::new(SlidingWindowGuard::new(GuardConfig {
        max_calls: guard_budget,
        window: Duration::from_secs(24 * 60 * 60),
    }));
    let verifier = Arc::new(ScriptedVerifier::new(script));
    let engine = VerificationEngine::new(
        store.clone(),
        guard.clone(),
        verifier.clone(),
        config,
    );
    Harness {
        store,
        guard,
        verifier,
        engine,
    }
}

fn cred(s: &str) -> RestrictedCredential {
    RestrictedCredential::parse(s).expect("test credential")
}

/// Seeds a stored account and resets the store's op counter.
async fn seed(h: &Harness, id: u32, status: AccountStatus, credential: &str) {
    h.store
        .inner
        .create(&Account::new(AccountId(id), status, cred(credential)))
        .await
        .expect("seeding should succeed");
    h.store.reset();
}

async fn stored(h: &Harness, id: u32) -> Option<Account> {
    h.store.inner.find(AccountId(id)).await.expect("read should succeed")
}

// =========================================================================
// Malformed input
// =========================================================================

#[tokio::test]
async fn test_verify_malformed_credential_rejected_before_any_io() {
    let h = harness(Script::Accept);

    for bad in ["", "short", "way-too-long-token"] {
        let err = h
            .engine
            .verify_or_reconcile(AccountId(1), bad)
            .await
            .unwrap_err();
        assert!(
            matches!(err, VerifyError::MalformedCredential { .. }),
            "{bad:?} should be rejected as malformed"
        );
    }
    assert_eq!(h.store.ops(), 0, "the store must never see malformed input");
    assert_eq!(h.verifier.calls(), 0);
}

#[tokio::test]
async fn test_verify_malformed_credential_reports_length() {
    let h = harness(Script::Accept);

    let err = h
        .engine
        .verify_or_reconcile(AccountId(1), "short")
        .await
        .unwrap_err();

    assert!(matches!(err, VerifyError::MalformedCredential { length: 5 }));
}

// =========================================================================
// Unknown account (first contact)
// =========================================================================

#[tokio::test]
async fn test_unknown_id_with_creation_disallowed_writes_nothing() {
    let config = EngineConfig {
        allow_self_provisioning: false,
        ..EngineConfig::default()
    };
    let h = harness_with(Script::Accept, config);

    let err = h
        .engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap_err();

    assert!(matches!(err, VerifyError::CreationDisallowed));
    assert!(stored(&h, 1).await.is_none(), "no record may be created");
    assert_eq!(h.verifier.calls(), 0);
}

#[tokio::test]
async fn test_unknown_id_valid_credential_creates_ok_account() {
    let h = harness(Script::Accept);

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap();

    assert!(outcome.authorized);
    let account = stored(&h, 1).await.expect("account should exist now");
    assert_eq!(account.status, AccountStatus::Ok);
    assert_eq!(account.credential, cred("AAAAAAAA"));
    assert_eq!(h.verifier.calls(), 1);
}

#[tokio::test]
async fn test_unknown_id_invalid_credential_creates_failing_account() {
    let h = harness(Script::Reject);

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap();

    // The record is still created — remembering the failed attempt is
    // what lets the cache-hit path answer "no" without a remote call.
    assert!(!outcome.authorized);
    let account = stored(&h, 1).await.expect("account should exist now");
    assert_eq!(account.status, AccountStatus::VerificationError);
}

#[tokio::test]
async fn test_unknown_id_transport_failure_creates_failing_account() {
    // "Could not determine" lands in the same status as "determined
    // invalid" — the long-standing conflation, preserved deliberately.
    let h = harness(Script::Unreachable);

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap();

    assert!(!outcome.authorized);
    let account = stored(&h, 1).await.unwrap();
    assert_eq!(account.status, AccountStatus::VerificationError);
}

// =========================================================================
// Known account, credential unchanged (cache hit)
// =========================================================================

#[tokio::test]
async fn test_same_credential_ok_status_authorized_without_remote_call() {
    let h = harness(Script::Reject); // would say no if consulted
    seed(&h, 1, AccountStatus::Ok, "AAAAAAAA").await;

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert_eq!(h.verifier.calls(), 0, "cache hit must not call the verifier");
    assert_eq!(h.guard.recorded(AccountId(1), CallCategory::Dynamics), 0);
}

#[tokio::test]
async fn test_same_credential_failing_status_denied_without_remote_call() {
    let h = harness(Script::Accept); // would say yes if consulted
    seed(&h, 1, AccountStatus::VerificationError, "AAAAAAAA").await;

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap();

    assert!(!outcome.authorized);
    assert_eq!(h.verifier.calls(), 0);
}

#[tokio::test]
async fn test_same_credential_off_and_bad_password_are_not_authorized() {
    for status in [AccountStatus::Off, AccountStatus::BadPassword] {
        let h = harness(Script::Accept);
        seed(&h, 1, status, "AAAAAAAA").await;

        let outcome = h
            .engine
            .verify_or_reconcile(AccountId(1), "AAAAAAAA")
            .await
            .unwrap();

        assert!(!outcome.authorized, "{status} must not authorize");
        // And the engine must not "heal" the status on this path.
        assert_eq!(stored(&h, 1).await.unwrap().status, status);
    }
}

// =========================================================================
// Known account, credential changed
// =========================================================================

#[tokio::test]
async fn test_changed_credential_ok_account_failed_check_leaves_record_alone() {
    // The protected-holder property: someone probing a healthy account
    // with wrong guesses cannot damage its cached state.
    let h = harness(Script::Reject);
    seed(&h, 1, AccountStatus::Ok, "AAAAAAAA").await;

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "BBBBBBBB")
        .await
        .unwrap();

    assert!(!outcome.authorized);
    let account = stored(&h, 1).await.unwrap();
    assert_eq!(account.status, AccountStatus::Ok);
    assert_eq!(account.credential, cred("AAAAAAAA"));
    // Repeated wrong guesses are idempotent.
    let again = h
        .engine
        .verify_or_reconcile(AccountId(1), "CCCCCCCC")
        .await
        .unwrap();
    assert!(!again.authorized);
    assert_eq!(stored(&h, 1).await.unwrap().credential, cred("AAAAAAAA"));
}

#[tokio::test]
async fn test_changed_credential_ok_account_transport_failure_leaves_record_alone() {
    // An outage while re-verifying must not damage a healthy account
    // either — same protected path as a rejection.
    let h = harness(Script::Unreachable);
    seed(&h, 1, AccountStatus::Ok, "AAAAAAAA").await;

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "BBBBBBBB")
        .await
        .unwrap();

    assert!(!outcome.authorized);
    let account = stored(&h, 1).await.unwrap();
    assert_eq!(account.status, AccountStatus::Ok);
    assert_eq!(account.credential, cred("AAAAAAAA"));
}

#[tokio::test]
async fn test_changed_credential_ok_account_passed_check_adopts_new_credential() {
    // A legitimate password change: credential rotates, status stays ok.
    let h = harness(Script::Accept);
    seed(&h, 1, AccountStatus::Ok, "AAAAAAAA").await;

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "BBBBBBBB")
        .await
        .unwrap();

    assert!(outcome.authorized);
    let account = stored(&h, 1).await.unwrap();
    assert_eq!(account.status, AccountStatus::Ok);
    assert_eq!(account.credential, cred("BBBBBBBB"));
}

#[tokio::test]
async fn test_changed_credential_failing_account_passed_check_becomes_ok() {
    let h = harness(Script::Accept);
    seed(&h, 1, AccountStatus::VerificationError, "AAAAAAAA").await;

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "BBBBBBBB")
        .await
        .unwrap();

    assert!(outcome.authorized);
    let account = stored(&h, 1).await.unwrap();
    assert_eq!(account.status, AccountStatus::Ok);
    assert_eq!(account.credential, cred("BBBBBBBB"));
}

#[tokio::test]
async fn test_changed_credential_failing_account_failed_check_still_persisted() {
    // A failing account has nothing to protect: the new candidate is
    // recorded either way so the stored state tracks the latest attempt.
    let h = harness(Script::Reject);
    seed(&h, 1, AccountStatus::VerificationError, "AAAAAAAA").await;

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "BBBBBBBB")
        .await
        .unwrap();

    assert!(!outcome.authorized);
    let account = stored(&h, 1).await.unwrap();
    assert_eq!(account.status, AccountStatus::VerificationError);
    assert_eq!(account.credential, cred("BBBBBBBB"));
}

#[tokio::test]
async fn test_changed_credential_with_verification_disallowed_fails_clean() {
    let config = EngineConfig {
        allow_self_provisioning: false,
        ..EngineConfig::default()
    };
    let h = harness_with(Script::Accept, config);
    seed(&h, 1, AccountStatus::Ok, "AAAAAAAA").await;

    let err = h
        .engine
        .verify_or_reconcile(AccountId(1), "BBBBBBBB")
        .await
        .unwrap_err();

    assert!(matches!(err, VerifyError::VerificationDisallowed));
    assert_eq!(h.verifier.calls(), 0);
    assert_eq!(stored(&h, 1).await.unwrap().credential, cred("AAAAAAAA"));
}

// =========================================================================
// Rate guard interaction
// =========================================================================

#[tokio::test]
async fn test_guard_denial_on_first_contact_blocks_call_and_write() {
    // Zero budget: the guard denies everything.
    let h = harness_with_budget(Script::Accept, EngineConfig::default(), 0);

    let err = h
        .engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap_err();

    assert!(matches!(err, VerifyError::RateLimited(id) if id == AccountId(1)));
    assert_eq!(h.verifier.calls(), 0, "denial must precede the remote call");
    assert!(stored(&h, 1).await.is_none(), "denial must not create a record");
}

#[tokio::test]
async fn test_guard_denial_on_changed_credential_blocks_call_and_write() {
    let h = harness_with_budget(Script::Accept, EngineConfig::default(), 0);
    seed(&h, 1, AccountStatus::VerificationError, "AAAAAAAA").await;

    let err = h
        .engine
        .verify_or_reconcile(AccountId(1), "BBBBBBBB")
        .await
        .unwrap_err();

    assert!(matches!(err, VerifyError::RateLimited(_)));
    assert_eq!(h.verifier.calls(), 0);
    // No partial writes under denial, even for a failing account.
    let account = stored(&h, 1).await.unwrap();
    assert_eq!(account.status, AccountStatus::VerificationError);
    assert_eq!(account.credential, cred("AAAAAAAA"));
}

#[tokio::test]
async fn test_guard_disabled_by_config_admits_everything() {
    let config = EngineConfig {
        consult_rate_guard: false,
        ..EngineConfig::default()
    };
    // Zero budget again — but the engine never asks.
    let h = harness_with_budget(Script::Accept, config, 0);

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap();

    assert!(outcome.authorized);
    assert_eq!(h.verifier.calls(), 1);
    assert_eq!(h.guard.recorded(AccountId(1), CallCategory::Dynamics), 0);
}

#[tokio::test]
async fn test_reconcile_makes_at_most_one_guard_check_per_call() {
    let h = harness(Script::Accept);

    h.engine
        .verify_or_reconcile(AccountId(1), "AAAAAAAA")
        .await
        .unwrap();

    assert_eq!(h.guard.recorded(AccountId(1), CallCategory::Dynamics), 1);
    assert_eq!(h.verifier.calls(), 1);
}

// =========================================================================
// is_known_good()
// =========================================================================

#[tokio::test]
async fn test_is_known_good_true_only_for_matching_ok_account() {
    let h = harness(Script::Reject); // must never be consulted
    seed(&h, 1, AccountStatus::Ok, "AAAAAAAA").await;

    assert!(h.engine.is_known_good(AccountId(1), "AAAAAAAA").await);
    assert!(!h.engine.is_known_good(AccountId(1), "BBBBBBBB").await);
    assert!(!h.engine.is_known_good(AccountId(2), "AAAAAAAA").await);
    assert_eq!(h.verifier.calls(), 0);
}

#[tokio::test]
async fn test_is_known_good_false_for_failing_status() {
    let h = harness(Script::Accept);
    seed(&h, 1, AccountStatus::VerificationError, "AAAAAAAA").await;

    assert!(!h.engine.is_known_good(AccountId(1), "AAAAAAAA").await);
}

#[tokio::test]
async fn test_is_known_good_false_on_degenerate_input_without_io() {
    let h = harness(Script::Accept);

    assert!(!h.engine.is_known_good(AccountId(0), "AAAAAAAA").await);
    assert!(!h.engine.is_known_good(AccountId(1), "").await);
    assert!(!h.engine.is_known_good(AccountId(1), "short").await);
    assert_eq!(h.store.ops(), 0);
}

// =========================================================================
// get_account()
// =========================================================================

#[tokio::test]
async fn test_get_account_returns_stored_record_or_none() {
    let h = harness(Script::Accept);
    seed(&h, 1, AccountStatus::Off, "AAAAAAAA").await;

    let found = h.engine.get_account(AccountId(1)).await.unwrap().unwrap();
    assert_eq!(found.status, AccountStatus::Off);

    assert!(h.engine.get_account(AccountId(2)).await.unwrap().is_none());
}

// =========================================================================
// End-to-end probe scenario
// =========================================================================

#[tokio::test]
async fn test_healthy_account_42_survives_probe_with_wrong_credential() {
    // id 42 is on file as ("ok", "AAAAAAAA"). Someone presents
    // "BBBBBBBB"; the guard admits; the remote verifier says invalid.
    // Expected: a clean unauthorized result (no error), and the stored
    // record still ("ok", "AAAAAAAA").
    let h = harness(Script::Reject);
    seed(&h, 42, AccountStatus::Ok, "AAAAAAAA").await;

    let outcome = h
        .engine
        .verify_or_reconcile(AccountId(42), "BBBBBBBB")
        .await
        .expect("no error on this path");

    assert!(!outcome.authorized);
    let account = stored(&h, 42).await.unwrap();
    assert_eq!(account.status, AccountStatus::Ok);
    assert_eq!(account.credential, cred("AAAAAAAA"));
    // The returned record is informational and shows the untouched state.
    let returned = outcome.account.expect("account is returned");
    assert_eq!(returned.status, AccountStatus::Ok);
    assert_eq!(returned.credential, cred("AAAAAAAA"));
}

// =========================================================================
// Best-effort management writes
// =========================================================================

/// A store whose management-field updates always fail. Everything else
/// delegates to a real `MemoryStore`.
struct BrokenUpdateStore {
    inner: MemoryStore,
}

impl AccountStore for BrokenUpdateStore {
    async fn find(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.inner.find(id).await
    }

    async fn find_if_credential_matches(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> Result<Option<Account>, StoreError> {
        self.inner.find_if_credential_matches(id, credential).await
    }

    async fn create(&self, account: &Account) -> Result<(), StoreError> {
        self.inner.create(account).await
    }

    async fn update_management_fields(
        &self,
        _account: &Account,
    ) -> Result<(), StoreError> {
        Err(StoreError::Backend("disk on fire".into()))
    }

    async fn update_profile(
        &self,
        account: &Account,
        full_profile: bool,
    ) -> Result<(), StoreError> {
        self.inner.update_profile(account, full_profile).await
    }
}

#[tokio::test]
async fn test_management_write_failure_after_verification_is_not_fatal() {
    // The remote verdict is already in hand when the write fails; the
    // engine logs and returns the intended state rather than erroring.
    // The store keeps the stale row until the next reconciliation.
    let store = Arc::new(BrokenUpdateStore {
        inner: MemoryStore::new(),
    });
    store
        .inner
        .create(&Account::new(
            AccountId(1),
            AccountStatus::VerificationError,
            cred("AAAAAAAA"),
        ))
        .await
        .unwrap();
    let engine = VerificationEngine::new(
        store.clone(),
        Arc::new(SlidingWindowGuard::default()),
        Arc::new(ScriptedVerifier::new(Script::Accept)),
        EngineConfig::default(),
    );

    let outcome = engine
        .verify_or_reconcile(AccountId(1), "BBBBBBBB")
        .await
        .expect("write failure is logged, not surfaced");

    assert!(outcome.authorized);
    let returned = outcome.account.unwrap();
    assert_eq!(returned.status, AccountStatus::Ok);
    assert_eq!(returned.credential, cred("BBBBBBBB"));
    // The stale row is still there — the known best-effort window.
    let row = store.inner.find(AccountId(1)).await.unwrap().unwrap();
    assert_eq!(row.status, AccountStatus::VerificationError);
}
