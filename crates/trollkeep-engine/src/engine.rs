//! The verification engine itself.

use trollkeep_account::{
    Account, AccountId, AccountStatus, CredentialError, RestrictedCredential,
};
use trollkeep_guard::{Admission, CallCategory, CallRateGuard};
use trollkeep_store::AccountStore;

use crate::{CredentialVerifier, EngineConfig, VerifierError, VerifyError};

/// The answer to "is this pair authorized?".
///
/// `account` is informational: on the protected re-verification path it
/// still shows the old, untouched record even though `authorized` is
/// `false`. The authoritative answer for the call is always
/// `authorized`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// Whether the presented pair is authorized right now.
    pub authorized: bool,
    /// The account record as of this call (post-write where a write
    /// happened).
    pub account: Option<Account>,
}

/// Orchestrates store, rate guard, and remote verifier to decide whether
/// an (id, credential) pair is authorized.
///
/// Stateless between calls: cloning collaborators in is fine, and one
/// engine serves any number of concurrent requests. At most one guard
/// check and one remote call happen per invocation.
pub struct VerificationEngine<S, G, V> {
    store: S,
    guard: G,
    verifier: V,
    config: EngineConfig,
}

impl<S, G, V> VerificationEngine<S, G, V>
where
    S: AccountStore,
    G: CallRateGuard,
    V: CredentialVerifier,
{
    /// Wires an engine to its three collaborators under the given policy.
    pub fn new(store: S, guard: G, verifier: V, config: EngineConfig) -> Self {
        Self {
            store,
            guard,
            verifier,
            config,
        }
    }

    /// Decides whether `(id, candidate)` is authorized, creating the
    /// account on first contact and re-verifying on credential change.
    ///
    /// This is the full reconciliation path — see the crate docs for the
    /// state machine. The cache-hit arm (known id, unchanged credential)
    /// performs no remote call and no write.
    ///
    /// Concurrent calls for the same id can race between lookup and
    /// write; last write wins.
    pub async fn verify_or_reconcile(
        &self,
        id: AccountId,
        candidate: &str,
    ) -> Result<VerifyOutcome, VerifyError> {
        // Input validation first, before any I/O.
        let candidate = match RestrictedCredential::parse(candidate) {
            Ok(credential) => credential,
            Err(CredentialError::WrongLength { length }) => {
                return Err(VerifyError::MalformedCredential { length });
            }
        };

        match self.store.find(id).await? {
            None => self.provision(id, candidate).await,
            Some(account) if account.credential == candidate => {
                // Fast path: the credential on file is the one presented.
                // The stored status already embodies the last remote
                // verdict, so no remote call is needed.
                let authorized = account.status.is_ok();
                tracing::debug!(
                    account_id = %id,
                    status = %account.status,
                    authorized,
                    "credential unchanged, answered from store"
                );
                Ok(VerifyOutcome {
                    authorized,
                    account: Some(account),
                })
            }
            Some(account) => self.reverify(account, candidate).await,
        }
    }

    /// Cheap authorization predicate: `true` iff the account exists, the
    /// credential matches what is on file, and the status is `ok`.
    ///
    /// Never calls the remote verifier and never writes. Store failures
    /// are logged and answered with `false` — this predicate is advisory,
    /// meant for hot repeated checks; callers needing the full story use
    /// [`verify_or_reconcile`](Self::verify_or_reconcile).
    pub async fn is_known_good(&self, id: AccountId, candidate: &str) -> bool {
        if id.0 == 0 {
            return false;
        }
        let Ok(credential) = RestrictedCredential::parse(candidate) else {
            return false;
        };
        match self.store.find_if_credential_matches(id, &credential).await {
            Ok(Some(account)) => account.status.is_ok(),
            Ok(None) => false,
            Err(error) => {
                tracing::warn!(
                    account_id = %id,
                    %error,
                    "store failure during authorization check"
                );
                false
            }
        }
    }

    /// Raw account read, no credential involved.
    pub async fn get_account(
        &self,
        id: AccountId,
    ) -> Result<Option<Account>, VerifyError> {
        Ok(self.store.find(id).await?)
    }

    /// First contact with an unknown id: verify remotely and insert.
    async fn provision(
        &self,
        id: AccountId,
        credential: RestrictedCredential,
    ) -> Result<VerifyOutcome, VerifyError> {
        if !self.config.allow_self_provisioning {
            return Err(VerifyError::CreationDisallowed);
        }
        self.admit_remote_call(id).await?;

        let valid = self.check_remotely(id, &credential).await;
        let status = if valid {
            AccountStatus::Ok
        } else {
            AccountStatus::VerificationError
        };
        let account = Account::new(id, status, credential);
        self.store.create(&account).await?;
        tracing::info!(
            account_id = %id,
            status = %status,
            "account created on first contact"
        );
        Ok(VerifyOutcome {
            authorized: valid,
            account: Some(account),
        })
    }

    /// Known account, changed credential: re-verify remotely and apply
    /// the asymmetric write policy.
    async fn reverify(
        &self,
        mut account: Account,
        candidate: RestrictedCredential,
    ) -> Result<VerifyOutcome, VerifyError> {
        let id = account.id();
        if !self.config.allow_self_provisioning {
            return Err(VerifyError::VerificationDisallowed);
        }
        self.admit_remote_call(id).await?;

        let valid = self.check_remotely(id, &candidate).await;

        // Asymmetric write policy. A healthy account presented with a
        // credential that fails verification is left completely
        // untouched: the change attempt may be a stranger probing the
        // id, and they must not be able to damage the cached state of
        // the legitimate holder. The caller still gets a firm "no".
        if account.status.is_ok() && !valid {
            tracing::info!(
                account_id = %id,
                "changed credential failed verification; record left untouched"
            );
            return Ok(VerifyOutcome {
                authorized: false,
                account: Some(account),
            });
        }

        if account.status.is_ok() {
            // Healthy account, new credential verified: adopt it.
            account.credential = candidate;
        } else {
            // Account was already failing; record the fresh outcome
            // either way so the stored state tracks the latest attempt.
            account.status = if valid {
                AccountStatus::Ok
            } else {
                AccountStatus::VerificationError
            };
            account.credential = candidate;
        }

        // Best-effort write: the remote verdict is already in hand, and
        // the returned record reflects it even if persistence fails.
        // Logged, not retried; the next call will reconcile again.
        if let Err(error) = self.store.update_management_fields(&account).await {
            tracing::error!(
                account_id = %id,
                %error,
                "failed to persist management fields after re-verification"
            );
        } else {
            tracing::info!(
                account_id = %id,
                status = %account.status,
                authorized = valid,
                "management fields updated after re-verification"
            );
        }

        Ok(VerifyOutcome {
            authorized: valid,
            account: Some(account),
        })
    }

    /// Consults the rate guard (if enabled) ahead of a remote call.
    async fn admit_remote_call(&self, id: AccountId) -> Result<(), VerifyError> {
        if !self.config.consult_rate_guard {
            return Ok(());
        }
        match self.guard.admit(id, CallCategory::Dynamics).await? {
            Admission::Allowed => Ok(()),
            Admission::Denied => Err(VerifyError::RateLimited(id)),
        }
    }

    /// Runs the remote check, folding a transport failure into `false`.
    ///
    /// "Could not determine" and "determined invalid" end up with the
    /// same stored status, as the wider system has always done — but
    /// they are logged distinctly so operators can tell an outage from
    /// an actual bad credential.
    async fn check_remotely(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> bool {
        match self.verifier.verify(id, credential).await {
            Ok(verdict) => {
                if verdict.valid {
                    tracing::debug!(
                        account_id = %id,
                        "remote verifier accepted credential"
                    );
                } else {
                    tracing::info!(
                        account_id = %id,
                        details = %verdict.details,
                        "remote verifier rejected credential"
                    );
                }
                verdict.valid
            }
            Err(VerifierError::Transport(reason)) => {
                tracing::warn!(
                    account_id = %id,
                    transport = %reason,
                    "remote verification call failed; treating as unverified"
                );
                false
            }
        }
    }
}
