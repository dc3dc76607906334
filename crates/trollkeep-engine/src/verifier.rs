//! The remote credential verifier contract.
//!
//! The game operators run the authoritative check; we only define the
//! seam. Production wires this to the real remote endpoint, tests wire
//! it to a scripted fake, and nothing in the engine can tell the
//! difference.

use trollkeep_account::{AccountId, RestrictedCredential};

/// What the remote service said about a credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// `true` if the credential is currently correct for the account.
    pub valid: bool,
    /// Free-form detail from the remote service ("wrong password",
    /// "account suspended", ...). For logging only; never parsed.
    pub details: String,
}

/// The remote call itself failed.
///
/// This is NOT the same thing as `Verdict { valid: false, .. }`: a
/// transport failure means "could not determine", a false verdict means
/// "determined invalid". The engine folds both into the same stored
/// status (as the wider system always has) but logs them apart.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VerifierError {
    /// The remote service could not be reached or did not answer sanely.
    #[error("remote verifier unreachable: {0}")]
    Transport(String),
}

/// The authoritative, externally-hosted credential check.
///
/// `Send + Sync + 'static` for the usual reason: the verifier is shared
/// by every in-flight request and lives as long as the engine.
pub trait CredentialVerifier: Send + Sync + 'static {
    /// Asks the remote service whether `credential` is currently valid
    /// for `id`.
    ///
    /// # Errors
    /// [`VerifierError::Transport`] when no determination could be made.
    fn verify(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> impl Future<Output = Result<Verdict, VerifierError>> + Send;
}

/// A shared handle to a verifier is itself a verifier.
impl<T: CredentialVerifier> CredentialVerifier for std::sync::Arc<T> {
    async fn verify(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> Result<Verdict, VerifierError> {
        (**self).verify(id, credential).await
    }
}
