//! The restricted credential: an 8-character re-authentication token.
//!
//! The game hands each player a "restricted password" — a lightweight
//! token distinct from their full login password, meant for third-party
//! tools like this one. It is always exactly eight characters, and we
//! enforce that at construction: if you hold a [`RestrictedCredential`],
//! it is well-formed. Length checking happens once, at the edge, before
//! any I/O.

use std::fmt;

/// The number of characters a restricted credential must have.
pub const CREDENTIAL_LEN: usize = 8;

/// A validated 8-character restricted credential.
///
/// Construction goes through [`RestrictedCredential::parse`], so every
/// value of this type satisfies the length invariant. The token is
/// opaque — we never interpret its characters, only compare them.
///
/// Equality is the interesting operation: "is the credential on file the
/// same one the caller just presented?" decides whether a remote
/// verification call is needed at all.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RestrictedCredential(String);

impl RestrictedCredential {
    /// Validates and wraps a candidate credential.
    ///
    /// # Errors
    /// Returns [`CredentialError::WrongLength`] if the input is not
    /// exactly [`CREDENTIAL_LEN`] characters.
    pub fn parse(candidate: &str) -> Result<Self, CredentialError> {
        let length = candidate.chars().count();
        if length != CREDENTIAL_LEN {
            return Err(CredentialError::WrongLength { length });
        }
        Ok(Self(candidate.to_string()))
    }

    /// The raw token, for handing to a store or a remote verifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Debug prints a redacted form. Credentials end up in debug logs far too
/// easily; the length is enough to recognize one in a trace.
impl fmt::Debug for RestrictedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RestrictedCredential(********)")
    }
}

/// Why a candidate string could not become a [`RestrictedCredential`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    /// The candidate was not exactly 8 characters long.
    #[error("a restricted credential must be {CREDENTIAL_LEN} characters, got {length}")]
    WrongLength {
        /// The offending length.
        length: usize,
    },
}
