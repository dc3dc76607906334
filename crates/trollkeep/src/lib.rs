//! # Trollkeep
//!
//! Troll account verification and reconciliation for game servers.
//!
//! Trollkeep keeps a local cache of player ("troll") credentials honest
//! against a rate-limited remote authentication service: first contact
//! creates the account, unchanged credentials answer from the cache, and
//! changed credentials are re-verified remotely — without ever letting a
//! third party's wrong guesses lock out the legitimate holder.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use trollkeep::prelude::*;
//!
//! // Wire the engine to your store, guard, and remote verifier:
//! // let engine = VerificationEngine::new(store, guard, verifier,
//! //     EngineConfig::default());
//! // let outcome = engine.verify_or_reconcile(AccountId(42), "AAAAAAAA").await?;
//! ```

mod error;

pub use error::TrollkeepError;

/// One-stop imports for typical users of the crate.
pub mod prelude {
    pub use trollkeep_account::{
        Account, AccountId, AccountStatus, RestrictedCredential, TrollProfile,
    };
    pub use trollkeep_engine::{
        CredentialVerifier, EngineConfig, Verdict, VerificationEngine,
        VerifierError, VerifyError, VerifyOutcome,
    };
    pub use trollkeep_guard::{
        Admission, CallCategory, CallRateGuard, GuardConfig, SlidingWindowGuard,
    };
    pub use trollkeep_store::{AccountStore, MemoryStore};

    pub use crate::TrollkeepError;
}

pub use trollkeep_account as account;
pub use trollkeep_engine as engine;
pub use trollkeep_guard as guard;
pub use trollkeep_store as store;
