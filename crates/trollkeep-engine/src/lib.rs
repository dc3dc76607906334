//! The Trollkeep verification engine.
//!
//! This crate answers one question: **is this (account id, restricted
//! credential) pair currently authorized?** Everything else — where
//! accounts live, how remote calls are throttled, who actually checks a
//! credential — comes in through traits, so the whole state machine runs
//! against in-memory fakes in tests.
//!
//! # The state machine
//!
//! ```text
//!                      ┌─ unknown id ──→ create on first contact
//!                      │                 (guard check → remote call → insert)
//! verify_or_reconcile ─┼─ known id, same credential ──→ answer from cache,
//!                      │                                 NO remote call
//!                      └─ known id, changed credential ──→ re-verify
//!                                (guard check → remote call → asymmetric write)
//! ```
//!
//! The "asymmetric write" on the last arm is the heart of the design: if
//! the account was healthy (`ok`) and the new credential fails to verify,
//! the stored record is left completely untouched. A stranger probing a
//! troll's id with guessed passwords must not be able to knock a
//! legitimate player's cached credential out from under them.
//!
//! # Concurrency
//!
//! The engine is stateless between calls; all durable state lives in the
//! store and the guard. Concurrent calls for the same account can race
//! between lookup and write — last write wins. Callers needing strict
//! per-account ordering must serialize externally.

#![allow(async_fn_in_trait)]

mod config;
mod engine;
mod error;
mod verifier;

pub use config::EngineConfig;
pub use engine::{VerificationEngine, VerifyOutcome};
pub use error::VerifyError;
pub use verifier::{CredentialVerifier, Verdict, VerifierError};
