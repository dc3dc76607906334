//! Troll account data model for Trollkeep.
//!
//! This crate defines the types that every other Trollkeep crate speaks:
//! who a troll is ([`AccountId`]), how far the server trusts them
//! ([`AccountStatus`]), the last credential we saw for them
//! ([`RestrictedCredential`]), and the gameplay payload carried along for
//! the ride ([`TrollProfile`]).
//!
//! # One important split
//!
//! An [`Account`] has two very different halves:
//!
//! - **Management fields** (`status`, `credential`) — server-private.
//!   They never derive `Serialize`; nothing here should ever end up in a
//!   JSON response by accident.
//! - **Profile fields** ([`TrollProfile`]) — owned by the gameplay
//!   subsystems and freely serialized. This crate just carries them.

mod credential;
mod profile;
mod types;

pub use credential::{CREDENTIAL_LEN, CredentialError, RestrictedCredential};
pub use profile::TrollProfile;
pub use types::{Account, AccountId, AccountStatus, UnknownStatus};
