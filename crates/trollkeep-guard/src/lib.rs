//! Call-rate guarding for Trollkeep.
//!
//! The remote verification service belongs to the game operators, and it
//! is rate-limited: hammer it and everyone's tool gets banned. Before the
//! engine makes a remote call it asks the guard "may I?", keyed by the
//! account being checked and the family of call being made.
//!
//! Two things matter about the answer:
//!
//! - **Denied is not an error.** It is a policy decision, surfaced as a
//!   value ([`Admission::Denied`]) so callers can tell "you're over the
//!   limit, back off" apart from "the guard itself broke".
//! - **Allowed means recorded.** The provided implementation counts the
//!   call it just admitted, atomically, so two concurrent checks can't
//!   both sneak under the limit.

#![allow(async_fn_in_trait)]

mod error;
mod guard;
mod window;

pub use error::GuardError;
pub use guard::{Admission, CallCategory, CallRateGuard};
pub use window::{GuardConfig, SlidingWindowGuard};
