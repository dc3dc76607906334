//! Account persistence for Trollkeep.
//!
//! This crate defines the [`AccountStore`] trait — the five operations the
//! verification engine needs from whatever actually holds account rows —
//! and ships [`MemoryStore`], an in-memory reference implementation used
//! by tests and demos.
//!
//! # How it fits in the stack
//!
//! ```text
//! Verification Engine (above)  ← decides WHAT to read and write
//!     ↕
//! Account Store (this crate)   ← knows HOW rows are kept
//! ```
//!
//! The store is deliberately dumb: no verification logic, no rate
//! policy. "Absent" is an answer, not an error — an unknown account id
//! comes back as `Ok(None)`.

#![allow(async_fn_in_trait)]

mod error;
mod memory;
mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::AccountStore;
