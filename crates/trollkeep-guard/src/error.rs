//! Error types for the guard layer.

/// Errors the guard itself can suffer.
///
/// Deliberately small: "call denied" is NOT an error (see
/// [`Admission`](crate::Admission)). This enum only covers the guard's
/// own machinery failing — a poisoned lock, an unreachable counter
/// backend, and so on.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    /// The guard's backing state could not be read or written.
    #[error("rate guard backend failure: {0}")]
    Backend(String),
}
