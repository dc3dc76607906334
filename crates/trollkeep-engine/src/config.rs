//! Engine configuration.

/// Policy switches for the verification engine.
///
/// These used to be process-wide flags in the system this design comes
/// from; here they are an explicit value handed to
/// [`VerificationEngine::new`](crate::VerificationEngine::new), so two
/// engines in one process can run different policies and tests don't
/// fight over globals.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Whether an unknown account id presented with a credential may be
    /// created on the spot ("self-provisioning"), and whether a changed
    /// credential may be re-verified remotely. When `false`, the engine
    /// only ever answers from the store.
    pub allow_self_provisioning: bool,

    /// Whether to consult the call-rate guard before each remote call.
    /// When `false`, every remote call is implicitly admitted — useful
    /// for closed betas where the operators have lifted the quota.
    pub consult_rate_guard: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_self_provisioning: true,
            consult_rate_guard: true,
        }
    }
}
