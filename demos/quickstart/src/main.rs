//! Trollkeep quickstart: the whole reconciliation loop, in memory.
//!
//! Wires a `VerificationEngine` to the in-memory store, the sliding-window
//! guard, and a canned "remote" verifier, then walks through the scenarios
//! the engine exists for: first contact, cache hit, a stranger probing
//! with wrong guesses, a legitimate password change, and the rate guard
//! slamming the door.
//!
//! Run with `RUST_LOG=debug cargo run -p quickstart` to watch the engine
//! narrate its decisions.

use std::time::Duration;

use trollkeep::prelude::*;

// ---------------------------------------------------------------------------
// A canned remote verifier
// ---------------------------------------------------------------------------

/// Stands in for the operators' authentication service: exactly one
/// credential is valid per troll, decided at construction.
struct CannedVerifier {
    valid: RestrictedCredential,
}

impl CredentialVerifier for CannedVerifier {
    async fn verify(
        &self,
        id: AccountId,
        credential: &RestrictedCredential,
    ) -> Result<Verdict, VerifierError> {
        tracing::info!(%id, "(remote verifier consulted)");
        if *credential == self.valid {
            Ok(Verdict {
                valid: true,
                details: "credential accepted".into(),
            })
        } else {
            Ok(Verdict {
                valid: false,
                details: "wrong restricted password".into(),
            })
        }
    }
}

// ---------------------------------------------------------------------------
// The walkthrough
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), TrollkeepError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let troll = AccountId(42);
    let engine = VerificationEngine::new(
        MemoryStore::new(),
        // A tight budget so the demo can show a denial: 3 calls per hour.
        SlidingWindowGuard::new(GuardConfig {
            max_calls: 3,
            window: Duration::from_secs(3600),
        }),
        CannedVerifier {
            valid: RestrictedCredential::parse("GROKDUEL")?,
        },
        EngineConfig::default(),
    );

    // 1. First contact: unknown id, valid credential → account created.
    let outcome = engine.verify_or_reconcile(troll, "GROKDUEL").await?;
    println!("first contact:        authorized = {}", outcome.authorized);

    // 2. Same credential again: answered from the store, no remote call.
    let outcome = engine.verify_or_reconcile(troll, "GROKDUEL").await?;
    println!("cache hit:            authorized = {}", outcome.authorized);
    println!(
        "is_known_good:        {}",
        engine.is_known_good(troll, "GROKDUEL").await
    );

    // 3. A stranger probes with a wrong guess: denied, record untouched.
    let outcome = engine.verify_or_reconcile(troll, "BADGUESS").await?;
    println!("probe with wrong pwd: authorized = {}", outcome.authorized);
    let account = engine.get_account(troll).await?.expect("account exists");
    println!(
        "record after probe:   status = {}, still trusts the old credential",
        account.status
    );

    // 4. One more remote call — the third — exhausts the budget...
    let _ = engine.verify_or_reconcile(troll, "BADAGAIN").await?;

    // ...so the next changed-credential check is rate-limited.
    match engine.verify_or_reconcile(troll, "YETAGAIN").await {
        Err(e @ VerifyError::RateLimited(_)) => {
            println!("fourth remote call:   {e}");
        }
        other => println!("fourth remote call:   unexpected: {other:?}"),
    }

    // 5. The gameplay side fills in a profile and it tags along.
    let mut account = engine.get_account(troll).await?.expect("account exists");
    account.profile = Some(TrollProfile {
        max_health: 260,
        current_health: 215,
        x: 118,
        y: -42,
        z: 0,
        fatigue: 12,
        action_points: 5,
        view_range: 6,
        next_turn: 1_700_003_600_000,
        turn_duration: 43_200,
        updated_at: 0,
    });
    let profile = account.profile.as_ref().expect("just set");
    println!(
        "profile payload:      {}",
        serde_json::to_string_pretty(profile).expect("profile serializes")
    );

    Ok(())
}
