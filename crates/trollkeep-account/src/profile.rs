//! The gameplay profile carried alongside an account.
//!
//! These fields belong to the game subsystems (position, health, turn
//! timers); the account layer stores and forwards them without looking
//! inside — with one exception: `next_turn` doubles as the "is this
//! profile meaningful?" flag that gates full-profile writes.

use serde::{Deserialize, Serialize};

/// In-game state for a troll, carried as opaque payload by the account
/// record.
///
/// Timestamps (`next_turn`, `updated_at`) are milliseconds since the
/// epoch in memory; stores that persist them in seconds convert at their
/// own boundary. `turn_duration` is in seconds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrollProfile {
    /// Maximum health points.
    pub max_health: i32,
    /// Current health points.
    pub current_health: i32,
    /// Position on the map.
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Accumulated fatigue.
    pub fatigue: i32,
    /// Remaining action points.
    pub action_points: i32,
    /// View range, in cells.
    pub view_range: i32,
    /// When the troll's next turn starts (ms timestamp). Zero or negative
    /// means "no turn data" — see [`TrollProfile::is_meaningful`].
    pub next_turn: i64,
    /// Length of a turn, in seconds.
    pub turn_duration: i64,
    /// When this profile was last refreshed (ms timestamp).
    pub updated_at: i64,
}

impl TrollProfile {
    /// Whether the non-position fields carry real data.
    ///
    /// A profile that has never been through a game update has no turn
    /// schedule; writing its zeroed health and fatigue over good data
    /// would be destructive. Stores persist the full field group only
    /// when this returns `true` — position is written either way.
    pub fn is_meaningful(&self) -> bool {
        self.next_turn > 0
    }
}
