//! Shared primitive types used across the entire engine.

use serde::{Deserialize, Serialize};

/// Engine time in fractional seconds. All timers are advanced by an
/// external driver passing elapsed time — nothing polls a wall clock.
pub type Seconds = f64;

/// A world/screen position attached to a hit. The engine never
/// interprets it; it is carried through to `HitResolved` so
/// presentation layers can spawn floating text and particles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}
