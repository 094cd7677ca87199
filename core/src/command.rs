use crate::{types::Position, upgrade::UpgradeType};
use serde::{Deserialize, Serialize};

/// All player-issued commands.
///
/// Concurrent external callers (a UI thread, a network thread) must
/// serialize through the engine's command queue; the queue is drained
/// at the start of each tick, so every command is applied atomically
/// with respect to the tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    /// A manual click on the tree at `position`.
    ManualClick { position: Position },
    /// A hit from the auto-clicker. Does not count toward fever.
    AutoClick,
    /// Attempt to buy one level of `upgrade`.
    PurchaseUpgrade { upgrade: UpgradeType },
    /// Wipe the save slot and reinitialize to config defaults.
    ResetSave,
}
