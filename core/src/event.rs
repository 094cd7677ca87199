//! The event channel — everything the engine tells the outside world.
//!
//! RULE: Presentation layers (UI, audio, particles) consume events.
//! They never reach into component state mid-tick, and the engine
//! never calls back into them. Every observable state change has a
//! corresponding event variant here.

use crate::{
    currency::CurrencyType,
    types::{Position, Seconds},
    upgrade::UpgradeType,
};
use serde::{Deserialize, Serialize};

/// Every event emitted by the engine.
/// Variants are added over time — never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A currency balance changed (credit, spend, or load-time set).
    CurrencyChanged {
        currency: CurrencyType,
        new_value: f64,
    },

    /// A hit finished the full resolution pipeline.
    /// `damage` is the final amount after fever and critical bonuses.
    HitResolved {
        damage: f64,
        critical: bool,
        position: Position,
    },

    FeverStarted,
    FeverEnded,
    /// Emitted each tick while fever is active.
    FeverTick { remaining: Seconds },

    /// Tree health as a fraction in [0, 1].
    TreeHealthChanged { fraction: f64 },
    /// The tree was felled and respawned; `bonus` apples were granted.
    TreeRespawned { bonus: f64 },

    UpgradeLeveledUp {
        upgrade: UpgradeType,
        new_level: u32,
        /// Cost of the next level, or `None` once maxed out.
        next_cost: Option<f64>,
    },
}

impl EngineEvent {
    /// Stable string name for an event variant. Used by the runner's
    /// summary counters and by log output.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::CurrencyChanged { .. }   => "currency_changed",
            Self::HitResolved { .. }       => "hit_resolved",
            Self::FeverStarted             => "fever_started",
            Self::FeverEnded               => "fever_ended",
            Self::FeverTick { .. }         => "fever_tick",
            Self::TreeHealthChanged { .. } => "tree_health_changed",
            Self::TreeRespawned { .. }     => "tree_respawned",
            Self::UpgradeLeveledUp { .. }  => "upgrade_leveled_up",
        }
    }
}
