//! Live derived economy values — the numbers upgrades actually modify.
//!
//! `EconomyStats` is rebuilt from upgrade levels on load (a pure
//! recomputation, never a replay of purchases), and mutated one step
//! at a time as purchases land. `from_levels` and step-wise
//! `apply_effect` calls must always agree; tests pin that equivalence.

use crate::{
    config::EngineConfig,
    types::Seconds,
    upgrade::UpgradeType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyStats {
    pub manual_damage: f64,
    pub auto_damage: f64,
    /// Clamped to [0, 1] by the effect policy.
    pub critical_chance: f64,
    pub critical_multiplier: f64,
    pub golden_apples_per_critical: f64,
    pub auto_unit_count: u32,
    pub auto_unit_yield: f64,
    pub fever_threshold: u32,
    pub fever_multiplier: f64,
    pub fever_duration: Seconds,
}

impl EconomyStats {
    /// Level-zero stats straight from config.
    pub fn baseline(config: &EngineConfig) -> Self {
        Self {
            manual_damage: config.manual_damage,
            auto_damage: config.auto_damage,
            critical_chance: config.critical_chance,
            critical_multiplier: config.critical_multiplier,
            golden_apples_per_critical: config.golden_apples_per_critical,
            auto_unit_count: 0,
            auto_unit_yield: config.auto_unit_yield,
            fever_threshold: config.fever.threshold,
            fever_multiplier: config.fever.multiplier,
            fever_duration: config.fever.duration,
        }
    }

    /// Recompute stats from scratch for a set of upgrade levels.
    /// This is the load-time reconciliation path: levels are restored
    /// by direct assignment, then stats are re-derived here.
    pub fn from_levels(config: &EngineConfig, levels: &BTreeMap<UpgradeType, u32>) -> Self {
        let mut stats = Self::baseline(config);
        for (&upgrade, &level) in levels {
            for step in 1..=level {
                stats.apply_effect(config, upgrade, step);
            }
        }
        stats
    }

    /// Apply the effect of reaching `new_level` in `upgrade`.
    /// Called exactly once per successful level-up.
    ///
    /// The mapping from upgrade type to effect is static catalog
    /// policy, not generic: most types add `effect_step` to one stat;
    /// fever mastery is banded by level.
    pub fn apply_effect(&mut self, config: &EngineConfig, upgrade: UpgradeType, new_level: u32) {
        let step = config
            .spec_for(upgrade)
            .map(|s| s.effect_step)
            .unwrap_or(0.0);
        match upgrade {
            UpgradeType::AppleHarvest => {
                self.manual_damage += step;
            }
            UpgradeType::SquirrelHire => {
                self.auto_unit_count += step as u32;
            }
            UpgradeType::GoldenAppleLuck => {
                self.critical_chance = (self.critical_chance + step).min(1.0);
            }
            UpgradeType::SuperCritical => {
                self.critical_multiplier += step;
            }
            UpgradeType::FeverMaster => {
                let fever = &config.fever;
                if new_level <= 2 {
                    self.fever_threshold = self
                        .fever_threshold
                        .saturating_sub(fever.threshold_step)
                        .max(fever.threshold_floor);
                } else if new_level <= 4 {
                    self.fever_multiplier += fever.multiplier_step;
                } else {
                    self.fever_duration *= fever.duration_factor;
                }
            }
        }
    }
}
