//! Engine configuration — every numeric baseline in one place.
//!
//! RULE: No gameplay constant is hardcoded in a component. Anything a
//! designer might retune (starting damage, crit odds, fever window,
//! upgrade curves) lives here, with the documented baseline as the
//! `Default` and an optional JSON override file.

use crate::{
    currency::CurrencyType,
    error::{EngineError, EngineResult},
    types::Seconds,
    upgrade::{UpgradeSpec, UpgradeType},
};
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Base damage of a manual click before any upgrade.
    pub manual_damage: f64,
    /// Base damage of one auto-clicker hit.
    pub auto_damage: f64,
    pub critical_chance: f64,
    pub critical_multiplier: f64,
    /// Golden apples credited per critical hit.
    pub golden_apples_per_critical: f64,
    pub tree_max_health: f64,
    /// Respawn bonus = current base manual damage × this factor.
    pub respawn_bonus_factor: f64,
    /// Fixed auto-income interval. Must be > 0.
    pub auto_income_interval: Seconds,
    /// Apples credited per auto-harvest unit per interval.
    pub auto_unit_yield: f64,
    pub fever: FeverConfig,
    pub save: SaveConfig,
    pub upgrades: Vec<UpgradeSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeverConfig {
    /// Manual clicks required to trigger fever.
    pub threshold: u32,
    pub multiplier: f64,
    pub duration: Seconds,
    /// Fever-mastery levels 1–2: threshold reduction per level…
    pub threshold_step: u32,
    /// …never below this floor.
    pub threshold_floor: u32,
    /// Fever-mastery levels 3–4: multiplier increase per level.
    pub multiplier_step: f64,
    /// Fever-mastery level 5: duration is multiplied by this factor.
    pub duration_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveConfig {
    pub slot: String,
    /// Quiet period after the last mutation before a flush.
    pub debounce_delay: Seconds,
    /// Long-interval safety net: flush at least this often while dirty.
    pub fallback_interval: Seconds,
}

impl Default for FeverConfig {
    fn default() -> Self {
        Self {
            threshold: 75,
            multiplier: 2.5,
            duration: 10.0,
            threshold_step: 10,
            threshold_floor: 5,
            multiplier_step: 0.5,
            duration_factor: 1.5,
        }
    }
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            slot: "default".to_string(),
            debounce_delay: 0.5,
            fallback_interval: 30.0,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            manual_damage: 1.0,
            auto_damage: 1.0,
            critical_chance: 0.1,
            critical_multiplier: 2.0,
            golden_apples_per_critical: 1.0,
            tree_max_health: 100.0,
            respawn_bonus_factor: 10.0,
            auto_income_interval: 1.0,
            auto_unit_yield: 50.0,
            fever: FeverConfig::default(),
            save: SaveConfig::default(),
            upgrades: baseline_upgrade_table(),
        }
    }
}

/// The baseline upgrade catalog. Costs grow geometrically per level;
/// effects are applied by the catalog's per-type policy.
fn baseline_upgrade_table() -> Vec<UpgradeSpec> {
    vec![
        UpgradeSpec {
            upgrade: UpgradeType::AppleHarvest,
            name: "Apple Harvest".to_string(),
            description: "Pick bigger apples: +10 click damage per level".to_string(),
            max_level: 10,
            base_cost: 500.0,
            cost_multiplier: 1.8,
            effect_step: 10.0,
            currency: CurrencyType::Apple,
        },
        UpgradeSpec {
            upgrade: UpgradeType::SquirrelHire,
            name: "Squirrel Hire".to_string(),
            description: "A diligent squirrel gathers apples automatically".to_string(),
            max_level: 5,
            base_cost: 1000.0,
            cost_multiplier: 2.5,
            effect_step: 1.0,
            currency: CurrencyType::Apple,
        },
        UpgradeSpec {
            upgrade: UpgradeType::GoldenAppleLuck,
            name: "Golden Apple Luck".to_string(),
            description: "+5% critical chance per level".to_string(),
            max_level: 5,
            base_cost: 2000.0,
            cost_multiplier: 2.0,
            effect_step: 0.05,
            currency: CurrencyType::Apple,
        },
        UpgradeSpec {
            upgrade: UpgradeType::FeverMaster,
            name: "Fever Master".to_string(),
            description: "Makes fever time easier to reach and stronger".to_string(),
            max_level: 5,
            base_cost: 3000.0,
            cost_multiplier: 3.0,
            effect_step: 0.0, // banded effect, tuned by FeverConfig steps
            currency: CurrencyType::Apple,
        },
        UpgradeSpec {
            upgrade: UpgradeType::SuperCritical,
            name: "Super Critical".to_string(),
            description: "+0.5× critical damage per level".to_string(),
            max_level: 5,
            base_cost: 5000.0,
            cost_multiplier: 2.5,
            effect_step: 0.5,
            currency: CurrencyType::Apple,
        },
    ]
}

impl EngineConfig {
    /// Load a config override file (JSON). Falls back to `Default` for
    /// any field the file omits.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Catalog validation — fail loudly at startup rather than
    /// tolerate an unregistered upgrade at runtime.
    pub fn validate(&self) -> EngineResult<()> {
        for spec in &self.upgrades {
            spec.validate()?;
        }
        for upgrade in UpgradeType::ALL {
            let count = self
                .upgrades
                .iter()
                .filter(|s| s.upgrade == upgrade)
                .count();
            if count != 1 {
                return Err(EngineError::InvalidConfig(format!(
                    "upgrade {:?} has {count} spec entries, expected exactly 1",
                    upgrade
                )));
            }
        }
        if self.tree_max_health <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "tree_max_health must be > 0, got {}",
                self.tree_max_health
            )));
        }
        if self.auto_income_interval <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "auto_income_interval must be > 0, got {}",
                self.auto_income_interval
            )));
        }
        if self.fever.threshold == 0 {
            return Err(EngineError::InvalidConfig(
                "fever.threshold must be > 0".to_string(),
            ));
        }
        if self.fever.duration <= 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "fever.duration must be > 0, got {}",
                self.fever.duration
            )));
        }
        if !(0.0..=1.0).contains(&self.critical_chance) {
            return Err(EngineError::InvalidConfig(format!(
                "critical_chance must be in [0, 1], got {}",
                self.critical_chance
            )));
        }
        if self.save.debounce_delay <= 0.0 || self.save.fallback_interval <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "save timers must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn spec_for(&self, upgrade: UpgradeType) -> Option<&UpgradeSpec> {
        self.upgrades.iter().find(|s| s.upgrade == upgrade)
    }
}
