//! Upgrade domain types: the immutable spec and the leveled instance.

use crate::{
    currency::CurrencyType,
    error::{EngineError, EngineResult},
};
use serde::{Deserialize, Serialize};

/// Every purchasable upgrade.
/// Variants are appended, never reordered — they appear as string
/// keys in persisted snapshots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeType {
    /// Raises base manual click damage.
    AppleHarvest,
    /// Hires one auto-harvest unit per level.
    SquirrelHire,
    /// Raises critical hit chance.
    GoldenAppleLuck,
    /// Level-banded fever tuning (threshold, multiplier, duration).
    FeverMaster,
    /// Raises the critical damage multiplier.
    SuperCritical,
}

impl UpgradeType {
    pub const ALL: [UpgradeType; 5] = [
        UpgradeType::AppleHarvest,
        UpgradeType::SquirrelHire,
        UpgradeType::GoldenAppleLuck,
        UpgradeType::FeverMaster,
        UpgradeType::SuperCritical,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::AppleHarvest => "apple_harvest",
            Self::SquirrelHire => "squirrel_hire",
            Self::GoldenAppleLuck => "golden_apple_luck",
            Self::FeverMaster => "fever_master",
            Self::SuperCritical => "super_critical",
        }
    }
}

/// Immutable per-upgrade specification, loaded once from config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpgradeSpec {
    pub upgrade: UpgradeType,
    pub name: String,
    pub description: String,
    pub max_level: u32,
    pub base_cost: f64,
    /// Geometric cost growth per level. Must be > 1 so costs are
    /// strictly increasing.
    pub cost_multiplier: f64,
    /// Per-level effect increment, interpreted by the catalog's
    /// per-type effect policy (damage points, chance, multiplier…).
    pub effect_step: f64,
    pub currency: CurrencyType,
}

impl UpgradeSpec {
    pub fn validate(&self) -> EngineResult<()> {
        let fail = |reason: String| {
            Err(EngineError::InvalidSpec {
                upgrade: self.upgrade,
                reason,
            })
        };
        if self.name.is_empty() {
            return fail("name must not be empty".into());
        }
        if self.base_cost <= 0.0 || !self.base_cost.is_finite() {
            return fail(format!("base_cost must be > 0, got {}", self.base_cost));
        }
        if self.cost_multiplier <= 1.0 || !self.cost_multiplier.is_finite() {
            return fail(format!(
                "cost_multiplier must be > 1, got {}",
                self.cost_multiplier
            ));
        }
        if !self.effect_step.is_finite() {
            return fail(format!("effect_step must be finite, got {}", self.effect_step));
        }
        Ok(())
    }
}

/// A spec plus its mutable current level. Created once at catalog
/// initialization, mutated only by a successful level-up (or by a
/// direct load-time assignment), never destroyed during a session.
#[derive(Debug, Clone)]
pub struct Upgrade {
    spec: UpgradeSpec,
    level: u32,
}

impl Upgrade {
    pub fn new(spec: UpgradeSpec) -> EngineResult<Self> {
        spec.validate()?;
        Ok(Self { spec, level: 0 })
    }

    pub fn spec(&self) -> &UpgradeSpec {
        &self.spec
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= self.spec.max_level
    }

    /// Cost of the next level: `round(base_cost × cost_multiplier^level)`.
    /// `None` once the cap is reached.
    pub fn cost(&self) -> Option<f64> {
        self.cost_at(self.level)
    }

    pub fn cost_at(&self, level: u32) -> Option<f64> {
        if level >= self.spec.max_level {
            return None;
        }
        Some((self.spec.base_cost * self.spec.cost_multiplier.powi(level as i32)).round())
    }

    /// Increment the level. Fails at the cap with no side effects.
    /// Affordability is the catalog's concern, not this type's.
    pub fn level_up(&mut self) -> EngineResult<u32> {
        if self.is_max_level() {
            return Err(EngineError::UpgradeAtMaxLevel {
                upgrade: self.spec.upgrade,
                max_level: self.spec.max_level,
            });
        }
        self.level += 1;
        Ok(self.level)
    }

    /// Load-time only: direct level assignment, bypassing the level-up
    /// transition and cost payment. Out-of-range levels clamp to the cap.
    pub fn set_level(&mut self, level: u32) {
        if level > self.spec.max_level {
            log::warn!(
                "{}: saved level {} above cap {}, clamping",
                self.spec.upgrade.name(),
                level,
                self.spec.max_level
            );
        }
        self.level = level.min(self.spec.max_level);
    }
}
