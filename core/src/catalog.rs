//! The upgrade catalog — purchase flow and effect policy.
//!
//! RULE: A purchase is atomic with respect to the tick: affordability
//! check, spend, level increment, effect application, in that order.
//! A spend failure stops everything before the level moves, so nothing
//! needs refunding.

use crate::{
    config::EngineConfig,
    currency::CurrencyLedger,
    error::{EngineError, EngineResult},
    event::EngineEvent,
    stats::EconomyStats,
    upgrade::{Upgrade, UpgradeType},
};
use std::collections::BTreeMap;

pub struct UpgradeCatalog {
    upgrades: BTreeMap<UpgradeType, Upgrade>,
}

impl UpgradeCatalog {
    /// Build the catalog from the config spec table. The config has
    /// already been validated, so every upgrade type is present.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        let mut upgrades = BTreeMap::new();
        for spec in &config.upgrades {
            upgrades.insert(spec.upgrade, Upgrade::new(spec.clone())?);
        }
        Ok(Self { upgrades })
    }

    pub fn get(&self, upgrade: UpgradeType) -> EngineResult<&Upgrade> {
        self.upgrades
            .get(&upgrade)
            .ok_or(EngineError::UnknownUpgradeType(upgrade))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Upgrade> {
        self.upgrades.values()
    }

    /// Current level per upgrade type.
    pub fn levels(&self) -> BTreeMap<UpgradeType, u32> {
        self.upgrades
            .iter()
            .map(|(&t, u)| (t, u.level()))
            .collect()
    }

    /// Cost of the next level, `None` at the cap.
    pub fn cost(&self, upgrade: UpgradeType) -> EngineResult<Option<f64>> {
        Ok(self.get(upgrade)?.cost())
    }

    /// True iff below the cap and the ledger covers the next cost.
    pub fn can_level_up(&self, upgrade: UpgradeType, ledger: &CurrencyLedger) -> bool {
        match self.upgrades.get(&upgrade) {
            Some(u) => match u.cost() {
                Some(cost) => ledger.balance(u.spec().currency) >= cost,
                None => false,
            },
            None => false,
        }
    }

    /// Attempt one level-up: spend, increment, apply effect, emit.
    /// Returns Ok(false) at the cap or when funds are short, with no
    /// side effects in either case.
    pub fn try_level_up(
        &mut self,
        upgrade: UpgradeType,
        ledger: &mut CurrencyLedger,
        config: &EngineConfig,
        stats: &mut EconomyStats,
        events: &mut Vec<EngineEvent>,
    ) -> EngineResult<bool> {
        let entry = self
            .upgrades
            .get_mut(&upgrade)
            .ok_or(EngineError::UnknownUpgradeType(upgrade))?;

        let cost = match entry.cost() {
            Some(cost) => cost,
            None => {
                log::debug!("{} already at max level", upgrade.name());
                return Ok(false);
            }
        };

        if !ledger.try_spend(entry.spec().currency, cost, events) {
            log::debug!(
                "{}: cannot afford cost {cost} (have {})",
                upgrade.name(),
                ledger.balance(entry.spec().currency)
            );
            return Ok(false);
        }

        // Spend succeeded and the cap was checked above, so the
        // increment cannot fail.
        let new_level = entry.level_up()?;
        stats.apply_effect(config, upgrade, new_level);

        events.push(EngineEvent::UpgradeLeveledUp {
            upgrade,
            new_level,
            next_cost: entry.cost(),
        });
        log::info!(
            "{} leveled up to {new_level}/{} for {cost}",
            upgrade.name(),
            entry.spec().max_level
        );
        Ok(true)
    }

    /// Load-time only: restore levels by direct assignment, bypassing
    /// the purchase transition. The caller re-derives stats afterward
    /// via `EconomyStats::from_levels`.
    pub fn restore_levels(&mut self, levels: &BTreeMap<UpgradeType, u32>) {
        for (upgrade, entry) in &mut self.upgrades {
            let saved = levels.get(upgrade).copied().unwrap_or(0);
            entry.set_level(saved);
        }
    }
}
