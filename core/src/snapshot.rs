//! Snapshot serialization — the complete persisted economy state as
//! one versioned record.
//!
//! The snapshot is owned exclusively by the persistence manager; live
//! components never see it. Missing fields default-fill on load so old
//! saves migrate forward instead of being discarded.

use crate::{
    catalog::UpgradeCatalog,
    currency::{CurrencyLedger, CurrencyType},
    stats::EconomyStats,
    types::Seconds,
    upgrade::UpgradeType,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomySnapshot {
    pub version: u32,
    pub currencies: BTreeMap<CurrencyType, f64>,
    pub upgrade_levels: BTreeMap<UpgradeType, u32>,
    pub total_earned: f64,
    // Derived stats, stored for external readers (dashboards, cloud
    // profiles). On load the engine recomputes them from the levels
    // above; the levels are the source of truth.
    pub manual_damage: f64,
    pub critical_chance: f64,
    pub critical_multiplier: f64,
    pub auto_unit_count: u32,
    pub auto_unit_yield: f64,
    pub fever_threshold: u32,
    pub fever_multiplier: f64,
    pub fever_duration: Seconds,
}

impl Default for EconomySnapshot {
    fn default() -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            currencies: BTreeMap::new(),
            upgrade_levels: BTreeMap::new(),
            total_earned: 0.0,
            manual_damage: 0.0,
            critical_chance: 0.0,
            critical_multiplier: 0.0,
            auto_unit_count: 0,
            auto_unit_yield: 0.0,
            fever_threshold: 0,
            fever_multiplier: 0.0,
            fever_duration: 0.0,
        }
    }
}

impl EconomySnapshot {
    /// Capture the current live state into one record.
    pub fn capture(
        ledger: &CurrencyLedger,
        catalog: &UpgradeCatalog,
        stats: &EconomyStats,
    ) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            currencies: CurrencyType::ALL
                .iter()
                .map(|&c| (c, ledger.balance(c)))
                .collect(),
            upgrade_levels: catalog.levels(),
            total_earned: ledger.total_earned(),
            manual_damage: stats.manual_damage,
            critical_chance: stats.critical_chance,
            critical_multiplier: stats.critical_multiplier,
            auto_unit_count: stats.auto_unit_count,
            auto_unit_yield: stats.auto_unit_yield,
            fever_threshold: stats.fever_threshold,
            fever_multiplier: stats.fever_multiplier,
            fever_duration: stats.fever_duration,
        }
    }
}
