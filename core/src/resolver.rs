//! The hit-resolution pipeline.
//!
//! A raw hit goes through a fixed, documented order:
//!   1. Manual hits register on the fever gauge first, so the click
//!      counts toward fever even though this hit may already benefit
//!      from an active window.
//!   2. Base damage × fever multiplier.
//!   3. Critical roll against the catalog-modified chance, then the
//!      critical multiplier.
//!   4. Damage lands on the tree; an equal amount of apples is
//!      credited (reward is 1:1 with damage dealt, bonuses included).
//!   5. `HitResolved` is emitted for presentation layers.
//!
//! There is no failure path for the roll itself — a zero-damage hit is
//! valid and resolves to zero.

use crate::{
    currency::{CurrencyLedger, CurrencyType},
    error::EngineResult,
    event::EngineEvent,
    fever::FeverState,
    rng::EngineRng,
    stats::EconomyStats,
    tree::Tree,
    types::Position,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSource {
    Manual,
    Auto,
}

/// A raw hit descriptor entering the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub source: HitSource,
    pub base_damage: f64,
    pub position: Position,
}

/// Outcome of one resolved hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedHit {
    pub damage: f64,
    pub critical: bool,
    /// True when this hit felled the tree (it has already respawned).
    pub felled: bool,
}

/// Owns the deterministic RNG used for critical rolls.
pub struct DamageResolver {
    rng: EngineRng,
}

impl DamageResolver {
    pub fn new(master_seed: u64) -> Self {
        Self {
            rng: EngineRng::new(master_seed),
        }
    }

    pub fn resolve(
        &mut self,
        hit: Hit,
        stats: &EconomyStats,
        fever: &mut FeverState,
        tree: &mut Tree,
        ledger: &mut CurrencyLedger,
        events: &mut Vec<EngineEvent>,
    ) -> EngineResult<ResolvedHit> {
        // Click registration happens before the multiplier is read for
        // this same hit — single self-consistent pass, no reordering.
        if hit.source == HitSource::Manual {
            fever.register_manual_click(events);
        }

        let mut damage = hit.base_damage.max(0.0) * fever.damage_multiplier();

        let critical = self.rng.chance(stats.critical_chance);
        if critical {
            damage *= stats.critical_multiplier;
        }

        let felled = tree.apply_damage(damage, events);

        ledger.add(CurrencyType::Apple, damage, events)?;
        if critical && stats.golden_apples_per_critical > 0.0 {
            ledger.add(
                CurrencyType::GoldenApple,
                stats.golden_apples_per_critical,
                events,
            )?;
        }

        events.push(EngineEvent::HitResolved {
            damage,
            critical,
            position: hit.position,
        });

        log::debug!(
            "hit resolved: source={:?} base={} final={damage} critical={critical}",
            hit.source,
            hit.base_damage
        );

        Ok(ResolvedHit {
            damage,
            critical,
            felled,
        })
    }
}
