//! The auto-income ticker.
//!
//! Once per fixed interval, owned auto-harvest units credit apples
//! through the same ledger path as hit rewards, so they participate in
//! the same change events. Auto-income is not a hit: fever and
//! criticals do not apply.

use crate::{
    currency::{CurrencyLedger, CurrencyType},
    error::EngineResult,
    event::EngineEvent,
    stats::EconomyStats,
    types::Seconds,
};

#[derive(Debug, Clone)]
pub struct AutoIncomeTicker {
    interval: Seconds,
    accumulated: Seconds,
}

impl AutoIncomeTicker {
    pub fn new(interval: Seconds) -> Self {
        debug_assert!(interval > 0.0);
        Self {
            interval,
            accumulated: 0.0,
        }
    }

    /// Advance by `delta`, crediting once per whole interval elapsed.
    /// A large delta pays out multiple intervals; leftover time stays
    /// in the accumulator. Returns the total amount credited.
    pub fn tick(
        &mut self,
        delta: Seconds,
        stats: &EconomyStats,
        ledger: &mut CurrencyLedger,
        events: &mut Vec<EngineEvent>,
    ) -> EngineResult<f64> {
        if delta <= 0.0 {
            return Ok(0.0);
        }
        self.accumulated += delta;
        let mut credited = 0.0;
        while self.accumulated >= self.interval {
            self.accumulated -= self.interval;
            if stats.auto_unit_count == 0 {
                continue;
            }
            let amount = f64::from(stats.auto_unit_count) * stats.auto_unit_yield;
            ledger.add(CurrencyType::Apple, amount, events)?;
            credited += amount;
        }
        if credited > 0.0 {
            log::debug!(
                "auto income: {} units credited {credited}",
                stats.auto_unit_count
            );
        }
        Ok(credited)
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}
