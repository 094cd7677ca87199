//! The currency ledger — one non-negative balance per currency type.
//!
//! RULE: Balances never go negative. Arithmetic that would drive a
//! balance below zero is rejected (`try_spend` returns false, `add`
//! rejects negative amounts); only the load-time `set` clamps.

use crate::{
    error::{EngineError, EngineResult},
    event::EngineEvent,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Every currency the economy knows about.
/// Variants are appended, never reordered — they appear as string
/// keys in persisted snapshots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyType {
    Apple,
    GoldenApple,
}

impl CurrencyType {
    pub const ALL: [CurrencyType; 2] = [CurrencyType::Apple, CurrencyType::GoldenApple];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Apple => "apple",
            Self::GoldenApple => "golden_apple",
        }
    }
}

/// A non-negative currency amount. Equality and ordering compare the
/// wrapped value.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Currency {
    value: f64,
}

impl Currency {
    pub fn new(value: f64) -> Self {
        debug_assert!(value >= 0.0, "currency value must be non-negative");
        Self {
            value: value.max(0.0),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// Holds all balances plus the lifetime total-earned counter.
#[derive(Debug, Clone, Default)]
pub struct CurrencyLedger {
    balances: BTreeMap<CurrencyType, f64>,
    total_earned: f64,
}

impl CurrencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never fails; an untouched currency reads as zero.
    pub fn get(&self, currency: CurrencyType) -> Currency {
        Currency::new(self.balance(currency))
    }

    pub fn balance(&self, currency: CurrencyType) -> f64 {
        self.balances.get(&currency).copied().unwrap_or(0.0)
    }

    /// Lifetime sum of all credits, across resets of the balance.
    pub fn total_earned(&self) -> f64 {
        self.total_earned
    }

    /// Credit `amount`. Rejects negative or non-finite amounts.
    pub fn add(
        &mut self,
        currency: CurrencyType,
        amount: f64,
        events: &mut Vec<EngineEvent>,
    ) -> EngineResult<()> {
        if amount < 0.0 || !amount.is_finite() {
            return Err(EngineError::InvalidAmount { amount });
        }
        let balance = self.balances.entry(currency).or_insert(0.0);
        *balance += amount;
        self.total_earned += amount;
        events.push(EngineEvent::CurrencyChanged {
            currency,
            new_value: *balance,
        });
        Ok(())
    }

    /// Debit `amount`, failing if the balance cannot cover it.
    /// No partial effects on failure.
    pub fn spend(
        &mut self,
        currency: CurrencyType,
        amount: f64,
        events: &mut Vec<EngineEvent>,
    ) -> EngineResult<()> {
        if amount < 0.0 || !amount.is_finite() {
            return Err(EngineError::InvalidAmount { amount });
        }
        let available = self.balance(currency);
        if available < amount {
            return Err(EngineError::InsufficientFunds {
                currency,
                needed: amount,
                available,
            });
        }
        let balance = self.balances.entry(currency).or_insert(0.0);
        *balance -= amount;
        events.push(EngineEvent::CurrencyChanged {
            currency,
            new_value: *balance,
        });
        Ok(())
    }

    /// Boolean-outcome wrapper around [`spend`](Self::spend): returns
    /// false without mutation when the debit is rejected.
    pub fn try_spend(
        &mut self,
        currency: CurrencyType,
        amount: f64,
        events: &mut Vec<EngineEvent>,
    ) -> bool {
        match self.spend(currency, amount, events) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("spend rejected: {e}");
                false
            }
        }
    }

    /// Load-time only: overwrite a balance, clamping negative or
    /// non-finite inputs to zero.
    pub fn set(&mut self, currency: CurrencyType, amount: f64, events: &mut Vec<EngineEvent>) {
        let value = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        self.balances.insert(currency, value);
        events.push(EngineEvent::CurrencyChanged {
            currency,
            new_value: value,
        });
    }

    /// Load-time only: restore the lifetime counter from a snapshot.
    pub fn set_total_earned(&mut self, total: f64) {
        self.total_earned = if total.is_finite() { total.max(0.0) } else { 0.0 };
    }
}
