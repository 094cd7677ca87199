//! The fever state machine.
//!
//! Two states, `Idle` and `Active`, cycling for the life of the
//! session. Manual clicks fill a gauge while idle; reaching the
//! threshold starts a timed window granting a flat damage multiplier.
//!
//! Invariants:
//! - `remaining > 0` iff the machine is `Active`.
//! - The click gauge only advances while `Idle`.

use crate::{event::EngineEvent, types::Seconds};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeverPhase {
    Idle,
    Active,
}

#[derive(Debug, Clone)]
pub struct FeverState {
    phase: FeverPhase,
    click_count: u32,
    threshold: u32,
    remaining: Seconds,
    duration: Seconds,
    multiplier: f64,
}

impl FeverState {
    pub fn new(threshold: u32, multiplier: f64, duration: Seconds) -> Self {
        Self {
            phase: FeverPhase::Idle,
            click_count: 0,
            threshold,
            remaining: 0.0,
            duration,
            multiplier,
        }
    }

    /// Count one manual click toward the gauge. No-op while active.
    /// The threshold-th click triggers the transition: the gauge
    /// resets to zero and the timer starts.
    pub fn register_manual_click(&mut self, events: &mut Vec<EngineEvent>) {
        if self.phase == FeverPhase::Active {
            return;
        }
        self.click_count += 1;
        if self.click_count >= self.threshold {
            self.phase = FeverPhase::Active;
            self.remaining = self.duration;
            self.click_count = 0;
            events.push(EngineEvent::FeverStarted);
            log::info!("fever started: x{} for {}s", self.multiplier, self.duration);
        }
    }

    /// Advance the active-window timer. `tick(0)` is a no-op.
    pub fn tick(&mut self, delta: Seconds, events: &mut Vec<EngineEvent>) {
        if self.phase != FeverPhase::Active || delta <= 0.0 {
            return;
        }
        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.phase = FeverPhase::Idle;
            events.push(EngineEvent::FeverEnded);
            log::info!("fever ended");
        } else {
            events.push(EngineEvent::FeverTick {
                remaining: self.remaining,
            });
        }
    }

    pub fn damage_multiplier(&self) -> f64 {
        match self.phase {
            FeverPhase::Active => self.multiplier,
            FeverPhase::Idle => 1.0,
        }
    }

    pub fn phase(&self) -> FeverPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == FeverPhase::Active
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn remaining(&self) -> Seconds {
        self.remaining
    }

    /// Gauge fill fraction in [0, 1] (clicks toward the threshold).
    pub fn gauge_fraction(&self) -> f64 {
        f64::from(self.click_count) / f64::from(self.threshold.max(1))
    }

    /// Remaining-time fraction in [0, 1] while active, 0 when idle.
    pub fn time_fraction(&self) -> f64 {
        if self.duration > 0.0 {
            (self.remaining / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Retune the machine after an upgrade or a load. An active window
    /// keeps its remaining time; the new multiplier applies from the
    /// next `damage_multiplier` read.
    pub fn reconfigure(&mut self, threshold: u32, multiplier: f64, duration: Seconds) {
        self.threshold = threshold.max(1);
        self.multiplier = multiplier;
        self.duration = duration;
    }
}
