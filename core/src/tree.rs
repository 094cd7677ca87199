//! The clickable target: a regenerating tree health pool.
//!
//! Invariant: `0 <= current_health <= max_health` after any resolved
//! hit. Health is clamped to zero before the respawn transition fires,
//! and a felled tree respawns at full health within the same hit.

use crate::event::EngineEvent;

#[derive(Debug, Clone)]
pub struct Tree {
    current_health: f64,
    max_health: f64,
}

impl Tree {
    pub fn new(max_health: f64) -> Self {
        debug_assert!(max_health > 0.0);
        Self {
            current_health: max_health,
            max_health,
        }
    }

    /// Reduce health by `amount` (negative inputs are ignored).
    /// Returns true when the tree was felled and respawned; the caller
    /// grants the bonus reward and emits `TreeRespawned`.
    pub fn apply_damage(&mut self, amount: f64, events: &mut Vec<EngineEvent>) -> bool {
        if amount < 0.0 || !amount.is_finite() {
            log::warn!("ignoring invalid damage amount {amount}");
            return false;
        }
        self.current_health = (self.current_health - amount).max(0.0);
        events.push(EngineEvent::TreeHealthChanged {
            fraction: self.health_fraction(),
        });
        if self.current_health == 0.0 {
            self.respawn(events);
            true
        } else {
            false
        }
    }

    fn respawn(&mut self, events: &mut Vec<EngineEvent>) {
        self.current_health = self.max_health;
        events.push(EngineEvent::TreeHealthChanged { fraction: 1.0 });
        log::info!("tree respawned at full health {}", self.max_health);
    }

    pub fn current_health(&self) -> f64 {
        self.current_health
    }

    pub fn max_health(&self) -> f64 {
        self.max_health
    }

    pub fn health_fraction(&self) -> f64 {
        self.current_health / self.max_health
    }

    /// Test/debug hook: force a specific health value (clamped).
    pub fn set_health(&mut self, health: f64) {
        self.current_health = health.clamp(0.0, self.max_health);
    }
}
