//! The persistence manager — dirty tracking, debounced flushes, and
//! defaults-on-corruption loads.
//!
//! Every new dirty mark restarts (not accumulates) the debounce timer,
//! so a burst of purchases produces one flush shortly after the burst
//! ends. A long-interval fallback guarantees a dirty session is never
//! more than one interval away from durable storage.

use crate::{
    error::EngineResult,
    snapshot::{EconomySnapshot, SNAPSHOT_VERSION},
    store::SnapshotRepository,
    types::Seconds,
};

pub struct PersistenceManager {
    repository: Box<dyn SnapshotRepository>,
    slot: String,
    debounce_delay: Seconds,
    fallback_interval: Seconds,
    debounce_remaining: Option<Seconds>,
    fallback_remaining: Seconds,
    dirty: bool,
}

impl PersistenceManager {
    pub fn new(
        repository: Box<dyn SnapshotRepository>,
        slot: String,
        debounce_delay: Seconds,
        fallback_interval: Seconds,
    ) -> Self {
        Self {
            repository,
            slot,
            debounce_delay,
            fallback_interval,
            debounce_remaining: None,
            fallback_remaining: fallback_interval,
            dirty: false,
        }
    }

    /// Record that live state diverged from the stored snapshot and
    /// restart the debounce window.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
        self.debounce_remaining = Some(self.debounce_delay);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Advance both timers. Returns true when a flush is due; the
    /// caller captures the snapshot and calls [`flush`](Self::flush).
    pub fn tick(&mut self, delta: Seconds) -> bool {
        if delta <= 0.0 {
            return false;
        }
        let mut due = false;
        if let Some(remaining) = self.debounce_remaining.as_mut() {
            *remaining -= delta;
            if *remaining <= 0.0 {
                self.debounce_remaining = None;
                due = true;
            }
        }
        self.fallback_remaining -= delta;
        if self.fallback_remaining <= 0.0 {
            self.fallback_remaining = self.fallback_interval;
            due = true;
        }
        due && self.dirty
    }

    /// Serialize and write the snapshot as one versioned blob.
    pub fn flush(&mut self, snapshot: &EconomySnapshot) -> EngineResult<()> {
        let blob = serde_json::to_string(snapshot)?;
        self.repository.save(&self.slot, &blob)?;
        self.dirty = false;
        self.debounce_remaining = None;
        log::info!("snapshot flushed to slot '{}'", self.slot);
        Ok(())
    }

    /// Read the stored snapshot. Missing, unparsable, or
    /// future-versioned blobs fall back to the all-defaults snapshot;
    /// this never fails out to the caller.
    pub fn load(&self) -> EconomySnapshot {
        let blob = match self.repository.load(&self.slot) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                log::info!("slot '{}' empty, starting from defaults", self.slot);
                return EconomySnapshot::default();
            }
            Err(e) => {
                log::warn!("failed to read slot '{}': {e}, using defaults", self.slot);
                return EconomySnapshot::default();
            }
        };
        match serde_json::from_str::<EconomySnapshot>(&blob) {
            Ok(snapshot) if snapshot.version <= SNAPSHOT_VERSION => snapshot,
            Ok(snapshot) => {
                log::warn!(
                    "slot '{}' has snapshot version {} (supported {}), using defaults",
                    self.slot,
                    snapshot.version,
                    SNAPSHOT_VERSION
                );
                EconomySnapshot::default()
            }
            Err(e) => {
                log::warn!("corrupt snapshot in slot '{}': {e}, using defaults", self.slot);
                EconomySnapshot::default()
            }
        }
    }

    /// Delete the stored record and forget any pending write.
    pub fn clear_slot(&mut self) -> EngineResult<()> {
        self.repository.clear(&self.slot)?;
        self.dirty = false;
        self.debounce_remaining = None;
        self.fallback_remaining = self.fallback_interval;
        log::info!("slot '{}' cleared", self.slot);
        Ok(())
    }
}
