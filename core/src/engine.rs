//! The game engine — one instance of every component, wired together.
//!
//! RULES:
//!   - A single logical owner thread drives the engine. External
//!     callers serialize through the command queue; the queue is
//!     drained at the start of each tick.
//!   - No component blocks or polls a wall clock. Fever, auto income,
//!     and the save debounce all advance via `tick(delta)`.
//!   - All randomness flows through the resolver's seeded RNG.
//!   - No gameplay failure is fatal: a rejected command means the
//!     requested mutation did not happen, nothing more.

use crate::{
    catalog::UpgradeCatalog,
    command::PlayerCommand,
    config::EngineConfig,
    currency::{CurrencyLedger, CurrencyType},
    error::EngineResult,
    event::EngineEvent,
    fever::FeverState,
    persist::PersistenceManager,
    resolver::{DamageResolver, Hit, HitSource},
    snapshot::EconomySnapshot,
    stats::EconomyStats,
    store::SnapshotRepository,
    ticker::AutoIncomeTicker,
    tree::Tree,
    types::{Position, Seconds},
};
use std::collections::VecDeque;

pub struct GameEngine {
    config: EngineConfig,
    ledger: CurrencyLedger,
    catalog: UpgradeCatalog,
    stats: EconomyStats,
    fever: FeverState,
    tree: Tree,
    ticker: AutoIncomeTicker,
    resolver: DamageResolver,
    persistence: PersistenceManager,
    queue: VecDeque<PlayerCommand>,
    elapsed: Seconds,
}

impl GameEngine {
    /// Build a fully wired engine and restore any saved state from the
    /// repository. A fresh repository yields the all-defaults state.
    pub fn new(
        config: EngineConfig,
        seed: u64,
        repository: Box<dyn SnapshotRepository>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let stats = EconomyStats::baseline(&config);
        let persistence = PersistenceManager::new(
            repository,
            config.save.slot.clone(),
            config.save.debounce_delay,
            config.save.fallback_interval,
        );
        let mut engine = Self {
            ledger: CurrencyLedger::new(),
            catalog: UpgradeCatalog::from_config(&config)?,
            fever: FeverState::new(
                stats.fever_threshold,
                stats.fever_multiplier,
                stats.fever_duration,
            ),
            tree: Tree::new(config.tree_max_health),
            ticker: AutoIncomeTicker::new(config.auto_income_interval),
            resolver: DamageResolver::new(seed),
            persistence,
            queue: VecDeque::new(),
            elapsed: 0.0,
            stats,
            config,
        };

        let snapshot = engine.persistence.load();
        engine.restore(snapshot);
        Ok(engine)
    }

    /// Queue a command for the next tick. Thread-agnostic entry point:
    /// whoever owns the engine forwards commands here in arrival order.
    pub fn submit(&mut self, command: PlayerCommand) {
        self.queue.push_back(command);
    }

    /// Apply one command immediately, outside the queue. Used by
    /// harnesses that want the emitted events per command.
    pub fn apply(&mut self, command: PlayerCommand) -> EngineResult<Vec<EngineEvent>> {
        let mut events = Vec::new();
        self.apply_into(command, &mut events)?;
        Ok(events)
    }

    /// Advance the engine: drain queued commands, then advance fever,
    /// auto income, and the save debounce by `delta` seconds.
    /// `tick(0)` drains the queue but changes no timer state.
    pub fn tick(&mut self, delta: Seconds) -> EngineResult<Vec<EngineEvent>> {
        let mut events = Vec::new();

        while let Some(command) = self.queue.pop_front() {
            if let Err(e) = self.apply_into(command, &mut events) {
                // Gameplay errors are recovered locally; the command
                // simply did not happen.
                log::warn!("command rejected: {e}");
            }
        }

        if delta > 0.0 {
            self.elapsed += delta;
            self.fever.tick(delta, &mut events);

            let credited =
                self.ticker
                    .tick(delta, &self.stats, &mut self.ledger, &mut events)?;
            if credited > 0.0 {
                self.persistence.mark_dirty();
            }

            if self.persistence.tick(delta) {
                let snapshot = self.snapshot();
                if let Err(e) = self.persistence.flush(&snapshot) {
                    log::warn!("snapshot flush failed: {e}");
                }
            }
        }

        Ok(events)
    }

    /// Force a flush regardless of debounce state. Call on shutdown.
    pub fn end_session(&mut self) -> EngineResult<()> {
        let snapshot = self.snapshot();
        self.persistence.flush(&snapshot)
    }

    /// Capture the current live state as a snapshot record.
    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot::capture(&self.ledger, &self.catalog, &self.stats)
    }

    // ── Command handling ───────────────────────────────────────────

    fn apply_into(
        &mut self,
        command: PlayerCommand,
        events: &mut Vec<EngineEvent>,
    ) -> EngineResult<()> {
        match command {
            PlayerCommand::ManualClick { position } => {
                let hit = Hit {
                    source: HitSource::Manual,
                    base_damage: self.stats.manual_damage,
                    position,
                };
                self.resolve_hit(hit, events)?;
            }
            PlayerCommand::AutoClick => {
                let hit = Hit {
                    source: HitSource::Auto,
                    base_damage: self.stats.auto_damage,
                    position: Position::default(),
                };
                self.resolve_hit(hit, events)?;
            }
            PlayerCommand::PurchaseUpgrade { upgrade } => {
                let purchased = self.catalog.try_level_up(
                    upgrade,
                    &mut self.ledger,
                    &self.config,
                    &mut self.stats,
                    events,
                )?;
                if purchased {
                    // Fever parameters may have moved; retune the
                    // machine from the fresh stats.
                    self.fever.reconfigure(
                        self.stats.fever_threshold,
                        self.stats.fever_multiplier,
                        self.stats.fever_duration,
                    );
                    self.persistence.mark_dirty();
                }
            }
            PlayerCommand::ResetSave => {
                self.reset(events)?;
            }
        }
        Ok(())
    }

    fn resolve_hit(&mut self, hit: Hit, events: &mut Vec<EngineEvent>) -> EngineResult<()> {
        let outcome = self.resolver.resolve(
            hit,
            &self.stats,
            &mut self.fever,
            &mut self.tree,
            &mut self.ledger,
            events,
        )?;

        if outcome.felled {
            let bonus = self.stats.manual_damage * self.config.respawn_bonus_factor;
            self.ledger.add(CurrencyType::Apple, bonus, events)?;
            events.push(EngineEvent::TreeRespawned { bonus });
            log::info!("tree felled: bonus {bonus} apples granted");
        }

        self.persistence.mark_dirty();
        Ok(())
    }

    /// Wipe the save slot and reinitialize every component to config
    /// defaults. The slot stays empty until the next mutation flushes.
    fn reset(&mut self, events: &mut Vec<EngineEvent>) -> EngineResult<()> {
        self.persistence.clear_slot()?;

        self.ledger = CurrencyLedger::new();
        self.catalog = UpgradeCatalog::from_config(&self.config)?;
        self.stats = EconomyStats::baseline(&self.config);
        self.fever = FeverState::new(
            self.stats.fever_threshold,
            self.stats.fever_multiplier,
            self.stats.fever_duration,
        );
        self.tree = Tree::new(self.config.tree_max_health);
        self.ticker.reset();

        for currency in CurrencyType::ALL {
            self.ledger.set(currency, 0.0, events);
        }
        log::info!("save reset: all progress cleared");
        Ok(())
    }

    // ── Load reconciliation ────────────────────────────────────────

    /// Apply a loaded snapshot: balances and levels land by direct
    /// assignment (no cost is re-paid), then stats are recomputed from
    /// the levels and the fever machine is retuned. Load-time change
    /// events are not surfaced — presentation layers read the fresh
    /// state directly at startup.
    fn restore(&mut self, snapshot: EconomySnapshot) {
        let mut discarded = Vec::new();
        for currency in CurrencyType::ALL {
            let value = snapshot.currencies.get(&currency).copied().unwrap_or(0.0);
            self.ledger.set(currency, value, &mut discarded);
        }
        self.ledger.set_total_earned(snapshot.total_earned);

        self.catalog.restore_levels(&snapshot.upgrade_levels);
        self.stats = EconomyStats::from_levels(&self.config, &self.catalog.levels());
        self.fever.reconfigure(
            self.stats.fever_threshold,
            self.stats.fever_multiplier,
            self.stats.fever_duration,
        );

        log::debug!(
            "state restored: {} apples, levels {:?}",
            self.ledger.balance(CurrencyType::Apple),
            self.catalog.levels()
        );
    }

    // ── Accessors for tests and presentation layers ────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn ledger(&self) -> &CurrencyLedger {
        &self.ledger
    }

    pub fn catalog(&self) -> &UpgradeCatalog {
        &self.catalog
    }

    pub fn stats(&self) -> &EconomyStats {
        &self.stats
    }

    pub fn fever(&self) -> &FeverState {
        &self.fever
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Test/debug hook: mutable tree access for staging health states.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Total engine time advanced so far.
    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }
}
