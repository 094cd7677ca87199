//! Persistence tests — round trips, debounce batching, corruption
//! recovery, and the load-time stat reconciliation.

use orchard_core::{
    config::EngineConfig,
    currency::CurrencyType,
    engine::GameEngine,
    snapshot::{EconomySnapshot, SNAPSHOT_VERSION},
    stats::EconomyStats,
    store::MemorySnapshotStore,
    types::Position,
    PlayerCommand,
    UpgradeType,
};
use std::collections::BTreeMap;

fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.manual_damage = 1000.0;
    config.critical_chance = 0.0;
    config.tree_max_health = 1e9;
    config
}

fn click(engine: &mut GameEngine) {
    engine
        .apply(PlayerCommand::ManualClick {
            position: Position::default(),
        })
        .expect("click");
}

fn buy(engine: &mut GameEngine, upgrade: UpgradeType) {
    engine
        .apply(PlayerCommand::PurchaseUpgrade { upgrade })
        .expect("purchase");
}

/// Round trip: a second engine booted from the same store reproduces
/// balances, levels, and derived stats exactly.
#[test]
fn flush_then_load_round_trip() {
    let store = MemorySnapshotStore::new();
    let config = test_config();

    let mut first =
        GameEngine::new(config.clone(), 1, Box::new(store.clone())).expect("first engine");
    for _ in 0..3 {
        click(&mut first);
    }
    buy(&mut first, UpgradeType::AppleHarvest);
    buy(&mut first, UpgradeType::SquirrelHire);
    first.end_session().expect("flush");

    let second = GameEngine::new(config, 2, Box::new(store)).expect("second engine");
    assert_eq!(second.snapshot(), first.snapshot());
    assert_eq!(second.stats(), first.stats());
    assert_eq!(
        second.ledger().balance(CurrencyType::Apple),
        first.ledger().balance(CurrencyType::Apple)
    );
    assert_eq!(second.ledger().total_earned(), first.ledger().total_earned());
}

/// Levels are restored by direct assignment, never by replaying
/// purchases — so loading must not re-spend anything.
#[test]
fn load_does_not_re_spend() {
    let store = MemorySnapshotStore::new();
    let config = test_config();

    let mut first =
        GameEngine::new(config.clone(), 1, Box::new(store.clone())).expect("first engine");
    click(&mut first);
    buy(&mut first, UpgradeType::AppleHarvest); // 1000 - 500 = 500 left
    first.end_session().expect("flush");
    let balance = first.ledger().balance(CurrencyType::Apple);
    assert_eq!(balance, 500.0);

    let second = GameEngine::new(config, 2, Box::new(store)).expect("second engine");
    assert_eq!(second.ledger().balance(CurrencyType::Apple), balance);
    assert_eq!(
        second
            .catalog()
            .get(UpgradeType::AppleHarvest)
            .expect("get")
            .level(),
        1
    );
    // Effects re-derived: +10 damage on top of the 1000 baseline.
    assert_eq!(second.stats().manual_damage, 1010.0);
}

/// Recomputing stats from levels must agree with replaying the effect
/// steps one purchase at a time, in any purchase order.
#[test]
fn recompute_matches_stepwise_replay() {
    let config = EngineConfig::default();

    let mut replayed = EconomyStats::baseline(&config);
    // An interleaved purchase order, as a real session would produce.
    let purchase_order = [
        (UpgradeType::AppleHarvest, 1),
        (UpgradeType::GoldenAppleLuck, 1),
        (UpgradeType::AppleHarvest, 2),
        (UpgradeType::FeverMaster, 1),
        (UpgradeType::SquirrelHire, 1),
        (UpgradeType::FeverMaster, 2),
        (UpgradeType::FeverMaster, 3),
        (UpgradeType::SuperCritical, 1),
        (UpgradeType::AppleHarvest, 3),
    ];
    for (upgrade, new_level) in purchase_order {
        replayed.apply_effect(&config, upgrade, new_level);
    }

    let mut levels = BTreeMap::new();
    levels.insert(UpgradeType::AppleHarvest, 3);
    levels.insert(UpgradeType::GoldenAppleLuck, 1);
    levels.insert(UpgradeType::FeverMaster, 3);
    levels.insert(UpgradeType::SquirrelHire, 1);
    levels.insert(UpgradeType::SuperCritical, 1);
    let recomputed = EconomyStats::from_levels(&config, &levels);

    assert_eq!(recomputed, replayed);
}

#[test]
fn missing_slot_yields_defaults() {
    let engine = GameEngine::new(
        EngineConfig::default(),
        1,
        Box::new(MemorySnapshotStore::new()),
    )
    .expect("engine");

    assert_eq!(engine.ledger().balance(CurrencyType::Apple), 0.0);
    for upgrade in engine.catalog().iter() {
        assert_eq!(upgrade.level(), 0);
    }
    assert_eq!(
        engine.stats(),
        &EconomyStats::baseline(engine.config()),
        "fresh engine must carry baseline stats"
    );
}

#[test]
fn corrupt_blob_yields_defaults() {
    let store = MemorySnapshotStore::new();
    store.inject("default", "{this is not json");

    let engine =
        GameEngine::new(EngineConfig::default(), 1, Box::new(store)).expect("engine");
    assert_eq!(engine.ledger().balance(CurrencyType::Apple), 0.0);
    assert_eq!(engine.ledger().total_earned(), 0.0);
}

#[test]
fn future_version_yields_defaults() {
    let store = MemorySnapshotStore::new();
    let mut snapshot = EconomySnapshot::default();
    snapshot.version = SNAPSHOT_VERSION + 1;
    snapshot.currencies.insert(CurrencyType::Apple, 9999.0);
    store.inject(
        "default",
        &serde_json::to_string(&snapshot).expect("serialize"),
    );

    let engine =
        GameEngine::new(EngineConfig::default(), 1, Box::new(store)).expect("engine");
    assert_eq!(engine.ledger().balance(CurrencyType::Apple), 0.0);
}

/// Old blobs missing newer fields default-fill instead of being
/// discarded wholesale.
#[test]
fn partial_blob_default_fills() {
    let store = MemorySnapshotStore::new();
    store.inject("default", r#"{"version":1,"currencies":{"apple":123.0}}"#);

    let engine =
        GameEngine::new(EngineConfig::default(), 1, Box::new(store)).expect("engine");
    assert_eq!(engine.ledger().balance(CurrencyType::Apple), 123.0);
    for upgrade in engine.catalog().iter() {
        assert_eq!(upgrade.level(), 0);
    }
}

/// A burst of mutations produces exactly one write shortly after the
/// burst ends — not one write per mutation.
#[test]
fn debounce_batches_a_burst_into_one_write() {
    let store = MemorySnapshotStore::new();
    let mut engine =
        GameEngine::new(test_config(), 1, Box::new(store.clone())).expect("engine");

    for _ in 0..10 {
        click(&mut engine);
    }
    assert_eq!(store.save_count(), 0, "no write during the burst");

    engine.tick(0.3).expect("tick");
    assert_eq!(store.save_count(), 0, "debounce window still open");

    engine.tick(0.3).expect("tick");
    assert_eq!(store.save_count(), 1, "one write after the quiet period");

    engine.tick(10.0).expect("tick");
    assert_eq!(store.save_count(), 1, "clean state must not rewrite");
}

/// Every new mutation restarts the debounce window rather than letting
/// the old one expire.
#[test]
fn mutation_restarts_debounce_window() {
    let store = MemorySnapshotStore::new();
    let mut engine =
        GameEngine::new(test_config(), 1, Box::new(store.clone())).expect("engine");

    click(&mut engine);
    engine.tick(0.4).expect("tick");
    click(&mut engine); // restarts the 0.5s window
    engine.tick(0.4).expect("tick");
    assert_eq!(store.save_count(), 0, "restarted window has 0.1s left");

    engine.tick(0.2).expect("tick");
    assert_eq!(store.save_count(), 1);
}

/// The long-interval fallback flushes a dirty session even when the
/// debounce never fires (e.g. continuous mutation).
#[test]
fn fallback_interval_flushes_dirty_state() {
    let mut config = test_config();
    config.save.debounce_delay = 1_000.0;
    config.save.fallback_interval = 5.0;
    let store = MemorySnapshotStore::new();
    let mut engine = GameEngine::new(config, 1, Box::new(store.clone())).expect("engine");

    click(&mut engine);
    engine.tick(5.0).expect("tick");
    assert_eq!(store.save_count(), 1);
}

/// tick(0) drains commands but never advances timers or flushes.
#[test]
fn tick_zero_changes_nothing() {
    let store = MemorySnapshotStore::new();
    let mut engine =
        GameEngine::new(test_config(), 1, Box::new(store.clone())).expect("engine");
    click(&mut engine); // dirty, debounce pending

    let before = engine.snapshot();
    for _ in 0..100 {
        let events = engine.tick(0.0).expect("tick");
        assert!(events.is_empty());
    }
    assert_eq!(engine.snapshot(), before);
    assert_eq!(store.save_count(), 0, "tick(0) must not reach the debounce");
    assert_eq!(engine.elapsed(), 0.0);
}

#[test]
fn end_session_flushes_unconditionally() {
    let store = MemorySnapshotStore::new();
    let mut engine =
        GameEngine::new(test_config(), 1, Box::new(store.clone())).expect("engine");

    engine.end_session().expect("flush");
    assert_eq!(store.save_count(), 1);
    assert!(store.peek("default").is_some());
}

#[test]
fn reset_save_clears_slot_and_state() {
    let store = MemorySnapshotStore::new();
    let mut engine =
        GameEngine::new(test_config(), 1, Box::new(store.clone())).expect("engine");

    click(&mut engine);
    buy(&mut engine, UpgradeType::AppleHarvest);
    engine.end_session().expect("flush");
    assert!(store.peek("default").is_some());

    engine.apply(PlayerCommand::ResetSave).expect("reset");
    assert!(store.peek("default").is_none(), "slot must be wiped");
    assert_eq!(engine.ledger().balance(CurrencyType::Apple), 0.0);
    assert_eq!(engine.ledger().total_earned(), 0.0);
    for upgrade in engine.catalog().iter() {
        assert_eq!(upgrade.level(), 0);
    }
    assert_eq!(engine.stats(), &EconomyStats::baseline(engine.config()));
}
