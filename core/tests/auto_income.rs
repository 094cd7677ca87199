//! Auto-income ticker tests — fixed-interval crediting.

use orchard_core::{
    config::EngineConfig,
    currency::CurrencyType,
    engine::GameEngine,
    event::EngineEvent,
    store::MemorySnapshotStore,
    types::Position,
    PlayerCommand,
    UpgradeType,
};

/// One click earns enough to hire exactly one squirrel.
fn engine_with_one_squirrel() -> GameEngine {
    let mut config = EngineConfig::default();
    config.manual_damage = 1000.0;
    config.critical_chance = 0.0;
    config.tree_max_health = 1e9; // keep respawn bonuses out of the arithmetic
    let mut engine =
        GameEngine::new(config, 7, Box::new(MemorySnapshotStore::new())).expect("engine");

    engine
        .apply(PlayerCommand::ManualClick {
            position: Position::default(),
        })
        .expect("click");
    let events = engine
        .apply(PlayerCommand::PurchaseUpgrade {
            upgrade: UpgradeType::SquirrelHire,
        })
        .expect("purchase");
    assert!(events
        .iter()
        .any(|e| matches!(e, EngineEvent::UpgradeLeveledUp { .. })));
    assert_eq!(engine.stats().auto_unit_count, 1);
    assert_eq!(engine.ledger().balance(CurrencyType::Apple), 0.0);
    engine
}

#[test]
fn no_units_means_no_income() {
    let mut config = EngineConfig::default();
    config.critical_chance = 0.0;
    let mut engine =
        GameEngine::new(config, 7, Box::new(MemorySnapshotStore::new())).expect("engine");

    let events = engine.tick(5.0).expect("tick");
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, EngineEvent::CurrencyChanged { .. })),
        "no credit without auto units"
    );
    assert_eq!(engine.ledger().balance(CurrencyType::Apple), 0.0);
}

#[test]
fn one_credit_per_whole_interval() {
    let mut engine = engine_with_one_squirrel();
    let yield_per_tick = engine.stats().auto_unit_yield;

    engine.tick(1.0).expect("tick");
    assert_eq!(engine.ledger().balance(CurrencyType::Apple), yield_per_tick);

    // A large delta pays out several whole intervals at once.
    engine.tick(3.0).expect("tick");
    assert_eq!(
        engine.ledger().balance(CurrencyType::Apple),
        4.0 * yield_per_tick
    );
}

#[test]
fn fractional_deltas_accumulate() {
    let mut engine = engine_with_one_squirrel();
    let yield_per_tick = engine.stats().auto_unit_yield;

    engine.tick(0.7).expect("tick");
    assert_eq!(
        engine.ledger().balance(CurrencyType::Apple),
        0.0,
        "partial interval must not pay"
    );

    engine.tick(0.3).expect("tick");
    assert_eq!(engine.ledger().balance(CurrencyType::Apple), yield_per_tick);
}

#[test]
fn income_scales_with_unit_count() {
    let mut config = EngineConfig::default();
    config.manual_damage = 10_000.0;
    config.critical_chance = 0.0;
    config.tree_max_health = 1e9;
    let mut engine =
        GameEngine::new(config, 7, Box::new(MemorySnapshotStore::new())).expect("engine");

    engine
        .apply(PlayerCommand::ManualClick {
            position: Position::default(),
        })
        .expect("click");
    // Squirrels cost 1000 then 2500.
    for _ in 0..2 {
        engine
            .apply(PlayerCommand::PurchaseUpgrade {
                upgrade: UpgradeType::SquirrelHire,
            })
            .expect("purchase");
    }
    assert_eq!(engine.stats().auto_unit_count, 2);

    let before = engine.ledger().balance(CurrencyType::Apple);
    engine.tick(1.0).expect("tick");
    let earned = engine.ledger().balance(CurrencyType::Apple) - before;
    assert_eq!(earned, 2.0 * engine.stats().auto_unit_yield);
}

/// Auto income is a plain credit, not a hit: no HitResolved, no fever
/// gauge movement, no tree damage.
#[test]
fn auto_income_is_not_a_hit() {
    let mut engine = engine_with_one_squirrel();
    let tree_before = engine.tree().current_health();
    let gauge_before = engine.fever().click_count();

    let events = engine.tick(2.0).expect("tick");
    assert!(!events
        .iter()
        .any(|e| matches!(e, EngineEvent::HitResolved { .. })));
    assert_eq!(engine.tree().current_health(), tree_before);
    assert_eq!(engine.fever().click_count(), gauge_before);
}
