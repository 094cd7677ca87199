//! orchard-runner: headless session runner for the orchard clicker.
//!
//! Usage:
//!   orchard-runner --seed 42 --seconds 300 --cps 5 --db save.db
//!   orchard-runner --ipc-mode --db save.db
//!
//! Autoplay mode simulates a player clicking at a fixed rate and
//! greedily buying whatever upgrade is affordable, then prints an
//! end-of-run summary — useful for balance and soak runs. IPC mode
//! reads newline-delimited JSON commands on stdin and prints the full
//! engine state after each, for driving the engine from a UI process.

use anyhow::Result;
use orchard_core::{
    config::EngineConfig,
    currency::CurrencyType,
    engine::GameEngine,
    event::EngineEvent,
    store::{SqliteSnapshotStore, SnapshotRepository},
    types::Position,
    upgrade::UpgradeType,
    PlayerCommand,
};
use std::collections::BTreeMap;
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    Click { x: f64, y: f64 },
    Buy { upgrade: UpgradeType },
    Tick { seconds: f64 },
    GetState,
    Reset,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState {
    elapsed: f64,
    apples: f64,
    golden_apples: f64,
    total_earned: f64,
    tree_fraction: f64,
    fever_active: bool,
    fever_gauge: f64,
    fever_remaining: f64,
    manual_damage: f64,
    critical_chance: f64,
    critical_multiplier: f64,
    auto_units: u32,
    upgrades: BTreeMap<String, UiUpgrade>,
}

#[derive(serde::Serialize)]
struct UiUpgrade {
    level: u32,
    max_level: u32,
    next_cost: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let seconds = parse_arg(&args, "--seconds", 300u64);
    let cps = parse_arg(&args, "--cps", 5u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => EngineConfig::load(&w[1])?,
        None => EngineConfig::default(),
    };

    let store: Box<dyn SnapshotRepository> = if db == ":memory:" {
        Box::new(SqliteSnapshotStore::in_memory()?)
    } else {
        Box::new(SqliteSnapshotStore::open(db)?)
    };
    let mut engine = GameEngine::new(config, seed, store)?;
    log::info!("engine ready: seed={seed} db={db}");

    if ipc_mode {
        run_ipc_loop(&mut engine)?;
    } else {
        println!("orchard-runner");
        println!("  seed:    {seed}");
        println!("  seconds: {seconds}");
        println!("  cps:     {cps}");
        println!("  db:      {db}");
        println!();
        let counters = run_autoplay(&mut engine, seconds, cps)?;
        print_summary(&engine, seconds, &counters);
    }

    engine.end_session()?;
    Ok(())
}

/// Click `cps` times per simulated second, try every upgrade once per
/// second, tick in one-second steps. Returns per-event-type counts.
fn run_autoplay(
    engine: &mut GameEngine,
    seconds: u64,
    cps: u64,
) -> Result<BTreeMap<&'static str, u64>> {
    let mut counters: BTreeMap<&'static str, u64> = BTreeMap::new();
    for _ in 0..seconds {
        for _ in 0..cps {
            engine.submit(PlayerCommand::ManualClick {
                position: Position::default(),
            });
        }
        for upgrade in UpgradeType::ALL {
            if engine.catalog().can_level_up(upgrade, engine.ledger()) {
                engine.submit(PlayerCommand::PurchaseUpgrade { upgrade });
            }
        }
        for event in engine.tick(1.0)? {
            *counters.entry(event.type_name()).or_insert(0) += 1;
        }
    }
    Ok(counters)
}

fn run_ipc_loop(engine: &mut GameEngine) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        if handle.read_line(&mut buffer)? == 0 {
            break; // EOF
        }

        let command: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err}")?;
                stdout.flush()?;
                continue;
            }
        };

        let mut events: Vec<EngineEvent> = Vec::new();
        match command {
            IpcCommand::Quit => break,
            IpcCommand::Click { x, y } => {
                engine.submit(PlayerCommand::ManualClick {
                    position: Position { x, y },
                });
                events = engine.tick(0.0)?;
            }
            IpcCommand::Buy { upgrade } => {
                engine.submit(PlayerCommand::PurchaseUpgrade { upgrade });
                events = engine.tick(0.0)?;
            }
            IpcCommand::Tick { seconds } => {
                events = engine.tick(seconds)?;
            }
            IpcCommand::Reset => {
                engine.submit(PlayerCommand::ResetSave);
                events = engine.tick(0.0)?;
            }
            IpcCommand::GetState => {}
        }

        let response = serde_json::json!({
            "state": build_ui_state(engine),
            "events": events,
        });
        writeln!(stdout, "{response}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(engine: &GameEngine) -> UiState {
    let upgrades = engine
        .catalog()
        .iter()
        .map(|u| {
            (
                u.spec().upgrade.name().to_string(),
                UiUpgrade {
                    level: u.level(),
                    max_level: u.spec().max_level,
                    next_cost: u.cost(),
                },
            )
        })
        .collect();

    UiState {
        elapsed: engine.elapsed(),
        apples: engine.ledger().balance(CurrencyType::Apple),
        golden_apples: engine.ledger().balance(CurrencyType::GoldenApple),
        total_earned: engine.ledger().total_earned(),
        tree_fraction: engine.tree().health_fraction(),
        fever_active: engine.fever().is_active(),
        fever_gauge: engine.fever().gauge_fraction(),
        fever_remaining: engine.fever().remaining(),
        manual_damage: engine.stats().manual_damage,
        critical_chance: engine.stats().critical_chance,
        critical_multiplier: engine.stats().critical_multiplier,
        auto_units: engine.stats().auto_unit_count,
        upgrades,
    }
}

fn print_summary(engine: &GameEngine, seconds: u64, counters: &BTreeMap<&'static str, u64>) {
    println!("=== RUN SUMMARY ===");
    println!("  seconds run:    {seconds}");
    println!(
        "  apples:         {:.0}",
        engine.ledger().balance(CurrencyType::Apple)
    );
    println!(
        "  golden apples:  {:.0}",
        engine.ledger().balance(CurrencyType::GoldenApple)
    );
    println!("  total earned:   {:.0}", engine.ledger().total_earned());
    println!("  manual damage:  {:.0}", engine.stats().manual_damage);
    println!("  auto units:     {}", engine.stats().auto_unit_count);
    println!(
        "  crit:           {:.0}% x{:.1}",
        engine.stats().critical_chance * 100.0,
        engine.stats().critical_multiplier
    );

    println!();
    println!("=== UPGRADES ===");
    for upgrade in engine.catalog().iter() {
        let cost = match upgrade.cost() {
            Some(c) => format!("next {c:.0}"),
            None => "maxed".to_string(),
        };
        println!(
            "  {:<20} Lv.{}/{} ({cost})",
            upgrade.spec().name,
            upgrade.level(),
            upgrade.spec().max_level
        );
    }

    println!();
    println!("=== EVENTS ===");
    for (name, count) in counters {
        println!("  {name:<22} {count}");
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
