//! orchard-core — a headless progression engine for an incremental
//! clicker: a regenerating tree takes click damage, every point of
//! damage pays out apples, and apples buy upgrades that raise damage,
//! hire auto-harvesters, and tune critical and fever odds.
//!
//! RULES:
//!   - The engine is UI- and platform-agnostic. Inputs arrive as
//!     [`command::PlayerCommand`]s plus `tick(delta)`; outputs leave as
//!     [`event::EngineEvent`]s. Nothing here renders, plays audio, or
//!     touches a wall clock.
//!   - All randomness is seeded and deterministic: one seed plus one
//!     command script always replays to the same event stream.
//!   - State persists as a single versioned snapshot blob behind the
//!     [`store::SnapshotRepository`] trait, written on a debounce.

pub mod catalog;
pub mod command;
pub mod config;
pub mod currency;
pub mod engine;
pub mod error;
pub mod event;
pub mod fever;
pub mod persist;
pub mod resolver;
pub mod rng;
pub mod snapshot;
pub mod stats;
pub mod store;
pub mod ticker;
pub mod tree;
pub mod types;
pub mod upgrade;

pub use command::PlayerCommand;
pub use config::EngineConfig;
pub use currency::CurrencyType;
pub use engine::GameEngine;
pub use error::{EngineError, EngineResult};
pub use event::EngineEvent;
pub use upgrade::UpgradeType;
