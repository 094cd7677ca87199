//! Snapshot storage backends.
//!
//! RULE: Only this module talks to the database. The persistence
//! manager works against `SnapshotRepository`, so local SQLite, an
//! in-memory map (tests), or a remote profile store are
//! interchangeable.

use crate::error::EngineResult;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub trait SnapshotRepository: Send {
    /// Write `blob` as the single record for `slot`, replacing any
    /// previous record.
    fn save(&mut self, slot: &str, blob: &str) -> EngineResult<()>;

    /// Read the record for `slot`, `None` if it has never been saved.
    fn load(&self, slot: &str) -> EngineResult<Option<String>>;

    /// Delete the record for `slot`. Deleting a missing slot is fine.
    fn clear(&mut self, slot: &str) -> EngineResult<()>;
}

// ── SQLite ─────────────────────────────────────────────────────────

pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    /// Open (or create) the save database at `path`.
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    /// Open an in-memory database (used in tests and soak runs).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> EngineResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS save_slot (
                slot TEXT PRIMARY KEY,
                blob TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl SnapshotRepository for SqliteSnapshotStore {
    fn save(&mut self, slot: &str, blob: &str) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO save_slot (slot, blob) VALUES (?1, ?2)
             ON CONFLICT(slot) DO UPDATE SET blob = excluded.blob",
            params![slot, blob],
        )?;
        Ok(())
    }

    fn load(&self, slot: &str) -> EngineResult<Option<String>> {
        let blob = self
            .conn
            .query_row(
                "SELECT blob FROM save_slot WHERE slot = ?1",
                params![slot],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(blob)
    }

    fn clear(&mut self, slot: &str) -> EngineResult<()> {
        self.conn
            .execute("DELETE FROM save_slot WHERE slot = ?1", params![slot])?;
        Ok(())
    }
}

// ── In-memory ──────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryInner {
    slots: HashMap<String, String>,
    save_count: u64,
}

/// Map-backed store. Clones share the same underlying slots, which
/// lets tests hand one store to two engines and check round trips,
/// and a write counter pins down debounce batching.
#[derive(Clone, Default)]
pub struct MemorySnapshotStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of `save` calls ever made through this store.
    pub fn save_count(&self) -> u64 {
        self.lock().save_count
    }

    /// Test hook: overwrite a slot with an arbitrary blob (e.g. junk
    /// bytes for corruption tests).
    pub fn inject(&self, slot: &str, blob: &str) {
        self.lock().slots.insert(slot.to_string(), blob.to_string());
    }

    /// Test hook: read a slot without going through the trait.
    pub fn peek(&self, slot: &str) -> Option<String> {
        self.lock().slots.get(slot).cloned()
    }
}

impl SnapshotRepository for MemorySnapshotStore {
    fn save(&mut self, slot: &str, blob: &str) -> EngineResult<()> {
        let mut inner = self.lock();
        inner.slots.insert(slot.to_string(), blob.to_string());
        inner.save_count += 1;
        Ok(())
    }

    fn load(&self, slot: &str) -> EngineResult<Option<String>> {
        Ok(self.lock().slots.get(slot).cloned())
    }

    fn clear(&mut self, slot: &str) -> EngineResult<()> {
        self.lock().slots.remove(slot);
        Ok(())
    }
}
