//! Local persistence seam and the in-memory reference implementation.

use crate::error::EngineResult;
use crate::request::FetchRequest;
use async_trait::async_trait;
use restbridge_mapper::UniquingPolicy;
use restbridge_model::Record;
use serde_json::{Map, Value};
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Abstract local record store.
///
/// The engine only needs these five operations; anything from an in-memory
/// table to a SQL database can sit behind them. Implementations decide how
/// record identity is minted.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Fetches records matching the request.
    async fn fetch(&self, request: &FetchRequest) -> EngineResult<Vec<Record>>;

    /// Applies remote objects (already translated to local property names)
    /// to the store. Under [`UniquingPolicy::SingleProperty`] an incoming
    /// object updates the existing record whose property matches;
    /// otherwise every object becomes a new record. Returns how many
    /// records were created or updated.
    async fn apply_remote(
        &self,
        entity: &str,
        objects: Vec<Map<String, Value>>,
        uniquing: &UniquingPolicy<String>,
    ) -> EngineResult<usize>;

    /// Records changed since the last save.
    async fn pending_changes(&self) -> EngineResult<Vec<Record>>;

    /// Commits pending changes.
    async fn save(&self) -> EngineResult<()>;

    /// Discards pending changes, restoring the last committed state.
    async fn rollback(&self) -> EngineResult<()>;
}

/// In-memory [`LocalStore`] used by tests and demos.
///
/// Keeps a committed baseline next to the live table; `save` promotes the
/// live table to the baseline, `rollback` restores it. Not a storage
/// engine — just enough behavior to exercise the orchestration.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
    baseline: RwLock<Vec<Record>>,
    next_id: AtomicU64,
    clock: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record directly (a local edit).
    pub async fn put(&self, record: Record) {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    /// Snapshot of all live records.
    pub async fn records(&self) -> Vec<Record> {
        self.records.read().await.clone()
    }

    fn mint_id(&self) -> String {
        format!("mem-{}", self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn tick(&self) -> i64 {
        self.clock.fetch_add(1, Ordering::Relaxed)
    }
}

fn matches(record: &Record, request: &FetchRequest) -> bool {
    if record.entity != request.entity {
        return false;
    }
    match &request.predicate {
        Some((property, value)) => record.value(property) == Some(value),
        None => true,
    }
}

#[async_trait]
impl LocalStore for MemoryStore {
    async fn fetch(&self, request: &FetchRequest) -> EngineResult<Vec<Record>> {
        let records = self.records.read().await;
        let mut out: Vec<Record> = records
            .iter()
            .filter(|r| matches(r, request))
            .cloned()
            .collect();
        if let Some(limit) = request.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    async fn apply_remote(
        &self,
        entity: &str,
        objects: Vec<Map<String, Value>>,
        uniquing: &UniquingPolicy<String>,
    ) -> EngineResult<usize> {
        let mut records = self.records.write().await;
        let mut applied = 0;

        for values in objects {
            let existing = match uniquing {
                UniquingPolicy::SingleProperty(property) => {
                    values.get(property).and_then(|incoming| {
                        records
                            .iter()
                            .position(|r| r.entity == entity && r.value(property) == Some(incoming))
                    })
                }
                UniquingPolicy::None => None,
            };

            match existing {
                Some(index) => {
                    let record = &mut records[index];
                    for (key, value) in values {
                        record.set_value(&key, value);
                    }
                    record.modified_at = self.tick();
                }
                None => {
                    let mut record =
                        Record::new(&self.mint_id(), entity, Value::Object(values));
                    record.created_at = self.tick();
                    record.modified_at = record.created_at;
                    records.push(record);
                }
            }
            applied += 1;
        }

        Ok(applied)
    }

    async fn pending_changes(&self) -> EngineResult<Vec<Record>> {
        let records = self.records.read().await;
        let baseline = self.baseline.read().await;
        let changed = records
            .iter()
            .filter(|r| {
                baseline
                    .iter()
                    .find(|b| b.id == r.id)
                    .is_none_or(|b| b.values != r.values)
            })
            .cloned()
            .collect();
        Ok(changed)
    }

    async fn save(&self) -> EngineResult<()> {
        let records = self.records.read().await;
        *self.baseline.write().await = records.clone();
        Ok(())
    }

    async fn rollback(&self) -> EngineResult<()> {
        let baseline = self.baseline.read().await;
        *self.records.write().await = baseline.clone();
        Ok(())
    }
}
