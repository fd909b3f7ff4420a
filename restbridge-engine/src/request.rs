use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A local fetch: which entity, an optional property-equality predicate,
/// and an optional result limit.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub entity: String,
    /// `(property, value)` — keep records whose property equals the value.
    pub predicate: Option<(String, Value)>,
    pub limit: Option<usize>,
}

impl FetchRequest {
    /// All records of an entity.
    pub fn all(entity: &str) -> Self {
        Self {
            entity: entity.to_string(),
            predicate: None,
            limit: None,
        }
    }

    /// Records whose `property` equals `value`.
    pub fn matching(entity: &str, property: &str, value: Value) -> Self {
        Self {
            entity: entity.to_string(),
            predicate: Some((property.to_string(), value)),
            limit: None,
        }
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// When a fetch goes to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// Always hit the backend (default).
    Always,
    /// Hit the backend only when the local fetch returns nothing.
    OnlyIfNoLocal,
    /// Local only; the bridge is never called.
    Never,
}

/// When the local store is saved relative to the remote round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveWorkflow {
    /// Save locally first, then push to the backend (default; optimistic).
    SaveBeforeRemote,
    /// Push to the backend first; save locally only on success.
    SaveAfterRemote,
    /// Discard local changes, pushing the pre-rollback snapshot remotely.
    RollbackBeforeRemote,
}
