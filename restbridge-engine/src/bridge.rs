//! Remote transport abstraction.
//!
//! The engine never speaks HTTP itself; it hands fully assembled requests
//! (resource path, query parameters, body values — all resolved through
//! the mapping) to a [`Bridge`] implementation and imports whatever comes
//! back.

use crate::error::EngineResult;
use async_trait::async_trait;
use serde_json::{Map, Value};

/// A fetch against the backend: resource path plus query parameters.
#[derive(Debug, Clone)]
pub struct RemoteFetchRequest {
    pub rest_path: String,
    pub params: Map<String, Value>,
}

/// One object to push: the local record's id (for correlating the
/// response) and its remote-shaped values.
#[derive(Debug, Clone)]
pub struct RemoteChange {
    pub record_id: String,
    pub values: Map<String, Value>,
}

/// A save against the backend: resource path plus the changed objects.
#[derive(Debug, Clone)]
pub struct RemoteSaveRequest {
    pub rest_path: String,
    pub changes: Vec<RemoteChange>,
}

/// Objects returned by the backend, in their remote representation.
#[derive(Debug, Clone, Default)]
pub struct RemoteResponse {
    pub objects: Vec<Map<String, Value>>,
    /// Backend-defined paginator state for the next page, if any.
    pub paginator: Option<Value>,
}

/// Abstract transport to the REST backend.
#[async_trait]
pub trait Bridge: Send + Sync {
    /// Fetches objects from the backend.
    async fn fetch(&self, request: RemoteFetchRequest) -> EngineResult<RemoteResponse>;

    /// Pushes changed objects to the backend. The response carries the
    /// backend's authoritative representation (server-assigned fields),
    /// which the engine imports back into the local store.
    async fn save(&self, request: RemoteSaveRequest) -> EngineResult<RemoteResponse>;
}
