//! Error types for the orchestration layer.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while orchestrating fetches and saves.
///
/// A property with no resolved mapping is not an error — the field is
/// skipped. Errors are reserved for misconfiguration (unknown or unmapped
/// entities) and for failures of the store or the bridge themselves.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The requested entity is not declared in the model.
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    /// Neither the entity nor any of its ancestors has a REST mapping, so
    /// no remote request can be built for it.
    #[error("entity has no REST mapping: {0}")]
    UnmappedEntity(String),

    /// Local store failure.
    #[error("store error: {0}")]
    Store(String),

    /// Remote transport failure.
    #[error("bridge error: {0}")]
    Bridge(String),

    /// Invalid mapping input (e.g. a malformed field list).
    #[error(transparent)]
    Mapper(#[from] restbridge_mapper::MapperError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
