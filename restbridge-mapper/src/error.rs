//! Error types for the mapping layer.
//!
//! Note that a failed mapping lookup is NOT an error: the resolver returns
//! absence, which callers must treat as a valid terminal outcome. Errors
//! here are reserved for malformed configuration input.

use thiserror::Error;

/// Result type for mapper operations.
pub type MapperResult<T> = Result<T, MapperError>;

/// Errors that can occur while parsing mapping configuration.
#[derive(Debug, Error)]
pub enum MapperError {
    /// A flatified field list could not be parsed.
    #[error("field list syntax error at byte {position}: {message}")]
    FieldSyntax { position: usize, message: String },
}
