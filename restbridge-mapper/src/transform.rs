use serde_json::Value;
use uuid::Uuid;

/// Converts property values between their local and remote JSON
/// representations.
///
/// Absence means the value could not be transformed; the caller decides
/// whether to skip the field or fall back to the raw value. Implementations
/// must be pure — the engine calls them from multiple tasks concurrently.
pub trait ValueTransformer: Send + Sync {
    /// Remote → local.
    fn to_local(&self, value: &Value) -> Option<Value>;

    /// Local → remote.
    fn to_remote(&self, value: &Value) -> Option<Value>;
}

/// Passes values through unchanged in both directions.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTransformer;

impl ValueTransformer for IdentityTransformer {
    fn to_local(&self, value: &Value) -> Option<Value> {
        Some(value.clone())
    }

    fn to_remote(&self, value: &Value) -> Option<Value> {
        Some(value.clone())
    }
}

/// Canonicalizes UUID strings.
///
/// Remote → local accepts any string form `uuid` parses (hyphenated,
/// simple, braced, urn) and yields the lowercase hyphenated form; values
/// already in that form pass through unchanged. Anything that is not a
/// parseable UUID string yields absence. Local → remote is the same
/// canonicalization, so a round trip is stable.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidTransformer;

impl UuidTransformer {
    fn canonicalize(value: &Value) -> Option<Value> {
        let text = value.as_str()?;
        let uuid = Uuid::parse_str(text).ok()?;
        Some(Value::String(uuid.hyphenated().to_string()))
    }
}

impl ValueTransformer for UuidTransformer {
    fn to_local(&self, value: &Value) -> Option<Value> {
        Self::canonicalize(value)
    }

    fn to_remote(&self, value: &Value) -> Option<Value> {
        Self::canonicalize(value)
    }
}
