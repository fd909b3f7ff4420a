use crate::transform::ValueTransformer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// How incoming remote objects are reconciled against existing local
/// records for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniquingPolicy<P> {
    /// No reconciliation; every remote object becomes a new record.
    None,
    /// Match on a single local property carrying the remote identity.
    SingleProperty(P),
}

/// REST mapping for one entity: resource path, uniquing policy, and the
/// per-property mappings.
pub struct EntityMapping<P> {
    /// Resource path on the backend (e.g. `users`).
    pub rest_path: String,
    pub uniquing: UniquingPolicy<P>,
    pub properties: HashMap<P, PropertyMapping>,
}

impl<P: Eq + Hash> EntityMapping<P> {
    pub fn new(rest_path: &str) -> Self {
        Self {
            rest_path: rest_path.to_string(),
            uniquing: UniquingPolicy::None,
            properties: HashMap::new(),
        }
    }

    /// Sets the uniquing policy (builder style).
    #[must_use]
    pub fn uniquing(mut self, policy: UniquingPolicy<P>) -> Self {
        self.uniquing = policy;
        self
    }

    /// Adds a property mapping (builder style).
    #[must_use]
    pub fn property(mut self, property: P, mapping: PropertyMapping) -> Self {
        self.properties.insert(property, mapping);
        self
    }
}

impl<P: fmt::Debug> fmt::Debug for EntityMapping<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMapping")
            .field("rest_path", &self.rest_path)
            .field("uniquing", &self.uniquing)
            .field("properties", &self.properties.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// REST mapping for one property.
#[derive(Clone)]
pub struct PropertyMapping {
    /// Field name in the remote representation.
    pub rest_name: String,
    /// Optional conversion between local and remote values.
    pub transformer: Option<Arc<dyn ValueTransformer>>,
}

impl PropertyMapping {
    pub fn new(rest_name: &str) -> Self {
        Self {
            rest_name: rest_name.to_string(),
            transformer: None,
        }
    }

    /// Attaches a value transformer (builder style).
    #[must_use]
    pub fn with_transformer(mut self, transformer: Arc<dyn ValueTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }
}

impl fmt::Debug for PropertyMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMapping")
            .field("rest_name", &self.rest_name)
            .field("transformer", &self.transformer.is_some())
            .finish()
    }
}
