use serde::{Deserialize, Serialize};

/// Declarative description of one entity type, fed to [`ModelBuilder`].
///
/// An entity may name a parent; the builder links the tree and validates it.
///
/// [`ModelBuilder`]: crate::ModelBuilder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDescription {
    pub name: String,
    /// Name of the superentity, if any. Must be declared in the same model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDescription>,
}

impl EntityDescription {
    /// A root entity with no superentity.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: None,
            properties: Vec::new(),
        }
    }

    /// An entity inheriting from `parent`.
    pub fn child_of(name: &str, parent: &str) -> Self {
        Self {
            name: name.to_string(),
            parent: Some(parent.to_string()),
            properties: Vec::new(),
        }
    }

    /// Adds a property (builder style).
    #[must_use]
    pub fn with_property(mut self, property: PropertyDescription) -> Self {
        self.properties.push(property);
        self
    }
}

/// A single property on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescription {
    pub name: String,
    pub kind: PropertyKind,
}

impl PropertyDescription {
    /// Shorthand for a plain attribute.
    pub fn attribute(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyKind::Attribute,
        }
    }

    /// Shorthand for a relationship to another entity.
    pub fn relationship(name: &str, destination: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: PropertyKind::Relationship {
                destination: destination.to_string(),
            },
        }
    }
}

/// Whether a property is a plain attribute or a link to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Attribute,
    Relationship { destination: String },
}
