use crate::entity::{EntityDescription, PropertyDescription};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while building an [`EntityModel`].
#[derive(Debug, Error)]
pub enum ModelError {
    /// Two entities were declared with the same name.
    #[error("duplicate entity: {0}")]
    DuplicateEntity(String),

    /// An entity names a parent that is not declared in the model.
    #[error("unknown parent {parent} for entity {entity}")]
    UnknownParent { entity: String, parent: String },

    /// The parent links form a cycle instead of a tree.
    #[error("inheritance cycle through entity {0}")]
    InheritanceCycle(String),
}

/// Read-only navigation over a single-inheritance entity tree.
///
/// `subentities` returns children in declaration order; callers that walk
/// the tree depth-first therefore visit siblings in the order the model
/// declared them.
pub trait HierarchyNode: Sized {
    /// The parent entity, if any.
    fn superentity(&self) -> Option<Self>;

    /// Direct children, in declaration order.
    fn subentities(&self) -> Vec<Self>;
}

#[derive(Debug)]
struct EntityInfo {
    name: String,
    parent: Option<usize>,
    children: Vec<usize>,
    properties: Vec<PropertyDescription>,
}

#[derive(Debug)]
struct ModelInner {
    entities: Vec<EntityInfo>,
    by_name: HashMap<String, usize>,
}

/// A validated, immutable entity model.
///
/// Built once via [`EntityModel::builder`]; after `build` succeeds the tree
/// is guaranteed acyclic with all parent links resolved, so navigation can
/// never fail.
#[derive(Debug, Clone)]
pub struct EntityModel {
    inner: Arc<ModelInner>,
}

impl EntityModel {
    pub fn builder() -> ModelBuilder {
        ModelBuilder {
            declarations: Vec::new(),
        }
    }

    /// Looks up an entity by name.
    pub fn entity(&self, name: &str) -> Option<EntityNode> {
        self.inner.by_name.get(name).map(|&index| EntityNode {
            inner: Arc::clone(&self.inner),
            index,
        })
    }

    /// All entities, in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = EntityNode> + '_ {
        (0..self.inner.entities.len()).map(|index| EntityNode {
            inner: Arc::clone(&self.inner),
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.inner.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entities.is_empty()
    }
}

/// Accumulates [`EntityDescription`]s and validates them into a model.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    declarations: Vec<EntityDescription>,
}

impl ModelBuilder {
    #[must_use]
    pub fn entity(mut self, description: EntityDescription) -> Self {
        self.declarations.push(description);
        self
    }

    /// Links parents to children and validates the tree.
    pub fn build(self) -> Result<EntityModel, ModelError> {
        let mut by_name = HashMap::new();
        let mut entities = Vec::with_capacity(self.declarations.len());

        for (index, decl) in self.declarations.iter().enumerate() {
            if by_name.insert(decl.name.clone(), index).is_some() {
                return Err(ModelError::DuplicateEntity(decl.name.clone()));
            }
            entities.push(EntityInfo {
                name: decl.name.clone(),
                parent: None,
                children: Vec::new(),
                properties: decl.properties.clone(),
            });
        }

        // Children end up in declaration order because we walk declarations
        // in order.
        for (index, decl) in self.declarations.iter().enumerate() {
            if let Some(parent_name) = &decl.parent {
                let &parent = by_name.get(parent_name).ok_or_else(|| {
                    ModelError::UnknownParent {
                        entity: decl.name.clone(),
                        parent: parent_name.clone(),
                    }
                })?;
                entities[index].parent = Some(parent);
                entities[parent].children.push(index);
            }
        }

        // A parent chain longer than the entity count must revisit a node.
        for start in 0..entities.len() {
            let mut steps = 0;
            let mut current = entities[start].parent;
            while let Some(up) = current {
                steps += 1;
                if steps > entities.len() {
                    return Err(ModelError::InheritanceCycle(
                        entities[start].name.clone(),
                    ));
                }
                current = entities[up].parent;
            }
        }

        Ok(EntityModel {
            inner: Arc::new(ModelInner { entities, by_name }),
        })
    }
}

/// Handle to one entity in an [`EntityModel`].
///
/// Cheap to clone (an `Arc` and an index) and hashable, so it can key the
/// mapper's tables directly.
#[derive(Clone)]
pub struct EntityNode {
    inner: Arc<ModelInner>,
    index: usize,
}

impl EntityNode {
    pub fn name(&self) -> &str {
        &self.inner.entities[self.index].name
    }

    /// Properties declared directly on this entity (not inherited).
    pub fn properties(&self) -> &[PropertyDescription] {
        &self.inner.entities[self.index].properties
    }

    /// Looks up a property declared directly on this entity.
    pub fn property(&self, name: &str) -> Option<&PropertyDescription> {
        self.properties().iter().find(|p| p.name == name)
    }
}

impl HierarchyNode for EntityNode {
    fn superentity(&self) -> Option<Self> {
        self.inner.entities[self.index].parent.map(|index| Self {
            inner: Arc::clone(&self.inner),
            index,
        })
    }

    fn subentities(&self) -> Vec<Self> {
        self.inner.entities[self.index]
            .children
            .iter()
            .map(|&index| Self {
                inner: Arc::clone(&self.inner),
                index,
            })
            .collect()
    }
}

impl PartialEq for EntityNode {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for EntityNode {}

impl Hash for EntityNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

// Debug prints just the entity name; the backing model is noise.
impl fmt::Debug for EntityNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityNode").field(&self.name()).finish()
    }
}
