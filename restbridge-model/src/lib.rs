//! Entity model for restbridge.
//!
//! Defines the types the mapper and engine build on:
//! - [`EntityModel`] — a validated, immutable tree of entity descriptions
//! - [`EntityNode`] — a cheap, hashable handle to one entity in a model
//! - [`HierarchyNode`] — read-only super/subentity navigation
//! - [`Record`] — a locally stored object (id, entity name, JSON payload)
//!
//! The model is built once at configuration time and never mutated
//! afterwards, so navigation and lookups are safe to share across threads
//! without coordination.

mod entity;
mod model;
mod record;

pub use entity::{EntityDescription, PropertyDescription, PropertyKind};
pub use model::{EntityModel, EntityNode, HierarchyNode, ModelBuilder, ModelError};
pub use record::Record;
