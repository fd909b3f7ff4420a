//! REST mapping layer for restbridge.
//!
//! Maps entities and properties of an [`restbridge_model::EntityModel`] to
//! their REST representations. The central type is [`RestMapping`], an
//! immutable table from entity to [`EntityMapping`] whose lookups honor the
//! entity inheritance tree:
//!
//! - entity mappings and uniquing policies resolve upward through
//!   superentities;
//! - property mappings resolve first upward, then downward into
//!   subentities, never crossing into an unrelated branch.
//!
//! Around the table sit the pieces needed to turn a resolved mapping into
//! request material:
//!
//! - [`FieldSet`] / [`FieldListParser`] — "flatified" field lists such as
//!   `id,name,friends.{id,name}`
//! - [`ValueTransformer`] / [`UuidTransformer`] — value conversion between
//!   local and remote representations
//! - [`RequestInfo`] — per-request parameters, fields and paginator info
//!
//! Everything here is pure and side-effect free; a built mapping can be
//! shared freely across threads.

mod entity_mapping;
mod error;
mod fields;
mod mapping;
mod request_info;
mod transform;

pub use entity_mapping::{EntityMapping, PropertyMapping, UniquingPolicy};
pub use error::{MapperError, MapperResult};
pub use fields::{FieldListParser, FieldSet, StandardFieldListParser};
pub use mapping::{MappingBuilder, RestMapping, FIELDS_PARAM};
pub use request_info::RequestInfo;
pub use transform::{IdentityTransformer, UuidTransformer, ValueTransformer};
