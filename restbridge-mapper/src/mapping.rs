use crate::entity_mapping::{EntityMapping, PropertyMapping, UniquingPolicy};
use crate::error::MapperResult;
use crate::fields::{FieldListParser, FieldSet, StandardFieldListParser};
use crate::request_info::RequestInfo;
use restbridge_model::HierarchyNode;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Query-parameter key under which the flatified field list is sent.
pub const FIELDS_PARAM: &str = "fields";

/// The mapping table: entity → [`EntityMapping`], plus the global pieces
/// applied to every request (forced parameters, field-list parser).
///
/// Built once via [`RestMapping::builder`] and immutable afterwards, so all
/// lookups are pure reads and safe to share across threads.
///
/// Lookups honor the entity inheritance tree without ever crossing into an
/// unrelated branch: entity-level lookups walk upward only; property
/// lookups walk upward then downward, with direction flags that are
/// monotonic (once the search moves down it can never move up again, and
/// vice versa).
pub struct RestMapping<E, P> {
    entities: HashMap<E, EntityMapping<P>>,
    field_parser: Arc<dyn FieldListParser>,
    forced_params_on_fetch: Map<String, Value>,
    forced_values_on_save: Map<String, Value>,
}

impl<E, P> RestMapping<E, P>
where
    E: HierarchyNode + Eq + Hash,
    P: Eq + Hash,
{
    pub fn builder() -> MappingBuilder<E, P> {
        MappingBuilder {
            entities: HashMap::new(),
            field_parser: Arc::new(StandardFieldListParser),
            forced_params_on_fetch: Map::new(),
            forced_values_on_save: Map::new(),
        }
    }

    // ── Resolution ───────────────────────────────────────────────

    /// Resolves the entity mapping for `entity`.
    ///
    /// A direct hit wins; otherwise the lookup recurses on the superentity.
    /// This only walks upward, never down into subentities. Absence means
    /// no entity on the ancestor chain is mapped.
    pub fn entity_mapping(&self, entity: &E) -> Option<&EntityMapping<P>> {
        if let Some(mapping) = self.entities.get(entity) {
            return Some(mapping);
        }
        let superentity = entity.superentity()?;
        self.entity_mapping(&superentity)
    }

    /// Resolves the uniquing policy for `entity`, walking upward like
    /// [`entity_mapping`](Self::entity_mapping).
    ///
    /// Defaults to [`UniquingPolicy::None`] when no ancestor is mapped.
    /// Callers cannot distinguish "not configured" from "explicitly none";
    /// nothing has needed the distinction so far.
    pub fn uniquing_policy(&self, entity: &E) -> UniquingPolicy<P>
    where
        P: Clone,
    {
        if let Some(mapping) = self.entities.get(entity) {
            return mapping.uniquing.clone();
        }
        match entity.superentity() {
            Some(superentity) => self.uniquing_policy(&superentity),
            None => UniquingPolicy::None,
        }
    }

    /// Resolves the property mapping for `property`, starting from the
    /// expected entity, going up through superentities, then down into
    /// subentities. The search never reaches an entity unrelated to the
    /// starting one.
    ///
    /// Without an expected entity, every mapped entity is tried as a
    /// starting point in unspecified order; if several unrelated entities
    /// map the same property, which mapping wins is unspecified (but stable
    /// for a given table).
    pub fn property_mapping(
        &self,
        property: &P,
        expected_entity: Option<&E>,
    ) -> Option<&PropertyMapping> {
        match expected_entity {
            Some(entity) => self.property_mapping_directed(property, entity, true, true),
            None => self
                .entities
                .keys()
                .find_map(|entity| self.property_mapping_directed(property, entity, true, true)),
        }
    }

    fn property_mapping_directed(
        &self,
        property: &P,
        entity: &E,
        can_go_up: bool,
        can_go_down: bool,
    ) -> Option<&PropertyMapping> {
        if let Some(mapping) = self
            .entities
            .get(entity)
            .and_then(|m| m.properties.get(property))
        {
            return Some(mapping);
        }

        // Not here. Up first, with downward movement revoked.
        if can_go_up {
            if let Some(superentity) = entity.superentity() {
                if let Some(mapping) =
                    self.property_mapping_directed(property, &superentity, true, false)
                {
                    return Some(mapping);
                }
            }
        }
        // Then down, depth-first in declaration order, with upward
        // movement revoked.
        if can_go_down {
            for subentity in entity.subentities() {
                if let Some(mapping) =
                    self.property_mapping_directed(property, &subentity, false, true)
                {
                    return Some(mapping);
                }
            }
        }
        None
    }

    // ── Request material ─────────────────────────────────────────

    /// The REST resource path for `entity`, resolved through the ancestor
    /// chain like [`entity_mapping`](Self::entity_mapping).
    pub fn rest_path(&self, entity: &E) -> Option<&str> {
        self.entity_mapping(entity).map(|m| m.rest_path.as_str())
    }

    /// Parses a flatified field list with the table's parser.
    pub fn parse_fields(&self, flatified: &str) -> MapperResult<FieldSet> {
        self.field_parser.parse(flatified)
    }

    /// Assembles the query parameters for a fetch: forced fetch parameters
    /// first, then per-request parameters (which win on collision), then
    /// the rendered field list and paginator info.
    pub fn fetch_parameters(&self, info: Option<&RequestInfo>) -> Map<String, Value> {
        let mut params = self.forced_params_on_fetch.clone();
        if let Some(info) = info {
            for (key, value) in &info.extra_params {
                params.insert(key.clone(), value.clone());
            }
            if let Some(fields) = &info.fields {
                if !fields.is_empty() {
                    params.insert(
                        FIELDS_PARAM.to_string(),
                        Value::String(self.field_parser.flatify(fields)),
                    );
                }
            }
            for (key, value) in &info.paginator {
                params.insert(key.clone(), value.clone());
            }
        }
        params
    }

    /// Assembles the body values for a save: the object's values overlaid
    /// with the forced save values (forced values win — that is what makes
    /// them forced).
    pub fn save_values(&self, values: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = values.clone();
        for (key, value) in &self.forced_values_on_save {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Number of entities with a direct mapping.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Configuration-time construction of a [`RestMapping`].
pub struct MappingBuilder<E, P> {
    entities: HashMap<E, EntityMapping<P>>,
    field_parser: Arc<dyn FieldListParser>,
    forced_params_on_fetch: Map<String, Value>,
    forced_values_on_save: Map<String, Value>,
}

impl<E, P> MappingBuilder<E, P>
where
    E: HierarchyNode + Eq + Hash,
    P: Eq + Hash,
{
    /// Maps `entity` to `mapping`. Mapping the same entity twice keeps the
    /// last mapping.
    #[must_use]
    pub fn entity(mut self, entity: E, mapping: EntityMapping<P>) -> Self {
        self.entities.insert(entity, mapping);
        self
    }

    /// Replaces the field-list parser (defaults to
    /// [`StandardFieldListParser`]).
    #[must_use]
    pub fn field_parser(mut self, parser: Arc<dyn FieldListParser>) -> Self {
        self.field_parser = parser;
        self
    }

    /// Adds a query parameter sent on every fetch.
    #[must_use]
    pub fn forced_fetch_param(mut self, key: &str, value: Value) -> Self {
        self.forced_params_on_fetch.insert(key.to_string(), value);
        self
    }

    /// Adds a body value sent on every save.
    #[must_use]
    pub fn forced_save_value(mut self, key: &str, value: Value) -> Self {
        self.forced_values_on_save.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> RestMapping<E, P> {
        RestMapping {
            entities: self.entities,
            field_parser: self.field_parser,
            forced_params_on_fetch: self.forced_params_on_fetch,
            forced_values_on_save: self.forced_values_on_save,
        }
    }
}
