//! Request manager — fetch/save orchestration over a store and a bridge.

use crate::bridge::{Bridge, RemoteChange, RemoteFetchRequest, RemoteResponse, RemoteSaveRequest};
use crate::error::{EngineError, EngineResult};
use crate::request::{FetchKind, FetchRequest, SaveWorkflow};
use crate::store::LocalStore;
use restbridge_mapper::{RequestInfo, RestMapping};
use restbridge_model::{EntityModel, EntityNode, HierarchyNode, Record};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-call options for fetches.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub kind: FetchKind,
    /// Flatified field list to request (e.g. `id,name,friends.{id,name}`).
    pub flatified_fields: Option<String>,
    /// Extra query parameters for this request only.
    pub extra_params: Map<String, Value>,
    /// Paginator parameters (backend-defined).
    pub paginator: Map<String, Value>,
    /// Local property carrying the remote identity, used by
    /// [`RequestManager::fetch_object`] to build its predicate.
    pub remote_id_property: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            kind: FetchKind::Always,
            flatified_fields: None,
            extra_params: Map::new(),
            paginator: Map::new(),
            remote_id_property: "remote_id".to_string(),
        }
    }
}

/// Result of a multi-object fetch: the local rows read before the remote
/// round trip, and how many remote objects were applied to the store.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub local: Vec<Record>,
    pub applied: usize,
}

/// Result of a single-object fetch. `object` reflects the store after the
/// remote import.
#[derive(Debug, Clone)]
pub struct ObjectFetch {
    pub object: Option<Record>,
    pub applied: usize,
}

/// Result of a save: objects pushed, response objects applied back, and
/// records skipped because their entity had no mapping.
#[derive(Debug, Clone, Default)]
pub struct SaveOutcome {
    pub sent: usize,
    pub applied: usize,
    pub skipped: usize,
}

/// Orchestrates fetches and saves: builds remote requests from resolved
/// mappings, runs them through the bridge, and imports the response back
/// into the local store.
pub struct RequestManager<S, B> {
    model: EntityModel,
    mapping: Arc<RestMapping<EntityNode, String>>,
    store: Arc<S>,
    bridge: Arc<B>,
}

impl<S, B> RequestManager<S, B>
where
    S: LocalStore,
    B: Bridge,
{
    pub fn new(
        model: EntityModel,
        mapping: Arc<RestMapping<EntityNode, String>>,
        store: Arc<S>,
        bridge: Arc<B>,
    ) -> Self {
        Self {
            model,
            mapping,
            store,
            bridge,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn bridge(&self) -> &Arc<B> {
        &self.bridge
    }

    // ── Fetch ────────────────────────────────────────────────────

    /// Fetches records matching `request`, refreshing the store from the
    /// backend according to `options.kind`.
    ///
    /// A local read error does not fail the fetch — it degrades to "no
    /// local results" and the remote round trip still runs.
    pub async fn fetch_objects(
        &self,
        request: &FetchRequest,
        options: &FetchOptions,
    ) -> EngineResult<FetchOutcome> {
        let node = self.node(&request.entity)?;
        let local = self.local_fetch(request).await;

        let hit_remote = match options.kind {
            FetchKind::Always => true,
            FetchKind::OnlyIfNoLocal => local.is_empty(),
            FetchKind::Never => false,
        };
        if !hit_remote {
            debug!(entity = %request.entity, "skipping remote fetch");
            return Ok(FetchOutcome { local, applied: 0 });
        }

        let applied = self.remote_fetch_and_apply(&node, request, options).await?;
        Ok(FetchOutcome { local, applied })
    }

    /// Fetches at most one record. With a remote id, matches on
    /// `options.remote_id_property`; without one, there is expected to be
    /// a single record of the entity.
    ///
    /// The returned object is re-read after the remote import, so it
    /// reflects the refreshed store.
    pub async fn fetch_object(
        &self,
        entity: &str,
        remote_id: Option<&str>,
        options: &FetchOptions,
    ) -> EngineResult<ObjectFetch> {
        let request = match remote_id {
            Some(id) => FetchRequest::matching(
                entity,
                &options.remote_id_property,
                Value::String(id.to_string()),
            ),
            None => FetchRequest::all(entity),
        };

        let node = self.node(entity)?;
        let local = self.local_fetch(&request).await;
        if local.len() > 1 {
            warn!(
                entity,
                count = local.len(),
                "got more than one result where at most 1 was expected"
            );
        }

        let hit_remote = match options.kind {
            FetchKind::Always => true,
            FetchKind::OnlyIfNoLocal => local.is_empty(),
            FetchKind::Never => false,
        };
        let applied = if hit_remote {
            self.remote_fetch_and_apply(&node, &request, options).await?
        } else {
            0
        };

        let object = self
            .store
            .fetch(&request)
            .await
            .unwrap_or_default()
            .into_iter()
            .next();
        Ok(ObjectFetch { object, applied })
    }

    // ── Save ─────────────────────────────────────────────────────

    /// Pushes changed records to the backend and applies the backend's
    /// response back into the store.
    ///
    /// With `objects` of `None`, all pending changes are saved. Records
    /// whose entity is unknown or unmapped are skipped with a warning
    /// rather than failing the whole save.
    pub async fn save(
        &self,
        objects: Option<Vec<Record>>,
        workflow: SaveWorkflow,
    ) -> EngineResult<SaveOutcome> {
        // Snapshot the changes before any rollback discards them.
        let objects = match objects {
            Some(objects) => objects,
            None => self.store.pending_changes().await?,
        };

        match workflow {
            SaveWorkflow::SaveBeforeRemote => self.store.save().await?,
            SaveWorkflow::RollbackBeforeRemote => self.store.rollback().await?,
            SaveWorkflow::SaveAfterRemote => {}
        }

        let mut outcome = SaveOutcome::default();
        for (entity, records) in group_by_entity(objects) {
            let Some(node) = self.model.entity(&entity) else {
                warn!(entity = %entity, count = records.len(), "unknown entity in save; skipping");
                outcome.skipped += records.len();
                continue;
            };
            let Some(rest_path) = self.mapping.rest_path(&node).map(str::to_string) else {
                warn!(entity = %entity, count = records.len(), "entity has no REST mapping; skipping");
                outcome.skipped += records.len();
                continue;
            };

            let changes: Vec<RemoteChange> = records
                .iter()
                .map(|record| RemoteChange {
                    record_id: record.id.clone(),
                    values: self.mapping.save_values(&self.remote_values(&node, record)),
                })
                .collect();
            outcome.sent += changes.len();

            let response = self.bridge.save(RemoteSaveRequest { rest_path, changes }).await?;
            outcome.applied += self.apply_response(&node, response).await?;
        }

        if workflow == SaveWorkflow::SaveAfterRemote {
            self.store.save().await?;
        }
        Ok(outcome)
    }

    // ── Internals ────────────────────────────────────────────────

    fn node(&self, entity: &str) -> EngineResult<EntityNode> {
        self.model
            .entity(entity)
            .ok_or_else(|| EngineError::UnknownEntity(entity.to_string()))
    }

    async fn local_fetch(&self, request: &FetchRequest) -> Vec<Record> {
        match self.store.fetch(request).await {
            Ok(records) => records,
            Err(e) => {
                warn!(entity = %request.entity, "local fetch failed, continuing without local results: {e}");
                Vec::new()
            }
        }
    }

    async fn remote_fetch_and_apply(
        &self,
        node: &EntityNode,
        request: &FetchRequest,
        options: &FetchOptions,
    ) -> EngineResult<usize> {
        let rest_path = self
            .mapping
            .rest_path(node)
            .ok_or_else(|| EngineError::UnmappedEntity(request.entity.clone()))?
            .to_string();

        let info = self.request_info(options)?;
        let mut params = self.mapping.fetch_parameters(info.as_ref());

        if let Some((property, value)) = &request.predicate {
            match self.mapping.property_mapping(property, Some(node)) {
                Some(pm) => {
                    let remote = pm
                        .transformer
                        .as_ref()
                        .and_then(|t| t.to_remote(value))
                        .unwrap_or_else(|| value.clone());
                    params.insert(pm.rest_name.clone(), remote);
                }
                None => debug!(property = %property, "predicate property has no mapping; skipping"),
            }
        }

        let response = self.bridge.fetch(RemoteFetchRequest { rest_path, params }).await?;
        self.apply_response(node, response).await
    }

    fn request_info(&self, options: &FetchOptions) -> EngineResult<Option<RequestInfo>> {
        let mut info = RequestInfo::new();
        let mut present = false;
        if let Some(flatified) = &options.flatified_fields {
            info = info.with_fields(self.mapping.parse_fields(flatified)?);
            present = true;
        }
        for (key, value) in &options.extra_params {
            info = info.with_param(key, value.clone());
            present = true;
        }
        for (key, value) in &options.paginator {
            info = info.with_paginator(key, value.clone());
            present = true;
        }
        Ok(present.then_some(info))
    }

    /// Applies a remote response to the store under the entity's uniquing
    /// policy. Returns the number of records created or updated.
    async fn apply_response(
        &self,
        node: &EntityNode,
        response: RemoteResponse,
    ) -> EngineResult<usize> {
        let uniquing = self.mapping.uniquing_policy(node);
        let objects: Vec<Map<String, Value>> = response
            .objects
            .iter()
            .map(|remote| self.local_values(node, remote))
            .collect();
        let applied = self.store.apply_remote(node.name(), objects, &uniquing).await?;
        info!(entity = node.name(), applied, "applied remote objects");
        Ok(applied)
    }

    /// Translates one remote object to local property names, walking the
    /// entity's declared and inherited properties. Unmapped properties,
    /// absent remote fields and rejected transformations are skipped.
    fn local_values(&self, node: &EntityNode, remote: &Map<String, Value>) -> Map<String, Value> {
        let mut values = Map::new();
        let mut current = Some(node.clone());
        while let Some(entity) = current {
            for property in entity.properties() {
                if values.contains_key(&property.name) {
                    continue;
                }
                let Some(pm) = self.mapping.property_mapping(&property.name, Some(node)) else {
                    continue;
                };
                let Some(raw) = remote.get(&pm.rest_name) else {
                    continue;
                };
                let value = match &pm.transformer {
                    Some(t) => match t.to_local(raw) {
                        Some(v) => v,
                        None => {
                            debug!(property = %property.name, "transformer rejected remote value; skipping");
                            continue;
                        }
                    },
                    None => raw.clone(),
                };
                values.insert(property.name.clone(), value);
            }
            current = entity.superentity();
        }
        values
    }

    /// Translates one record to its remote representation. Properties with
    /// no resolved mapping are skipped.
    fn remote_values(&self, node: &EntityNode, record: &Record) -> Map<String, Value> {
        let mut out = Map::new();
        let Some(object) = record.values.as_object() else {
            return out;
        };
        for (name, value) in object {
            let Some(pm) = self.mapping.property_mapping(name, Some(node)) else {
                debug!(property = %name, "property has no mapping; skipping");
                continue;
            };
            let remote = match &pm.transformer {
                Some(t) => match t.to_remote(value) {
                    Some(v) => v,
                    None => {
                        debug!(property = %name, "transformer rejected local value; skipping");
                        continue;
                    }
                },
                None => value.clone(),
            };
            out.insert(pm.rest_name.clone(), remote);
        }
        out
    }
}

/// Groups records by entity, preserving first-seen order.
fn group_by_entity(objects: Vec<Record>) -> Vec<(String, Vec<Record>)> {
    let mut groups: Vec<(String, Vec<Record>)> = Vec::new();
    for record in objects {
        match groups.iter_mut().find(|(entity, _)| *entity == record.entity) {
            Some((_, records)) => records.push(record),
            None => groups.push((record.entity.clone(), vec![record])),
        }
    }
    groups
}
