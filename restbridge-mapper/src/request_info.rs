use crate::fields::FieldSet;
use serde_json::{Map, Value};

/// Per-request REST information supplied alongside a fetch or save:
/// which fields to request, extra query parameters, and paginator state.
///
/// Merged into the mapping's forced parameters by
/// [`RestMapping::fetch_parameters`](crate::RestMapping::fetch_parameters);
/// per-request values win on key collision.
#[derive(Debug, Clone, Default)]
pub struct RequestInfo {
    /// Fields to request from the backend, if limiting the response.
    pub fields: Option<FieldSet>,
    /// Extra query parameters for this request only.
    pub extra_params: Map<String, Value>,
    /// Paginator parameters (offset/cursor style, backend-defined).
    pub paginator: Map<String, Value>,
}

impl RequestInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the requested field set (builder style).
    #[must_use]
    pub fn with_fields(mut self, fields: FieldSet) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Adds an extra query parameter (builder style).
    #[must_use]
    pub fn with_param(mut self, key: &str, value: Value) -> Self {
        self.extra_params.insert(key.to_string(), value);
        self
    }

    /// Adds a paginator parameter (builder style).
    #[must_use]
    pub fn with_paginator(mut self, key: &str, value: Value) -> Self {
        self.paginator.insert(key.to_string(), value);
        self
    }
}
