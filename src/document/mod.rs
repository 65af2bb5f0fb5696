//! In-memory document with a flat endpoint index kept in step with `paths`.

pub mod builder;
pub mod components;
pub mod references;

use crate::canonical::canonicalize_document;
use crate::document::builder::EditorConfig;
use crate::error::EditorError;
use crate::types::endpoint::{
    Endpoint, EndpointData, EndpointId, EndpointRecord, SecurityRequirement,
};
use crate::types::{ComponentKind, HttpMethod, is_present, serde_get_type};
use crate::{
    COMPONENTS_FIELD, DESCRIPTION_FIELD, INFO_FIELD, OPENAPI_FIELD, PATHS_FIELD, SECURITY_FIELD,
    SERVERS_FIELD, TITLE_FIELD, URL_FIELD, VERSION_FIELD,
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Editable fields of the info block plus the first server's URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiInfoField {
    Title,
    Version,
    Description,
    BaseUrl,
}

impl FromStr for ApiInfoField {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(ApiInfoField::Title),
            "version" => Ok(ApiInfoField::Version),
            "description" => Ok(ApiInfoField::Description),
            "baseUrl" => Ok(ApiInfoField::BaseUrl),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiInfo {
    pub title: String,
    pub version: String,
    pub description: String,
    pub base_url: String,
}

/// Owner of the document being edited.
///
/// Two views are held: the document mapping itself and an endpoint index keyed
/// by [`EndpointId`]. Every endpoint mutation rewrites the method keys of
/// `paths` from the index, so the document is always exportable as-is. Path
/// item fields that are not operations (`parameters`, `servers`, `x-*`, ...)
/// are left in place.
///
/// All getters return owned copies.
pub struct DocumentModel {
    config: EditorConfig,
    spec: Map<String, Value>,
    endpoints: BTreeMap<EndpointId, Endpoint>,
    next_id: u64,
}

impl DocumentModel {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        let mut model = Self {
            config,
            spec: Map::new(),
            endpoints: BTreeMap::new(),
            next_id: 1,
        };
        model.initialize_empty();
        model
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replaces the document with the default skeleton and drops every endpoint.
    pub fn initialize_empty(&mut self) {
        let components = ComponentKind::ALL
            .into_iter()
            .map(|kind| (kind.as_str().to_string(), json!({})))
            .collect::<Map<String, Value>>();

        let mut spec = Map::new();
        spec.insert(OPENAPI_FIELD.to_string(), json!(self.config.openapi_version));
        spec.insert(
            INFO_FIELD.to_string(),
            json!({
                "title": self.config.title,
                "version": self.config.api_version,
                "description": ""
            }),
        );
        spec.insert(
            SERVERS_FIELD.to_string(),
            json!([{
                "url": self.config.server_url,
                "description": self.config.server_description
            }]),
        );
        spec.insert(PATHS_FIELD.to_string(), json!({}));
        spec.insert(COMPONENTS_FIELD.to_string(), Value::Object(components));

        self.spec = spec;
        self.endpoints.clear();
        log::debug!("Initialized empty document");
    }

    /// Adopts `document` wholesale and rebuilds the endpoint index from its
    /// `paths`. The model is left untouched when the document is rejected.
    ///
    /// Previously issued endpoint ids are invalidated.
    pub fn import(&mut self, document: Value) -> Result<(), EditorError> {
        let spec = match document {
            Value::Object(spec) => spec,
            other => {
                return Err(EditorError::format(&format!(
                    "expected an object, found {}",
                    serde_get_type(&other)
                )));
            }
        };

        for field in [OPENAPI_FIELD, INFO_FIELD, PATHS_FIELD] {
            if !is_present(spec.get(field)) {
                return Err(EditorError::format(&format!("missing '{}'", field)));
            }
        }

        let paths = match spec.get(PATHS_FIELD) {
            Some(Value::Object(paths)) => paths,
            Some(other) => {
                return Err(EditorError::format(&format!(
                    "'{}' must be an object, found {}",
                    PATHS_FIELD,
                    serde_get_type(other)
                )));
            }
            None => return Err(EditorError::format(&format!("missing '{}'", PATHS_FIELD))),
        };

        let mut endpoints = BTreeMap::new();
        for (path, item) in paths {
            let Some(item) = item.as_object() else {
                log::warn!(
                    "Path item '{}' is a {}, keeping it verbatim",
                    path,
                    serde_get_type(item)
                );
                continue;
            };
            for (key, operation) in item {
                if let Ok(method) = HttpMethod::from_str(key) {
                    if !operation.is_object() {
                        log::warn!(
                            "Operation '{} {}' is a {}, keeping it verbatim",
                            method,
                            path,
                            serde_get_type(operation)
                        );
                        continue;
                    }
                    let id = self.next_endpoint_id();
                    endpoints.insert(id, Endpoint::from_operation(method, path, operation));
                }
            }
        }

        log::debug!("Imported document with {} endpoint(s)", endpoints.len());
        self.spec = spec;
        self.endpoints = endpoints;
        self.sync_paths();
        Ok(())
    }

    /// Canonically ordered copy of the document.
    pub fn export(&self) -> Value {
        canonicalize_document(&Value::Object(self.spec.clone()))
    }

    pub fn api_info(&self) -> ApiInfo {
        let info = self.spec.get(INFO_FIELD);
        let text = |field: &str| {
            info.and_then(|info| info.get(field))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let base_url = self
            .spec
            .get(SERVERS_FIELD)
            .and_then(|servers| servers.get(0))
            .and_then(|server| server.get(URL_FIELD))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        ApiInfo {
            title: text(TITLE_FIELD),
            version: text(VERSION_FIELD),
            description: text(DESCRIPTION_FIELD),
            base_url,
        }
    }

    /// Sets one info field. Setting the base URL creates the first server when
    /// the document has none.
    pub fn update_api_info(&mut self, field: ApiInfoField, value: impl Into<String>) {
        let value = Value::String(value.into());
        match field {
            ApiInfoField::Title => Self::object_entry(&mut self.spec, INFO_FIELD)
                .insert(TITLE_FIELD.to_string(), value),
            ApiInfoField::Version => Self::object_entry(&mut self.spec, INFO_FIELD)
                .insert(VERSION_FIELD.to_string(), value),
            ApiInfoField::Description => Self::object_entry(&mut self.spec, INFO_FIELD)
                .insert(DESCRIPTION_FIELD.to_string(), value),
            ApiInfoField::BaseUrl => {
                let servers = self
                    .spec
                    .entry(SERVERS_FIELD)
                    .or_insert_with(|| Value::Array(Vec::new()));
                if !servers.is_array() {
                    log::warn!("Replacing non-array '{}'", SERVERS_FIELD);
                    *servers = Value::Array(Vec::new());
                }
                let Some(servers) = servers.as_array_mut() else {
                    return;
                };
                if servers.first().is_none_or(|server| !server.is_object()) {
                    if servers.is_empty() {
                        servers.push(json!({}));
                    } else {
                        servers[0] = json!({});
                    }
                }
                match servers.first_mut().and_then(Value::as_object_mut) {
                    Some(server) => server.insert(URL_FIELD.to_string(), value),
                    None => None,
                }
            }
        };
        log::debug!("Updated API info field {:?}", field);
    }

    /// Mapping stored under `key`, replacing anything that is not a mapping.
    pub(crate) fn object_entry<'a>(
        parent: &'a mut Map<String, Value>,
        key: &str,
    ) -> &'a mut Map<String, Value> {
        let entry = parent
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            log::warn!(
                "Replacing '{}' ({}) with an empty object",
                key,
                serde_get_type(entry)
            );
            *entry = Value::Object(Map::new());
        }
        match entry {
            Value::Object(map) => map,
            _ => unreachable!("entry was just replaced with an object"),
        }
    }

    /// Indexes a new endpoint under a fresh id.
    ///
    /// Endpoints sharing a path and method are all kept in the index, but
    /// `paths` holds only one operation per pair: the most recently created
    /// one. Deleting it exposes the next most recent.
    pub fn add_endpoint(&mut self, data: EndpointData) -> EndpointId {
        let id = self.next_endpoint_id();
        let endpoint = Endpoint::from_data(data);
        log::debug!("Adding {} as {} {}", id, endpoint.method, endpoint.path);
        self.endpoints.insert(id, endpoint);
        self.sync_paths();
        id
    }

    pub fn update_endpoint(
        &mut self,
        id: EndpointId,
        data: EndpointData,
    ) -> Result<(), EditorError> {
        let Some(slot) = self.endpoints.get_mut(&id) else {
            return Err(EditorError::not_found(&id));
        };
        *slot = Endpoint::from_data(data);
        log::debug!("Updated {}", id);
        self.sync_paths();
        Ok(())
    }

    pub fn delete_endpoint(&mut self, id: EndpointId) -> Result<Endpoint, EditorError> {
        let Some(endpoint) = self.endpoints.remove(&id) else {
            return Err(EditorError::not_found(&id));
        };
        log::debug!("Deleted {}", id);
        self.sync_paths();
        Ok(endpoint)
    }

    pub fn get_endpoint(&self, id: EndpointId) -> Option<Endpoint> {
        self.endpoints.get(&id).cloned()
    }

    /// Every endpoint in creation order.
    pub fn get_all_endpoints(&self) -> Vec<EndpointRecord> {
        self.endpoints
            .iter()
            .map(|(id, endpoint)| EndpointRecord {
                id: *id,
                endpoint: endpoint.clone(),
            })
            .collect()
    }

    /// An empty list removes the document-level `security` field.
    pub fn set_global_security(&mut self, requirements: Vec<SecurityRequirement>) {
        if requirements.is_empty() {
            self.spec.remove(SECURITY_FIELD);
        } else {
            self.spec.insert(
                SECURITY_FIELD.to_string(),
                SecurityRequirement::list_to_value(&requirements),
            );
        }
        log::debug!("Set {} global security requirement(s)", requirements.len());
    }

    pub fn get_global_security(&self) -> Vec<SecurityRequirement> {
        match self.spec.get(SECURITY_FIELD) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => SecurityRequirement::parse_list(value).unwrap_or_else(|| {
                log::warn!("Global '{}' is malformed, reporting none", SECURITY_FIELD);
                Vec::new()
            }),
        }
    }

    fn next_endpoint_id(&mut self) -> EndpointId {
        let id = EndpointId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Rewrites the operation entries of `paths` from the endpoint index.
    fn sync_paths(&mut self) {
        let previous = match self.spec.remove(PATHS_FIELD) {
            Some(Value::Object(paths)) => paths,
            _ => Map::new(),
        };

        let mut paths = Map::new();
        for (path, item) in previous {
            match item {
                Value::Object(mut fields) => {
                    fields.retain(|key, value| {
                        HttpMethod::from_str(key).is_err() || !value.is_object()
                    });
                    if !fields.is_empty() {
                        paths.insert(path, Value::Object(fields));
                    }
                }
                other => {
                    paths.insert(path, other);
                }
            }
        }

        for (id, endpoint) in &self.endpoints {
            let item = Self::object_entry(&mut paths, &endpoint.path);
            if item
                .insert(endpoint.method.to_string(), endpoint.to_operation())
                .is_some()
            {
                log::warn!(
                    "{} replaces an earlier '{} {}' operation",
                    id,
                    endpoint.method,
                    endpoint.path
                );
            }
        }

        self.spec.insert(PATHS_FIELD.to_string(), Value::Object(paths));
    }
}

impl Default for DocumentModel {
    fn default() -> Self {
        Self::new()
    }
}
