use crate::types::{HttpMethod, is_present, serde_get_type};
use crate::{
    DESCRIPTION_FIELD, PARAMETERS_FIELD, REQUEST_BODY_FIELD, RESPONSES_FIELD, SECURITY_FIELD,
    SUMMARY_FIELD, TAGS_FIELD,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Operation fields the model interprets; everything else is passed through.
const OPERATION_FIELDS: [&str; 7] = [
    SUMMARY_FIELD,
    DESCRIPTION_FIELD,
    PARAMETERS_FIELD,
    RESPONSES_FIELD,
    REQUEST_BODY_FIELD,
    TAGS_FIELD,
    SECURITY_FIELD,
];

/// Session-local endpoint handle.
///
/// Identifiers are handed out by a monotonic counter owned by the document model.
/// They never appear in the exported document and are regenerated on every import,
/// so they must not be stored across an import/export round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointId(pub(crate) u64);

impl Display for EndpointId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "endpoint_{}", self.0)
    }
}

/// One alternative of a security requirement list: scheme name to required scopes.
///
/// Scheme names are weak references into `components.securitySchemes`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecurityRequirement(BTreeMap<String, Vec<String>>);

impl SecurityRequirement {
    pub fn new() -> Self {
        SecurityRequirement(BTreeMap::new())
    }

    pub fn with_scheme<I, S>(mut self, scheme: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(scheme.into(), scopes.into_iter().map(Into::into).collect());
        self
    }

    pub fn scopes(&self, scheme: &str) -> Option<&[String]> {
        self.0.get(scheme).map(Vec::as_slice)
    }

    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Moves the scopes held under `old` to `new`. Returns whether anything moved.
    pub(crate) fn rename_scheme(&mut self, old: &str, new: &str) -> bool {
        match self.0.remove(old) {
            Some(scopes) => {
                self.0.insert(new.to_string(), scopes);
                true
            }
            None => false,
        }
    }

    /// Parses a requirement list, or `None` if any part of it has the wrong shape.
    pub(crate) fn parse_list(value: &Value) -> Option<Vec<SecurityRequirement>> {
        serde_json::from_value(value.clone()).ok()
    }

    pub(crate) fn list_to_value(requirements: &[SecurityRequirement]) -> Value {
        Value::Array(
            requirements
                .iter()
                .map(|requirement| {
                    let entries = requirement
                        .0
                        .iter()
                        .map(|(scheme, scopes)| (scheme.clone(), json!(scopes)))
                        .collect::<Map<String, Value>>();
                    Value::Object(entries)
                })
                .collect(),
        )
    }
}

/// Endpoint as supplied by the presentation layer. Optional fields are
/// normalised when the endpoint is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointData {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responses: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    /// Operation fields outside the editor's form (operationId, deprecated, `x-*`, ...).
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl EndpointData {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            summary: None,
            description: None,
            parameters: None,
            responses: None,
            request_body: None,
            tags: None,
            security: None,
            extensions: Map::new(),
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn parameter(mut self, parameter: Value) -> Self {
        self.parameters.get_or_insert_with(Vec::new).push(parameter);
        self
    }

    pub fn response(mut self, status: impl Into<String>, response: Value) -> Self {
        self.responses
            .get_or_insert_with(Map::new)
            .insert(status.into(), response);
        self
    }

    pub fn request_body(mut self, request_body: Value) -> Self {
        self.request_body = Some(request_body);
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.get_or_insert_with(Vec::new).push(tag.into());
        self
    }

    pub fn security(mut self, requirement: SecurityRequirement) -> Self {
        self.security.get_or_insert_with(Vec::new).push(requirement);
        self
    }
}

/// Normalised endpoint held in the model's endpoint index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
    pub description: String,
    pub parameters: Vec<Value>,
    pub responses: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Value>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub extensions: Map<String, Value>,
}

impl Endpoint {
    fn default_responses() -> Map<String, Value> {
        let mut responses = Map::new();
        responses.insert("200".to_string(), json!({ "description": "Success" }));
        responses
    }

    pub(crate) fn from_data(mut data: EndpointData) -> Self {
        data.extensions.retain(|key, _| {
            let typed = OPERATION_FIELDS.contains(&key.as_str());
            if typed {
                log::warn!("Ignoring passthrough '{}' shadowed by a typed field", key);
            }
            !typed
        });
        Self {
            method: data.method,
            path: data.path,
            summary: data.summary.unwrap_or_default(),
            description: data.description.unwrap_or_default(),
            parameters: data.parameters.unwrap_or_default(),
            responses: data.responses.unwrap_or_else(Self::default_responses),
            request_body: data.request_body.filter(|body| is_present(Some(body))),
            tags: data.tags.unwrap_or_default(),
            security: data.security,
            extensions: data.extensions,
        }
    }

    /// Builds an endpoint from an operation object found in an imported document.
    ///
    /// Values with an unexpected shape are kept verbatim as extensions so that
    /// export re-emits them and the validator can report them.
    pub(crate) fn from_operation(method: HttpMethod, path: &str, operation: &Value) -> Self {
        let mut extensions = Map::new();
        let empty = Map::new();
        let fields = operation.as_object().unwrap_or_else(|| {
            log::warn!(
                "Operation '{} {}' is a {}, not an object",
                method,
                path,
                serde_get_type(operation)
            );
            &empty
        });

        for (key, value) in fields {
            if !OPERATION_FIELDS.contains(&key.as_str()) {
                extensions.insert(key.clone(), value.clone());
            }
        }

        let text = |field: &str| {
            fields
                .get(field)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let parameters = match fields.get(PARAMETERS_FIELD) {
            Some(Value::Array(parameters)) => parameters.clone(),
            Some(other) => {
                Self::keep_raw(&mut extensions, method, path, PARAMETERS_FIELD, other);
                Vec::new()
            }
            None => Vec::new(),
        };

        let responses = match fields.get(RESPONSES_FIELD) {
            Some(Value::Object(responses)) => responses.clone(),
            Some(other) => {
                Self::keep_raw(&mut extensions, method, path, RESPONSES_FIELD, other);
                Map::new()
            }
            None => Map::new(),
        };

        let tags = match fields.get(TAGS_FIELD) {
            Some(Value::Array(tags)) if tags.iter().all(Value::is_string) => tags
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(other) => {
                Self::keep_raw(&mut extensions, method, path, TAGS_FIELD, other);
                Vec::new()
            }
            None => Vec::new(),
        };

        let security = match fields.get(SECURITY_FIELD) {
            None | Some(Value::Null) => None,
            Some(value) => match SecurityRequirement::parse_list(value) {
                Some(requirements) => Some(requirements),
                None => {
                    Self::keep_raw(&mut extensions, method, path, SECURITY_FIELD, value);
                    None
                }
            },
        };

        Self {
            method,
            path: path.to_string(),
            summary: text(SUMMARY_FIELD),
            description: text(DESCRIPTION_FIELD),
            parameters,
            responses,
            request_body: fields
                .get(REQUEST_BODY_FIELD)
                .filter(|body| is_present(Some(*body)))
                .cloned(),
            tags,
            security,
            extensions,
        }
    }

    fn keep_raw(
        extensions: &mut Map<String, Value>,
        method: HttpMethod,
        path: &str,
        field: &str,
        value: &Value,
    ) {
        log::warn!(
            "Keeping malformed '{}' of '{} {}' verbatim ({})",
            field,
            method,
            path,
            serde_get_type(value)
        );
        extensions.insert(field.to_string(), value.clone());
    }

    /// Operation object for the `paths` map. Empty optional fields are omitted.
    pub(crate) fn to_operation(&self) -> Value {
        let mut operation = self.extensions.clone();
        operation.insert(SUMMARY_FIELD.to_string(), json!(self.summary));
        operation.insert(DESCRIPTION_FIELD.to_string(), json!(self.description));
        if !self.parameters.is_empty() {
            operation.insert(
                PARAMETERS_FIELD.to_string(),
                Value::Array(self.parameters.clone()),
            );
        }
        if !self.responses.is_empty() || !operation.contains_key(RESPONSES_FIELD) {
            operation.insert(
                RESPONSES_FIELD.to_string(),
                Value::Object(self.responses.clone()),
            );
        }
        if !self.tags.is_empty() {
            operation.insert(TAGS_FIELD.to_string(), json!(self.tags));
        }
        if let Some(security) = self.security.as_ref().filter(|s| !s.is_empty()) {
            operation.insert(
                SECURITY_FIELD.to_string(),
                SecurityRequirement::list_to_value(security),
            );
        }
        if let Some(request_body) = &self.request_body {
            operation.insert(REQUEST_BODY_FIELD.to_string(), request_body.clone());
        }
        Value::Object(operation)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Snapshot of one endpoint together with its session identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointRecord {
    pub id: EndpointId,
    #[serde(flatten)]
    pub endpoint: Endpoint,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_data_applies_defaults() {
        let endpoint = Endpoint::from_data(EndpointData::new(HttpMethod::Get, "/users"));
        assert_eq!(endpoint.summary, "");
        assert_eq!(endpoint.description, "");
        assert!(endpoint.parameters.is_empty());
        assert!(endpoint.tags.is_empty());
        assert_eq!(
            Value::Object(endpoint.responses),
            json!({ "200": { "description": "Success" } })
        );
        assert!(endpoint.request_body.is_none());
        assert!(endpoint.security.is_none());
    }

    #[test]
    fn test_from_data_keeps_explicit_empty_responses() {
        let data: EndpointData = serde_json::from_value(json!({
            "method": "post",
            "path": "/items",
            "responses": {}
        }))
        .unwrap();
        let endpoint = Endpoint::from_data(data);
        assert!(endpoint.responses.is_empty());
    }

    #[test]
    fn test_typed_fields_win_over_passthrough() {
        let mut data = EndpointData::new(HttpMethod::Get, "/users");
        data.extensions.insert("tags".to_string(), json!(["stale"]));
        data.extensions.insert("x-rate-limit".to_string(), json!(10));
        let operation = Endpoint::from_data(data).to_operation();
        assert!(operation.get("tags").is_none());
        assert_eq!(operation["x-rate-limit"], json!(10));
    }

    #[test]
    fn test_endpoint_data_collects_unknown_fields() {
        let data: EndpointData = serde_json::from_value(json!({
            "method": "get",
            "path": "/items",
            "operationId": "listItems",
            "deprecated": true
        }))
        .unwrap();
        assert_eq!(data.extensions.get("operationId"), Some(&json!("listItems")));
        assert_eq!(data.extensions.get("deprecated"), Some(&json!(true)));
    }

    #[test]
    fn test_to_operation_omits_empty_fields() {
        let endpoint = Endpoint::from_data(
            EndpointData::new(HttpMethod::Get, "/users")
                .response("200", json!({ "description": "ok" })),
        );
        let operation = endpoint.to_operation();
        let fields = operation.as_object().unwrap();
        assert!(fields.contains_key("responses"));
        assert!(fields.contains_key("summary"));
        assert!(!fields.contains_key("parameters"));
        assert!(!fields.contains_key("tags"));
        assert!(!fields.contains_key("security"));
        assert!(!fields.contains_key("requestBody"));
    }

    #[test]
    fn test_to_operation_drops_empty_security_list() {
        let mut data = EndpointData::new(HttpMethod::Get, "/users");
        data.security = Some(Vec::new());
        let operation = Endpoint::from_data(data).to_operation();
        assert!(operation.get("security").is_none());
    }

    #[test]
    fn test_from_operation_reads_fields() {
        let operation = json!({
            "summary": "List users",
            "operationId": "listUsers",
            "parameters": [{ "name": "limit", "in": "query", "schema": { "type": "integer" } }],
            "responses": { "200": { "description": "ok" } },
            "tags": ["users"],
            "security": [{ "oauth": ["read"] }]
        });
        let endpoint = Endpoint::from_operation(HttpMethod::Get, "/users", &operation);
        assert_eq!(endpoint.summary, "List users");
        assert_eq!(endpoint.parameters.len(), 1);
        assert_eq!(endpoint.tags, vec!["users".to_string()]);
        let security = endpoint.security.unwrap();
        assert_eq!(security[0].scopes("oauth"), Some(&["read".to_string()][..]));
        assert_eq!(endpoint.extensions.get("operationId"), Some(&json!("listUsers")));
    }

    #[test]
    fn test_from_operation_keeps_malformed_security_verbatim() {
        let operation = json!({
            "responses": { "200": { "description": "ok" } },
            "security": "everyone"
        });
        let endpoint = Endpoint::from_operation(HttpMethod::Get, "/open", &operation);
        assert!(endpoint.security.is_none());
        assert_eq!(
            endpoint.to_operation().get("security"),
            Some(&json!("everyone"))
        );
    }

    #[test]
    fn test_from_operation_keeps_malformed_responses_verbatim() {
        let endpoint =
            Endpoint::from_operation(HttpMethod::Get, "/a", &json!({ "responses": "oops" }));
        assert!(endpoint.responses.is_empty());
        assert_eq!(
            endpoint.to_operation().get("responses"),
            Some(&json!("oops"))
        );

        let endpoint = Endpoint::from_operation(HttpMethod::Get, "/a", &json!({}));
        assert_eq!(endpoint.to_operation().get("responses"), Some(&json!({})));
    }

    #[test]
    fn test_rename_scheme_preserves_scopes() {
        let mut requirement =
            SecurityRequirement::new().with_scheme("oauth", ["read", "write"]);
        assert!(requirement.rename_scheme("oauth", "auth0"));
        assert!(requirement.scopes("oauth").is_none());
        assert_eq!(requirement.scopes("auth0").unwrap().len(), 2);
        assert!(!requirement.rename_scheme("missing", "other"));
    }

    #[test]
    fn test_parse_list_rejects_wrong_shapes() {
        assert!(SecurityRequirement::parse_list(&json!([{ "key": [] }])).is_some());
        assert!(SecurityRequirement::parse_list(&json!({ "key": [] })).is_none());
        assert!(SecurityRequirement::parse_list(&json!(["key"])).is_none());
        assert!(SecurityRequirement::parse_list(&json!([{ "key": "read" }])).is_none());
    }
}
