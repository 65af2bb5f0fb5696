use crate::COMPONENTS_FIELD;
use crate::document::DocumentModel;
use crate::error::EditorError;
use crate::types::ComponentKind;
use serde::Serialize;
use serde_json::{Map, Value};

/// Named entries of the `components` block.
///
/// `add_*` creates missing categories and overwrites an existing entry.
/// `update_*` and `delete_*` leave the document alone when the category or
/// entry does not exist.
impl DocumentModel {
    fn category(&self, kind: ComponentKind) -> Option<&Map<String, Value>> {
        self.spec
            .get(COMPONENTS_FIELD)
            .and_then(|components| components.get(kind.as_str()))
            .and_then(Value::as_object)
    }

    fn category_mut(&mut self, kind: ComponentKind) -> Option<&mut Map<String, Value>> {
        self.spec
            .get_mut(COMPONENTS_FIELD)
            .and_then(|components| components.get_mut(kind.as_str()))
            .and_then(Value::as_object_mut)
    }

    pub fn add_component<S>(
        &mut self,
        kind: ComponentKind,
        name: impl Into<String>,
        component: S,
    ) -> Result<(), EditorError>
    where
        S: Serialize,
    {
        let name = name.into();
        let value = serde_json::to_value(component)?;
        let components = Self::object_entry(&mut self.spec, COMPONENTS_FIELD);
        let category = Self::object_entry(components, kind.as_str());
        log::debug!("Adding {} '{}'", kind, name);
        category.insert(name, value);
        Ok(())
    }

    pub fn update_component<S>(
        &mut self,
        kind: ComponentKind,
        name: &str,
        component: S,
    ) -> Result<(), EditorError>
    where
        S: Serialize,
    {
        let value = serde_json::to_value(component)?;
        match self
            .category_mut(kind)
            .and_then(|category| category.get_mut(name))
        {
            Some(slot) => {
                log::debug!("Updating {} '{}'", kind, name);
                *slot = value;
            }
            None => log::debug!("No {} '{}' to update", kind, name),
        }
        Ok(())
    }

    pub fn delete_component(&mut self, kind: ComponentKind, name: &str) -> Option<Value> {
        let removed = self
            .category_mut(kind)
            .and_then(|category| category.remove(name));
        if removed.is_some() {
            log::debug!("Deleted {} '{}'", kind, name);
        }
        removed
    }

    pub fn get_component(&self, kind: ComponentKind, name: &str) -> Option<Value> {
        self.category(kind)
            .and_then(|category| category.get(name))
            .cloned()
    }

    pub fn get_all_components(&self, kind: ComponentKind) -> Map<String, Value> {
        self.category(kind).cloned().unwrap_or_default()
    }

    pub fn add_schema<S: Serialize>(
        &mut self,
        name: impl Into<String>,
        schema: S,
    ) -> Result<(), EditorError> {
        self.add_component(ComponentKind::Schemas, name, schema)
    }

    pub fn update_schema<S: Serialize>(
        &mut self,
        name: &str,
        schema: S,
    ) -> Result<(), EditorError> {
        self.update_component(ComponentKind::Schemas, name, schema)
    }

    pub fn delete_schema(&mut self, name: &str) -> Option<Value> {
        self.delete_component(ComponentKind::Schemas, name)
    }

    pub fn get_schema(&self, name: &str) -> Option<Value> {
        self.get_component(ComponentKind::Schemas, name)
    }

    pub fn get_all_schemas(&self) -> Map<String, Value> {
        self.get_all_components(ComponentKind::Schemas)
    }

    pub fn add_response<S: Serialize>(
        &mut self,
        name: impl Into<String>,
        response: S,
    ) -> Result<(), EditorError> {
        self.add_component(ComponentKind::Responses, name, response)
    }

    pub fn update_response<S: Serialize>(
        &mut self,
        name: &str,
        response: S,
    ) -> Result<(), EditorError> {
        self.update_component(ComponentKind::Responses, name, response)
    }

    pub fn delete_response(&mut self, name: &str) -> Option<Value> {
        self.delete_component(ComponentKind::Responses, name)
    }

    pub fn get_response(&self, name: &str) -> Option<Value> {
        self.get_component(ComponentKind::Responses, name)
    }

    pub fn get_all_responses(&self) -> Map<String, Value> {
        self.get_all_components(ComponentKind::Responses)
    }

    pub fn add_security_scheme<S: Serialize>(
        &mut self,
        name: impl Into<String>,
        scheme: S,
    ) -> Result<(), EditorError> {
        self.add_component(ComponentKind::SecuritySchemes, name, scheme)
    }

    pub fn update_security_scheme<S: Serialize>(
        &mut self,
        name: &str,
        scheme: S,
    ) -> Result<(), EditorError> {
        self.update_component(ComponentKind::SecuritySchemes, name, scheme)
    }

    pub fn delete_security_scheme(&mut self, name: &str) -> Option<Value> {
        self.delete_component(ComponentKind::SecuritySchemes, name)
    }

    pub fn get_security_scheme(&self, name: &str) -> Option<Value> {
        self.get_component(ComponentKind::SecuritySchemes, name)
    }

    pub fn get_all_security_schemes(&self) -> Map<String, Value> {
        self.get_all_components(ComponentKind::SecuritySchemes)
    }

    /// Stores `scheme` under `new` and moves every requirement that named `old`
    /// over to `new`.
    pub fn rename_security_scheme<S: Serialize>(
        &mut self,
        old: &str,
        new: &str,
        scheme: S,
    ) -> Result<(), EditorError> {
        let value = serde_json::to_value(scheme)?;
        if old != new {
            self.delete_security_scheme(old);
        }
        self.add_security_scheme(new, value)?;
        self.update_security_scheme_references(old, new);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::document::DocumentModel;
    use crate::types::ComponentKind;
    use crate::types::endpoint::{EndpointData, SecurityRequirement};
    use crate::types::schema::Schema;
    use crate::types::security::{ApiKeyLocation, SecurityScheme};
    use crate::types::HttpMethod;
    use serde_json::json;

    #[test]
    fn test_schema_crud() {
        let mut model = DocumentModel::new();
        let user = Schema::object()
            .with_property("id", Schema::integer(), true)
            .unwrap();
        model.add_schema("User", &user).unwrap();
        assert_eq!(
            Schema::from_value(&model.get_schema("User").unwrap()).unwrap(),
            user
        );

        model.update_schema("User", json!({ "type": "string" })).unwrap();
        assert_eq!(model.get_schema("User"), Some(json!({ "type": "string" })));

        assert!(model.delete_schema("User").is_some());
        assert!(model.get_schema("User").is_none());
        assert!(model.get_all_schemas().is_empty());
    }

    #[test]
    fn test_update_and_delete_missing_are_no_ops() {
        let mut model = DocumentModel::new();
        let before = model.export();
        model.update_response("NotFound", json!({ "description": "x" })).unwrap();
        assert!(model.delete_response("NotFound").is_none());
        assert_eq!(model.export(), before);
    }

    #[test]
    fn test_add_creates_missing_category() {
        let mut model = DocumentModel::new();
        model
            .import(json!({ "openapi": "3.1.0", "info": { "title": "t", "version": "1" }, "paths": {} }))
            .unwrap();
        assert!(model.get_all_components(ComponentKind::Links).is_empty());
        model
            .add_component(ComponentKind::Links, "next", json!({ "operationId": "list" }))
            .unwrap();
        assert_eq!(
            model.export()["components"],
            json!({ "links": { "next": { "operationId": "list" } } })
        );
    }

    #[test]
    fn test_typed_security_scheme_is_stored_in_document_form() {
        let mut model = DocumentModel::new();
        model
            .add_security_scheme("key", SecurityScheme::api_key("X-Key", ApiKeyLocation::Header))
            .unwrap();
        assert_eq!(
            model.get_all_security_schemes()["key"],
            json!({ "type": "apiKey", "name": "X-Key", "in": "header" })
        );
    }

    #[test]
    fn test_rename_security_scheme_moves_references() {
        let mut model = DocumentModel::new();
        let scheme = SecurityScheme::http("bearer", Some("JWT".to_string()));
        model.add_security_scheme("jwt", &scheme).unwrap();
        model.add_endpoint(
            EndpointData::new(HttpMethod::Get, "/me")
                .security(SecurityRequirement::new().with_scheme("jwt", Vec::<String>::new())),
        );
        model.set_global_security(vec![SecurityRequirement::new().with_scheme("jwt", ["profile"])]);

        model.rename_security_scheme("jwt", "bearerAuth", &scheme).unwrap();

        let exported = model.export();
        let schemes = exported["components"]["securitySchemes"].as_object().unwrap();
        assert!(schemes.contains_key("bearerAuth"));
        assert!(!schemes.contains_key("jwt"));
        assert_eq!(exported["paths"]["/me"]["get"]["security"], json!([{ "bearerAuth": [] }]));
        assert_eq!(exported["security"], json!([{ "bearerAuth": ["profile"] }]));
    }
}
