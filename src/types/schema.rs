use crate::error::EditorError;
use crate::types::version::OpenApiVersion;
use jsonschema::Validator as JsonValidator;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;

/// Annotations every schema type may carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Typed view of a schema in `components.schemas`.
///
/// Each variant only carries the constraints that apply to its type: `enum` for
/// strings, bounds and `multipleOf` for integers, `items` for arrays and
/// `properties`/`required` for objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    String {
        #[serde(flatten)]
        meta: SchemaMeta,
        #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
        values: Vec<String>,
    },
    Integer {
        #[serde(flatten)]
        meta: SchemaMeta,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minimum: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maximum: Option<i64>,
        #[serde(rename = "multipleOf", default, skip_serializing_if = "Option::is_none")]
        multiple_of: Option<i64>,
    },
    Number {
        #[serde(flatten)]
        meta: SchemaMeta,
    },
    Boolean {
        #[serde(flatten)]
        meta: SchemaMeta,
    },
    Array {
        #[serde(flatten)]
        meta: SchemaMeta,
        items: Box<Schema>,
    },
    Object {
        #[serde(flatten)]
        meta: SchemaMeta,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        properties: BTreeMap<String, Schema>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        required: Vec<String>,
    },
}

impl Schema {
    pub fn string() -> Self {
        Schema::String {
            meta: SchemaMeta::default(),
            values: Vec::new(),
        }
    }

    pub fn integer() -> Self {
        Schema::Integer {
            meta: SchemaMeta::default(),
            minimum: None,
            maximum: None,
            multiple_of: None,
        }
    }

    pub fn number() -> Self {
        Schema::Number {
            meta: SchemaMeta::default(),
        }
    }

    pub fn boolean() -> Self {
        Schema::Boolean {
            meta: SchemaMeta::default(),
        }
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array {
            meta: SchemaMeta::default(),
            items: Box::new(items),
        }
    }

    pub fn object() -> Self {
        Schema::Object {
            meta: SchemaMeta::default(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Schema::String { .. } => "string",
            Schema::Integer { .. } => "integer",
            Schema::Number { .. } => "number",
            Schema::Boolean { .. } => "boolean",
            Schema::Array { .. } => "array",
            Schema::Object { .. } => "object",
        }
    }

    pub fn meta(&self) -> &SchemaMeta {
        match self {
            Schema::String { meta, .. }
            | Schema::Integer { meta, .. }
            | Schema::Number { meta }
            | Schema::Boolean { meta }
            | Schema::Array { meta, .. }
            | Schema::Object { meta, .. } => meta,
        }
    }

    fn meta_mut(&mut self) -> &mut SchemaMeta {
        match self {
            Schema::String { meta, .. }
            | Schema::Integer { meta, .. }
            | Schema::Number { meta }
            | Schema::Boolean { meta }
            | Schema::Array { meta, .. }
            | Schema::Object { meta, .. } => meta,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.meta_mut().description = Some(description.into());
        self
    }

    pub fn with_example(mut self, example: Value) -> Self {
        self.meta_mut().example = Some(example);
        self
    }

    /// Sets the default value, rejecting one whose JSON type differs from the
    /// declared type.
    pub fn with_default(mut self, default: Value) -> Result<Self, EditorError> {
        let type_schema = json!({ "type": self.type_name() });
        let validator = JsonValidator::options()
            .with_draft(OpenApiVersion::V31x.get_draft())
            .build(&type_schema)
            .map_err(|e| EditorError::invalid_schema(&e))?;
        if let Err(e) = validator.validate(&default) {
            return Err(EditorError::invalid_schema(&format!(
                "default {} does not match type '{}': {}",
                default,
                self.type_name(),
                e
            )));
        }
        self.meta_mut().default = Some(default);
        Ok(self)
    }

    pub fn with_enum<I, S>(self, values: I) -> Result<Self, EditorError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self {
            Schema::String { meta, .. } => Ok(Schema::String {
                meta,
                values: values.into_iter().map(Into::into).collect(),
            }),
            other => Err(EditorError::invalid_schema(&format!(
                "enum is only supported for string schemas, not '{}'",
                other.type_name()
            ))),
        }
    }

    pub fn with_bounds(
        self,
        min: Option<i64>,
        max: Option<i64>,
        step: Option<i64>,
    ) -> Result<Self, EditorError> {
        match self {
            Schema::Integer { meta, .. } => Ok(Schema::Integer {
                meta,
                minimum: min,
                maximum: max,
                multiple_of: step,
            }),
            other => Err(EditorError::invalid_schema(&format!(
                "numeric bounds are only supported for integer schemas, not '{}'",
                other.type_name()
            ))),
        }
    }

    pub fn with_property(
        self,
        name: impl Into<String>,
        schema: Schema,
        is_required: bool,
    ) -> Result<Self, EditorError> {
        match self {
            Schema::Object {
                meta,
                mut properties,
                mut required,
            } => {
                let name = name.into();
                required.retain(|r| r != &name);
                if is_required {
                    required.push(name.clone());
                }
                properties.insert(name, schema);
                Ok(Schema::Object {
                    meta,
                    properties,
                    required,
                })
            }
            other => Err(EditorError::invalid_schema(&format!(
                "properties are only supported for object schemas, not '{}'",
                other.type_name()
            ))),
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, EditorError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_object_schema_document_form() {
        let schema = Schema::object()
            .with_description("A user")
            .with_property("id", Schema::integer(), true)
            .unwrap()
            .with_property("tags", Schema::array(Schema::string()), false)
            .unwrap();
        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "object",
                "description": "A user",
                "properties": {
                    "id": { "type": "integer" },
                    "tags": { "type": "array", "items": { "type": "string" } }
                },
                "required": ["id"]
            })
        );
    }

    #[test]
    fn test_parses_nested_document_schema() {
        let schema = Schema::from_value(&json!({
            "type": "object",
            "properties": {
                "status": { "type": "string", "enum": ["active", "disabled"] },
                "age": { "type": "integer", "minimum": 0, "maximum": 150 }
            },
            "required": ["status"]
        }))
        .unwrap();
        let Schema::Object {
            properties,
            required,
            ..
        } = schema
        else {
            panic!("expected object schema");
        };
        assert_eq!(required, vec!["status".to_string()]);
        assert_eq!(
            properties.get("status"),
            Some(&Schema::string().with_enum(["active", "disabled"]).unwrap())
        );
        assert_eq!(
            properties.get("age"),
            Some(&Schema::integer().with_bounds(Some(0), Some(150), None).unwrap())
        );
    }

    #[test]
    fn test_default_must_match_type() {
        assert!(Schema::integer().with_default(json!(10)).is_ok());
        assert!(Schema::integer().with_default(json!("ten")).is_err());
        assert!(Schema::boolean().with_default(json!(true)).is_ok());
        assert!(Schema::array(Schema::string()).with_default(json!({})).is_err());
    }

    #[test]
    fn test_constraints_are_type_specific() {
        assert!(Schema::integer().with_enum(["a"]).is_err());
        assert!(Schema::string().with_bounds(Some(1), None, None).is_err());
        assert!(Schema::number().with_property("x", Schema::string(), false).is_err());
    }

    #[test]
    fn test_required_flag_can_be_cleared() {
        let schema = Schema::object()
            .with_property("name", Schema::string(), true)
            .unwrap()
            .with_property("name", Schema::string(), false)
            .unwrap();
        let Schema::Object { required, .. } = schema else {
            panic!("expected object schema");
        };
        assert!(required.is_empty());
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(Schema::from_value(&json!({ "type": "null" })).is_err());
    }
}
