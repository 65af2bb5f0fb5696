pub mod endpoint;
pub mod json_path;
pub mod schema;
pub mod security;
pub mod tag;
pub mod version;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Operation methods the editor recognises inside a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Head,
        HttpMethod::Options,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Path item keys are case-sensitive, so only the lowercase spelling matches.
impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or(())
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum ParameterLocation {
    Header,
    Query,
    Cookie,
    Path,
}

impl FromStr for ParameterLocation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "header" => Ok(ParameterLocation::Header),
            "query" => Ok(ParameterLocation::Query),
            "cookie" => Ok(ParameterLocation::Cookie),
            "path" => Ok(ParameterLocation::Path),
            _ => Err(()),
        }
    }
}

impl Display for ParameterLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let str = String::from(match self {
            ParameterLocation::Header => "header",
            ParameterLocation::Query => "query",
            ParameterLocation::Cookie => "cookie",
            ParameterLocation::Path => "path",
        });
        write!(f, "{}", str)
    }
}

/// Named collections inside the `components` block, in canonical export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Schemas,
    Responses,
    Parameters,
    Examples,
    RequestBodies,
    Headers,
    SecuritySchemes,
    Links,
    Callbacks,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 9] = [
        ComponentKind::Schemas,
        ComponentKind::Responses,
        ComponentKind::Parameters,
        ComponentKind::Examples,
        ComponentKind::RequestBodies,
        ComponentKind::Headers,
        ComponentKind::SecuritySchemes,
        ComponentKind::Links,
        ComponentKind::Callbacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Schemas => "schemas",
            ComponentKind::Responses => "responses",
            ComponentKind::Parameters => "parameters",
            ComponentKind::Examples => "examples",
            ComponentKind::RequestBodies => "requestBodies",
            ComponentKind::Headers => "headers",
            ComponentKind::SecuritySchemes => "securitySchemes",
            ComponentKind::Links => "links",
            ComponentKind::Callbacks => "callbacks",
        }
    }
}

impl Display for ComponentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presence test used throughout the editor: absent, `null`, `false`, `0` and
/// `""` all count as "not provided"; any list or mapping counts as provided.
pub(crate) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

pub(crate) fn serde_get_type(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_parsing_is_lowercase_only() {
        assert_eq!("patch".parse::<HttpMethod>(), Ok(HttpMethod::Patch));
        assert!("GET".parse::<HttpMethod>().is_err());
        assert!("trace".parse::<HttpMethod>().is_err());
        assert!("parameters".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_method_serializes_lowercase() {
        assert_eq!(serde_json::to_value(HttpMethod::Options).unwrap(), json!("options"));
    }

    #[test]
    fn test_parameter_location_round_trip() {
        for name in ["query", "header", "path", "cookie"] {
            let location: ParameterLocation = name.parse().unwrap();
            assert_eq!(location.to_string(), name);
        }
        assert!("body".parse::<ParameterLocation>().is_err());
    }

    #[test]
    fn test_presence_rules() {
        assert!(!is_present(None));
        assert!(!is_present(Some(&json!(null))));
        assert!(!is_present(Some(&json!(""))));
        assert!(!is_present(Some(&json!(false))));
        assert!(!is_present(Some(&json!(0))));
        assert!(is_present(Some(&json!("x"))));
        assert!(is_present(Some(&json!([]))));
        assert!(is_present(Some(&json!({}))));
    }

    #[test]
    fn test_component_kind_names() {
        assert_eq!(ComponentKind::RequestBodies.as_str(), "requestBodies");
        assert_eq!(ComponentKind::ALL.len(), 9);
    }
}
