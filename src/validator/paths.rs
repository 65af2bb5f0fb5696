use crate::types::json_path::JsonPath;
use crate::types::{HttpMethod, ParameterLocation, is_present, serde_get_type};
use crate::validator::security::check_requirements;
use crate::validator::{Check, Violations};
use crate::{
    CONTENT_FIELD, IN_FIELD, NAME_FIELD, PARAMETERS_FIELD, PATH_SEPARATOR, PATHS_FIELD,
    REF_FIELD, REQUEST_BODY_FIELD, REQUIRED_FIELD, RESPONSES_FIELD, SCHEMA_FIELD, SECURITY_FIELD,
};
use serde_json::{Map, Value};
use std::str::FromStr;

fn is_reference(value: &Value) -> bool {
    value.get(REF_FIELD).is_some()
}

fn required_message(field: &str) -> String {
    format!("must have required property \"{}\"", field)
}

/// Path keys, then every operation under a recognised method key.
pub(crate) struct PathsCheck;

impl PathsCheck {
    fn check_operation(operation: &Value, path: &JsonPath, violations: &mut Violations) {
        if !operation.is_object() {
            violations.push(
                path,
                format!("operation must be an object, found {}", serde_get_type(operation)),
            );
            return;
        }

        let responses_path = path.join(RESPONSES_FIELD);
        match operation.get(RESPONSES_FIELD) {
            responses if !is_present(responses) => {
                violations.push(&responses_path, required_message(RESPONSES_FIELD))
            }
            Some(Value::Object(responses)) if responses.is_empty() => {
                violations.push(&responses_path, "must have at least one response")
            }
            Some(Value::Object(_)) => {}
            Some(other) => violations.push(
                &responses_path,
                format!("responses must be an object, found {}", serde_get_type(other)),
            ),
            None => {}
        }

        if let Some(parameters) = operation
            .get(PARAMETERS_FIELD)
            .filter(|parameters| is_present(Some(*parameters)))
        {
            let parameters_path = path.join(PARAMETERS_FIELD);
            match parameters.as_array() {
                Some(parameters) => {
                    for (index, parameter) in parameters.iter().enumerate() {
                        Self::check_parameter(
                            parameter,
                            &parameters_path.join(index.to_string()),
                            violations,
                        );
                    }
                }
                None => violations.push(&parameters_path, "parameters must be an array"),
            }
        }

        if let Some(request_body) = operation
            .get(REQUEST_BODY_FIELD)
            .filter(|body| is_present(Some(*body)))
        {
            Self::check_request_body(request_body, &path.join(REQUEST_BODY_FIELD), violations);
        }

        if let Some(security) = operation.get(SECURITY_FIELD).filter(|s| is_present(Some(*s))) {
            // Operation-level requirements are not matched against declared schemes.
            check_requirements(security, None, &path.join(SECURITY_FIELD), violations);
        }
    }

    fn check_parameter(parameter: &Value, path: &JsonPath, violations: &mut Violations) {
        if is_reference(parameter) {
            return;
        }

        if !is_present(parameter.get(NAME_FIELD)) {
            violations.push(&path.join(NAME_FIELD), required_message(NAME_FIELD));
        }

        let location = parameter.get(IN_FIELD);
        if !is_present(location) {
            violations.push(&path.join(IN_FIELD), required_message(IN_FIELD));
        } else {
            let known = location
                .and_then(Value::as_str)
                .and_then(|location| ParameterLocation::from_str(location).ok());
            match known {
                None => violations.push(
                    &path.join(IN_FIELD),
                    "must be one of: query, header, path, cookie",
                ),
                Some(ParameterLocation::Path) if !is_present(parameter.get(REQUIRED_FIELD)) => {
                    violations.push(&path.join(REQUIRED_FIELD), "path parameters must be required")
                }
                Some(_) => {}
            }
        }

        if !is_present(parameter.get(SCHEMA_FIELD)) {
            violations.push(&path.join(SCHEMA_FIELD), required_message(SCHEMA_FIELD));
        }
    }

    fn check_request_body(request_body: &Value, path: &JsonPath, violations: &mut Violations) {
        if is_reference(request_body) {
            return;
        }

        let content_path = path.join(CONTENT_FIELD);
        match request_body.get(CONTENT_FIELD) {
            content if !is_present(content) => {
                violations.push(&content_path, required_message(CONTENT_FIELD))
            }
            Some(Value::Object(content)) if content.is_empty() => {
                violations.push(&content_path, "must have at least one media type")
            }
            Some(Value::Object(_)) | None => {}
            Some(other) => violations.push(
                &content_path,
                format!("content must be an object, found {}", serde_get_type(other)),
            ),
        }
    }
}

impl Check for PathsCheck {
    fn check(&self, document: &Map<String, Value>, violations: &mut Violations) {
        let Some(paths) = document.get(PATHS_FIELD).filter(|p| is_present(Some(*p))) else {
            return;
        };
        let root = JsonPath::root(PATHS_FIELD);
        let Some(paths) = paths.as_object() else {
            violations.push(&root, "paths must be an object");
            return;
        };

        for (path, item) in paths {
            let item_path = root.join(path);
            if !path.starts_with(PATH_SEPARATOR) {
                violations.push(&item_path, "path must start with \"/\"");
            }

            let Some(item) = item.as_object() else {
                continue;
            };
            for (key, operation) in item {
                if HttpMethod::from_str(key).is_ok() {
                    Self::check_operation(operation, &item_path.join(key), violations);
                }
            }
        }
    }
}
