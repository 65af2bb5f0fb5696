use crate::types::is_present;
use crate::types::json_path::JsonPath;
use crate::types::version::OpenApiVersion;
use crate::validator::{Check, Violations};
use crate::{INFO_FIELD, OPENAPI_FIELD, TITLE_FIELD, VERSION_FIELD};
use serde_json::{Map, Value};
use std::str::FromStr;

/// `openapi` must be present and name a 3.1.x version.
pub(crate) struct VersionCheck;

impl Check for VersionCheck {
    fn check(&self, document: &Map<String, Value>, violations: &mut Violations) {
        let path = JsonPath::root(OPENAPI_FIELD);
        let version = document.get(OPENAPI_FIELD);
        if !is_present(version) {
            violations.push(&path, format!("must have required property \"{}\"", OPENAPI_FIELD));
            return;
        }

        let editable = version
            .and_then(Value::as_str)
            .and_then(|version| OpenApiVersion::from_str(version).ok())
            .is_some_and(|version| version.is_editable());
        if !editable {
            violations.push(&path, "must be OpenAPI version 3.1.x");
        }
    }
}

/// `info` must be present with a title and a version.
pub(crate) struct InfoCheck;

impl Check for InfoCheck {
    fn check(&self, document: &Map<String, Value>, violations: &mut Violations) {
        let path = JsonPath::root(INFO_FIELD);
        let Some(info) = document.get(INFO_FIELD).filter(|info| is_present(Some(*info))) else {
            violations.push(&path, format!("must have required property \"{}\"", INFO_FIELD));
            return;
        };

        for field in [TITLE_FIELD, VERSION_FIELD] {
            if !is_present(info.get(field)) {
                violations.push(
                    &path.join(field),
                    format!("must have required property \"{}\"", field),
                );
            }
        }
    }
}
