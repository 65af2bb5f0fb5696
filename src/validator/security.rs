use crate::types::is_present;
use crate::types::json_path::JsonPath;
use crate::types::security::{ApiKeyLocation, OAuthFlowKind, SecuritySchemeKind};
use crate::validator::{Check, Violations};
use crate::{COMPONENTS_FIELD, IN_FIELD, NAME_FIELD, SECURITY_FIELD, TYPE_FIELD};
use serde_json::{Map, Value};
use std::str::FromStr;

const SECURITY_SCHEMES_FIELD: &'static str = "securitySchemes";
const SCHEME_FIELD: &'static str = "scheme";
const FLOWS_FIELD: &'static str = "flows";
const OPEN_ID_CONNECT_URL_FIELD: &'static str = "openIdConnectUrl";
const AUTHORIZATION_URL_FIELD: &'static str = "authorizationUrl";
const TOKEN_URL_FIELD: &'static str = "tokenUrl";
const SCOPES_FIELD: &'static str = "scopes";

fn declared_schemes(document: &Map<String, Value>) -> Option<&Map<String, Value>> {
    document
        .get(COMPONENTS_FIELD)
        .and_then(|components| components.get(SECURITY_SCHEMES_FIELD))
        .and_then(Value::as_object)
}

/// Checks a security requirement list. Scheme names are looked up in
/// `declared` only when it is given.
pub(crate) fn check_requirements(
    requirements: &Value,
    declared: Option<&Map<String, Value>>,
    path: &JsonPath,
    violations: &mut Violations,
) {
    let Some(requirements) = requirements.as_array() else {
        violations.push(path, "security must be an array");
        return;
    };

    for (index, requirement) in requirements.iter().enumerate() {
        let requirement_path = path.join(index.to_string());
        let Some(requirement) = requirement.as_object() else {
            violations.push(&requirement_path, "security requirement must be an object");
            continue;
        };

        for (scheme, scopes) in requirement {
            let scheme_path = requirement_path.join(scheme);
            if let Some(declared) = declared {
                if !is_present(declared.get(scheme)) {
                    violations.push(
                        &scheme_path,
                        format!(
                            "security scheme \"{}\" is not defined in components/securitySchemes",
                            scheme
                        ),
                    );
                }
            }

            match scopes.as_array() {
                Some(scopes) => {
                    for (position, scope) in scopes.iter().enumerate() {
                        if !scope.is_string() {
                            violations.push(
                                &scheme_path.join(position.to_string()),
                                "security requirement scopes must be strings",
                            );
                        }
                    }
                }
                None => {
                    violations.push(&scheme_path, "security requirement scopes must be an array")
                }
            }
        }
    }
}

/// Type-specific required fields of every declared security scheme.
pub(crate) struct SecuritySchemesCheck;

impl SecuritySchemesCheck {
    fn check_scheme(scheme: &Value, path: &JsonPath, violations: &mut Violations) {
        let scheme_type = scheme.get(TYPE_FIELD);
        if !is_present(scheme_type) {
            violations.push(
                &path.join(TYPE_FIELD),
                format!("must have required property \"{}\"", TYPE_FIELD),
            );
            return;
        }

        let kind = scheme_type
            .and_then(Value::as_str)
            .and_then(|kind| SecuritySchemeKind::from_str(kind).ok());
        let Some(kind) = kind else {
            let shown = match scheme_type {
                Some(Value::String(text)) => text.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            violations.push(
                &path.join(TYPE_FIELD),
                format!("unsupported security scheme type: {}", shown),
            );
            return;
        };

        let missing = |field: &str| {
            format!(
                "must have required property \"{}\" for {} security scheme",
                field, kind
            )
        };

        match kind {
            SecuritySchemeKind::ApiKey => {
                if !is_present(scheme.get(NAME_FIELD)) {
                    violations.push(&path.join(NAME_FIELD), missing(NAME_FIELD));
                }
                let location = scheme
                    .get(IN_FIELD)
                    .and_then(Value::as_str)
                    .and_then(|location| ApiKeyLocation::from_str(location).ok());
                if location.is_none() {
                    violations.push(
                        &path.join(IN_FIELD),
                        format!(
                            "must have valid \"{}\" property (query, header, or cookie) for {} security scheme",
                            IN_FIELD, kind
                        ),
                    );
                }
            }
            SecuritySchemeKind::Http => {
                if !is_present(scheme.get(SCHEME_FIELD)) {
                    violations.push(&path.join(SCHEME_FIELD), missing(SCHEME_FIELD));
                }
            }
            SecuritySchemeKind::OAuth2 => match scheme.get(FLOWS_FIELD) {
                Some(flows) if is_present(Some(flows)) => {
                    Self::check_flows(flows, &path.join(FLOWS_FIELD), violations)
                }
                _ => violations.push(&path.join(FLOWS_FIELD), missing(FLOWS_FIELD)),
            },
            SecuritySchemeKind::OpenIdConnect => {
                if !is_present(scheme.get(OPEN_ID_CONNECT_URL_FIELD)) {
                    violations.push(
                        &path.join(OPEN_ID_CONNECT_URL_FIELD),
                        missing(OPEN_ID_CONNECT_URL_FIELD),
                    );
                }
            }
        }
    }

    fn check_flows(flows: &Value, path: &JsonPath, violations: &mut Violations) {
        let declared: Vec<(OAuthFlowKind, &Value)> = OAuthFlowKind::ALL
            .into_iter()
            .filter_map(|kind| {
                flows
                    .get(kind.as_str())
                    .filter(|flow| is_present(Some(*flow)))
                    .map(|flow| (kind, flow))
            })
            .collect();

        if declared.is_empty() {
            violations.push(path, "must have at least one OAuth2 flow defined");
            return;
        }

        for (kind, flow) in declared {
            let flow_path = path.join(kind.as_str());
            let mut require = |field: &str| {
                if !is_present(flow.get(field)) {
                    violations.push(
                        &flow_path.join(field),
                        format!("must have required property \"{}\" for {} flow", field, kind),
                    );
                }
            };
            if kind.requires_authorization_url() {
                require(AUTHORIZATION_URL_FIELD);
            }
            if kind.requires_token_url() {
                require(TOKEN_URL_FIELD);
            }

            let scopes = flow.get(SCOPES_FIELD);
            if is_present(scopes) && !scopes.is_some_and(Value::is_object) {
                violations.push(&flow_path.join(SCOPES_FIELD), "scopes must be an object");
            }
        }
    }
}

impl Check for SecuritySchemesCheck {
    fn check(&self, document: &Map<String, Value>, violations: &mut Violations) {
        let Some(schemes) = declared_schemes(document) else {
            return;
        };
        let root = JsonPath::root(COMPONENTS_FIELD).join(SECURITY_SCHEMES_FIELD);
        for (name, scheme) in schemes {
            Self::check_scheme(scheme, &root.join(name), violations);
        }
    }
}

/// Document-level requirements, with scheme names resolved against
/// `components.securitySchemes` when that mapping exists.
pub(crate) struct GlobalSecurityCheck;

impl Check for GlobalSecurityCheck {
    fn check(&self, document: &Map<String, Value>, violations: &mut Violations) {
        let Some(security) = document.get(SECURITY_FIELD).filter(|s| is_present(Some(*s))) else {
            return;
        };
        check_requirements(
            security,
            declared_schemes(document),
            &JsonPath::root(SECURITY_FIELD),
            violations,
        );
    }
}
