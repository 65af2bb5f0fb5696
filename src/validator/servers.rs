use crate::types::is_present;
use crate::types::json_path::JsonPath;
use crate::validator::{Check, Violations};
use crate::{PATH_SEPARATOR, SERVERS_FIELD, URL_FIELD};
use serde_json::{Map, Value};
use url::Url;

/// Absolute URLs, root-relative paths and templated URLs are accepted.
fn is_acceptable_url(url: &str) -> bool {
    Url::parse(url).is_ok() || url.starts_with(PATH_SEPARATOR) || url.contains('{')
}

/// Every server entry needs a usable `url`.
pub(crate) struct ServersCheck;

impl Check for ServersCheck {
    fn check(&self, document: &Map<String, Value>, violations: &mut Violations) {
        let Some(servers) = document.get(SERVERS_FIELD).filter(|s| is_present(Some(*s))) else {
            return;
        };
        let root = JsonPath::root(SERVERS_FIELD);
        let Some(servers) = servers.as_array() else {
            violations.push(&root, "servers must be an array");
            return;
        };

        for (index, server) in servers.iter().enumerate() {
            let url_path = root.join(index.to_string()).join(URL_FIELD);
            let url = server.get(URL_FIELD);
            if !is_present(url) {
                violations.push(
                    &url_path,
                    format!("must have required property \"{}\"", URL_FIELD),
                );
                continue;
            }
            if !url.and_then(Value::as_str).is_some_and(is_acceptable_url) {
                violations.push(&url_path, "must be a valid URL or relative path");
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::is_acceptable_url;
    use crate::validator::validate;
    use serde_json::{Value, json};

    fn with_servers(servers: Value) -> Value {
        json!({
            "openapi": "3.1.0",
            "info": { "title": "t", "version": "1" },
            "paths": {},
            "servers": servers
        })
    }

    #[test]
    fn test_accepted_url_forms() {
        assert!(is_acceptable_url("https://api.example.com/v1"));
        assert!(is_acceptable_url("/v1"));
        assert!(is_acceptable_url("{scheme}://{host}/v1"));
        assert!(is_acceptable_url("https://{region}.example.com"));
        assert!(!is_acceptable_url("api.example.com"));
        assert!(!is_acceptable_url("v1/users"));
    }

    #[test]
    fn test_server_violations() {
        let report = validate(&with_servers(json!([
            { "url": "https://api.example.com" },
            { "description": "no url" },
            { "url": "not a url" },
            { "url": 8080 }
        ])))
        .unwrap();
        let found: Vec<(&str, &str)> = report
            .violations
            .iter()
            .map(|v| (v.pointer.as_str(), v.message.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("/servers/1/url", "must have required property \"url\""),
                ("/servers/2/url", "must be a valid URL or relative path"),
                ("/servers/3/url", "must be a valid URL or relative path"),
            ]
        );
    }

    #[test]
    fn test_servers_must_be_a_list() {
        let report = validate(&with_servers(json!({ "url": "/v1" }))).unwrap();
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].pointer, "/servers");
    }
}
