use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Discriminant of a security scheme's `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecuritySchemeKind {
    ApiKey,
    Http,
    OAuth2,
    OpenIdConnect,
}

impl FromStr for SecuritySchemeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apiKey" => Ok(SecuritySchemeKind::ApiKey),
            "http" => Ok(SecuritySchemeKind::Http),
            "oauth2" => Ok(SecuritySchemeKind::OAuth2),
            "openIdConnect" => Ok(SecuritySchemeKind::OpenIdConnect),
            _ => Err(()),
        }
    }
}

impl Display for SecuritySchemeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SecuritySchemeKind::ApiKey => write!(f, "apiKey"),
            SecuritySchemeKind::Http => write!(f, "http"),
            SecuritySchemeKind::OAuth2 => write!(f, "oauth2"),
            SecuritySchemeKind::OpenIdConnect => write!(f, "openIdConnect"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

impl FromStr for ApiKeyLocation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(ApiKeyLocation::Query),
            "header" => Ok(ApiKeyLocation::Header),
            "cookie" => Ok(ApiKeyLocation::Cookie),
            _ => Err(()),
        }
    }
}

/// The four OAuth2 grant flows a scheme may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthFlowKind {
    Implicit,
    Password,
    ClientCredentials,
    AuthorizationCode,
}

impl OAuthFlowKind {
    pub const ALL: [OAuthFlowKind; 4] = [
        OAuthFlowKind::Implicit,
        OAuthFlowKind::Password,
        OAuthFlowKind::ClientCredentials,
        OAuthFlowKind::AuthorizationCode,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OAuthFlowKind::Implicit => "implicit",
            OAuthFlowKind::Password => "password",
            OAuthFlowKind::ClientCredentials => "clientCredentials",
            OAuthFlowKind::AuthorizationCode => "authorizationCode",
        }
    }

    pub fn requires_authorization_url(&self) -> bool {
        matches!(
            self,
            OAuthFlowKind::Implicit | OAuthFlowKind::AuthorizationCode
        )
    }

    pub fn requires_token_url(&self) -> bool {
        !matches!(self, OAuthFlowKind::Implicit)
    }
}

impl Display for OAuthFlowKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_url: Option<String>,
    /// Scope name to human-readable description.
    #[serde(default)]
    pub scopes: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthFlows {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicit: Option<OAuthFlow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<OAuthFlow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_credentials: Option<OAuthFlow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<OAuthFlow>,
}

impl OAuthFlows {
    pub fn get(&self, kind: OAuthFlowKind) -> Option<&OAuthFlow> {
        match kind {
            OAuthFlowKind::Implicit => self.implicit.as_ref(),
            OAuthFlowKind::Password => self.password.as_ref(),
            OAuthFlowKind::ClientCredentials => self.client_credentials.as_ref(),
            OAuthFlowKind::AuthorizationCode => self.authorization_code.as_ref(),
        }
    }

    pub fn with_flow(mut self, kind: OAuthFlowKind, flow: OAuthFlow) -> Self {
        let slot = match kind {
            OAuthFlowKind::Implicit => &mut self.implicit,
            OAuthFlowKind::Password => &mut self.password,
            OAuthFlowKind::ClientCredentials => &mut self.client_credentials,
            OAuthFlowKind::AuthorizationCode => &mut self.authorization_code,
        };
        *slot = Some(flow);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (OAuthFlowKind, &OAuthFlow)> {
        OAuthFlowKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|flow| (kind, flow)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Typed view of an entry in `components.securitySchemes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SecurityScheme {
    #[serde(rename = "apiKey")]
    ApiKey {
        name: String,
        #[serde(rename = "in")]
        location: ApiKeyLocation,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "http")]
    Http {
        scheme: String,
        #[serde(
            rename = "bearerFormat",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        bearer_format: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "oauth2")]
    OAuth2 {
        flows: OAuthFlows,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    #[serde(rename = "openIdConnect")]
    OpenIdConnect {
        #[serde(rename = "openIdConnectUrl")]
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl SecurityScheme {
    pub fn api_key(name: impl Into<String>, location: ApiKeyLocation) -> Self {
        SecurityScheme::ApiKey {
            name: name.into(),
            location,
            description: None,
        }
    }

    /// HTTP scheme; a bearer format is only kept for the `bearer` scheme.
    pub fn http(scheme: impl Into<String>, bearer_format: Option<String>) -> Self {
        let scheme = scheme.into();
        let bearer_format = bearer_format
            .filter(|format| scheme.eq_ignore_ascii_case("bearer") && !format.is_empty());
        SecurityScheme::Http {
            scheme,
            bearer_format,
            description: None,
        }
    }

    pub fn oauth2(flows: OAuthFlows) -> Self {
        SecurityScheme::OAuth2 {
            flows,
            description: None,
        }
    }

    pub fn open_id_connect(url: impl Into<String>) -> Self {
        SecurityScheme::OpenIdConnect {
            url: url.into(),
            description: None,
        }
    }

    pub fn kind(&self) -> SecuritySchemeKind {
        match self {
            SecurityScheme::ApiKey { .. } => SecuritySchemeKind::ApiKey,
            SecurityScheme::Http { .. } => SecuritySchemeKind::Http,
            SecurityScheme::OAuth2 { .. } => SecuritySchemeKind::OAuth2,
            SecurityScheme::OpenIdConnect { .. } => SecuritySchemeKind::OpenIdConnect,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            SecurityScheme::ApiKey { description, .. }
            | SecurityScheme::Http { description, .. }
            | SecurityScheme::OAuth2 { description, .. }
            | SecurityScheme::OpenIdConnect { description, .. } => description.as_deref(),
        }
    }

    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into()).filter(|t| !t.is_empty());
        match &mut self {
            SecurityScheme::ApiKey { description, .. }
            | SecurityScheme::Http { description, .. }
            | SecurityScheme::OAuth2 { description, .. }
            | SecurityScheme::OpenIdConnect { description, .. } => *description = text,
        }
        self
    }

    /// Parses a stored scheme. Fails for unknown types or missing type-specific fields.
    pub fn from_value(value: &Value) -> Result<Self, EditorError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}
