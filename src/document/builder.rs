use crate::document::DocumentModel;
use crate::types::version::OpenApiVersion;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug)]
pub enum ConfigError {
    InvalidOption(String),
    InvalidVersion(String),
}

impl ConfigError {
    pub fn invalid_option(msg: impl Into<String>) -> Self {
        Self::InvalidOption(msg.into())
    }

    pub fn invalid_version(msg: impl Into<String>) -> Self {
        Self::InvalidVersion(msg.into())
    }
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidOption(msg) => {
                write!(f, "Invalid Option: {}", msg)
            }
            ConfigError::InvalidVersion(msg) => {
                write!(f, "Invalid Version: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values used to populate an empty document and to name persisted output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    pub title: String,
    pub api_version: String,
    pub openapi_version: String,
    pub server_url: String,
    pub server_description: String,
    pub storage_key: String,
    pub export_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            title: String::from("My API"),
            api_version: String::from("1.0.0"),
            openapi_version: String::from("3.1.1"),
            server_url: String::from("https://api.example.com"),
            server_description: String::from("Production server"),
            storage_key: String::from("openapi_editor_schema"),
            export_file_name: String::from("openapi.json"),
        }
    }
}

pub struct DocumentModelBuilder {
    config: EditorConfig,
}

impl DocumentModelBuilder {
    pub fn new() -> Self {
        Self {
            config: EditorConfig::default(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = title.into();
        self
    }

    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.config.api_version = version.into();
        self
    }

    pub fn openapi_version(mut self, version: impl Into<String>) -> Self {
        self.config.openapi_version = version.into();
        self
    }

    pub fn server(mut self, url: impl Into<String>, description: impl Into<String>) -> Self {
        self.config.server_url = url.into();
        self.config.server_description = description.into();
        self
    }

    pub fn storage_key(mut self, key: impl Into<String>) -> Self {
        self.config.storage_key = key.into();
        self
    }

    pub fn export_file_name(mut self, name: impl Into<String>) -> Self {
        self.config.export_file_name = name.into();
        self
    }

    fn check_version(version: &str) -> Result<(), ConfigError> {
        let parsed = match OpenApiVersion::from_str(version) {
            Ok(parsed) => parsed,
            Err(e) => return Err(ConfigError::invalid_version(e.to_string())),
        };
        if !parsed.is_editable() {
            return Err(ConfigError::invalid_version(format!(
                "'{}' is not an OpenAPI 3.1.x version",
                version
            )));
        }
        Ok(())
    }

    pub fn config(self) -> Result<EditorConfig, ConfigError> {
        Self::check_version(&self.config.openapi_version)?;
        if self.config.storage_key.is_empty() {
            return Err(ConfigError::invalid_option("Storage key must not be empty."));
        }
        if self.config.export_file_name.is_empty()
            || self.config.export_file_name.contains(['/', '\\'])
        {
            return Err(ConfigError::invalid_option(format!(
                "'{}' is not a plain file name.",
                self.config.export_file_name
            )));
        }
        Ok(self.config)
    }

    pub fn build(self) -> Result<DocumentModel, ConfigError> {
        let config = self.config()?;
        log::debug!(
            "Building document model for '{}' (OpenAPI {})",
            config.title,
            config.openapi_version
        );
        Ok(DocumentModel::with_config(config))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DocumentModelBuilder::new().config().unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.title, "My API");
        assert_eq!(config.storage_key, "openapi_editor_schema");
        assert_eq!(config.export_file_name, "openapi.json");
    }

    #[test]
    fn test_rejects_non_31_version() {
        let result = DocumentModelBuilder::new().openapi_version("3.0.3").build();
        assert!(matches!(result, Err(ConfigError::InvalidVersion(_))));
        let result = DocumentModelBuilder::new().openapi_version("2.0").build();
        assert!(matches!(result, Err(ConfigError::InvalidVersion(_))));
    }

    #[test]
    fn test_rejects_path_as_file_name() {
        let result = DocumentModelBuilder::new()
            .export_file_name("out/openapi.json")
            .config();
        assert!(matches!(result, Err(ConfigError::InvalidOption(_))));
    }

    #[test]
    fn test_build_uses_custom_values() {
        let model = DocumentModelBuilder::new()
            .title("Billing")
            .api_version("0.3.0")
            .server("https://billing.internal", "Staging")
            .build()
            .unwrap();
        let exported = model.export();
        assert_eq!(exported["info"]["title"], "Billing");
        assert_eq!(exported["info"]["version"], "0.3.0");
        assert_eq!(exported["servers"][0]["url"], "https://billing.internal");
        assert_eq!(exported["servers"][0]["description"], "Staging");
    }
}
