pub mod canonical;
pub mod document;
pub mod error;
pub mod persistence;
pub mod store;
pub mod types;
pub mod validator;

pub use crate::document::builder::{ConfigError, DocumentModelBuilder, EditorConfig};
pub use crate::document::references::{EndpointGroup, EndpointsByTag, TagGroup};
pub use crate::document::{ApiInfo, ApiInfoField, DocumentModel};
pub use crate::error::EditorError;
pub use crate::persistence::EditorSession;
pub use crate::store::{FileStore, MemoryStore, SnapshotStore};
pub use crate::types::endpoint::{
    Endpoint, EndpointData, EndpointId, EndpointRecord, SecurityRequirement,
};
pub use crate::types::schema::Schema;
pub use crate::types::security::SecurityScheme;
pub use crate::types::tag::Tag;
pub use crate::types::{ComponentKind, HttpMethod};
pub use crate::validator::{ValidationReport, Violation, validate};

const OPENAPI_FIELD: &'static str = "openapi";
const INFO_FIELD: &'static str = "info";
const TITLE_FIELD: &'static str = "title";
const VERSION_FIELD: &'static str = "version";
const SERVERS_FIELD: &'static str = "servers";
const URL_FIELD: &'static str = "url";
const PATHS_FIELD: &'static str = "paths";
const COMPONENTS_FIELD: &'static str = "components";
const SECURITY_FIELD: &'static str = "security";
const TAGS_FIELD: &'static str = "tags";
const NAME_FIELD: &'static str = "name";
const TYPE_FIELD: &'static str = "type";
const SUMMARY_FIELD: &'static str = "summary";
const DESCRIPTION_FIELD: &'static str = "description";
const PARAMETERS_FIELD: &'static str = "parameters";
const RESPONSES_FIELD: &'static str = "responses";
const REQUEST_BODY_FIELD: &'static str = "requestBody";
const CONTENT_FIELD: &'static str = "content";
const SCHEMA_FIELD: &'static str = "schema";
const REQUIRED_FIELD: &'static str = "required";
const IN_FIELD: &'static str = "in";
const REF_FIELD: &'static str = "$ref";
const PATH_SEPARATOR: &'static str = "/";
const TILDE: &'static str = "~";
const ENCODED_BACKSLASH: &'static str = "~1";
const ENCODED_TILDE: &'static str = "~0";
