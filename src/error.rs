use std::fmt::{Display, Formatter};

/// Errors raised by the document model and its collaborators.
///
/// Validation findings are never reported through this type; they are returned as
/// data inside a [`crate::validator::ValidationReport`].
#[derive(Debug)]
pub enum EditorError {
    /// An imported document is missing one of the required top-level fields.
    Format(String),

    /// An endpoint or tag referenced by id/name does not exist.
    NotFound(String),

    /// A tag with the same name already exists.
    Duplicate(String),

    /// A tag name contains characters outside `[A-Za-z0-9_-]`.
    InvalidName(String),

    /// A typed schema was given a constraint that does not match its type.
    InvalidSchema(String),

    /// A value could not be converted into its document form.
    Serialization(String),

    /// Text handed to the model is not valid JSON.
    Parse(String),

    /// A snapshot store or export target failed.
    Storage(String),

    /// The validator was handed something that is not a mapping.
    Unparseable(String),
}

impl EditorError {
    pub(crate) fn format<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        EditorError::Format(message.to_string())
    }

    pub(crate) fn not_found<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        EditorError::NotFound(message.to_string())
    }

    pub(crate) fn duplicate<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        EditorError::Duplicate(message.to_string())
    }

    pub(crate) fn invalid_name<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        EditorError::InvalidName(message.to_string())
    }

    pub(crate) fn invalid_schema<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        EditorError::InvalidSchema(message.to_string())
    }

    pub(crate) fn storage<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        EditorError::Storage(message.to_string())
    }

    pub(crate) fn unparseable<T>(message: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        EditorError::Unparseable(message.to_string())
    }
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::Format(msg) => {
                write!(f, "Invalid OpenAPI specification format: {}", msg)
            }
            EditorError::NotFound(msg) => write!(f, "Not found: {}", msg),
            EditorError::Duplicate(msg) => write!(f, "Already exists: {}", msg),
            EditorError::InvalidName(msg) => write!(f, "Invalid name: {}", msg),
            EditorError::InvalidSchema(msg) => write!(f, "Invalid schema: {}", msg),
            EditorError::Serialization(msg) => write!(f, "Serialization failed: {}", msg),
            EditorError::Parse(msg) => write!(f, "Unable to parse JSON: {}", msg),
            EditorError::Storage(msg) => write!(f, "Storage failed: {}", msg),
            EditorError::Unparseable(msg) => write!(f, "Unable to validate: {}", msg),
        }
    }
}

impl PartialEq for EditorError {
    /// Errors compare by kind only; the message is informational.
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl std::error::Error for EditorError {}

impl From<serde_json::Error> for EditorError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_syntax() || error.is_eof() {
            EditorError::Parse(error.to_string())
        } else {
            EditorError::Serialization(error.to_string())
        }
    }
}

impl From<std::io::Error> for EditorError {
    fn from(error: std::io::Error) -> Self {
        EditorError::Storage(error.to_string())
    }
}
