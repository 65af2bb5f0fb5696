use crate::error::EditorError;
use serde::{Deserialize, Serialize};

/// Entry of the document's top-level `tags` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Tag names are restricted to letters, digits, `_` and `-`.
pub(crate) fn check_tag_name(name: &str) -> Result<(), EditorError> {
    if name.is_empty() {
        return Err(EditorError::invalid_name("tag name is required"));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    if !name.chars().all(allowed) {
        return Err(EditorError::invalid_name(&format!(
            "tag '{}' can only contain letters, numbers, underscores, and hyphens",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_accepts_identifier_names() {
        assert!(check_tag_name("users").is_ok());
        assert!(check_tag_name("user-admin_2").is_ok());
    }

    #[test]
    fn test_rejects_other_characters() {
        assert_eq!(
            check_tag_name("user admin"),
            Err(EditorError::invalid_name(""))
        );
        assert!(check_tag_name("").is_err());
        assert!(check_tag_name("café").is_err());
        assert!(check_tag_name("a/b").is_err());
    }

    #[test]
    fn test_missing_description_defaults_to_empty() {
        let tag: Tag = serde_json::from_value(serde_json::json!({ "name": "pets" })).unwrap();
        assert_eq!(tag, Tag::new("pets", ""));
    }
}
