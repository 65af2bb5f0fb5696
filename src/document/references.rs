//! Name-based links from endpoints and requirement lists to tags and security
//! schemes. Nothing stores back-pointers; renames and deletions rewrite every
//! holder in one pass over the endpoint index.

use crate::document::DocumentModel;
use crate::error::EditorError;
use crate::types::endpoint::EndpointRecord;
use crate::types::tag::{Tag, check_tag_name};
use crate::{DESCRIPTION_FIELD, NAME_FIELD, SECURITY_FIELD, TAGS_FIELD};
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

/// Key under which endpoints without tags are grouped.
pub const UNTAGGED_GROUP: &'static str = "__untagged__";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagGroup {
    Named(String),
    Untagged,
}

impl Display for TagGroup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TagGroup::Named(name) => write!(f, "{}", name),
            TagGroup::Untagged => write!(f, "{}", UNTAGGED_GROUP),
        }
    }
}

impl Serialize for TagGroup {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointGroup {
    pub group: TagGroup,
    pub endpoints: Vec<EndpointRecord>,
}

/// Endpoints grouped by tag name.
///
/// Declared tags come first, in declaration order, even when no endpoint uses
/// them. Tags only found on endpoints follow in order of first use. The
/// untagged group is last and only present when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct EndpointsByTag(Vec<EndpointGroup>);

impl EndpointsByTag {
    fn group_mut(&mut self, name: &str) -> &mut Vec<EndpointRecord> {
        let position = self
            .0
            .iter()
            .position(|group| matches!(&group.group, TagGroup::Named(n) if n == name));
        let index = match position {
            Some(index) => index,
            None => {
                self.0.push(EndpointGroup {
                    group: TagGroup::Named(name.to_string()),
                    endpoints: Vec::new(),
                });
                self.0.len() - 1
            }
        };
        &mut self.0[index].endpoints
    }

    pub fn get(&self, name: &str) -> Option<&[EndpointRecord]> {
        self.0
            .iter()
            .find(|group| matches!(&group.group, TagGroup::Named(n) if n == name))
            .map(|group| group.endpoints.as_slice())
    }

    pub fn untagged(&self) -> Option<&[EndpointRecord]> {
        self.0
            .iter()
            .find(|group| group.group == TagGroup::Untagged)
            .map(|group| group.endpoints.as_slice())
    }

    pub fn groups(&self) -> impl Iterator<Item = &EndpointGroup> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn tag_name(entry: &Value) -> Option<&str> {
    entry.get(NAME_FIELD).and_then(Value::as_str)
}

fn rename_scheme_in_requirement(requirement: &mut Value, old: &str, new: &str) -> bool {
    let Some(requirement) = requirement.as_object_mut() else {
        return false;
    };
    match requirement.remove(old) {
        Some(scopes) => {
            requirement.insert(new.to_string(), scopes);
            true
        }
        None => false,
    }
}

impl DocumentModel {
    fn tag_entries(&self) -> &[Value] {
        self.spec
            .get(TAGS_FIELD)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn tag_entries_mut(&mut self) -> &mut Vec<Value> {
        let tags = self
            .spec
            .entry(TAGS_FIELD)
            .or_insert_with(|| Value::Array(Vec::new()));
        if !tags.is_array() {
            log::warn!("Replacing non-array '{}'", TAGS_FIELD);
            *tags = Value::Array(Vec::new());
        }
        match tags {
            Value::Array(entries) => entries,
            _ => unreachable!("tags was just replaced with an array"),
        }
    }

    pub fn add_tag(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), EditorError> {
        let name = name.into();
        let description: String = description.into();
        check_tag_name(&name)?;
        if self.get_tag(&name).is_some() {
            return Err(EditorError::duplicate(&format!("tag '{}'", name)));
        }
        log::debug!("Adding tag '{}'", name);
        self.tag_entries_mut()
            .push(json!({ "name": name, "description": description }));
        Ok(())
    }

    /// Renames and re-describes a tag, rewriting the name on every endpoint.
    /// Fields of the tag entry other than name and description are kept.
    pub fn update_tag(
        &mut self,
        old: &str,
        new: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<(), EditorError> {
        let new = new.into();
        let Some(index) = self
            .tag_entries()
            .iter()
            .position(|entry| tag_name(entry) == Some(old))
        else {
            return Err(EditorError::not_found(&format!("tag '{}'", old)));
        };
        check_tag_name(&new)?;
        if old != new && self.get_tag(&new).is_some() {
            return Err(EditorError::duplicate(&format!("tag '{}'", new)));
        }

        let description = Value::String(description.into());
        if let Some(entry) = self.tag_entries_mut()[index].as_object_mut() {
            entry.insert(NAME_FIELD.to_string(), Value::String(new.clone()));
            entry.insert(DESCRIPTION_FIELD.to_string(), description);
        }

        if old != new {
            let mut renamed = 0;
            for endpoint in self.endpoints.values_mut() {
                if !endpoint.has_tag(old) {
                    continue;
                }
                let already_tagged = endpoint.has_tag(&new);
                endpoint.tags.retain_mut(|tag| {
                    if tag.as_str() == old {
                        *tag = new.clone();
                        return !already_tagged;
                    }
                    true
                });
                renamed += 1;
            }
            log::debug!("Renamed tag '{}' to '{}' on {} endpoint(s)", old, new, renamed);
            self.sync_paths();
        }
        Ok(())
    }

    /// Removes the tag entry and strips the name from every endpoint. Unknown
    /// names are ignored.
    pub fn delete_tag(&mut self, name: &str) {
        if let Some(Value::Array(entries)) = self.spec.get_mut(TAGS_FIELD) {
            entries.retain(|entry| tag_name(entry) != Some(name));
        }
        let mut stripped = 0;
        for endpoint in self.endpoints.values_mut() {
            let before = endpoint.tags.len();
            endpoint.tags.retain(|tag| tag != name);
            if endpoint.tags.len() != before {
                stripped += 1;
            }
        }
        log::debug!("Deleted tag '{}' from {} endpoint(s)", name, stripped);
        self.sync_paths();
    }

    pub fn get_tag(&self, name: &str) -> Option<Tag> {
        self.tag_entries()
            .iter()
            .find(|entry| tag_name(entry) == Some(name))
            .and_then(|entry| serde_json::from_value(entry.clone()).ok())
    }

    /// Declared tags in document order. Entries without a string name are skipped.
    pub fn get_all_tags(&self) -> Vec<Tag> {
        self.tag_entries()
            .iter()
            .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
            .collect()
    }

    pub fn get_endpoints_by_tag(&self) -> EndpointsByTag {
        let mut grouped = EndpointsByTag::default();
        for tag in self.get_all_tags() {
            grouped.group_mut(&tag.name);
        }

        let mut untagged = Vec::new();
        for record in self.get_all_endpoints() {
            if record.endpoint.tags.is_empty() {
                untagged.push(record);
                continue;
            }
            let mut seen = HashSet::new();
            for tag in &record.endpoint.tags {
                if seen.insert(tag.as_str()) {
                    grouped.group_mut(tag).push(record.clone());
                }
            }
        }

        if !untagged.is_empty() {
            grouped.0.push(EndpointGroup {
                group: TagGroup::Untagged,
                endpoints: untagged,
            });
        }
        grouped
    }

    /// Moves the scopes listed under `old` to `new` in every endpoint-level and
    /// global security requirement.
    pub fn update_security_scheme_references(&mut self, old: &str, new: &str) {
        if old == new {
            return;
        }

        let mut renamed = 0;
        for endpoint in self.endpoints.values_mut() {
            for requirement in endpoint.security.iter_mut().flatten() {
                if requirement.rename_scheme(old, new) {
                    renamed += 1;
                }
            }
        }

        if let Some(Value::Array(requirements)) = self.spec.get_mut(SECURITY_FIELD) {
            for requirement in requirements.iter_mut() {
                if rename_scheme_in_requirement(requirement, old, new) {
                    renamed += 1;
                }
            }
        }

        log::debug!(
            "Renamed security scheme '{}' to '{}' in {} requirement(s)",
            old,
            new,
            renamed
        );
        self.sync_paths();
    }
}
