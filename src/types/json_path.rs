use crate::{ENCODED_BACKSLASH, ENCODED_TILDE, PATH_SEPARATOR, TILDE};
use serde::Serialize;

/// Location inside a document, built segment by segment and rendered as an
/// RFC 6901 JSON pointer.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct JsonPath(pub Vec<String>);

impl JsonPath {
    pub fn new() -> Self {
        JsonPath(Vec::new())
    }

    pub fn root(segment: impl AsRef<str>) -> Self {
        let mut path = JsonPath::new();
        path.add(segment);
        path
    }

    pub fn add(&mut self, segment: impl AsRef<str>) -> &mut Self {
        let segment = segment.as_ref();
        if segment.contains(TILDE) || segment.contains(PATH_SEPARATOR) {
            let segment = segment
                .replace(TILDE, ENCODED_TILDE)
                .replace(PATH_SEPARATOR, ENCODED_BACKSLASH);
            self.0.push(segment);
        } else {
            self.0.push(segment.to_owned());
        }

        self
    }

    /// Returns a copy of this path extended by one segment.
    pub fn join(&self, segment: impl AsRef<str>) -> Self {
        let mut path = self.clone();
        path.add(segment);
        path
    }

    /// Renders the path as a JSON pointer; the empty path is the whole document.
    pub fn format_path(&self) -> String {
        if self.0.is_empty() {
            return String::new();
        }
        format!("{}{}", PATH_SEPARATOR, self.0.join(PATH_SEPARATOR))
    }
}
