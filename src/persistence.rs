//! Text, file and snapshot plumbing around a [`DocumentModel`].

use crate::document::DocumentModel;
use crate::error::EditorError;
use crate::store::SnapshotStore;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Parses `text` and imports it. The model is untouched on any failure.
pub fn import_json_text(model: &mut DocumentModel, text: &str) -> Result<(), EditorError> {
    let document: Value = serde_json::from_str(text)?;
    model.import(document)
}

pub fn import_from_file<P>(model: &mut DocumentModel, path: P) -> Result<(), EditorError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return Err(EditorError::storage(&format!(
                "failed to read {}: {}",
                path.display(),
                e
            )));
        }
    };
    import_json_text(model, &content)
}

/// The exported document as JSON with two-space indentation.
pub fn export_json_text(model: &DocumentModel) -> Result<String, EditorError> {
    Ok(serde_json::to_string_pretty(&model.export())?)
}

/// Writes the exported document into `directory` under the configured export
/// file name and returns the written path.
pub fn export_to_dir<P>(model: &DocumentModel, directory: P) -> Result<PathBuf, EditorError>
where
    P: AsRef<Path>,
{
    let path = directory.as_ref().join(&model.config().export_file_name);
    let text = export_json_text(model)?;
    std::fs::write(&path, text)?;
    log::debug!("Exported document to {}", path.display());
    Ok(path)
}

/// A document model paired with the store its snapshots live in.
pub struct EditorSession<S> {
    model: DocumentModel,
    store: S,
}

impl<S> EditorSession<S>
where
    S: SnapshotStore,
{
    pub fn new(model: DocumentModel, store: S) -> Self {
        Self { model, store }
    }

    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut DocumentModel {
        &mut self.model
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the stored snapshot into the model. A missing, unparseable or
    /// rejected snapshot leaves an empty document instead; only a failing store
    /// is an error. Returns whether a snapshot was adopted.
    pub fn restore(&mut self) -> Result<bool, EditorError> {
        let key = self.model.config().storage_key.clone();
        let Some(snapshot) = self.store.load(&key)? else {
            log::debug!("No snapshot under '{}', starting empty", key);
            self.model.initialize_empty();
            return Ok(false);
        };

        match import_json_text(&mut self.model, &snapshot) {
            Ok(()) => {
                log::debug!("Restored snapshot '{}'", key);
                Ok(true)
            }
            Err(e) => {
                log::warn!("Discarding snapshot '{}': {}", key, e);
                self.model.initialize_empty();
                Ok(false)
            }
        }
    }

    /// Stores one export of the model under the configured key.
    pub fn save(&self) -> Result<(), EditorError> {
        let snapshot = serde_json::to_string(&self.model.export())?;
        self.store.save(&self.model.config().storage_key, &snapshot)
    }

    pub fn clear(&self) -> Result<(), EditorError> {
        self.store.remove(&self.model.config().storage_key)
    }

    pub fn into_parts(self) -> (DocumentModel, S) {
        (self.model, self.store)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::store::{FileStore, MemoryStore};
    use crate::types::HttpMethod;
    use crate::types::endpoint::EndpointData;
    use serde_json::json;

    #[test]
    fn test_import_json_text_failures_leave_model_untouched() {
        let mut model = DocumentModel::new();
        let id = model.add_endpoint(EndpointData::new(HttpMethod::Get, "/keep"));
        assert_eq!(
            import_json_text(&mut model, "{ not json"),
            Err(EditorError::Parse(String::new()))
        );
        assert_eq!(
            import_json_text(&mut model, r#"{ "openapi": "3.1.0" }"#),
            Err(EditorError::format(""))
        );
        assert!(model.get_endpoint(id).is_some());
    }

    #[test]
    fn test_export_json_text_is_pretty() {
        let model = DocumentModel::new();
        let text = export_json_text(&model).unwrap();
        assert!(text.starts_with("{\n  \"openapi\": \"3.1.1\",\n  \"info\": {"));
    }

    #[test]
    fn test_export_to_dir_and_import_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut model = DocumentModel::new();
        model.add_endpoint(EndpointData::new(HttpMethod::Post, "/orders"));
        let path = export_to_dir(&model, dir.path()).unwrap();
        assert_eq!(path, dir.path().join("openapi.json"));

        let mut restored = DocumentModel::new();
        import_from_file(&mut restored, &path).unwrap();
        assert_eq!(restored.export(), model.export());
        assert!(import_from_file(&mut restored, dir.path().join("missing.json")).is_err());
    }

    #[test]
    fn test_session_save_and_restore() {
        let mut session = EditorSession::new(DocumentModel::new(), MemoryStore::new());
        session.model_mut().add_tag("orders", "Orders").unwrap();
        session.save().unwrap();
        assert!(session.store().contains("openapi_editor_schema"));

        let (_, store) = session.into_parts();
        let mut session = EditorSession::new(DocumentModel::new(), store);
        assert!(session.restore().unwrap());
        assert_eq!(session.model().get_all_tags().len(), 1);

        session.clear().unwrap();
        assert!(!session.restore().unwrap());
        assert!(session.model().get_all_tags().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_empty() {
        let store = MemoryStore::new();
        store.save("openapi_editor_schema", "{ truncated").unwrap();
        let mut session = EditorSession::new(DocumentModel::new(), store);
        session
            .model_mut()
            .add_endpoint(EndpointData::new(HttpMethod::Get, "/stale"));
        assert!(!session.restore().unwrap());
        assert!(session.model().get_all_endpoints().is_empty());
        assert_eq!(session.model().export()["info"]["title"], json!("My API"));
    }

    #[test]
    fn test_session_with_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let session = EditorSession::new(DocumentModel::new(), FileStore::new(dir.path()));
        session.save().unwrap();
        assert!(dir.path().join("openapi_editor_schema.json").exists());
    }
}
