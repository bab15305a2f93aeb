//! # Persistence
//!
//! Saving hands the document to a [`DocumentStore`]; loading reads back the
//! last saved markup. [`FileStore`] keeps one JSON record per identifier in
//! a directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::EditorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub identifier: String,
    pub url_slug: String,
    pub document_markup: String,
    pub publish: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord {
    pub identifier: String,
    pub url_slug: String,
    pub document_markup: String,
    pub publish: bool,
    /// Starts at 1 and increases with every save
    pub revision: u64,
}

pub trait DocumentStore {
    fn save(&self, request: SaveRequest) -> Result<StoredRecord, EditorError>;

    /// `None` if nothing was ever saved under `identifier`
    fn load(&self, identifier: &str) -> Result<Option<StoredRecord>, EditorError>;
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, identifier: &str) -> Result<PathBuf, EditorError> {
        validate_identifier(identifier)?;
        Ok(self.root.join(format!("{}.json", identifier)))
    }
}

impl DocumentStore for FileStore {
    fn save(&self, request: SaveRequest) -> Result<StoredRecord, EditorError> {
        let path = self.record_path(&request.identifier)?;
        let revision = self.load(&request.identifier)?.map_or(0, |r| r.revision) + 1;

        let record = StoredRecord {
            identifier: request.identifier,
            url_slug: request.url_slug,
            document_markup: request.document_markup,
            publish: request.publish,
            revision,
        };

        fs::create_dir_all(&self.root)?;
        fs::write(&path, serde_json::to_string_pretty(&record)?)?;
        info!(identifier = %record.identifier, revision, path = %path.display(), "saved document");
        Ok(record)
    }

    fn load(&self, identifier: &str) -> Result<Option<StoredRecord>, EditorError> {
        let path = self.record_path(identifier)?;
        if !path.exists() {
            debug!(identifier, "no stored record");
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }
}

/// Identifiers become file names, so only `[A-Za-z0-9_-]` is allowed
fn validate_identifier(identifier: &str) -> Result<(), EditorError> {
    let valid = !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(EditorError::InvalidIdentifier(identifier.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(markup: &str) -> SaveRequest {
        SaveRequest {
            identifier: "landing".to_string(),
            url_slug: "/landing".to_string(),
            document_markup: markup.to_string(),
            publish: false,
        }
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("store"));

        let first = store.save(request("<p>1</p>")).unwrap();
        let second = store.save(request("<p>2</p>")).unwrap();
        assert_eq!(first.revision, 1);
        assert_eq!(second.revision, 2);

        let loaded = store.load("landing").unwrap().unwrap();
        assert_eq!(loaded.document_markup, "<p>2</p>");
        assert!(store.load("missing").unwrap().is_none());
    }

    #[test]
    fn test_rejects_path_like_identifiers() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        for bad in ["", "../etc", "a/b", "a.json"] {
            assert!(matches!(
                store.load(bad),
                Err(EditorError::InvalidIdentifier(_))
            ));
        }
    }
}
