//! Configuration document persisted as a JSON file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::ClaimConfigDocument;
use crate::ports::{ConfigStore, Result};

/// Writes go to a sibling `.tmp` file first and are renamed over the target,
/// so a reader never sees a half-written document.
pub struct FileConfigStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn load(&self) -> Result<Option<ClaimConfigDocument>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("reading {}", self.path.display()))
                    .into())
            }
        };
        let document = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(Some(document))
    }

    async fn save(&self, document: &ClaimConfigDocument) -> Result<ClaimConfigDocument> {
        let _guard = self.write_lock.lock().await;
        let body = serde_json::to_vec_pretty(document).context("serializing claim config")?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let tmp = self.temp_path();
        tokio::fs::write(&tmp, &body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("replacing {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), bytes = body.len(), "claim config written");
        Ok(document.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FieldDefinition, FieldType, Step};

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("claim_config.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_keeps_field_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::new(dir.path().join("nested/claim_config.json"));
        let doc = ClaimConfigDocument::new(vec![Step::new("Incident")
            .with_field(FieldDefinition::new("zeta", FieldType::Text))
            .with_field(FieldDefinition::new("alpha", FieldType::Number))]);
        store.save(&doc).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, doc);
        assert_eq!(
            loaded.steps[0].configs.keys().collect::<Vec<_>>(),
            vec!["zeta", "alpha"]
        );
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_an_internal_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("claim_config.json");
        std::fs::write(&path, b"{not json").unwrap();
        let err = FileConfigStore::new(&path).load().await.unwrap_err();
        assert_eq!(err.http_status(), 500);
    }
}
