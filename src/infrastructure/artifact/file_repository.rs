//! JSON files in a directory

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use crate::domain::artifact::{
    ArtifactSet, FEATURE_NAMES_FILE, METADATA_FILE, MODEL_FILE, REQUIRED_FILES, SCALER_FILE,
    SCHEMA_FILE,
};
use crate::domain::{ArtifactRepository, DomainError, ModelBundle};

/// Stores each artifact as a pretty-printed JSON file
#[derive(Debug, Clone)]
pub struct FileArtifactRepository {
    dir: PathBuf,
}

impl FileArtifactRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    async fn write_json<T: Serialize>(&self, file: &str, value: &T) -> Result<(), DomainError> {
        let content = serde_json::to_string_pretty(value)
            .map_err(|e| DomainError::internal(format!("Cannot serialize {}: {}", file, e)))?;

        // write then rename so readers never see a half-written file
        let tmp = self.path(&format!("{}.tmp", file));
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, self.path(file))
            .await
            .map_err(|e| io_error(&tmp, e))?;

        debug!(file = %file, "Artifact written");
        Ok(())
    }

    async fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, DomainError> {
        let path = self.path(file);
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| io_error(&path, e))?;

        serde_json::from_str(&content)
            .map_err(|e| DomainError::artifact(format!("{} is not valid: {}", file, e)))
    }

    async fn exists(&self, file: &str) -> Result<bool, DomainError> {
        let path = self.path(file);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| io_error(&path, e))
    }
}

fn io_error(path: &Path, err: std::io::Error) -> DomainError {
    DomainError::artifact(format!("{}: {}", path.display(), err))
}

#[async_trait]
impl ArtifactRepository for FileArtifactRepository {
    async fn save(&self, bundle: &ModelBundle) -> Result<(), DomainError> {
        bundle.validate()?;
        let set = bundle.to_artifacts();

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        self.write_json(SCHEMA_FILE, &set.schema).await?;
        self.write_json(FEATURE_NAMES_FILE, &set.feature_names).await?;
        self.write_json(SCALER_FILE, &set.scaler).await?;
        self.write_json(MODEL_FILE, &set.model).await?;

        if let Some(metadata) = &set.metadata {
            self.write_json(METADATA_FILE, metadata).await?;
        } else if self.exists(METADATA_FILE).await? {
            // stale metadata from an earlier run would fail the fingerprint check
            let path = self.path(METADATA_FILE);
            tokio::fs::remove_file(&path)
                .await
                .map_err(|e| io_error(&path, e))?;
        }

        info!(
            dir = %self.dir.display(),
            features = set.feature_names.len(),
            fingerprint = %set.model.schema_fingerprint,
            "Artifacts saved"
        );

        Ok(())
    }

    async fn load(&self) -> Result<ModelBundle, DomainError> {
        let missing = self.missing().await?;
        if !missing.is_empty() {
            return Err(DomainError::missing_artifacts(missing));
        }

        let metadata = if self.exists(METADATA_FILE).await? {
            Some(self.read_json(METADATA_FILE).await?)
        } else {
            None
        };

        let set = ArtifactSet {
            schema: self.read_json(SCHEMA_FILE).await?,
            feature_names: self.read_json(FEATURE_NAMES_FILE).await?,
            scaler: self.read_json(SCALER_FILE).await?,
            model: self.read_json(MODEL_FILE).await?,
            metadata,
        };

        let bundle = ModelBundle::from_artifacts(set)?;

        info!(
            dir = %self.dir.display(),
            features = bundle.schema().n_features(),
            "Artifacts loaded"
        );

        Ok(bundle)
    }

    async fn missing(&self) -> Result<Vec<String>, DomainError> {
        let mut missing = Vec::new();

        for file in REQUIRED_FILES {
            if !self.exists(file).await? {
                missing.push(file.to_string());
            }
        }

        Ok(missing)
    }

    fn location(&self) -> String {
        self.dir.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::artifact::sample_bundle;

    #[tokio::test]
    async fn test_empty_dir_reports_every_required_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileArtifactRepository::new(dir.path());

        let missing = repo.missing().await.unwrap();
        assert_eq!(
            missing,
            vec!["schema.json", "feature_names.json", "scaler.json", "model.json"]
        );

        let err = repo.load().await.unwrap_err();
        assert!(err.to_string().contains("model.json"));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileArtifactRepository::new(dir.path().join("artifacts"));
        let bundle = sample_bundle();

        repo.save(&bundle).await.unwrap();

        assert!(repo.missing().await.unwrap().is_empty());
        assert!(!repo.path("model.json.tmp").exists());
        assert_eq!(repo.load().await.unwrap(), bundle);
    }

    #[tokio::test]
    async fn test_partial_artifacts_name_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileArtifactRepository::new(dir.path());
        repo.save(&sample_bundle()).await.unwrap();

        std::fs::remove_file(dir.path().join(SCALER_FILE)).unwrap();

        match repo.load().await {
            Err(DomainError::MissingArtifacts { files }) => assert_eq!(files, vec!["scaler.json"]),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_rejects_edited_feature_names() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileArtifactRepository::new(dir.path());
        repo.save(&sample_bundle()).await.unwrap();

        std::fs::write(
            dir.path().join(FEATURE_NAMES_FILE),
            r#"["Shift", "Cycle_Time"]"#,
        )
        .unwrap();

        assert!(matches!(
            repo.load().await,
            Err(DomainError::Artifact { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileArtifactRepository::new(dir.path());
        repo.save(&sample_bundle()).await.unwrap();

        std::fs::write(dir.path().join(MODEL_FILE), "{ not json").unwrap();

        let err = repo.load().await.unwrap_err();
        assert!(err.to_string().contains("model.json is not valid"));
    }

    #[tokio::test]
    async fn test_load_rejects_zero_scale() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileArtifactRepository::new(dir.path());
        repo.save(&sample_bundle()).await.unwrap();

        let path = dir.path().join(SCALER_FILE);
        let mut scaler: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        scaler["scaler"]["scale"][0] = serde_json::json!(0.0);
        std::fs::write(&path, scaler.to_string()).unwrap();

        match repo.load().await {
            Err(DomainError::Artifact { message }) => assert!(message.contains("scale")),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
