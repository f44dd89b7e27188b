//! Artifact repository trait

use async_trait::async_trait;

use super::bundle::ModelBundle;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Persistence for the trained model bundle
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ArtifactRepository: Send + Sync {
    /// Persist every artifact of the bundle, replacing existing files
    async fn save(&self, bundle: &ModelBundle) -> Result<(), DomainError>;

    /// Load and cross-check the bundle
    async fn load(&self) -> Result<ModelBundle, DomainError>;

    /// Names of required artifacts that are not present
    async fn missing(&self) -> Result<Vec<String>, DomainError>;

    /// Human-readable location of the artifacts
    fn location(&self) -> String;
}

/// In-memory implementation of ArtifactRepository
pub mod in_memory {
    use super::*;
    use tokio::sync::RwLock;

    use crate::domain::artifact::files::REQUIRED_FILES;

    /// Keeps the last saved bundle in memory, for tests and development
    #[derive(Debug, Default)]
    pub struct InMemoryArtifactRepository {
        bundle: RwLock<Option<ModelBundle>>,
    }

    impl InMemoryArtifactRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_bundle(bundle: ModelBundle) -> Self {
            Self {
                bundle: RwLock::new(Some(bundle)),
            }
        }
    }

    #[async_trait]
    impl ArtifactRepository for InMemoryArtifactRepository {
        async fn save(&self, bundle: &ModelBundle) -> Result<(), DomainError> {
            bundle.validate()?;
            *self.bundle.write().await = Some(bundle.clone());
            Ok(())
        }

        async fn load(&self) -> Result<ModelBundle, DomainError> {
            self.bundle.read().await.clone().ok_or_else(|| {
                DomainError::missing_artifacts(
                    REQUIRED_FILES.iter().map(|f| f.to_string()).collect(),
                )
            })
        }

        async fn missing(&self) -> Result<Vec<String>, DomainError> {
            if self.bundle.read().await.is_some() {
                Ok(Vec::new())
            } else {
                Ok(REQUIRED_FILES.iter().map(|f| f.to_string()).collect())
            }
        }

        fn location(&self) -> String {
            "memory".to_string()
        }
    }
}
