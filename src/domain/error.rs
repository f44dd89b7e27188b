use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Schema mismatch on '{column}': {message}")]
    Schema { column: String, message: String },

    #[error("Unknown category '{value}' for column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("Dataset error: {message}")]
    Dataset { message: String },

    #[error("Training error: {message}")]
    Training { message: String },

    #[error("Artifact error: {message}")]
    Artifact { message: String },

    #[error("Missing artifact files: {}", files.join(", "))]
    MissingArtifacts { files: Vec<String> },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn schema(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Schema {
            column: column.into(),
            message: message.into(),
        }
    }

    pub fn unknown_category(column: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnknownCategory {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
        }
    }

    pub fn training(message: impl Into<String>) -> Self {
        Self::Training {
            message: message.into(),
        }
    }

    pub fn artifact(message: impl Into<String>) -> Self {
        Self::Artifact {
            message: message.into(),
        }
    }

    pub fn missing_artifacts(files: Vec<String>) -> Self {
        Self::MissingArtifacts { files }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Column the error refers to, if any
    pub fn column(&self) -> Option<&str> {
        match self {
            Self::Schema { column, .. } | Self::UnknownCategory { column, .. } => Some(column),
            _ => None,
        }
    }
}
