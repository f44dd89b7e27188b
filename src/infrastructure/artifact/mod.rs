//! Artifact persistence implementations

mod file_repository;

pub use file_repository::FileArtifactRepository;
