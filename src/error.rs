//! Crate-level error type.

use crate::config::ConfigError;
use crate::rekognition::AnalysisError;
use crate::s3_uploader::StorageError;
use thiserror::Error;

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::IaiRekognition`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
