use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced to callers of the extraction pipeline.
///
/// Geometric and association misses are normal outcomes encoded in
/// [`crate::models::RunResult`], never errors; only I/O, decode, and
/// collaborator failures appear here.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("input image not found: {0}")]
    InputNotFound(PathBuf),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("word detection failed: {0}")]
    WordDetection(#[source] anyhow::Error),

    #[error("failed to allocate output folder at {path}: {source}")]
    Allocation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {message}")]
    WriteArtifact { path: PathBuf, message: String },
}
