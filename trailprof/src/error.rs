use std::path::PathBuf;
use thiserror::Error;
use tracklog::TracklogError;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("step must be a positive distance, got {0} km")]
    InvalidStep(f64),

    #[error("{0}")]
    Tracklog(#[from] TracklogError),

    #[error("can't read map config {1}: {0}")]
    Io(std::io::Error, PathBuf),

    #[error("invalid map config, {0}")]
    Json(#[from] serde_json::Error),
}
