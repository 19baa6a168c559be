use gpx::errors::GpxError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TracklogError {
    #[error("can't open {1}: {0}")]
    Open(std::io::Error, PathBuf),

    #[error("malformed GPX, {0}")]
    Gpx(#[from] GpxError),
}
