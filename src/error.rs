use std::path::PathBuf;
use thiserror::Error;

/// Errors at the edges of the crate: loading and validating scene
/// descriptions and peak data. Curve evaluation and waveform mapping never
/// fail.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read scene file: {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scene: {0}")]
    InvalidScene(String),

    #[error("invalid peak data: {0}")]
    InvalidPeaks(String),
}

pub type Result<T> = std::result::Result<T, Error>;
