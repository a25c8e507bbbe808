//! Errors raised by the file and config layer around the annotation engine.
//!
//! The engine itself (locating, scoring, drawing) never fails; only loading
//! inputs and writing outputs can.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("not a usable font file: {}", .0.display())]
    InvalidFont(PathBuf),

    #[error("{0}")]
    InvalidArgument(String),
}
