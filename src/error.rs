//! Editor error types

use std::path::PathBuf;

use thiserror::Error;

/// Recoverable failures: file I/O, image codecs and configuration.
///
/// Broken invariants (duplicate window ids, out-of-range layer indices) are
/// bugs and panic instead.
#[derive(Error, Debug)]
pub enum EditorError {
    /// Reading or writing a file failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Image decoding or encoding failed
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Malformed JSON in a config or project file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config values out of range
    #[error("Invalid config: {0}")]
    Config(String),

    /// Pixel data does not match the declared dimensions
    #[error("Buffer of {len} bytes does not hold a {width}x{height} RGBA image")]
    BufferSize { width: u32, height: u32, len: usize },

    /// Project manifest is inconsistent
    #[error("Invalid project: {0}")]
    Project(String),

    /// The user closed a file dialog
    #[error("Cancelled")]
    Cancelled,
}

impl EditorError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditorError::Io { path: path.into(), source }
    }
}

/// Result type for editor operations
pub type Result<T> = std::result::Result<T, EditorError>;
