use std::path::PathBuf;
use thiserror::Error;

/// Result type for rendering and patching
pub type Result<T> = std::result::Result<T, DocgenError>;

/// Errors surfaced by rendering and patch application
#[derive(Error, Debug)]
pub enum DocgenError {
    /// Unknown docstring dialect
    #[error("Invalid docstring style: {0:?} (expected google, numpy or rest)")]
    InvalidStyle(String),

    /// The target file could not be read or written
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Insertion line outside the file
    #[error("Invalid insertion line {line} (file has {len} lines)")]
    InvalidLine { line: usize, len: usize },

    /// Insertion line does not end a block header, as in `def f(): pass`
    #[error("Line {line} does not end with `:`; the body must start on its own line")]
    InlineBody { line: usize },
}

impl DocgenError {
    pub fn invalid_style(style: impl Into<String>) -> Self {
        Self::InvalidStyle(style.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure of a content provider.
///
/// Never fatal to rendering: the generator falls back to placeholders.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Content source unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed content: {0}")]
    Malformed(String),
}
