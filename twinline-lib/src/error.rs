//! Error type shared by the whole pipeline.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InlineError {
    #[error("IO error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input `{0}` is not a directory")]
    InputNotDirectory(PathBuf),

    #[error("stylesheet error: {0}")]
    Stylesheet(String),

    #[error("minifier produced invalid UTF-8")]
    Minify(#[from] std::string::FromUtf8Error),
}

impl InlineError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        InlineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, InlineError>;
