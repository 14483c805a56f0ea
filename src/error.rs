use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Couldn't determine the working directory: {}", .0)]
    WorkingDirectory(#[source] std::io::Error),

    #[error("Working directory `{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Error walking files for `{}`: {}", .pattern, .source)]
    Discovery {
        pattern: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid file pattern `{}`: {}", .pattern, .source)]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Couldn't start `{}`: {}", .binary, .source)]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Couldn't read directory `{}`: {}", .path.display(), .source)]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal error: {}", .0)]
    Terminal(#[from] std::io::Error),

    #[error("Couldn't serialize the catalog: {}", .0)]
    Json(#[from] serde_json::Error),

    #[error("Clipboard error: {}", .0)]
    Clipboard(String),

    #[error("Couldn't open log file `{}`: {}", .path.display(), .source)]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<arboard::Error> for Error {
    fn from(err: arboard::Error) -> Self {
        Self::Clipboard(err.to_string())
    }
}
