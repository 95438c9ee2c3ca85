use std::io;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CoreErrorCode {
    NotFound,
    Format,
    Io,
    Validation,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code:?}: {message}")]
pub struct CoreError {
    pub code: CoreErrorCode,
    pub message: String,
}

impl CoreError {
    pub fn new(code: CoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Wraps an I/O failure on `path`, keeping `NotFound` distinguishable.
    pub fn io(path: &Path, action: &str, err: io::Error) -> Self {
        let code = if err.kind() == io::ErrorKind::NotFound {
            CoreErrorCode::NotFound
        } else {
            CoreErrorCode::Io
        };
        Self::new(code, format!("failed to {action} {}: {err}", path.display()))
    }
}
