use thiserror::Error;

use crate::validation::ValidationError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("No home directory")]
    NoHomeDir,
}

impl Error {
    /// Whether the caller supplied a bad payload, as opposed to an
    /// environment failure (filesystem, config).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Json(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
