use thiserror::Error;

use crate::model::DataType;

#[derive(Debug, Error)]
pub enum Error {
    #[error("File is not readable: {0}")]
    NotReadable(String),

    #[error("File is not writable: {0}")]
    NotWritable(String),

    #[error("Value {value:?} is not a valid {data_type}")]
    InvalidValue { value: String, data_type: DataType },

    #[error("Value not found at {0}")]
    LocationNotFound(String),

    #[error("Offset {offset} out of bounds for {width}-byte write (file length {len})")]
    OffsetOutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("Candidate at {0} cannot be rewritten")]
    NotRewritable(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
