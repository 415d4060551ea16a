use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process: {0}")]
    ProcessOpenFailed(String),

    #[error("Failed to read process memory at address {address:#x}: {message}")]
    MemoryReadFailed { address: u64, message: String },

    #[error("Invalid pool index: {0}")]
    InvalidPoolIndex(i32),

    #[error("Field at offset {offset:#x} ({width} bytes) is outside the {len}-byte slot")]
    FieldOutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error("Unknown asset type: {0}")]
    UnknownAssetType(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build a read failure for the given address
    pub fn read_failed(address: u64, message: impl Into<String>) -> Self {
        Error::MemoryReadFailed {
            address,
            message: message.into(),
        }
    }

    /// Check if this error came from the memory source
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Error::MemoryReadFailed { .. })
    }
}
