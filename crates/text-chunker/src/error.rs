use thiserror::Error;

/// Result type for chunker operations
pub type Result<T> = std::result::Result<T, ChunkerError>;

/// Errors that can occur while loading or splitting text
#[derive(Error, Debug)]
pub enum ChunkerError {
    /// Invalid configuration (sizes, unknown split mode)
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Path is neither a directory nor a supported file
    #[error("Unsupported path: {0}")]
    UnsupportedPath(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Directory traversal failed
    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),
}

impl ChunkerError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an unsupported path error
    pub fn unsupported_path(path: impl Into<String>) -> Self {
        Self::UnsupportedPath(path.into())
    }
}
