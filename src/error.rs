//! # Error Handling
//!
//! Error types for table persistence. In-memory operations never fail:
//! "key not found" is an `Option`, and heap exhaustion aborts the way it
//! does for every std-backed collection.

use thiserror::Error;

/// Result type alias for arrayhash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Primary error type for arrayhash
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {message}")]
    Io { message: String, source: std::io::Error },

    /// The stream is malformed or truncated: bad magic, a declared entry
    /// count exceeding the available bytes, or a value width that does not
    /// match the table's value type.
    #[error("corrupt table stream: {message}")]
    Corrupt { message: String },

    #[error("unsupported format version: {version}")]
    UnsupportedVersion { version: u32 },
}

// Conversion from std::io::Error
impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}
