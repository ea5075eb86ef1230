// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The backend has no object under this key. Chunked reads use this as
    /// the end-of-object marker.
    #[error("No such key: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request cancelled: fleet is shut down")]
    Cancelled,
}

impl FsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
