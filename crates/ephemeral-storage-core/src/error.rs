//! Storage error types.
//!
//! Defines [`StorageError`], the typed failure surface shared by the engine
//! and the client façade. Each variant maps to a stable [`StorageErrorCode`]
//! through [`StorageError::code`], so adapters can report a machine-readable
//! kind alongside the human-readable message.
//!
//! # Usage
//!
//! ```
//! use ephemeral_storage_core::error::{StorageError, StorageErrorCode};
//!
//! let err = StorageError::InvalidKey {
//!     key: "docs/missing.txt".to_owned(),
//! };
//! assert_eq!(err.code(), StorageErrorCode::InvalidKey);
//! assert!(err.to_string().contains("docs/missing.txt"));
//! ```

use std::fmt;

/// Ephemeral storage error type.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The referenced key has no stored object.
    #[error("No object is stored at key: {key}")]
    InvalidKey {
        /// The key that was not found.
        key: String,
    },

    /// The requested byte range cannot be served from the stored payload.
    #[error("Invalid byte range {lower}..={upper} for payload of {length} bytes")]
    InvalidBuffer {
        /// Inclusive lower bound requested.
        lower: i64,
        /// Inclusive upper bound requested.
        upper: i64,
        /// Length of the stored payload.
        length: u64,
    },

    /// The multipart upload is unknown, bound to another key, or already
    /// finished or aborted.
    #[error("Invalid multipart upload id {upload_id} for key {key}")]
    InvalidMultipartId {
        /// The upload id supplied by the caller.
        upload_id: String,
        /// The key supplied by the caller.
        key: String,
    },

    /// A part number is non-positive, or a referenced part/chunk id pair is
    /// not stored for the upload.
    #[error("Invalid multipart chunk: part {part_number}: {reason}")]
    InvalidMultipartChunk {
        /// The offending part number.
        part_number: i32,
        /// Why the chunk was rejected.
        reason: String,
    },

    /// Unexpected failure, typically while materializing an input stream.
    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

impl StorageError {
    /// Return the stable error code for this error.
    #[must_use]
    pub fn code(&self) -> StorageErrorCode {
        match self {
            Self::InvalidKey { .. } => StorageErrorCode::InvalidKey,
            Self::InvalidBuffer { .. } => StorageErrorCode::InvalidBuffer,
            Self::InvalidMultipartId { .. } => StorageErrorCode::InvalidMultipartId,
            Self::InvalidMultipartChunk { .. } => StorageErrorCode::InvalidMultipartChunk,
            Self::Unknown(_) => StorageErrorCode::Unknown,
        }
    }
}

/// Machine-readable error kinds surfaced at the storage-client boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageErrorCode {
    /// See [`StorageError::InvalidKey`].
    InvalidKey,
    /// See [`StorageError::InvalidBuffer`].
    InvalidBuffer,
    /// See [`StorageError::InvalidMultipartId`].
    InvalidMultipartId,
    /// See [`StorageError::InvalidMultipartChunk`].
    InvalidMultipartChunk,
    /// See [`StorageError::Unknown`].
    Unknown,
}

impl StorageErrorCode {
    /// The code as a static string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidKey => "InvalidKey",
            Self::InvalidBuffer => "InvalidBuffer",
            Self::InvalidMultipartId => "InvalidMultipartId",
            Self::InvalidMultipartChunk => "InvalidMultipartChunk",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StorageErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Convenience result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
