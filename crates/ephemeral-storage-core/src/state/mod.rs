//! In-memory state for the ephemeral store.
//!
//! - [`Namespace`] -- object table, directory set and listing
//! - [`MultipartTable`] / [`MultipartUpload`] / [`StoredPart`] -- multipart
//!   upload tracking
//! - [`CompletedPart`] -- part reference exchanged with callers
//! - [`StoreStats`] -- point-in-time counters
//!
//! # Thread Safety
//!
//! None of these types lock on their own. [`crate::store::EphemeralStore`]
//! keeps all of them behind one mutex.

pub(crate) mod multipart;
pub(crate) mod namespace;

use serde::{Deserialize, Serialize};

pub use multipart::{CompletedPart, MultipartTable, MultipartUpload, StoredPart};
pub use namespace::{Namespace, Removed};

/// Point-in-time counters describing a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    /// Number of stored objects.
    pub objects: usize,
    /// Number of registered directories, root included.
    pub directories: usize,
    /// Number of open multipart uploads.
    pub open_uploads: usize,
    /// Sum of all stored object sizes.
    pub total_bytes: u64,
}
