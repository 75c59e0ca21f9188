//! Multipart upload state management.
//!
//! Tracks in-progress multipart uploads and their stored parts. Each
//! [`MultipartUpload`] is bound to one canonical target key and accumulates
//! [`StoredPart`] entries keyed by their 1-based part number. An upload leaves
//! the [`MultipartTable`] when it is finished or aborted, after which its id
//! no longer resolves.

use std::collections::{BTreeMap, HashMap};

use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Reference to an uploaded part, returned by `add_multipart_part` and
/// handed back when finishing the upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedPart {
    /// Opaque token issued when the part was stored.
    pub chunk_id: String,
    /// The part number (1-based).
    pub number: i32,
}

impl CompletedPart {
    /// Create a part reference.
    #[must_use]
    pub fn new(chunk_id: impl Into<String>, number: i32) -> Self {
        Self {
            chunk_id: chunk_id.into(),
            number,
        }
    }
}

/// A single stored part.
#[derive(Debug, Clone)]
pub struct StoredPart {
    /// Token issued for this exact payload.
    pub chunk_id: String,
    /// Part payload.
    pub data: Bytes,
}

/// An in-progress multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    /// Unique identifier for this upload.
    pub upload_id: String,
    /// Canonical key the finished object will be stored under.
    pub key: String,
    /// Parts uploaded so far, keyed by part number.
    pub parts: BTreeMap<i32, StoredPart>,
}

impl MultipartUpload {
    /// Create an upload with no parts.
    #[must_use]
    pub fn new(upload_id: String, key: String) -> Self {
        Self {
            upload_id,
            key,
            parts: BTreeMap::new(),
        }
    }

    /// Insert or replace a part.
    pub fn put_part(&mut self, number: i32, part: StoredPart) {
        self.parts.insert(number, part);
    }

    /// Get a part by its number.
    #[must_use]
    pub fn get_part(&self, number: i32) -> Option<&StoredPart> {
        self.parts.get(&number)
    }

    /// Number of distinct parts stored.
    #[must_use]
    pub fn parts_count(&self) -> usize {
        self.parts.len()
    }

    /// Total size of all stored parts.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.parts.values().map(|p| p.data.len() as u64).sum()
    }

    /// References to every stored part in ascending part-number order.
    #[must_use]
    pub fn completed_parts(&self) -> Vec<CompletedPart> {
        self.parts
            .iter()
            .map(|(number, part)| CompletedPart::new(part.chunk_id.clone(), *number))
            .collect()
    }

    /// Concatenate the referenced parts in ascending part-number order.
    ///
    /// Does not modify the upload.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidMultipartChunk`] if a referenced part
    /// number is not stored, or its chunk id differs from the stored one.
    pub fn assemble(&self, chunks: &[CompletedPart]) -> Result<Bytes, StorageError> {
        let mut ordered: Vec<&CompletedPart> = chunks.iter().collect();
        ordered.sort_by_key(|c| c.number);

        let mut selected = Vec::with_capacity(ordered.len());
        for chunk in ordered {
            let part = self
                .get_part(chunk.number)
                .ok_or_else(|| StorageError::InvalidMultipartChunk {
                    part_number: chunk.number,
                    reason: "part was never uploaded".to_owned(),
                })?;
            if part.chunk_id != chunk.chunk_id {
                return Err(StorageError::InvalidMultipartChunk {
                    part_number: chunk.number,
                    reason: format!("chunk id {} does not match the stored part", chunk.chunk_id),
                });
            }
            selected.push(&part.data);
        }

        let total: usize = selected.iter().map(|d| d.len()).sum();
        let mut combined = BytesMut::with_capacity(total);
        for data in selected {
            combined.extend_from_slice(data);
        }
        Ok(combined.freeze())
    }
}

/// Table of open multipart uploads keyed by upload id.
#[derive(Debug, Default)]
pub struct MultipartTable {
    uploads: HashMap<String, MultipartUpload>,
}

impl MultipartTable {
    /// Register a new open upload.
    pub fn insert(&mut self, upload: MultipartUpload) {
        self.uploads.insert(upload.upload_id.clone(), upload);
    }

    /// Resolve an open upload bound to the canonical `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidMultipartId`] if `upload_id` is unknown
    /// or bound to a different key.
    pub fn get(&self, upload_id: &str, key: &str) -> Result<&MultipartUpload, StorageError> {
        self.uploads
            .get(upload_id)
            .filter(|u| u.key == key)
            .ok_or_else(|| invalid_id(upload_id, key))
    }

    /// Mutable variant of [`MultipartTable::get`].
    ///
    /// # Errors
    ///
    /// Same as [`MultipartTable::get`].
    pub fn get_mut(
        &mut self,
        upload_id: &str,
        key: &str,
    ) -> Result<&mut MultipartUpload, StorageError> {
        self.uploads
            .get_mut(upload_id)
            .filter(|u| u.key == key)
            .ok_or_else(|| invalid_id(upload_id, key))
    }

    /// Drop an upload bound to the canonical `key`.
    ///
    /// # Errors
    ///
    /// Same as [`MultipartTable::get`].
    pub fn remove(&mut self, upload_id: &str, key: &str) -> Result<MultipartUpload, StorageError> {
        self.get(upload_id, key)?;
        self.uploads
            .remove(upload_id)
            .ok_or_else(|| invalid_id(upload_id, key))
    }

    /// Number of open uploads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.uploads.len()
    }

    /// Whether no uploads are open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty()
    }

    /// Drop every open upload.
    pub fn clear(&mut self) {
        self.uploads.clear();
    }
}

fn invalid_id(upload_id: &str, key: &str) -> StorageError {
    StorageError::InvalidMultipartId {
        upload_id: upload_id.to_owned(),
        key: key.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
