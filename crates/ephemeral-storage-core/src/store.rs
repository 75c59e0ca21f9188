//! The ephemeral store.
//!
//! [`EphemeralStore`] owns the namespace, the multipart table and the id
//! generator behind a single [`parking_lot::Mutex`]. Every public operation
//! takes the lock once, does all of its work, and releases it, so concurrent
//! callers observe a total order of operations. No operation blocks or
//! awaits while holding the lock.
//!
//! Keys are normalized on entry (see [`crate::key::normalize_key`]):
//! `"/docs//a.txt"` and `"docs/a.txt"` are the same object.

use std::ops::RangeInclusive;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::{debug, info, trace};

use crate::error::{StorageError, StorageResult};
use crate::key::normalize_key;
use crate::range::extract_range;
use crate::state::{
    CompletedPart, MultipartTable, MultipartUpload, Namespace, StoreStats, StoredPart,
};
use crate::utils::IdGenerator;

/// Everything guarded by the store lock.
#[derive(Debug)]
struct StoreState {
    namespace: Namespace,
    uploads: MultipartTable,
    ids: IdGenerator,
}

/// In-memory object store emulating a hierarchical namespace.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use ephemeral_storage_core::EphemeralStore;
///
/// let store = EphemeralStore::new();
/// store.put("docs/hello.txt", Bytes::from("hello-ephemeral"));
///
/// assert!(store.exists("docs/hello.txt"));
/// assert!(store.exists("docs"));
/// assert_eq!(store.size("docs/hello.txt"), 15);
/// assert_eq!(store.list(Some("docs")), vec!["hello.txt"]);
/// ```
pub struct EphemeralStore {
    state: Mutex<StoreState>,
}

impl std::fmt::Debug for EphemeralStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("EphemeralStore")
            .field("objects", &stats.objects)
            .field("directories", &stats.directories)
            .field("open_uploads", &stats.open_uploads)
            .finish_non_exhaustive()
    }
}

impl Default for EphemeralStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemeralStore {
    /// Create an empty store containing only the root directory.
    #[must_use]
    pub fn new() -> Self {
        info!("creating EphemeralStore");
        Self {
            state: Mutex::new(StoreState {
                namespace: Namespace::new(),
                uploads: MultipartTable::default(),
                ids: IdGenerator::new(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Objects
    // -----------------------------------------------------------------------

    /// Store `data` at `key`, overwriting any existing object and registering
    /// every ancestor directory.
    pub fn put(&self, key: &str, data: Bytes) {
        let key = normalize_key(key);
        let size = data.len();
        let replaced = self.state.lock().namespace.put(&key, data).is_some();
        debug!(key = %key, size, replaced, "put completed");
    }

    /// Return the payload stored at `key`, if any.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let key = normalize_key(key);
        let data = self.state.lock().namespace.get(&key).cloned();
        trace!(key = %key, found = data.is_some(), "get");
        data
    }

    /// Return the payload stored at `key`, optionally sliced to an inclusive
    /// byte range.
    ///
    /// # Errors
    ///
    /// - [`StorageError::InvalidKey`] if no object is stored at `key`.
    /// - [`StorageError::InvalidBuffer`] if the range is out of bounds.
    pub fn read(&self, key: &str, range: Option<RangeInclusive<i64>>) -> StorageResult<Bytes> {
        let data = self.get(key).ok_or_else(|| StorageError::InvalidKey {
            key: key.to_owned(),
        })?;
        extract_range(&data, range)
    }

    /// Whether `key` is a stored object or a registered directory.
    ///
    /// Directory existence is exact membership in the directory set.
    #[must_use]
    pub fn exists(&self, key: &str) -> bool {
        let key = normalize_key(key);
        let state = self.state.lock();
        state.namespace.contains_object(&key) || state.namespace.is_directory(&key)
    }

    /// Size in bytes of the object at `key`, or `0` if there is none.
    ///
    /// A missing key is not an error; use [`EphemeralStore::exists`] to tell
    /// an empty object from an absent one.
    #[must_use]
    pub fn size(&self, key: &str) -> u64 {
        let key = normalize_key(key);
        self.state
            .lock()
            .namespace
            .get(&key)
            .map_or(0, |data| data.len() as u64)
    }

    /// Remove `key` together with every object and directory below it.
    ///
    /// Removing a missing key is a no-op. The root directory always survives.
    pub fn remove(&self, key: &str) {
        let key = normalize_key(key);
        let removed = self.state.lock().namespace.remove(&key);
        debug!(
            key = %key,
            objects = removed.objects,
            directories = removed.directories,
            "remove completed"
        );
    }

    /// Copy the object at `source` to `destination`.
    ///
    /// Only the single object is copied, never its descendants.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidKey`] if `source` has no stored object.
    pub fn copy(&self, source: &str, destination: &str) -> StorageResult<()> {
        let src = normalize_key(source);
        let dst = normalize_key(destination);

        let mut state = self.state.lock();
        let data = state
            .namespace
            .get(&src)
            .cloned()
            .ok_or_else(|| StorageError::InvalidKey {
                key: source.to_owned(),
            })?;
        let size = data.len();
        state.namespace.put(&dst, data);
        drop(state);

        debug!(source = %src, destination = %dst, size, "copy completed");
        Ok(())
    }

    /// Register `key` and its ancestors as directories. Idempotent.
    pub fn create_directory(&self, key: &str) {
        let key = normalize_key(key);
        self.state.lock().namespace.create_directory(&key);
        debug!(key = %key, "create_directory completed");
    }

    /// Immediate child names under `prefix` (root when `None`), sorted and
    /// deduplicated. Empty directories are included.
    #[must_use]
    pub fn list(&self, prefix: Option<&str>) -> Vec<String> {
        let prefix = normalize_key(prefix.unwrap_or_default());
        let children = self.state.lock().namespace.list(&prefix);
        trace!(prefix = %prefix, count = children.len(), "list");
        children
    }

    // -----------------------------------------------------------------------
    // Multipart uploads
    // -----------------------------------------------------------------------

    /// Open a multipart upload targeting `key` and return its id.
    ///
    /// Ancestor directories of `key` are registered immediately.
    pub fn create_multipart_upload(&self, key: &str) -> String {
        let key = normalize_key(key);
        let mut state = self.state.lock();
        let upload_id = state.ids.upload_id();
        state.namespace.ensure_parent_directories(&key);
        state
            .uploads
            .insert(MultipartUpload::new(upload_id.clone(), key.clone()));
        drop(state);

        debug!(key = %key, upload_id = %upload_id, "create_multipart_upload completed");
        upload_id
    }

    /// Store part `number` of an open upload, replacing any previous part
    /// with the same number.
    ///
    /// # Errors
    ///
    /// - [`StorageError::InvalidMultipartChunk`] if `number <= 0`.
    /// - [`StorageError::InvalidMultipartId`] if the upload is unknown or
    ///   bound to a different key.
    pub fn add_multipart_part(
        &self,
        upload_id: &str,
        key: &str,
        number: i32,
        data: Bytes,
    ) -> StorageResult<CompletedPart> {
        if number <= 0 {
            return Err(StorageError::InvalidMultipartChunk {
                part_number: number,
                reason: "part number must be positive".to_owned(),
            });
        }

        let canonical = normalize_key(key);
        let mut guard = self.state.lock();
        let state = &mut *guard;
        let upload = state
            .uploads
            .get_mut(upload_id, &canonical)
            .map_err(|_| invalid_upload(upload_id, key))?;
        let chunk_id = state.ids.chunk_id(upload_id, number, &data);
        let size = data.len();
        upload.put_part(
            number,
            StoredPart {
                chunk_id: chunk_id.clone(),
                data,
            },
        );
        drop(guard);

        debug!(upload_id, key = %canonical, part_number = number, size, "add_multipart_part completed");
        Ok(CompletedPart::new(chunk_id, number))
    }

    /// Discard an open upload and all of its parts.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidMultipartId`] if the upload is unknown
    /// or bound to a different key.
    pub fn abort_multipart_upload(&self, upload_id: &str, key: &str) -> StorageResult<()> {
        let canonical = normalize_key(key);
        let upload = self
            .state
            .lock()
            .uploads
            .remove(upload_id, &canonical)
            .map_err(|_| invalid_upload(upload_id, key))?;

        debug!(
            upload_id,
            key = %canonical,
            parts = upload.parts_count(),
            "abort_multipart_upload completed"
        );
        Ok(())
    }

    /// Assemble the referenced parts in ascending part-number order, store
    /// the result at `key`, and close the upload.
    ///
    /// Parts not referenced by `chunks` are dropped. On failure nothing is
    /// committed and the upload stays open.
    ///
    /// # Errors
    ///
    /// - [`StorageError::InvalidMultipartId`] if the upload is unknown or
    ///   bound to a different key.
    /// - [`StorageError::InvalidMultipartChunk`] if a referenced part is not
    ///   stored or its chunk id does not match.
    pub fn finish_multipart_upload(
        &self,
        upload_id: &str,
        key: &str,
        chunks: &[CompletedPart],
    ) -> StorageResult<()> {
        let canonical = normalize_key(key);
        let mut state = self.state.lock();
        let data = state
            .uploads
            .get(upload_id, &canonical)
            .map_err(|_| invalid_upload(upload_id, key))?
            .assemble(chunks)?;

        state.uploads.remove(upload_id, &canonical)?;
        let size = data.len();
        state.namespace.put(&canonical, data);
        drop(state);

        debug!(
            upload_id,
            key = %canonical,
            parts = chunks.len(),
            size,
            "finish_multipart_upload completed"
        );
        Ok(())
    }

    /// References to every part stored so far for an open upload, in
    /// ascending part-number order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidMultipartId`] if the upload is unknown
    /// or bound to a different key.
    pub fn list_parts(&self, upload_id: &str, key: &str) -> StorageResult<Vec<CompletedPart>> {
        let canonical = normalize_key(key);
        let state = self.state.lock();
        let upload = state
            .uploads
            .get(upload_id, &canonical)
            .map_err(|_| invalid_upload(upload_id, key))?;
        Ok(upload.completed_parts())
    }

    // -----------------------------------------------------------------------
    // Housekeeping
    // -----------------------------------------------------------------------

    /// Point-in-time counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let state = self.state.lock();
        StoreStats {
            objects: state.namespace.object_count(),
            directories: state.namespace.directory_count(),
            open_uploads: state.uploads.len(),
            total_bytes: state.namespace.total_bytes(),
        }
    }

    /// Drop every object, directory and open upload.
    ///
    /// The root directory is recreated. Identifiers keep counting, so ids
    /// issued before the reset are never reissued.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.namespace = Namespace::new();
        state.uploads.clear();
        drop(state);
        info!("reset all ephemeral storage state");
    }
}

/// Report an upload error with the key exactly as the caller supplied it.
fn invalid_upload(upload_id: &str, key: &str) -> StorageError {
    StorageError::InvalidMultipartId {
        upload_id: upload_id.to_owned(),
        key: key.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
