//! Identifier generation.
//!
//! Upload ids and chunk ids come from a per-store monotonic counter, so they
//! never repeat for the lifetime of a store. Chunk ids also embed an MD5
//! digest of the upload id, part number and payload, tying each token to the
//! exact part it was issued for.

use md5::{Digest, Md5};

/// Monotonic identifier source owned by a single store.
///
/// Not synchronized on its own; the store only touches it while holding its
/// state lock.
#[derive(Debug, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Create a generator starting at sequence 1.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    fn advance(&mut self) -> u64 {
        let seq = self.next.max(1);
        self.next = seq + 1;
        seq
    }

    /// Allocate a fresh multipart upload id.
    ///
    /// # Examples
    ///
    /// ```
    /// use ephemeral_storage_core::utils::IdGenerator;
    ///
    /// let mut ids = IdGenerator::new();
    /// let a = ids.upload_id();
    /// let b = ids.upload_id();
    /// assert_ne!(a, b);
    /// assert!(a.starts_with("upload-"));
    /// ```
    pub fn upload_id(&mut self) -> String {
        format!("upload-{:016x}", self.advance())
    }

    /// Allocate a fresh chunk id bound to `(upload_id, part_number, payload)`.
    pub fn chunk_id(&mut self, upload_id: &str, part_number: i32, payload: &[u8]) -> String {
        let seq = self.advance();
        let mut hasher = Md5::new();
        hasher.update(upload_id.as_bytes());
        hasher.update(part_number.to_be_bytes());
        hasher.update(payload);
        format!("{seq:016x}-{}", hex::encode(hasher.finalize()))
    }
}
