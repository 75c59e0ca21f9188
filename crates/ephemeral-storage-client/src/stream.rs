//! Byte streams exchanged with the storage client.
//!
//! A [`ByteStream`] pairs a declared total length with a lazy sequence of
//! [`Bytes`] chunks. Streams built from an in-memory buffer slice it without
//! copying; [`ByteStream::collect`] gathers a stream back into one buffer.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use ephemeral_storage_core::{StorageError, StorageResult};
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};

/// Upper bound on the buffer preallocated from a declared length.
const MAX_PREALLOCATION: usize = 8 * 1024 * 1024;

/// A lazy sequence of byte chunks with a declared total length.
pub struct ByteStream {
    length: u64,
    inner: BoxStream<'static, StorageResult<Bytes>>,
}

impl std::fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ByteStream")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl ByteStream {
    /// Wrap an arbitrary chunk producer that promises `length` bytes in total.
    pub fn new<S>(length: u64, stream: S) -> Self
    where
        S: Stream<Item = StorageResult<Bytes>> + Send + 'static,
    {
        Self {
            length,
            inner: stream.boxed(),
        }
    }

    /// A stream yielding `data` as a single chunk (or nothing when empty).
    #[must_use]
    pub fn from_bytes(data: Bytes) -> Self {
        let chunk_size = data.len().max(1);
        Self::chunked(data, chunk_size)
    }

    /// A stream yielding `data` in chunks of `chunk_size` bytes.
    ///
    /// The last chunk may be shorter. A `chunk_size` of zero is treated as
    /// one.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use ephemeral_storage_client::ByteStream;
    /// use futures::StreamExt;
    ///
    /// # tokio_test::block_on(async {
    /// let chunks: Vec<_> = ByteStream::chunked(Bytes::from("abcde"), 2)
    ///     .map(|c| c.unwrap())
    ///     .collect()
    ///     .await;
    /// assert_eq!(chunks, vec![Bytes::from("ab"), Bytes::from("cd"), Bytes::from("e")]);
    /// # });
    /// ```
    #[must_use]
    pub fn chunked(data: Bytes, chunk_size: usize) -> Self {
        let length = data.len() as u64;
        let chunks = Chunks {
            data,
            chunk_size: chunk_size.max(1),
        };
        Self::new(length, stream::iter(chunks.map(Ok)))
    }

    /// Declared total length in bytes.
    #[must_use]
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Drain the stream into one contiguous buffer.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unknown`] if the producer fails or yields a
    /// total that differs from the declared length.
    pub async fn collect(mut self) -> StorageResult<Bytes> {
        let capacity = usize::try_from(self.length)
            .unwrap_or(MAX_PREALLOCATION)
            .min(MAX_PREALLOCATION);
        let mut buf = BytesMut::with_capacity(capacity);

        while let Some(chunk) = self.inner.next().await {
            let chunk = chunk.map_err(as_unknown)?;
            buf.extend_from_slice(&chunk);
        }

        let received = buf.len() as u64;
        if received != self.length {
            return Err(StorageError::Unknown(anyhow::anyhow!(
                "byte stream yielded {received} bytes but declared {}",
                self.length
            )));
        }
        Ok(buf.freeze())
    }
}

impl Stream for ByteStream {
    type Item = StorageResult<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

/// Fold any producer failure into [`StorageError::Unknown`].
fn as_unknown(err: StorageError) -> StorageError {
    match err {
        StorageError::Unknown(e) => StorageError::Unknown(e),
        other => StorageError::Unknown(
            anyhow::Error::new(other).context("failed to materialize byte stream"),
        ),
    }
}

/// Zero-copy fixed-size splitter over a [`Bytes`] buffer.
struct Chunks {
    data: Bytes,
    chunk_size: usize,
}

impl Iterator for Chunks {
    type Item = Bytes;

    fn next(&mut self) -> Option<Bytes> {
        if self.data.is_empty() {
            return None;
        }
        let n = self.chunk_size.min(self.data.len());
        Some(self.data.split_to(n))
    }
}
