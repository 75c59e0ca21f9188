//! Storage-client façade for the ephemeral object store.
//!
//! This crate adapts [`ephemeral_storage_core::EphemeralStore`] to the
//! asynchronous [`StorageClient`] capability interface, and provides the
//! [`ByteStream`] type used to move payloads across that boundary.
//!
//! Incoming streams are fully materialized before they reach the store.
//! Outgoing payloads are handed back as lazy, fixed-size chunk streams.
//!
//! ```
//! use bytes::Bytes;
//! use ephemeral_storage_client::{ByteStream, EphemeralStorageClient, StorageClient};
//!
//! # tokio_test::block_on(async {
//! let client = EphemeralStorageClient::default();
//! client
//!     .upload("docs/hello.txt", ByteStream::from_bytes(Bytes::from("hello-ephemeral")))
//!     .await
//!     .unwrap();
//!
//! let body = client.download("docs/hello.txt", Some(6..=14)).await.unwrap();
//! assert_eq!(body.length(), 9);
//! assert_eq!(body.collect().await.unwrap().as_ref(), b"ephemeral");
//! # });
//! ```

pub mod client;
pub mod stream;

pub use client::{EphemeralStorageClient, StorageClient};
pub use ephemeral_storage_core::{CompletedPart, StorageError, StorageErrorCode, StorageResult};
pub use stream::ByteStream;
