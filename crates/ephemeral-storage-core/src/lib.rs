//! In-memory object store engine for Ephemeral Storage.
//!
//! This crate emulates a hierarchical, path-like storage namespace on top of
//! a flat key/value map. It is meant to back test, preview and development
//! deployments that need the observable behavior of a real storage backend
//! (existence checks, sizes, directory listings, ranged reads, multipart
//! uploads) without touching a filesystem or the network.
//!
//! # Architecture
//!
//! ```text
//! EphemeralStore (single mutex, id counters)
//!        |
//!        +--> Namespace (object table + directory set + listing)
//!        |
//!        +--> MultipartTable (upload id -> target key -> parts)
//!        |
//!        +--> range::extract_range (partial reads)
//! ```
//!
//! Every public operation on [`EphemeralStore`] takes the same lock, so the
//! store behaves like a single-threaded monitor no matter how many callers
//! share it.

pub mod config;
pub mod error;
pub mod key;
pub mod range;
pub mod state;
pub mod store;
pub mod utils;

pub use config::StorageConfig;
pub use error::{StorageError, StorageErrorCode, StorageResult};
pub use state::{CompletedPart, StoreStats};
pub use store::EphemeralStore;
