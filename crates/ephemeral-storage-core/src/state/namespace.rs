//! Object table and directory set.
//!
//! [`Namespace`] owns the flat key → payload map together with the set of
//! registered directories, and keeps the two consistent: every ancestor of
//! a stored object or directory is itself a registered directory. Both
//! collections are `BTree`-based so prefix scans are range lookups and
//! listings come out sorted.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use bytes::Bytes;
use tracing::trace;

use crate::key::{descendant_prefix, immediate_child, parent_directories};

/// Number of entries dropped by a [`Namespace::remove`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Removed {
    /// Objects removed.
    pub objects: usize,
    /// Directory entries removed.
    pub directories: usize,
}

/// Hierarchical namespace emulated over a flat map.
///
/// All keys passed in must already be canonical (see
/// [`crate::key::normalize_key`]).
#[derive(Debug)]
pub struct Namespace {
    objects: BTreeMap<String, Bytes>,
    directories: BTreeSet<String>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespace {
    /// Create a namespace holding only the root directory.
    #[must_use]
    pub fn new() -> Self {
        let mut directories = BTreeSet::new();
        directories.insert(String::new());
        Self {
            objects: BTreeMap::new(),
            directories,
        }
    }

    /// Store `data` at `key`, replacing any previous payload.
    ///
    /// Returns the replaced payload, if any.
    pub fn put(&mut self, key: &str, data: Bytes) -> Option<Bytes> {
        self.ensure_parent_directories(key);
        self.objects.insert(key.to_owned(), data)
    }

    /// Stored payload for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Bytes> {
        self.objects.get(key)
    }

    /// Whether `key` names a stored object.
    #[must_use]
    pub fn contains_object(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Whether `key` is a registered directory. Exact membership only.
    #[must_use]
    pub fn is_directory(&self, key: &str) -> bool {
        self.directories.contains(key)
    }

    /// Register `key` and all of its ancestors as directories.
    pub fn create_directory(&mut self, key: &str) {
        self.ensure_parent_directories(key);
        self.directories.insert(key.to_owned());
    }

    /// Register every proper ancestor of `key` as a directory.
    pub fn ensure_parent_directories(&mut self, key: &str) {
        for parent in parent_directories(key) {
            if !self.directories.contains(parent) {
                trace!(directory = %parent, "synthesized parent directory");
                self.directories.insert(parent.to_owned());
            }
        }
    }

    /// Remove `key` and everything beneath it, objects and directories alike.
    ///
    /// The root directory is never removed; removing `""` only drops an
    /// object stored at the empty key.
    pub fn remove(&mut self, key: &str) -> Removed {
        let mut removed = Removed::default();

        if self.objects.remove(key).is_some() {
            removed.objects += 1;
        }
        if key.is_empty() {
            return removed;
        }
        if self.directories.remove(key) {
            removed.directories += 1;
        }

        let prefix = descendant_prefix(key);
        let doomed_objects: Vec<String> = self
            .objects
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(&prefix))
            .cloned()
            .collect();
        for k in doomed_objects {
            self.objects.remove(&k);
            removed.objects += 1;
        }
        let doomed_dirs: Vec<String> = self
            .directories
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|d| d.starts_with(&prefix))
            .cloned()
            .collect();
        for d in doomed_dirs {
            self.directories.remove(&d);
            removed.directories += 1;
        }

        removed
    }

    /// Immediate child names of the canonical directory `prefix`, merged
    /// from objects and directory markers, sorted and deduplicated.
    #[must_use]
    pub fn list(&self, prefix: &str) -> Vec<String> {
        let root_prefix = descendant_prefix(prefix);
        let bounds = (Bound::Included(root_prefix.as_str()), Bound::Unbounded);

        let from_objects = self
            .objects
            .range::<str, _>(bounds)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(&root_prefix));
        let from_directories = self
            .directories
            .range::<str, _>(bounds)
            .take_while(|d| d.starts_with(&root_prefix));

        let children: BTreeSet<&str> = from_objects
            .chain(from_directories)
            .filter_map(|k| immediate_child(k, &root_prefix))
            .collect();

        children.into_iter().map(str::to_owned).collect()
    }

    /// Number of stored objects.
    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of registered directories, root included.
    #[must_use]
    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    /// Sum of all stored payload sizes.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        self.objects.values().map(|b| b.len() as u64).sum()
    }
}
