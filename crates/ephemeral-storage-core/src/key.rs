//! Key normalization.
//!
//! Keys are slash-delimited paths. The canonical form drops empty segments,
//! so leading, trailing and repeated slashes carry no meaning: `"/docs//a/"`
//! and `"docs/a"` address the same entity. The root is the empty string.

/// Separator between key segments.
pub const SEPARATOR: char = '/';

/// Return the canonical form of `key`.
///
/// # Examples
///
/// ```
/// use ephemeral_storage_core::key::normalize_key;
///
/// assert_eq!(normalize_key("/docs//hello.txt/"), "docs/hello.txt");
/// assert_eq!(normalize_key("///"), "");
/// ```
#[must_use]
pub fn normalize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for segment in key.split(SEPARATOR).filter(|s| !s.is_empty()) {
        if !out.is_empty() {
            out.push(SEPARATOR);
        }
        out.push_str(segment);
    }
    out
}

/// Return every proper ancestor directory of a canonical key, shallowest
/// first. The root is not included.
///
/// # Examples
///
/// ```
/// use ephemeral_storage_core::key::parent_directories;
///
/// assert_eq!(parent_directories("a/b/c.txt"), vec!["a", "a/b"]);
/// assert!(parent_directories("top.txt").is_empty());
/// ```
#[must_use]
pub fn parent_directories(canonical: &str) -> Vec<&str> {
    canonical
        .match_indices(SEPARATOR)
        .map(|(idx, _)| &canonical[..idx])
        .collect()
}

/// Prefix that every descendant of `canonical` starts with.
///
/// The root's descendants are every key, so its prefix is empty.
#[must_use]
pub fn descendant_prefix(canonical: &str) -> String {
    if canonical.is_empty() {
        String::new()
    } else {
        format!("{canonical}{SEPARATOR}")
    }
}

/// Name of the immediate child of `prefix` that leads to `key`, if `key`
/// lies strictly below `prefix`.
///
/// `prefix` is a descendant prefix as returned by [`descendant_prefix`].
#[must_use]
pub fn immediate_child<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = key.strip_prefix(prefix)?;
    let name = rest.split(SEPARATOR).next().unwrap_or(rest);
    if name.is_empty() { None } else { Some(name) }
}
