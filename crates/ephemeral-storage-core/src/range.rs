//! Byte-range extraction for partial reads.
//!
//! Ranges are inclusive on both ends. Bounds are signed so that a negative
//! lower bound coming from a caller is rejected rather than wrapped.

use std::ops::RangeInclusive;

use bytes::Bytes;

use crate::error::StorageError;

/// Slice `payload` according to an optional inclusive `range`.
///
/// Without a range the payload is returned unchanged. With a range, the
/// bounds must satisfy `0 <= lower <= upper < payload.len()`.
///
/// # Errors
///
/// Returns [`StorageError::InvalidBuffer`] if the range falls outside the
/// payload or is inverted.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use ephemeral_storage_core::range::extract_range;
///
/// let payload = Bytes::from("hello-ephemeral");
/// let slice = extract_range(&payload, Some(6..=14)).unwrap();
/// assert_eq!(slice.as_ref(), b"ephemeral");
/// assert!(extract_range(&payload, Some(99..=100)).is_err());
/// ```
pub fn extract_range(
    payload: &Bytes,
    range: Option<RangeInclusive<i64>>,
) -> Result<Bytes, StorageError> {
    let Some(range) = range else {
        return Ok(payload.clone());
    };

    let (lower, upper) = (*range.start(), *range.end());
    let length = payload.len() as u64;
    let invalid = || StorageError::InvalidBuffer {
        lower,
        upper,
        length,
    };

    let start = usize::try_from(lower).map_err(|_| invalid())?;
    let end = usize::try_from(upper).map_err(|_| invalid())?;
    if start > end || end >= payload.len() {
        return Err(invalid());
    }

    let slice = payload.slice(start..=end);
    if slice.len() != end - start + 1 {
        return Err(invalid());
    }
    Ok(slice)
}
