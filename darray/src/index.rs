//! Signed index normalization.
//!
//! Non-negative indices address from the start, negative ones from the end
//! (`-1` is the last element).

use crate::error::{DArrayError, Result};

#[allow(clippy::cast_sign_loss)]
fn resolve(index: isize, count: usize) -> Option<usize> {
    if index >= 0 {
        Some(index as usize)
    } else {
        count.checked_sub(index.unsigned_abs())
    }
}

/// Converts a signed index into a position in `[0, count)`.
///
/// # Errors
///
/// `DArrayError::IndexOutOfBounds` if the position is outside of the
/// elements, including any index when `count` is zero.
pub fn normalize_index(index: isize, count: usize) -> Result<usize> {
    match resolve(index, count) {
        Some(position) if position < count => Ok(position),
        _ => Err(DArrayError::IndexOutOfBounds {
            index,
            length: count,
        }),
    }
}

/// Converts a signed index into an insertion position in `[0, count]`.
///
/// Position `count` means append.
///
/// # Errors
///
/// `DArrayError::IndexOutOfBounds` if the position is past the end.
pub fn normalize_insert_index(index: isize, count: usize) -> Result<usize> {
    match resolve(index, count) {
        Some(position) if position <= count => Ok(position),
        _ => Err(DArrayError::IndexOutOfBounds {
            index,
            length: count,
        }),
    }
}

/// Normalizes an inclusive `[start, end]` range of element indices.
///
/// # Errors
///
/// `DArrayError::IndexOutOfBounds` if either bound is invalid,
/// `DArrayError::InvalidRange` if `start` lands after `end`.
pub fn normalize_range(start: isize, end: isize, count: usize) -> Result<(usize, usize)> {
    let first = normalize_index(start, count)?;
    let last = normalize_index(end, count)?;
    if first > last {
        return Err(DArrayError::InvalidRange {
            start: first,
            end: last,
        });
    }
    Ok((first, last))
}
