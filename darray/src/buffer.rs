//! Buffer-growth core.
//!
//! Free functions over a contiguous byte buffer holding `count` elements of a
//! runtime `element_size`. Functions that may reallocate take the backing
//! `Vec<u8>`, whose length is always `capacity * element_size`; the rest take
//! a plain `&mut [u8]` and work on borrowed and owned memory alike. The count
//! lives outside of the buffer and is passed by reference, so arrays and
//! tables share this code despite different enclosing structs.
//!
//! Every function validates its arguments before touching the buffer: on
//! error, bytes, count and capacity are unchanged.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::slice::ChunksExact;

use crate::error::{DArrayError, Result};
use crate::growth::{calc_capacity, checked_byte_len};
use crate::index::{normalize_index, normalize_insert_index, normalize_range};

fn check_element_size(element_size: usize) -> Result<()> {
    if element_size == 0 {
        return Err(DArrayError::InvalidArgument {
            reason: "element size must be non-zero",
        });
    }
    Ok(())
}

/// Returns the number of used bytes, `count * element_size`.
fn check_count(elements: &[u8], count: usize, element_size: usize) -> Result<usize> {
    check_element_size(element_size)?;
    let used = checked_byte_len(count, element_size)?;
    if used > elements.len() {
        return Err(DArrayError::InvalidArgument {
            reason: "count exceeds buffer capacity",
        });
    }
    Ok(used)
}

fn check_value(value: &[u8], element_size: usize) -> Result<()> {
    if value.len() != element_size {
        return Err(DArrayError::ElementSizeMismatch {
            expected: element_size,
            actual: value.len(),
        });
    }
    Ok(())
}

/// Returns the number of elements in `values`.
fn check_values(values: &[u8], element_size: usize) -> Result<usize> {
    if values.len() % element_size != 0 {
        return Err(DArrayError::ElementSizeMismatch {
            expected: element_size,
            actual: values.len(),
        });
    }
    Ok(values.len() / element_size)
}

fn allocate_scratch<T>(items: usize) -> Result<Vec<T>> {
    let mut scratch = Vec::new();
    scratch
        .try_reserve_exact(items)
        .map_err(|_| DArrayError::AllocationFailed {
            bytes: items.saturating_mul(core::mem::size_of::<T>()),
        })?;
    Ok(scratch)
}

/// Number of element slots in the buffer.
#[must_use]
pub fn capacity(elements: &[u8], element_size: usize) -> usize {
    if element_size == 0 {
        0
    } else {
        elements.len() / element_size
    }
}

/// Grows the buffer to exactly `new_capacity` slots.
///
/// A request not larger than the current capacity is a no-op. New slots are
/// zero-filled.
///
/// # Errors
///
/// `CapacityOverflow` if the byte size wraps, `AllocationFailed` if the
/// allocator refuses.
pub fn grow_exact(elements: &mut Vec<u8>, element_size: usize, new_capacity: usize) -> Result<()> {
    check_element_size(element_size)?;
    let bytes = checked_byte_len(new_capacity, element_size)?;
    if bytes <= elements.len() {
        return Ok(());
    }
    elements
        .try_reserve_exact(bytes - elements.len())
        .map_err(|_| DArrayError::AllocationFailed { bytes })?;
    elements.resize(bytes, 0);
    trace!(
        "buffer grown to {} slots of {} bytes",
        new_capacity,
        element_size
    );
    Ok(())
}

/// Makes room for at least `required` elements, rounding the capacity up to
/// a power of two.
///
/// # Errors
///
/// See [`grow_exact`].
pub fn reserve(elements: &mut Vec<u8>, element_size: usize, required: usize) -> Result<()> {
    check_element_size(element_size)?;
    if required <= capacity(elements, element_size) {
        return Ok(());
    }
    grow_exact(elements, element_size, calc_capacity(required)?)
}

/// Releases the slots past `count`.
///
/// # Errors
///
/// `InvalidArgument` if `count` does not fit the buffer.
pub fn shrink_to_fit(elements: &mut Vec<u8>, count: usize, element_size: usize) -> Result<()> {
    let used = check_count(elements, count, element_size)?;
    elements.truncate(used);
    elements.shrink_to_fit();
    trace!("buffer shrunk to {} slots", count);
    Ok(())
}

fn insert_at(
    elements: &mut Vec<u8>,
    count: &mut usize,
    element_size: usize,
    position: usize,
    values: &[u8],
) -> Result<()> {
    let used = check_count(elements, *count, element_size)?;
    let added = check_values(values, element_size)?;
    if added == 0 {
        return Ok(());
    }
    let new_count = count
        .checked_add(added)
        .ok_or(DArrayError::CapacityOverflow {
            count: *count,
            element_size,
        })?;
    reserve(elements, element_size, new_count)?;

    let at = position * element_size;
    elements.copy_within(at..used, at + values.len());
    elements[at..at + values.len()].copy_from_slice(values);
    *count = new_count;
    Ok(())
}

/// Appends one element.
///
/// # Errors
///
/// `ElementSizeMismatch` if `value` is not one element long, or a growth error.
pub fn append(
    elements: &mut Vec<u8>,
    count: &mut usize,
    element_size: usize,
    value: &[u8],
) -> Result<()> {
    check_value(value, element_size)?;
    insert_at(elements, count, element_size, *count, value)
}

/// Appends a run of elements stored back to back in `values`.
///
/// # Errors
///
/// `ElementSizeMismatch` if `values` is not a whole number of elements, or a
/// growth error.
pub fn append_many(
    elements: &mut Vec<u8>,
    count: &mut usize,
    element_size: usize,
    values: &[u8],
) -> Result<()> {
    check_element_size(element_size)?;
    insert_at(elements, count, element_size, *count, values)
}

/// Inserts one element in front of the existing ones.
///
/// # Errors
///
/// As [`append`].
pub fn prepend(
    elements: &mut Vec<u8>,
    count: &mut usize,
    element_size: usize,
    value: &[u8],
) -> Result<()> {
    check_value(value, element_size)?;
    insert_at(elements, count, element_size, 0, value)
}

/// Inserts a run of elements in front of the existing ones.
///
/// # Errors
///
/// As [`append_many`].
pub fn prepend_many(
    elements: &mut Vec<u8>,
    count: &mut usize,
    element_size: usize,
    values: &[u8],
) -> Result<()> {
    check_element_size(element_size)?;
    insert_at(elements, count, element_size, 0, values)
}

/// Inserts one element so that it ends up at `index`.
///
/// `index` is an insertion position: `count` (or an equivalent negative
/// index) appends.
///
/// # Errors
///
/// `IndexOutOfBounds` for a bad position, otherwise as [`append`].
pub fn insert(
    elements: &mut Vec<u8>,
    count: &mut usize,
    element_size: usize,
    index: isize,
    value: &[u8],
) -> Result<()> {
    check_value(value, element_size)?;
    let position = normalize_insert_index(index, *count)?;
    insert_at(elements, count, element_size, position, value)
}

/// Inserts a run of elements starting at `index`.
///
/// # Errors
///
/// `IndexOutOfBounds` for a bad position, otherwise as [`append_many`].
pub fn insert_many(
    elements: &mut Vec<u8>,
    count: &mut usize,
    element_size: usize,
    index: isize,
    values: &[u8],
) -> Result<()> {
    check_element_size(element_size)?;
    let position = normalize_insert_index(index, *count)?;
    insert_at(elements, count, element_size, position, values)
}

fn remove_span(
    elements: &mut [u8],
    count: &mut usize,
    element_size: usize,
    used: usize,
    first: usize,
    last: usize,
) {
    elements.copy_within((last + 1) * element_size..used, first * element_size);
    *count -= last - first + 1;
}

/// Removes the element at `index`, closing the gap. Capacity is kept.
///
/// # Errors
///
/// `IndexOutOfBounds` if `index` does not address an element.
pub fn remove(
    elements: &mut [u8],
    count: &mut usize,
    element_size: usize,
    index: isize,
) -> Result<()> {
    let used = check_count(elements, *count, element_size)?;
    let position = normalize_index(index, *count)?;
    remove_span(elements, count, element_size, used, position, position);
    Ok(())
}

/// Removes the elements in the inclusive range `[start, end]`.
///
/// # Errors
///
/// `IndexOutOfBounds` or `InvalidRange` for bad bounds.
pub fn remove_range(
    elements: &mut [u8],
    count: &mut usize,
    element_size: usize,
    start: isize,
    end: isize,
) -> Result<()> {
    let used = check_count(elements, *count, element_size)?;
    let (first, last) = normalize_range(start, end, *count)?;
    remove_span(elements, count, element_size, used, first, last);
    Ok(())
}

fn check_shift(count: usize, amount: usize) -> Result<bool> {
    if amount == 0 {
        return Ok(false);
    }
    if amount >= count {
        return Err(DArrayError::ShiftTooLarge {
            amount,
            length: count,
        });
    }
    Ok(true)
}

/// Moves every element `amount` slots towards the front.
///
/// The first `amount` elements are dropped and the vacated tail is
/// zero-filled; the count stays the same.
///
/// # Errors
///
/// `ShiftTooLarge` if `amount >= count`: emptying goes through `clear`.
pub fn shift_left(
    elements: &mut [u8],
    count: usize,
    element_size: usize,
    amount: usize,
) -> Result<()> {
    let used = check_count(elements, count, element_size)?;
    if !check_shift(count, amount)? {
        return Ok(());
    }
    let span = amount * element_size;
    elements.copy_within(span..used, 0);
    elements[used - span..used].fill(0);
    Ok(())
}

/// Moves every element `amount` slots towards the back.
///
/// The last `amount` elements are dropped and the vacated head is
/// zero-filled; the count stays the same.
///
/// # Errors
///
/// `ShiftTooLarge` if `amount >= count`.
pub fn shift_right(
    elements: &mut [u8],
    count: usize,
    element_size: usize,
    amount: usize,
) -> Result<()> {
    let used = check_count(elements, count, element_size)?;
    if !check_shift(count, amount)? {
        return Ok(());
    }
    let span = amount * element_size;
    elements.copy_within(0..used - span, span);
    elements[..span].fill(0);
    Ok(())
}

/// Rotates the elements `amount` slots towards the front, wrapping around.
///
/// # Errors
///
/// `InvalidArgument` for an inconsistent buffer.
pub fn shift_left_circular(
    elements: &mut [u8],
    count: usize,
    element_size: usize,
    amount: usize,
) -> Result<()> {
    let used = check_count(elements, count, element_size)?;
    if count == 0 || amount % count == 0 {
        return Ok(());
    }
    elements[..used].rotate_left((amount % count) * element_size);
    Ok(())
}

/// Rotates the elements `amount` slots towards the back, wrapping around.
///
/// # Errors
///
/// `InvalidArgument` for an inconsistent buffer.
pub fn shift_right_circular(
    elements: &mut [u8],
    count: usize,
    element_size: usize,
    amount: usize,
) -> Result<()> {
    let used = check_count(elements, count, element_size)?;
    if count == 0 || amount % count == 0 {
        return Ok(());
    }
    elements[..used].rotate_right((amount % count) * element_size);
    Ok(())
}

/// Reverses the element order in place.
///
/// # Errors
///
/// `InvalidArgument` for an inconsistent buffer.
pub fn reverse(elements: &mut [u8], count: usize, element_size: usize) -> Result<()> {
    check_count(elements, count, element_size)?;
    for front in 0..count / 2 {
        let back = count - 1 - front;
        let (head, tail) = elements.split_at_mut(back * element_size);
        head[front * element_size..(front + 1) * element_size]
            .swap_with_slice(&mut tail[..element_size]);
    }
    Ok(())
}

/// Sorts whole elements by `compare`. The order of equal elements is not
/// preserved.
///
/// # Errors
///
/// `AllocationFailed` if the scratch space cannot be allocated.
pub fn sort<F>(elements: &mut [u8], count: usize, element_size: usize, mut compare: F) -> Result<()>
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    let used = check_count(elements, count, element_size)?;
    if count <= 1 {
        return Ok(());
    }

    let mut order = allocate_scratch::<usize>(count)?;
    order.extend(0..count);
    let data = &elements[..used];
    order.sort_unstable_by(|&a, &b| {
        compare(
            &data[a * element_size..(a + 1) * element_size],
            &data[b * element_size..(b + 1) * element_size],
        )
    });

    let mut sorted = allocate_scratch::<u8>(used)?;
    for &position in &order {
        sorted.extend_from_slice(&data[position * element_size..(position + 1) * element_size]);
    }
    elements[..used].copy_from_slice(&sorted);
    Ok(())
}

/// The element at `index`.
///
/// # Errors
///
/// `IndexOutOfBounds` if `index` does not address an element.
pub fn element(elements: &[u8], count: usize, element_size: usize, index: isize) -> Result<&[u8]> {
    check_count(elements, count, element_size)?;
    let at = normalize_index(index, count)? * element_size;
    Ok(&elements[at..at + element_size])
}

/// Mutable access to the element at `index`.
///
/// # Errors
///
/// `IndexOutOfBounds` if `index` does not address an element.
pub fn element_mut(
    elements: &mut [u8],
    count: usize,
    element_size: usize,
    index: isize,
) -> Result<&mut [u8]> {
    check_count(elements, count, element_size)?;
    let at = normalize_index(index, count)? * element_size;
    Ok(&mut elements[at..at + element_size])
}

/// Overwrites the element at `index` with `value`.
///
/// # Errors
///
/// `ElementSizeMismatch` or `IndexOutOfBounds`.
pub fn set_element(
    elements: &mut [u8],
    count: usize,
    element_size: usize,
    index: isize,
    value: &[u8],
) -> Result<()> {
    check_value(value, element_size)?;
    element_mut(elements, count, element_size, index)?.copy_from_slice(value);
    Ok(())
}

fn used_chunks(elements: &[u8], count: usize, element_size: usize) -> Result<ChunksExact<'_, u8>> {
    let used = check_count(elements, count, element_size)?;
    Ok(elements[..used].chunks_exact(element_size))
}

/// Position of the first element equal to `value` under `compare`.
///
/// # Errors
///
/// `ElementSizeMismatch` if `value` is not one element long.
pub fn find<F>(
    elements: &[u8],
    count: usize,
    element_size: usize,
    value: &[u8],
    mut compare: F,
) -> Result<Option<usize>>
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    check_value(value, element_size)?;
    Ok(used_chunks(elements, count, element_size)?
        .position(|candidate| compare(candidate, value) == Ordering::Equal))
}

/// Position of the last element equal to `value` under `compare`.
///
/// # Errors
///
/// `ElementSizeMismatch` if `value` is not one element long.
pub fn find_last<F>(
    elements: &[u8],
    count: usize,
    element_size: usize,
    value: &[u8],
    mut compare: F,
) -> Result<Option<usize>>
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    check_value(value, element_size)?;
    Ok(used_chunks(elements, count, element_size)?
        .rposition(|candidate| compare(candidate, value) == Ordering::Equal))
}

/// Whether any element equals `value` under `compare`.
///
/// # Errors
///
/// `ElementSizeMismatch` if `value` is not one element long.
pub fn contains<F>(
    elements: &[u8],
    count: usize,
    element_size: usize,
    value: &[u8],
    compare: F,
) -> Result<bool>
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    Ok(find(elements, count, element_size, value, compare)?.is_some())
}

/// Number of elements equal to `value` under `compare`.
///
/// # Errors
///
/// `ElementSizeMismatch` if `value` is not one element long.
pub fn count_value<F>(
    elements: &[u8],
    count: usize,
    element_size: usize,
    value: &[u8],
    mut compare: F,
) -> Result<usize>
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    check_value(value, element_size)?;
    Ok(used_chunks(elements, count, element_size)?
        .filter(|candidate| compare(candidate, value) == Ordering::Equal)
        .count())
}

/// Binary search over elements sorted ascending by `compare`.
///
/// Returns the index of an equal element on a hit. On a miss, returns the
/// insertion point clamped to `[0, count - 1]`, so the result always names an
/// existing neighbour. `None` only for an empty buffer.
///
/// # Errors
///
/// `ElementSizeMismatch` if `value` is not one element long.
pub fn find_closest<F>(
    elements: &[u8],
    count: usize,
    element_size: usize,
    value: &[u8],
    mut compare: F,
) -> Result<Option<usize>>
where
    F: FnMut(&[u8], &[u8]) -> Ordering,
{
    check_value(value, element_size)?;
    check_count(elements, count, element_size)?;
    if count == 0 {
        return Ok(None);
    }

    let mut low = 0;
    let mut high = count;
    while low < high {
        let mid = low + (high - low) / 2;
        let candidate = &elements[mid * element_size..(mid + 1) * element_size];
        match compare(candidate, value) {
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
            Ordering::Equal => return Ok(Some(mid)),
        }
    }
    Ok(Some(low.min(count - 1)))
}

/// Validates `count + amount` as a new element count.
///
/// Performs no reallocation; the caller grows the buffer and sets the count.
///
/// # Errors
///
/// `InvalidArgument` when shrinking below zero, `CapacityOverflow` when the
/// count or its byte size wraps.
pub fn resize_by_amount(count: usize, element_size: usize, amount: isize) -> Result<usize> {
    check_element_size(element_size)?;
    let new_count = if amount >= 0 {
        count
            .checked_add(amount.unsigned_abs())
            .ok_or(DArrayError::CapacityOverflow {
                count,
                element_size,
            })?
    } else {
        count
            .checked_sub(amount.unsigned_abs())
            .ok_or(DArrayError::InvalidArgument {
                reason: "resize amount exceeds element count",
            })?
    };
    checked_byte_len(new_count, element_size)?;
    Ok(new_count)
}

/// Validates `count * factor` (rounded down) as a new element count.
///
/// # Errors
///
/// `InvalidArgument` for a negative or non-finite factor,
/// `CapacityOverflow` when the result does not fit.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn resize_by_factor(count: usize, element_size: usize, factor: f64) -> Result<usize> {
    check_element_size(element_size)?;
    if !factor.is_finite() || factor < 0.0 {
        return Err(DArrayError::InvalidArgument {
            reason: "resize factor must be finite and non-negative",
        });
    }
    let scaled = count as f64 * factor;
    if scaled >= usize::MAX as f64 {
        return Err(DArrayError::CapacityOverflow {
            count,
            element_size,
        });
    }
    let new_count = scaled as usize;
    checked_byte_len(new_count, element_size)?;
    Ok(new_count)
}
