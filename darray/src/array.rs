use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::buffer;
use crate::error::{DArrayError, Result};
use crate::growth::checked_byte_len;
use crate::index::{normalize_index, normalize_range};
use crate::iter::{Elements, ElementsRev};

const WORD_SIZE: usize = core::mem::size_of::<usize>();

/// One argument of [`DArray::from_args`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayArg<'a> {
    /// Value passed by word, for element sizes up to the pointer width.
    /// The low-order `element_size` bytes become the element.
    Word(usize),
    /// Value passed by reference, for element sizes of any width.
    /// `None` zero-fills the slot.
    Bytes(Option<&'a [u8]>),
}

impl ArrayArg<'_> {
    fn write_into(&self, element_size: usize, out: &mut Vec<u8>) -> Result<()> {
        match self {
            ArrayArg::Word(value) => {
                if element_size > WORD_SIZE {
                    return Err(DArrayError::InvalidArgument {
                        reason: "word argument for an element wider than a pointer",
                    });
                }
                let bytes = value.to_ne_bytes();
                if cfg!(target_endian = "big") {
                    out.extend_from_slice(&bytes[WORD_SIZE - element_size..]);
                } else {
                    out.extend_from_slice(&bytes[..element_size]);
                }
            }
            ArrayArg::Bytes(Some(bytes)) => {
                if bytes.len() != element_size {
                    return Err(DArrayError::ElementSizeMismatch {
                        expected: element_size,
                        actual: bytes.len(),
                    });
                }
                out.extend_from_slice(bytes);
            }
            ArrayArg::Bytes(None) => out.resize(out.len() + element_size, 0),
        }
        Ok(())
    }
}

/// A growable array of fixed-size elements over a contiguous byte buffer.
///
/// The array does not store its element size: every call that needs it takes
/// `element_size`, and the caller must pass the same value each time. See
/// [`crate::DArraySized`] for the variant that remembers it.
///
/// Elements are opaque byte spans. Elements that hold handles to other
/// resources are the caller's responsibility; dropping the array releases only
/// its own buffer.
#[derive(Debug, Clone, Default)]
pub struct DArray {
    elements: Vec<u8>,
    count: usize,
}

impl DArray {
    /// Creates an empty array with room for `capacity` elements.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a zero element size, `CapacityOverflow` or
    /// `AllocationFailed` if the buffer cannot be allocated.
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        let mut elements = Vec::new();
        buffer::grow_exact(&mut elements, element_size, capacity)?;
        Ok(Self { elements, count: 0 })
    }

    fn collect_bytes<'b, I>(element_size: usize, count: usize, chunks: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'b [u8]>,
    {
        let mut array = Self::new(element_size, count)?;
        let mut at = 0;
        for chunk in chunks {
            array.elements[at..at + element_size].copy_from_slice(chunk);
            at += element_size;
        }
        array.count = at / element_size;
        Ok(array)
    }

    /// Creates an array holding a copy of `elements`, stored back to back.
    ///
    /// # Errors
    ///
    /// `ElementSizeMismatch` if `elements` is not a whole number of elements.
    pub fn from_slice(element_size: usize, elements: &[u8]) -> Result<Self> {
        let mut array = Self::new(element_size, elements.len() / element_size.max(1))?;
        buffer::append_many(
            &mut array.elements,
            &mut array.count,
            element_size,
            elements,
        )?;
        Ok(array)
    }

    /// Creates an array from a list of literal arguments.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for a `Word` wider than the element size allows,
    /// `ElementSizeMismatch` for a `Bytes` of the wrong length.
    pub fn from_args(element_size: usize, args: &[ArrayArg<'_>]) -> Result<Self> {
        let mut array = Self::new(element_size, args.len())?;
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(checked_byte_len(args.len(), element_size)?)
            .map_err(|_| DArrayError::AllocationFailed {
                bytes: args.len() * element_size,
            })?;
        for arg in args {
            arg.write_into(element_size, &mut bytes)?;
        }
        buffer::append_many(&mut array.elements, &mut array.count, element_size, &bytes)?;
        Ok(array)
    }

    /// Creates an array of `count` copies of `value`.
    ///
    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn fill(element_size: usize, value: &[u8], count: usize) -> Result<Self> {
        if value.len() != element_size {
            return Err(DArrayError::ElementSizeMismatch {
                expected: element_size,
                actual: value.len(),
            });
        }
        Self::collect_bytes(element_size, count, core::iter::repeat(value).take(count))
    }

    /// Concatenates `sources` into a new array.
    ///
    /// The total size is computed up front so the result is allocated once.
    /// All sources are read with the same `element_size`; their consistency
    /// is not checked.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if a source is shorter than its count implies,
    /// `CapacityOverflow` if the total does not fit.
    pub fn merge(element_size: usize, sources: &[&DArray]) -> Result<Self> {
        let mut total: usize = 0;
        for source in sources {
            total = total
                .checked_add(source.count)
                .ok_or(DArrayError::CapacityOverflow {
                    count: total,
                    element_size,
                })?;
        }
        let mut merged = Self::new(element_size, total)?;
        for source in sources {
            buffer::append_many(
                &mut merged.elements,
                &mut merged.count,
                element_size,
                source.as_bytes(element_size)?,
            )?;
        }
        Ok(merged)
    }

    /// Copy of the whole array with capacity trimmed to its length.
    ///
    /// # Errors
    ///
    /// As [`DArray::from_slice`].
    pub fn copy(&self, element_size: usize) -> Result<Self> {
        Self::from_slice(element_size, self.as_bytes(element_size)?)
    }

    /// Copy of the whole array in reverse order.
    ///
    /// # Errors
    ///
    /// As [`DArray::copy`].
    pub fn copy_reverse(&self, element_size: usize) -> Result<Self> {
        let bytes = self.as_bytes(element_size)?;
        Self::collect_bytes(
            element_size,
            self.count,
            Elements::new(bytes, element_size).rev(),
        )
    }

    /// Copy of the inclusive range `[start, end]`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` or `InvalidRange` for bad bounds.
    pub fn copy_range(&self, element_size: usize, start: isize, end: isize) -> Result<Self> {
        let (first, last) = normalize_range(start, end, self.count)?;
        let bytes = self.as_bytes(element_size)?;
        Self::from_slice(
            element_size,
            &bytes[first * element_size..(last + 1) * element_size],
        )
    }

    /// Copy of the inclusive range `[start, end]` in reverse order.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` or `InvalidRange` for bad bounds.
    pub fn copy_range_reverse(
        &self,
        element_size: usize,
        start: isize,
        end: isize,
    ) -> Result<Self> {
        let (first, last) = normalize_range(start, end, self.count)?;
        let bytes = self.as_bytes(element_size)?;
        let span = &bytes[first * element_size..(last + 1) * element_size];
        Self::collect_bytes(
            element_size,
            last - first + 1,
            Elements::new(span, element_size).rev(),
        )
    }

    fn slice_bytes(
        &self,
        element_size: usize,
        first: usize,
        last: usize,
        reversed: bool,
    ) -> Result<Vec<u8>> {
        let bytes = self.as_bytes(element_size)?;
        let span = &bytes[first * element_size..(last + 1) * element_size];
        let mut out = Vec::new();
        out.try_reserve_exact(span.len())
            .map_err(|_| DArrayError::AllocationFailed { bytes: span.len() })?;
        if reversed {
            Elements::new(span, element_size)
                .rev()
                .for_each(|element| out.extend_from_slice(element));
        } else {
            out.extend_from_slice(span);
        }
        Ok(out)
    }

    /// Copies the elements from `start` to the end into a raw byte buffer.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `start` does not address an element.
    pub fn slice(&self, element_size: usize, start: isize) -> Result<Vec<u8>> {
        let first = normalize_index(start, self.count)?;
        self.slice_bytes(element_size, first, self.count - 1, false)
    }

    /// As [`DArray::slice`], in reverse order.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `start` does not address an element.
    pub fn slice_reverse(&self, element_size: usize, start: isize) -> Result<Vec<u8>> {
        let first = normalize_index(start, self.count)?;
        self.slice_bytes(element_size, first, self.count - 1, true)
    }

    /// Copies the inclusive range `[start, end]` into a raw byte buffer.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` or `InvalidRange` for bad bounds.
    pub fn slice_range(&self, element_size: usize, start: isize, end: isize) -> Result<Vec<u8>> {
        let (first, last) = normalize_range(start, end, self.count)?;
        self.slice_bytes(element_size, first, last, false)
    }

    /// As [`DArray::slice_range`], in reverse order.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` or `InvalidRange` for bad bounds.
    pub fn slice_range_reverse(
        &self,
        element_size: usize,
        start: isize,
        end: isize,
    ) -> Result<Vec<u8>> {
        let (first, last) = normalize_range(start, end, self.count)?;
        self.slice_bytes(element_size, first, last, true)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[must_use]
    pub fn capacity(&self, element_size: usize) -> usize {
        buffer::capacity(&self.elements, element_size)
    }

    /// The used part of the buffer, `len() * element_size` bytes.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `element_size` does not match the buffer.
    pub fn as_bytes(&self, element_size: usize) -> Result<&[u8]> {
        let used = checked_byte_len(self.count, element_size)?;
        self.elements
            .get(..used)
            .ok_or(DArrayError::InvalidArgument {
                reason: "count exceeds buffer capacity",
            })
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` does not address an element.
    pub fn get(&self, element_size: usize, index: isize) -> Result<&[u8]> {
        buffer::element(&self.elements, self.count, element_size, index)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` does not address an element.
    pub fn get_mut(&mut self, element_size: usize, index: isize) -> Result<&mut [u8]> {
        buffer::element_mut(&mut self.elements, self.count, element_size, index)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or `IndexOutOfBounds`.
    pub fn set(&mut self, element_size: usize, index: isize, value: &[u8]) -> Result<()> {
        buffer::set_element(&mut self.elements, self.count, element_size, index, value)
    }

    /// # Errors
    ///
    /// Growth errors, see [`buffer::reserve`].
    pub fn reserve(&mut self, element_size: usize, capacity: usize) -> Result<()> {
        buffer::reserve(&mut self.elements, element_size, capacity)
    }

    /// # Errors
    ///
    /// `InvalidArgument` if `element_size` does not match the buffer.
    pub fn shrink_to_fit(&mut self, element_size: usize) -> Result<()> {
        buffer::shrink_to_fit(&mut self.elements, self.count, element_size)
    }

    /// Sets the element count, growing the buffer if needed. New elements are
    /// zero-filled.
    ///
    /// Pairs with [`buffer::resize_by_amount`] and [`buffer::resize_by_factor`].
    ///
    /// # Errors
    ///
    /// Growth errors, see [`buffer::reserve`].
    pub fn resize(&mut self, element_size: usize, new_count: usize) -> Result<()> {
        let used = checked_byte_len(self.count, element_size)?;
        let new_used = checked_byte_len(new_count, element_size)?;
        buffer::reserve(&mut self.elements, element_size, new_count)?;
        if new_used > used {
            self.elements[used..new_used].fill(0);
        }
        self.count = new_count;
        Ok(())
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or a growth error; the array is unchanged on error.
    pub fn append(&mut self, element_size: usize, value: &[u8]) -> Result<()> {
        buffer::append(&mut self.elements, &mut self.count, element_size, value)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or a growth error.
    pub fn append_many(&mut self, element_size: usize, values: &[u8]) -> Result<()> {
        buffer::append_many(&mut self.elements, &mut self.count, element_size, values)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or a growth error.
    pub fn prepend(&mut self, element_size: usize, value: &[u8]) -> Result<()> {
        buffer::prepend(&mut self.elements, &mut self.count, element_size, value)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or a growth error.
    pub fn prepend_many(&mut self, element_size: usize, values: &[u8]) -> Result<()> {
        buffer::prepend_many(&mut self.elements, &mut self.count, element_size, values)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds`, `ElementSizeMismatch` or a growth error.
    pub fn insert(&mut self, element_size: usize, index: isize, value: &[u8]) -> Result<()> {
        buffer::insert(&mut self.elements, &mut self.count, element_size, index, value)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds`, `ElementSizeMismatch` or a growth error.
    pub fn insert_many(&mut self, element_size: usize, index: isize, values: &[u8]) -> Result<()> {
        buffer::insert_many(&mut self.elements, &mut self.count, element_size, index, values)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` does not address an element.
    pub fn remove(&mut self, element_size: usize, index: isize) -> Result<()> {
        buffer::remove(&mut self.elements, &mut self.count, element_size, index)
    }

    /// Removes the inclusive range `[start, end]`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` or `InvalidRange` for bad bounds.
    pub fn remove_range(&mut self, element_size: usize, start: isize, end: isize) -> Result<()> {
        buffer::remove_range(&mut self.elements, &mut self.count, element_size, start, end)
    }

    /// Removes the last element, copying it into `out` first when given.
    ///
    /// # Errors
    ///
    /// `EmptyArray`, or `ElementSizeMismatch` if `out` has the wrong length.
    pub fn pop(&mut self, element_size: usize, out: Option<&mut [u8]>) -> Result<()> {
        if self.count == 0 {
            return Err(DArrayError::EmptyArray);
        }
        let last = buffer::element(&self.elements, self.count, element_size, -1)?;
        if let Some(out) = out {
            if out.len() != element_size {
                return Err(DArrayError::ElementSizeMismatch {
                    expected: element_size,
                    actual: out.len(),
                });
            }
            out.copy_from_slice(last);
        }
        self.count -= 1;
        Ok(())
    }

    /// Drops all elements, keeping the buffer.
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// # Errors
    ///
    /// `ShiftTooLarge` if `amount >= len()`.
    pub fn shift_left(&mut self, element_size: usize, amount: usize) -> Result<()> {
        buffer::shift_left(&mut self.elements, self.count, element_size, amount)
    }

    /// # Errors
    ///
    /// `ShiftTooLarge` if `amount >= len()`.
    pub fn shift_right(&mut self, element_size: usize, amount: usize) -> Result<()> {
        buffer::shift_right(&mut self.elements, self.count, element_size, amount)
    }

    /// # Errors
    ///
    /// `InvalidArgument` if `element_size` does not match the buffer.
    pub fn shift_left_circular(&mut self, element_size: usize, amount: usize) -> Result<()> {
        buffer::shift_left_circular(&mut self.elements, self.count, element_size, amount)
    }

    /// # Errors
    ///
    /// `InvalidArgument` if `element_size` does not match the buffer.
    pub fn shift_right_circular(&mut self, element_size: usize, amount: usize) -> Result<()> {
        buffer::shift_right_circular(&mut self.elements, self.count, element_size, amount)
    }

    /// # Errors
    ///
    /// `InvalidArgument` if `element_size` does not match the buffer.
    pub fn reverse(&mut self, element_size: usize) -> Result<()> {
        buffer::reverse(&mut self.elements, self.count, element_size)
    }

    /// # Errors
    ///
    /// `AllocationFailed` if the scratch space cannot be allocated.
    pub fn sort<F>(&mut self, element_size: usize, compare: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        buffer::sort(&mut self.elements, self.count, element_size, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn find<F>(&self, element_size: usize, value: &[u8], compare: F) -> Result<Option<usize>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        buffer::find(&self.elements, self.count, element_size, value, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn find_last<F>(
        &self,
        element_size: usize,
        value: &[u8],
        compare: F,
    ) -> Result<Option<usize>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        buffer::find_last(&self.elements, self.count, element_size, value, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn contains<F>(&self, element_size: usize, value: &[u8], compare: F) -> Result<bool>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        buffer::contains(&self.elements, self.count, element_size, value, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn count_value<F>(&self, element_size: usize, value: &[u8], compare: F) -> Result<usize>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        buffer::count_value(&self.elements, self.count, element_size, value, compare)
    }

    /// Nearest element to `value` in an array sorted by `compare`, see
    /// [`buffer::find_closest`].
    ///
    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn find_closest<F>(
        &self,
        element_size: usize,
        value: &[u8],
        compare: F,
    ) -> Result<Option<usize>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        buffer::find_closest(&self.elements, self.count, element_size, value, compare)
    }

    /// Returns an iterator over the elements.
    ///
    /// Yields nothing if `element_size` does not match the buffer.
    #[must_use]
    pub fn iter(&self, element_size: usize) -> Elements<'_> {
        Elements::new(self.as_bytes(element_size).unwrap_or(&[]), element_size)
    }

    /// Returns a reverse iterator over the elements.
    #[must_use]
    pub fn iter_rev(&self, element_size: usize) -> ElementsRev<'_> {
        self.iter(element_size).rev()
    }
}
