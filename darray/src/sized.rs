use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::array::{ArrayArg, DArray};
use crate::error::{DArrayError, Result};
use crate::iter::{Elements, ElementsRev};

/// A [`DArray`] that remembers its element size.
///
/// Behaves exactly like the plain array called with the stored size. The one
/// difference is [`DArraySized::merge`], which rejects sources declared with
/// different element sizes.
#[derive(Debug, Clone)]
pub struct DArraySized {
    array: DArray,
    element_size: usize,
}

impl DArraySized {
    /// # Errors
    ///
    /// See [`DArray::new`].
    pub fn new(element_size: usize, capacity: usize) -> Result<Self> {
        Ok(Self {
            array: DArray::new(element_size, capacity)?,
            element_size,
        })
    }

    /// Wraps an existing array whose elements are `element_size` bytes.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if the array's buffer cannot hold its count at that size.
    pub fn from_array(array: DArray, element_size: usize) -> Result<Self> {
        array.as_bytes(element_size)?;
        Ok(Self {
            array,
            element_size,
        })
    }

    /// # Errors
    ///
    /// See [`DArray::from_slice`].
    pub fn from_slice(element_size: usize, elements: &[u8]) -> Result<Self> {
        Self::from_array(DArray::from_slice(element_size, elements)?, element_size)
    }

    /// # Errors
    ///
    /// See [`DArray::from_args`].
    pub fn from_args(element_size: usize, args: &[ArrayArg<'_>]) -> Result<Self> {
        Self::from_array(DArray::from_args(element_size, args)?, element_size)
    }

    /// # Errors
    ///
    /// See [`DArray::fill`].
    pub fn fill(element_size: usize, value: &[u8], count: usize) -> Result<Self> {
        Self::from_array(DArray::fill(element_size, value, count)?, element_size)
    }

    /// Concatenates `sources`, which must all declare the same element size.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` for an empty source list, `ElementSizeMismatch` if
    /// the declared sizes differ, otherwise as [`DArray::merge`].
    pub fn merge(sources: &[&DArraySized]) -> Result<Self> {
        let element_size = sources
            .first()
            .ok_or(DArrayError::InvalidArgument {
                reason: "nothing to merge",
            })?
            .element_size;
        if let Some(odd) = sources.iter().find(|s| s.element_size != element_size) {
            return Err(DArrayError::ElementSizeMismatch {
                expected: element_size,
                actual: odd.element_size,
            });
        }
        let arrays: Vec<&DArray> = sources.iter().map(|s| &s.array).collect();
        Self::from_array(DArray::merge(element_size, &arrays)?, element_size)
    }

    /// # Errors
    ///
    /// See [`DArray::copy`].
    pub fn copy(&self) -> Result<Self> {
        self.wrap(self.array.copy(self.element_size)?)
    }

    /// # Errors
    ///
    /// See [`DArray::copy_reverse`].
    pub fn copy_reverse(&self) -> Result<Self> {
        self.wrap(self.array.copy_reverse(self.element_size)?)
    }

    /// # Errors
    ///
    /// See [`DArray::copy_range`].
    pub fn copy_range(&self, start: isize, end: isize) -> Result<Self> {
        self.wrap(self.array.copy_range(self.element_size, start, end)?)
    }

    /// # Errors
    ///
    /// See [`DArray::copy_range_reverse`].
    pub fn copy_range_reverse(&self, start: isize, end: isize) -> Result<Self> {
        self.wrap(self.array.copy_range_reverse(self.element_size, start, end)?)
    }

    fn wrap(&self, array: DArray) -> Result<Self> {
        Ok(Self {
            array,
            element_size: self.element_size,
        })
    }

    /// # Errors
    ///
    /// See [`DArray::slice`].
    pub fn slice(&self, start: isize) -> Result<Vec<u8>> {
        self.array.slice(self.element_size, start)
    }

    /// # Errors
    ///
    /// See [`DArray::slice_reverse`].
    pub fn slice_reverse(&self, start: isize) -> Result<Vec<u8>> {
        self.array.slice_reverse(self.element_size, start)
    }

    /// # Errors
    ///
    /// See [`DArray::slice_range`].
    pub fn slice_range(&self, start: isize, end: isize) -> Result<Vec<u8>> {
        self.array.slice_range(self.element_size, start, end)
    }

    /// # Errors
    ///
    /// See [`DArray::slice_range_reverse`].
    pub fn slice_range_reverse(&self, start: isize, end: isize) -> Result<Vec<u8>> {
        self.array
            .slice_range_reverse(self.element_size, start, end)
    }

    #[must_use]
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.array.capacity(self.element_size)
    }

    #[must_use]
    pub fn as_array(&self) -> &DArray {
        &self.array
    }

    #[must_use]
    pub fn into_array(self) -> DArray {
        self.array
    }

    /// The used part of the buffer.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        // The stored size always matches the buffer
        self.array.as_bytes(self.element_size).unwrap_or(&[])
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` does not address an element.
    pub fn get(&self, index: isize) -> Result<&[u8]> {
        self.array.get(self.element_size, index)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` does not address an element.
    pub fn get_mut(&mut self, index: isize) -> Result<&mut [u8]> {
        self.array.get_mut(self.element_size, index)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or `IndexOutOfBounds`.
    pub fn set(&mut self, index: isize, value: &[u8]) -> Result<()> {
        self.array.set(self.element_size, index, value)
    }

    /// # Errors
    ///
    /// Growth errors.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        self.array.reserve(self.element_size, capacity)
    }

    /// # Errors
    ///
    /// Never fails for a consistent array.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        self.array.shrink_to_fit(self.element_size)
    }

    /// # Errors
    ///
    /// Growth errors.
    pub fn resize(&mut self, new_count: usize) -> Result<()> {
        self.array.resize(self.element_size, new_count)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or a growth error.
    pub fn append(&mut self, value: &[u8]) -> Result<()> {
        self.array.append(self.element_size, value)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or a growth error.
    pub fn append_many(&mut self, values: &[u8]) -> Result<()> {
        self.array.append_many(self.element_size, values)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or a growth error.
    pub fn prepend(&mut self, value: &[u8]) -> Result<()> {
        self.array.prepend(self.element_size, value)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` or a growth error.
    pub fn prepend_many(&mut self, values: &[u8]) -> Result<()> {
        self.array.prepend_many(self.element_size, values)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds`, `ElementSizeMismatch` or a growth error.
    pub fn insert(&mut self, index: isize, value: &[u8]) -> Result<()> {
        self.array.insert(self.element_size, index, value)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds`, `ElementSizeMismatch` or a growth error.
    pub fn insert_many(&mut self, index: isize, values: &[u8]) -> Result<()> {
        self.array.insert_many(self.element_size, index, values)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` does not address an element.
    pub fn remove(&mut self, index: isize) -> Result<()> {
        self.array.remove(self.element_size, index)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` or `InvalidRange` for bad bounds.
    pub fn remove_range(&mut self, start: isize, end: isize) -> Result<()> {
        self.array.remove_range(self.element_size, start, end)
    }

    /// # Errors
    ///
    /// `EmptyArray`, or `ElementSizeMismatch` if `out` has the wrong length.
    pub fn pop(&mut self, out: Option<&mut [u8]>) -> Result<()> {
        self.array.pop(self.element_size, out)
    }

    pub fn clear(&mut self) {
        self.array.clear();
    }

    /// # Errors
    ///
    /// `ShiftTooLarge` if `amount >= len()`.
    pub fn shift_left(&mut self, amount: usize) -> Result<()> {
        self.array.shift_left(self.element_size, amount)
    }

    /// # Errors
    ///
    /// `ShiftTooLarge` if `amount >= len()`.
    pub fn shift_right(&mut self, amount: usize) -> Result<()> {
        self.array.shift_right(self.element_size, amount)
    }

    /// # Errors
    ///
    /// Never fails for a consistent array.
    pub fn shift_left_circular(&mut self, amount: usize) -> Result<()> {
        self.array.shift_left_circular(self.element_size, amount)
    }

    /// # Errors
    ///
    /// Never fails for a consistent array.
    pub fn shift_right_circular(&mut self, amount: usize) -> Result<()> {
        self.array.shift_right_circular(self.element_size, amount)
    }

    /// # Errors
    ///
    /// Never fails for a consistent array.
    pub fn reverse(&mut self) -> Result<()> {
        self.array.reverse(self.element_size)
    }

    /// # Errors
    ///
    /// `AllocationFailed` if the scratch space cannot be allocated.
    pub fn sort<F>(&mut self, compare: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.array.sort(self.element_size, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn find<F>(&self, value: &[u8], compare: F) -> Result<Option<usize>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.array.find(self.element_size, value, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn find_last<F>(&self, value: &[u8], compare: F) -> Result<Option<usize>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.array.find_last(self.element_size, value, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn contains<F>(&self, value: &[u8], compare: F) -> Result<bool>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.array.contains(self.element_size, value, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn count_value<F>(&self, value: &[u8], compare: F) -> Result<usize>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.array.count_value(self.element_size, value, compare)
    }

    /// # Errors
    ///
    /// `ElementSizeMismatch` if `value` is not one element long.
    pub fn find_closest<F>(&self, value: &[u8], compare: F) -> Result<Option<usize>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.array.find_closest(self.element_size, value, compare)
    }

    #[must_use]
    pub fn iter(&self) -> Elements<'_> {
        self.array.iter(self.element_size)
    }

    #[must_use]
    pub fn iter_rev(&self) -> ElementsRev<'_> {
        self.array.iter_rev(self.element_size)
    }
}

impl<'a> IntoIterator for &'a DArraySized {
    type Item = &'a [u8];
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
