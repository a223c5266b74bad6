use alloc::vec::Vec;
use core::cmp::Ordering;
use core::ops::Range;

use darray::index::{normalize_index, normalize_insert_index, normalize_range};
use darray::{buffer, DArrayError, Elements, GrowthFactor, DEFAULT_CAPACITY};

use crate::column::{validate_columns, ColumnDesc};
use crate::error::{DTableError, Result};
use crate::iter::ColumnValues;

const POINTER_SIZE: usize = core::mem::size_of::<usize>();

bitflags::bitflags! {
    /// Which buffers a table releases when it is dropped.
    ///
    /// Derived from the storage state, never set by hand.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TableFlags: u8 {
        const OWNS_DATA = 1 << 0;
        const OWNS_DESCS = 1 << 1;
    }
}

#[derive(Debug)]
enum RowStorage<'a> {
    Borrowed(&'a mut [u8]),
    Owned(Vec<u8>),
}

#[derive(Debug)]
enum ColumnStorage<'a> {
    Borrowed(&'a [ColumnDesc]),
    Owned(Vec<ColumnDesc>),
}

/// A table of fixed-size rows, each split into columns by a runtime
/// descriptor array.
///
/// A table is either a view over caller memory (nothing allocated, nothing
/// released) or owns its row buffer, and optionally its descriptors. The
/// first mutation that changes the row count of a view promotes it: the rows
/// are copied into an owned buffer and the caller's memory is never touched
/// again. Promotion is one-way.
///
/// Cell mutations and sorting on a view work in place on the caller's memory.
#[derive(Debug)]
pub struct DTable<'a> {
    rows: RowStorage<'a>,
    columns: ColumnStorage<'a>,
    struct_size: usize,
    row_count: usize,
    growth: GrowthFactor,
}

fn check_struct_size(struct_size: usize) -> Result<()> {
    if struct_size == 0 {
        return Err(DTableError::InvalidLayout {
            reason: "row size must be non-zero",
        });
    }
    Ok(())
}

fn copy_columns(columns: &[ColumnDesc]) -> Result<Vec<ColumnDesc>> {
    let mut owned = Vec::new();
    owned
        .try_reserve_exact(columns.len())
        .map_err(|_| DArrayError::AllocationFailed {
            bytes: columns.len().saturating_mul(core::mem::size_of::<ColumnDesc>()),
        })?;
    owned.extend_from_slice(columns);
    Ok(owned)
}

#[allow(clippy::cast_possible_wrap)]
fn as_index(position: usize) -> isize {
    position as isize
}

impl<'a> DTable<'a> {
    /// Wraps caller-owned rows and descriptors without allocating.
    ///
    /// The row count is `data.len() / struct_size`.
    ///
    /// # Errors
    ///
    /// `InvalidLayout` for a zero row size, `RowSizeMismatch` if `data` is
    /// not a whole number of rows.
    pub fn view(data: &'a mut [u8], columns: &'a [ColumnDesc], struct_size: usize) -> Result<Self> {
        check_struct_size(struct_size)?;
        if data.len() % struct_size != 0 {
            return Err(DTableError::RowSizeMismatch {
                expected: struct_size,
                actual: data.len(),
            });
        }
        let row_count = data.len() / struct_size;
        Ok(Self {
            rows: RowStorage::Borrowed(data),
            columns: ColumnStorage::Borrowed(columns),
            struct_size,
            row_count,
            growth: GrowthFactor::DEFAULT,
        })
    }

    /// Creates an empty table owning a buffer of `capacity` rows
    /// (`DEFAULT_CAPACITY` if zero). The descriptors stay borrowed.
    ///
    /// # Errors
    ///
    /// `InvalidLayout` for a zero row size, or an allocation error.
    pub fn new(columns: &'a [ColumnDesc], struct_size: usize, capacity: usize) -> Result<Self> {
        Self::with_columns(ColumnStorage::Borrowed(columns), struct_size, capacity)
    }

    /// As [`DTable::new`], but the table keeps its own copy of `columns`.
    ///
    /// # Errors
    ///
    /// `InvalidLayout` for a zero row size, or an allocation error.
    pub fn new_with_owned_columns(
        columns: &[ColumnDesc],
        struct_size: usize,
        capacity: usize,
    ) -> Result<Self> {
        Self::with_columns(
            ColumnStorage::Owned(copy_columns(columns)?),
            struct_size,
            capacity,
        )
    }

    fn with_columns(columns: ColumnStorage<'a>, struct_size: usize, capacity: usize) -> Result<Self> {
        check_struct_size(struct_size)?;
        let capacity = if capacity == 0 {
            DEFAULT_CAPACITY
        } else {
            capacity
        };
        let mut data = Vec::new();
        buffer::grow_exact(&mut data, struct_size, capacity)?;
        Ok(Self {
            rows: RowStorage::Owned(data),
            columns,
            struct_size,
            row_count: 0,
            growth: GrowthFactor::DEFAULT,
        })
    }

    /// Creates an owned table holding a copy of `rows`.
    ///
    /// # Errors
    ///
    /// `RowSizeMismatch` if `rows` is not a whole number of rows, or an
    /// allocation error.
    pub fn from_rows(rows: &[u8], columns: &'a [ColumnDesc], struct_size: usize) -> Result<Self> {
        check_struct_size(struct_size)?;
        let mut table = Self::new(columns, struct_size, rows.len() / struct_size)?;
        table.push_rows(rows)?;
        Ok(table)
    }

    /// Copies the rows and the descriptors into a fully owned table.
    ///
    /// # Errors
    ///
    /// Allocation errors.
    pub fn deep_copy(&self) -> Result<DTable<'static>> {
        let mut copy = DTable::with_columns(
            ColumnStorage::Owned(copy_columns(self.columns())?),
            self.struct_size,
            self.row_count,
        )?;
        copy.growth = self.growth;
        copy.push_rows(self.used())?;
        Ok(copy)
    }

    /// Replaces the growth factor used when an owned buffer is full.
    #[must_use]
    pub fn with_growth(mut self, growth: GrowthFactor) -> Self {
        self.growth = growth;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns().len()
    }

    #[must_use]
    pub fn struct_size(&self) -> usize {
        self.struct_size
    }

    #[must_use]
    pub fn growth(&self) -> GrowthFactor {
        self.growth
    }

    /// Row slots in the owned buffer; zero for a view.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match &self.rows {
            RowStorage::Borrowed(_) => 0,
            RowStorage::Owned(data) => buffer::capacity(data, self.struct_size),
        }
    }

    #[must_use]
    pub fn flags(&self) -> TableFlags {
        let mut flags = TableFlags::empty();
        if matches!(self.rows, RowStorage::Owned(_)) {
            flags |= TableFlags::OWNS_DATA;
        }
        if matches!(self.columns, ColumnStorage::Owned(_)) {
            flags |= TableFlags::OWNS_DESCS;
        }
        flags
    }

    #[must_use]
    pub fn is_view(&self) -> bool {
        matches!(self.rows, RowStorage::Borrowed(_))
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnDesc] {
        match &self.columns {
            ColumnStorage::Borrowed(columns) => columns,
            ColumnStorage::Owned(columns) => columns,
        }
    }

    fn data(&self) -> &[u8] {
        match &self.rows {
            RowStorage::Borrowed(data) => data,
            RowStorage::Owned(data) => data,
        }
    }

    fn data_mut(&mut self) -> &mut [u8] {
        match &mut self.rows {
            RowStorage::Borrowed(data) => data,
            RowStorage::Owned(data) => data,
        }
    }

    /// The used rows as one byte slice.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.used()
    }

    fn used(&self) -> &[u8] {
        &self.data()[..self.row_count * self.struct_size]
    }

    /// Checks every column descriptor against the row size.
    ///
    /// # Errors
    ///
    /// `InvalidColumn` for the first column that does not fit.
    pub fn validate(&self) -> Result<()> {
        validate_columns(self.columns(), self.struct_size)
    }

    fn promote_to(&mut self, slots: usize) -> Result<()> {
        let RowStorage::Borrowed(borrowed) = &self.rows else {
            return Ok(());
        };
        let slots = slots.max(self.row_count).max(DEFAULT_CAPACITY);
        let used = self.row_count * self.struct_size;
        let mut owned = Vec::new();
        buffer::grow_exact(&mut owned, self.struct_size, slots)?;
        owned[..used].copy_from_slice(&borrowed[..used]);
        self.rows = RowStorage::Owned(owned);
        debug!(
            "table promoted: {} rows copied into {} slots",
            self.row_count,
            slots
        );
        Ok(())
    }

    /// Turns a view into an owned table. A no-op once owned.
    ///
    /// # Errors
    ///
    /// Allocation errors; the table stays a view.
    pub fn promote(&mut self) -> Result<()> {
        self.promote_to(0)
    }

    /// Ensures room for `capacity` rows, promoting a view first.
    ///
    /// # Errors
    ///
    /// Allocation or overflow errors; the table is unchanged.
    pub fn reserve(&mut self, capacity: usize) -> Result<()> {
        self.promote_to(capacity)?;
        if let RowStorage::Owned(data) = &mut self.rows {
            buffer::grow_exact(data, self.struct_size, capacity)?;
        }
        Ok(())
    }

    /// Makes room for `required` rows using the growth factor.
    fn ensure_rows(&mut self, required: usize) -> Result<()> {
        self.promote_to(required)?;
        let current = self.capacity();
        if required <= current {
            return Ok(());
        }
        let slots = self
            .growth
            .capacity_for(current, required)?
            .max(DEFAULT_CAPACITY);
        if let RowStorage::Owned(data) = &mut self.rows {
            buffer::grow_exact(data, self.struct_size, slots)?;
            trace!("table grown from {} to {} rows", current, slots);
        }
        Ok(())
    }

    /// Releases unused row slots of an owned buffer.
    ///
    /// # Errors
    ///
    /// Never fails for a consistent table.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        if let RowStorage::Owned(data) = &mut self.rows {
            buffer::shrink_to_fit(data, self.row_count, self.struct_size)?;
        }
        Ok(())
    }

    fn check_rows(&self, rows: &[u8]) -> Result<usize> {
        if rows.len() % self.struct_size != 0 {
            return Err(DTableError::RowSizeMismatch {
                expected: self.struct_size,
                actual: rows.len(),
            });
        }
        Ok(rows.len() / self.struct_size)
    }

    fn check_row(&self, row: &[u8]) -> Result<()> {
        if row.len() != self.struct_size {
            return Err(DTableError::RowSizeMismatch {
                expected: self.struct_size,
                actual: row.len(),
            });
        }
        Ok(())
    }

    fn insert_rows_at(&mut self, position: usize, rows: &[u8]) -> Result<()> {
        let added = self.check_rows(rows)?;
        if added == 0 {
            return Ok(());
        }
        let required = self
            .row_count
            .checked_add(added)
            .ok_or(DArrayError::CapacityOverflow {
                count: self.row_count,
                element_size: self.struct_size,
            })?;
        self.ensure_rows(required)?;
        if let RowStorage::Owned(data) = &mut self.rows {
            buffer::insert_many(
                data,
                &mut self.row_count,
                self.struct_size,
                as_index(position),
                rows,
            )?;
        }
        Ok(())
    }

    /// Appends one row.
    ///
    /// # Errors
    ///
    /// `RowSizeMismatch` or a growth error; the table is unchanged on error.
    pub fn push_row(&mut self, row: &[u8]) -> Result<()> {
        self.check_row(row)?;
        self.insert_rows_at(self.row_count, row)
    }

    /// Appends rows stored back to back in `rows`.
    ///
    /// # Errors
    ///
    /// `RowSizeMismatch` or a growth error.
    pub fn push_rows(&mut self, rows: &[u8]) -> Result<()> {
        self.insert_rows_at(self.row_count, rows)
    }

    /// Appends a zero-filled row.
    ///
    /// # Errors
    ///
    /// Growth errors.
    pub fn push_row_empty(&mut self) -> Result<()> {
        let required = self
            .row_count
            .checked_add(1)
            .ok_or(DArrayError::CapacityOverflow {
                count: self.row_count,
                element_size: self.struct_size,
            })?;
        self.ensure_rows(required)?;
        let start = self.row_count * self.struct_size;
        let end = start + self.struct_size;
        self.data_mut()[start..end].fill(0);
        self.row_count = required;
        Ok(())
    }

    /// Inserts one row so that it ends up at `index`. Inserting at the row
    /// count appends.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds`, `RowSizeMismatch` or a growth error.
    pub fn insert_row(&mut self, index: isize, row: &[u8]) -> Result<()> {
        self.check_row(row)?;
        let position = normalize_insert_index(index, self.row_count)?;
        self.insert_rows_at(position, row)
    }

    /// Inserts rows stored back to back in `rows`, starting at `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds`, `RowSizeMismatch` or a growth error.
    pub fn insert_rows(&mut self, index: isize, rows: &[u8]) -> Result<()> {
        let position = normalize_insert_index(index, self.row_count)?;
        self.insert_rows_at(position, rows)
    }

    /// Removes the row at `index`, promoting a view first.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds`, or an allocation error from promotion.
    pub fn remove_row(&mut self, index: isize) -> Result<()> {
        normalize_index(index, self.row_count)?;
        self.promote()?;
        let struct_size = self.struct_size;
        let mut row_count = self.row_count;
        buffer::remove(self.data_mut(), &mut row_count, struct_size, index)?;
        self.row_count = row_count;
        Ok(())
    }

    /// Removes the rows in the inclusive range `[start, end]`, promoting a
    /// view first.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` or `InvalidRange`, or an allocation error.
    pub fn remove_rows(&mut self, start: isize, end: isize) -> Result<()> {
        normalize_range(start, end, self.row_count)?;
        self.promote()?;
        let struct_size = self.struct_size;
        let mut row_count = self.row_count;
        buffer::remove_range(self.data_mut(), &mut row_count, struct_size, start, end)?;
        self.row_count = row_count;
        Ok(())
    }

    /// Removes the last row, copying it into `out` first when given.
    ///
    /// # Errors
    ///
    /// `EmptyTable`, `RowSizeMismatch` for a wrong-sized `out`, or an
    /// allocation error from promotion.
    pub fn pop_row(&mut self, out: Option<&mut [u8]>) -> Result<()> {
        if self.row_count == 0 {
            return Err(DTableError::EmptyTable);
        }
        if let Some(out) = &out {
            self.check_row(out)?;
        }
        self.promote()?;
        if let Some(out) = out {
            out.copy_from_slice(self.row(-1)?);
        }
        self.row_count -= 1;
        Ok(())
    }

    /// Drops all rows. Capacity and ownership are kept.
    pub fn clear(&mut self) {
        self.row_count = 0;
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` does not address a row.
    pub fn row(&self, index: isize) -> Result<&[u8]> {
        Ok(buffer::element(
            self.data(),
            self.row_count,
            self.struct_size,
            index,
        )?)
    }

    /// # Errors
    ///
    /// `IndexOutOfBounds` if `index` does not address a row.
    pub fn row_mut(&mut self, index: isize) -> Result<&mut [u8]> {
        let (row_count, struct_size) = (self.row_count, self.struct_size);
        Ok(buffer::element_mut(
            self.data_mut(),
            row_count,
            struct_size,
            index,
        )?)
    }

    /// Copies the row at `index` into `out`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` or `RowSizeMismatch`.
    pub fn get_row(&self, index: isize, out: &mut [u8]) -> Result<()> {
        self.check_row(out)?;
        out.copy_from_slice(self.row(index)?);
        Ok(())
    }

    /// Overwrites the row at `index`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` or `RowSizeMismatch`.
    pub fn set_row(&mut self, index: isize, row: &[u8]) -> Result<()> {
        self.check_row(row)?;
        self.row_mut(index)?.copy_from_slice(row);
        Ok(())
    }

    fn column(&self, column: isize) -> Result<(usize, ColumnDesc)> {
        let columns = self.columns();
        let position = normalize_index(column, columns.len())?;
        Ok((position, columns[position]))
    }

    /// Byte range of a cell within the buffer. Descriptors are not checked
    /// against the row size, only against the buffer end.
    fn cell_range(&self, row: isize, column: isize) -> Result<Range<usize>> {
        let row = normalize_index(row, self.row_count)?;
        let (position, desc) = self.column(column)?;
        desc.cell_range(position, row * self.struct_size, self.data().len())
    }

    /// The bytes of the cell at (`row`, `column`).
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` on either axis, `InvalidColumn` if the cell runs
    /// past the buffer.
    pub fn cell(&self, row: isize, column: isize) -> Result<&[u8]> {
        let range = self.cell_range(row, column)?;
        Ok(&self.data()[range])
    }

    /// # Errors
    ///
    /// As [`DTable::cell`].
    pub fn cell_mut(&mut self, row: isize, column: isize) -> Result<&mut [u8]> {
        let range = self.cell_range(row, column)?;
        Ok(&mut self.data_mut()[range])
    }

    fn check_cell(&self, column: isize, bytes: &[u8]) -> Result<()> {
        let (position, desc) = self.column(column)?;
        if bytes.len() != desc.element_size {
            return Err(DTableError::CellSizeMismatch {
                column: position,
                expected: desc.element_size,
                actual: bytes.len(),
            });
        }
        Ok(())
    }

    /// Copies exactly the column's `element_size` bytes into `out`.
    ///
    /// # Errors
    ///
    /// As [`DTable::cell`], or `CellSizeMismatch` for a wrong-sized `out`.
    pub fn get_cell(&self, row: isize, column: isize, out: &mut [u8]) -> Result<()> {
        self.check_cell(column, out)?;
        out.copy_from_slice(self.cell(row, column)?);
        Ok(())
    }

    /// Overwrites the cell with exactly the column's `element_size` bytes.
    ///
    /// # Errors
    ///
    /// As [`DTable::cell`], or `CellSizeMismatch` for a wrong-sized `value`.
    pub fn set_cell(&mut self, row: isize, column: isize, value: &[u8]) -> Result<()> {
        self.check_cell(column, value)?;
        self.cell_mut(row, column)?.copy_from_slice(value);
        Ok(())
    }

    fn find_row_in<I, F>(&self, rows: I, column: isize, value: &[u8], mut compare: F) -> Result<Option<usize>>
    where
        I: Iterator<Item = usize>,
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.check_cell(column, value)?;
        let (position, desc) = self.column(column)?;
        let data = self.data();
        for row in rows {
            let range = desc.cell_range(position, row * self.struct_size, data.len())?;
            if compare(&data[range], value) == Ordering::Equal {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// First row whose cell in `column` equals `value` under `compare`.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` for a bad column, `CellSizeMismatch` for a
    /// wrong-sized `value`.
    pub fn find_row<F>(&self, column: isize, value: &[u8], compare: F) -> Result<Option<usize>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.find_row_in(0..self.row_count, column, value, compare)
    }

    /// Last row whose cell in `column` equals `value` under `compare`.
    ///
    /// # Errors
    ///
    /// As [`DTable::find_row`].
    pub fn find_row_last<F>(&self, column: isize, value: &[u8], compare: F) -> Result<Option<usize>>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        self.find_row_in((0..self.row_count).rev(), column, value, compare)
    }

    /// Reorders whole rows by the values in `column`. Equal keys may be
    /// reordered. A view is sorted in place.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` for a bad column, `InvalidColumn` if the column
    /// does not fit in a row.
    pub fn sort_by_column<F>(&mut self, column: isize, mut compare: F) -> Result<()>
    where
        F: FnMut(&[u8], &[u8]) -> Ordering,
    {
        let (position, desc) = self.column(column)?;
        let key = desc.cell_range(position, 0, self.struct_size)?;
        let (row_count, struct_size) = (self.row_count, self.struct_size);
        buffer::sort(self.data_mut(), row_count, struct_size, |a, b| {
            compare(&a[key.clone()], &b[key.clone()])
        })?;
        Ok(())
    }

    /// Iterates over the rows.
    #[must_use]
    pub fn rows(&self) -> Elements<'_> {
        Elements::new(self.used(), self.struct_size)
    }

    /// Iterates over the cells of one column.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` for a bad column, `InvalidColumn` if the column
    /// does not fit in a row.
    pub fn column_values(&self, column: isize) -> Result<ColumnValues<'_>> {
        let (position, desc) = self.column(column)?;
        let cell = desc.cell_range(position, 0, self.struct_size)?;
        Ok(ColumnValues::new(self.rows(), cell))
    }

    /// Passes every pointer-sized cell to `release`, then drops the table.
    ///
    /// A column counts as a pointer column purely because its `element_size`
    /// equals the pointer width; a column of `f64` or `u64` on a 64-bit target
    /// qualifies as well. Null words are skipped. Cells are visited row by
    /// row, columns in descriptor order.
    pub fn free_deep<F>(self, mut release: F)
    where
        F: FnMut(usize),
    {
        let data = self.data();
        for row in 0..self.row_count {
            for (position, desc) in self.columns().iter().enumerate() {
                if desc.element_size != POINTER_SIZE {
                    continue;
                }
                let Ok(range) = desc.cell_range(position, row * self.struct_size, data.len())
                else {
                    continue;
                };
                if let Ok(word) = <[u8; POINTER_SIZE]>::try_from(&data[range]) {
                    let word = usize::from_ne_bytes(word);
                    if word != 0 {
                        release(word);
                    }
                }
            }
        }
        debug!("table released after deep free of {} rows", self.row_count);
    }
}

impl<'a> IntoIterator for &'a DTable<'_> {
    type Item = &'a [u8];
    type IntoIter = Elements<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    static COLUMNS: [ColumnDesc; 2] = [ColumnDesc::new(0, 2), ColumnDesc::new(2, 2)];

    #[test]
    fn test_promote_to_keeps_rows() {
        let mut rows = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
        let mut table = DTable::view(&mut rows, &COLUMNS, 4).unwrap();
        assert!(table.is_view());

        table.promote_to(1).unwrap();

        assert!(!table.is_view());
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
        assert_eq!(table.used(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_ensure_rows_uses_growth_factor() {
        let mut table = DTable::new(&COLUMNS, 4, 20).unwrap();
        table.row_count = 20;
        table.ensure_rows(21).unwrap();
        assert_eq!(table.capacity(), 30);
    }

    #[test]
    fn test_ensure_rows_respects_minimum() {
        let mut table = DTable::new(&COLUMNS, 4, 2).unwrap();
        table.row_count = 2;
        table.ensure_rows(3).unwrap();
        assert_eq!(table.capacity(), DEFAULT_CAPACITY);
    }
}
