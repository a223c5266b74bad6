use core::ops::Range;

use crate::error::{DTableError, Result};

/// Location of one column inside a row: a byte offset and a cell size.
///
/// Descriptors are plain data, usually a `static` array next to the row type:
///
/// ```
/// use dtable::ColumnDesc;
///
/// #[repr(C)]
/// struct Sample {
///     id: i32,
///     value: f32,
/// }
///
/// static SAMPLE_COLUMNS: [ColumnDesc; 2] = [
///     ColumnDesc::new(core::mem::offset_of!(Sample, id), 4),
///     ColumnDesc::new(core::mem::offset_of!(Sample, value), 4),
/// ];
/// assert_eq!(SAMPLE_COLUMNS[1].offset, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ColumnDesc {
    /// Byte offset of the cell from the start of the row
    pub offset: usize,
    /// Size of the cell in bytes
    pub element_size: usize,
}

impl ColumnDesc {
    #[must_use]
    pub const fn new(offset: usize, element_size: usize) -> Self {
        Self {
            offset,
            element_size,
        }
    }

    /// First byte past the cell, `None` if it overflows.
    #[must_use]
    pub const fn end(&self) -> Option<usize> {
        self.offset.checked_add(self.element_size)
    }

    /// Byte range of the cell inside a row that starts at `row_start`,
    /// checked against `limit`.
    pub(crate) fn cell_range(
        &self,
        column: usize,
        row_start: usize,
        limit: usize,
    ) -> Result<Range<usize>> {
        let invalid = DTableError::InvalidColumn {
            column,
            offset: self.offset,
            element_size: self.element_size,
            limit,
        };
        let start = row_start.checked_add(self.offset).ok_or(invalid.clone())?;
        let end = start.checked_add(self.element_size).ok_or(invalid.clone())?;
        if end > limit {
            return Err(invalid);
        }
        Ok(start..end)
    }
}

/// Checks that every column fits inside a row of `struct_size` bytes.
///
/// Tables never call this on their own: a malformed descriptor is only
/// caught here, or when a cell access runs past the end of the buffer.
///
/// # Errors
///
/// `DTableError::InvalidColumn` for the first column that does not fit.
pub fn validate_columns(columns: &[ColumnDesc], struct_size: usize) -> Result<()> {
    for (column, desc) in columns.iter().enumerate() {
        desc.cell_range(column, 0, struct_size)?;
    }
    Ok(())
}
