use core::ops::Range;

use darray::Elements;

/// Iterator over the values of one column, one cell per row
///
/// This iterator implements `Clone` and runs in both directions.
#[derive(Clone, Debug)]
pub struct ColumnValues<'a> {
    rows: Elements<'a>,
    cell: Range<usize>,
}

impl<'a> ColumnValues<'a> {
    pub(crate) fn new(rows: Elements<'a>, cell: Range<usize>) -> Self {
        Self { rows, cell }
    }
}

impl<'a> Iterator for ColumnValues<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.next()?;
        row.get(self.cell.clone())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl DoubleEndedIterator for ColumnValues<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let row = self.rows.next_back()?;
        row.get(self.cell.clone())
    }
}

impl ExactSizeIterator for ColumnValues<'_> {}
