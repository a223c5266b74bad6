use darray::DArrayError;
use thiserror::Error;

/// Error types for `DTable` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DTableError {
    /// Failure reported by the shared buffer core
    #[error(transparent)]
    Buffer(#[from] DArrayError),
    /// Column descriptor reaching past the row or past the buffer
    #[error("Invalid column {column}: offset {offset} + size {element_size} exceeds {limit} bytes")]
    InvalidColumn {
        /// Column index
        column: usize,
        /// Byte offset of the column within a row
        offset: usize,
        /// Size of one cell in bytes
        element_size: usize,
        /// Number of bytes the cell must fit into
        limit: usize,
    },
    /// Row bytes do not match the table's row size
    #[error("Row size mismatch: expected a multiple of {expected} bytes, got {actual}")]
    RowSizeMismatch {
        /// Row size of the table
        expected: usize,
        /// Number of bytes provided
        actual: usize,
    },
    /// Cell bytes do not match the column's element size
    #[error("Cell size mismatch: column {column} holds {expected} bytes, got {actual}")]
    CellSizeMismatch {
        /// Column index
        column: usize,
        /// Element size of the column
        expected: usize,
        /// Number of bytes provided
        actual: usize,
    },
    /// Invalid parameters provided to a table constructor
    #[error("Invalid table layout: {reason}")]
    InvalidLayout {
        /// Description of why the layout was rejected
        reason: &'static str,
    },
    /// Operation attempted on a table without rows
    #[error("Operation on empty table")]
    EmptyTable,
}

pub type Result<T> = core::result::Result<T, DTableError>;
