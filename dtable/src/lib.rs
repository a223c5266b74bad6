#![no_std]

//! `DTable`: row-oriented tables over byte buffers.
//!
//! A table stores fixed-size rows back to back. Columns are described at
//! runtime by [`ColumnDesc`] values, an offset and a size inside the row,
//! so any `#[repr(C)]` struct can be stored and addressed cell by cell.
//!
//! Growth, insertion and removal reuse the buffer core of the `darray` crate.
//!
//! # Views and owned tables
//!
//! [`DTable::view`] wraps rows the caller already has without copying them.
//! Reads, cell writes and sorting work in place. The first operation that
//! changes the row count copies the rows into a buffer the table owns; from
//! then on the caller's memory is left alone.
//!
//! ```
//! use dtable::{ColumnDesc, DTable};
//!
//! static COLUMNS: [ColumnDesc; 2] = [ColumnDesc::new(0, 2), ColumnDesc::new(2, 2)];
//!
//! let mut memory = [1u8, 0, 10, 0, 2, 0, 20, 0];
//! let mut table = DTable::view(&mut memory, &COLUMNS, 4).unwrap();
//! assert!(table.is_view());
//!
//! table.push_row(&[3, 0, 30, 0]).unwrap();
//! assert!(!table.is_view());
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.cell(-1, 1).unwrap(), &[30, 0]);
//!
//! drop(table);
//! assert_eq!(memory, [1, 0, 10, 0, 2, 0, 20, 0]);
//! ```
//!
//! # Column descriptors
//!
//! Descriptors are trusted. [`validate_columns`] and [`DTable::validate`]
//! check them against the row size on request; otherwise a cell is only
//! checked against the end of the buffer.
//!
//! # Features
//!
//! - `std`: implements `std::error::Error` through `thiserror`
//! - `logging`: reports promotion and growth through the `log` facade

extern crate alloc;

#[macro_use]
mod logging;

mod column;
mod error;
mod iter;
mod table;

pub use column::{validate_columns, ColumnDesc};
pub use error::{DTableError, Result};
pub use iter::ColumnValues;
pub use table::{DTable, TableFlags};

pub use darray::{GrowthFactor, DEFAULT_CAPACITY};
