#![no_std]

//! `DArray`: type-erased growable arrays over contiguous byte buffers.
//!
//! Elements are opaque byte spans of a runtime `element_size`. The crate
//! provides the buffer-growth core shared by arrays and tables, plus two
//! array containers built on it.
//!
//! This crate is `no_std` compatible and needs only `alloc`.
//!
//! # Layers
//!
//! - [`index`]: signed index normalization, `-1` is the last element
//! - [`growth`]: capacity policies (power of two, rational factor) with
//!   overflow detection
//! - [`buffer`]: the growth core as free functions over `(buffer, count,
//!   element_size)`; reused by the `dtable` crate
//! - [`DArray`]: array storing `{elements, count}`, element size passed on
//!   every call
//! - [`DArraySized`]: array that also stores its element size
//!
//! # Example
//!
//! ```
//! use darray::DArray;
//!
//! const INT: usize = core::mem::size_of::<i32>();
//! let by_value = |a: &[u8], b: &[u8]| {
//!     let a = i32::from_ne_bytes(a.try_into().unwrap());
//!     let b = i32::from_ne_bytes(b.try_into().unwrap());
//!     a.cmp(&b)
//! };
//!
//! let mut array = DArray::new(INT, 4).unwrap();
//! for value in [30, 10, 20] {
//!     array.append(INT, &i32::to_ne_bytes(value)).unwrap();
//! }
//! array.sort(INT, by_value).unwrap();
//!
//! assert_eq!(array.get(INT, 0).unwrap(), 10i32.to_ne_bytes());
//! assert_eq!(array.get(INT, -1).unwrap(), 30i32.to_ne_bytes());
//! assert_eq!(array.find_closest(INT, &25i32.to_ne_bytes(), by_value).unwrap(), Some(2));
//! ```
//!
//! # Errors
//!
//! Every fallible operation returns [`DArrayError`] and leaves the container
//! unchanged on failure. Nothing panics on bad input.
//!
//! # Performance Characteristics
//!
//! - `append()`: O(1) amortized, capacity doubles
//! - `insert()`, `remove()`, shifts: O(n) byte moves
//! - `sort()`: O(n log n), whole elements are moved once
//! - `find_closest()`: O(log n)
//!
//! # Features
//!
//! - `std`: implements `std::error::Error` through `thiserror`
//! - `logging`: traces growth through the `log` facade

extern crate alloc;

#[macro_use]
mod logging;

mod array;
pub mod buffer;
mod error;
pub mod growth;
pub mod index;
mod iter;
mod sized;

pub use array::{ArrayArg, DArray};
pub use error::{DArrayError, Result};
pub use growth::{GrowthFactor, DEFAULT_CAPACITY};
pub use iter::{Elements, ElementsRev};
pub use sized::DArraySized;
