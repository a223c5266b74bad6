use thiserror::Error;

/// Error types for `DArray` and buffer-core operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DArrayError {
    /// A required argument is missing or malformed
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the rejected argument
        reason: &'static str,
    },
    /// Signed index does not address an element after normalization
    #[error("Index out of bounds: index {index} is outside of length {length}")]
    IndexOutOfBounds {
        /// Index as given by the caller
        index: isize,
        /// Number of elements at the time of the call
        length: usize,
    },
    /// Inclusive range whose start lies after its end
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange {
        /// Normalized start position
        start: usize,
        /// Normalized end position
        end: usize,
    },
    /// Element count times element size does not fit into `usize`
    #[error("Capacity overflow: {count} elements of {element_size} bytes")]
    CapacityOverflow {
        /// Requested number of elements
        count: usize,
        /// Size of one element in bytes
        element_size: usize,
    },
    /// The allocator refused the request
    #[error("Allocation failed: {bytes} bytes requested")]
    AllocationFailed {
        /// Number of bytes requested from the allocator
        bytes: usize,
    },
    /// Byte span length does not match the declared element size
    #[error("Element size mismatch: expected {expected} bytes, got {actual}")]
    ElementSizeMismatch {
        /// Declared element size
        expected: usize,
        /// Size that was provided
        actual: usize,
    },
    /// Lossy shift would discard every element
    #[error("Shift amount {amount} is not less than length {length}")]
    ShiftTooLarge {
        /// Requested shift amount
        amount: usize,
        /// Number of elements in the array
        length: usize,
    },
    /// Operation needs at least one element
    #[error("Operation on empty array")]
    EmptyArray,
}

pub type Result<T> = core::result::Result<T, DArrayError>;
