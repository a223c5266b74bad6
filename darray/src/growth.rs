//! Capacity growth policies.
//!
//! Arrays round the required size up to the next power of two. Tables use a
//! rational factor with a "grow by at least one slot" floor.

use crate::error::{DArrayError, Result};

/// Minimum number of slots an owned table allocates.
pub const DEFAULT_CAPACITY: usize = 16;

/// Smallest power of two that is not less than `requested`.
///
/// `calc_capacity(0)` is 1.
///
/// # Errors
///
/// `DArrayError::CapacityOverflow` if the result does not fit into `usize`.
pub fn calc_capacity(requested: usize) -> Result<usize> {
    requested
        .max(1)
        .checked_next_power_of_two()
        .ok_or(DArrayError::CapacityOverflow {
            count: requested,
            element_size: 1,
        })
}

/// Byte length of `count` elements of `element_size` bytes.
///
/// # Errors
///
/// `DArrayError::CapacityOverflow` if the multiplication wraps.
pub fn checked_byte_len(count: usize, element_size: usize) -> Result<usize> {
    count
        .checked_mul(element_size)
        .ok_or(DArrayError::CapacityOverflow {
            count,
            element_size,
        })
}

/// Rational growth factor `numerator / denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthFactor {
    numerator: usize,
    denominator: usize,
}

impl GrowthFactor {
    /// Grow by half of the current capacity.
    pub const DEFAULT: GrowthFactor = GrowthFactor {
        numerator: 3,
        denominator: 2,
    };

    /// Creates a growth factor.
    ///
    /// # Errors
    ///
    /// Returns `DArrayError::InvalidArgument` if either part is zero.
    pub fn new(numerator: usize, denominator: usize) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(DArrayError::InvalidArgument {
                reason: "growth factor parts must be non-zero",
            });
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    #[must_use]
    pub fn numerator(&self) -> usize {
        self.numerator
    }

    #[must_use]
    pub fn denominator(&self) -> usize {
        self.denominator
    }

    /// Next capacity after `current`, always strictly greater than `current`.
    ///
    /// # Errors
    ///
    /// `DArrayError::CapacityOverflow` instead of wrapping around `usize::MAX`.
    pub fn next_capacity(&self, current: usize) -> Result<usize> {
        let overflow = DArrayError::CapacityOverflow {
            count: current,
            element_size: 1,
        };
        let grown = current
            .checked_mul(self.numerator)
            .map(|scaled| scaled / self.denominator)
            .ok_or_else(|| overflow.clone())?;
        if grown > current {
            return Ok(grown);
        }
        current.checked_add(1).ok_or(overflow)
    }

    /// Applies `next_capacity` until the result holds `required` slots.
    ///
    /// # Errors
    ///
    /// `DArrayError::CapacityOverflow` if no representable capacity fits.
    pub fn capacity_for(&self, current: usize, required: usize) -> Result<usize> {
        let mut capacity = current;
        while capacity < required {
            capacity = self.next_capacity(capacity)?;
        }
        Ok(capacity)
    }
}

impl Default for GrowthFactor {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_capacity() {
        assert_eq!(calc_capacity(0), Ok(1));
        assert_eq!(calc_capacity(1), Ok(1));
        assert_eq!(calc_capacity(3), Ok(4));
        assert_eq!(calc_capacity(16), Ok(16));
        assert_eq!(calc_capacity(17), Ok(32));
        assert!(calc_capacity(usize::MAX).is_err());
    }

    #[test]
    fn test_checked_byte_len() {
        assert_eq!(checked_byte_len(10, 4), Ok(40));
        assert!(checked_byte_len(usize::MAX, 2).is_err());
    }

    #[test]
    fn test_default_factor_progress() {
        let factor = GrowthFactor::default();
        assert_eq!(factor.next_capacity(0), Ok(1));
        assert_eq!(factor.next_capacity(1), Ok(2));
        assert_eq!(factor.next_capacity(2), Ok(3));
        assert_eq!(factor.next_capacity(16), Ok(24));
    }

    #[test]
    fn test_factor_overflow() {
        let factor = GrowthFactor::default();
        assert!(factor.next_capacity(usize::MAX).is_err());
        assert!(factor.next_capacity(usize::MAX / 2).is_err());
    }

    #[test]
    fn test_shrinking_factor_still_grows() {
        let factor = GrowthFactor::new(1, 2).unwrap();
        assert_eq!(factor.next_capacity(10), Ok(11));
    }

    #[test]
    fn test_capacity_for() {
        let factor = GrowthFactor::default();
        assert_eq!(factor.capacity_for(16, 16), Ok(16));
        assert_eq!(factor.capacity_for(16, 17), Ok(24));
        assert_eq!(factor.capacity_for(16, 30), Ok(36));
    }

    #[test]
    fn test_invalid_factor() {
        assert!(GrowthFactor::new(0, 1).is_err());
        assert!(GrowthFactor::new(3, 0).is_err());
    }
}
