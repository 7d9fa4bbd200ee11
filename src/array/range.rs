//! Lazy inclusive integer ranges with an explicit step

use crate::error::{HelperError, Result};

/// Iterator over `start, start + step, ...` up to and including `limit`
#[derive(Debug, Clone)]
pub struct RangeGenerator {
    next: Option<i64>,
    limit: i64,
    step: i64,
}

impl Iterator for RangeGenerator {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let current = self.next?;
        let in_range = if self.step > 0 {
            current <= self.limit
        } else {
            current >= self.limit
        };
        if !in_range {
            self.next = None;
            return None;
        }
        self.next = current.checked_add(self.step);
        Some(current)
    }
}

/// Build an inclusive range from `start` towards `limit`
///
/// Ascending ranges need a positive step, descending ranges a negative one.
///
/// # Errors
///
/// [`HelperError::InvalidStep`] when the step points away from `limit` or is zero.
///
/// # Example
///
/// ```rust
/// use helperbox::array::range_generator;
///
/// let up: Vec<i64> = range_generator(1, 10, 4).unwrap().collect();
/// assert_eq!(up, vec![1, 5, 9]);
///
/// let down: Vec<i64> = range_generator(3, 1, -1).unwrap().collect();
/// assert_eq!(down, vec![3, 2, 1]);
/// ```
pub fn range_generator(start: i64, limit: i64, step: i64) -> Result<RangeGenerator> {
    if start <= limit && step <= 0 {
        return Err(HelperError::InvalidStep("Step must be positive".to_string()));
    }
    if start > limit && step >= 0 {
        return Err(HelperError::InvalidStep("Step must be negative".to_string()));
    }

    Ok(RangeGenerator {
        next: Some(start),
        limit,
        step,
    })
}
