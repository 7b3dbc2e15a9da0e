//! Edge-clamping boundary policy.
//!
//! Samples requested outside the image are replaced by the nearest edge
//! pixel. Every strategy goes through [`clamp_coordinate`], which keeps their
//! border behavior identical.

/// Clamps `value` into `[lower, upper]`.
///
/// Unlike [`Ord::clamp`] this never panics: if `lower > upper` the result is
/// `lower`. Callers in this crate always pass `lower <= upper`.
///
/// ```rust
/// use simdblur::clamp_coordinate;
///
/// assert_eq!(clamp_coordinate(-3, 0, 9), 0);
/// assert_eq!(clamp_coordinate(4, 0, 9), 4);
/// assert_eq!(clamp_coordinate(12, 0, 9), 9);
/// ```
#[inline(always)]
pub fn clamp_coordinate(value: isize, lower: isize, upper: isize) -> isize {
    if value < lower {
        lower
    } else if value > upper {
        upper
    } else {
        value
    }
}
