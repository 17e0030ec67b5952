//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Get the signed angular distance from `a` to `b`.
///
/// The magnitude is the smallest rotation (at most pi) which takes a heading of `a` onto a heading
/// of `b`. The sign is the direction of that rotation, positive being counter-clockwise, and is
/// taken from the 2D cross product of the unit vectors of the two headings. The inputs do not
/// need to be wrapped.
pub fn ang_diff_signed<T>(a: T, b: T) -> T
where
    T: Float
{
    let (sin_a, cos_a) = a.sin_cos();
    let (sin_b, cos_b) = b.sin_cos();

    let cross = cos_a * sin_b - sin_a * cos_b;
    let dot = cos_a * cos_b + sin_a * sin_b;

    cross.atan2(dot)
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Wrap an angle into the range [0, 2pi).
pub fn wrap_2pi<T>(value: T) -> T
where
    T: Float
{
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    let r = rem_euclid(value, tau_t);

    // Round-off in rem_euclid can land exactly on tau
    if r >= tau_t { T::zero() } else { r }
}
