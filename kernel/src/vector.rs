//! Elementwise arithmetic over fixed-length axis arrays.
//!
//! Every binary operation expects both operands to have the same length (one
//! entry per axis). Lengths are checked in debug builds only; callers own the
//! dimensionality contract.

/// `a + b`, per axis.
#[must_use]
pub fn add(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len(), "axis count mismatch");
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}

/// `a - b`, per axis.
#[must_use]
pub fn subtract(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len(), "axis count mismatch");
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Euclidean length.
#[must_use]
pub fn norm(a: &[f64]) -> f64 {
    a.iter().map(|x| x * x).sum::<f64>().sqrt()
}

/// Round `x` to `decimals` decimal places.
///
/// Negative zero is normalized to `0.0` so that rounded values compare and
/// print identically regardless of the sign of a vanishing input.
#[must_use]
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(i32::try_from(decimals).unwrap_or(i32::MAX));
    (x * factor).round() / factor + 0.0
}

/// Per-axis [`round_to`].
#[must_use]
pub fn round(a: &[f64], decimals: u32) -> Vec<f64> {
    a.iter().map(|x| round_to(*x, decimals)).collect()
}
