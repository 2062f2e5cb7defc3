//! Closed-form single-axis timing bounds.

/// Minimum time to traverse signed distance `s`, entering at velocity `v1` and
/// leaving at velocity `v2`, when acceleration is bounded by `amax`.
///
/// The profile accelerates at `+amax` to a peak velocity and decelerates at
/// `-amax` to `v2`. With `d = amax·s + (v1² + v2²)/2` the peak velocity is
/// `√d` and the time is `(2√d − v1 − v2) / amax`. A negative `s` is mirrored
/// by negating `s`, `v1`, and `v2`.
///
/// At `s = 0` both orientations describe the same trip, so the larger of the
/// two is returned; this keeps the result independent of the sign of zero.
///
/// Velocity limits are ignored, which keeps the estimate a lower bound.
#[must_use]
pub fn tsvva(s: f64, v1: f64, v2: f64, amax: f64) -> f64 {
    if s == 0.0 {
        return bang_bang(0.0, v1, v2, amax).max(bang_bang(0.0, -v1, -v2, amax));
    }
    if s < 0.0 {
        bang_bang(-s, -v1, -v2, amax)
    } else {
        bang_bang(s, v1, v2, amax)
    }
}

/// Accelerate-then-decelerate time for non-negative `s`.
fn bang_bang(s: f64, v1: f64, v2: f64, amax: f64) -> f64 {
    let d = amax * s + 0.5 * (v1 * v1 + v2 * v2);
    (2.0 * d.sqrt() - v1 - v2) / amax
}
