//! Small scalar helpers shared across the movement core.
//!
//! Rate limiting, symmetric clamping and fuzzy ramps. All functions are
//! pure and branch-cheap; they run many times per control cycle.

/// Clamp `value` to `[-max_abs, max_abs]`.
#[inline]
pub fn limit_abs(value: f32, max_abs: f32) -> f32 {
    value.clamp(-max_abs, max_abs)
}

/// Advance `current` one rate-limited step toward `target`.
///
/// Asymmetric limiter: `accel` bounds the per-call delta while the value
/// moves away from zero, `decel` while it moves toward zero (braking is
/// usually allowed to be faster than accelerating). The returned value
/// never overshoots `target`: if the nominal rate would cross it, the step
/// lands exactly on the target.
#[inline]
pub fn adjust_toward(current: f32, target: f32, accel: f32, decel: f32) -> f32 {
    let delta = target - current;
    if delta == 0.0 {
        return current;
    }

    // moving away from zero accelerates, moving toward zero decelerates
    let away_from_zero = current == 0.0 || delta.signum() == current.signum();
    let rate = if away_from_zero { accel } else { decel };

    if delta.abs() <= rate {
        target
    } else {
        current + rate.copysign(delta)
    }
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)` evaluated at `x`.
#[inline]
pub fn linear_interpolation(x0: f32, y0: f32, x1: f32, y1: f32, x: f32) -> f32 {
    y0 + (y1 - y0) * ((x - x0) / (x1 - x0))
}

/// Fuzzy membership ramp between `x0` and `x1`.
///
/// Ascending: 0 below `x0`, 1 above `x1`, linear in between. Descending is
/// the mirror image. The bounds may be passed in either order.
pub fn linear_fuzzy_value(x0: f32, x1: f32, ascending: bool, x: f32) -> f32 {
    let (lo, hi) = if x0 > x1 { (x1, x0) } else { (x0, x1) };

    if ascending {
        if x <= lo {
            0.0
        } else if x >= hi {
            1.0
        } else {
            linear_interpolation(lo, 0.0, hi, 1.0, x)
        }
    } else if x <= lo {
        1.0
    } else if x >= hi {
        0.0
    } else {
        linear_interpolation(lo, 1.0, hi, 0.0, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_limit_abs() {
        assert_eq!(limit_abs(5.0, 3.0), 3.0);
        assert_eq!(limit_abs(-5.0, 3.0), -3.0);
        assert_eq!(limit_abs(1.5, 3.0), 1.5);
    }

    #[test]
    fn test_adjust_toward_reaches_target_exactly() {
        // accel = decel = 0.0035, target 0.07: exactly 20 steps
        let mut value = 0.0f32;
        value = adjust_toward(value, 0.07, 0.0035, 0.0035);
        assert!((value - 0.0035).abs() < 1e-7);

        for _ in 0..19 {
            value = adjust_toward(value, 0.07, 0.0035, 0.0035);
        }
        assert_eq!(value, 0.07);

        // once there, further calls are stable
        assert_eq!(adjust_toward(value, 0.07, 0.0035, 0.0035), 0.07);
    }

    #[test]
    fn test_adjust_toward_uses_decel_toward_zero() {
        // at 0.06 heading to 0.0 the braking rate applies
        let next = adjust_toward(0.06, 0.0, 0.002, 0.005);
        assert!((next - 0.055).abs() < 1e-7);

        // at 0.0 heading to 0.06 the acceleration rate applies
        let next = adjust_toward(0.0, 0.06, 0.002, 0.005);
        assert!((next - 0.002).abs() < 1e-7);
    }

    #[test]
    fn test_adjust_toward_negative_direction() {
        let next = adjust_toward(0.0, -0.05, 0.003, 0.004);
        assert!((next + 0.003).abs() < 1e-7);

        // from negative back toward zero uses decel
        let next = adjust_toward(-0.05, 0.0, 0.003, 0.004);
        assert!((next + 0.046).abs() < 1e-7);
    }

    #[test]
    fn test_linear_fuzzy_value() {
        assert_eq!(linear_fuzzy_value(8.0, 15.0, true, 5.0), 0.0);
        assert_eq!(linear_fuzzy_value(8.0, 15.0, true, 20.0), 1.0);
        assert!((linear_fuzzy_value(8.0, 15.0, true, 11.5) - 0.5).abs() < 1e-6);
        assert_eq!(linear_fuzzy_value(8.0, 15.0, false, 5.0), 1.0);
        // reversed bounds behave identically
        assert!((linear_fuzzy_value(15.0, 8.0, true, 11.5) - 0.5).abs() < 1e-6);
    }

    proptest! {
        /// Per-call delta is bounded by max(accel, decel) and the value
        /// never steps past its target.
        #[test]
        fn prop_rate_limit_bounded_no_overshoot(
            current in -0.2f32..0.2,
            target in -0.2f32..0.2,
            accel in 1e-4f32..0.01,
            decel in 1e-4f32..0.01,
        ) {
            let next = adjust_toward(current, target, accel, decel);
            prop_assert!((next - current).abs() <= accel.max(decel) + 1e-7);
            // no overshoot: next stays within [current, target]
            let lo = current.min(target) - 1e-7;
            let hi = current.max(target) + 1e-7;
            prop_assert!(next >= lo && next <= hi);
        }

        #[test]
        fn prop_rate_limit_converges(
            target in -0.2f32..0.2,
            accel in 1e-3f32..0.01,
            decel in 1e-3f32..0.01,
        ) {
            let mut value = 0.0f32;
            for _ in 0..1000 {
                value = adjust_toward(value, target, accel, decel);
            }
            prop_assert!((value - target).abs() < 1e-6);
        }
    }
}
