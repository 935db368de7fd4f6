//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// Due to floating point round-off the result can equal `rhs.abs()` when `lhs` is a tiny negative
/// number, callers that need a half-open range must handle that case.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle in degrees into the range [0, 360).
pub fn wrap_deg_360<T>(angle_deg: T) -> T
where
    T: Float,
{
    let full = deg(360.0);
    let r = rem_euclid(angle_deg, full);

    if r >= full {
        T::zero()
    } else {
        r
    }
}

/// Get the signed shortest angular distance from `current_deg` to `target_deg`, in the range
/// (-180, 180].
///
/// Adding the result to `current_deg` turns it onto `target_deg` by the shorter way round.
pub fn get_ang_dist_deg<T>(target_deg: T, current_deg: T) -> T
where
    T: Float,
{
    let d = wrap_deg_360(target_deg - current_deg);

    if d > deg(180.0) {
        d - deg(360.0)
    } else {
        d
    }
}

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float,
{
    target_range.0
        + ((value - source_range.0) * (target_range.1 - target_range.0)
            / (source_range.1 - source_range.0))
}

fn deg<T: Float>(value: f64) -> T {
    // Every Float type can represent the small constants used here
    T::from(value).unwrap_or_else(T::nan)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wrap_deg_360() {
        assert_eq!(wrap_deg_360(0f64), 0f64);
        assert_eq!(wrap_deg_360(360f64), 0f64);
        assert_eq!(wrap_deg_360(-90f64), 270f64);
        assert_eq!(wrap_deg_360(725f64), 5f64);
        assert!(wrap_deg_360(-1e-20f64) < 360f64);
    }

    #[test]
    fn test_get_ang_dist_deg() {
        assert_eq!(get_ang_dist_deg(10f64, 350f64), 20f64);
        assert_eq!(get_ang_dist_deg(350f64, 10f64), -20f64);
        assert_eq!(get_ang_dist_deg(90f64, 0f64), 90f64);
        assert_eq!(get_ang_dist_deg(0f64, 90f64), -90f64);
        assert_eq!(get_ang_dist_deg(45f64, 45f64), 0f64);

        // Exactly opposite resolves to +180, never -180
        assert_eq!(get_ang_dist_deg(180f64, 0f64), 180f64);
        assert_eq!(get_ang_dist_deg(0f64, 180f64), 180f64);

        for target in (0..360).step_by(15) {
            for current in (0..360).step_by(15) {
                let d = get_ang_dist_deg(target as f64, current as f64);
                assert!(d > -180.0 && d <= 180.0, "{} -> {} gave {}", current, target, d);
            }
        }
    }

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 90f64), (1f64, 0f64), 45f64), 0.5);
        assert_eq!(lin_map((0f64, 10f64), (0f64, 100f64), 2f64), 20f64);
    }
}
