//! Numeric helpers centralizing percent math and safe numeric casts.

use num_traits::cast::cast;

/// `percent`% of `value`.
#[must_use]
pub fn percent_of(percent: f64, value: f64) -> f64 {
    value * percent / 100.0
}

/// What percentage `part` is of `whole`, returning 0.0 when `whole` is zero.
#[must_use]
pub fn what_percent(part: f64, whole: f64) -> f64 {
    if whole.abs() <= f64::EPSILON {
        return 0.0;
    }
    part / whole * 100.0
}

#[must_use]
pub fn increase_by_percent(value: f64, percent: f64) -> f64 {
    value + percent_of(percent, value)
}

#[must_use]
pub fn reduce_by_percent(value: f64, percent: f64) -> f64 {
    value - percent_of(percent, value)
}

/// Round to a fixed number of decimal places.
#[must_use]
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

/// Floor a f64 and clamp it to the u64 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn floor_f64_to_u64(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u64, f64>(u64::MAX).unwrap_or(f64::MAX);
    cast::<f64, u64>(value.min(max).floor()).unwrap_or(0)
}

/// Ceil a f64 and clamp it to the u32 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn ceil_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = f64::from(u32::MAX);
    cast::<f64, u32>(value.min(max).ceil()).unwrap_or(0)
}

/// Floor a f64 and clamp it to the u32 range, returning 0 for non-finite or negative values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    let max = f64::from(u32::MAX);
    cast::<f64, u32>(value.min(max).floor()).unwrap_or(0)
}

/// Convert u64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn u64_to_f64(value: u64) -> f64 {
    cast::<u64, f64>(value).unwrap_or(0.0)
}

/// Convert a collection length to f64.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_helpers_agree() {
        assert!((percent_of(20.0, 3_000.0) - 600.0).abs() < f64::EPSILON);
        assert!((what_percent(5.0, 20.0) - 25.0).abs() < f64::EPSILON);
        assert!((what_percent(5.0, 0.0)).abs() < f64::EPSILON);
        assert!((reduce_by_percent(3_000.0, 20.0) - 2_400.0).abs() < f64::EPSILON);
        assert!((increase_by_percent(5.0, 99.0) - 9.95).abs() < 1e-9);
    }

    #[test]
    fn rounding_and_casts_cover_edges() {
        assert!((round_to(1.236, 2) - 1.24).abs() < 1e-9);
        assert_eq!(floor_f64_to_u64(2.9), 2);
        assert_eq!(floor_f64_to_u64(f64::NAN), 0);
        assert_eq!(floor_f64_to_u64(-4.0), 0);
        assert_eq!(ceil_f64_to_u32(1.2), 2);
        assert_eq!(ceil_f64_to_u32(f64::INFINITY), 0);
        assert_eq!(floor_f64_to_u32(f64::from(u32::MAX) * 2.0), u32::MAX);
    }
}
