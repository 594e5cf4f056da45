//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 to the nearest integer (ties to even) and clamp it to the i64
/// range, returning 0 for non-finite values.
#[must_use]
pub fn round_even_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round_ties_even();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Round a f64 to the nearest whole value (ties to even), flooring at zero.
#[must_use]
pub fn round_even_non_negative(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    value.round_ties_even().max(0.0)
}

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Convert u32 to f64.
#[must_use]
pub fn u32_to_f64(value: u32) -> f64 {
    f64::from(value)
}
