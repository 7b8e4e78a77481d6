//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::ranking::RANKING_UNIT;

/// Convert i64 to f64 while allowing precision loss in a single location.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Placement points for a fixed-point total held in twelfths.
#[must_use]
pub fn twelfths_to_points(twelfths: i64) -> f64 {
    i64_to_f64(twelfths) / i64_to_f64(RANKING_UNIT)
}

/// Render a twelfths total as decimal placement points.
///
/// Whole values keep a trailing `.0` (`48` renders as `4.0`).
#[must_use]
pub fn format_points(twelfths: i64) -> String {
    // Debug output is the shortest round-trip form and never drops the fraction.
    format!("{:?}", twelfths_to_points(twelfths))
}
