// Decimal rounding for emitted coordinates and temperatures

/// Round `value` to `digits` fractional decimal digits.
///
/// Ties are rounded half away from zero on the scaled binary value
/// (`f64::round`), so `1.25` becomes `1.3` and `-0.25` becomes `-0.3`.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let factor = 10f64.powi(digits);
    (value * factor).round() / factor
}
