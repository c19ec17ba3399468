//! Gauge fill normalization.

/// Normalize `value` to a 0-100 fill percentage against `max`.
///
/// The result is clamped to `[0, 100]`. Non-finite values and a
/// non-positive `max` yield 0.
pub fn percent_of(value: f64, max: f64) -> f64 {
    if !value.is_finite() || !max.is_finite() || max <= 0.0 {
        return 0.0;
    }
    (value / max * 100.0).clamp(0.0, 100.0)
}

/// Like [`percent_of`], treating a missing value as empty.
pub fn percent_of_opt(value: Option<f64>, max: f64) -> f64 {
    value.map_or(0.0, |v| percent_of(v, max))
}
