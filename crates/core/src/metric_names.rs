//! Well-known gauge metric names and full-scale maxima.
//!
//! The maxima are the values at which a gauge is drawn 100% full. They are
//! presentation constants, not alarm limits.

/// Sensor temperature in degrees Celsius.
pub const METRIC_TEMPERATURE: &str = "temperature";

/// Vibration amplitude (sensor units, nominally 0..1).
pub const METRIC_VIBRATION: &str = "vibration";

/// Line pressure in PSI.
pub const METRIC_PRESSURE: &str = "pressure";

pub const TEMPERATURE_MAX: f64 = 100.0;
pub const VIBRATION_MAX: f64 = 1.0;
pub const PRESSURE_MAX: f64 = 100.0;
pub const RUL_HOURS_MAX: f64 = 1000.0;
