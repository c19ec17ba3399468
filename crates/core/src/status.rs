//! Machine health status derived from the predicted remaining useful life.
//!
//! Pure logic -- the thresholds are presentation policy for the dashboard,
//! not alarm limits enforced anywhere else.

use std::fmt;

use serde::Serialize;

/// RUL below this many hours is critical (two days).
pub const RUL_CRITICAL_HOURS: f64 = 48.0;

/// RUL below this many hours is a warning (one week).
pub const RUL_WARNING_HOURS: f64 = 168.0;

/// Severity of a machine's predicted condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStatus {
    /// No prediction has been received yet.
    Pending,
    /// RUL at or above the warning threshold.
    Normal,
    /// RUL below the warning threshold but not critical.
    Warning,
    /// RUL below the critical threshold.
    Critical,
}

impl MachineStatus {
    /// Classify a machine by its predicted RUL.
    ///
    /// `None` and non-finite values are [`MachineStatus::Pending`].
    pub fn from_rul_hours(rul_hours: Option<f64>) -> Self {
        match rul_hours {
            Some(rul) if !rul.is_finite() => MachineStatus::Pending,
            Some(rul) if rul < RUL_CRITICAL_HOURS => MachineStatus::Critical,
            Some(rul) if rul < RUL_WARNING_HOURS => MachineStatus::Warning,
            Some(_) => MachineStatus::Normal,
            None => MachineStatus::Pending,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MachineStatus::Pending => "pending",
            MachineStatus::Normal => "normal",
            MachineStatus::Warning => "warning",
            MachineStatus::Critical => "critical",
        }
    }

    /// Display color used for the status badge and RUL gauge fill.
    pub fn color(self) -> &'static str {
        match self {
            MachineStatus::Pending => "gray",
            MachineStatus::Normal => "green",
            MachineStatus::Warning => "orange",
            MachineStatus::Critical => "red",
        }
    }
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_values() {
        assert_eq!(MachineStatus::from_rul_hours(Some(40.0)), MachineStatus::Critical);
        assert_eq!(MachineStatus::from_rul_hours(Some(150.0)), MachineStatus::Warning);
        assert_eq!(MachineStatus::from_rul_hours(Some(500.0)), MachineStatus::Normal);
    }

    #[test]
    fn thresholds_are_exclusive_upper_bounds() {
        assert_eq!(
            MachineStatus::from_rul_hours(Some(RUL_CRITICAL_HOURS)),
            MachineStatus::Warning
        );
        assert_eq!(
            MachineStatus::from_rul_hours(Some(RUL_WARNING_HOURS)),
            MachineStatus::Normal
        );
        assert_eq!(MachineStatus::from_rul_hours(Some(0.0)), MachineStatus::Critical);
        assert_eq!(MachineStatus::from_rul_hours(Some(-5.0)), MachineStatus::Critical);
    }

    #[test]
    fn missing_or_nan_rul_is_pending() {
        assert_eq!(MachineStatus::from_rul_hours(None), MachineStatus::Pending);
        assert_eq!(MachineStatus::from_rul_hours(Some(f64::NAN)), MachineStatus::Pending);
    }

    #[test]
    fn colors_and_labels() {
        assert_eq!(MachineStatus::Critical.color(), "red");
        assert_eq!(MachineStatus::Warning.color(), "orange");
        assert_eq!(MachineStatus::Normal.color(), "green");
        assert_eq!(MachineStatus::Warning.to_string(), "warning");
        assert_eq!(
            serde_json::to_value(MachineStatus::Critical).unwrap(),
            "critical"
        );
    }
}
