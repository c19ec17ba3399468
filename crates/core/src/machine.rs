//! Machine records and the `/predict_batch` wire types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::MachineId;

/// One physical machine with its local sensor readings and the latest
/// server-side prediction.
///
/// Sensor fields are locally sourced and never touched by a merge. Only
/// `rul_hours` and `predicted_failure_date` are overwritten by predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineRecord {
    pub machine_id: MachineId,
    pub temperature: f64,
    pub vibration: f64,
    pub pressure: f64,
    pub run_hours: u64,
    /// `None` until the first successful poll.
    #[serde(default)]
    pub rul_hours: Option<f64>,
    /// `None` until the first successful poll.
    #[serde(default)]
    pub predicted_failure_date: Option<String>,
}

impl MachineRecord {
    /// A record with sensor readings only and no prediction yet.
    pub fn new(
        machine_id: MachineId,
        temperature: f64,
        vibration: f64,
        pressure: f64,
        run_hours: u64,
    ) -> Self {
        Self {
            machine_id,
            temperature,
            vibration,
            pressure,
            run_hours,
            rul_hours: None,
            predicted_failure_date: None,
        }
    }
}

/// A single prediction returned by the service, keyed by `machine_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub machine_id: MachineId,
    #[serde(default)]
    pub rul_hours: Option<f64>,
    #[serde(default)]
    pub predicted_failure_date: Option<String>,
}

/// Request body for `POST /predict_batch`.
#[derive(Debug, Serialize)]
pub struct PredictBatchRequest<'a> {
    pub machines: &'a [MachineRecord],
}

/// Response body for `POST /predict_batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictBatchResponse {
    pub predictions: Vec<Prediction>,
}

/// The built-in fleet used when no seed file is configured.
pub fn fallback_machines() -> Vec<MachineRecord> {
    vec![
        MachineRecord::new(1, 70.0, 0.5, 30.0, 1200),
        MachineRecord::new(2, 68.0, 0.4, 28.0, 1500),
        MachineRecord::new(3, 72.0, 0.45, 32.0, 1000),
    ]
}

/// Check that a seed fleet is usable: non-empty with unique machine ids.
pub fn validate_fleet(machines: &[MachineRecord]) -> Result<(), CoreError> {
    if machines.is_empty() {
        return Err(CoreError::Validation(
            "fleet must contain at least one machine".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(machines.len());
    for machine in machines {
        if !seen.insert(machine.machine_id) {
            return Err(CoreError::DuplicateMachine(machine.machine_id));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_fleet_is_valid() {
        let fleet = fallback_machines();
        assert_eq!(fleet.len(), 3);
        assert!(validate_fleet(&fleet).is_ok());
        assert!(fleet.iter().all(|m| m.rul_hours.is_none()));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let fleet = vec![
            MachineRecord::new(7, 70.0, 0.5, 30.0, 10),
            MachineRecord::new(7, 71.0, 0.5, 30.0, 20),
        ];
        let err = validate_fleet(&fleet).unwrap_err();
        assert!(matches!(err, CoreError::DuplicateMachine(7)));
    }

    #[test]
    fn empty_fleet_is_rejected() {
        assert!(matches!(
            validate_fleet(&[]),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn request_serializes_absent_predictions_as_null() {
        let machines = vec![MachineRecord::new(1, 70.0, 0.5, 30.0, 1200)];
        let body = serde_json::to_value(PredictBatchRequest {
            machines: &machines,
        })
        .unwrap();

        let first = &body["machines"][0];
        assert_eq!(first["machine_id"], 1);
        assert_eq!(first["run_hours"], 1200);
        assert!(first["rul_hours"].is_null());
        assert!(first["predicted_failure_date"].is_null());
    }

    #[test]
    fn prediction_fields_are_optional() {
        let response: PredictBatchResponse =
            serde_json::from_str(r#"{"predictions":[{"machine_id":4}]}"#).unwrap();
        assert_eq!(response.predictions.len(), 1);
        assert_eq!(response.predictions[0].rul_hours, None);
        assert_eq!(response.predictions[0].predicted_failure_date, None);
    }

    #[test]
    fn seed_records_parse_without_predictions() {
        let seed: Vec<MachineRecord> = serde_json::from_str(
            r#"[{"machine_id":9,"temperature":65.5,"vibration":0.3,"pressure":29.0,"run_hours":800}]"#,
        )
        .unwrap();
        assert_eq!(seed[0], MachineRecord::new(9, 65.5, 0.3, 29.0, 800));
    }
}
