//! Merge of a prediction batch into the current fleet.
//!
//! Pure logic -- the caller owns the fleet and decides when to publish the
//! merged result. Matching is by `machine_id`, never by list position, so a
//! response may be reordered or cover only part of the fleet.

use std::collections::HashMap;

use crate::machine::{MachineRecord, Prediction};
use crate::types::MachineId;

/// Result of merging one prediction batch.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    /// The fleet after the merge, in the original order.
    pub machines: Vec<MachineRecord>,
    /// Number of records that had a matching prediction.
    pub updated: usize,
    /// Ids present in the response but not in the fleet. These are ignored.
    pub unknown_ids: Vec<MachineId>,
}

/// Merge `predictions` into `machines`, returning a new fleet.
///
/// For each record with a matching prediction, `rul_hours` and
/// `predicted_failure_date` take the predicted value, keeping the previous
/// value for any field the prediction leaves out. Records without a match are
/// copied unchanged. The set and order of machine ids never changes. When a
/// batch repeats an id, the last entry wins.
pub fn merge_predictions(machines: &[MachineRecord], predictions: &[Prediction]) -> MergeResult {
    let by_id: HashMap<MachineId, &Prediction> =
        predictions.iter().map(|p| (p.machine_id, p)).collect();

    let mut updated = 0;
    let merged = machines
        .iter()
        .map(|machine| match by_id.get(&machine.machine_id) {
            Some(prediction) => {
                updated += 1;
                apply_prediction(machine, prediction)
            }
            None => machine.clone(),
        })
        .collect();

    let mut unknown_ids: Vec<MachineId> = by_id
        .keys()
        .copied()
        .filter(|id| !machines.iter().any(|m| m.machine_id == *id))
        .collect();
    unknown_ids.sort_unstable();

    MergeResult {
        machines: merged,
        updated,
        unknown_ids,
    }
}

fn apply_prediction(machine: &MachineRecord, prediction: &Prediction) -> MachineRecord {
    MachineRecord {
        rul_hours: prediction.rul_hours.or(machine.rul_hours),
        predicted_failure_date: prediction
            .predicted_failure_date
            .clone()
            .or_else(|| machine.predicted_failure_date.clone()),
        ..machine.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
