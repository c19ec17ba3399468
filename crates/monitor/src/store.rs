//! Owned fleet state shared between the poll loop and the renderer.
//!
//! [`MachineStore`] is the single owner of the machine list. Readers get a
//! [`watch::Receiver`] and always see a complete [`Fleet`]; the only writer
//! is [`MachineStore::apply`], which replaces the whole fleet in one step.
//!
//! Every poll cycle reserves a sequence number before its request is sent.
//! A response is applied only if its sequence number is newer than the last
//! applied one, so a slow response can never overwrite a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::watch;

use rulwatch_core::machine::{validate_fleet, MachineRecord, Prediction};
use rulwatch_core::merge::merge_predictions;
use rulwatch_core::types::{MachineId, Timestamp};
use rulwatch_core::CoreError;

/// Snapshot of the fleet as seen by readers.
#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    pub machines: Vec<MachineRecord>,
    /// Sequence number of the last applied poll cycle (0 = none yet).
    pub applied_seq: u64,
    /// When the last prediction batch was applied.
    pub updated_at: Option<Timestamp>,
}

/// Result of offering a prediction batch to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The batch was merged and published.
    Applied {
        updated: usize,
        unknown_ids: Vec<MachineId>,
    },
    /// A newer cycle was already applied; the batch was discarded.
    Stale { applied_seq: u64 },
}

/// A reserved poll cycle: its sequence number and the fleet to send.
#[derive(Debug, Clone)]
pub struct PollCycle {
    pub seq: u64,
    pub machines: Vec<MachineRecord>,
}

pub struct MachineStore {
    tx: watch::Sender<Fleet>,
    next_seq: AtomicU64,
}

impl MachineStore {
    /// Create a store seeded with `machines`. The id set is fixed from here on.
    pub fn new(machines: Vec<MachineRecord>) -> Result<Self, CoreError> {
        validate_fleet(&machines)?;
        let (tx, _rx) = watch::channel(Fleet {
            machines,
            applied_seq: 0,
            updated_at: None,
        });
        Ok(Self {
            tx,
            next_seq: AtomicU64::new(1),
        })
    }

    /// Subscribe to fleet updates. The receiver starts at the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Fleet> {
        self.tx.subscribe()
    }

    /// Clone of the current fleet.
    pub fn snapshot(&self) -> Fleet {
        self.tx.borrow().clone()
    }

    /// Reserve the next sequence number together with the fleet to send.
    pub fn begin_cycle(&self) -> PollCycle {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let machines = self.tx.borrow().machines.clone();
        PollCycle { seq, machines }
    }

    /// Merge the predictions of cycle `seq` into the fleet.
    ///
    /// Readers are notified exactly once when the batch is applied and not
    /// at all when it is stale.
    pub fn apply(&self, seq: u64, predictions: &[Prediction]) -> ApplyOutcome {
        let mut outcome = ApplyOutcome::Stale { applied_seq: 0 };

        self.tx.send_if_modified(|fleet| {
            if seq <= fleet.applied_seq {
                outcome = ApplyOutcome::Stale {
                    applied_seq: fleet.applied_seq,
                };
                return false;
            }

            let merged = merge_predictions(&fleet.machines, predictions);
            *fleet = Fleet {
                machines: merged.machines,
                applied_seq: seq,
                updated_at: Some(Utc::now()),
            };
            outcome = ApplyOutcome::Applied {
                updated: merged.updated,
                unknown_ids: merged.unknown_ids,
            };
            true
        });

        outcome
    }
}
