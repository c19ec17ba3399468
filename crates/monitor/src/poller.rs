//! Periodic prediction poll loop.
//!
//! Polls once immediately, then on every tick of a fixed interval: reserve a
//! cycle from the [`MachineStore`], send the fleet to the prediction
//! service, and hand the predictions back to the store. Failures are logged
//! and absorbed; the next tick simply tries again.
//!
//! The loop runs until its [`CancellationToken`] fires. [`spawn`] wraps the
//! task in a [`PollerHandle`] that cancels the token when dropped, so a
//! discarded dashboard never leaves a timer behind.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use rulwatch_core::types::MachineId;

use crate::client::{PredictionApi, PredictionApiError};
use crate::store::{ApplyOutcome, MachineStore};

/// How long [`PollerHandle::shutdown`] waits for the task to finish.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// What a successful round trip did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Applied {
        seq: u64,
        updated: usize,
        unknown_ids: Vec<MachineId>,
    },
    Stale {
        seq: u64,
        applied_seq: u64,
    },
}

/// Run a single poll cycle against the service.
///
/// On error the store is left untouched.
pub async fn poll_once(
    api: &PredictionApi,
    store: &MachineStore,
) -> Result<PollOutcome, PredictionApiError> {
    let cycle = store.begin_cycle();
    tracing::debug!(
        seq = cycle.seq,
        machine_count = cycle.machines.len(),
        "Sending prediction batch"
    );

    let response = api.predict_batch(&cycle.machines).await?;

    Ok(match store.apply(cycle.seq, &response.predictions) {
        ApplyOutcome::Applied {
            updated,
            unknown_ids,
        } => PollOutcome::Applied {
            seq: cycle.seq,
            updated,
            unknown_ids,
        },
        ApplyOutcome::Stale { applied_seq } => PollOutcome::Stale {
            seq: cycle.seq,
            applied_seq,
        },
    })
}

/// Run the poll loop until `cancel` is triggered.
///
/// `refresh` requests an extra poll right away, outside the regular cadence.
/// Cycles never overlap: the next one starts only after the previous one
/// has finished. An in-flight request is abandoned on cancellation.
pub async fn run(
    api: PredictionApi,
    store: Arc<MachineStore>,
    interval: Duration,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
) {
    tracing::info!(
        url = %api.predict_url(),
        interval_ms = interval.as_millis() as u64,
        "Prediction poller started"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // The first tick completes immediately, which gives the initial poll.
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
            _ = refresh.notified() => {
                tracing::debug!("Manual refresh requested");
            }
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("Abandoning in-flight prediction request");
                break;
            }
            result = poll_once(&api, &store) => log_outcome(result),
        }
    }

    tracing::info!("Prediction poller stopping");
}

fn log_outcome(result: Result<PollOutcome, PredictionApiError>) {
    match result {
        Ok(PollOutcome::Applied {
            seq,
            updated,
            unknown_ids,
        }) => {
            if !unknown_ids.is_empty() {
                tracing::debug!(seq, ?unknown_ids, "Ignoring predictions for unknown machines");
            }
            tracing::info!(seq, updated, "Predictions applied");
        }
        Ok(PollOutcome::Stale { seq, applied_seq }) => {
            tracing::warn!(seq, applied_seq, "Discarding stale prediction response");
        }
        Err(PredictionApiError::Request(e)) => {
            tracing::error!(error = %e, "Cannot reach prediction service");
        }
        Err(e @ PredictionApiError::ApiError { .. }) => {
            tracing::error!(error = %e, "Prediction service returned an error");
        }
        Err(e @ PredictionApiError::Malformed(_)) => {
            tracing::error!(error = %e, "Prediction service returned a malformed response");
        }
    }
}

/// Owner of a running poll loop.
///
/// Dropping the handle cancels the loop. Use [`PollerHandle::shutdown`] to
/// also wait for it to finish.
pub struct PollerHandle {
    cancel: CancellationToken,
    refresh: Arc<Notify>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Ask for an immediate poll. Coalesces with any pending request.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Token that stops the loop when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel the loop and wait (bounded) for the task to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if tokio::time::timeout(SHUTDOWN_GRACE, task).await.is_err() {
                tracing::warn!("Prediction poller did not stop within the grace period");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Spawn the poll loop on the current runtime.
pub fn spawn(api: PredictionApi, store: Arc<MachineStore>, interval: Duration) -> PollerHandle {
    let cancel = CancellationToken::new();
    let refresh = Arc::new(Notify::new());

    let task = tokio::spawn(run(
        api,
        store,
        interval,
        Arc::clone(&refresh),
        cancel.clone(),
    ));

    PollerHandle {
        cancel,
        refresh,
        task: Some(task),
    }
}
