//! Ingest runner: the single task that owns the schedule.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use dorepo_core::config::WorkerConfig;
use dorepo_core::error::AppError;
use dorepo_core::result::AppResult;

use crate::executor::{IngestJob, JobExecutionError};
use crate::queue::{AsyncIngestQueue, ScheduledIngest};

/// Schedule key. The sequence number keeps entries with equal timestamps apart.
type ScheduleKey = (DateTime<Utc>, u64);

/// Owns the ingest schedule and runs due entries on a fixed interval.
#[derive(Debug)]
pub struct IngestRunner {
    /// Job run for each due entry
    job: Arc<dyn IngestJob>,
    /// Interval between sweeps
    poll_interval: Duration,
    /// Producer handle handed out to callers
    queue: AsyncIngestQueue,
    /// Receiving end, moved into the task on start
    receiver: Mutex<Option<mpsc::UnboundedReceiver<ScheduledIngest>>>,
    /// Cancellation signal
    cancel: watch::Sender<bool>,
    /// Running task
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl IngestRunner {
    /// Create a stopped runner. Entries enqueued before [`start`] wait in
    /// the channel.
    ///
    /// [`start`]: IngestRunner::start
    pub fn new(job: Arc<dyn IngestJob>, config: &WorkerConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (cancel, _) = watch::channel(false);
        Self {
            job,
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(1)),
            queue: AsyncIngestQueue::new(sender, Duration::from_millis(config.default_delay_ms)),
            receiver: Mutex::new(Some(receiver)),
            cancel,
            handle: Mutex::new(None),
        }
    }

    /// Producer handle for this runner.
    pub fn queue(&self) -> AsyncIngestQueue {
        self.queue.clone()
    }

    /// Whether the background task is running.
    pub async fn is_running(&self) -> bool {
        self.handle
            .lock()
            .await
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Spawn the background task. Starting a running runner is a no-op;
    /// a stopped runner cannot be restarted.
    pub async fn start(&self) -> AppResult<()> {
        let mut handle = self.handle.lock().await;
        if handle.is_some() {
            return Ok(());
        }

        let receiver = self.receiver.lock().await.take().ok_or_else(|| {
            AppError::service_unavailable("Async ingest queue has been stopped")
        })?;

        let job = Arc::clone(&self.job);
        let cancel = self.cancel.subscribe();
        let poll_interval = self.poll_interval;
        *handle = Some(tokio::spawn(async move {
            run_schedule(job, receiver, cancel, poll_interval).await;
        }));

        tracing::info!(
            "Async ingest queue started with poll_interval={}ms",
            self.poll_interval.as_millis()
        );
        Ok(())
    }

    /// Signal the task to stop and wait for it. Safe to call repeatedly
    /// and on a runner that never started.
    pub async fn stop(&self) {
        let _ = self.cancel.send(true);

        // A never-started runner still holds the receiver; dropping it makes
        // later enqueues fail.
        self.receiver.lock().await.take();

        let handle = self.handle.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::error!("Async ingest queue task ended abnormally: {}", e);
            }
            tracing::info!("Async ingest queue stopped");
        }
    }
}

async fn run_schedule(
    job: Arc<dyn IngestJob>,
    mut receiver: mpsc::UnboundedReceiver<ScheduledIngest>,
    mut cancel: watch::Receiver<bool>,
    poll_interval: Duration,
) {
    let mut schedule: BTreeMap<ScheduleKey, Bytes> = BTreeMap::new();
    let mut sequence = 0u64;
    let mut producers_gone = false;

    let mut ticker = time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // Messages drain before a sweep so entries sent together are
        // ordered by their schedule key, not by arrival.
        tokio::select! {
            biased;

            changed = cancel.changed() => {
                if changed.is_err() || *cancel.borrow() {
                    break;
                }
            }
            message = receiver.recv(), if !producers_gone => {
                match message {
                    Some(entry) => {
                        schedule.insert((entry.run_at, sequence), entry.payload);
                        sequence += 1;
                    }
                    None => producers_gone = true,
                }
            }
            _ = ticker.tick() => {
                sweep(job.as_ref(), &mut schedule).await;
            }
        }
    }

    if !schedule.is_empty() {
        tracing::warn!(
            "Discarding {} pending ingest(s) on shutdown",
            schedule.len()
        );
    }
}

/// Run every entry that is due and remove it, whatever the outcome.
async fn sweep(job: &dyn IngestJob, schedule: &mut BTreeMap<ScheduleKey, Bytes>) {
    let later = schedule.split_off(&(Utc::now(), u64::MAX));
    let due = std::mem::replace(schedule, later);

    for ((run_at, sequence), payload) in due {
        match job.run(&payload).await {
            Ok(id) => {
                tracing::info!("Queued ingest #{} (due {}) stored entity '{}'", sequence, run_at, id);
            }
            Err(JobExecutionError::Rejected(msg)) => {
                tracing::warn!("Queued ingest #{} dropped: {}", sequence, msg);
            }
            Err(JobExecutionError::Failed(err)) => {
                tracing::error!("Queued ingest #{} failed: {}", sequence, err);
            }
        }
    }
}
