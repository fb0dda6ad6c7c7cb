//! Background polling of the election record and the status feed driven
//! from it.
//!
//! The monitor owns two cadences: a fast tick that recomputes the countdown
//! from the last fetched record, and a slower refresh that re-fetches the
//! record itself. Both stop when the owner calls [`ElectionMonitor::stop`]
//! or drops the monitor.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Duration, Instant};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::election::{ElectionRecord, StatusReport};

/// Where the current election record comes from.
pub trait RecordSource: Send + Sync {
    /// Fetch the latest record.
    fn fetch(&self) -> BoxFuture<'_, Result<ElectionRecord>>;
}

/// A [`RecordSource`] backed by a JSON file on disk.
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for FileRecordSource {
    fn fetch(&self) -> BoxFuture<'_, Result<ElectionRecord>> {
        async {
            let bytes = std::fs::read(&self.path).map_err(|source| Error::Io {
                path: self.path.display().to_string(),
                source,
            })?;
            Ok(serde_json::from_slice(&bytes)?)
        }
        .boxed()
    }
}

/// The fetched record reduced to what the ticker needs.
#[derive(Debug, Clone, Copy)]
struct ResolvedRecord {
    is_active: bool,
    target: DateTime<Utc>,
}

/// A running monitor over one election record.
///
/// Reports are published on a watch channel, so subscribers only ever see
/// the latest one.
pub struct ElectionMonitor {
    status_rx: watch::Receiver<Option<StatusReport>>,
    refresh_signal: Arc<Notify>,
    task: JoinHandle<()>,
}

impl ElectionMonitor {
    /// Start monitoring. The first fetch happens immediately; the tick and
    /// refresh cadences come from `config`.
    pub fn start(source: Arc<dyn RecordSource>, config: &Config) -> Self {
        let (status_tx, status_rx) = watch::channel(None);
        let refresh_signal = Arc::new(Notify::new());
        let task = tokio::spawn(run_loop(
            source,
            status_tx,
            refresh_signal.clone(),
            config.tick_interval(),
            config.refresh_interval(),
        ));
        info!("Election monitor started");
        Self {
            status_rx,
            refresh_signal,
            task,
        }
    }

    /// The most recently published report. `None` until a fetch has
    /// succeeded.
    pub fn latest(&self) -> Option<StatusReport> {
        self.status_rx.borrow().clone()
    }

    /// A fresh subscription to the published reports.
    pub fn subscribe(&self) -> watch::Receiver<Option<StatusReport>> {
        self.status_rx.clone()
    }

    /// Re-fetch the record ahead of the next scheduled refresh, e.g. after
    /// an admin edits the election.
    pub fn refresh_now(&self) {
        self.refresh_signal.notify_one();
    }

    /// Stop the monitor. The status channel closes once the loop has wound
    /// down.
    pub async fn stop(mut self) {
        self.task.abort();
        // Cancellation surfaces as a JoinError, which is the expected
        // outcome here.
        let _ = (&mut self.task).await;
        info!("Election monitor stopped");
    }
}

impl Drop for ElectionMonitor {
    fn drop(&mut self) {
        // The loop must not outlive its owner.
        self.task.abort();
    }
}

async fn run_loop(
    source: Arc<dyn RecordSource>,
    status_tx: watch::Sender<Option<StatusReport>>,
    refresh_signal: Arc<Notify>,
    tick_period: Duration,
    refresh_period: Duration,
) {
    let mut resolved = refresh_record(&source, None).await;
    publish(&status_tx, resolved);

    let mut tick = interval(tick_period);
    // The fetch above was the first refresh; schedule the next one a full
    // period out.
    let mut refresh = interval_at(Instant::now() + refresh_period, refresh_period);
    loop {
        tokio::select! {
            _ = refresh.tick() => {
                resolved = refresh_record(&source, resolved).await;
                publish(&status_tx, resolved);
            }
            _ = refresh_signal.notified() => {
                debug!("Early refresh requested");
                resolved = refresh_record(&source, resolved).await;
                publish(&status_tx, resolved);
            }
            _ = tick.tick() => {
                publish(&status_tx, resolved);
            }
        }
    }
}

/// Fetch and resolve the record, keeping the previous resolution if the
/// fetch fails or the record is unusable.
async fn refresh_record(
    source: &Arc<dyn RecordSource>,
    previous: Option<ResolvedRecord>,
) -> Option<ResolvedRecord> {
    match source.fetch().await {
        Ok(record) => match record.target_instant() {
            Ok(target) => {
                debug!("Refreshed election record, counting down to {target}");
                Some(ResolvedRecord {
                    is_active: record.is_active,
                    target,
                })
            }
            Err(err) => {
                warn!("Fetched election record is unusable: {err}");
                previous
            }
        },
        Err(err) => {
            warn!("Failed to fetch election record: {err}");
            previous
        }
    }
}

fn publish(status_tx: &watch::Sender<Option<StatusReport>>, resolved: Option<ResolvedRecord>) {
    let report = resolved
        .map(|record| StatusReport::from_remaining(record.is_active, record.target - Utc::now()));
    // Publish unconditionally; subscribers rely on the steady cadence.
    let _ = status_tx.send(report);
}
