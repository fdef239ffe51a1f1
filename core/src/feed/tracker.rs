use std::sync::{Arc, RwLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::config::ScopeConfig;
use crate::feed::parser::{parse_document, ParseContext};
use crate::feed::record::{FeedDocument, TrackRecord};
use crate::prelude::{FeedResult, FeedSource, TrackerStatus};
use crate::telemetry::SweepMetrics;

/// Per-frame view of the tracker state. `records` is the atomically swapped
/// live set; holding the `Arc` keeps one sweep's data alive regardless of
/// later replacements.
#[derive(Debug, Clone)]
pub struct TrackerSnapshot {
    pub records: Arc<[TrackRecord]>,
    pub status: TrackerStatus,
    pub last_sweep_started: Instant,
}

struct TrackerState {
    records: Arc<[TrackRecord]>,
    status: TrackerStatus,
    last_sweep_started: Instant,
}

struct Shared {
    state: RwLock<TrackerState>,
    metrics: SweepMetrics,
}

/// Owns the authoritative live record set and the background sweep thread
/// that refreshes it.
///
/// The sweep cadence is the sole writer; render-cadence readers go through
/// [`snapshot`] and can never observe a partially-updated set.
///
/// [`snapshot`]: Tracker::snapshot
pub struct Tracker {
    shared: Arc<Shared>,
    stop_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Tracker {
    /// Spawns the sweep loop on a dedicated thread driving its own runtime.
    pub fn spawn<S>(config: &ScopeConfig, source: S) -> Self
    where
        S: FeedSource + Send + 'static,
    {
        let interval = Duration::from_secs(config.general.fetch_interval_secs.max(1));
        let shared = Arc::new(Shared {
            state: RwLock::new(TrackerState {
                records: Vec::new().into(),
                status: TrackerStatus::Initializing,
                last_sweep_started: Instant::now(),
            }),
            metrics: SweepMetrics::new(),
        });

        let ctx = ParseContext::new(config);
        let (stop_tx, stop_rx) = watch::channel(false);
        let loop_shared = shared.clone();
        let handle = std::thread::Builder::new()
            .name("sweep".into())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed to build sweep runtime");
                runtime.block_on(sweep_loop(loop_shared, ctx, interval, source, stop_rx));
            })
            .expect("failed to spawn sweep thread");

        Self {
            shared,
            stop_tx,
            handle: Some(handle),
            interval,
        }
    }

    /// Render-cadence read: the current live set, status and sweep timestamp.
    pub fn snapshot(&self) -> TrackerSnapshot {
        let state = self.shared.state.read().unwrap();
        TrackerSnapshot {
            records: state.records.clone(),
            status: state.status,
            last_sweep_started: state.last_sweep_started,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        self.interval
    }

    pub fn metrics(&self) -> &SweepMetrics {
        &self.shared.metrics
    }

    /// Requests shutdown and joins the sweep thread. The signal is observed
    /// between ticks, so an in-flight fetch is allowed to finish first.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(true);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn sweep_loop<S: FeedSource>(
    shared: Arc<Shared>,
    ctx: ParseContext,
    interval: Duration,
    mut source: S,
    mut stop_rx: watch::Receiver<bool>,
) {
    info!("sweep loop started, interval {}s", interval.as_secs());
    loop {
        if *stop_rx.borrow() {
            break;
        }

        {
            let mut state = shared.state.write().unwrap();
            state.status = TrackerStatus::Scanning;
            state.last_sweep_started = Instant::now();
        }

        let outcome = source.poll().await;
        apply_sweep_outcome(&shared, &ctx, outcome);

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = stop_rx.changed() => break,
        }
    }
    info!("sweep loop stopped");
}

/// Folds one poll outcome into the shared state. A transport or decode
/// failure, like an empty sweep, leaves the previous live set untouched so a
/// transient upstream hiccup never blanks the display.
fn apply_sweep_outcome(shared: &Shared, ctx: &ParseContext, outcome: FeedResult<FeedDocument>) {
    match outcome {
        Ok(doc) => {
            let records = parse_document(&doc, ctx);
            shared.metrics.record_sweep(records.len());
            if records.is_empty() {
                debug!("sweep produced no contacts in range");
                shared.state.write().unwrap().status = TrackerStatus::NoContacts;
            } else {
                let mut state = shared.state.write().unwrap();
                state.records = records.into();
                state.status = TrackerStatus::Active;
            }
        }
        Err(err) => {
            warn!("feed poll failed: {err}");
            shared.metrics.record_error();
            shared.state.write().unwrap().status = TrackerStatus::NoContacts;
        }
    }
}
