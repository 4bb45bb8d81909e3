//! Batch progress tracking
//!
//! Workers record finished targets into a [`ProgressTracker`]; a reporter
//! task logs a snapshot at a fixed interval so that long batches show signs
//! of life.

use crate::model::ScanResult;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Point-in-time view of batch progress
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Targets finished per minute
    pub fn rate_per_minute(&self) -> f64 {
        let minutes = self.elapsed.as_secs_f64() / 60.0;
        if minutes > 0.0 {
            self.processed as f64 / minutes
        } else {
            0.0
        }
    }

    /// Estimated time until every target is finished
    ///
    /// None until at least one target has finished.
    pub fn eta(&self) -> Option<Duration> {
        if self.processed == 0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.processed);
        let per_target = self.elapsed.as_secs_f64() / self.processed as f64;
        Some(Duration::from_secs_f64(per_target * remaining as f64))
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.processed as f64 * 100.0 / self.total as f64
        }
    }
}

/// Shared progress counters for one batch
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    processed: AtomicUsize,
    started: Instant,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            started: Instant::now(),
        }
    }

    /// Counts a finished target and logs its outcome
    pub fn record(&self, result: &ScanResult) {
        let processed = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            "[{}/{}] {}: {} (score {})",
            processed, self.total, result.target.name, result.band, result.score
        );
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            total: self.total,
            elapsed: self.started.elapsed(),
        }
    }
}

/// Spawns a task that publishes and logs a snapshot every `interval`
///
/// The task ends when `stop` is cancelled. The returned receiver sees every
/// published snapshot.
pub fn spawn_reporter(
    tracker: Arc<ProgressTracker>,
    interval: Duration,
    stop: CancellationToken,
) -> (JoinHandle<()>, watch::Receiver<ProgressSnapshot>) {
    let (tx, rx) = watch::channel(tracker.snapshot());

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                _ = ticker.tick() => {
                    let snapshot = tracker.snapshot();
                    log_snapshot(&snapshot);
                    let _ = tx.send(snapshot);
                }
            }
        }
    });

    (handle, rx)
}

fn log_snapshot(snapshot: &ProgressSnapshot) {
    let eta = snapshot
        .eta()
        .map(format_duration)
        .unwrap_or_else(|| "unknown".to_string());

    info!(
        "Progress: {}/{} ({:.1}%), elapsed {}, ETA {}, {:.1} targets/min",
        snapshot.processed,
        snapshot.total,
        snapshot.percent(),
        format_duration(snapshot.elapsed),
        eta,
        snapshot.rate_per_minute()
    );
}

/// Formats a duration as `MmSSs`
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}m{:02}s", secs / 60, secs % 60)
}
