//! Batch scheduler for crawling many targets concurrently
//!
//! This module handles:
//! - Bounding concurrent crawls with a semaphore
//! - Enforcing a global deadline through a shared cancellation token
//! - Isolating task panics so one bad target cannot sink the batch
//! - Returning results in input order regardless of completion order

use super::progress::{spawn_reporter, ProgressTracker};
use super::site::{CrawlFailure, SiteCrawler};
use crate::config::SchedulerConfig;
use crate::model::{ScanResult, Target};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Runs one [`SiteCrawler`] per target with a bounded worker pool
///
/// The scheduler coordinates:
/// - Worker limit (at most `workers` targets crawled at once)
/// - Global deadline (unfinished targets become Timeout results)
/// - Shutdown grace (tasks still running after it are aborted)
/// - Periodic progress reporting
#[derive(Clone)]
pub struct BatchScheduler {
    crawler: SiteCrawler,
    workers: usize,
    deadline: Duration,
    shutdown_grace: Duration,
    progress_interval: Duration,
}

impl BatchScheduler {
    pub fn new(crawler: SiteCrawler, config: &SchedulerConfig) -> Self {
        Self {
            crawler,
            workers: config.workers.max(1) as usize,
            deadline: Duration::from_secs(config.deadline_secs),
            shutdown_grace: Duration::from_secs(config.shutdown_grace_secs),
            progress_interval: Duration::from_secs(config.progress_interval_secs),
        }
    }

    /// Overrides the global deadline
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Overrides the grace period granted to cancelled tasks
    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }

    /// Crawls every target and returns one result per target, in input order
    ///
    /// # Deadline Handling
    ///
    /// | Target state at deadline | Result |
    /// |--------------------------|--------|
    /// | Finished | its own result |
    /// | Crawling | Timeout, with pages examined so far |
    /// | Waiting for a worker | Timeout, 0 pages |
    /// | Still running after the grace period | aborted, Timeout |
    ///
    /// A task that panics yields an Error result for its target.
    pub async fn run(&self, targets: Vec<Target>) -> Vec<ScanResult> {
        let tracker = Arc::new(ProgressTracker::new(targets.len()));
        self.run_with_progress(targets, tracker).await
    }

    /// Same as [`run`](Self::run), recording into a caller-owned tracker
    pub async fn run_with_progress(
        &self,
        targets: Vec<Target>,
        tracker: Arc<ProgressTracker>,
    ) -> Vec<ScanResult> {
        let total = targets.len();
        info!(
            "Starting batch: {} targets, {} workers, deadline {}s",
            total,
            self.workers,
            self.deadline.as_secs()
        );

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let cancel = CancellationToken::new();
        let stop_reporter = CancellationToken::new();
        let (reporter, _) = spawn_reporter(tracker.clone(), self.progress_interval, stop_reporter.clone());

        let mut slots: Vec<Option<ScanResult>> = vec![None; total];
        let mut task_slots: HashMap<Id, usize> = HashMap::with_capacity(total);
        let mut tasks = JoinSet::new();

        for (index, target) in targets.iter().cloned().enumerate() {
            let crawler = self.crawler.clone();
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();
            let tracker = tracker.clone();

            let handle = tasks.spawn(async move {
                let result = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        ScanResult::timed_out(target, CrawlFailure::SchedulerTimeout.to_string(), 0)
                    }
                    permit = semaphore.acquire_owned() => {
                        let _permit = permit;
                        crawler.crawl(target, &cancel).await
                    }
                };
                tracker.record(&result);
                (index, result)
            });
            task_slots.insert(handle.id(), index);
        }

        let deadline = tokio::time::sleep(self.deadline);
        tokio::pin!(deadline);

        let mut deadline_hit = false;
        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(joined) => store(joined, &task_slots, &targets, &mut slots, &tracker),
                    None => break,
                },
                _ = &mut deadline => {
                    deadline_hit = true;
                    break;
                }
            }
        }

        if deadline_hit {
            warn!(
                "Batch deadline of {}s reached, cancelling {} unfinished targets",
                self.deadline.as_secs(),
                tasks.len()
            );
            cancel.cancel();

            let drained = tokio::time::timeout(self.shutdown_grace, async {
                while let Some(joined) = tasks.join_next().await {
                    store(joined, &task_slots, &targets, &mut slots, &tracker);
                }
            })
            .await;

            if drained.is_err() {
                warn!("Aborting {} tasks still running after the grace period", tasks.len());
                tasks.abort_all();
                while let Some(joined) = tasks.join_next().await {
                    store(joined, &task_slots, &targets, &mut slots, &tracker);
                }
            }
        }

        stop_reporter.cancel();
        let _ = reporter.await;

        slots
            .into_iter()
            .zip(targets)
            .map(|(slot, target)| {
                slot.unwrap_or_else(|| {
                    ScanResult::timed_out(target, CrawlFailure::SchedulerTimeout.to_string(), 0)
                })
            })
            .collect()
    }
}

/// Writes a joined task's result into its slot
///
/// Aborted tasks become Timeout results, panicked tasks become Error results.
fn store(
    joined: Result<(usize, ScanResult), JoinError>,
    task_slots: &HashMap<Id, usize>,
    targets: &[Target],
    slots: &mut [Option<ScanResult>],
    tracker: &ProgressTracker,
) {
    match joined {
        Ok((index, result)) => slots[index] = Some(result),
        Err(join_error) => {
            let Some(&index) = task_slots.get(&join_error.id()) else {
                error!("Lost track of a crawl task: {}", join_error);
                return;
            };
            let target = targets[index].clone();

            let result = if join_error.is_cancelled() {
                ScanResult::timed_out(target, CrawlFailure::SchedulerTimeout.to_string(), 0)
            } else {
                error!(name = %target.name, "Crawl task panicked: {}", join_error);
                let failure = CrawlFailure::TaskPanicked(join_error.to_string());
                ScanResult::error(target, failure.to_string(), 0)
            };
            tracker.record(&result);
            slots[index] = Some(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::crawler::testing::ScriptedFetcher;
    use crate::crawler::{FetchError, FetchedPage, PageFetcher};
    use crate::state::ConfidenceBand;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;
    use url::Url;

    /// Answers every URL with an empty page after a pause, tracking overlap
    #[derive(Default)]
    struct OverlapFetcher {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl PageFetcher for OverlapFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            Ok(FetchedPage {
                final_url: url.clone(),
                title: None,
                text: String::new(),
                links: Vec::new(),
            })
        }
    }

    fn scheduler(fetcher: ScriptedFetcher, workers: u32) -> BatchScheduler {
        let mut config = Config::default();
        config.crawler.politeness_delay_ms = 0;
        config.scheduler.workers = workers;
        let scheduler_config = config.scheduler.clone();
        let crawler = SiteCrawler::new(Arc::new(fetcher), Arc::new(config));
        BatchScheduler::new(crawler, &scheduler_config)
    }

    fn target(row: usize, host: &str) -> Target {
        Target::new(row, host, format!("https://{}/", host), "")
    }

    #[tokio::test]
    async fn test_results_in_input_order() {
        let mut fetcher = ScriptedFetcher::new();
        let mut targets = Vec::new();
        for i in 0..7 {
            let host = format!("clinic{}.kr", i);
            let body = if i % 2 == 0 { "<p>itero trios</p>" } else { "<p>hello</p>" };
            fetcher = fetcher.page(&format!("https://{}/", host), body);
            targets.push(target(i, &host));
        }

        let results = scheduler(fetcher, 3).run(targets).await;

        assert_eq!(results.len(), 7);
        for (i, result) in results.iter().enumerate() {
            assert_eq!(result.target.row, i);
            assert_eq!(result.has_equipment, i % 2 == 0);
        }
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = scheduler(ScriptedFetcher::new(), 2).run(Vec::new()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_deadline_turns_stragglers_into_timeouts() {
        let fetcher = ScriptedFetcher::new()
            .page("https://slow.kr/", r#"<a href="/hang">next</a>"#)
            .hang("https://slow.kr/hang")
            .hang("https://stuck.kr/")
            .hang("https://waiting.kr/");
        let targets = vec![
            target(0, "slow.kr"),
            target(1, "stuck.kr"),
            target(2, "waiting.kr"),
        ];

        let started = Instant::now();
        let results = scheduler(fetcher, 2)
            .with_deadline(Duration::from_millis(200))
            .with_shutdown_grace(Duration::from_secs(5))
            .run(targets)
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(results.iter().all(|r| r.band == ConfidenceBand::Timeout));
        assert_eq!(results[0].pages_examined, 2);
        assert_eq!(results[1].pages_examined, 1);
        // never got a worker
        assert_eq!(results[2].pages_examined, 0);
        assert!(results[2].reason.contains("0 pages examined"));
    }

    #[tokio::test]
    async fn test_panicking_target_is_isolated() {
        let fetcher = ScriptedFetcher::new()
            .page("https://ok.kr/", "<p>medit i700</p>")
            .panic("https://boom.kr/");
        let targets = vec![target(0, "boom.kr"), target(1, "ok.kr")];

        let results = scheduler(fetcher, 2).run(targets).await;

        assert_eq!(results[0].band, ConfidenceBand::Error);
        assert!(results[0].error.starts_with("crawl task failed"));
        assert_eq!(results[1].target.name, "ok.kr");
        assert_eq!(results[1].score, 24);
    }

    #[tokio::test]
    async fn test_targets_without_website_complete_offline() {
        let targets = vec![Target::new(0, "No Site", "", "a@b.kr")];
        let results = scheduler(ScriptedFetcher::new(), 1).run(targets).await;
        assert_eq!(results[0].band, ConfidenceBand::None);
        assert_eq!(results[0].reason, "no website");
    }

    #[tokio::test]
    async fn test_worker_budget_bounds_parallel_crawls() {
        let fetcher = Arc::new(OverlapFetcher::default());
        let mut config = Config::default();
        config.crawler.politeness_delay_ms = 0;
        config.scheduler.workers = 3;
        let scheduler_config = config.scheduler.clone();
        let crawler = SiteCrawler::new(fetcher.clone(), Arc::new(config));

        let targets = (0..12).map(|i| target(i, &format!("clinic{}.kr", i))).collect();
        let results = BatchScheduler::new(crawler, &scheduler_config).run(targets).await;

        assert_eq!(results.len(), 12);
        assert!(results.iter().all(|r| r.band == ConfidenceBand::None));
        let peak = fetcher.peak.load(Ordering::SeqCst);
        assert!(peak <= 3, "peak of {} parallel fetches", peak);
        assert!(peak > 1);
    }
}
