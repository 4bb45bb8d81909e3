//! Statistics over a finished batch
//!
//! This module provides functionality for counting results per band and
//! displaying the run summary.

use crate::model::ScanResult;
use crate::state::ConfidenceBand;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Batch summary statistics
#[derive(Debug, Clone)]
pub struct BatchSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Data rows in the input file
    pub total_rows: usize,

    /// Count of results by band
    pub band_counts: BTreeMap<ConfidenceBand, usize>,

    /// Total pages fetched or attempted across all targets
    pub pages_examined: u64,

    /// Hash of the configuration the batch ran with
    pub config_hash: Option<String>,
}

impl BatchSummary {
    /// Counts the results of a batch
    pub fn from_results(
        results: &[ScanResult],
        total_rows: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let mut band_counts = BTreeMap::new();
        for result in results {
            *band_counts.entry(result.band).or_insert(0) += 1;
        }

        Self {
            started_at,
            finished_at,
            total_rows,
            band_counts,
            pages_examined: results.iter().map(|r| r.pages_examined as u64).sum(),
            config_hash: None,
        }
    }

    pub fn with_config_hash(mut self, hash: impl Into<String>) -> Self {
        self.config_hash = Some(hash.into());
        self
    }

    /// Number of results in the given band
    pub fn count(&self, band: ConfidenceBand) -> usize {
        self.band_counts.get(&band).copied().unwrap_or(0)
    }

    /// Number of crawled targets
    pub fn targets(&self) -> usize {
        self.band_counts.values().sum()
    }

    /// Rows that never became targets
    pub fn skipped(&self) -> usize {
        self.total_rows.saturating_sub(self.targets())
    }

    /// Targets classified as owning equipment
    pub fn positives(&self) -> usize {
        self.band_counts
            .iter()
            .filter(|(band, _)| band.is_positive())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn duration_seconds(&self) -> u64 {
        (self.finished_at - self.started_at).num_seconds().max(0) as u64
    }

    /// Targets finished per minute
    pub fn rate_per_minute(&self) -> f64 {
        let seconds = (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0;
        if seconds > 0.0 {
            self.targets() as f64 * 60.0 / seconds
        } else {
            0.0
        }
    }
}

/// Prints the batch summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `summary` - The statistics to display
pub fn print_summary(summary: &BatchSummary) {
    println!("=== Batch Summary ===\n");

    println!("Overview:");
    println!("  Input rows: {}", summary.total_rows);
    println!("  Targets crawled: {}", summary.targets());
    println!("  Rows skipped: {}", summary.skipped());
    println!("  Pages examined: {}", summary.pages_examined);
    println!();

    println!("Results by Band:");
    for band in ConfidenceBand::all_bands() {
        let count = summary.count(band);
        let percentage = if summary.targets() > 0 {
            (count as f64 / summary.targets() as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", band, count, percentage);
    }
    println!();

    println!(
        "Equipment found: {} / {} targets",
        summary.positives(),
        summary.targets()
    );
    println!(
        "Duration: {}s ({:.1} targets/min)",
        summary.duration_seconds(),
        summary.rate_per_minute()
    );
}
