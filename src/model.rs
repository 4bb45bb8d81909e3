//! Shared data model: crawl targets and their classification results

use crate::scoring::Classification;
use crate::state::ConfidenceBand;

/// One clinic to classify
///
/// Built from an input row and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Index of the source row in the input table (header excluded)
    pub row: usize,
    pub name: String,
    /// Seed URL as written in the input; may be empty
    pub website: String,
    pub email: String,
}

impl Target {
    pub fn new(
        row: usize,
        name: impl Into<String>,
        website: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            row,
            name: name.into(),
            website: website.into(),
            email: email.into(),
        }
    }

    /// Returns true if the target has a website to crawl
    pub fn has_website(&self) -> bool {
        !self.website.trim().is_empty()
    }
}

/// Classification outcome for one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub target: Target,
    pub has_equipment: bool,
    pub band: ConfidenceBand,
    pub score: u32,
    pub evidence: String,
    pub reason: String,
    /// Empty unless the band is Error or Timeout
    pub error: String,
    pub pages_examined: u32,
}

impl ScanResult {
    /// Result for a target whose crawl completed and was scored
    pub fn classified(target: Target, classification: Classification, pages_examined: u32) -> Self {
        Self {
            target,
            has_equipment: classification.has_equipment,
            band: classification.band,
            score: classification.score,
            evidence: classification.evidence,
            reason: classification.reason,
            error: String::new(),
            pages_examined,
        }
    }

    /// Result for a target with no website on record
    pub fn no_website(target: Target) -> Self {
        Self {
            target,
            has_equipment: false,
            band: ConfidenceBand::None,
            score: 0,
            evidence: String::new(),
            reason: "no website".to_string(),
            error: String::new(),
            pages_examined: 0,
        }
    }

    /// Result for a target whose crawl failed
    pub fn error(target: Target, message: impl Into<String>, pages_examined: u32) -> Self {
        let message = message.into();
        Self {
            target,
            has_equipment: false,
            band: ConfidenceBand::Error,
            score: 0,
            evidence: String::new(),
            reason: format!("crawl error: {}", message),
            error: message,
            pages_examined,
        }
    }

    /// Result for a target abandoned at the batch deadline
    ///
    /// Partial crawls are not scored; only the progress made is reported.
    pub fn timed_out(target: Target, message: impl Into<String>, pages_examined: u32) -> Self {
        let message = message.into();
        Self {
            target,
            has_equipment: false,
            band: ConfidenceBand::Timeout,
            score: 0,
            evidence: String::new(),
            reason: format!("{} ({} pages examined)", message, pages_examined),
            error: message,
            pages_examined,
        }
    }

    /// Status label used in output records
    pub fn status(&self) -> &'static str {
        match self.band {
            ConfidenceBand::Error => "error",
            ConfidenceBand::Timeout => "timeout",
            _ if self.has_equipment => "found",
            _ => "not found",
        }
    }
}
