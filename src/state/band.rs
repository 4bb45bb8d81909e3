//! Confidence band definitions for classification results
//!
//! A band summarizes how strongly a clinic's website indicates that it owns
//! scanning equipment, or why no judgement could be made.

use std::fmt;

/// Score at or above which a clinic is classified as owning equipment
pub const LOW_THRESHOLD: u32 = 20;

/// Score at or above which the band is Medium
pub const MEDIUM_THRESHOLD: u32 = 35;

/// Score at or above which the band is High
pub const HIGH_THRESHOLD: u32 = 50;

/// Represents the confidence of a classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConfidenceBand {
    // ===== Classification States =====
    /// Not enough evidence; not classified as owning equipment
    None,

    /// Score 20-34
    Low,

    /// Score 35-49
    Medium,

    /// Score 50 and above
    High,

    // ===== Failure States =====
    /// The target could not be crawled
    Error,

    /// The batch deadline expired before the target finished
    Timeout,
}

impl ConfidenceBand {
    /// Maps a score onto a classification band
    pub fn from_score(score: u32) -> Self {
        if score >= HIGH_THRESHOLD {
            Self::High
        } else if score >= MEDIUM_THRESHOLD {
            Self::Medium
        } else if score >= LOW_THRESHOLD {
            Self::Low
        } else {
            Self::None
        }
    }

    /// Returns true if this band means the clinic likely owns equipment
    pub fn is_positive(&self) -> bool {
        matches!(self, Self::Low | Self::Medium | Self::High)
    }

    /// Returns true if this band represents a failed or abandoned crawl
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::Timeout)
    }

    /// Converts the band to its output label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Error => "ERROR",
            Self::Timeout => "TIMEOUT",
        }
    }

    /// Returns all bands in report order
    pub fn all_bands() -> [Self; 6] {
        [
            Self::High,
            Self::Medium,
            Self::Low,
            Self::None,
            Self::Error,
            Self::Timeout,
        ]
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
