//! Result records produced by the metric calculators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How much AI-tagged work reached the default branch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRatioResult {
    pub ai_commits_total: u64,
    pub ai_commits_merged: u64,
    /// `ai_commits_merged / ai_commits_total`, 0 when nothing was tagged.
    pub merge_ratio: f64,
}

/// File counts per lifecycle duration range (inclusive day bounds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistenceBuckets {
    pub d0_1: u64,
    pub d2_7: u64,
    pub d8_30: u64,
    pub d31_90: u64,
    pub d90_plus: u64,
}

impl PersistenceBuckets {
    /// Count one file lifecycle of `days` in its range.
    pub fn record(&mut self, days: u64) {
        match days {
            0..=1 => self.d0_1 += 1,
            2..=7 => self.d2_7 += 1,
            8..=30 => self.d8_30 += 1,
            31..=90 => self.d31_90 += 1,
            _ => self.d90_plus += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.d0_1 + self.d2_7 + self.d8_30 + self.d31_90 + self.d90_plus
    }
}

/// Distribution of how long AI-touched files stayed alive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceResult {
    /// AI-tagged commits in the stream (commits, not files).
    pub commits_considered: u64,
    pub avg_days: f64,
    pub median_days: f64,
    pub buckets: PersistenceBuckets,
}

/// Analysis window echoed from the commit stream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
}

/// The artifact produced by `aida analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub generated_at: DateTime<Utc>,
    pub window: Window,
    pub repo_path: String,
    pub default_branch: String,
    pub merge_ratio: MergeRatioResult,
    pub persistence: PersistenceResult,
    pub caveats: Vec<String>,
}
