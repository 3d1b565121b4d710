//! File persistence of AI-touched files.
//!
//! A file's lifecycle starts at the first AI-tagged commit that touches it
//! and ends at the last later commit that touches it without deleting it.
//! A deletion never advances the lifecycle: the last live sighting stands.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use log::debug;

use crate::dates::days_between;
use crate::metrics::types::{PersistenceBuckets, PersistenceResult};
use crate::models::Commit;
use crate::utils::{mean, median, round2};

struct FileLifecycle {
    first_ai_commit_date: DateTime<FixedOffset>,
    last_seen_date: DateTime<FixedOffset>,
}

impl FileLifecycle {
    fn starting_at(date: DateTime<FixedOffset>) -> Self {
        Self {
            first_ai_commit_date: date,
            last_seen_date: date,
        }
    }

    fn persistence_days(&self) -> u64 {
        days_between(&self.first_ai_commit_date, &self.last_seen_date)
    }
}

/// Compute persistence statistics over the whole stream.
///
/// Input order only matters for commits sharing an author timestamp, which
/// keep their relative order.
pub fn compute_persistence(commits: &[Commit]) -> PersistenceResult {
    let commits_considered = commits.iter().filter(|c| c.is_ai()).count() as u64;
    if commits_considered == 0 {
        return PersistenceResult::default();
    }

    let mut sorted: Vec<&Commit> = commits.iter().collect();
    sorted.sort_by_key(|c| c.author_date);

    // Seed lifecycles from AI commits, oldest first.
    let mut lifecycles: HashMap<&str, FileLifecycle> = HashMap::new();
    for commit in sorted.iter().filter(|c| c.is_ai()) {
        for file in &commit.stats.files {
            lifecycles
                .entry(file.path.as_str())
                .or_insert_with(|| FileLifecycle::starting_at(commit.author_date));
        }
    }

    // Advance last sightings from every commit, tagged or not.
    for commit in &sorted {
        for file in commit.stats.files.iter().filter(|f| !f.is_deletion()) {
            if let Some(lifecycle) = lifecycles.get_mut(file.path.as_str()) {
                lifecycle.last_seen_date = commit.author_date;
            }
        }
    }

    let durations: Vec<u64> = lifecycles
        .values()
        .map(FileLifecycle::persistence_days)
        .collect();

    let mut buckets = PersistenceBuckets::default();
    for &days in &durations {
        buckets.record(days);
    }

    debug!(
        "Persistence: {} files tracked from {} AI commits",
        buckets.total(),
        commits_considered
    );

    PersistenceResult {
        commits_considered,
        avg_days: round2(mean(&durations)),
        median_days: round2(median(&durations)),
        buckets,
    }
}
