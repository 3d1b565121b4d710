//! Metric derivation over a tagged commit stream.
//!
//! The calculators are pure functions over in-memory commits; each one
//! consumes the full stream independently and allocates its own working
//! state.

pub mod merge_ratio;
pub mod persistence;
pub mod types;

pub use merge_ratio::compute_merge_ratio;
pub use persistence::compute_persistence;
pub use types::{MergeRatioResult, Metrics, PersistenceBuckets, PersistenceResult, Window};

use chrono::{DateTime, Utc};

use crate::models::CommitStream;

/// Fixed caveats attached to every metrics record.
pub const CAVEATS: &[&str] = &[
    "Persistence is file-level, not line-level.",
    "Merge ratio computed on default branch only.",
    "AI tagging uses heuristic patterns; false positives/negatives possible.",
];

/// Compute all metrics for a commit stream, stamped with the current time.
pub fn calculate_metrics(stream: &CommitStream) -> Metrics {
    calculate_metrics_at(stream, Utc::now())
}

/// Compute all metrics for a commit stream with an explicit generation time.
pub fn calculate_metrics_at(stream: &CommitStream, generated_at: DateTime<Utc>) -> Metrics {
    Metrics {
        generated_at,
        window: Window {
            since: stream.since.clone(),
            until: stream.until.clone(),
        },
        repo_path: stream.repo_path.clone(),
        default_branch: stream.default_branch.clone(),
        merge_ratio: compute_merge_ratio(&stream.commits),
        persistence: compute_persistence(&stream.commits),
        caveats: CAVEATS.iter().map(|c| c.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{make_commit, make_stream};

    fn generated_at() -> DateTime<Utc> {
        "2025-02-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_assembles_both_calculators() {
        let mut stream = make_stream(vec![
            make_commit("a", "2025-01-01T00:00:00Z", true, &["a.rs"]),
            make_commit("b", "2025-01-05T00:00:00Z", false, &["a.rs"]),
        ]);
        stream.since = Some("90d".to_string());

        let metrics = calculate_metrics_at(&stream, generated_at());

        assert_eq!(metrics.generated_at, generated_at());
        assert_eq!(metrics.window.since.as_deref(), Some("90d"));
        assert_eq!(metrics.window.until, None);
        assert_eq!(metrics.repo_path, "/test/repo");
        assert_eq!(metrics.default_branch, "main");
        assert_eq!(metrics.merge_ratio.ai_commits_total, 1);
        assert_eq!(metrics.persistence.avg_days, 4.0);
        assert_eq!(metrics.caveats.len(), 3);
    }

    #[test]
    fn test_empty_stream_yields_zeroes() {
        let metrics = calculate_metrics_at(&make_stream(vec![]), generated_at());

        assert_eq!(metrics.merge_ratio, MergeRatioResult::default());
        assert_eq!(metrics.persistence, PersistenceResult::default());
    }

    #[test]
    fn test_metrics_round_trip_through_json() {
        let stream = make_stream(vec![make_commit("a", "2025-01-01T00:00:00Z", true, &["a.rs"])]);
        let metrics = calculate_metrics_at(&stream, generated_at());

        let json = serde_json::to_string_pretty(&metrics).unwrap();
        assert!(json.contains("\"mergeRatio\""));
        assert!(json.contains("\"d0_1\""));
        let restored: Metrics = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, metrics);
    }
}
