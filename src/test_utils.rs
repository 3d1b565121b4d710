//! Shared test utilities for creating test fixtures.
//!
//! This module provides helper functions for creating commits and commit
//! streams used across multiple test modules.

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::models::{Commit, CommitStats, CommitStream, FileChange, FileStatus, TagResult};

/// Evidence attached to AI-tagged fixtures.
pub const FIXTURE_EVIDENCE: &str = "message_pattern:\\[ai\\]";

/// Parse an RFC 3339 timestamp
pub fn ts(value: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(value).expect("valid RFC 3339 timestamp")
}

/// Midnight UTC on 2025-01-01 plus `n` days
pub fn day(n: i64) -> DateTime<FixedOffset> {
    ts("2025-01-01T00:00:00Z") + Duration::days(n)
}

/// Create a commit touching `files` (all modified) at an RFC 3339 timestamp
pub fn make_commit(hash: &str, date: &str, ai: bool, files: &[&str]) -> Commit {
    let changes = files
        .iter()
        .map(|path| FileChange::new(*path, Some(FileStatus::Modified)).with_counts(1, 0))
        .collect();
    make_commit_at(hash, ts(date), ai, changes)
}

/// Create a fully customized commit
pub fn make_commit_at(
    hash: &str,
    date: DateTime<FixedOffset>,
    ai: bool,
    changes: Vec<FileChange>,
) -> Commit {
    let tags = if ai {
        TagResult::from_evidence(vec![FIXTURE_EVIDENCE.to_string()])
    } else {
        TagResult::untagged()
    };
    Commit {
        hash: hash.to_string(),
        author_name: "Test User".to_string(),
        author_email: "test@example.com".to_string(),
        author_date: date,
        committer_name: "Test User".to_string(),
        committer_email: "test@example.com".to_string(),
        committer_date: date,
        message: if ai {
            "[ai] generated change".to_string()
        } else {
            "regular commit".to_string()
        },
        parents: vec![],
        branch: Some("main".to_string()),
        in_default_branch_ancestry: true,
        tags,
        stats: CommitStats::from_files(changes),
    }
}

/// Wrap commits in a stream for `/test/repo` on `main`
pub fn make_stream(commits: Vec<Commit>) -> CommitStream {
    CommitStream {
        repo_path: "/test/repo".to_string(),
        default_branch: "main".to_string(),
        generated_at: "2025-01-01T00:00:00Z"
            .parse::<DateTime<Utc>>()
            .expect("valid timestamp"),
        since: None,
        until: None,
        ai_patterns: vec![],
        commits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_offsets() {
        assert_eq!(day(0), ts("2025-01-01T00:00:00Z"));
        assert_eq!(day(5), ts("2025-01-06T00:00:00Z"));
    }

    #[test]
    fn test_make_commit() {
        let commit = make_commit("abc123", "2025-01-01T00:00:00Z", true, &["a.rs", "b.rs"]);
        assert!(commit.is_ai());
        assert_eq!(commit.stats.files.len(), 2);
        assert_eq!(commit.stats.total_additions, 2);
    }
}
