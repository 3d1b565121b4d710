use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Best-effort status of a file within a commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
}

/// A single file touched by a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    pub additions: u64,
    pub deletions: u64,
}

impl FileChange {
    pub fn new(path: impl Into<String>, status: Option<FileStatus>) -> Self {
        Self {
            path: path.into(),
            status,
            additions: 0,
            deletions: 0,
        }
    }

    pub fn with_counts(mut self, additions: u64, deletions: u64) -> Self {
        self.additions = additions;
        self.deletions = deletions;
        self
    }

    /// True when the change removes the file from the tree.
    pub fn is_deletion(&self) -> bool {
        self.status == Some(FileStatus::Deleted)
    }
}

/// Aggregate line counts and the ordered per-file changes of a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStats {
    pub total_additions: u64,
    pub total_deletions: u64,
    pub files: Vec<FileChange>,
}

impl CommitStats {
    /// Build stats from file changes, summing their counters.
    pub fn from_files(files: Vec<FileChange>) -> Self {
        let total_additions = files.iter().map(|f| f.additions).sum();
        let total_deletions = files.iter().map(|f| f.deletions).sum();
        Self {
            total_additions,
            total_deletions,
            files,
        }
    }
}

/// Outcome of running the AI heuristics over a commit message.
///
/// A tagged result always carries at least one evidence entry and an
/// untagged one carries none. The fields are private so the only way to
/// build a value is through [`TagResult::untagged`] and
/// [`TagResult::from_evidence`], which keep the two in agreement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTagResult")]
pub struct TagResult {
    ai: bool,
    sources: Vec<String>,
}

impl TagResult {
    pub fn untagged() -> Self {
        Self {
            ai: false,
            sources: Vec::new(),
        }
    }

    /// Tagged if any evidence was collected, untagged otherwise.
    pub fn from_evidence(evidence: Vec<String>) -> Self {
        Self {
            ai: !evidence.is_empty(),
            sources: evidence,
        }
    }

    pub fn is_ai(&self) -> bool {
        self.ai
    }

    pub fn evidence(&self) -> &[String] {
        &self.sources
    }
}

impl Default for TagResult {
    fn default() -> Self {
        Self::untagged()
    }
}

#[derive(Deserialize)]
struct RawTagResult {
    ai: bool,
    #[serde(default)]
    sources: Vec<String>,
}

impl TryFrom<RawTagResult> for TagResult {
    type Error = String;

    fn try_from(raw: RawTagResult) -> Result<Self, Self::Error> {
        match (raw.ai, raw.sources.is_empty()) {
            (true, true) => Err("tag marked ai without any evidence".to_string()),
            (false, false) => Err(format!(
                "tag not marked ai but carries {} evidence entries",
                raw.sources.len()
            )),
            _ => Ok(Self {
                ai: raw.ai,
                sources: raw.sources,
            }),
        }
    }
}

/// A commit as recorded in the commit stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub author_date: DateTime<FixedOffset>,
    pub committer_name: String,
    pub committer_email: String,
    pub committer_date: DateTime<FixedOffset>,
    pub message: String,
    pub parents: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    pub in_default_branch_ancestry: bool,
    pub tags: TagResult,
    pub stats: CommitStats,
}

impl Commit {
    pub fn is_ai(&self) -> bool {
        self.tags.is_ai()
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }
}

/// The artifact produced by `aida collect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitStream {
    pub repo_path: String,
    pub default_branch: String,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    #[serde(default)]
    pub ai_patterns: Vec<String>,
    pub commits: Vec<Commit>,
}

impl CommitStream {
    pub fn ai_commit_count(&self) -> usize {
        self.commits.iter().filter(|c| c.is_ai()).count()
    }
}
