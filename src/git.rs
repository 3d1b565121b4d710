use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, FixedOffset, Utc};
use log::{debug, trace};

use crate::models::{FileChange, FileStatus};

/// Errors from git operations
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Git command failed: {0}")]
    CommandFailed(String),
    #[error("Failed to execute git: {0}")]
    ExecutionFailed(#[from] std::io::Error),
    #[error("Failed to parse git output: {0}")]
    ParseError(String),
    #[error("Not a git repository: {0}")]
    NotARepository(String),
}

const FIELD_SEP: char = '\x1f';
const RECORD_SEP: char = '\x1e';
const LOG_FORMAT: &str = "--format=%H%x1f%P%x1f%an%x1f%ae%x1f%aI%x1f%cn%x1f%ce%x1f%cI%x1f%B%x1e";

/// A commit as read from `git log`, before diff stats and tagging.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommit {
    pub hash: String,
    pub parents: Vec<String>,
    pub author_name: String,
    pub author_email: String,
    pub author_date: DateTime<FixedOffset>,
    pub committer_name: String,
    pub committer_email: String,
    pub committer_date: DateTime<FixedOffset>,
    pub message: String,
}

/// Which commits to read from history.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// Ref to walk from (usually the default branch).
    pub reference: String,
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub max_count: Option<usize>,
}

/// Trait for git operations - allows mocking in tests
pub trait GitOps {
    /// Absolute path of the repository work tree
    fn repo_root(&self) -> Result<PathBuf, GitError>;

    /// Guess the mainline branch name (origin/HEAD, then main/master, then current)
    fn detect_default_branch(&self) -> Result<String, GitError>;

    /// Read commits reachable from `query.reference`, newest first
    fn log_commits(&self, query: &LogQuery) -> Result<Vec<RawCommit>, GitError>;

    /// Per-file changes introduced by a commit.
    ///
    /// Merge commits get git's combined diff, which lists no files for a
    /// clean merge, so they come back empty.
    fn file_changes(&self, hash: &str) -> Result<Vec<FileChange>, GitError>;
}

/// Real implementation of GitOps that calls git commands
pub struct Git {
    /// Working directory for git commands
    work_dir: Option<PathBuf>,
}

impl Git {
    pub fn new() -> Self {
        Self { work_dir: None }
    }

    pub fn with_work_dir(work_dir: impl AsRef<Path>) -> Self {
        Self {
            work_dir: Some(work_dir.as_ref().to_path_buf()),
        }
    }

    fn run_git(&self, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = Command::new("git");
        if let Some(ref dir) = self.work_dir {
            cmd.current_dir(dir);
        }
        cmd.args(args);
        trace!("git {}", args.join(" "));

        let output = cmd.output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GitError::CommandFailed(format!(
                "git {} failed: {}",
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl Default for Git {
    fn default() -> Self {
        Self::new()
    }
}

impl GitOps for Git {
    fn repo_root(&self) -> Result<PathBuf, GitError> {
        let output = self
            .run_git(&["rev-parse", "--show-toplevel"])
            .map_err(|e| GitError::NotARepository(e.to_string()))?;
        Ok(PathBuf::from(output.trim()))
    }

    fn detect_default_branch(&self) -> Result<String, GitError> {
        if let Ok(output) = self.run_git(&["symbolic-ref", "refs/remotes/origin/HEAD"]) {
            if let Some(branch) = output.trim().strip_prefix("refs/remotes/origin/") {
                debug!("Default branch from origin/HEAD: {}", branch);
                return Ok(branch.to_string());
            }
        }

        if let Ok(output) = self.run_git(&["branch", "-r"]) {
            let remotes: Vec<&str> = output.lines().map(str::trim).collect();
            for candidate in ["main", "master"] {
                if remotes.contains(&format!("origin/{}", candidate).as_str()) {
                    return Ok(candidate.to_string());
                }
            }
        }

        let current = self.run_git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let current = current.trim();
        if current.is_empty() || current == "HEAD" {
            Ok("main".to_string())
        } else {
            Ok(current.to_string())
        }
    }

    fn log_commits(&self, query: &LogQuery) -> Result<Vec<RawCommit>, GitError> {
        let mut args = vec!["log".to_string(), LOG_FORMAT.to_string()];
        if let Some(since) = query.since {
            args.push(format!("--since={}", since.to_rfc3339()));
        }
        if let Some(until) = query.until {
            args.push(format!("--until={}", until.to_rfc3339()));
        }
        if let Some(max) = query.max_count {
            args.push(format!("--max-count={}", max));
        }
        args.push(query.reference.clone());
        args.push("--".to_string());

        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let output = self.run_git(&args)?;
        parse_log(&output)
    }

    fn file_changes(&self, hash: &str) -> Result<Vec<FileChange>, GitError> {
        let numstat = self.run_git(&["show", "--no-renames", "--numstat", "--format=", hash])?;
        let name_status =
            self.run_git(&["show", "--no-renames", "--name-status", "--format=", hash])?;
        Ok(merge_file_changes(
            &parse_numstat(&numstat),
            &parse_name_status(&name_status),
        ))
    }
}

/// Parse `git log` output produced with [`LOG_FORMAT`].
pub fn parse_log(output: &str) -> Result<Vec<RawCommit>, GitError> {
    output
        .split(RECORD_SEP)
        .map(|record| record.trim_start_matches('\n'))
        .filter(|record| !record.trim().is_empty())
        .map(parse_log_record)
        .collect()
}

fn parse_log_record(record: &str) -> Result<RawCommit, GitError> {
    let fields: Vec<&str> = record.splitn(9, FIELD_SEP).collect();
    if fields.len() != 9 {
        return Err(GitError::ParseError(format!(
            "expected 9 fields in log record, got {}",
            fields.len()
        )));
    }

    let parse_date = |value: &str| {
        DateTime::parse_from_rfc3339(value.trim())
            .map_err(|e| GitError::ParseError(format!("bad date '{}': {}", value, e)))
    };

    Ok(RawCommit {
        hash: fields[0].trim().to_string(),
        parents: fields[1].split_whitespace().map(String::from).collect(),
        author_name: fields[2].to_string(),
        author_email: fields[3].to_string(),
        author_date: parse_date(fields[4])?,
        committer_name: fields[5].to_string(),
        committer_email: fields[6].to_string(),
        committer_date: parse_date(fields[7])?,
        message: fields[8].trim_end().to_string(),
    })
}

/// Parse `--numstat` lines into (path, additions, deletions).
///
/// Binary files (`-\t-`) are skipped.
fn parse_numstat(output: &str) -> Vec<(String, u64, u64)> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let additions = parts.next()?;
            let deletions = parts.next()?;
            let path = parts.next()?;
            if additions == "-" && deletions == "-" {
                return None;
            }
            Some((
                path.to_string(),
                additions.parse().unwrap_or(0),
                deletions.parse().unwrap_or(0),
            ))
        })
        .collect()
}

/// Parse `--name-status` lines into a path -> status map.
fn parse_name_status(output: &str) -> HashMap<String, FileStatus> {
    output
        .lines()
        .filter_map(|line| {
            let (code, path) = line.split_once('\t')?;
            let status = match code.chars().next()? {
                'A' => FileStatus::Added,
                'D' => FileStatus::Deleted,
                'R' => FileStatus::Renamed,
                _ => FileStatus::Modified,
            };
            Some((path.to_string(), status))
        })
        .collect()
}

/// Combine counts with statuses. Paths missing from the status listing fall
/// back to inferring the status from the counts.
fn merge_file_changes(
    numstat: &[(String, u64, u64)],
    statuses: &HashMap<String, FileStatus>,
) -> Vec<FileChange> {
    numstat
        .iter()
        .map(|(path, additions, deletions)| {
            let status = statuses
                .get(path)
                .copied()
                .unwrap_or_else(|| infer_status(*additions, *deletions));
            FileChange::new(path.clone(), Some(status)).with_counts(*additions, *deletions)
        })
        .collect()
}

fn infer_status(additions: u64, deletions: u64) -> FileStatus {
    match (additions, deletions) {
        (a, 0) if a > 0 => FileStatus::Added,
        (0, d) if d > 0 => FileStatus::Deleted,
        _ => FileStatus::Modified,
    }
}
