//! Builds the commit stream from repository history.
//!
//! History is read from the default branch only, so every collected commit
//! is in default-branch ancestry by construction.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::cancel;
use crate::dates::{self, DateError};
use crate::git::{GitError, GitOps, LogQuery, RawCommit};
use crate::models::{Commit, CommitStats, CommitStream};
use crate::tagger::{AiTagger, TaggerConfig, TaggerError};
use crate::utils::short_sha;

/// Upper bound on commits read when none is given.
pub const DEFAULT_MAX_COUNT: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    Git(#[from] GitError),
    #[error(transparent)]
    Date(#[from] DateError),
    #[error(transparent)]
    Tagger(#[from] TaggerError),
    #[error("Collection cancelled after {0} commits")]
    Cancelled(usize),
}

/// What to collect.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Window start, ISO or relative (`90d`)
    pub since: Option<String>,
    /// Window end, ISO or relative; defaults to now
    pub until: Option<String>,
    /// Mainline branch; detected when absent
    pub default_branch: Option<String>,
    pub max_count: usize,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            since: None,
            until: None,
            default_branch: None,
            max_count: DEFAULT_MAX_COUNT,
        }
    }
}

pub struct Collector<G: GitOps> {
    git: G,
    tagger: AiTagger,
    ai_patterns: Vec<String>,
    is_cancelled: fn() -> bool,
}

impl<G: GitOps> Collector<G> {
    /// Compile the tagger up front so bad patterns fail before any git work.
    pub fn new(git: G, tagger_config: &TaggerConfig) -> Result<Self, CollectError> {
        Ok(Self {
            git,
            tagger: AiTagger::new(tagger_config)?,
            ai_patterns: tagger_config.extra_patterns.clone(),
            is_cancelled: cancel::is_cancelled,
        })
    }

    /// Replace the cancellation probe (defaults to the Ctrl+C flag).
    pub fn with_cancel_check(mut self, check: fn() -> bool) -> Self {
        self.is_cancelled = check;
        self
    }

    pub fn collect(&self, opts: &CollectOptions) -> Result<CommitStream, CollectError> {
        self.collect_at(opts, Utc::now())
    }

    /// Collect with an explicit "now" for relative window bounds.
    pub fn collect_at(
        &self,
        opts: &CollectOptions,
        now: DateTime<Utc>,
    ) -> Result<CommitStream, CollectError> {
        let repo_root = self.git.repo_root()?;

        let default_branch = match &opts.default_branch {
            Some(branch) => branch.clone(),
            None => self.git.detect_default_branch()?,
        };
        info!("Using default branch: {}", default_branch);

        let since = opts
            .since
            .as_deref()
            .map(|s| dates::parse_date_spec(s, now))
            .transpose()?;
        let until = match opts.until.as_deref() {
            Some(u) => dates::parse_date_spec(u, now)?,
            None => now,
        };
        info!(
            "Collecting commits from {} to {}",
            since
                .as_ref()
                .map(dates::format_iso)
                .unwrap_or_else(|| "beginning".to_string()),
            dates::format_iso(&until)
        );

        let raw_commits = self.git.log_commits(&LogQuery {
            reference: default_branch.clone(),
            since,
            until: Some(until),
            max_count: Some(opts.max_count),
        })?;
        info!("Found {} commits", raw_commits.len());

        let mut commits = Vec::with_capacity(raw_commits.len());
        for raw in raw_commits {
            if (self.is_cancelled)() {
                return Err(CollectError::Cancelled(commits.len()));
            }
            commits.push(self.build_commit(raw, &default_branch));
        }

        Ok(CommitStream {
            repo_path: repo_root.display().to_string(),
            default_branch,
            generated_at: now,
            since: opts.since.clone(),
            until: opts.until.clone(),
            ai_patterns: self.ai_patterns.clone(),
            commits,
        })
    }

    fn build_commit(&self, raw: RawCommit, default_branch: &str) -> Commit {
        debug!("Processing commit {}", short_sha(&raw.hash));

        let files = self.git.file_changes(&raw.hash).unwrap_or_else(|err| {
            warn!(
                "Could not read diff stats for {}: {}",
                short_sha(&raw.hash),
                err
            );
            Vec::new()
        });
        let tags = self.tagger.tag(&raw.message);

        let commit = Commit {
            hash: raw.hash,
            author_name: raw.author_name,
            author_email: raw.author_email,
            author_date: raw.author_date,
            committer_name: raw.committer_name,
            committer_email: raw.committer_email,
            committer_date: raw.committer_date,
            message: raw.message,
            parents: raw.parents,
            branch: Some(default_branch.to_string()),
            in_default_branch_ancestry: true,
            tags,
            stats: CommitStats::from_files(files),
        };
        if commit.is_root() {
            debug!("Reached root commit {}", short_sha(&commit.hash));
        }
        commit
    }
}
