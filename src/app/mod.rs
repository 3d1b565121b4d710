use std::path::PathBuf;

use log::info;

use crate::cancel;
use crate::cli::{AnalyzeArgs, CollectArgs, Command, ReportArgs};
use crate::collect::{CollectError, CollectOptions, Collector};
use crate::config::AidaConfig;
use crate::git::{Git, GitOps};
use crate::metrics::{self, Metrics};
use crate::models::CommitStream;
use crate::report::{self, ReportFormat};
use crate::store::{ArtifactStore, FileArtifactStore, StoreError, REPORT_JSON_FILE, REPORT_MD_FILE};
use crate::utils::format_percent;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Collect(#[from] CollectError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

/// Wires CLI commands to the git backend and the output directory.
pub struct App {
    config: AidaConfig,
}

impl App {
    pub fn new(config: AidaConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, command: Command) -> Result<(), AppError> {
        match command {
            Command::Collect(args) => self.run_collect(args),
            Command::Analyze(args) => self.run_analyze(args),
            Command::Report(args) => self.run_report(args),
        }
    }

    fn run_collect(&self, args: CollectArgs) -> Result<(), AppError> {
        let config = self.config.clone().with_overrides(
            &args.ai_patterns,
            args.default_branch.clone(),
            args.output.out_dir.clone(),
        );
        let git = match &args.repo {
            Some(repo) => Git::with_work_dir(repo),
            None => Git::new(),
        };
        let store = FileArtifactStore::new(&config.out_dir);

        cancel::register_handler();
        collect_stream(git, &store, &config, &args)?;
        Ok(())
    }

    fn run_analyze(&self, args: AnalyzeArgs) -> Result<(), AppError> {
        let config = self
            .config
            .clone()
            .with_overrides(&[], None, args.output.out_dir);
        analyze_stream(&FileArtifactStore::new(&config.out_dir))?;
        Ok(())
    }

    fn run_report(&self, args: ReportArgs) -> Result<(), AppError> {
        let config = self
            .config
            .clone()
            .with_overrides(&[], None, args.output.out_dir);
        write_reports(&FileArtifactStore::new(&config.out_dir), args.format)?;
        Ok(())
    }
}

/// Read history, tag commits and save the commit stream.
pub fn collect_stream<G: GitOps, S: ArtifactStore>(
    git: G,
    store: &S,
    config: &AidaConfig,
    args: &CollectArgs,
) -> Result<CommitStream, AppError> {
    info!("Starting commit collection...");

    let collector = Collector::new(git, &config.tagger_config())?;
    let stream = collector.collect(&CollectOptions {
        since: args.since.clone(),
        until: args.until.clone(),
        default_branch: config.default_branch.clone(),
        max_count: args.max_count,
    })?;
    let path = store.save_stream(&stream)?;

    info!("Collected {} commits", stream.commits.len());
    info!("AI-tagged commits: {}", stream.ai_commit_count());
    info!("Output written to: {}", path.display());
    Ok(stream)
}

/// Derive metrics from the saved commit stream.
pub fn analyze_stream<S: ArtifactStore>(store: &S) -> Result<Metrics, AppError> {
    info!("Starting metrics analysis...");

    let stream = store.load_stream()?;
    info!("Analyzing {} commits", stream.commits.len());

    let metrics = metrics::calculate_metrics(&stream);
    let path = store.save_metrics(&metrics)?;

    info!(
        "Merge ratio: {}",
        format_percent(metrics.merge_ratio.merge_ratio)
    );
    info!("Average persistence: {} days", metrics.persistence.avg_days);
    info!("Output written to: {}", path.display());
    Ok(metrics)
}

/// Render the saved metrics in the requested formats.
pub fn write_reports<S: ArtifactStore>(
    store: &S,
    format: ReportFormat,
) -> Result<Vec<PathBuf>, AppError> {
    info!("Generating report...");

    let metrics = store.load_metrics()?;
    let mut written = Vec::new();

    if format.includes_json() {
        let path = store.write_report(REPORT_JSON_FILE, &report::render_json(&metrics)?)?;
        info!("JSON report written to: {}", path.display());
        written.push(path);
    }

    if format.includes_markdown() {
        let path = store.write_report(REPORT_MD_FILE, &report::render_markdown(&metrics))?;
        info!("Markdown report written to: {}", path.display());
        written.push(path);
    }

    info!("Report generation completed");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{make_commit, make_stream};
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory store keyed by file name.
    #[derive(Default)]
    struct MemoryStore {
        stream: RefCell<Option<CommitStream>>,
        metrics: RefCell<Option<Metrics>>,
        reports: RefCell<HashMap<String, String>>,
    }

    impl ArtifactStore for MemoryStore {
        fn save_stream(&self, stream: &CommitStream) -> Result<PathBuf, StoreError> {
            *self.stream.borrow_mut() = Some(stream.clone());
            Ok(PathBuf::from("commit-stream.json"))
        }

        fn load_stream(&self) -> Result<CommitStream, StoreError> {
            self.stream
                .borrow()
                .clone()
                .ok_or_else(|| StoreError::Missing(PathBuf::from("commit-stream.json")))
        }

        fn save_metrics(&self, metrics: &Metrics) -> Result<PathBuf, StoreError> {
            *self.metrics.borrow_mut() = Some(metrics.clone());
            Ok(PathBuf::from("metrics.json"))
        }

        fn load_metrics(&self) -> Result<Metrics, StoreError> {
            self.metrics
                .borrow()
                .clone()
                .ok_or_else(|| StoreError::Missing(PathBuf::from("metrics.json")))
        }

        fn write_report(&self, file_name: &str, contents: &str) -> Result<PathBuf, StoreError> {
            self.reports
                .borrow_mut()
                .insert(file_name.to_string(), contents.to_string());
            Ok(PathBuf::from(file_name))
        }
    }

    fn store_with_stream() -> MemoryStore {
        let store = MemoryStore::default();
        store
            .save_stream(&make_stream(vec![
                make_commit("a", "2025-01-01T00:00:00Z", true, &["a.rs"]),
                make_commit("b", "2025-01-03T00:00:00Z", false, &["a.rs"]),
            ]))
            .unwrap();
        store
    }

    #[test]
    fn test_analyze_saves_metrics() {
        let store = store_with_stream();

        let metrics = analyze_stream(&store).unwrap();

        assert_eq!(metrics.merge_ratio.ai_commits_total, 1);
        assert_eq!(metrics.persistence.avg_days, 2.0);
        assert_eq!(store.load_metrics().unwrap(), metrics);
    }

    #[test]
    fn test_analyze_without_stream_fails() {
        let store = MemoryStore::default();
        assert!(matches!(
            analyze_stream(&store),
            Err(AppError::Store(StoreError::Missing(_)))
        ));
    }

    #[test]
    fn test_report_writes_requested_formats() {
        let store = store_with_stream();
        analyze_stream(&store).unwrap();

        let written = write_reports(&store, ReportFormat::Both).unwrap();

        assert_eq!(written.len(), 2);
        let reports = store.reports.borrow();
        assert!(reports[REPORT_MD_FILE].contains("**Merge Ratio:** 100.0%"));
        let json: Metrics = serde_json::from_str(&reports[REPORT_JSON_FILE]).unwrap();
        assert_eq!(json.persistence.buckets.d2_7, 1);
    }

    #[test]
    fn test_report_markdown_only() {
        let store = store_with_stream();
        analyze_stream(&store).unwrap();

        let written = write_reports(&store, ReportFormat::Md).unwrap();

        assert_eq!(written, vec![PathBuf::from(REPORT_MD_FILE)]);
        assert!(!store.reports.borrow().contains_key(REPORT_JSON_FILE));
    }
}
