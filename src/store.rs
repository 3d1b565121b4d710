//! Artifact storage in the output directory.
//!
//! `collect` writes `commit-stream.json`, `analyze` reads it and writes
//! `metrics.json`, and `report` renders `report.json` / `report.md` from the
//! metrics.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::metrics::Metrics;
use crate::models::CommitStream;

pub const COMMIT_STREAM_FILE: &str = "commit-stream.json";
pub const METRICS_FILE: &str = "metrics.json";
pub const REPORT_JSON_FILE: &str = "report.json";
pub const REPORT_MD_FILE: &str = "report.md";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0} not found. Run the previous step first.")]
    Missing(PathBuf),
}

/// Trait abstracting where artifacts live between commands.
pub trait ArtifactStore {
    fn save_stream(&self, stream: &CommitStream) -> Result<PathBuf, StoreError>;
    fn load_stream(&self) -> Result<CommitStream, StoreError>;
    fn save_metrics(&self, metrics: &Metrics) -> Result<PathBuf, StoreError>;
    fn load_metrics(&self) -> Result<Metrics, StoreError>;
    /// Write a rendered report under `file_name`.
    fn write_report(&self, file_name: &str, contents: &str) -> Result<PathBuf, StoreError>;
}

/// Filesystem-backed store rooted at an output directory.
pub struct FileArtifactStore {
    out_dir: PathBuf,
}

impl FileArtifactStore {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.out_dir.join(file_name)
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<PathBuf, StoreError> {
        let path = self.path(file_name);
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write_report(file_name, &json)
    }

    fn read_json<T: DeserializeOwned>(&self, file_name: &str) -> Result<T, StoreError> {
        let path = self.path(file_name);
        if !path.exists() {
            return Err(StoreError::Missing(path));
        }
        let json = fs::read_to_string(&path)?;
        serde_json::from_str(&json).map_err(|source| StoreError::Json { path, source })
    }
}

impl ArtifactStore for FileArtifactStore {
    fn save_stream(&self, stream: &CommitStream) -> Result<PathBuf, StoreError> {
        self.write_json(COMMIT_STREAM_FILE, stream)
    }

    fn load_stream(&self) -> Result<CommitStream, StoreError> {
        self.read_json(COMMIT_STREAM_FILE)
    }

    fn save_metrics(&self, metrics: &Metrics) -> Result<PathBuf, StoreError> {
        self.write_json(METRICS_FILE, metrics)
    }

    fn load_metrics(&self) -> Result<Metrics, StoreError> {
        self.read_json(METRICS_FILE)
    }

    fn write_report(&self, file_name: &str, contents: &str) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.path(file_name);

        // Write next to the target and rename so readers never see a partial file
        let mut temp_file = tempfile::NamedTempFile::new_in(&self.out_dir)?;
        temp_file.write_all(contents.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(&path).map_err(|e| e.error)?;

        Ok(path)
    }
}
