//! Run configuration.
//!
//! Settings can be configured via:
//! - CLI arguments: `--ai-pattern`, `--default-branch`, `--out-dir`
//! - Environment variables: `AIDA_AI_PATTERNS` (comma separated),
//!   `AIDA_DEFAULT_BRANCH`, `AIDA_OUT_DIR`
//!
//! CLI arguments take precedence over environment variables.

use std::env;
use std::path::PathBuf;

use crate::tagger::TaggerConfig;

/// Default directory for collected and derived artifacts.
pub const DEFAULT_OUT_DIR: &str = "./aida-output";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AidaConfig {
    pub ai_patterns: Vec<String>,
    pub default_branch: Option<String>,
    pub out_dir: PathBuf,
}

impl Default for AidaConfig {
    fn default() -> Self {
        Self {
            ai_patterns: Vec::new(),
            default_branch: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl AidaConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(patterns) = lookup("AIDA_AI_PATTERNS") {
            config.ai_patterns = split_patterns(&patterns);
        }
        config.default_branch = lookup("AIDA_DEFAULT_BRANCH").filter(|b| !b.trim().is_empty());
        if let Some(dir) = lookup("AIDA_OUT_DIR").filter(|d| !d.trim().is_empty()) {
            config.out_dir = PathBuf::from(dir);
        }
        config
    }

    /// Merge with CLI overrides. CLI values take precedence; CLI patterns
    /// replace environment patterns when any are given.
    pub fn with_overrides(
        mut self,
        ai_patterns: &[String],
        default_branch: Option<String>,
        out_dir: Option<PathBuf>,
    ) -> Self {
        if !ai_patterns.is_empty() {
            self.ai_patterns = ai_patterns.to_vec();
        }
        if let Some(branch) = default_branch {
            self.default_branch = Some(branch);
        }
        if let Some(dir) = out_dir {
            self.out_dir = dir;
        }
        self
    }

    pub fn tagger_config(&self) -> TaggerConfig {
        TaggerConfig::new().with_extra_patterns(self.ai_patterns.iter().cloned())
    }
}

fn split_patterns(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
