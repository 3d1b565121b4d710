//! Report formatting for computed metrics.

use clap::ValueEnum;

use crate::dates::format_iso;
use crate::metrics::Metrics;
use crate::utils::format_percent;

/// Which report files to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
    /// Both JSON and Markdown
    #[default]
    Both,
}

impl ReportFormat {
    pub fn includes_json(self) -> bool {
        matches!(self, Self::Json | Self::Both)
    }

    pub fn includes_markdown(self) -> bool {
        matches!(self, Self::Md | Self::Both)
    }
}

/// Pretty-printed JSON copy of the metrics.
pub fn render_json(metrics: &Metrics) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(metrics)
}

/// Human-readable Markdown report.
pub fn render_markdown(metrics: &Metrics) -> String {
    let mut output = String::new();
    let merge = &metrics.merge_ratio;
    let persistence = &metrics.persistence;
    let buckets = &persistence.buckets;

    output.push_str("# AIDA Report\n\n");
    output.push_str(&format!("**Repo:** {}  \n", metrics.repo_path));
    output.push_str(&format!("**Default branch:** {}  \n", metrics.default_branch));
    output.push_str(&format!(
        "**Window:** {} → {}  \n",
        metrics.window.since.as_deref().unwrap_or("beginning"),
        metrics.window.until.as_deref().unwrap_or("now")
    ));
    output.push_str(&format!(
        "**Generated:** {}\n\n",
        format_iso(&metrics.generated_at)
    ));

    output.push_str("## Merge Ratio\n");
    output.push_str(&format!(
        "- AI-tagged commits (total): {}\n",
        merge.ai_commits_total
    ));
    output.push_str(&format!(
        "- AI-tagged commits merged: {}\n",
        merge.ai_commits_merged
    ));
    output.push_str(&format!(
        "- **Merge Ratio:** {}\n\n",
        format_percent(merge.merge_ratio)
    ));

    output.push_str("## Persistence (file-level proxy)\n");
    output.push_str(&format!(
        "- Commits considered: {}\n",
        persistence.commits_considered
    ));
    output.push_str(&format!("- Average days: {}\n", persistence.avg_days));
    output.push_str(&format!("- Median days: {}\n\n", persistence.median_days));

    output.push_str("| 0–1d | 2–7d | 8–30d | 31–90d | 90d+ |\n");
    output.push_str("|---:|---:|---:|---:|---:|\n");
    output.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n\n",
        buckets.d0_1, buckets.d2_7, buckets.d8_30, buckets.d31_90, buckets.d90_plus
    ));

    output.push_str("### Caveats\n");
    for caveat in &metrics.caveats {
        output.push_str(&format!("- {}\n", caveat));
    }

    output
}
