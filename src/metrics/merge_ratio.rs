use log::debug;

use crate::metrics::types::MergeRatioResult;
use crate::models::Commit;

/// Share of AI-tagged commits that sit in default-branch ancestry.
///
/// Ancestry is resolved by the collector; this only counts.
pub fn compute_merge_ratio(commits: &[Commit]) -> MergeRatioResult {
    let (total, merged) = commits
        .iter()
        .filter(|c| c.is_ai())
        .fold((0u64, 0u64), |(total, merged), c| {
            (total + 1, merged + u64::from(c.in_default_branch_ancestry))
        });

    let merge_ratio = if total > 0 {
        merged as f64 / total as f64
    } else {
        0.0
    };
    debug!("Merge ratio: {}/{} AI commits merged", merged, total);

    MergeRatioResult {
        ai_commits_total: total,
        ai_commits_merged: merged,
        merge_ratio,
    }
}
