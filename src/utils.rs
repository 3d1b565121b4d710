/// Truncate a SHA to its first 8 characters for display
pub fn short_sha(sha: &str) -> &str {
    &sha[..8.min(sha.len())]
}

/// Round to two decimal places (half away from zero)
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64
}

/// Median of the values; an even count averages the two middle entries.
///
/// Returns 0 for an empty slice. The input does not need to be sorted.
pub fn median(values: &[u64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0
    } else {
        sorted[mid] as f64
    }
}

/// Format a 0..=1 ratio as a percentage with one decimal, e.g. `66.7%`
pub fn format_percent(ratio: f64) -> String {
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sha() {
        assert_eq!(short_sha("abc123def456"), "abc123de");
        assert_eq!(short_sha("short"), "short");
        assert_eq!(short_sha(""), "");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(3.0), 3.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1, 2, 3, 4]), 2.5);
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[7]), 7.0);
        assert_eq!(median(&[4, 2]), 3.0);
        assert_eq!(median(&[9, 1, 5]), 5.0);
        assert_eq!(median(&[1, 100, 2, 3]), 2.5);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(2.0 / 3.0), "66.7%");
        assert_eq!(format_percent(0.0), "0.0%");
    }
}
