//! Size statistics for a summary relative to its source.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub original_chars: usize,
    pub summary_chars: usize,
    /// Rounded percentage by which the summary is shorter; negative if longer
    pub reduction_percent: i64,
}

impl SummaryStats {
    /// Counts are in Unicode scalar values, not bytes
    pub fn compute(original: &str, summary: &str) -> Self {
        let original_chars = original.chars().count();
        let summary_chars = summary.chars().count();

        let reduction_percent = if original_chars == 0 {
            0
        } else {
            let ratio = (original_chars as f64 - summary_chars as f64) / original_chars as f64;
            (ratio * 100.0).round() as i64
        };

        Self {
            original_chars,
            summary_chars,
            reduction_percent,
        }
    }
}

impl std::fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "original: {} chars, summary: {} chars, reduction: {}%",
            self.original_chars, self.summary_chars, self.reduction_percent
        )
    }
}
