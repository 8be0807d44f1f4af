//! Risk assessment output types and presentation helpers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Derived risk category.
///
/// A pure function of the score: `>= 6` is high, `>= 3` is medium,
/// everything below is low. The bands are non-overlapping, so every score
/// maps to exactly one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Derive the level from a total score.
    #[must_use]
    pub fn from_score(score: u32) -> Self {
        if score >= 6 {
            RiskLevel::High
        } else if score >= 3 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    /// Wire representation, matching the stored `risk_level` column.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Human-facing display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }

    /// Badge style classes for the web client.
    #[must_use]
    pub fn style_classes(&self) -> &'static str {
        match self {
            RiskLevel::Low => "bg-emerald-500/15 text-emerald-200 ring-1 ring-emerald-400/30",
            RiskLevel::Medium => "bg-amber-500/15 text-amber-100 ring-1 ring-amber-400/30",
            RiskLevel::High => "bg-rose-500/15 text-rose-100 ring-1 ring-rose-400/30",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's output: a score, its derived level, and the triggered
/// reasons in fixed evaluation order (sleep, social activity, screen time,
/// mood). Immutable once produced; fully determined by the observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RiskAssessment {
    /// Sum of the per-factor contributions. At most 8 under the current
    /// rule set (2+2+2+2).
    pub score: u32,

    /// Category derived from the score.
    pub level: RiskLevel,

    /// One entry per triggered rule, in evaluation order. Empty exactly
    /// when the score is zero.
    pub reasons: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_cut_points() {
        // level(score) = high iff score >= 6; medium iff 3 <= score < 6; low otherwise
        for score in 0..=12 {
            let level = RiskLevel::from_score(score);
            let expected = if score >= 6 {
                RiskLevel::High
            } else if score >= 3 {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            };
            assert_eq!(level, expected, "score {score}");
        }
    }

    #[test]
    fn test_level_boundaries_exact() {
        assert_eq!(RiskLevel::from_score(2), RiskLevel::Low);
        assert_eq!(RiskLevel::from_score(3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(5), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_score(6), RiskLevel::High);
    }

    #[test]
    fn test_label_is_total() {
        assert_eq!(RiskLevel::Low.label(), "Low");
        assert_eq!(RiskLevel::Medium.label(), "Medium");
        assert_eq!(RiskLevel::High.label(), "High");
    }

    #[test]
    fn test_style_classes_are_total_and_distinct() {
        let styles = [
            RiskLevel::Low.style_classes(),
            RiskLevel::Medium.style_classes(),
            RiskLevel::High.style_classes(),
        ];
        for style in styles {
            assert!(!style.is_empty());
        }
        assert_ne!(styles[0], styles[1]);
        assert_ne!(styles[1], styles[2]);
    }

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Medium).unwrap(),
            "\"medium\""
        );
    }
}
