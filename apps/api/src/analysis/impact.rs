//! Improvement Impact Calculator — ranks dimensions by how much raising them to
//! the target score would move the weighted overall score.
//!
//! Algorithm, per dimension (weight from the injected table, default 0.10):
//! 1. score >= 80 → impact 0, priority `achieved`
//! 2. otherwise impact = round((0.8·w − score/100·w) × 100) percentage points
//! 3. priority from the *weighted* gap (100 − score)·w: > 15 high, > 8 medium, else low
//!
//! Items are sorted by impact, descending. The sort is stable, so ties keep input order.

use serde::{Deserialize, Serialize};

use crate::analysis::dimension_map::DimensionMap;
use crate::analysis::normalizer::{
    calculate_overall_score, normalize_all, Confidence, DimensionScore, RawDimension, ScoreSource,
};
use crate::analysis::round_half_up;
use crate::analysis::weights::{
    DimensionWeights, HIGH_PRIORITY_WEIGHTED_GAP, MEDIUM_PRIORITY_WEIGHTED_GAP, TARGET_SCORE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    Achieved,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementItem {
    pub dimension: String,
    pub current_score: f64,
    pub target_score: u32,
    pub potential_impact: i64,
    pub priority: Priority,
}

/// Everything the dashboard renders for one snapshot of dimension results.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub dimensions: DimensionMap<DimensionScore>,
    pub overall_score: i64,
    pub weighted_score: i64,
    pub improvements: Vec<ImprovementItem>,
    pub quick_wins: Vec<ImprovementItem>,
    pub confidence: DimensionMap<Confidence>,
}

/// Ranks improvement opportunities. `None` scores against the standard table.
pub fn compute_impact<T: ScoreSource>(
    dimensions: &DimensionMap<T>,
    weights: Option<&DimensionWeights>,
) -> Vec<ImprovementItem> {
    let weights = weights.unwrap_or(DimensionWeights::standard());

    let mut items: Vec<ImprovementItem> = dimensions
        .iter()
        .map(|(dimension, value)| {
            let score = value.to_dimension_score().score;
            score_dimension(dimension, score, weights.weight_for(dimension))
        })
        .collect();

    items.sort_by(|a, b| b.potential_impact.cmp(&a.potential_impact));
    items
}

fn score_dimension(dimension: &str, score: f64, weight: f64) -> ImprovementItem {
    let target = f64::from(TARGET_SCORE);

    let (potential_impact, priority) = if score < target {
        let current_contribution = (score / 100.0) * weight;
        let potential_contribution = (target / 100.0) * weight;
        let impact = round_half_up((potential_contribution - current_contribution) * 100.0);
        (impact, priority_for_gap((100.0 - score) * weight))
    } else {
        (0, Priority::Achieved)
    };

    ImprovementItem {
        dimension: dimension.to_string(),
        current_score: score,
        target_score: TARGET_SCORE,
        potential_impact,
        priority,
    }
}

fn priority_for_gap(weighted_gap: f64) -> Priority {
    if weighted_gap > HIGH_PRIORITY_WEIGHTED_GAP {
        Priority::High
    } else if weighted_gap > MEDIUM_PRIORITY_WEIGHTED_GAP {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// Weighted mean of the dimensions present; 0 when none are present or all weigh 0.
pub fn weighted_overall_score<T: ScoreSource>(
    dimensions: &DimensionMap<T>,
    weights: &DimensionWeights,
) -> i64 {
    let (weighted_sum, weight_sum) =
        dimensions
            .iter()
            .fold((0.0_f64, 0.0_f64), |(sum, total), (dimension, value)| {
                let weight = weights.weight_for(dimension);
                (sum + value.to_dimension_score().score * weight, total + weight)
            });

    if weight_sum > 0.0 {
        round_half_up(weighted_sum / weight_sum)
    } else {
        0
    }
}

/// The first `limit` ranked items that still have something to gain.
pub fn quick_wins(items: &[ImprovementItem], limit: usize) -> Vec<ImprovementItem> {
    items
        .iter()
        .filter(|item| item.priority != Priority::Achieved && item.potential_impact > 0)
        .take(limit)
        .cloned()
        .collect()
}

pub fn summarize(
    dimensions: &DimensionMap<RawDimension>,
    weights: &DimensionWeights,
    quick_win_limit: usize,
) -> AnalysisSummary {
    let improvements = compute_impact(dimensions, Some(weights));
    let quick_wins = quick_wins(&improvements, quick_win_limit);
    let confidence = dimensions
        .iter()
        .filter_map(|(dimension, raw)| raw.confidence().map(|c| (dimension, c)))
        .collect();

    AnalysisSummary {
        dimensions: normalize_all(dimensions),
        overall_score: calculate_overall_score(dimensions),
        weighted_score: weighted_overall_score(dimensions, weights),
        improvements,
        quick_wins,
        confidence,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn dims(value: Value) -> DimensionMap<RawDimension> {
        DimensionMap::<RawDimension>::from_json(&value)
    }

    fn skills_education_weights() -> DimensionWeights {
        DimensionWeights::from_entries([("skills", 0.20), ("education", 0.15)]).unwrap()
    }

    #[test]
    fn test_empty_input_yields_no_items() {
        assert!(compute_impact(&dims(json!({})), None).is_empty());
        assert!(compute_impact(&dims(json!("not a mapping")), None).is_empty());
    }

    #[test]
    fn test_skills_below_target_education_achieved() {
        let weights = skills_education_weights();
        let items = compute_impact(&dims(json!({"skills": 50, "education": 90})), Some(&weights));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].dimension, "skills");
        assert_eq!(items[0].current_score, 50.0);
        assert_eq!(items[0].target_score, 80);
        assert_eq!(items[0].potential_impact, 6);
        assert_eq!(items[0].priority, Priority::Medium);

        assert_eq!(items[1].dimension, "education");
        assert_eq!(items[1].potential_impact, 0);
        assert_eq!(items[1].priority, Priority::Achieved);
        assert_eq!(items[1].target_score, 80);
    }

    #[test]
    fn test_sorted_by_impact_descending() {
        let items = compute_impact(
            &dims(json!({"tools": 10, "tasks": 0, "education": 85, "skills": 60})),
            None,
        );
        let order: Vec<&str> = items.iter().map(|i| i.dimension.as_str()).collect();
        // tasks 16, tools 4 (0.05 * 70 = 3.5 → 4), skills 4, education 0
        assert_eq!(order, vec!["tasks", "tools", "skills", "education"]);
        assert_eq!(items[0].potential_impact, 16);
        assert_eq!(items[1].potential_impact, 4);
        assert_eq!(items[2].potential_impact, 4);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = compute_impact(&dims(json!({"knowledge": 40, "abilities": 40})), None);
        assert_eq!(items[0].dimension, "knowledge");
        assert_eq!(items[1].dimension, "abilities");

        let items = compute_impact(&dims(json!({"abilities": 40, "knowledge": 40})), None);
        assert_eq!(items[0].dimension, "abilities");
        assert_eq!(items[1].dimension, "knowledge");
    }

    #[test]
    fn test_priority_uses_weighted_gap() {
        // Same raw gap of 90, different weights.
        let items = compute_impact(&dims(json!({"tasks": 10, "tools": 10})), None);
        let tasks = items.iter().find(|i| i.dimension == "tasks").unwrap();
        let tools = items.iter().find(|i| i.dimension == "tools").unwrap();
        assert_eq!(tasks.priority, Priority::High); // 90 * 0.20 = 18
        assert_eq!(tools.priority, Priority::Low); // 90 * 0.05 = 4.5
    }

    #[test]
    fn test_priority_thresholds_are_exclusive() {
        assert_eq!(priority_for_gap(15.0), Priority::Medium);
        assert_eq!(priority_for_gap(15.01), Priority::High);
        assert_eq!(priority_for_gap(8.0), Priority::Low);
        assert_eq!(priority_for_gap(8.01), Priority::Medium);
    }

    #[test]
    fn test_unknown_dimension_gets_default_weight() {
        let items = compute_impact(&dims(json!({"leadership": 30})), None);
        // (0.8 - 0.3) * 0.10 * 100 = 5
        assert_eq!(items[0].potential_impact, 5);
        assert_eq!(items[0].priority, Priority::Low); // 70 * 0.10 = 7
    }

    #[test]
    fn test_malformed_values_score_as_zero() {
        let items = compute_impact(&dims(json!({"skills": "pending", "tasks": [1]})), None);
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.current_score == 0.0));
        assert!(items.iter().all(|i| i.priority == Priority::High));
    }

    #[test]
    fn test_accepts_normalized_records() {
        let normalized = normalize_all(&dims(json!({"skills": 50, "education": 90})));
        let weights = skills_education_weights();
        let items = compute_impact(&normalized, Some(&weights));
        assert_eq!(items[0].potential_impact, 6);
    }

    #[test]
    fn test_weighted_overall_score() {
        let weights = skills_education_weights();
        // (50 * 0.20 + 90 * 0.15) / 0.35 = 67.14
        assert_eq!(
            weighted_overall_score(&dims(json!({"skills": 50, "education": 90})), &weights),
            67
        );
        assert_eq!(weighted_overall_score(&dims(json!({})), &weights), 0);

        let zero = DimensionWeights::from_entries([("skills", 0.0)]).unwrap();
        assert_eq!(weighted_overall_score(&dims(json!({"skills": 50})), &zero), 0);
    }

    #[test]
    fn test_quick_wins_skip_achieved() {
        let items = compute_impact(
            &dims(json!({"education": 95, "skills": 40, "tasks": 79, "tools": 80})),
            None,
        );
        let wins = quick_wins(&items, 3);
        let names: Vec<&str> = wins.iter().map(|i| i.dimension.as_str()).collect();
        assert_eq!(names, vec!["skills"]);
        // tasks at 79 rounds to 0 impact and is not a quick win.
        assert!(quick_wins(&items, 0).is_empty());
    }

    #[test]
    fn test_summarize_collects_scores_and_confidence() {
        let input = dims(json!({
            "skills": {"score": 50, "matches": ["SQL"], "gaps": ["Spark"], "confidence": "low"},
            "education": 90
        }));
        let summary = summarize(&input, &skills_education_weights(), 3);

        assert_eq!(summary.overall_score, 70);
        assert_eq!(summary.weighted_score, 67);
        assert_eq!(summary.improvements.len(), 2);
        assert_eq!(summary.quick_wins.len(), 1);
        assert_eq!(summary.confidence.get("skills"), Some(&Confidence::Low));
        assert!(summary.confidence.get("education").is_none());
        assert_eq!(
            summary.dimensions.get("skills").map(|d| d.gaps.clone()),
            Some(vec!["Spark".to_string()])
        );
    }

    #[test]
    fn test_item_serializes_camel_case() {
        let item = score_dimension("skills", 50.0, 0.20);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["currentScore"], json!(50.0));
        assert_eq!(json["targetScore"], json!(80));
        assert_eq!(json["potentialImpact"], json!(6));
        assert_eq!(json["priority"], json!("medium"));
    }
}
