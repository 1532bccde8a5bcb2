//! Score Normalizer — turns a producer's per-dimension result into one canonical record.
//!
//! Producers emit two shapes: a bare number (older persisted analyses) or a rich
//! object with matches, gaps and confidence. Anything else degrades to a zero
//! record. Normalization never fails and never clamps; clamping is a display concern.
//!
//! `normalize` is meant to be applied once per raw value. Feeding a normalized
//! record back in is not a round-trip guarantee.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::analysis::dimension_map::DimensionMap;
use crate::analysis::round_half_up;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Canonical per-dimension record consumed by the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub score: f64,
    pub matches: Vec<String>,
    pub gaps: Vec<String>,
}

impl DimensionScore {
    pub fn zero() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }
}

/// Rich producer shape. Auxiliary fields pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RichScore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength_areas: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_tools: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RichScore {
    fn from_object(object: &Map<String, Value>) -> Self {
        let mut extra = object.clone();
        for known in [
            "score",
            "matches",
            "gaps",
            "confidence",
            "strengthAreas",
            "alternativeTools",
        ] {
            extra.remove(known);
        }

        RichScore {
            score: object.get("score").and_then(Value::as_f64),
            matches: object.get("matches").and_then(string_list),
            gaps: object.get("gaps").and_then(string_list),
            confidence: object
                .get("confidence")
                .and_then(Value::as_str)
                .and_then(Confidence::parse),
            strength_areas: object.get("strengthAreas").and_then(string_list),
            alternative_tools: object.get("alternativeTools").and_then(string_list),
            extra,
        }
    }
}

/// A producer-supplied dimension result, discriminated once by runtime shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawDimension {
    Numeric(f64),
    Rich(RichScore),
    #[default]
    Invalid,
}

impl RawDimension {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => n.as_f64().map_or(RawDimension::Invalid, RawDimension::Numeric),
            Value::Object(object) => RawDimension::Rich(RichScore::from_object(object)),
            _ => RawDimension::Invalid,
        }
    }

    pub fn confidence(&self) -> Option<Confidence> {
        match self {
            RawDimension::Rich(rich) => rich.confidence,
            _ => None,
        }
    }
}

impl From<Value> for RawDimension {
    fn from(value: Value) -> Self {
        RawDimension::from_json(&value)
    }
}

// Any JSON value is accepted; malformed shapes become `Invalid`.
impl<'de> Deserialize<'de> for RawDimension {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(RawDimension::from)
    }
}

impl DimensionMap<RawDimension> {
    /// Non-object roots are treated as an empty mapping.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(object) => object
                .iter()
                .map(|(key, raw)| (key.clone(), RawDimension::from_json(raw)))
                .collect(),
            _ => DimensionMap::new(),
        }
    }
}

impl<'de> Deserialize<'de> for DimensionMap<RawDimension> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(|value| Self::from_json(&value))
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value.as_array().map(|items| {
        items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect()
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Anything that can be read as a canonical dimension record.
/// Lets the calculator accept raw producer values and already-normalized records alike.
pub trait ScoreSource {
    fn to_dimension_score(&self) -> DimensionScore;
}

impl ScoreSource for RawDimension {
    fn to_dimension_score(&self) -> DimensionScore {
        normalize(self)
    }
}

impl ScoreSource for DimensionScore {
    fn to_dimension_score(&self) -> DimensionScore {
        self.clone()
    }
}

pub fn normalize(raw: &RawDimension) -> DimensionScore {
    match raw {
        RawDimension::Numeric(score) => DimensionScore {
            score: *score,
            matches: vec![],
            gaps: vec![],
        },
        RawDimension::Rich(rich) => DimensionScore {
            score: rich.score.unwrap_or(0.0),
            matches: rich.matches.clone().unwrap_or_default(),
            gaps: rich.gaps.clone().unwrap_or_default(),
        },
        RawDimension::Invalid => DimensionScore::zero(),
    }
}

/// Normalizes every entry. Missing dimensions are not synthesized.
pub fn normalize_all<T: ScoreSource>(dimensions: &DimensionMap<T>) -> DimensionMap<DimensionScore> {
    dimensions.map_values(T::to_dimension_score)
}

pub fn extract_numeric_scores<T: ScoreSource>(dimensions: &DimensionMap<T>) -> DimensionMap<f64> {
    dimensions.map_values(|value| value.to_dimension_score().score)
}

/// Unweighted mean of all normalized scores, rounded; 0 for an empty mapping.
pub fn calculate_overall_score<T: ScoreSource>(dimensions: &DimensionMap<T>) -> i64 {
    if dimensions.is_empty() {
        return 0;
    }
    let total: f64 = dimensions
        .values()
        .map(|value| value.to_dimension_score().score)
        .sum();
    round_half_up(total / dimensions.len() as f64)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
