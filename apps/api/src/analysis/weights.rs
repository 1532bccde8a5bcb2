//! Dimension weighting table and improvement policy constants.
//!
//! The table is injected into the calculator rather than read from a global,
//! so callers and tests can score against an alternative table.

use std::collections::HashMap;
use std::sync::OnceLock;

use thiserror::Error;

/// Score at which a dimension counts as satisfied.
pub const TARGET_SCORE: u32 = 80;
/// Weighted gap above which an improvement is high priority.
pub const HIGH_PRIORITY_WEIGHTED_GAP: f64 = 15.0;
/// Weighted gap above which an improvement is medium priority.
pub const MEDIUM_PRIORITY_WEIGHTED_GAP: f64 = 8.0;
/// Weight applied to any dimension missing from the table.
pub const DEFAULT_DIMENSION_WEIGHT: f64 = 0.10;

/// Dimensions a complete analysis produces.
pub const EXPECTED_DIMENSIONS: [&str; 8] = [
    "tasks",
    "skills",
    "technologySkills",
    "education",
    "workActivities",
    "abilities",
    "knowledge",
    "tools",
];

const STANDARD_WEIGHTS: &[(&str, f64)] = &[
    ("tasks", 0.20),
    ("skills", 0.20),
    ("education", 0.15),
    ("workActivities", 0.10),
    ("knowledge", 0.10),
    ("technologySkills", 0.10),
    ("abilities", 0.10),
    ("tools", 0.05),
];

#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("weight for '{dimension}' must be a finite, non-negative number (got {value})")]
    InvalidWeight { dimension: String, value: f64 },

    #[error("dimension key cannot be empty")]
    EmptyDimension,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionWeights {
    weights: HashMap<String, f64>,
    default_weight: f64,
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            weights: STANDARD_WEIGHTS
                .iter()
                .map(|(key, weight)| (key.to_string(), *weight))
                .collect(),
            default_weight: DEFAULT_DIMENSION_WEIGHT,
        }
    }
}

impl DimensionWeights {
    /// Shared instance of the standard table.
    pub fn standard() -> &'static DimensionWeights {
        static STANDARD: OnceLock<DimensionWeights> = OnceLock::new();
        STANDARD.get_or_init(DimensionWeights::default)
    }

    /// Builds a caller-supplied table. Unlisted dimensions fall back to the default weight.
    pub fn from_entries<I, K>(entries: I) -> Result<Self, WeightError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut weights = HashMap::new();
        for (key, weight) in entries {
            let key = key.into();
            if key.trim().is_empty() {
                return Err(WeightError::EmptyDimension);
            }
            if !weight.is_finite() || weight < 0.0 {
                return Err(WeightError::InvalidWeight {
                    dimension: key,
                    value: weight,
                });
            }
            weights.insert(key, weight);
        }
        Ok(Self {
            weights,
            default_weight: DEFAULT_DIMENSION_WEIGHT,
        })
    }

    pub fn weight_for(&self, dimension: &str) -> f64 {
        self.weights
            .get(dimension)
            .copied()
            .unwrap_or(self.default_weight)
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }
}
