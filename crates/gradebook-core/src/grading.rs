//! Grade scale: ordered percent thresholds mapped to grade labels.

use serde::{Deserialize, Serialize};

use crate::error::GradebookError;

/// Absorbs floating-point noise so that a boundary value keeps the higher grade.
const BOUNDARY_TOLERANCE: f64 = 1e-9;

/// Lowest weighted percent that earns `label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeThreshold {
    pub min_percent: f64,
    pub label: String,
}

impl GradeThreshold {
    pub fn new(min_percent: f64, label: impl Into<String>) -> Self {
        Self {
            min_percent,
            label: label.into(),
        }
    }
}

/// Thresholds sorted from highest to lowest, ending in a catch-all at 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeScale {
    thresholds: Vec<GradeThreshold>,
}

impl GradeScale {
    /// Build a scale. Thresholds may be given in any order.
    pub fn new(mut thresholds: Vec<GradeThreshold>) -> Result<Self, GradebookError> {
        if let Some(bad) = thresholds
            .iter()
            .find(|t| !t.min_percent.is_finite() || t.min_percent < 0.0)
        {
            return Err(GradebookError::InvalidGradeScale(format!(
                "threshold {} for grade '{}' is not a percentage",
                bad.min_percent, bad.label
            )));
        }

        thresholds.sort_by(|a, b| b.min_percent.total_cmp(&a.min_percent));

        if thresholds
            .windows(2)
            .any(|w| w[0].min_percent == w[1].min_percent)
        {
            return Err(GradebookError::InvalidGradeScale(
                "two grades share the same threshold".into(),
            ));
        }
        match thresholds.last() {
            Some(last) if last.min_percent == 0.0 => {}
            _ => {
                return Err(GradebookError::InvalidGradeScale(
                    "a grade with threshold 0 is required".into(),
                ))
            }
        }

        Ok(Self { thresholds })
    }

    /// The grade for a weighted percentage. Lower bounds are inclusive.
    pub fn grade(&self, weighted_percent: f64) -> &str {
        self.thresholds
            .iter()
            .find(|t| weighted_percent + BOUNDARY_TOLERANCE >= t.min_percent)
            .or_else(|| self.thresholds.last())
            .map(|t| t.label.as_str())
            .unwrap_or_default()
    }

    pub fn thresholds(&self) -> &[GradeThreshold] {
        &self.thresholds
    }

    /// Labels from best to worst.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.thresholds.iter().map(|t| t.label.as_str())
    }
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
        }
    }
}

/// 92 → 1, 82 → 2, 67 → 3, 50 → 4, 30 → 5, 0 → 6.
pub fn default_thresholds() -> Vec<GradeThreshold> {
    [(92.0, "1"), (82.0, "2"), (67.0, "3"), (50.0, "4"), (30.0, "5"), (0.0, "6")]
        .into_iter()
        .map(|(min, label)| GradeThreshold::new(min, label))
        .collect()
}
