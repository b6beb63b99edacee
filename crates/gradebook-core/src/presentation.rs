//! Data shaping for result tables.
//!
//! [`shape`] turns the exam tree and the recorded results into a [`Grid`]:
//! three header rows (exercise, question, task) and one row per student.
//! Renderers decide how it looks; nothing here formats text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grading::GradeScale;
use crate::model::{Exam, WeightedNode};
use crate::results::{weighted_points_of, ExamResult};

/// What each per-task cell shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Raw points.
    #[default]
    Raw,
    /// Points as a percentage of the task's max.
    Percent,
    /// Points scaled to the task's weighted total.
    Weighted,
}

impl DisplayMode {
    /// Cycle raw → percent → weighted → raw.
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Raw => DisplayMode::Percent,
            DisplayMode::Percent => DisplayMode::Weighted,
            DisplayMode::Weighted => DisplayMode::Raw,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::Raw => write!(f, "raw"),
            DisplayMode::Percent => write!(f, "percent"),
            DisplayMode::Weighted => write!(f, "weighted"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" | "points" => Ok(DisplayMode::Raw),
            "percent" | "%" => Ok(DisplayMode::Percent),
            "weighted" => Ok(DisplayMode::Weighted),
            other => Err(format!("unknown display mode: {other}")),
        }
    }
}

/// One header cell for a node of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderCell {
    /// Local id.
    pub id: String,
    pub description: String,
    pub weight: f64,
    pub weighted_total: f64,
    /// Sum of task maxima below this node (the max itself for a task).
    pub max_points: u64,
    /// Number of task columns covered.
    pub span: usize,
}

/// Value of one per-task cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    Points(u64),
    Percent(f64),
    Weighted(f64),
    /// No result recorded for this task.
    Missing,
}

impl CellValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            CellValue::Points(p) => Some(p as f64),
            CellValue::Percent(v) | CellValue::Weighted(v) => Some(v),
            CellValue::Missing => None,
        }
    }
}

/// One student's row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    pub student_id: String,
    /// One value per task, in column order.
    pub cells: Vec<CellValue>,
    /// Raw points total, or weighted points in weighted mode.
    pub total: CellValue,
    /// Percent of total points, or weighted percent in weighted mode.
    /// `None` when the exam is worth zero points.
    pub percent: Option<f64>,
    pub grade: String,
}

/// The complete table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub mode: DisplayMode,
    /// Task global ids, in column order.
    pub columns: Vec<String>,
    pub exercises: Vec<HeaderCell>,
    pub questions: Vec<HeaderCell>,
    pub tasks: Vec<HeaderCell>,
    pub rows: Vec<GridRow>,
}

/// Build the grid for `results` in `mode`. Reads only.
pub fn shape(exam: &Exam, results: &[ExamResult], scale: &GradeScale, mode: DisplayMode) -> Grid {
    let exercises = exam
        .exercises()
        .map(|e| HeaderCell {
            id: e.id.clone(),
            description: e.description.clone(),
            weight: e.weight,
            weighted_total: e.weighted_points_total(exam),
            max_points: e.points_total(),
            span: e.tasks().count(),
        })
        .collect();

    let questions = exam
        .questions()
        .map(|q| HeaderCell {
            id: q.id.clone(),
            description: q.description.clone(),
            weight: q.weight,
            weighted_total: q.weighted_points_total(exam),
            max_points: q.points_total(),
            span: q.tasks().count(),
        })
        .collect();

    let tasks = exam
        .tasks()
        .map(|t| HeaderCell {
            id: t.id.clone(),
            description: t.description.clone(),
            weight: t.weight,
            weighted_total: t.weighted_points_total(exam),
            max_points: u64::from(t.max),
            span: 1,
        })
        .collect();

    let rows = results
        .iter()
        .map(|result| shape_row(exam, result, scale, mode))
        .collect();

    Grid {
        mode,
        columns: exam.columns().into_iter().map(String::from).collect(),
        exercises,
        questions,
        tasks,
        rows,
    }
}

fn shape_row(exam: &Exam, result: &ExamResult, scale: &GradeScale, mode: DisplayMode) -> GridRow {
    let cells = exam
        .tasks()
        .map(|task| match result.points_for(task) {
            None => CellValue::Missing,
            Some(points) => match mode {
                DisplayMode::Raw => CellValue::Points(u64::from(points)),
                DisplayMode::Percent => {
                    CellValue::Percent(f64::from(points) / f64::from(task.max) * 100.0)
                }
                DisplayMode::Weighted => CellValue::Weighted(weighted_points_of(exam, task, points)),
            },
        })
        .collect();

    let weighted_percent = result.weighted_percent(exam);
    let (total, percent) = match mode {
        DisplayMode::Weighted => (
            CellValue::Weighted(result.weighted_points(exam)),
            Some(weighted_percent),
        ),
        DisplayMode::Raw | DisplayMode::Percent => (
            CellValue::Points(result.points_total()),
            result.percent(exam).ok(),
        ),
    };

    GridRow {
        student_id: result.student_id().to_string(),
        cells,
        total,
        percent,
        grade: scale.grade(weighted_percent).to_string(),
    }
}
