//! Per-student results and their aggregation against the exam tree.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{GradebookError, ScoreError};
use crate::grading::GradeScale;
use crate::model::{Exam, Task, TaskKey, WeightedNode};

/// Raw points a student scored on one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResult {
    pub task: TaskKey,
    pub points: u32,
}

impl TaskResult {
    /// Bind `points` to `task`, enforcing `points <= task.max`.
    pub fn new(task: &Task, points: u32) -> Result<Self, ScoreError> {
        if points > task.max {
            return Err(ScoreError::OverMax {
                points: points.to_string(),
                max: task.max,
            });
        }
        Ok(Self {
            task: task.key(),
            points,
        })
    }
}

/// All task results of one student.
///
/// Holds at most one result per task. Tasks without a result (for instance
/// tasks added to the definition after the student was recorded) are simply
/// absent and count as zero points in the totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    student_id: String,
    task_results: Vec<TaskResult>,
}

impl ExamResult {
    pub fn new(
        student_id: impl Into<String>,
        task_results: Vec<TaskResult>,
        exam: &Exam,
    ) -> Result<Self, GradebookError> {
        let student_id = student_id.into();
        if student_id.trim().is_empty() {
            return Err(GradebookError::EmptyStudentId);
        }
        let mut seen = HashSet::with_capacity(task_results.len());
        for tr in &task_results {
            if !seen.insert(tr.task) {
                let task = exam
                    .task(tr.task)
                    .map(|t| t.global_id().to_string())
                    .unwrap_or_else(|| format!("{:?}", tr.task));
                return Err(GradebookError::DuplicateTaskResult {
                    student: student_id,
                    task,
                });
            }
        }
        Ok(Self {
            student_id,
            task_results,
        })
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn task_results(&self) -> &[TaskResult] {
        &self.task_results
    }

    /// The recorded result for `task`, if any.
    pub fn result_for(&self, task: &Task) -> Option<&TaskResult> {
        self.task_results.iter().find(|tr| tr.task == task.key())
    }

    pub fn points_for(&self, task: &Task) -> Option<u32> {
        self.result_for(task).map(|tr| tr.points)
    }

    pub fn points_total(&self) -> u64 {
        self.task_results.iter().map(|tr| u64::from(tr.points)).sum()
    }

    /// Raw points as a percentage of the exam's total points.
    pub fn percent(&self, exam: &Exam) -> Result<f64, GradebookError> {
        let total = exam.points_total();
        if total == 0 {
            return Err(GradebookError::DivisionUndefined);
        }
        Ok(self.points_total() as f64 / total as f64 * 100.0)
    }

    /// Each task's fraction of its max, scaled by the task's weighted total.
    pub fn weighted_points(&self, exam: &Exam) -> f64 {
        self.task_results
            .iter()
            .filter_map(|tr| exam.task(tr.task).map(|task| (task, tr.points)))
            .map(|(task, points)| weighted_points_of(exam, task, points))
            .sum()
    }

    pub fn weighted_percent(&self, exam: &Exam) -> f64 {
        self.weighted_points(exam) / exam.weighted_points_total() * 100.0
    }

    pub fn grade<'s>(&self, exam: &Exam, scale: &'s GradeScale) -> &'s str {
        scale.grade(self.weighted_percent(exam))
    }
}

/// `points` on `task` expressed in weighted points.
pub fn weighted_points_of(exam: &Exam, task: &Task, points: u32) -> f64 {
    f64::from(points) / f64::from(task.max) * task.weighted_points_total(exam)
}

/// Computed figures for one student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub student_id: String,
    pub points_total: u64,
    /// `None` when the exam is worth zero points.
    pub percent: Option<f64>,
    pub weighted_points: f64,
    pub weighted_percent: f64,
    pub grade: String,
}

impl ResultSummary {
    pub fn compute(result: &ExamResult, exam: &Exam, scale: &GradeScale) -> Self {
        let weighted_percent = result.weighted_percent(exam);
        Self {
            student_id: result.student_id.clone(),
            points_total: result.points_total(),
            percent: result.percent(exam).ok(),
            weighted_points: result.weighted_points(exam),
            weighted_percent,
            grade: scale.grade(weighted_percent).to_string(),
        }
    }
}
