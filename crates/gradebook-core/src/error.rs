//! Gradebook error types.
//!
//! Structural errors (`GradebookError`) abort loading with a diagnostic that
//! names the offending identifier. Entry-time errors are split in two:
//! `ScoreError` is recoverable and only causes a re-prompt, `EntryError`
//! unwinds the entry of the current student.
//!
//! File-level helpers wrap these in `anyhow` with path context; callers can
//! still `downcast_ref::<GradebookError>()` to classify a failure.

use thiserror::Error;

/// Errors in the exam definition, the results table, or the aggregation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GradebookError {
    /// A node of the exam definition cannot be interpreted.
    #[error("malformed exam definition at '{node}': {reason}")]
    MalformedDefinition { node: String, reason: String },

    /// Two tasks resolve to the same global id.
    #[error("duplicate task id '{0}' in exam definition")]
    DuplicateGlobalId(String),

    /// A results header names a task the definition does not have.
    #[error("no task with id '{0}' found in exam definition")]
    UnknownColumn(String),

    /// A results header lists the same task twice.
    #[error("column '{0}' appears more than once in results header")]
    DuplicateColumn(String),

    /// A result names no student.
    #[error("student id must not be empty")]
    EmptyStudentId,

    /// A student id is already recorded.
    #[error("student '{0}' already has a recorded result")]
    DuplicateStudent(String),

    /// One exam result holds two scores for the same task.
    #[error("student '{student}' has more than one result for task '{task}'")]
    DuplicateTaskResult { student: String, task: String },

    /// A persisted score exceeds its task's maximum.
    #[error("score {points} for student '{student}' in column '{column}' exceeds max {max}")]
    ScoreOutOfRange {
        student: String,
        column: String,
        points: u32,
        max: u32,
    },

    /// A persisted score cell is not a non-negative integer.
    #[error("invalid score '{value}' for student '{student}' in column '{column}'")]
    InvalidScoreCell {
        student: String,
        column: String,
        value: String,
    },

    /// A percentage was requested for an exam worth zero points.
    #[error("exam has a total of zero points; percentage is undefined")]
    DivisionUndefined,

    /// The grade table cannot cover the whole percent range.
    #[error("invalid grade scale: {0}")]
    InvalidGradeScale(String),
}

/// A rejected score input. The same task is prompted again.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreError {
    #[error("'{0}' is not a whole number")]
    NotANumber(String),

    #[error("{points} is more than the maximum of {max}")]
    OverMax { points: String, max: u32 },

    #[error("{0} is below zero")]
    Negative(String),
}

/// Abort of a student's entry session. No partial result is kept.
#[derive(Debug, Error)]
pub enum EntryError {
    /// The operator typed the cancellation literal, or input ended.
    #[error("entry cancelled")]
    Cancelled,

    /// Too many rejected inputs for one task.
    #[error("gave up on task '{task}' after {attempts} invalid inputs")]
    AttemptsExhausted { task: String, attempts: u32 },

    /// The line reader failed.
    #[error("failed to read input: {0}")]
    Input(#[from] std::io::Error),

    /// The entry could not be recorded.
    #[error(transparent)]
    Gradebook(#[from] GradebookError),
}

impl EntryError {
    /// Returns `true` if the operator chose to abort, as opposed to a failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            EntryError::Cancelled | EntryError::AttemptsExhausted { .. }
        )
    }
}
