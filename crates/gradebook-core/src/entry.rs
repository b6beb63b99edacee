//! Interactive score entry.
//!
//! [`read_task`] captures one task's score and re-prompts on invalid input;
//! [`read_exam`] walks every task of an exam in tree order for one student.
//! Cancellation discards everything entered for that student.

use std::num::{IntErrorKind, ParseIntError};

use crate::error::{EntryError, ScoreError};
use crate::model::{Exam, Task};
use crate::results::{ExamResult, TaskResult};
use crate::traits::{EntryReporter, LineReader};

/// Default literal that cancels a student's entry.
pub const DEFAULT_CANCEL_LITERAL: &str = "q";

/// Default bound on invalid inputs for a single task.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// How entry input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOptions {
    pub cancel_literal: String,
    pub max_attempts: u32,
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self {
            cancel_literal: DEFAULT_CANCEL_LITERAL.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Parse one line of input as a score for `task`.
pub fn parse_score(input: &str, task: &Task) -> Result<u32, ScoreError> {
    let input = input.trim();
    let value: i64 = input.parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => ScoreError::OverMax {
            points: input.to_string(),
            max: task.max,
        },
        IntErrorKind::NegOverflow => ScoreError::Negative(input.to_string()),
        _ => ScoreError::NotANumber(input.to_string()),
    })?;
    if value < 0 {
        return Err(ScoreError::Negative(value.to_string()));
    }
    if value > i64::from(task.max) {
        return Err(ScoreError::OverMax {
            points: value.to_string(),
            max: task.max,
        });
    }
    Ok(value as u32)
}

/// The prompt shown for a task.
pub fn task_prompt(task: &Task) -> String {
    format!("{} ({})> ", task.description, task.max)
}

/// Read one task's score, re-prompting until the input is valid.
pub fn read_task(
    task: &Task,
    reader: &mut dyn LineReader,
    options: &EntryOptions,
    reporter: &dyn EntryReporter,
) -> Result<TaskResult, EntryError> {
    let prompt = task_prompt(task);
    let attempts = options.max_attempts.max(1);

    for _ in 0..attempts {
        let Some(line) = reader.read_line(&prompt)? else {
            return Err(EntryError::Cancelled);
        };
        if line.trim() == options.cancel_literal {
            return Err(EntryError::Cancelled);
        }

        match parse_score(&line, task).and_then(|points| TaskResult::new(task, points)) {
            Ok(result) => return Ok(result),
            Err(e) => {
                tracing::debug!(task = task.global_id(), error = %e, "rejected score input");
                reporter.on_rejected(task, &e);
            }
        }
    }

    Err(EntryError::AttemptsExhausted {
        task: task.global_id().to_string(),
        attempts,
    })
}

/// Read every task of `exam` for `student_id`, in tree order.
pub fn read_exam(
    exam: &Exam,
    student_id: &str,
    reader: &mut dyn LineReader,
    options: &EntryOptions,
    reporter: &dyn EntryReporter,
) -> Result<ExamResult, EntryError> {
    let mut task_results = Vec::with_capacity(exam.task_count());
    for question in exam.questions() {
        reporter.on_question(exam, question);
        for task in question.tasks() {
            task_results.push(read_task(task, reader, options, reporter)?);
        }
    }
    Ok(ExamResult::new(student_id, task_results, exam)?)
}
