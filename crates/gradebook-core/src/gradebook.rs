//! A grading session: one exam, its grade scale, and the recorded results.

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use crate::entry::{read_exam, EntryOptions};
use crate::error::{EntryError, GradebookError};
use crate::grading::GradeScale;
use crate::model::Exam;
use crate::presentation::{shape, DisplayMode, Grid};
use crate::results::{ExamResult, ResultSummary};
use crate::table;
use crate::traits::{EntryReporter, LineReader};

/// Exam, grade scale and ordered results of one session.
///
/// Results change only by appending a new entry or by replacing the whole
/// collection; a recorded result is never edited in place.
#[derive(Debug, Clone)]
pub struct Gradebook {
    exam: Exam,
    scale: GradeScale,
    results: Vec<ExamResult>,
}

impl Gradebook {
    pub fn new(exam: Exam, scale: GradeScale) -> Self {
        Self {
            exam,
            scale,
            results: Vec::new(),
        }
    }

    pub fn exam(&self) -> &Exam {
        &self.exam
    }

    pub fn scale(&self) -> &GradeScale {
        &self.scale
    }

    pub fn results(&self) -> &[ExamResult] {
        &self.results
    }

    pub fn has_student(&self, student_id: &str) -> bool {
        self.results.iter().any(|r| r.student_id() == student_id)
    }

    /// Replace all results, for instance after re-reading the results file.
    pub fn replace_results(&mut self, results: Vec<ExamResult>) -> Result<(), GradebookError> {
        {
            let mut seen = HashSet::with_capacity(results.len());
            if let Some(dup) = results.iter().find(|r| !seen.insert(r.student_id())) {
                return Err(GradebookError::DuplicateStudent(dup.student_id().to_string()));
            }
        }
        self.results = results;
        Ok(())
    }

    /// Append a finished result.
    pub fn record(&mut self, result: ExamResult) -> Result<&ExamResult, GradebookError> {
        if self.has_student(result.student_id()) {
            return Err(GradebookError::DuplicateStudent(
                result.student_id().to_string(),
            ));
        }
        self.results.push(result);
        Ok(&self.results[self.results.len() - 1])
    }

    /// Enter every task score for `student_id` and append the result.
    ///
    /// On cancellation nothing is appended and earlier results are untouched.
    pub fn read(
        &mut self,
        student_id: &str,
        reader: &mut dyn LineReader,
        options: &EntryOptions,
        reporter: &dyn EntryReporter,
    ) -> Result<&ExamResult, EntryError> {
        let student_id = student_id.trim();
        if self.has_student(student_id) {
            return Err(GradebookError::DuplicateStudent(student_id.to_string()).into());
        }

        match read_exam(&self.exam, student_id, reader, options, reporter) {
            Ok(result) => {
                reporter.on_recorded(&self.exam, &result);
                tracing::debug!(student = student_id, "recorded exam result");
                Ok(self.record(result)?)
            }
            Err(e) => {
                tracing::debug!(student = student_id, error = %e, "entry aborted");
                reporter.on_aborted(student_id, &e);
                Err(e)
            }
        }
    }

    /// Replace results with the contents of `path` (empty if it does not exist).
    pub fn load_results(&mut self, path: &Path) -> Result<()> {
        let results = table::load_results(&self.exam, path)?;
        self.replace_results(results)?;
        Ok(())
    }

    pub fn save_results(&self, path: &Path) -> Result<()> {
        table::save_results(&self.exam, &self.results, path)
    }

    pub fn summaries(&self) -> Vec<ResultSummary> {
        self.results
            .iter()
            .map(|r| ResultSummary::compute(r, &self.exam, &self.scale))
            .collect()
    }

    pub fn grid(&self, mode: DisplayMode) -> Grid {
        shape(&self.exam, &self.results, &self.scale, mode)
    }
}
