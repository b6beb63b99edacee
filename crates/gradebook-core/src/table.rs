//! CSV persistence of exam results.
//!
//! The first row is a header: a leading `student` cell followed by task
//! global ids. Each further row holds a student id and one integer per task.
//! Loading tolerates any column order and columns the file does not have;
//! saving always writes the exam's canonical column order. An empty cell
//! means "no result" in both directions.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::GradebookError;
use crate::model::{Exam, Task};
use crate::results::{ExamResult, TaskResult};

/// Leading header cell.
pub const STUDENT_COLUMN: &str = "student";

/// Load results from `path`. A missing file is an empty result set.
pub fn load_results(exam: &Exam, path: &Path) -> Result<Vec<ExamResult>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no results file yet, starting empty");
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .with_context(|| format!("failed to open results file: {}", path.display()))?;
    let results = read_results(exam, file)
        .with_context(|| format!("failed to load results: {}", path.display()))?;

    tracing::info!(path = %path.display(), students = results.len(), "loaded results");
    Ok(results)
}

/// Read results from CSV text.
pub fn read_results<R: Read>(exam: &Exam, input: R) -> Result<Vec<ExamResult>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    let Some(header) = records.next().transpose()? else {
        return Ok(Vec::new());
    };
    let columns = resolve_columns(exam, &header)?;

    let present: HashSet<&str> = columns.iter().map(|t| t.global_id()).collect();
    for missing in exam.columns().into_iter().filter(|c| !present.contains(c)) {
        tracing::warn!(column = missing, "results file has no column for task");
    }

    let mut students = HashSet::new();
    let mut results = Vec::new();
    for record in records {
        let record = record?;
        let student_id = record.get(0).unwrap_or_default().trim();
        if student_id.is_empty() && record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        if student_id.is_empty() {
            return Err(GradebookError::EmptyStudentId.into());
        }
        if !students.insert(student_id.to_string()) {
            return Err(GradebookError::DuplicateStudent(student_id.to_string()).into());
        }

        let mut task_results = Vec::with_capacity(columns.len());
        for (index, cell) in record.iter().skip(1).enumerate() {
            let cell = cell.trim();
            if cell.is_empty() {
                continue;
            }
            let Some(task) = columns.get(index) else {
                tracing::warn!(student = student_id, value = cell, "ignoring cell beyond header");
                continue;
            };
            task_results.push(parse_cell(student_id, task, cell)?);
        }

        results.push(ExamResult::new(student_id, task_results, exam)?);
    }

    Ok(results)
}

/// Map each header id (after the leading cell) to its task.
fn resolve_columns<'e>(
    exam: &'e Exam,
    header: &csv::StringRecord,
) -> Result<Vec<&'e Task>, GradebookError> {
    let mut seen = HashSet::new();
    header
        .iter()
        .skip(1)
        .map(|id| {
            let id = id.trim();
            let task = exam
                .task_by_global_id(id)
                .ok_or_else(|| GradebookError::UnknownColumn(id.to_string()))?;
            if !seen.insert(task.key()) {
                return Err(GradebookError::DuplicateColumn(id.to_string()));
            }
            Ok(task)
        })
        .collect()
}

fn parse_cell(student: &str, task: &Task, cell: &str) -> Result<TaskResult, GradebookError> {
    let points: u32 = cell.parse().map_err(|_| GradebookError::InvalidScoreCell {
        student: student.to_string(),
        column: task.global_id().to_string(),
        value: cell.to_string(),
    })?;
    TaskResult::new(task, points).map_err(|_| GradebookError::ScoreOutOfRange {
        student: student.to_string(),
        column: task.global_id().to_string(),
        points,
        max: task.max,
    })
}

/// Write results to `path`, replacing the file.
pub fn save_results(exam: &Exam, results: &[ExamResult], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)
        .with_context(|| format!("failed to create results file: {}", path.display()))?;
    write_results(exam, results, file)
        .with_context(|| format!("failed to write results to {}", path.display()))?;

    tracing::info!(path = %path.display(), students = results.len(), "saved results");
    Ok(())
}

/// Write results as CSV in the exam's canonical column order.
pub fn write_results<W: Write>(exam: &Exam, results: &[ExamResult], output: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(output);

    let mut header = vec![STUDENT_COLUMN];
    header.extend(exam.columns());
    writer.write_record(&header)?;

    for result in results {
        let mut row = Vec::with_capacity(exam.task_count() + 1);
        row.push(result.student_id().to_string());
        row.extend(exam.tasks().map(|task| {
            result
                .points_for(task)
                .map(|p| p.to_string())
                .unwrap_or_default()
        }));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
