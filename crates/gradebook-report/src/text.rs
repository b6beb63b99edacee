//! Terminal table rendering with comfy-table.
//!
//! Columns: student, one per task, total, percent, grade. The first three
//! rows carry the exercise, question and task levels of the tree; a node's
//! label sits in the first column it spans.

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table};

use gradebook_core::grading::GradeScale;
use gradebook_core::presentation::{Grid, HeaderCell};

use crate::{format_cell, format_percent, format_weight, grade_band, GradeBand};

/// Rendering switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    /// Emit ANSI colors and attributes even when not writing to a terminal.
    pub styled: bool,
}

/// Build the table for `grid`.
pub fn render_table(grid: &Grid, scale: &GradeScale, options: TextOptions) -> Table {
    let mut table = Table::new();
    if options.styled {
        table.enforce_styling();
    } else {
        table.force_no_tty();
    }

    table.set_header(level_row("Exercise", &grid.exercises, grid.columns.len()));
    table.add_row(level_row("Question", &grid.questions, grid.columns.len()));

    let mut task_row = vec![Cell::new("Task").add_attribute(Attribute::Bold)];
    task_row.extend(grid.tasks.iter().map(|t| {
        Cell::new(format!(
            "{} /{}\nw={} [{:.1}]",
            t.id,
            t.max_points,
            format_weight(t.weight),
            t.weighted_total
        ))
        .add_attribute(Attribute::Bold)
    }));
    task_row.extend(
        [
            format!("Total ({})", grid.mode),
            "%".to_string(),
            "Grade".to_string(),
        ]
        .into_iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold)),
    );
    table.add_row(task_row);

    for row in &grid.rows {
        let mut cells = vec![Cell::new(&row.student_id)];
        cells.extend(row.cells.iter().map(|v| {
            let cell = Cell::new(format_cell(v)).set_alignment(CellAlignment::Right);
            if v.as_f64().is_none() {
                cell.fg(Color::DarkGrey)
            } else {
                cell
            }
        }));
        cells.push(Cell::new(format_cell(&row.total)).set_alignment(CellAlignment::Right));
        cells.push(Cell::new(format_percent(row.percent)).set_alignment(CellAlignment::Right));
        cells.push(grade_cell(scale, &row.grade));
        table.add_row(cells);
    }

    table
}

/// Render `grid` to a string.
pub fn render_grid(grid: &Grid, scale: &GradeScale, options: TextOptions) -> String {
    render_table(grid, scale, options).to_string()
}

fn level_row(name: &str, nodes: &[HeaderCell], columns: usize) -> Vec<Cell> {
    let mut row = Vec::with_capacity(columns + 4);
    row.push(Cell::new(name).add_attribute(Attribute::Bold));
    for node in nodes {
        row.push(
            Cell::new(format!(
                "{}\nw={} [{:.1}]",
                node.id,
                format_weight(node.weight),
                node.weighted_total
            ))
            .add_attribute(Attribute::Bold),
        );
        row.extend((1..node.span).map(|_| Cell::new("")));
    }
    row.extend((0..3).map(|_| Cell::new("")));
    row
}

fn grade_cell(scale: &GradeScale, grade: &str) -> Cell {
    let color = match grade_band(scale, grade) {
        GradeBand::Good => Color::Green,
        GradeBand::Fair => Color::Yellow,
        GradeBand::Failing => Color::Red,
    };
    Cell::new(grade)
        .fg(color)
        .add_attribute(Attribute::Bold)
        .set_alignment(CellAlignment::Center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_core::model::{Exam, ExerciseDef, QuestionDef, TaskDef};
    use gradebook_core::presentation::{shape, DisplayMode};
    use gradebook_core::results::{ExamResult, TaskResult};

    fn sample() -> (Exam, Vec<ExamResult>) {
        let exam = Exam::from_definitions(vec![ExerciseDef::new("1").question(
            QuestionDef::new("a")
                .task(TaskDef::new("x").max(4))
                .task(TaskDef::new("y").max(6)),
        )])
        .unwrap();
        let x = exam.task_by_global_id("1-a-x").unwrap();
        let result = ExamResult::new("alice", vec![TaskResult::new(x, 2).unwrap()], &exam).unwrap();
        (exam, vec![result])
    }

    #[test]
    fn plain_table_has_levels_and_students() {
        let (exam, results) = sample();
        let scale = GradeScale::default();
        let grid = shape(&exam, &results, &scale, DisplayMode::Raw);
        let text = render_grid(&grid, &scale, TextOptions::default());

        assert!(text.contains("Exercise"));
        assert!(text.contains("Question"));
        assert!(text.contains("x /4"));
        assert!(text.contains("[50.0]"));
        assert!(text.contains("alice"));
        assert!(text.contains("Total (raw)"));
        assert!(text.contains("20.0%"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn weighted_mode_labels_total() {
        let (exam, results) = sample();
        let scale = GradeScale::default();
        let grid = shape(&exam, &results, &scale, DisplayMode::Weighted);
        let text = render_grid(&grid, &scale, TextOptions::default());
        assert!(text.contains("Total (weighted)"));
        assert!(text.contains("25.00"));
    }

    #[test]
    fn styled_table_emits_ansi() {
        let (exam, results) = sample();
        let scale = GradeScale::default();
        let grid = shape(&exam, &results, &scale, DisplayMode::Raw);
        let text = render_grid(&grid, &scale, TextOptions { styled: true });
        assert!(text.contains('\u{1b}'));
    }
}
