//! The `gradebook grade` command.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gradebook_core::config::GradebookConfig;
use gradebook_core::grading::GradeScale;
use gradebook_core::model::{Exam, Question, Task};
use gradebook_core::results::{ExamResult, ResultSummary};
use gradebook_core::traits::{EntryReporter, LineReader, PromptReader};
use gradebook_core::{DisplayMode, EntryError, Gradebook, GradebookError, ScoreError};
use gradebook_report::text::{render_grid, TextOptions};

const STUDENT_PROMPT: &str = "student> ";

const HELP: &str = "\
Enter a student id to grade that student, or one of:
  :show                          print the results table
  :mode [raw|percent|weighted]   set the display mode, or cycle it
  :save                          write the results file now
  :help                          show this help
A quit word saves and exits. While grading, the cancel literal drops the
current student.";

/// Console entry reporter.
struct ConsoleReporter {
    scale: GradeScale,
}

impl EntryReporter for ConsoleReporter {
    fn on_question(&self, exam: &Exam, question: &Question) {
        let exercise = exam.exercise_of(question);
        println!(
            "\n[{}-{}] {}: {}",
            exercise.id, question.id, exercise.description, question.description
        );
    }

    fn on_rejected(&self, _task: &Task, error: &ScoreError) {
        eprintln!("  Rejected: {error}, try again.");
    }

    fn on_recorded(&self, exam: &Exam, result: &ExamResult) {
        let summary = ResultSummary::compute(result, exam, &self.scale);
        println!(
            "Recorded {}: {}/{} points, {:.2}% weighted, grade {}",
            summary.student_id,
            summary.points_total,
            exam.points_total(),
            summary.weighted_percent,
            summary.grade,
        );
    }

    fn on_aborted(&self, student_id: &str, error: &EntryError) {
        if error.is_cancellation() {
            eprintln!("  Entry for '{student_id}' cancelled ({error}), nothing recorded.");
        } else {
            eprintln!("  Entry for '{student_id}' failed: {error}");
        }
    }
}

pub fn execute(exam_path: PathBuf, results_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let (mut book, config) = super::open_gradebook(&exam_path, &results_path, config_path)?;

    println!(
        "Grading {} ({} tasks, {} points). {} student(s) on record. Type :help for commands.",
        exam_path.display(),
        book.exam().task_count(),
        book.exam().points_total(),
        book.results().len()
    );

    let stdin = io::stdin();
    let mut reader = PromptReader::new(stdin.lock(), io::stdout());
    run_session(&mut book, &mut reader, &config, &results_path)?;

    book.save_results(&results_path)?;
    println!(
        "Saved {} result(s) to {}",
        book.results().len(),
        results_path.display()
    );
    Ok(())
}

/// The student prompt loop. Returns when a quit word is entered or input ends.
fn run_session(
    book: &mut Gradebook,
    reader: &mut dyn LineReader,
    config: &GradebookConfig,
    results_path: &Path,
) -> Result<()> {
    let options = config.entry_options();
    let mut mode = config.display_mode;
    let reporter = ConsoleReporter {
        scale: book.scale().clone(),
    };

    loop {
        let Some(line) = reader
            .read_line(STUDENT_PROMPT)
            .context("failed to read student id")?
        else {
            println!();
            return Ok(());
        };
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if config.is_quit_word(input) {
            return Ok(());
        }
        if let Some(command) = input.strip_prefix(':') {
            run_command(command, book, &mut mode, results_path)?;
            continue;
        }

        match book.read(input, reader, &options, &reporter) {
            Ok(_) => {}
            Err(EntryError::Input(e)) => return Err(e).context("failed to read score"),
            Err(EntryError::Gradebook(e @ GradebookError::DuplicateStudent(_))) => {
                eprintln!("  {e}");
            }
            // Already reported.
            Err(_) => {}
        }
    }
}

fn run_command(
    command: &str,
    book: &Gradebook,
    mode: &mut DisplayMode,
    results_path: &Path,
) -> Result<()> {
    let mut parts = command.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("show"), _) => {
            let options = TextOptions {
                styled: io::stdout().is_terminal(),
            };
            println!("{}", render_grid(&book.grid(*mode), book.scale(), options));
        }
        (Some("mode"), None) => {
            *mode = mode.next();
            println!("Display mode: {mode}");
        }
        (Some("mode"), Some(name)) => match name.parse::<DisplayMode>() {
            Ok(m) => {
                *mode = m;
                println!("Display mode: {mode}");
            }
            Err(e) => eprintln!("  {e}"),
        },
        (Some("save"), _) => {
            book.save_results(results_path)?;
            println!(
                "Saved {} result(s) to {}",
                book.results().len(),
                results_path.display()
            );
        }
        (Some("help"), _) => println!("{HELP}"),
        _ => eprintln!("  Unknown command ':{command}'. Type :help for commands."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_core::model::{ExerciseDef, QuestionDef, TaskDef};
    use gradebook_core::traits::ScriptedReader;

    fn book() -> Gradebook {
        let exam = Exam::from_definitions(vec![ExerciseDef::new("1").question(
            QuestionDef::new("a")
                .task(TaskDef::new("x").max(4))
                .task(TaskDef::new("y").max(6)),
        )])
        .unwrap();
        Gradebook::new(exam, GradeScale::default())
    }

    #[test]
    fn session_records_until_quit_word() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut book = book();
        let mut reader = ScriptedReader::new(["ann", "2", "6", "", "ben", "1", "q", "bye", "never"]);

        run_session(&mut book, &mut reader, &GradebookConfig::default(), &path).unwrap();

        assert_eq!(book.results().len(), 1);
        assert_eq!(book.results()[0].student_id(), "ann");
        assert_eq!(reader.remaining(), 1);
    }

    #[test]
    fn session_commands_do_not_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut book = book();
        let mut reader = ScriptedReader::new([":mode", ":mode weighted", ":nope", ":save"]);

        run_session(&mut book, &mut reader, &GradebookConfig::default(), &path).unwrap();

        assert!(book.results().is_empty());
        assert!(path.exists());
    }

    #[test]
    fn duplicate_student_keeps_session_going() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut book = book();
        let mut reader = ScriptedReader::new(["ann", "0", "0", "ann", "ben", "4", "6"]);

        run_session(&mut book, &mut reader, &GradebookConfig::default(), &path).unwrap();

        let ids: Vec<_> = book.results().iter().map(|r| r.student_id()).collect();
        assert_eq!(ids, ["ann", "ben"]);
    }
}
