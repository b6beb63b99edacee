//! CLI integration tests using assert_cmd.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const HEADER: &str = "student,1-a-i,1-a-ii,1-b-i,2-a-i,2-a-ii";

fn sample_exam() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../exams/sample.yml")
}

/// A command isolated from any config in the working or home directory.
fn gradebook(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("gradebook").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("GRADEBOOK_DISPLAY_MODE")
        .env_remove("RUST_LOG");
    cmd
}

fn grade(dir: &TempDir, results: &Path, script: &str) -> assert_cmd::assert::Assert {
    gradebook(dir)
        .arg("grade")
        .arg("--exam")
        .arg(sample_exam())
        .arg("--results")
        .arg(results)
        .write_stdin(script)
        .assert()
}

#[test]
fn grade_records_and_saves_student() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");

    grade(&dir, &results, "alice\n4\n6\n5\n3\n1\nq\n")
        .success()
        .stdout(predicate::str::contains("5 tasks, 19 points"))
        .stdout(predicate::str::contains(
            "Recorded alice: 19/19 points, 100.00% weighted, grade 1",
        ))
        .stdout(predicate::str::contains("Saved 1 result(s)"));

    let content = std::fs::read_to_string(&results).unwrap();
    assert_eq!(content, format!("{HEADER}\nalice,4,6,5,3,1\n"));
}

#[test]
fn grade_rejects_score_over_max_and_reprompts() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");

    grade(&dir, &results, "carol\n9\nabc\n-1\n4\n6\n5\n3\n1\nexit\n")
        .success()
        .stderr(predicate::str::contains("9 is more than the maximum of 4"))
        .stderr(predicate::str::contains("'abc' is not a whole number"))
        .stderr(predicate::str::contains("-1 is below zero"));

    let content = std::fs::read_to_string(&results).unwrap();
    assert!(content.contains("carol,4,6,5,3,1"));
}

#[test]
fn grade_cancel_discards_current_student() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");

    grade(&dir, &results, "bob\n2\nq\nquit\n")
        .success()
        .stderr(predicate::str::contains("Entry for 'bob' cancelled"))
        .stdout(predicate::str::contains("Saved 0 result(s)"));

    let content = std::fs::read_to_string(&results).unwrap();
    assert_eq!(content, format!("{HEADER}\n"));
}

#[test]
fn grade_refuses_recorded_student() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");
    std::fs::write(&results, format!("{HEADER}\nalice,1,1,1,1,1\n")).unwrap();

    grade(&dir, &results, "alice\nq\n")
        .success()
        .stderr(predicate::str::contains(
            "student 'alice' already has a recorded result",
        ));

    let content = std::fs::read_to_string(&results).unwrap();
    assert_eq!(content, format!("{HEADER}\nalice,1,1,1,1,1\n"));
}

#[test]
fn grade_show_and_mode_commands() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");
    std::fs::write(&results, "student,2-a-ii,1-a-i\nbob,1,2\n").unwrap();

    grade(&dir, &results, ":show\n:mode weighted\n:show\n:help\nq\n")
        .success()
        .stdout(predicate::str::contains("Total (raw)"))
        .stdout(predicate::str::contains("Display mode: weighted"))
        .stdout(predicate::str::contains("Total (weighted)"))
        .stdout(predicate::str::contains("25.00"))
        .stdout(predicate::str::contains(":save"));

    // Save normalizes column order; absent results stay empty.
    let content = std::fs::read_to_string(&results).unwrap();
    assert_eq!(content, format!("{HEADER}\nbob,2,,,,1\n"));
}

#[test]
fn grade_saves_on_end_of_input() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("out").join("results.csv");

    grade(&dir, &results, "dana\n0\n0\n0\n0\n0\n").success();

    let content = std::fs::read_to_string(&results).unwrap();
    assert_eq!(content, format!("{HEADER}\ndana,0,0,0,0,0\n"));
}

#[test]
fn show_json_grid() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");
    std::fs::write(&results, format!("{HEADER}\nalice,4,6,5,3,1\n")).unwrap();

    gradebook(&dir)
        .arg("show")
        .arg("--exam")
        .arg(sample_exam())
        .arg("--results")
        .arg(&results)
        .arg("--format")
        .arg("json")
        .arg("--mode")
        .arg("percent")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"mode\": \"percent\""))
        .stdout(predicate::str::contains("\"student_id\": \"alice\""))
        .stdout(predicate::str::contains("\"grade\": \"1\""));
}

#[test]
fn show_summary_json() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");
    std::fs::write(&results, format!("{HEADER}\nalice,4,6,5,3,1\nbob,2,,,,1\n")).unwrap();

    gradebook(&dir)
        .arg("show")
        .arg("--exam")
        .arg(sample_exam())
        .arg("--results")
        .arg(&results)
        .arg("--format")
        .arg("summary")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"student_id\": \"bob\""))
        .stdout(predicate::str::contains("\"points_total\": 19"))
        .stdout(predicate::str::contains("\"points_total\": 3"))
        .stdout(predicate::str::contains("\"grade\": \"6\""));
}

#[test]
fn show_html_to_file() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");
    std::fs::write(&results, format!("{HEADER}\nalice,4,6,5,3,1\n")).unwrap();
    let report = dir.path().join("reports").join("exam.html");

    gradebook(&dir)
        .arg("show")
        .arg("--exam")
        .arg(sample_exam())
        .arg("--results")
        .arg(&results)
        .arg("--format")
        .arg("html")
        .arg("--output")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Report written to"));

    let html = std::fs::read_to_string(&report).unwrap();
    assert!(html.contains("<html"));
    assert!(html.contains("alice"));
}

#[test]
fn show_rejects_unknown_mode() {
    let dir = TempDir::new().unwrap();

    gradebook(&dir)
        .arg("show")
        .arg("--exam")
        .arg(sample_exam())
        .arg("--results")
        .arg(dir.path().join("results.csv"))
        .arg("--mode")
        .arg("fancy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown display mode: fancy"));
}

#[test]
fn validate_prints_tree() {
    let dir = TempDir::new().unwrap();

    gradebook(&dir)
        .arg("validate")
        .arg("--exam")
        .arg(sample_exam())
        .assert()
        .success()
        .stdout(predicate::str::contains("5 tasks, 19 points"))
        .stdout(predicate::str::contains("1-b-i  max=5 w=2 [33.3]"))
        .stdout(predicate::str::contains("Exam definition valid"));
}

#[test]
fn validate_reports_unknown_column() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");
    std::fs::write(&results, "student,1-a-i,9-z-z\nalice,1,1\n").unwrap();

    gradebook(&dir)
        .arg("validate")
        .arg("--exam")
        .arg(sample_exam())
        .arg("--results")
        .arg(&results)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no task with id '9-z-z'"));
}

#[test]
fn validate_malformed_exam() {
    let dir = TempDir::new().unwrap();
    let exam = dir.path().join("exam.yml");
    std::fs::write(&exam, "1:\n  weight: -1\n  a:\n    x: 2\n").unwrap();

    gradebook(&dir)
        .arg("validate")
        .arg("--exam")
        .arg(&exam)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed exam definition"));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();

    gradebook(&dir)
        .arg("validate")
        .arg("--exam")
        .arg("nonexistent.yml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn config_changes_cancel_literal() {
    let dir = TempDir::new().unwrap();
    let results = dir.path().join("results.csv");
    std::fs::write(dir.path().join("gradebook.toml"), "cancel_literal = \"x\"\n").unwrap();

    grade(&dir, &results, "erin\nx\nq\n")
        .success()
        .stderr(predicate::str::contains("Entry for 'erin' cancelled"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    gradebook(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created gradebook.toml"))
        .stdout(predicate::str::contains("Created exam.yml"));

    assert!(dir.path().join("gradebook.toml").exists());
    assert!(dir.path().join("exam.yml").exists());

    gradebook(&dir)
        .arg("validate")
        .arg("--exam")
        .arg("exam.yml")
        .assert()
        .success()
        .stdout(predicate::str::contains("5 tasks"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("gradebook.toml"), "# custom").unwrap();

    gradebook(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists, skipping"));
}
