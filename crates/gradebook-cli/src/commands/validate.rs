//! The `gradebook validate` command.

use std::path::PathBuf;

use anyhow::Result;

use gradebook_core::config::load_config_from;
use gradebook_core::model::WeightedNode;
use gradebook_core::parser::parse_exam;
use gradebook_core::table;
use gradebook_report::format_weight;

pub fn execute(
    exam_path: PathBuf,
    results_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let exam = parse_exam(&exam_path, &config.parse_options())?;

    println!(
        "Exam: {} ({} tasks, {} points)",
        exam_path.display(),
        exam.task_count(),
        exam.points_total()
    );

    for exercise in exam.exercises() {
        println!(
            "  {}  w={} [{:.1}]  {}",
            exercise.id,
            format_weight(exercise.weight),
            exercise.weighted_points_total(&exam),
            exercise.description
        );
        for question in exercise.questions() {
            println!(
                "    {}-{}  w={} [{:.1}]  {}",
                exercise.id,
                question.id,
                format_weight(question.weight),
                question.weighted_points_total(&exam),
                question.description
            );
            for task in question.tasks() {
                println!(
                    "      {}  max={} w={} [{:.1}]  {}",
                    task.global_id(),
                    task.max,
                    format_weight(task.weight),
                    task.weighted_points_total(&exam),
                    task.description
                );
            }
        }
    }

    if let Some(path) = results_path {
        if path.exists() {
            let results = table::load_results(&exam, &path)?;
            println!(
                "Results: {} ({} students) match the exam definition.",
                path.display(),
                results.len()
            );
        } else {
            println!("Results: {} does not exist yet.", path.display());
        }
    }

    println!("Exam definition valid.");
    Ok(())
}
