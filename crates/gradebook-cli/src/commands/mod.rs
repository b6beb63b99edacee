pub mod grade;
pub mod init;
pub mod show;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::Result;

use gradebook_core::config::{load_config_from, GradebookConfig};
use gradebook_core::parser::parse_exam;
use gradebook_core::Gradebook;

/// Load config, exam definition and results into a gradebook.
pub(crate) fn open_gradebook(
    exam_path: &Path,
    results_path: &Path,
    config_path: Option<PathBuf>,
) -> Result<(Gradebook, GradebookConfig)> {
    let config = load_config_from(config_path.as_deref())?;
    let exam = parse_exam(exam_path, &config.parse_options())?;
    let mut book = Gradebook::new(exam, config.grade_scale()?);
    book.load_results(results_path)?;
    Ok((book, config))
}
