//! The `gradebook show` command.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use gradebook_core::DisplayMode;
use gradebook_report::html::{generate_html, write_html_report};
use gradebook_report::text::{render_grid, TextOptions};

pub fn execute(
    exam_path: PathBuf,
    results_path: PathBuf,
    mode: Option<String>,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (book, config) = super::open_gradebook(&exam_path, &results_path, config_path)?;

    let mode = match mode {
        Some(m) => m.parse::<DisplayMode>().map_err(|e| anyhow::anyhow!(e))?,
        None => config.display_mode,
    };
    let grid = book.grid(mode);

    let rendered = match format.as_str() {
        "text" => {
            let options = TextOptions {
                styled: output.is_none() && std::io::stdout().is_terminal(),
            };
            render_grid(&grid, book.scale(), options)
        }
        "json" => serde_json::to_string_pretty(&grid)?,
        "summary" => serde_json::to_string_pretty(&book.summaries())?,
        "html" => {
            let title = report_title(&exam_path);
            if let Some(path) = &output {
                write_html_report(&grid, book.scale(), &title, path)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                println!("Report written to {}", path.display());
                return Ok(());
            }
            generate_html(&grid, book.scale(), &title)
        }
        other => anyhow::bail!("unknown format '{other}', expected text, json, summary or html"),
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

fn report_title(exam_path: &Path) -> String {
    exam_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Exam results".to_string())
}
