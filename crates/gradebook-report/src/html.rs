//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined. The three
//! header levels use `colspan` so each exercise and question spans its tasks.

use anyhow::Result;
use std::path::Path;

use gradebook_core::grading::GradeScale;
use gradebook_core::presentation::{Grid, HeaderCell};

use crate::{format_cell, format_percent, format_weight, grade_band, GradeBand};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML page for a grid.
pub fn generate_html(grid: &Grid, scale: &GradeScale, title: &str) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>gradebook: {}</title>\n",
        html_escape(title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(title)));
    html.push_str(&format!(
        "<p class=\"meta\">{} students | {} tasks | mode: {} | {}</p>\n",
        grid.rows.len(),
        grid.columns.len(),
        grid.mode,
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"results\">\n");
    html.push_str("<table id=\"results\">\n<thead>\n");

    // Tree levels, each starting with a label cell.
    html.push_str(&level_row("Exercise", &grid.exercises, Some(grid.columns.len() + 1)));
    html.push_str(&level_row("Question", &grid.questions, None));

    html.push_str("<tr><th onclick=\"sortTable(0)\">Student</th>");
    for (i, task) in grid.tasks.iter().enumerate() {
        html.push_str(&format!(
            "<th onclick=\"sortTable({})\">{} <span class=\"max\">/{}</span>{}</th>",
            i + 1,
            html_escape(&task.id),
            task.max_points,
            node_detail(task)
        ));
    }
    html.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &grid.rows {
        let band = match grade_band(scale, &row.grade) {
            GradeBand::Good => "good",
            GradeBand::Fair => "fair",
            GradeBand::Failing => "failing",
        };
        html.push_str(&format!("<tr class=\"{band}\"><td>{}</td>", html_escape(&row.student_id)));
        for cell in &row.cells {
            html.push_str(&format!("<td class=\"num\">{}</td>", format_cell(cell)));
        }
        html.push_str(&format!(
            "<td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"grade\">{}</td></tr>\n",
            format_cell(&row.total),
            format_percent(row.percent),
            html_escape(&row.grade)
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(grid)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(grid: &Grid, scale: &GradeScale, title: &str, path: &Path) -> Result<()> {
    let html = generate_html(grid, scale, title);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// One header row. The exercise row also opens the sortable summary headers.
fn level_row(name: &str, nodes: &[HeaderCell], summary_from: Option<usize>) -> String {
    let mut row = format!("<tr><th>{name}</th>");
    for node in nodes {
        row.push_str(&format!(
            "<th colspan=\"{}\">{}{}</th>",
            node.span,
            html_escape(&node.id),
            node_detail(node)
        ));
    }
    if let Some(first) = summary_from {
        for (i, label) in ["Total", "%", "Grade"].into_iter().enumerate() {
            row.push_str(&format!(
                "<th rowspan=\"3\" class=\"summary\" onclick=\"sortTable({})\">{label}</th>",
                first + i
            ));
        }
    }
    row.push_str("</tr>\n");
    row
}

fn node_detail(node: &HeaderCell) -> String {
    format!(
        "<br><span class=\"detail\" title=\"{}\">w={} · {:.1}</span>",
        html_escape(&node.description),
        format_weight(node.weight),
        node.weighted_total
    )
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #dcfce7; --fair: #fef9c3; --failing: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --fair: #713f12; --failing: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1 { margin-top: 0; }
.meta { color: #6b7280; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.4rem 0.8rem; text-align: center; }
th { background: var(--border); }
th[onclick] { cursor: pointer; }
.detail, .max { font-weight: normal; font-size: 0.8rem; color: #6b7280; }
td.num { text-align: right; font-variant-numeric: tabular-nums; }
td.grade { font-weight: bold; }
.good td.grade { background: var(--good); }
.fair td.grade { background: var(--fair); }
.failing td.grade { background: var(--failing); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  const key = (r) => {
    const text = r.cells[col].textContent;
    const num = parseFloat(text);
    return isNaN(num) ? text : num;
  };
  rows.sort((a, b) => {
    const va = key(a);
    const vb = key(b);
    const cmp = typeof va === 'number' && typeof vb === 'number' ? va - vb : String(va).localeCompare(String(vb));
    return asc ? cmp : -cmp;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;
