//! gradebook-report: Rendering of result grids.
//!
//! The core produces plain [`Grid`](gradebook_core::presentation::Grid) data;
//! this crate turns it into a terminal table or a standalone HTML page.

pub mod html;
pub mod text;

use gradebook_core::grading::GradeScale;
use gradebook_core::presentation::CellValue;

/// Where a grade sits on its scale, for coloring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeBand {
    Good,
    Fair,
    Failing,
}

/// The catch-all grade is failing; the better half of the rest is good.
pub fn grade_band(scale: &GradeScale, grade: &str) -> GradeBand {
    let count = scale.thresholds().len();
    match scale.labels().position(|l| l == grade) {
        Some(pos) if pos + 1 == count => GradeBand::Failing,
        Some(pos) if pos < count / 2 => GradeBand::Good,
        _ => GradeBand::Fair,
    }
}

/// Text of a per-task or total cell.
pub fn format_cell(value: &CellValue) -> String {
    match value {
        CellValue::Points(p) => p.to_string(),
        CellValue::Percent(v) => format!("{v:.1}%"),
        CellValue::Weighted(v) => format!("{v:.2}"),
        CellValue::Missing => "-".to_string(),
    }
}

pub fn format_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.1}%"))
        .unwrap_or_else(|| "-".to_string())
}

/// Weights print without a trailing `.0` when whole.
pub fn format_weight(weight: f64) -> String {
    if weight.fract() == 0.0 {
        format!("{weight:.0}")
    } else {
        format!("{weight}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_on_default_scale() {
        let scale = GradeScale::default();
        assert_eq!(grade_band(&scale, "1"), GradeBand::Good);
        assert_eq!(grade_band(&scale, "3"), GradeBand::Good);
        assert_eq!(grade_band(&scale, "4"), GradeBand::Fair);
        assert_eq!(grade_band(&scale, "6"), GradeBand::Failing);
        assert_eq!(grade_band(&scale, "unknown"), GradeBand::Fair);
    }

    #[test]
    fn cell_formatting() {
        assert_eq!(format_cell(&CellValue::Points(7)), "7");
        assert_eq!(format_cell(&CellValue::Percent(50.0)), "50.0%");
        assert_eq!(format_cell(&CellValue::Weighted(12.5)), "12.50");
        assert_eq!(format_cell(&CellValue::Missing), "-");
        assert_eq!(format_percent(None), "-");
        assert_eq!(format_percent(Some(75.0)), "75.0%");
        assert_eq!(format_weight(2.0), "2");
        assert_eq!(format_weight(0.5), "0.5");
    }
}
