#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use colored::Colorize;
use itertools::Itertools;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use crate::{
    codes::ErrorCodeTable,
    constants::HISTOGRAM_BAR_WIDTH,
    grade::{GradeReport, Histogram, Summary},
};

#[derive(Tabled)]
/// One line of the grade table
struct GradeRow {
    #[tabled(rename = "Entity")]
    /// * `entity`: entity id
    entity:     String,
    #[tabled(rename = "Grade")]
    /// * `grade`: final grade, two decimals
    grade:      String,
    #[tabled(rename = "Unresolved")]
    /// * `unresolved`: comments that added nothing
    unresolved: String,
}

/// Renders the per-entity grades as a table.
pub fn grades_table(report: &GradeReport) -> String {
    let rows = report.results.iter().map(|r| GradeRow {
        entity:     r.entity_id.clone(),
        grade:      format!("{:.2}", r.final_grade),
        unresolved: r.unresolved_comments.iter().join(", "),
    });

    Table::new(rows)
        .with(Panel::header("Grades"))
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .with(Style::modern())
        .to_string()
}

/// Renders the loaded error codes as a table.
pub fn codes_table(table: &ErrorCodeTable) -> String {
    Table::new(table.iter())
        .with(Panel::header(format!("{} error codes", table.len())))
        .with(Style::modern())
        .to_string()
}

/// Renders unresolved comments and range violations, or `None` when there
/// are none.
pub fn diagnostics(report: &GradeReport) -> Option<String> {
    let mut out = Vec::new();

    if !report.unresolved.is_empty() {
        out.push(
            Table::new(&report.unresolved)
                .with(Panel::header("Comments not in the error-code table"))
                .with(Style::modern())
                .to_string(),
        );
    }
    if !report.below_zero.is_empty() {
        out.push(format!(
            "{} {}",
            "Lower than 0:".red().bold(),
            report.below_zero.iter().join(", ")
        ));
    }
    if !report.above_ceiling.is_empty() {
        out.push(format!(
            "{} {}",
            format!("Higher than {}:", report.ceiling).yellow().bold(),
            report.above_ceiling.iter().join(", ")
        ));
    }

    (!out.is_empty()).then(|| out.join("\n"))
}

/// Renders one bar per histogram bin, scaled to the fullest bin.
pub fn histogram(histogram: &Histogram) -> String {
    let fullest = histogram.counts.iter().copied().max().unwrap_or(0).max(1);
    let last = histogram.counts.len().saturating_sub(1);

    let mut lines = histogram
        .bins()
        .enumerate()
        .map(|(i, (low, high, count))| {
            let close = if i == last { ']' } else { ')' };
            let bar = "#".repeat(count * HISTOGRAM_BAR_WIDTH / fullest);
            format!("[{low:>7.2}, {high:>7.2}{close} {count:>4} {bar}")
        })
        .collect::<Vec<_>>();

    if histogram.outside > 0 {
        lines.push(format!("{} outside the histogram range", histogram.outside));
    }
    lines.join("\n")
}

/// Renders the statistics block followed by the histogram.
pub fn summary(summary: &Summary) -> String {
    format!(
        "Count: {}\nMean: {:.2}\nMedian: {:.2}\nSD: {:.2}\nMin: {:.2}\nMax: {:.2}\n\n{}",
        summary.count,
        summary.mean,
        summary.median,
        summary.stddev,
        summary.min,
        summary.max,
        histogram(&summary.histogram)
    )
}
