//! # gradetally
//!
//! Turns manual grading annotations into grades. Each entity starts at a
//! default grade, every annotation is looked up in an error-code table (or
//! carries its own override), and the resulting grades are summarised.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Loading error-code tables
pub mod codes;
/// Run configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// For all things related to grading
pub mod grade;
/// Splitting annotation text into per-entity records
pub mod records;
/// Text rendering of grades, diagnostics and statistics
pub mod report;
/// Utility functions for convenience
pub mod util;

use std::path::Path;

use anyhow::{Context, Result};
pub use codes::{ErrorCodeEntry, ErrorCodeTable, Penalty, TableError, TableFormat};
pub use config::{FormatPolicy, GradingConfig};
pub use grade::{
    GradeError, GradeReport, GradeResult, Histogram, PenaltyOutcome, ResolveError, StatsError,
    Summary, UnresolvedComment, compute_grades, resolve, summarize,
};
pub use records::{GradingRecord, RecordError};

/// Loads an error-code table, refusing unrecognised extensions.
pub fn load_table(path: &Path) -> Result<ErrorCodeTable, TableError> {
    ErrorCodeTable::load(path, FormatPolicy::Strict)
}

/// Parses annotation text, starting every record at the default grade.
pub fn parse_records(raw: &str) -> Result<Vec<GradingRecord>, RecordError> {
    records::parse(raw, constants::DEFAULT_GRADE)
}

/// Everything produced by grading one annotation file.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Grading {
    /// Grades and diagnostics.
    pub report:  GradeReport,
    /// Statistics over the grades; `None` when there were no entities.
    pub summary: Option<Summary>,
}

/// Loads both files and grades every entity according to `config`.
///
/// * `annotations`: the manual grading file
/// * `codes`: the error-code table
/// * `config`: default grade, range constraint and format policy
pub fn grade_files(annotations: &Path, codes: &Path, config: &GradingConfig) -> Result<Grading> {
    config.validate()?;

    let table = ErrorCodeTable::load(codes, config.format_policy)
        .with_context(|| format!("Could not load error codes from {}", codes.display()))?;
    let raw = util::read_text(annotations)?;
    let records = records::parse(&raw, config.default_grade)
        .with_context(|| format!("Could not parse {}", annotations.display()))?;
    tracing::info!("Parsed {} entities from {}", records.len(), annotations.display());

    let report = compute_grades(records, &table, config.default_grade, config.range_constraint)
        .with_context(|| format!("Could not grade {}", annotations.display()))?;
    let summary = match summarize(&report.grades(), config.range_constraint) {
        Ok(summary) => Some(summary),
        Err(StatsError::NoGrades) => None,
        Err(e) => return Err(e).context("Could not summarise grades"),
    };

    Ok(Grading { report, summary })
}
