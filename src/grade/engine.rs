#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use itertools::Itertools;

use super::{
    resolve::{PenaltyOutcome, ResolveError, resolve},
    results::{GradeReport, GradeResult, UnresolvedComment},
};
use crate::{codes::ErrorCodeTable, constants::DEFAULT_CEILING, records::GradingRecord};

/// Errors that abort a grading run.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum GradeError {
    /// A comment could not be resolved.
    #[error("Could not grade `{entity_id}`")]
    Resolve {
        /// entity whose comment failed
        entity_id: String,
        /// what went wrong with the comment
        #[source]
        source:    ResolveError,
    },
}

/// Grades every record.
///
/// Each grade is `default_grade` plus the delta of every comment. Unknown
/// comments are collected and logged but add nothing; any other resolution
/// failure aborts the whole run. Grades below zero or above the ceiling
/// (`range_constraint`, else 100) are reported, not clamped.
pub fn compute_grades(
    records: Vec<GradingRecord>,
    table: &ErrorCodeTable,
    default_grade: f64,
    range_constraint: Option<f64>,
) -> Result<GradeReport, GradeError> {
    let ceiling = range_constraint.unwrap_or(DEFAULT_CEILING);
    let mut report = GradeReport {
        ceiling,
        ..GradeReport::default()
    };

    for mut record in records {
        record.grade = default_grade;
        let mut unresolved_comments = Vec::new();

        for comment in &record.comments {
            let outcome = resolve(comment, table).map_err(|source| GradeError::Resolve {
                entity_id: record.entity_id.clone(),
                source,
            })?;
            record.grade += outcome.delta();

            if let PenaltyOutcome::Unknown(raw) = outcome {
                tracing::warn!(
                    "The error code `{raw}` for `{}` is not in the error-code table",
                    record.entity_id
                );
                report.unresolved.push(
                    UnresolvedComment::builder()
                        .entity_id(record.entity_id.as_str())
                        .comment(raw.as_str())
                        .build(),
                );
                unresolved_comments.push(raw);
            }
        }

        report.results.push(
            GradeResult::builder()
                .entity_id(record.entity_id)
                .final_grade(record.grade)
                .unresolved_comments(unresolved_comments)
                .build(),
        );
    }

    report.below_zero = report
        .results
        .iter()
        .filter(|r| r.final_grade < 0.0)
        .map(|r| r.entity_id.clone())
        .unique()
        .collect();
    report.above_ceiling = report
        .results
        .iter()
        .filter(|r| r.final_grade > ceiling)
        .map(|r| r.entity_id.clone())
        .unique()
        .collect();

    if !report.below_zero.is_empty() {
        tracing::warn!(
            "The following entities have grades lower than 0: {}",
            report.below_zero.iter().join(", ")
        );
    }
    if !report.above_ceiling.is_empty() {
        tracing::warn!(
            "The following entities have grades higher than {ceiling}: {}",
            report.above_ceiling.iter().join(", ")
        );
    }
    tracing::info!(
        "Graded {} entities, {} unresolved comments",
        report.results.len(),
        report.unresolved.len()
    );

    Ok(report)
}
