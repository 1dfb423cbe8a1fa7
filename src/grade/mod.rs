#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Accumulating grades across records.
pub mod engine;
/// Turning one comment into a grade adjustment.
pub mod resolve;
/// Grade result and report types.
pub mod results;
/// Descriptive statistics and histograms.
pub mod stats;

pub use engine::{GradeError, compute_grades};
pub use resolve::{PenaltyOutcome, ResolveError, resolve};
pub use results::{GradeReport, GradeResult, UnresolvedComment};
pub use stats::{Histogram, StatsError, Summary, summarize};
