#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Header of the error-code column in an error-code table.
pub const ERROR_CODE_HEADER: &str = "Error Code";

/// Grade every entity starts from when no other default is configured.
pub const DEFAULT_GRADE: f64 = 100.0;

/// Ceiling used for out-of-range checks and histogram bucketing when no range
/// constraint is given.
pub const DEFAULT_CEILING: f64 = 100.0;

/// Bin width of the unconstrained histogram.
pub const DEFAULT_BIN_WIDTH: f64 = 5.0;

/// Number of equal bins used when a range constraint is given.
pub const CONSTRAINED_BINS: usize = 10;

/// Separates one entity's block from the next in an annotation file.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Introduces a comment line inside an entity block.
pub const COMMENT_SEPARATOR: &str = "\n\t";

/// Opens free-text commentary that is never graded.
pub const NOTE_OPENER: char = '{';

/// Most bins an unconstrained histogram may be laid out with.
pub const MAX_HISTOGRAM_BINS: usize = 1000;

/// Width of the longest bar in a rendered text histogram.
pub const HISTOGRAM_BAR_WIDTH: usize = 40;

/// Environment variable overriding the default grade.
pub const DEFAULT_GRADE_ENV: &str = "GRADETALLY_DEFAULT_GRADE";

/// Environment variable holding an optional range constraint.
pub const RANGE_ENV: &str = "GRADETALLY_RANGE";

/// Environment variable enabling the tab-separated fallback for unknown
/// error-code table extensions.
pub const TAB_FALLBACK_ENV: &str = "GRADETALLY_TAB_FALLBACK";
