#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

use crate::constants::{CONSTRAINED_BINS, DEFAULT_BIN_WIDTH, DEFAULT_CEILING, MAX_HISTOGRAM_BINS};

/// Tolerance used when laying out and comparing bin edges.
const EDGE_EPSILON: f64 = 1e-9;

/// Errors raised while summarising grades.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StatsError {
    /// There is nothing to summarise.
    #[error("Cannot summarise an empty list of grades")]
    NoGrades,
    /// The range constraint cannot be split into bins.
    #[error("Range constraint must be a positive number, got {0}")]
    InvalidRange(f64),
    /// A grade is infinite or not a number.
    #[error("Cannot summarise a non-finite grade: {0}")]
    NonFiniteGrade(f64),
    /// The lowest grade is so far below zero that the histogram would need
    /// more bins than it is allowed to hold.
    #[error("A lowest grade of {lowest} would need {bins} histogram bins")]
    TooManyBins {
        /// lowest grade, where the first bin starts
        lowest: f64,
        /// number of bins the layout would need
        bins:   f64,
    },
}

/// Grade counts over consecutive bins.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges in increasing order; one more than there are bins.
    pub edges:   Vec<f64>,
    /// Grades per bin. Bins are half-open except the last, which is closed.
    pub counts:  Vec<usize>,
    /// Grades below the first edge or above the last one.
    pub outside: usize,
}

impl Histogram {
    /// Lays out the bin edges for `grades`.
    ///
    /// Without a range constraint the edges run from `min(0, lowest grade)`
    /// to 100 in steps of 5. With one, they split `0..=range` into ten bins.
    ///
    /// Fails with [`StatsError::TooManyBins`] when the lowest grade would need
    /// more than [`MAX_HISTOGRAM_BINS`] bins.
    pub fn edges_for(
        grades: &[f64],
        range_constraint: Option<f64>,
    ) -> Result<Vec<f64>, StatsError> {
        let edges = match range_constraint {
            Some(range) => {
                let step = range / CONSTRAINED_BINS as f64;
                (0..=CONSTRAINED_BINS)
                    .map(|i| if i == CONSTRAINED_BINS { range } else { i as f64 * step })
                    .collect()
            }
            None => {
                let start = grades.iter().copied().fold(0.0, f64::min);
                let steps = ((DEFAULT_CEILING - start) / DEFAULT_BIN_WIDTH + EDGE_EPSILON).floor();
                if steps > MAX_HISTOGRAM_BINS as f64 {
                    return Err(StatsError::TooManyBins {
                        lowest: start,
                        bins:   steps,
                    });
                }
                (0..=steps as usize)
                    .map(|i| start + i as f64 * DEFAULT_BIN_WIDTH)
                    .collect()
            }
        };
        Ok(edges)
    }

    /// Counts `grades` into the bins delimited by `edges`.
    pub fn count(grades: &[f64], edges: Vec<f64>) -> Self {
        let bins = edges.len().saturating_sub(1);
        let mut counts = vec![0; bins];
        let mut outside = 0;

        for &grade in grades {
            match bin_index(&edges, grade) {
                Some(i) => counts[i] += 1,
                None => outside += 1,
            }
        }

        Self {
            edges,
            counts,
            outside,
        }
    }

    /// Iterates `(low, high, count)` per bin.
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }
}

/// Which bin `grade` falls in, if any.
fn bin_index(edges: &[f64], grade: f64) -> Option<usize> {
    let (first, last) = (*edges.first()?, *edges.last()?);
    if edges.len() < 2 || grade.is_nan() || grade < first || grade > last {
        return None;
    }
    if grade == last {
        return Some(edges.len() - 2);
    }
    Some(edges.partition_point(|&e| e <= grade) - 1)
}

/// Descriptive statistics over a list of grades.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of grades.
    pub count:     usize,
    /// Arithmetic mean.
    pub mean:      f64,
    /// Middle value; the mean of the middle two for an even count.
    pub median:    f64,
    /// Population standard deviation.
    pub stddev:    f64,
    /// Lowest grade.
    pub min:       f64,
    /// Highest grade.
    pub max:       f64,
    /// Distribution of the grades.
    pub histogram: Histogram,
}

/// Summarises `grades`.
///
/// * `grades`: final grades, in any order
/// * `range_constraint`: optional ceiling used to lay out the histogram
pub fn summarize(grades: &[f64], range_constraint: Option<f64>) -> Result<Summary, StatsError> {
    if grades.is_empty() {
        return Err(StatsError::NoGrades);
    }
    if let Some(range) = range_constraint
        && !(range.is_finite() && range > 0.0)
    {
        return Err(StatsError::InvalidRange(range));
    }
    if let Some(&bad) = grades.iter().find(|g| !g.is_finite()) {
        return Err(StatsError::NonFiniteGrade(bad));
    }

    let count = grades.len();
    let n = count as f64;
    let mean = grades.iter().sum::<f64>() / n;
    let variance = grades.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;

    let mut sorted = grades.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if count % 2 == 1 {
        sorted[count / 2]
    } else {
        (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
    };

    let edges = Histogram::edges_for(grades, range_constraint)?;
    Ok(Summary {
        count,
        mean,
        median,
        stddev: variance.sqrt(),
        min: sorted[0],
        max: sorted[count - 1],
        histogram: Histogram::count(grades, edges),
    })
}
