#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::codes::ErrorCodeTable;

/// Errors that stop a comment from being resolved at all.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ResolveError {
    /// A `CODE(max/n)` override names a code the table does not have.
    #[error("`{comment}` divides the penalty of `{code}`, which is not in the error-code table")]
    MissingBaseCode {
        /// code in front of the parenthesis
        code:    String,
        /// the whole comment
        comment: String,
    },
    /// The text inside the parenthesis is not a usable number.
    #[error("Cannot apply the override in `{comment}`: {reason}")]
    InvalidOverride {
        /// the whole comment
        comment: String,
        /// what is wrong with it
        reason:  String,
    },
}

/// How a comment turned into a grade adjustment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyOutcome {
    /// The comment is an error code; carries the code's penalty.
    Matched(f64),
    /// The comment carried its own `(n)` or `(max/n)` override.
    Overridden(f64),
    /// Neither a code nor an override; carries the raw comment.
    Unknown(String),
}

impl PenaltyOutcome {
    /// The number to add to the grade.
    pub fn delta(&self) -> f64 {
        match self {
            PenaltyOutcome::Matched(d) | PenaltyOutcome::Overridden(d) => *d,
            PenaltyOutcome::Unknown(_) => 0.0,
        }
    }

    /// Whether the comment was left unresolved.
    pub fn is_unknown(&self) -> bool {
        matches!(self, PenaltyOutcome::Unknown(_))
    }
}

impl fmt::Display for PenaltyOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyOutcome::Matched(d) => write!(f, "matched ({d:+})"),
            PenaltyOutcome::Overridden(d) => write!(f, "overridden ({d:+})"),
            PenaltyOutcome::Unknown(c) => write!(f, "unknown `{c}`"),
        }
    }
}

/// Parses an override number, naming `what` it was in the error.
fn parse_number(text: &str, comment: &str, what: &str) -> Result<f64, ResolveError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| ResolveError::InvalidOverride {
            comment: comment.to_string(),
            reason:  format!("{what} `{}` is not a number", text.trim()),
        })
}

/// Resolves one comment against the table.
///
/// An exact table match always wins. Otherwise a comment ending in `)` is an
/// override: `CODE(n)` adds `n` as is, `CODE(max/n)` adds the penalty of
/// `CODE` divided by `n`. Anything else is `Unknown` and adds nothing.
pub fn resolve(comment: &str, table: &ErrorCodeTable) -> Result<PenaltyOutcome, ResolveError> {
    if let Some(penalty) = table.lookup(comment) {
        return Ok(PenaltyOutcome::Matched(penalty.delta()));
    }

    let open = match comment.find('(') {
        Some(open) if comment.ends_with(')') => open,
        _ => return Ok(PenaltyOutcome::Unknown(comment.to_string())),
    };
    let base = comment[..open].trim_end();
    let expr = &comment[open + 1..comment.len() - 1];

    let delta = match expr.split_once('/') {
        Some((_, divisor)) => {
            let penalty = table
                .lookup(base)
                .ok_or_else(|| ResolveError::MissingBaseCode {
                    code:    base.to_string(),
                    comment: comment.to_string(),
                })?;
            let divisor = parse_number(divisor, comment, "divisor")?;
            if divisor == 0.0 {
                return Err(ResolveError::InvalidOverride {
                    comment: comment.to_string(),
                    reason:  "divisor is zero".into(),
                });
            }
            penalty.delta() / divisor
        }
        None => parse_number(expr, comment, "override")?,
    };

    Ok(PenaltyOutcome::Overridden(delta))
}
