#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use tabled::Tabled;
use typed_builder::TypedBuilder;

#[derive(Tabled, Clone, Debug, PartialEq, TypedBuilder, Serialize, Deserialize)]
#[builder(field_defaults(setter(into)))]
#[builder(doc)]
/// A comment that matched no error code and carried no override
pub struct UnresolvedComment {
    #[tabled(rename = "Entity")]
    /// * `entity_id`: the entity the comment was written about
    pub entity_id: String,
    #[tabled(rename = "Comment")]
    /// * `comment`: the comment as it appeared after cleaning
    pub comment:   String,
}

impl Display for UnresolvedComment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: `{}`", self.entity_id, self.comment)
    }
}

#[derive(Clone, Debug, PartialEq, TypedBuilder, Serialize, Deserialize)]
#[builder(doc)]
/// Final grade of one entity
pub struct GradeResult {
    /// * `entity_id`: the graded entity
    #[builder(setter(into))]
    pub entity_id:           String,
    /// * `final_grade`: default grade plus every resolved delta, never clamped
    pub final_grade:         f64,
    /// * `unresolved_comments`: comments that contributed nothing, in order
    #[builder(default)]
    pub unresolved_comments: Vec<String>,
}

impl GradeResult {
    /// Whether any comment of this entity went unresolved.
    pub fn has_unresolved(&self) -> bool {
        !self.unresolved_comments.is_empty()
    }
}

/// Everything one grading run produces
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    /// Per-entity results in input order.
    pub results:       Vec<GradeResult>,
    /// Every unresolved comment across all entities, in the order found.
    pub unresolved:    Vec<UnresolvedComment>,
    /// Entities that ended below zero.
    pub below_zero:    Vec<String>,
    /// Entities that ended above the ceiling.
    pub above_ceiling: Vec<String>,
    /// Ceiling that `above_ceiling` was checked against.
    pub ceiling:       f64,
}

impl GradeReport {
    /// Final grades in input order.
    pub fn grades(&self) -> Vec<f64> {
        self.results.iter().map(|r| r.final_grade).collect()
    }

    /// Result for `entity_id`, if it was graded.
    pub fn get(&self, entity_id: &str) -> Option<&GradeResult> {
        self.results.iter().find(|r| r.entity_id == entity_id)
    }

    /// Whether any grade fell outside `0..=ceiling`.
    pub fn has_range_violations(&self) -> bool {
        !self.below_zero.is_empty() || !self.above_ceiling.is_empty()
    }
}
