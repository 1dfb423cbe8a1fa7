#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use serde::{Deserialize, Serialize};

use crate::constants::{BLOCK_SEPARATOR, COMMENT_SEPARATOR, NOTE_OPENER};

/// Errors raised while splitting annotation text into records.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// A block has no usable `<id>:` header, either because it opens with a
    /// comment line or because the id is blank.
    #[error("Entity block {index} has no usable `<id>:` header:\n{block}")]
    MalformedBlock {
        /// 0-based position of the block among non-blank blocks
        index: usize,
        /// the block as it appeared in the input
        block: String,
    },
}

/// One graded entity and the annotations written about it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradingRecord {
    /// Identity of the graded subject, e.g. a student login.
    pub entity_id: String,
    /// Annotations in document order.
    pub comments:  Vec<String>,
    /// Running grade, starts at the default grade.
    pub grade:     f64,
}

impl GradingRecord {
    /// Creates a record with no comments.
    pub fn new(entity_id: impl Into<String>, grade: f64) -> Self {
        Self {
            entity_id: entity_id.into(),
            comments: Vec::new(),
            grade,
        }
    }

    /// Adds `comment` after the existing ones.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comments.push(comment.into());
        self
    }
}

/// Turns one comment line into a gradable annotation.
///
/// Lines that are empty or open with `{` are notes and yield `None`. Anything
/// from the first `{` onwards is dropped, and so is a line that is blank once
/// that is done.
pub fn clean_comment(segment: &str) -> Option<String> {
    if segment.is_empty() || segment.starts_with(NOTE_OPENER) {
        return None;
    }

    let comment = match segment.find(NOTE_OPENER) {
        Some(i) => &segment[..i],
        None => segment,
    }
    .trim();

    (!comment.is_empty()).then(|| comment.to_string())
}

/// Splits annotation text into one record per entity.
///
/// Entities are separated by a blank line. Each block starts with an
/// `<id>:` header, and every line that follows a newline-tab is a comment.
///
/// * `raw`: the whole annotation file
/// * `default_grade`: grade each record starts at
pub fn parse(raw: &str, default_grade: f64) -> Result<Vec<GradingRecord>, RecordError> {
    let text = raw.replace("\r\n", "\n");

    text.split(BLOCK_SEPARATOR)
        .map(|block| block.trim_start_matches('\n'))
        .filter(|block| !block.trim().is_empty())
        .enumerate()
        .map(|(index, block)| parse_block(index, block, default_grade))
        .collect()
}

/// Parses a single entity block.
fn parse_block(
    index: usize,
    block: &str,
    default_grade: f64,
) -> Result<GradingRecord, RecordError> {
    let mut segments = block.split(COMMENT_SEPARATOR);
    let malformed = || RecordError::MalformedBlock {
        index,
        block: block.to_string(),
    };

    let header = segments
        .next()
        .filter(|h| !h.is_empty() && !h.starts_with('\t'))
        .ok_or_else(malformed)?;
    let mut id = header.chars();
    id.next_back();
    let entity_id = id.as_str();
    if entity_id.trim().is_empty() {
        return Err(malformed());
    }

    Ok(GradingRecord {
        entity_id: entity_id.to_string(),
        comments:  segments.filter_map(clean_comment).collect(),
        grade:     default_grade,
    })
}
