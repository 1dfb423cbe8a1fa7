#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Grammar for delimiter-separated table rows.
pub mod parsers;
/// Reading error-code tables out of spreadsheet workbooks.
mod spreadsheet;

use std::{collections::BTreeMap, fmt, path::Path};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::{config::FormatPolicy, constants::ERROR_CODE_HEADER};

/// Errors raised while loading an error-code table.
#[derive(thiserror::Error, Debug)]
pub enum TableError {
    /// The file extension does not name a supported table format.
    #[error("Unsupported error-code table format: `{table}` (expected .tsv, .csv, .xls or .xlsx)")]
    UnsupportedFormat {
        /// name of the offending table
        table: String,
    },
    /// No column is headed `Error Code`.
    #[error("`{table}` has no `Error Code` column")]
    MissingCodeColumn {
        /// name of the offending table
        table: String,
    },
    /// Only the code column is present.
    #[error("`{table}` has no penalty column next to `Error Code`")]
    MissingPenaltyColumn {
        /// name of the offending table
        table: String,
    },
    /// The table has no header row at all.
    #[error("`{table}` is empty")]
    Empty {
        /// name of the offending table
        table: String,
    },
    /// A penalty cell holds something other than a number.
    #[error("`{table}`: penalty `{value}` for error code `{code}` is not a number")]
    InvalidPenalty {
        /// name of the offending table
        table: String,
        /// code whose penalty could not be read
        code:  String,
        /// raw cell contents
        value: String,
    },
    /// A delimited row could not be split into fields.
    #[error("`{table}` line {line}: {reason}")]
    MalformedRow {
        /// name of the offending table
        table:  String,
        /// 1-based line number
        line:   usize,
        /// parser message
        reason: String,
    },
    /// The workbook could not be opened or read.
    #[error("Could not read spreadsheet `{table}`: {reason}")]
    Spreadsheet {
        /// name of the offending table
        table:  String,
        /// reader message
        reason: String,
    },
    /// The table file could not be read.
    #[error("Could not read `{table}`")]
    Io {
        /// name of the offending table
        table:  String,
        /// underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Layout of an error-code table on disk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableFormat {
    /// Tab-separated text.
    Tsv,
    /// Comma-separated text.
    Csv,
    /// An `.xls`/`.xlsx` (or other calamine-readable) workbook.
    Spreadsheet,
}

impl TableFormat {
    /// Picks a format from the extension of `name`.
    ///
    /// * `name`: a file name or path
    /// * `policy`: whether unknown extensions fail or fall back to tsv
    pub fn from_name(name: &str, policy: FormatPolicy) -> Result<Self, TableError> {
        let extension = Path::new(name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());

        match extension.as_deref() {
            Some("tsv") => Ok(TableFormat::Tsv),
            Some("csv") => Ok(TableFormat::Csv),
            Some("xls" | "xlsx" | "xlsm" | "xlsb" | "ods") => Ok(TableFormat::Spreadsheet),
            _ => match policy {
                FormatPolicy::Strict => Err(TableError::UnsupportedFormat {
                    table: name.to_string(),
                }),
                FormatPolicy::TabFallback => {
                    tracing::debug!("Reading `{name}` as tab-separated");
                    Ok(TableFormat::Tsv)
                }
            },
        }
    }

    /// Field separator for the delimited formats.
    pub fn separator(self) -> Option<char> {
        match self {
            TableFormat::Tsv => Some('\t'),
            TableFormat::Csv => Some(','),
            TableFormat::Spreadsheet => None,
        }
    }
}

/// Point adjustment attached to an error code.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Penalty {
    /// A signed number of points.
    Points(f64),
    /// The cell was blank; applying the code changes nothing.
    NoEffect,
}

impl Penalty {
    /// Reads a penalty cell. `None` means the text is not a number.
    pub fn from_cell(cell: &str) -> Option<Self> {
        let cell = cell.trim();
        if cell.is_empty() {
            return Some(Penalty::NoEffect);
        }
        match cell.parse::<f64>() {
            Ok(v) if v.is_nan() => Some(Penalty::NoEffect),
            Ok(v) => Some(Penalty::Points(v)),
            Err(_) => None,
        }
    }

    /// The number this penalty adds to a grade.
    pub fn delta(self) -> f64 {
        match self {
            Penalty::Points(v) => v,
            Penalty::NoEffect => 0.0,
        }
    }
}

impl fmt::Display for Penalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Penalty::Points(v) => write!(f, "{v}"),
            Penalty::NoEffect => f.write_str("-"),
        }
    }
}

#[derive(Tabled, Clone, Debug, PartialEq, Serialize, Deserialize)]
/// One row of an error-code table.
pub struct ErrorCodeEntry {
    #[tabled(rename = "Error Code")]
    /// * `code`: the annotation text that selects this entry
    pub code:    String,
    #[tabled(rename = "Penalty")]
    /// * `penalty`: what the code adds to a grade
    pub penalty: Penalty,
}

/// Lookup from error code to penalty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorCodeTable {
    /// entries keyed by their exact, case-sensitive code
    entries: BTreeMap<String, Penalty>,
}

impl ErrorCodeTable {
    /// Loads a table from a file, choosing the reader from its extension.
    ///
    /// * `path`: the table file
    /// * `policy`: handling of unknown extensions
    pub fn load(path: &Path, policy: FormatPolicy) -> Result<Self, TableError> {
        let name = path.display().to_string();
        let format = TableFormat::from_name(&name, policy)?;
        tracing::debug!("Loading error codes from `{name}` as {format:?}");

        match format.separator() {
            Some(sep) => {
                let text = std::fs::read_to_string(path).map_err(|source| TableError::Io {
                    table: name.clone(),
                    source,
                })?;
                Self::from_delimited(&text, sep, &name)
            }
            None => Self::from_spreadsheet(path),
        }
    }

    /// Builds a table from delimited text.
    ///
    /// * `text`: the whole table, header row first
    /// * `sep`: field separator
    /// * `table`: name used in error messages
    pub fn from_delimited(text: &str, sep: char, table: &str) -> Result<Self, TableError> {
        let rows = parsers::split_rows(text, sep, table)?;
        Self::from_rows(rows, table)
    }

    /// Builds a table from the first worksheet of a workbook.
    pub fn from_spreadsheet(path: &Path) -> Result<Self, TableError> {
        let rows = spreadsheet::read_rows(path)?;
        Self::from_rows(rows, &path.display().to_string())
    }

    /// Builds a table from text cells, header row first.
    ///
    /// The `Error Code` column may sit anywhere in the header; the first other
    /// column holds the penalty and any further columns are ignored.
    pub fn from_rows<I>(rows: I, table: &str) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let mut rows = rows.into_iter();
        let header = rows.next().ok_or_else(|| TableError::Empty {
            table: table.to_string(),
        })?;

        let code_col = header
            .iter()
            .position(|h| h.trim() == ERROR_CODE_HEADER)
            .ok_or_else(|| TableError::MissingCodeColumn {
                table: table.to_string(),
            })?;
        let penalty_col = (0..header.len())
            .find(|&i| i != code_col)
            .ok_or_else(|| TableError::MissingPenaltyColumn {
                table: table.to_string(),
            })?;

        let mut entries = BTreeMap::new();
        for row in rows {
            let code = match row.get(code_col).map(|c| c.trim()) {
                Some(code) if !code.is_empty() => code.to_string(),
                _ => continue,
            };
            let cell = row.get(penalty_col).map(String::as_str).unwrap_or("");
            let penalty = Penalty::from_cell(cell).ok_or_else(|| TableError::InvalidPenalty {
                table: table.to_string(),
                code:  code.clone(),
                value: cell.to_string(),
            })?;

            if let Some(previous) = entries.insert(code.clone(), penalty) {
                tracing::debug!(
                    "`{table}`: error code `{code}` appears more than once, {previous} replaced by \
                     {penalty}"
                );
            }
        }

        tracing::debug!("Loaded {} error codes from `{table}`", entries.len());
        Ok(Self { entries })
    }

    /// Penalty for `code`, if the table has it.
    pub fn lookup(&self, code: &str) -> Option<Penalty> {
        self.entries.get(code).copied()
    }

    /// Whether `code` is a key of the table.
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code)
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = ErrorCodeEntry> + '_ {
        self.entries.iter().map(|(code, penalty)| ErrorCodeEntry {
            code:    code.clone(),
            penalty: *penalty,
        })
    }
}

impl FromIterator<(String, Penalty)> for ErrorCodeTable {
    fn from_iter<T: IntoIterator<Item = (String, Penalty)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
