#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use super::TableError;

peg::parser! {
    /// grammar for one line of a delimiter-separated error-code table.
    pub grammar delimited(sep: char) for str {
        /// a doubled quote inside a quoted field stands for one quote
        rule escaped_quote() -> char
            = "\"\"" { '"' }

        /// any character of a quoted field other than a quote
        rule quoted_char() -> char
            = c:[^ '"'] { c }

        /// a field wrapped in double quotes, may contain the separator
        rule quoted() -> String
            = [' ']* "\"" s:(escaped_quote() / quoted_char())* "\"" [' ']*
            { s.into_iter().collect() }

        /// a field that does not open with a quote, runs until the next
        /// separator and may contain quotes anywhere after its first character
        rule bare() -> String
            = !([' ']* "\"") s:$([c if c != sep]*)
            { s.to_string() }

        /// one field, quoted or not
        rule field() -> String
            = quoted() / bare()

        /// matches the separator this grammar was instantiated with
        rule separator()
            = [c if c == sep]

        /// parses one row into its fields, keeping empty ones
        pub rule row() -> Vec<String>
            = fields:(field() ** separator())
            { fields }
    }
}

/// Splits `text` into rows of fields separated by `sep`.
///
/// Blank lines are skipped and a trailing `\r` on each line is dropped.
///
/// * `table`: name of the table, used in error messages
pub fn split_rows(text: &str, sep: char, table: &str) -> Result<Vec<Vec<String>>, TableError> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(line, text)| {
            delimited::row(text, sep).map_err(|e| TableError::MalformedRow {
                table: table.to_string(),
                line,
                reason: e.to_string(),
            })
        })
        .collect()
}
