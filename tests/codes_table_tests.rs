use std::path::{Path, PathBuf};

use gradetally::{
    ErrorCodeTable, FormatPolicy, Penalty, TableError, TableFormat, codes::parsers::delimited,
    load_table,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

#[test]
fn detects_format_from_extension() {
    let strict = FormatPolicy::Strict;
    assert_eq!(TableFormat::from_name("codes.tsv", strict).unwrap(), TableFormat::Tsv);
    assert_eq!(TableFormat::from_name("dir/codes.CSV", strict).unwrap(), TableFormat::Csv);
    assert_eq!(TableFormat::from_name("codes.xls", strict).unwrap(), TableFormat::Spreadsheet);
    assert_eq!(TableFormat::from_name("codes.xlsx", strict).unwrap(), TableFormat::Spreadsheet);
}

#[test]
fn unknown_extension_fails_fast_by_default() {
    let err = TableFormat::from_name("codes.txt", FormatPolicy::Strict).unwrap_err();
    assert!(matches!(err, TableError::UnsupportedFormat { ref table } if table == "codes.txt"));
    assert!(TableFormat::from_name("codes", FormatPolicy::Strict).is_err());
}

#[test]
fn unknown_extension_falls_back_to_tsv_when_asked() {
    let format = TableFormat::from_name("codes.txt", FormatPolicy::TabFallback).unwrap();
    assert_eq!(format, TableFormat::Tsv);
}

#[test]
fn loads_tsv_fixture() {
    let table = load_table(&fixture("errorcodes.tsv")).expect("load tsv");

    assert_eq!(table.len(), 5);
    assert_eq!(table.lookup("LATE"), Some(Penalty::Points(-10.0)));
    assert_eq!(table.lookup("BONUS"), Some(Penalty::Points(3.0)));
    assert_eq!(table.lookup("STYLE"), Some(Penalty::NoEffect));
    assert!(table.contains("CRASH"));
    assert!(!table.contains("late"));
    assert_eq!(table.lookup("MISSING"), None);
}

#[test]
fn loads_csv_fixture_with_code_column_anywhere() {
    let table = load_table(&fixture("errorcodes.csv")).expect("load csv");

    assert_eq!(table.len(), 4);
    assert_eq!(table.lookup("LATE"), Some(Penalty::Points(-10.0)));
    assert_eq!(table.lookup("SEE_ME"), Some(Penalty::NoEffect));
}

#[test]
fn loads_xlsx_fixture() {
    let table = load_table(&fixture("errorcodes.xlsx")).expect("load xlsx");

    // only the first worksheet is read
    assert_eq!(table.len(), 5);
    assert!(!table.contains("IGNORED"));
    assert_eq!(table.lookup("LATE"), Some(Penalty::Points(-10.0)));
    assert_eq!(table.lookup("NO_DOCS"), Some(Penalty::Points(-5.0)));
    assert_eq!(table.lookup("BONUS"), Some(Penalty::Points(3.0)));
    assert_eq!(table.lookup("STYLE"), Some(Penalty::NoEffect));
    assert!(table.contains("CRASH"));
    assert_eq!(table.lookup("MISSING"), None);
}

#[test]
fn quotes_inside_unquoted_fields_are_kept() {
    let tsv = "Error Code\tPoints\tDescription\nNO_DOCS\t-5\tMissing \"javadoc\" comments\n";
    let table = ErrorCodeTable::from_delimited(tsv, '\t', "codes.tsv").expect("load tsv");
    assert_eq!(table.lookup("NO_DOCS"), Some(Penalty::Points(-5.0)));

    let csv = "Error Code,Points,Description\nLATE,-10,5\" late\n";
    let table = ErrorCodeTable::from_delimited(csv, ',', "codes.csv").expect("load csv");
    assert_eq!(table.lookup("LATE"), Some(Penalty::Points(-10.0)));
}

#[test]
fn txt_table_needs_the_fallback() {
    let path = fixture("errorcodes.txt");
    assert!(matches!(load_table(&path), Err(TableError::UnsupportedFormat { .. })));

    let table = ErrorCodeTable::load(&path, FormatPolicy::TabFallback).expect("fallback load");
    assert_eq!(table.lookup("NO_DOCS"), Some(Penalty::Points(-5.0)));
}

#[test]
fn later_duplicates_overwrite_earlier_ones() {
    let text = "Error Code\tPoints\nLATE\t-10\nLATE\t-20\n";
    let table = ErrorCodeTable::from_delimited(text, '\t', "dupes.tsv").expect("load");

    assert_eq!(table.len(), 1);
    assert_eq!(table.lookup("LATE"), Some(Penalty::Points(-20.0)));
}

#[test]
fn short_rows_and_nan_cells_have_no_effect() {
    let text = "Error Code,Points,Notes\r\nA\r\nB,NaN,x\r\n\r\nC,-1.5,\r\n";
    let table = ErrorCodeTable::from_delimited(text, ',', "short.csv").expect("load");

    assert_eq!(table.lookup("A"), Some(Penalty::NoEffect));
    assert_eq!(table.lookup("B"), Some(Penalty::NoEffect));
    assert_eq!(table.lookup("C"), Some(Penalty::Points(-1.5)));
}

#[test]
fn rows_without_a_code_are_skipped() {
    let text = "Error Code,Points\n,-3\nA,-1\n";
    let table = ErrorCodeTable::from_delimited(text, ',', "blank.csv").expect("load");
    assert_eq!(table.len(), 1);
}

#[test]
fn rejects_missing_code_column() {
    let err = ErrorCodeTable::from_delimited("Code,Points\nA,-1\n", ',', "t.csv").unwrap_err();
    assert!(matches!(err, TableError::MissingCodeColumn { .. }));
}

#[test]
fn rejects_table_with_only_the_code_column() {
    let err = ErrorCodeTable::from_delimited("Error Code\nA\n", ',', "t.csv").unwrap_err();
    assert!(matches!(err, TableError::MissingPenaltyColumn { .. }));
}

#[test]
fn rejects_empty_table() {
    let err = ErrorCodeTable::from_delimited("\n\n", ',', "t.csv").unwrap_err();
    assert!(matches!(err, TableError::Empty { .. }));
}

#[test]
fn rejects_non_numeric_penalty() {
    let err = ErrorCodeTable::from_delimited("Error Code,Points\nLATE,lots\n", ',', "t.csv")
        .unwrap_err();

    match err {
        TableError::InvalidPenalty { table, code, value } => {
            assert_eq!(table, "t.csv");
            assert_eq!(code, "LATE");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_unterminated_quote() {
    let err = ErrorCodeTable::from_delimited("Error Code,Points\n\"LATE,-1\n", ',', "t.csv")
        .unwrap_err();
    assert!(matches!(err, TableError::MalformedRow { line: 2, .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_table(Path::new("does/not/exist.tsv")).unwrap_err();
    assert!(matches!(err, TableError::Io { .. }));
}

#[test]
fn unreadable_workbook_is_a_spreadsheet_error() {
    let err = load_table(&fixture("errorcodes.csv").with_extension("xlsx")).unwrap_err();
    assert!(matches!(err, TableError::Spreadsheet { .. }));
}

#[test]
fn row_grammar_handles_quotes_and_empty_fields() {
    assert_eq!(delimited::row("a,,\"b,c\"", ',').unwrap(), vec!["a", "", "b,c"]);
    assert_eq!(delimited::row("\"say \"\"hi\"\"\"", ',').unwrap(), vec!["say \"hi\""]);
    assert_eq!(delimited::row("a\tb c", '\t').unwrap(), vec!["a", "b c"]);
    assert_eq!(delimited::row("a,say \"hi\"", ',').unwrap(), vec!["a", "say \"hi\""]);
    assert_eq!(delimited::row("a,5\" late", ',').unwrap(), vec!["a", "5\" late"]);
}
