use std::{fs, path::PathBuf};

use gradetally::{FormatPolicy, GradingConfig, grade_files, report};
use uuid::Uuid;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("gradetally-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

#[test]
fn grades_fixture_against_tsv_table() {
    let grading = grade_files(
        &fixture("grading.txt"),
        &fixture("errorcodes.tsv"),
        &GradingConfig::default(),
    )
    .expect("grade fixture");
    let report = &grading.report;

    assert_eq!(report.grades(), vec![85.0, 15.0, 105.5, -20.0]);
    assert_eq!(report.get("bob").unwrap().unresolved_comments, vec!["TYPO"]);
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.below_zero, vec!["dave"]);
    assert_eq!(report.above_ceiling, vec!["carol"]);

    let summary = grading.summary.expect("summary");
    assert_eq!(summary.count, 4);
    assert_eq!(summary.median, 50.0);
}

#[test]
fn range_constraint_flows_into_report_and_histogram() {
    let config = GradingConfig::builder().range_constraint(80.0).build();
    let grading = grade_files(&fixture("grading.txt"), &fixture("errorcodes.tsv"), &config)
        .expect("grade fixture");

    assert_eq!(grading.report.above_ceiling, vec!["alice", "carol"]);
    let histogram = grading.summary.expect("summary").histogram;
    assert_eq!(histogram.edges.len(), 11);
    assert_eq!(histogram.edges[10], 80.0);
}

#[test]
fn csv_table_leaves_its_missing_codes_unresolved() {
    // the csv fixture has no STYLE or BONUS rows
    let grading = grade_files(
        &fixture("grading.txt"),
        &fixture("errorcodes.csv"),
        &GradingConfig::default(),
    )
    .expect("grade fixture");

    assert_eq!(grading.report.get("alice").unwrap().unresolved_comments, vec!["STYLE"]);
    assert_eq!(grading.report.get("carol").unwrap().final_grade, 102.5);
    assert_eq!(grading.report.unresolved.len(), 3);
}

#[test]
fn division_by_unknown_base_code_fails_the_run() {
    let root = temp_root();
    let annotations = root.join("grading.txt");
    fs::write(&annotations, "erin:\n\tMISSING(max/2)\n").expect("write annotations");

    let err = grade_files(&annotations, &fixture("errorcodes.tsv"), &GradingConfig::default())
        .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("erin"), "{message}");
    assert!(message.contains("MISSING(max/2)"), "{message}");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn xlsx_table_grades_like_the_tsv_one() {
    let grading = grade_files(
        &fixture("grading.txt"),
        &fixture("errorcodes.xlsx"),
        &GradingConfig::default(),
    )
    .expect("grade fixture");

    assert_eq!(grading.report.grades(), vec![85.0, 15.0, 105.5, -20.0]);
}

#[test]
fn far_negative_override_is_an_error_not_a_crash() {
    let root = temp_root();
    let annotations = root.join("grading.txt");
    fs::write(&annotations, "erin:\n\tLATE(-1e12)\n").expect("write annotations");

    let err = grade_files(&annotations, &fixture("errorcodes.tsv"), &GradingConfig::default())
        .unwrap_err();
    assert!(format!("{err:#}").contains("histogram bins"), "{err:#}");

    let _ = fs::remove_dir_all(root);
}

#[test]
fn unsupported_table_extension_fails_before_grading() {
    let err = grade_files(
        &fixture("grading.txt"),
        &fixture("errorcodes.txt"),
        &GradingConfig::default(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("Unsupported"));

    let config = GradingConfig::builder()
        .format_policy(FormatPolicy::TabFallback)
        .build();
    assert!(grade_files(&fixture("grading.txt"), &fixture("errorcodes.txt"), &config).is_ok());
}

#[test]
fn empty_annotation_file_has_no_summary() {
    let root = temp_root();
    let annotations = root.join("empty.txt");
    fs::write(&annotations, "\n\n").expect("write annotations");

    let grading = grade_files(&annotations, &fixture("errorcodes.tsv"), &GradingConfig::default())
        .expect("grade empty file");
    assert!(grading.report.results.is_empty());
    assert!(grading.summary.is_none());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn non_utf8_annotations_are_read_lossily() {
    let root = temp_root();
    let annotations = root.join("latin1.txt");
    fs::write(&annotations, b"jos\xe9:\n\tLATE\n").expect("write annotations");

    let grading = grade_files(&annotations, &fixture("errorcodes.tsv"), &GradingConfig::default())
        .expect("grade latin-1 file");
    assert_eq!(grading.report.grades(), vec![90.0]);
    assert!(grading.report.results[0].entity_id.starts_with("jos"));

    let _ = fs::remove_dir_all(root);
}

#[test]
fn rendered_report_mentions_every_entity_and_flag() {
    let grading = grade_files(
        &fixture("grading.txt"),
        &fixture("errorcodes.tsv"),
        &GradingConfig::default(),
    )
    .expect("grade fixture");

    let table = report::grades_table(&grading.report);
    for id in ["alice", "bob", "carol", "dave"] {
        assert!(table.contains(id), "{table}");
    }
    assert!(table.contains("105.50"));

    let diagnostics = report::diagnostics(&grading.report).expect("diagnostics");
    assert!(diagnostics.contains("TYPO"));
    assert!(diagnostics.contains("dave"));
    assert!(diagnostics.contains("carol"));

    let summary = report::summary(grading.summary.as_ref().unwrap());
    assert!(summary.contains("Mean: 46.3"), "{summary}");
    assert!(summary.contains("Median: 50.00"));
    assert!(summary.contains("1 outside the histogram range"));
}
