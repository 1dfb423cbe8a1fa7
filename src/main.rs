#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # gradetally
//!
//! Grades an annotation file against an error-code table and prints the
//! grades, anything that needs attention, and the grade distribution.
//!
//! Defaults can be set with `GRADETALLY_DEFAULT_GRADE`, `GRADETALLY_RANGE`
//! and `GRADETALLY_TAB_FALLBACK`, in the environment or a `.env` file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use gradetally::{ErrorCodeTable, FormatPolicy, GradingConfig, grade_files, report};
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Options of the `grade` command.
#[derive(Debug, Clone)]
struct GradeOpts {
    /// Default grade override
    default_grade: Option<f64>,
    /// Range constraint override
    range:         Option<f64>,
    /// Read unknown table extensions as tsv
    tab_fallback:  bool,
    /// Print JSON instead of tables
    json:          bool,
    /// Annotation file
    annotations:   PathBuf,
    /// Error-code table
    codes:         PathBuf,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Grade an annotation file
    Grade(GradeOpts),
    /// Print an error-code table
    Codes(bool, PathBuf),
}

/// Parse the command line arguments and return the verbosity and a `Cmd`
fn options() -> (bool, Cmd) {
    /// parses the tab-separated fallback switch
    fn fallback() -> impl Parser<bool> {
        long("tab-fallback")
            .help("Read error-code tables with unknown extensions as tab-separated")
            .switch()
    }

    /// parses the error-code table path
    fn table_path() -> impl Parser<PathBuf> {
        positional("CODES").help("Error-code table (.tsv, .csv, .xls or .xlsx)")
    }

    let default_grade = long("default-grade")
        .help("Grade every entity starts from (default 100)")
        .argument::<f64>("GRADE")
        .optional();
    let range = long("range")
        .help("Ceiling replacing 100 for range checks and histogram bins")
        .argument::<f64>("MAX")
        .optional();
    let tab_fallback = fallback();
    let json = long("json")
        .help("Print the report and summary as JSON")
        .switch();
    let annotations = positional::<PathBuf>("ANNOTATIONS").help("Manual grading file");
    let codes = table_path();

    let grade_cmd = construct!(GradeOpts {
        default_grade,
        range,
        tab_fallback,
        json,
        annotations,
        codes,
    })
    .map(Cmd::Grade)
    .to_options()
    .command("grade")
    .help("Grade an annotation file against an error-code table");

    let codes_cmd = construct!(Cmd::Codes(fallback(), table_path()))
        .to_options()
        .command("codes")
        .help("Print the contents of an error-code table");

    let verbose = short('v')
        .long("verbose")
        .help("Show debug logs")
        .switch();
    let cmd = construct!([grade_cmd, codes_cmd]);

    construct!(verbose, cmd)
        .to_options()
        .descr("Turns grading annotations into grades")
        .run()
}

/// Applies command line overrides on top of the environment configuration.
fn config_for(opts: &GradeOpts) -> Result<GradingConfig> {
    let mut config = GradingConfig::from_env().context("Invalid GRADETALLY_* setting")?;
    if let Some(default_grade) = opts.default_grade {
        config.default_grade = default_grade;
    }
    if opts.range.is_some() {
        config.range_constraint = opts.range;
    }
    if opts.tab_fallback {
        config.format_policy = FormatPolicy::TabFallback;
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    dotenv().ok();

    let (verbose, cmd) = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let filter_layer = LevelFilter::from_level(if verbose { Level::DEBUG } else { Level::INFO });
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match cmd {
        Cmd::Grade(opts) => {
            let config = config_for(&opts)?;
            let grading = grade_files(&opts.annotations, &opts.codes, &config)?;

            if opts.json {
                println!("{}", serde_json::to_string_pretty(&grading)?);
                return Ok(());
            }

            println!("{}", report::grades_table(&grading.report));
            if let Some(diagnostics) = report::diagnostics(&grading.report) {
                println!("\n{diagnostics}");
            }
            match &grading.summary {
                Some(summary) => println!("\n{}", report::summary(summary)),
                None => eprintln!("No entities found in {}", opts.annotations.display()),
            }
        }
        Cmd::Codes(tab_fallback, path) => {
            let policy = if tab_fallback {
                FormatPolicy::TabFallback
            } else {
                GradingConfig::from_env()?.format_policy
            };
            let table = ErrorCodeTable::load(&path, policy)
                .with_context(|| format!("Could not load error codes from {}", path.display()))?;
            println!("{}", report::codes_table(&table));
        }
    };

    Ok(())
}
