use clap::{Parser, ValueEnum};
use srcmerge::consolidate::{DEFAULT_EXTENSION_FILTER, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_FILE};
use srcmerge::{
    CombineConfig, CombineOutcome, CombineReport, Progress, Result, combine_with_progress,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const NO_MATCH_WARNING: &str = "WARNING: No files found matching the criteria. Nothing to combine.";

const LONG_HELP: &str = r#"
Output layout:
  ############################################################
  # Consolidated Data File generated from <N> sources in '<DIR>'.
  ############################################################


  # --- START FILE: <name> (Path: <DIR>/<name>) ---
  <trimmed file content>
  # --- END FILE: <name> ---

Examples:
  # Consolidate ./rdip/*.json into combined_ontology_data.txt
  srcmerge
  # Pick another directory and extension
  srcmerge --input-dir ontologies --extension .jsonld
  # Include every regular file
  srcmerge --input-dir notes --all -o notes.txt
  # Machine-readable summary
  srcmerge --report json

Unreadable files are reported on stderr and left out of the output.
"#;

/// Consolidate a directory's files into one delimited text file.
#[derive(Parser, Debug)]
#[command(
    name = "srcmerge",
    version,
    about = "Consolidate a directory's files into one delimited text file.",
    after_long_help = LONG_HELP
)]
struct Cli {
    /// Directory whose files are consolidated (not recursive)
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "SRCMERGE_INPUT_DIR",
        default_value = DEFAULT_INPUT_DIR
    )]
    input_dir: PathBuf,

    /// Case-insensitive file name suffix to select. An empty value selects every file.
    #[arg(
        short,
        long,
        value_name = "EXT",
        env = "SRCMERGE_EXTENSION",
        default_value = DEFAULT_EXTENSION_FILTER
    )]
    extension: String,

    /// Select every regular file regardless of extension
    #[arg(long, conflicts_with = "extension")]
    all: bool,

    /// Output file, overwritten on every run
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "SRCMERGE_OUTPUT",
        default_value = DEFAULT_OUTPUT_FILE
    )]
    output: PathBuf,

    /// End-of-run summary format
    #[arg(long, value_enum, default_value = "plain")]
    report: ReportFormat,

    /// Increase verbosity (can be used multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq)]
enum ReportFormat {
    /// Human-readable progress and summary
    Plain,
    /// JSON summary on stdout, no progress lines
    Json,
}

impl Cli {
    fn to_config(&self) -> CombineConfig {
        let filter = (!self.all).then(|| self.extension.clone());
        CombineConfig::new(&self.input_dir, &self.output).with_extension_filter(filter)
    }

    fn show_progress(&self) -> bool {
        !self.quiet && self.report == ReportFormat::Plain
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("srcmerge={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.to_config();
    let show = cli.show_progress();

    if show {
        println!(
            "Starting consolidation process in directory: '{}'",
            config.input_dir.display()
        );
        println!("Output target: {}", config.output_file.display());
    }

    let outcome = combine_with_progress(&config, |event| {
        // Console write failures are not worth aborting the run over
        let _ = report_progress(&event, show, &mut io::stdout(), &mut io::stderr());
    })?;

    if outcome == CombineOutcome::NoMatchingFiles && !cli.quiet {
        eprintln!("{NO_MATCH_WARNING}");
    }

    match (cli.report, &outcome) {
        (ReportFormat::Json, _) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        (ReportFormat::Plain, CombineOutcome::Written(report)) if !cli.quiet => {
            print_summary(report);
        }
        (ReportFormat::Plain, _) => {}
    }

    io::stdout().flush()?;
    Ok(())
}

/// Writes one progress event. Skipped files always reach `err`; the rest only when `show` is set.
fn report_progress<O: Write, E: Write>(
    event: &Progress<'_>,
    show: bool,
    out: &mut O,
    err: &mut E,
) -> io::Result<()> {
    match event {
        Progress::Skipped { error, .. } => writeln!(err, "ERROR: {error}"),
        _ if !show => Ok(()),
        Progress::Discovered {
            count,
            filter: Some(ext),
        } => writeln!(out, "Filtering by extension: {ext}. Found {count} file(s)."),
        Progress::Discovered {
            count,
            filter: None,
        } => writeln!(out, "No extension filter applied. Found {count} file(s)."),
        Progress::Processing(file) => writeln!(out, "-> Processing: {}", file.name),
    }
}

fn print_summary(report: &CombineReport) {
    println!(
        "\nSuccessfully combined {} of {} file(s) into '{}'.",
        report.written.len(),
        report.discovered,
        report.output_file.display()
    );
    if !report.skipped.is_empty() {
        let names: Vec<&str> = report.skipped.iter().map(|s| s.name.as_str()).collect();
        println!(
            "Skipped {} unreadable file(s): {}",
            report.skipped.len(),
            names.join(", ")
        );
    }
}
