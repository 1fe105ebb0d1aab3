use crate::error::{Result, SrcmergeError};
use crate::fs_utils::{SourceFile, list_source_files, read_file_contents};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default input directory
pub const DEFAULT_INPUT_DIR: &str = "rdip";
/// Default extension filter
pub const DEFAULT_EXTENSION_FILTER: &str = ".json";
/// Default output file
pub const DEFAULT_OUTPUT_FILE: &str = "combined_ontology_data.txt";

const BANNER: &str = "############################################################";

/// Configuration for a consolidation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombineConfig {
    /// Directory whose direct children are consolidated
    pub input_dir: PathBuf,
    /// Destination file, truncated before writing
    pub output_file: PathBuf,
    /// Case-insensitive file name suffix. `None` or `""` selects every regular file.
    pub extension_filter: Option<String>,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            extension_filter: Some(DEFAULT_EXTENSION_FILTER.to_string()),
        }
    }
}

impl CombineConfig {
    /// Creates a configuration without an extension filter
    pub fn new(input_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_file: output_file.into(),
            extension_filter: None,
        }
    }

    #[must_use]
    pub fn with_extension_filter(mut self, filter: Option<impl Into<String>>) -> Self {
        self.extension_filter = filter.map(Into::into);
        self
    }

    /// The filter to apply, or `None` when it is absent or empty.
    ///
    /// Whitespace is significant: `" .json"` is a filter that `a.json` does not match.
    #[must_use]
    pub fn active_filter(&self) -> Option<&str> {
        self.extension_filter.as_deref().filter(|f| !f.is_empty())
    }
}

/// A source file left out of the output because it could not be read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub name: String,
    pub path: PathBuf,
    pub error: String,
}

/// Summary of a run that wrote the output file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombineReport {
    pub input_dir: PathBuf,
    pub output_file: PathBuf,
    /// Number of files that matched, as stated in the header
    pub discovered: usize,
    /// Names of the files whose sections were written, in output order
    pub written: Vec<String>,
    pub skipped: Vec<SkippedFile>,
}

/// Terminal result of a consolidation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CombineOutcome {
    /// The output file was written
    Written(CombineReport),
    /// Nothing matched; the output file was not touched
    NoMatchingFiles,
}

/// Progress notifications emitted while a run advances
#[derive(Debug)]
pub enum Progress<'a> {
    /// Listing finished
    Discovered {
        count: usize,
        filter: Option<&'a str>,
    },
    /// About to read and append a file
    Processing(&'a SourceFile),
    /// A file was left out of the output
    Skipped {
        file: &'a SourceFile,
        error: &'a SrcmergeError,
    },
}

/// Renders the banner block that opens the output file
#[must_use]
pub fn render_header(source_count: usize, input_dir: &Path) -> String {
    format!(
        "{BANNER}\n# Consolidated Data File generated from {source_count} sources in '{}'.\n{BANNER}\n\n",
        input_dir.display()
    )
}

/// Renders one delimited file section. Content is trimmed of leading and trailing whitespace.
#[must_use]
pub fn render_section(file: &SourceFile, contents: &str) -> String {
    format!(
        "\n\n# --- START FILE: {name} (Path: {path}) ---\n{body}\n# --- END FILE: {name} ---\n",
        name = file.name,
        path = file.path.display(),
        body = contents.trim(),
    )
}

/// Consolidates the matching files of `config.input_dir` into `config.output_file`
///
/// # Errors
///
/// - `SrcmergeError::DirectoryNotFound` if the input directory doesn't exist. The output file is not touched.
/// - `SrcmergeError::WalkDir` or `SrcmergeError::Io` if listing, creating, or writing fails.
///   The output may be left partially written.
///
/// Unreadable source files are not errors: they are announced through [`Progress::Skipped`]
/// and listed in the report.
pub fn combine(config: &CombineConfig) -> Result<CombineOutcome> {
    combine_with_progress(config, |_| {})
}

/// Same as [`combine`], reporting progress through `on_progress`
///
/// # Errors
///
/// See [`combine`].
pub fn combine_with_progress<F>(
    config: &CombineConfig,
    mut on_progress: F,
) -> Result<CombineOutcome>
where
    F: FnMut(Progress<'_>),
{
    let filter = config.active_filter();
    let files = list_source_files(&config.input_dir, filter)?;

    on_progress(Progress::Discovered {
        count: files.len(),
        filter,
    });

    if files.is_empty() {
        debug!("no matching files in {}", config.input_dir.display());
        return Ok(CombineOutcome::NoMatchingFiles);
    }

    info!(
        "Writing {} source(s) to {}",
        files.len(),
        config.output_file.display()
    );
    let mut out = BufWriter::new(File::create(&config.output_file)?);
    out.write_all(render_header(files.len(), &config.input_dir).as_bytes())?;

    let mut report = CombineReport {
        input_dir: config.input_dir.clone(),
        output_file: config.output_file.clone(),
        discovered: files.len(),
        written: Vec::with_capacity(files.len()),
        skipped: Vec::new(),
    };

    for file in &files {
        on_progress(Progress::Processing(file));

        // Read the whole file before writing so a failure leaves no partial section
        match read_file_contents(file) {
            Ok(contents) => {
                out.write_all(render_section(file, &contents).as_bytes())?;
                debug!("appended {} ({} bytes)", file.name, contents.len());
                report.written.push(file.name.clone());
            }
            Err(e) if e.is_recoverable() => {
                debug!("skipping {}: {e}", file.name);
                on_progress(Progress::Skipped { file, error: &e });
                report.skipped.push(SkippedFile {
                    name: file.name.clone(),
                    path: file.path.clone(),
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    out.flush()?;
    Ok(CombineOutcome::Written(report))
}
