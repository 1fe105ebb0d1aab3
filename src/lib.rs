//! # srcmerge
//!
//! Consolidates the files of one directory into a single text file. Each file is
//! wrapped in start/end marker lines carrying its name and path, which keeps the
//! result readable by humans and easy to split apart again.
//!
//! ## Behaviour
//!
//! - Only direct children of the input directory are considered (no recursion)
//! - Optional case-insensitive suffix filter (`.json` matches `DATA.JSON`)
//! - Files are written in ascending byte order of their names
//! - File contents are trimmed of leading and trailing whitespace
//! - Unreadable files are reported and skipped; the run carries on
//!
//! ## Usage
//!
//! ### As a Library
//!
//! ```no_run
//! use srcmerge::{CombineConfig, CombineOutcome, combine};
//!
//! let config = CombineConfig::new("rdip", "combined_ontology_data.txt")
//!     .with_extension_filter(Some(".json"));
//!
//! match combine(&config) {
//!     Ok(CombineOutcome::Written(report)) => println!("{} files", report.written.len()),
//!     Ok(CombineOutcome::NoMatchingFiles) => eprintln!("nothing to combine"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! ### As a CLI Tool
//!
//! ```bash
//! # Consolidate ./rdip/*.json into combined_ontology_data.txt
//! srcmerge
//!
//! # Every regular file of another directory
//! srcmerge -i data --all -o data.txt
//! ```

pub mod consolidate;
pub mod error;
pub mod fs_utils;

// Re-export main types and functions for convenience
pub use consolidate::{
    CombineConfig, CombineOutcome, CombineReport, Progress, SkippedFile, combine,
    combine_with_progress, render_header, render_section,
};
pub use error::{Result, SrcmergeError};
pub use fs_utils::{SourceFile, list_source_files, matches_extension, read_file_contents};
