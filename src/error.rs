use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for srcmerge operations
#[derive(Error, Debug)]
pub enum SrcmergeError {
    /// Input directory is missing or is not a directory
    #[error("Input directory '{}' not found or is not a directory", .path.display())]
    DirectoryNotFound { path: PathBuf },

    /// A single source file could not be read. Recovered by skipping the file.
    #[error("Failed to read '{name}' from path '{}': {source}", .path.display())]
    SourceFileRead {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// IO error while listing the input directory or writing the output file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// `WalkDir` error when listing the input directory
    #[error("Directory listing error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SrcmergeError {
    /// Whether the error only affects one source file and the run may continue
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::SourceFileRead { .. })
    }
}

pub type Result<T> = std::result::Result<T, SrcmergeError>;
