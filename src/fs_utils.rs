use crate::error::{Result, SrcmergeError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// A regular file selected from the input directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// File name as it appears in the directory (lossy for non-UTF-8 names)
    pub name: String,
    /// Input directory joined with the file name
    pub path: PathBuf,
}

/// Case-insensitive suffix match of `name` against `filter`.
///
/// A `None` or empty filter matches every name. Whitespace in the filter is significant.
#[must_use]
pub fn matches_extension(name: &str, filter: Option<&str>) -> bool {
    match filter {
        None | Some("") => true,
        Some(ext) => name.to_lowercase().ends_with(&ext.to_lowercase()),
    }
}

/// Lists the regular files directly inside `dir` that pass `filter`,
/// sorted ascending by file name.
///
/// Sub-directories are neither returned nor descended into. Symlinks are
/// kept when they point at a regular file.
///
/// # Errors
///
/// - `SrcmergeError::DirectoryNotFound` if `dir` is not an existing directory.
/// - `SrcmergeError::WalkDir` if the directory or one of its entries cannot be read.
pub fn list_source_files(dir: &Path, filter: Option<&str>) -> Result<Vec<SourceFile>> {
    if !dir.is_dir() {
        return Err(SrcmergeError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();

        if !entry.path().is_file() {
            trace!("skipping non-file entry {name}");
            continue;
        }
        if !matches_extension(&name, filter) {
            trace!("skipping {name}: extension filter");
            continue;
        }

        debug!("selected {name}");
        files.push(SourceFile {
            name,
            path: dir.join(entry.file_name()),
        });
    }

    Ok(files)
}

/// Reads a source file as UTF-8 text with line endings normalized to `\n`.
///
/// Both `\r\n` and lone `\r` become `\n`.
///
/// # Errors
///
/// `SrcmergeError::SourceFileRead` if the file cannot be opened, read, or is not valid UTF-8.
pub fn read_file_contents(file: &SourceFile) -> Result<String> {
    let contents =
        fs::read_to_string(&file.path).map_err(|source| SrcmergeError::SourceFileRead {
            name: file.name.clone(),
            path: file.path.clone(),
            source,
        })?;

    Ok(normalize_line_endings(contents))
}

fn normalize_line_endings(contents: String) -> String {
    if contents.contains('\r') {
        contents.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn names(files: &[SourceFile]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_matches_extension() {
        assert!(matches_extension("a.json", Some(".json")));
        assert!(matches_extension("DATA.JSON", Some(".json")));
        assert!(matches_extension("data.json", Some(".JSON")));
        assert!(!matches_extension("c.txt", Some(".json")));
        assert!(!matches_extension("json", Some(".json")));

        // Absent or empty filters match everything
        assert!(matches_extension("c.txt", None));
        assert!(matches_extension("c.txt", Some("")));

        // Whitespace is compared literally
        assert!(!matches_extension("c.txt", Some("   ")));
        assert!(!matches_extension("a.json", Some(" .json")));
        assert!(matches_extension("a .json", Some(" .json")));
    }

    #[test]
    fn test_list_source_files_filter_and_order() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        fs::write(base.join("b.json"), "b").unwrap();
        fs::write(base.join("a.json"), "a").unwrap();
        fs::write(base.join("c.txt"), "c").unwrap();

        let files = list_source_files(base, Some(".json")).unwrap();
        assert_eq!(names(&files), vec!["a.json", "b.json"]);
        assert_eq!(files[0].path, base.join("a.json"));
    }

    #[test]
    fn test_list_source_files_case_sensitive_order() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        for name in ["b.txt", "C.txt", "a.txt", "_x.txt"] {
            fs::write(base.join(name), name).unwrap();
        }

        let files = list_source_files(base, None).unwrap();
        assert_eq!(names(&files), vec!["C.txt", "_x.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn test_list_source_files_excludes_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        fs::write(base.join("top.txt"), "top").unwrap();
        fs::create_dir(base.join("nested.txt")).unwrap();
        fs::write(base.join("nested.txt").join("inner.txt"), "inner").unwrap();

        let files = list_source_files(base, None).unwrap();
        assert_eq!(names(&files), vec!["top.txt"]);
    }

    #[test]
    fn test_list_source_files_uppercase_extension() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        fs::write(base.join("DATA.JSON"), "{}").unwrap();
        fs::write(base.join("notes.md"), "#").unwrap();

        let files = list_source_files(base, Some(".json")).unwrap();
        assert_eq!(names(&files), vec!["DATA.JSON"]);
    }

    #[test]
    fn test_list_source_files_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let files = list_source_files(temp_dir.path(), Some(".json")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_source_files_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        let result = list_source_files(&missing, None);
        assert!(matches!(
            result,
            Err(SrcmergeError::DirectoryNotFound { .. })
        ));

        // A regular file is not a directory either
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let result = list_source_files(&file, None);
        assert!(matches!(
            result,
            Err(SrcmergeError::DirectoryNotFound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_source_files_follows_file_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path();

        let outside = TempDir::new().unwrap();
        let target = outside.path().join("target.json");
        fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, base.join("link.json")).unwrap();
        std::os::unix::fs::symlink(outside.path(), base.join("dirlink.json")).unwrap();

        let files = list_source_files(base, Some(".json")).unwrap();
        assert_eq!(names(&files), vec!["link.json"]);
    }

    #[test]
    fn test_read_file_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.txt");
        fs::write(&path, "test content").unwrap();

        let file = SourceFile {
            name: "test.txt".to_string(),
            path,
        };
        assert_eq!(read_file_contents(&file).unwrap(), "test content");
    }

    #[test]
    fn test_read_file_contents_line_endings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("crlf.json");
        fs::write(&path, "{\r\n\"a\": 1\r\n}\r\nold\rmac").unwrap();

        let file = SourceFile {
            name: "crlf.json".to_string(),
            path,
        };
        assert_eq!(
            read_file_contents(&file).unwrap(),
            "{\n\"a\": 1\n}\nold\nmac"
        );
    }

    #[test]
    fn test_read_file_contents_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, [0xff_u8, 0xfe, 0x00, 0xc3]).unwrap();

        let file = SourceFile {
            name: "bad.json".to_string(),
            path,
        };
        let err = read_file_contents(&file).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, SrcmergeError::SourceFileRead { ref name, .. } if name == "bad.json"));
    }

    #[test]
    fn test_read_file_contents_vanished() {
        let temp_dir = TempDir::new().unwrap();
        let file = SourceFile {
            name: "gone.txt".to_string(),
            path: temp_dir.path().join("gone.txt"),
        };
        assert!(matches!(
            read_file_contents(&file),
            Err(SrcmergeError::SourceFileRead { .. })
        ));
    }
}
