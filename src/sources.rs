use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to read a line-delimited input list
#[derive(Debug, Error)]
#[error("failed to read list {path:?}: {source}")]
pub struct SourceError {
    /// Path of the list that could not be read
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Reads a line-oriented file into one string per non-empty trimmed line.
///
/// Order is preserved and duplicates are kept; deduplication (e.g. for
/// keyword lists) is up to the caller.
pub fn read_list(path: &Path) -> Result<Vec<String>, SourceError> {
    let raw = fs::read_to_string(path).map_err(|source| SourceError {
        path: path.to_path_buf(),
        source,
    })?;

    let lines: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    ::log::debug!("Read {} entries from {:?}", lines.len(), path);
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn trims_lines_and_drops_empties() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "  https://example.com/a  ").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "\t").unwrap();
        writeln!(file, "https://example.com/b").unwrap();

        let lines = read_list(&path).unwrap();
        assert_eq!(lines, vec!["https://example.com/a", "https://example.com/b"]);
    }

    #[test]
    fn preserves_order_and_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        fs::write(&path, "b\na\nb\n").unwrap();

        let lines = read_list(&path).unwrap();
        assert_eq!(lines, vec!["b", "a", "b"]);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let err = read_list(&path).unwrap_err();
        assert_eq!(err.path, path);
        assert_eq!(err.source.kind(), io::ErrorKind::NotFound);
    }
}
