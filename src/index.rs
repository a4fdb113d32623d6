//! Ranked candidate index files.
//!
//! One line per test item, whitespace-separated pool indices, best match
//! first. Line *i* belongs to test item *i*.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while reading an index file
#[derive(Error, Debug)]
pub enum IndexFileError {
    #[error("Index file not found: {0}")]
    NotFound(PathBuf),

    #[error("{path}:{line}: invalid index {token:?}")]
    InvalidIndex {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("{path}:{line}: empty candidate list")]
    EmptyLine { path: PathBuf, line: usize },

    #[error("Index file {path} has {lines} lines but {items} test items were loaded")]
    TooShort {
        path: PathBuf,
        lines: usize,
        items: usize,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Candidate lists for every test item, as ranked by one retrieval strategy
#[derive(Debug, Clone)]
pub struct CandidateIndex {
    /// Strategy name (file stem of the index file)
    pub strategy: String,
    path: PathBuf,
    lists: Vec<Vec<usize>>,
}

impl CandidateIndex {
    /// Load `<dir>/<strategy>.index`
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or any token is not a
    /// non-negative integer.
    pub fn load(dir: &Path, strategy: &str) -> Result<Self, IndexFileError> {
        let path = dir.join(format!("{strategy}.index"));
        if !path.exists() {
            return Err(IndexFileError::NotFound(path));
        }

        let content = std::fs::read_to_string(&path)?;
        let lists = parse_index(&content, &path)?;

        Ok(Self {
            strategy: strategy.to_string(),
            path,
            lists,
        })
    }

    /// Build an index from in-memory lists
    #[must_use]
    pub fn from_lists(strategy: impl Into<String>, lists: Vec<Vec<usize>>) -> Self {
        let strategy = strategy.into();
        Self {
            path: PathBuf::from(format!("{strategy}.index")),
            strategy,
            lists,
        }
    }

    /// File the index was loaded from
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ranked candidates for test item `item`
    #[must_use]
    pub fn candidates(&self, item: usize) -> &[usize] {
        self.lists.get(item).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of test items covered
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Check if the index covers no items
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Ensure every one of `items` test items has a line
    ///
    /// # Errors
    ///
    /// Returns `IndexFileError::TooShort` if the index has fewer lines.
    pub fn ensure_covers(&self, items: usize) -> Result<(), IndexFileError> {
        if self.lists.len() < items {
            return Err(IndexFileError::TooShort {
                path: self.path.clone(),
                lines: self.lists.len(),
                items,
            });
        }
        Ok(())
    }
}

/// Parse index file content; `path` is only used for error messages
///
/// # Errors
///
/// Returns `IndexFileError::EmptyLine` for a line without tokens and
/// `IndexFileError::InvalidIndex` on the first token that does not parse as
/// `usize`.
pub fn parse_index(content: &str, path: &Path) -> Result<Vec<Vec<usize>>, IndexFileError> {
    content
        .lines()
        .enumerate()
        .map(|(n, line)| {
            if line.trim().is_empty() {
                return Err(IndexFileError::EmptyLine {
                    path: path.to_path_buf(),
                    line: n + 1,
                });
            }
            line.split_whitespace()
                .map(|token| {
                    token.parse::<usize>().map_err(|_| IndexFileError::InvalidIndex {
                        path: path.to_path_buf(),
                        line: n + 1,
                        token: token.to_string(),
                    })
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_index() {
        let lists = parse_index("3 1 4\n1  5\t9\n", Path::new("bm25.index")).unwrap();
        assert_eq!(lists, vec![vec![3, 1, 4], vec![1, 5, 9]]);
    }

    #[test]
    fn test_parse_index_blank_line_rejected() {
        let result = parse_index("4 2\n\n7 1\n", Path::new("x.index"));
        assert!(matches!(result, Err(IndexFileError::EmptyLine { line: 2, .. })));

        let result = parse_index("4 2\n \t\n", Path::new("x.index"));
        assert!(matches!(result, Err(IndexFileError::EmptyLine { line: 2, .. })));
    }

    #[test]
    fn test_load_blank_line_names_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bm25.index"), "0 1\n\n").unwrap();

        let err = CandidateIndex::load(dir.path(), "bm25").unwrap_err();
        assert!(err.to_string().contains("bm25.index:2"), "{err}");
    }

    #[test]
    fn test_parse_index_invalid_token() {
        let err = parse_index("1 2\n3 x 4\n", Path::new("bm25.index")).unwrap_err();
        match err {
            IndexFileError::InvalidIndex { line, token, .. } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_index_negative_rejected() {
        let result = parse_index("-1\n", Path::new("x.index"));
        assert!(matches!(result, Err(IndexFileError::InvalidIndex { .. })));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("fuzzy.index"), "0 1\n2 3\n").unwrap();

        let index = CandidateIndex::load(dir.path(), "fuzzy").unwrap();
        assert_eq!(index.strategy, "fuzzy");
        assert!(index.path().ends_with("fuzzy.index"));
        assert_eq!(index.len(), 2);
        assert_eq!(index.candidates(1), &[2, 3]);
        assert!(index.candidates(5).is_empty());
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let result = CandidateIndex::load(dir.path(), "bm25");
        assert!(matches!(result, Err(IndexFileError::NotFound(_))));
    }

    #[test]
    fn test_ensure_covers() {
        let index = CandidateIndex::from_lists("bm25", vec![vec![0], vec![1]]);
        assert!(index.ensure_covers(2).is_ok());
        assert!(matches!(
            index.ensure_covers(3),
            Err(IndexFileError::TooShort { lines: 2, items: 3, .. })
        ));
    }
}
