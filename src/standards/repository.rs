//! Standards repository — whole-snapshot JSON load/save with atomic writes.
//!
//! The collection is only ever read fully and written fully. A write goes
//! to a temporary file in the destination directory and is renamed over
//! the target, so an interrupted run can lose an update but never corrupt
//! the existing snapshot.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::StandardEntry;

/// A fatal repository failure; aborts the whole batch run.
#[derive(Debug)]
pub enum RepositoryError {
    Io(io::Error),
    Malformed(serde_json::Error),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::Io(e) => write!(f, "repository io error: {e}"),
            RepositoryError::Malformed(e) => write!(f, "repository data malformed: {e}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

impl From<io::Error> for RepositoryError {
    fn from(e: io::Error) -> Self {
        RepositoryError::Io(e)
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(e: serde_json::Error) -> Self {
        RepositoryError::Malformed(e)
    }
}

/// Default path for the standards snapshot.
pub fn default_standards_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".chartbook");
    path.push("standards.json");
    path
}

/// A file-backed standards collection.
#[derive(Debug, Clone)]
pub struct StandardsRepository {
    path: PathBuf,
}

impl StandardsRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Repository at the default snapshot location.
    pub fn open_default() -> Self {
        Self::new(default_standards_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the whole collection. A missing file is an empty collection.
    pub fn load_all(&self) -> Result<Vec<StandardEntry>, RepositoryError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the whole collection as a pretty-printed, newline-terminated
    /// snapshot, atomically.
    pub fn save_all(&self, entries: &[StandardEntry]) -> Result<(), RepositoryError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut json = serde_json::to_string_pretty(entries)?;
        json.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(json.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::{RepeatSpec, SectionRecord};

    fn entry(title: &str) -> StandardEntry {
        StandardEntry {
            title: title.to_string(),
            sections: vec![SectionRecord {
                label: None,
                measures: vec![vec!["C".to_string()]],
                repeats: Some(RepeatSpec::Count(2)),
                endings: None,
            }],
            default_loops: Some(2),
        }
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = StandardsRepository::new(dir.path().join("standards.json"));
        assert!(repo.load_all().unwrap().is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = StandardsRepository::new(dir.path().join("standards.json"));

        let entries = vec![entry("Solar"), entry("Peace")];
        repo.save_all(&entries).unwrap();
        assert_eq!(repo.load_all().unwrap(), entries);
    }

    #[test]
    fn snapshot_is_pretty_and_newline_terminated() {
        let dir = tempfile::tempdir().unwrap();
        let repo = StandardsRepository::new(dir.path().join("standards.json"));
        repo.save_all(&[entry("Solar")]).unwrap();

        let raw = std::fs::read_to_string(repo.path()).unwrap();
        assert!(raw.ends_with('\n'));
        assert!(raw.contains("\n  "), "expected pretty indentation");
    }

    #[test]
    fn save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let repo = StandardsRepository::new(dir.path().join("nested").join("standards.json"));
        repo.save_all(&[entry("Solar")]).unwrap();
        assert!(repo.path().exists());
    }

    #[test]
    fn save_replaces_without_leaving_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let repo = StandardsRepository::new(dir.path().join("standards.json"));
        repo.save_all(&[entry("Solar")]).unwrap();
        repo.save_all(&[entry("Peace")]).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
        assert_eq!(repo.load_all().unwrap()[0].title, "Peace");
    }

    #[test]
    fn malformed_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standards.json");
        std::fs::write(&path, "not json").unwrap();
        let repo = StandardsRepository::new(&path);
        assert!(matches!(
            repo.load_all(),
            Err(RepositoryError::Malformed(_))
        ));
    }
}
