//! Load entries from a JSON file on disk.

use super::decode::decode_entries;
use super::EntrySource;
use crate::model::LogEntry;
use crate::utils::error::SourceError;
use log::{debug, info};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// JSON file holding entries (array or wrapped array)
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EntrySource for FileSource {
    fn load(&self) -> Result<Vec<LogEntry>, SourceError> {
        info!("Reading entries from: {}", self.path.display());

        let file = File::open(&self.path)?;
        let payload: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;

        let entries = decode_entries(&payload)?;
        debug!("Loaded {} entries from {}", entries.len(), self.path.display());

        Ok(entries)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"entry_id":"1","timestamp":"2024-03-01T10:00:00Z","log_type":"SQL","thread_id":"T1"}}]"#
        )
        .unwrap();

        let entries = FileSource::new(file.path()).load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].duration_ms, 0);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nope.json"));
        assert!(matches!(source.load(), Err(SourceError::Io(_))));
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            FileSource::new(file.path()).load(),
            Err(SourceError::JsonError(_))
        ));
    }
}
